use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use yfmcp_core::{Clock, CredentialCache, CredentialSource, Credentials, YfmcpError};
use yfmcp_types::CredentialConfig;

struct FakeClock(Mutex<DateTime<Utc>>);

impl FakeClock {
    fn new() -> Arc<Self> {
        Arc::new(Self(Mutex::new(
            Utc.timestamp_opt(1_760_000_000, 0).unwrap(),
        )))
    }
    fn advance(&self, by: TimeDelta) {
        *self.0.lock().unwrap() += by;
    }
}

impl Clock for FakeClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

#[derive(Default)]
struct ScriptedSource {
    calls: AtomicUsize,
    fail: AtomicBool,
    delay: Duration,
}

impl ScriptedSource {
    fn slow(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CredentialSource for ScriptedSource {
    async fn handshake(&self) -> Result<Credentials, YfmcpError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(YfmcpError::auth_unavailable("scripted failure"));
        }
        Ok(Credentials::new(format!("session={n}"), format!("crumb{n}")))
    }
}

fn cache(source: &Arc<ScriptedSource>, clock: &Arc<FakeClock>) -> CredentialCache {
    CredentialCache::with_clock(
        source.clone(),
        clock.clone(),
        &CredentialConfig::default(),
    )
}

#[tokio::test]
async fn second_acquire_within_ttl_is_a_cache_hit() {
    let source = Arc::new(ScriptedSource::default());
    let clock = FakeClock::new();
    let cache = cache(&source, &clock);

    let first = cache.acquire().await.unwrap();
    clock.advance(TimeDelta::minutes(29) + TimeDelta::seconds(59));
    let second = cache.acquire().await.unwrap();

    assert_eq!(source.calls(), 1);
    assert_eq!(first, second);
    assert_eq!(second.cookie, "session=1");
    assert_eq!(second.crumb, "crumb1");
}

#[tokio::test]
async fn expiry_is_thirty_minutes_after_refresh() {
    let source = Arc::new(ScriptedSource::default());
    let clock = FakeClock::new();
    let cache = cache(&source, &clock);

    let start = clock.now();
    let state = cache.acquire().await.unwrap();
    assert_eq!(state.expires_at, start + TimeDelta::minutes(30));
}

#[tokio::test]
async fn acquire_after_expiry_refreshes() {
    let source = Arc::new(ScriptedSource::default());
    let clock = FakeClock::new();
    let cache = cache(&source, &clock);

    let first = cache.acquire().await.unwrap();
    clock.advance(TimeDelta::minutes(30));
    let second = cache.acquire().await.unwrap();

    assert_eq!(source.calls(), 2);
    assert_ne!(first.crumb, second.crumb);
    assert!(second.is_valid_at(clock.now()));
}

#[tokio::test]
async fn failed_refresh_discards_expired_state() {
    let source = Arc::new(ScriptedSource::default());
    let clock = FakeClock::new();
    let cache = cache(&source, &clock);

    cache.acquire().await.unwrap();
    clock.advance(TimeDelta::hours(1));
    source.fail.store(true, Ordering::SeqCst);

    let err = cache.acquire().await.unwrap_err();
    assert!(matches!(err, YfmcpError::AuthUnavailable { .. }));
    assert!(cache.snapshot().await.is_none(), "stale pair must not be kept");

    source.fail.store(false, Ordering::SeqCst);
    let state = cache.acquire().await.unwrap();
    assert_eq!(source.calls(), 3);
    assert_eq!(state.crumb, "crumb3");
}

#[tokio::test]
async fn concurrent_misses_share_one_handshake() {
    let source = Arc::new(ScriptedSource::slow(Duration::from_millis(50)));
    let clock = FakeClock::new();
    let cache = Arc::new(cache(&source, &clock));

    let mut tasks = Vec::new();
    for _ in 0..8 {
        let cache = Arc::clone(&cache);
        tasks.push(tokio::spawn(async move { cache.acquire().await }));
    }
    let mut crumbs = Vec::new();
    for task in tasks {
        crumbs.push(task.await.unwrap().unwrap().crumb);
    }

    assert_eq!(source.calls(), 1);
    assert!(crumbs.iter().all(|c| c == "crumb1"));
}

#[tokio::test]
async fn hung_handshake_times_out_and_releases_the_cache() {
    let source = Arc::new(ScriptedSource::slow(Duration::from_secs(5)));
    let clock = FakeClock::new();
    let cfg = CredentialConfig {
        handshake_timeout: Duration::from_millis(50),
        ..CredentialConfig::default()
    };
    let cache = CredentialCache::with_clock(source.clone(), clock.clone(), &cfg);

    let err = cache.acquire().await.unwrap_err();
    match err {
        YfmcpError::AuthUnavailable { reason } => assert!(reason.contains("timed out")),
        other => panic!("expected AuthUnavailable, got {other:?}"),
    }
    assert!(cache.snapshot().await.is_none());
}
