use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue, USER_AGENT};

/// Desktop browser user agent sent with every upstream request.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36";
/// `Accept` value sent with every upstream request.
pub const BROWSER_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,application/json;q=0.8,*/*;q=0.7";
/// `Accept-Language` value sent with every upstream request.
pub const BROWSER_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

/// Header set the upstream expects from a browser. Requests without it are blocked.
#[must_use]
pub fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(3);
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    headers.insert(ACCEPT, HeaderValue::from_static(BROWSER_ACCEPT));
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static(BROWSER_ACCEPT_LANGUAGE),
    );
    headers
}

/// Build an HTTP client carrying the browser header set.
///
/// # Errors
/// Returns `Transport` if the TLS backend cannot be initialised.
pub fn build_client(
    timeout: std::time::Duration,
    follow_redirects: bool,
) -> Result<reqwest::Client, yfmcp_types::YfmcpError> {
    let mut builder = reqwest::Client::builder()
        .default_headers(browser_headers())
        .timeout(timeout);
    if !follow_redirects {
        builder = builder.redirect(reqwest::redirect::Policy::none());
    }
    builder.build().map_err(crate::transport_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_set_is_complete() {
        let h = browser_headers();
        assert_eq!(h.len(), 3);
        assert!(h[USER_AGENT].to_str().unwrap().starts_with("Mozilla/5.0"));
        assert_eq!(h[ACCEPT_LANGUAGE], "en-US,en;q=0.9");
    }
}
