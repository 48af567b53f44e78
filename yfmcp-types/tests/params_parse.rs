use std::str::FromStr;

use yfmcp_types::{
    FinancialType, HistoryInterval, HistoryPeriod, HolderType, OptionType, RecommendationType,
    YfmcpError,
};

#[test]
fn defaults_match_tool_contract() {
    assert_eq!(HistoryPeriod::default().as_str(), "1mo");
    assert_eq!(HistoryInterval::default().as_str(), "1d");
}

#[test]
fn every_wire_value_round_trips_through_from_str() {
    for p in HistoryPeriod::ALL {
        assert_eq!(HistoryPeriod::from_str(p.as_str()).unwrap(), *p);
    }
    for i in HistoryInterval::ALL {
        assert_eq!(HistoryInterval::from_str(i.as_str()).unwrap(), *i);
    }
    assert_eq!(FinancialType::ALL.len(), 6);
    assert_eq!(HolderType::ALL.len(), 6);
    assert_eq!(RecommendationType::ALL.len(), 2);
}

#[test]
fn unknown_financial_type_carries_caller_message() {
    let err = FinancialType::from_str("annual_report").unwrap_err();
    assert_eq!(
        err,
        YfmcpError::InvalidArg("Invalid financial type: annual_report".into())
    );
    assert_eq!(err.to_string(), "Invalid financial type: annual_report");
}

#[test]
fn unknown_holder_and_option_types_are_rejected() {
    assert_eq!(
        HolderType::from_str("whales").unwrap_err().to_string(),
        "Invalid holder type: whales"
    );
    assert_eq!(
        OptionType::from_str("straddles").unwrap_err().to_string(),
        "Invalid option type. Please use 'calls' or 'puts'."
    );
}

#[test]
fn statement_modules_and_keys() {
    assert_eq!(
        FinancialType::QuarterlyBalanceSheet.module(),
        "balanceSheetHistoryQuarterly"
    );
    assert_eq!(
        FinancialType::QuarterlyBalanceSheet.statements_key(),
        "balanceSheetStatements"
    );
    assert_eq!(HolderType::MajorHolders.rows_key(), None);
    assert_eq!(HolderType::MutualFundHolders.module(), "fundOwnership");
}

#[test]
fn serde_uses_wire_strings() {
    let json = serde_json::to_string(&HolderType::MutualFundHolders).unwrap();
    assert_eq!(json, "\"mutualfund_holders\"");
    let back: HistoryInterval = serde_json::from_str("\"1wk\"").unwrap();
    assert_eq!(back, HistoryInterval::W1);
}
