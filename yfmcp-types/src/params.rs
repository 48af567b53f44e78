//! Closed parameter sets accepted by the tools.
//!
//! Every enum parses from its wire string with `FromStr`; an unknown value
//! yields `YfmcpError::InvalidArg` carrying the message shown to the caller.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::YfmcpError;

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident, invalid = $invalid:expr, {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[doc = concat!("`", $wire, "`")]
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            /// Every accepted value, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Wire representation.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire),+
                }
            }

            /// Wire representations of [`Self::ALL`].
            #[must_use]
            pub fn wire_values() -> Vec<&'static str> {
                Self::ALL.iter().map(|v| v.as_str()).collect()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = YfmcpError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok(Self::$variant),)+
                    other => {
                        let render: fn(&str) -> String = $invalid;
                        Err(YfmcpError::InvalidArg(render(other)))
                    }
                }
            }
        }
    };
}

wire_enum! {
    /// Look-back window for price history.
    HistoryPeriod, invalid = |v| format!("Invalid period: {v}"), {
        D1 => "1d",
        D5 => "5d",
        M1 => "1mo",
        M3 => "3mo",
        M6 => "6mo",
        Y1 => "1y",
        Y2 => "2y",
        Y5 => "5y",
        Y10 => "10y",
        Ytd => "ytd",
        Max => "max",
    }
}

impl Default for HistoryPeriod {
    fn default() -> Self {
        Self::M1
    }
}

wire_enum! {
    /// Bar size for price history.
    HistoryInterval, invalid = |v| format!("Invalid interval: {v}"), {
        I1m => "1m",
        I2m => "2m",
        I5m => "5m",
        I15m => "15m",
        I30m => "30m",
        I60m => "60m",
        I90m => "90m",
        I1h => "1h",
        D1 => "1d",
        D5 => "5d",
        W1 => "1wk",
        Mo1 => "1mo",
        Mo3 => "3mo",
    }
}

impl Default for HistoryInterval {
    fn default() -> Self {
        Self::D1
    }
}

wire_enum! {
    /// Financial statement and reporting period.
    FinancialType, invalid = |v| format!("Invalid financial type: {v}"), {
        IncomeStatement => "income_stmt",
        QuarterlyIncomeStatement => "quarterly_income_stmt",
        BalanceSheet => "balance_sheet",
        QuarterlyBalanceSheet => "quarterly_balance_sheet",
        Cashflow => "cashflow",
        QuarterlyCashflow => "quarterly_cashflow",
    }
}

impl FinancialType {
    /// Quote-summary module holding this statement.
    #[must_use]
    pub const fn module(self) -> &'static str {
        match self {
            Self::IncomeStatement => "incomeStatementHistory",
            Self::QuarterlyIncomeStatement => "incomeStatementHistoryQuarterly",
            Self::BalanceSheet => "balanceSheetHistory",
            Self::QuarterlyBalanceSheet => "balanceSheetHistoryQuarterly",
            Self::Cashflow => "cashflowStatementHistory",
            Self::QuarterlyCashflow => "cashflowStatementHistoryQuarterly",
        }
    }

    /// Member of the module object that holds the statement array.
    #[must_use]
    pub const fn statements_key(self) -> &'static str {
        match self {
            Self::IncomeStatement | Self::QuarterlyIncomeStatement => "incomeStatementHistory",
            Self::BalanceSheet | Self::QuarterlyBalanceSheet => "balanceSheetStatements",
            Self::Cashflow | Self::QuarterlyCashflow => "cashflowStatements",
        }
    }
}

wire_enum! {
    /// Holder view.
    HolderType, invalid = |v| format!("Invalid holder type: {v}"), {
        MajorHolders => "major_holders",
        InstitutionalHolders => "institutional_holders",
        MutualFundHolders => "mutualfund_holders",
        InsiderTransactions => "insider_transactions",
        InsiderPurchases => "insider_purchases",
        InsiderRosterHolders => "insider_roster_holders",
    }
}

impl HolderType {
    /// Quote-summary module holding this view.
    #[must_use]
    pub const fn module(self) -> &'static str {
        match self {
            Self::MajorHolders => "majorHoldersBreakdown",
            Self::InstitutionalHolders => "institutionOwnership",
            Self::MutualFundHolders => "fundOwnership",
            Self::InsiderTransactions => "insiderTransactions",
            Self::InsiderPurchases => "netSharePurchaseActivity",
            Self::InsiderRosterHolders => "insiderHolders",
        }
    }

    /// Member holding the row array, or `None` when the module itself is the answer.
    #[must_use]
    pub const fn rows_key(self) -> Option<&'static str> {
        match self {
            Self::MajorHolders | Self::InsiderPurchases => None,
            Self::InstitutionalHolders | Self::MutualFundHolders => Some("ownershipList"),
            Self::InsiderTransactions => Some("transactions"),
            Self::InsiderRosterHolders => Some("holders"),
        }
    }
}

wire_enum! {
    /// Analyst data view.
    RecommendationType, invalid = |v| format!("Invalid recommendation type: {v}"), {
        Recommendations => "recommendations",
        UpgradesDowngrades => "upgrades_downgrades",
    }
}

wire_enum! {
    /// Side of an option chain.
    OptionType, invalid = |_| "Invalid option type. Please use 'calls' or 'puts'.".to_string(), {
        Calls => "calls",
        Puts => "puts",
    }
}
