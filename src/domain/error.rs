//! Domain error types.

/// Top-level error type for tradeplot.
#[derive(Debug, thiserror::Error)]
pub enum TradeplotError {
    #[error("no \"Closed Transactions:\" section found in the report")]
    MissingSection,

    #[error("the \"Closed Transactions:\" section contains no trade rows")]
    EmptyReport,

    /// The underlying cause is deliberately not carried.
    #[error("the report file is corrupted or has an unexpected format")]
    MalformedInput,

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("trade {ticket}: invalid timestamp {value:?} (expected YYYY.MM.DD HH:MM:SS)")]
    InvalidTimestamp { ticket: String, value: String },

    #[error("instrument {0:?} not found in report")]
    UnknownInstrument(String),

    #[error("template error: {reason}")]
    Template { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TradeplotError {
    /// True for the three kinds a report itself can trigger while parsing.
    pub fn is_report_error(&self) -> bool {
        matches!(
            self,
            TradeplotError::MissingSection
                | TradeplotError::EmptyReport
                | TradeplotError::MalformedInput
        )
    }
}

impl From<&TradeplotError> for std::process::ExitCode {
    fn from(err: &TradeplotError) -> Self {
        let code: u8 = match err {
            TradeplotError::Io(_) => 1,
            TradeplotError::ConfigParse { .. } | TradeplotError::ConfigInvalid { .. } => 2,
            TradeplotError::MissingSection
            | TradeplotError::EmptyReport
            | TradeplotError::MalformedInput
            | TradeplotError::UnknownInstrument(_) => 3,
            TradeplotError::InvalidTimestamp { .. } | TradeplotError::Template { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}
