//! Closed trade records extracted from a broker statement.

use std::fmt;

/// Direction of a closed position. Unrecognized values are passed through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Side {
    Buy,
    Sell,
    Other(String),
}

impl Side {
    pub fn parse(value: &str) -> Self {
        let value = value.trim().to_lowercase();
        match value.as_str() {
            "buy" => Side::Buy,
            "sell" => Side::Sell,
            "" => Side::Other("unknown".to_string()),
            _ => Side::Other(value),
        }
    }

    pub fn is_buy(&self) -> bool {
        matches!(self, Side::Buy)
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "buy"),
            Side::Sell => write!(f, "sell"),
            Side::Other(s) => write!(f, "{s}"),
        }
    }
}

/// One closed position as listed in the statement.
///
/// Timestamps are kept in the broker-local `YYYY.MM.DD HH:MM:SS` form they
/// were reported in; see [`crate::domain::clock`] for conversions.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeRecord {
    pub ticket: String,
    pub open_time_raw: String,
    pub close_time_raw: String,
    pub side: Side,
    pub size: f64,
    /// Lower-cased symbol, the grouping key.
    pub instrument: String,
    pub open_price: f64,
    pub close_price: f64,
    pub profit: f64,
}

/// Parse a statement number, dropping thousands separators.
///
/// Returns `None` when the cell is not numeric; callers decide the default.
pub fn parse_amount(cell: &str) -> Option<f64> {
    // char::is_whitespace covers the no-break spaces some exports use
    let cleaned: String = cell.chars().filter(|c| !c.is_whitespace()).collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_parses_case_insensitively() {
        assert_eq!(Side::parse("BUY"), Side::Buy);
        assert_eq!(Side::parse(" sell "), Side::Sell);
        assert!(Side::parse("buy").is_buy());
        assert!(!Side::parse("sell").is_buy());
    }

    #[test]
    fn side_passes_through_unknown_values() {
        assert_eq!(Side::parse("Balance"), Side::Other("balance".into()));
        assert_eq!(Side::parse(""), Side::Other("unknown".into()));
        assert_eq!(Side::parse("buy limit").to_string(), "buy limit");
    }

    #[test]
    fn parse_amount_strips_thousands_separators() {
        assert_eq!(parse_amount("1 234.56"), Some(1234.56));
        assert_eq!(parse_amount("-12 000.00"), Some(-12000.0));
        assert_eq!(parse_amount("3\u{a0}100.5"), Some(3100.5));
    }

    #[test]
    fn parse_amount_rejects_non_numeric() {
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("n/a"), None);
        assert_eq!(parse_amount("inf"), None);
    }
}
