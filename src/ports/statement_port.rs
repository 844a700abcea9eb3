//! Broker statement parsing port trait.

use crate::domain::error::TradeplotError;
use crate::domain::trade::TradeRecord;

/// Extracts closed trades from a raw statement export.
///
/// Implementations fail with [`TradeplotError::MissingSection`],
/// [`TradeplotError::EmptyReport`] or [`TradeplotError::MalformedInput`] and
/// never return a partial list.
pub trait StatementPort {
    fn parse_trades(&self, raw: &[u8]) -> Result<Vec<TradeRecord>, TradeplotError>;
}
