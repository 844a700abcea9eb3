//! HTML broker statement adapter implementing StatementPort.
//!
//! Reads the "Closed Transactions:" table of a trading-platform HTML export.
//! The table walk is generic over the markup tree; the fixed column layout
//! lives entirely in [`map_row`].

use scraper::{ElementRef, Html, Node};

use crate::domain::error::TradeplotError;
use crate::domain::trade::{Side, TradeRecord, parse_amount};
use crate::ports::statement_port::StatementPort;

pub const SECTION_MARKER: &str = "Closed Transactions:";
pub const SECTION_TERMINATORS: [&str; 2] = ["Open Trades:", "Closed P/L:"];

/// Number of cells in a closed-trade row.
pub const TRADE_ROW_WIDTH: usize = 14;

const COL_TICKET: usize = 0;
const COL_OPEN_TIME: usize = 1;
const COL_SIDE: usize = 2;
const COL_SIZE: usize = 3;
const COL_INSTRUMENT: usize = 4;
const COL_OPEN_PRICE: usize = 5;
const COL_CLOSE_TIME: usize = 8;
const COL_CLOSE_PRICE: usize = 9;
const COL_PROFIT: usize = 13;

pub struct HtmlStatementAdapter;

impl HtmlStatementAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HtmlStatementAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl StatementPort for HtmlStatementAdapter {
    fn parse_trades(&self, raw: &[u8]) -> Result<Vec<TradeRecord>, TradeplotError> {
        let raw = raw.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(raw);
        let text = String::from_utf8_lossy(raw);
        if !looks_like_markup(&text) {
            return Err(TradeplotError::MalformedInput);
        }

        let document = Html::parse_document(&text);
        let table = find_section_table(&document).ok_or(TradeplotError::MissingSection)?;

        let mut trades = Vec::new();
        let mut in_section = false;
        for row in own_rows(table) {
            let cells = row_cells(row);
            if !in_section {
                in_section = cells.iter().any(|c| c.contains(SECTION_MARKER));
                continue;
            }
            if let Some(first) = cells.first() {
                if SECTION_TERMINATORS.iter().any(|t| first.contains(t)) {
                    tracing::debug!(terminator = %first, "end of closed transactions");
                    break;
                }
            }
            match map_row(&cells) {
                Some(trade) => {
                    tracing::debug!(ticket = %trade.ticket, instrument = %trade.instrument, "accepted trade row");
                    trades.push(trade);
                }
                None => tracing::debug!(cells = cells.len(), "skipped non-trade row"),
            }
        }

        if trades.is_empty() {
            return Err(TradeplotError::EmptyReport);
        }
        Ok(trades)
    }
}

/// Map one table row to a trade record.
///
/// Rows that are not exactly [`TRADE_ROW_WIDTH`] cells wide, or whose first
/// cell is not numeric, are not trades. Unparseable numeric cells become 0.
pub fn map_row(cells: &[String]) -> Option<TradeRecord> {
    if cells.len() != TRADE_ROW_WIDTH {
        return None;
    }
    parse_amount(&cells[COL_TICKET])?;

    let ticket = cells[COL_TICKET].trim().to_string();
    let number = |col: usize, field: &str| {
        parse_amount(&cells[col]).unwrap_or_else(|| {
            tracing::warn!(ticket = %ticket, field, value = %cells[col], "non-numeric cell, using 0");
            0.0
        })
    };

    let instrument = cells[COL_INSTRUMENT].trim().to_lowercase();
    Some(TradeRecord {
        open_time_raw: cells[COL_OPEN_TIME].trim().to_string(),
        close_time_raw: cells[COL_CLOSE_TIME].trim().to_string(),
        side: Side::parse(&cells[COL_SIDE]),
        size: number(COL_SIZE, "size"),
        instrument: if instrument.is_empty() {
            "unknown".to_string()
        } else {
            instrument
        },
        open_price: number(COL_OPEN_PRICE, "open_price"),
        close_price: number(COL_CLOSE_PRICE, "close_price"),
        profit: number(COL_PROFIT, "profit"),
        ticket,
    })
}

fn looks_like_markup(text: &str) -> bool {
    text.contains('<') && text.contains('>')
}

/// The nearest `table` enclosing the first marker text that sits in a table.
fn find_section_table(document: &Html) -> Option<ElementRef<'_>> {
    document
        .tree
        .root()
        .descendants()
        .filter(|node| match node.value() {
            Node::Text(text) => text.contains(SECTION_MARKER),
            _ => false,
        })
        .find_map(|marker| marker.ancestors().filter_map(ElementRef::wrap).find(is_table))
}

fn is_table(element: &ElementRef<'_>) -> bool {
    element.value().name() == "table"
}

/// Rows belonging to `table` itself, skipping rows of nested tables.
fn own_rows<'a>(table: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    let table_id = table.id();
    table
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|e| e.value().name() == "tr")
        .filter(move |row| {
            row.ancestors()
                .filter_map(ElementRef::wrap)
                .find(is_table)
                .map(|t| t.id())
                == Some(table_id)
        })
}

fn row_cells(row: ElementRef<'_>) -> Vec<String> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|e| matches!(e.value().name(), "td" | "th"))
        .map(|cell| cell.text().collect::<String>().trim().to_string())
        .collect()
}
