//! Pine draw-call rendering for each outcome bucket.
//!
//! Every value is inlined as a literal; the emitted calls compute nothing.

use crate::domain::classify::OutcomeBuckets;
use crate::domain::clock::{ClockOffsets, DisplayTimestamp};
use crate::domain::error::TradeplotError;
use crate::domain::trade::TradeRecord;

const INDENT: &str = "    ";

/// Pine's upper bound for `max_labels_count`; the default template asks for it.
pub const PINE_MAX_LABELS: usize = 500;

const WINNER_COLOR: &str = "color.green";
const BREAKEVEN_COLOR: &str = "color.blue";
const LOSER_COLOR: &str = "color.red";

const WINNER_STYLE: &str = "label.style_circle";
const BREAKEVEN_STYLE: &str = "label.style_diamond";
const BUY_LOSER_STYLE: &str = "label.style_triangleup";
const SELL_LOSER_STYLE: &str = "label.style_triangledown";

/// Quote a value as a Pine string literal.
pub fn pine_string(value: &str) -> String {
    let escaped = value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n");
    format!("\"{escaped}\"")
}

fn display_time(
    clock: &ClockOffsets,
    trade: &TradeRecord,
    raw: &str,
) -> Result<DisplayTimestamp, TradeplotError> {
    clock
        .raw_to_display(raw)
        .ok_or_else(|| TradeplotError::InvalidTimestamp {
            ticket: trade.ticket.clone(),
            value: raw.to_string(),
        })
}

fn label(at: &DisplayTimestamp, price: f64, style: &str, color: &str, tooltip: &str) -> String {
    format!(
        "{INDENT}label.new({}, {}, xloc=xloc.bar_time, yloc=yloc.price, style={}, color={}, size=iconSize, tooltip={})",
        at.to_pine(),
        price,
        style,
        color,
        pine_string(tooltip)
    )
}

fn line(from: &DisplayTimestamp, from_price: f64, to: &DisplayTimestamp, to_price: f64) -> String {
    format!(
        "{INDENT}line.new({}, {}, {}, {}, xloc=xloc.bar_time, color={}, width=2)",
        from.to_pine(),
        from_price,
        to.to_pine(),
        to_price,
        WINNER_COLOR
    )
}

fn render_winner(trade: &TradeRecord, clock: &ClockOffsets) -> Result<Vec<String>, TradeplotError> {
    let open_at = display_time(clock, trade, &trade.open_time_raw)?;
    let close_at = display_time(clock, trade, &trade.close_time_raw)?;
    let side = trade.side.to_string().to_uppercase();

    let open_tip = format!(
        "Ticket #{} {} open\n{} @ {}\nProfit: {:.2}",
        trade.ticket, side, trade.open_time_raw, trade.open_price, trade.profit
    );
    let close_tip = format!(
        "Ticket #{} close\n{} @ {}\nProfit: {:.2}",
        trade.ticket, trade.close_time_raw, trade.close_price, trade.profit
    );

    Ok(vec![
        label(&open_at, trade.open_price, WINNER_STYLE, WINNER_COLOR, &open_tip),
        label(&close_at, trade.close_price, WINNER_STYLE, WINNER_COLOR, &close_tip),
        line(&open_at, trade.open_price, &close_at, trade.close_price),
    ])
}

fn open_tooltip(trade: &TradeRecord) -> String {
    format!(
        "Ticket #{} {}\nOpen: {} @ {}\nProfit: {:.2}",
        trade.ticket,
        trade.side.to_string().to_uppercase(),
        trade.open_time_raw,
        trade.open_price,
        trade.profit
    )
}

fn render_breakeven(trade: &TradeRecord, clock: &ClockOffsets) -> Result<String, TradeplotError> {
    let open_at = display_time(clock, trade, &trade.open_time_raw)?;
    Ok(label(
        &open_at,
        trade.open_price,
        BREAKEVEN_STYLE,
        BREAKEVEN_COLOR,
        &open_tooltip(trade),
    ))
}

fn render_loser(trade: &TradeRecord, clock: &ClockOffsets) -> Result<String, TradeplotError> {
    let open_at = display_time(clock, trade, &trade.open_time_raw)?;
    let style = if trade.side.is_buy() {
        BUY_LOSER_STYLE
    } else {
        SELL_LOSER_STYLE
    };
    Ok(label(
        &open_at,
        trade.open_price,
        style,
        LOSER_COLOR,
        &open_tooltip(trade),
    ))
}

/// Labels the draw block creates: two per winner, one per other trade.
pub fn label_count(buckets: &OutcomeBuckets) -> usize {
    buckets.winners.len() * 2 + buckets.breakeven.len() + buckets.losers.len()
}

/// Body of the one-time draw block, one indented call per line.
pub fn render_draw_calls(
    buckets: &OutcomeBuckets,
    clock: &ClockOffsets,
) -> Result<String, TradeplotError> {
    let labels = label_count(buckets);
    if labels > PINE_MAX_LABELS {
        tracing::warn!(
            labels,
            limit = PINE_MAX_LABELS,
            "more labels than a Pine script can show, the oldest will be dropped"
        );
    }

    let mut lines = Vec::with_capacity(buckets.winners.len() * 3 + buckets.len());

    for trade in &buckets.winners {
        lines.extend(render_winner(trade, clock)?);
    }
    for trade in &buckets.breakeven {
        lines.push(render_breakeven(trade, clock)?);
    }
    for trade in &buckets.losers {
        lines.push(render_loser(trade, clock)?);
    }

    Ok(lines.join("\n"))
}

/// Comment line recording what the script draws.
pub fn render_trade_summary(buckets: &OutcomeBuckets) -> String {
    format!(
        "// {} winners, {} breakeven, {} losers",
        buckets.winners.len(),
        buckets.breakeven.len(),
        buckets.losers.len()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::trade::Side;

    fn trade(side: Side, profit: f64) -> TradeRecord {
        TradeRecord {
            ticket: "1001".into(),
            open_time_raw: "2025.06.25 16:09:01".into(),
            close_time_raw: "2025.06.25 18:30:00".into(),
            side,
            size: 0.1,
            instrument: "eurusd".into(),
            open_price: 1.085,
            close_price: 1.087,
            profit,
        }
    }

    #[test]
    fn pine_string_escapes() {
        assert_eq!(pine_string("a\"b"), "\"a\\\"b\"");
        assert_eq!(pine_string("a\\b"), "\"a\\\\b\"");
        assert_eq!(pine_string("a\nb"), "\"a\\nb\"");
    }

    #[test]
    fn winner_draws_two_labels_and_a_line() {
        let lines = render_winner(&trade(Side::Buy, 80.0), &ClockOffsets::default()).unwrap();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("timestamp(2025, 6, 25, 9, 9)"));
        assert!(lines[1].contains("timestamp(2025, 6, 25, 11, 30)"));
        assert!(lines[2].starts_with("    line.new(timestamp(2025, 6, 25, 9, 9), 1.085, timestamp(2025, 6, 25, 11, 30), 1.087"));
        assert!(lines.iter().all(|l| l.contains(WINNER_COLOR)));
        assert!(lines[0].contains("Profit: 80.00"));
        assert!(lines[0].contains("Ticket #1001"));
    }

    #[test]
    fn loser_triangle_follows_side() {
        let clock = ClockOffsets::default();
        let buy = render_loser(&trade(Side::Buy, -10.0), &clock).unwrap();
        let sell = render_loser(&trade(Side::Sell, -10.0), &clock).unwrap();
        let other = render_loser(&trade(Side::Other("unknown".into()), -10.0), &clock).unwrap();
        assert!(buy.contains(BUY_LOSER_STYLE));
        assert!(sell.contains(SELL_LOSER_STYLE));
        assert!(other.contains(SELL_LOSER_STYLE));
        assert!(buy.contains(LOSER_COLOR));
    }

    #[test]
    fn breakeven_is_blue_diamond() {
        let out = render_breakeven(&trade(Side::Sell, 0.0), &ClockOffsets::default()).unwrap();
        assert!(out.contains(BREAKEVEN_STYLE));
        assert!(out.contains(BREAKEVEN_COLOR));
        assert!(out.contains("Profit: 0.00"));
    }

    #[test]
    fn bad_close_time_names_the_ticket() {
        let mut t = trade(Side::Buy, 5.0);
        t.close_time_raw = String::new();
        let err = render_winner(&t, &ClockOffsets::default()).unwrap_err();
        assert!(matches!(err, TradeplotError::InvalidTimestamp { ticket, .. } if ticket == "1001"));
    }

    #[test]
    fn draw_calls_are_indented() {
        let buckets = OutcomeBuckets {
            winners: vec![trade(Side::Buy, 5.0)],
            breakeven: vec![],
            losers: vec![trade(Side::Sell, -5.0)],
        };
        let body = render_draw_calls(&buckets, &ClockOffsets::default()).unwrap();
        assert_eq!(body.lines().count(), 4);
        assert!(body.lines().all(|l| l.starts_with(INDENT)));
    }

    #[test]
    fn label_count_can_exceed_pine_cap() {
        let buckets = OutcomeBuckets {
            winners: vec![trade(Side::Buy, 5.0); 250],
            breakeven: vec![trade(Side::Sell, 0.0)],
            losers: vec![],
        };
        assert_eq!(label_count(&buckets), 501);
        assert!(label_count(&buckets) > PINE_MAX_LABELS);
        // still renders every call
        let body = render_draw_calls(&buckets, &ClockOffsets::default()).unwrap();
        assert_eq!(body.matches("label.new(").count(), 501);
    }

    #[test]
    fn summary_comment_counts_buckets() {
        let buckets = OutcomeBuckets {
            winners: vec![trade(Side::Buy, 5.0)],
            breakeven: vec![],
            losers: vec![],
        };
        assert_eq!(render_trade_summary(&buckets), "// 1 winners, 0 breakeven, 0 losers");
    }
}
