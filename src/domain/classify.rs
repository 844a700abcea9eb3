//! Outcome classification, winner deduplication and per-instrument grouping.

use std::collections::{BTreeMap, HashMap};

use super::clock::ClockOffsets;
use super::trade::TradeRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Winner,
    Breakeven,
    Loser,
}

impl Outcome {
    /// Classify a profit against a symmetric breakeven band `[-tolerance, tolerance]`.
    pub fn of(profit: f64, tolerance: f64) -> Self {
        if profit > tolerance {
            Outcome::Winner
        } else if profit < -tolerance {
            Outcome::Loser
        } else {
            Outcome::Breakeven
        }
    }
}

/// The three outcome buckets of one instrument, each sorted by true open time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutcomeBuckets {
    pub winners: Vec<TradeRecord>,
    pub breakeven: Vec<TradeRecord>,
    pub losers: Vec<TradeRecord>,
}

impl OutcomeBuckets {
    pub fn len(&self) -> usize {
        self.winners.len() + self.breakeven.len() + self.losers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Trades grouped by lower-cased instrument, iterated in instrument order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupedTrades {
    groups: BTreeMap<String, OutcomeBuckets>,
}

impl GroupedTrades {
    pub fn get(&self, instrument: &str) -> Option<&OutcomeBuckets> {
        self.groups.get(&instrument.to_lowercase())
    }

    pub fn instruments(&self) -> Vec<&str> {
        self.groups.keys().map(String::as_str).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OutcomeBuckets)> {
        self.groups.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn total_trades(&self) -> usize {
        self.groups.values().map(OutcomeBuckets::len).sum()
    }
}

type DedupKey = (String, u64);

#[derive(Default)]
struct GroupBuilder {
    buckets: OutcomeBuckets,
    winner_slots: HashMap<DedupKey, usize>,
}

impl GroupBuilder {
    fn push_winner(&mut self, trade: &TradeRecord) {
        let key = (trade.open_time_raw.clone(), trade.open_price.to_bits());
        match self.winner_slots.get(&key) {
            Some(&slot) => {
                if trade.profit > self.buckets.winners[slot].profit {
                    self.buckets.winners[slot] = trade.clone();
                }
            }
            None => {
                self.winner_slots.insert(key, self.buckets.winners.len());
                self.buckets.winners.push(trade.clone());
            }
        }
    }
}

/// Build a fresh grouped result from a flat trade list.
///
/// `tolerance` is expected to be non-negative; see `cli::clamp_tolerance`.
/// Winners sharing `(open_time_raw, open_price)` within an instrument collapse
/// to the one with the strictly greatest profit (first seen wins ties).
/// Breakeven and losing trades are kept as-is.
pub fn classify(trades: &[TradeRecord], tolerance: f64, clock: &ClockOffsets) -> GroupedTrades {
    let mut builders: BTreeMap<String, GroupBuilder> = BTreeMap::new();

    for trade in trades {
        let group = builders.entry(trade.instrument.to_lowercase()).or_default();
        match Outcome::of(trade.profit, tolerance) {
            Outcome::Winner => group.push_winner(trade),
            Outcome::Breakeven => group.buckets.breakeven.push(trade.clone()),
            Outcome::Loser => group.buckets.losers.push(trade.clone()),
        }
    }

    let groups = builders
        .into_iter()
        .map(|(instrument, builder)| {
            let mut buckets = builder.buckets;
            sort_by_open_time(&mut buckets.winners, clock);
            sort_by_open_time(&mut buckets.breakeven, clock);
            sort_by_open_time(&mut buckets.losers, clock);
            tracing::info!(
                instrument = %instrument,
                winners = buckets.winners.len(),
                breakeven = buckets.breakeven.len(),
                losers = buckets.losers.len(),
                "classified instrument"
            );
            (instrument, buckets)
        })
        .collect();

    GroupedTrades { groups }
}

/// Stable ascending sort by true UTC open time. Unparseable times sort first.
fn sort_by_open_time(trades: &mut [TradeRecord], clock: &ClockOffsets) {
    trades.sort_by_cached_key(|t| clock.to_true_utc(&t.open_time_raw));
}
