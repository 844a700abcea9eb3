//! Per-instrument statistics over a grouped result.

use super::classify::{GroupedTrades, OutcomeBuckets};

#[derive(Debug, Clone, PartialEq)]
pub struct InstrumentSummary {
    pub instrument: String,
    pub winners: usize,
    pub breakeven: usize,
    pub losers: usize,
    pub gross_win: f64,
    pub gross_loss: f64,
    pub net_profit: f64,
    pub win_rate: f64,
}

impl InstrumentSummary {
    pub fn compute(instrument: &str, buckets: &OutcomeBuckets) -> Self {
        let gross_win: f64 = buckets.winners.iter().map(|t| t.profit).sum();
        let gross_loss: f64 = buckets.losers.iter().map(|t| t.profit).sum();
        let breakeven_net: f64 = buckets.breakeven.iter().map(|t| t.profit).sum();

        let total = buckets.len();
        let win_rate = if total > 0 {
            buckets.winners.len() as f64 / total as f64
        } else {
            0.0
        };

        Self {
            instrument: instrument.to_string(),
            winners: buckets.winners.len(),
            breakeven: buckets.breakeven.len(),
            losers: buckets.losers.len(),
            gross_win,
            gross_loss,
            net_profit: gross_win + gross_loss + breakeven_net,
            win_rate,
        }
    }

    /// One summary per instrument, in instrument order.
    pub fn compute_all(grouped: &GroupedTrades) -> Vec<Self> {
        grouped
            .iter()
            .map(|(instrument, buckets)| Self::compute(instrument, buckets))
            .collect()
    }

    pub fn total(&self) -> usize {
        self.winners + self.breakeven + self.losers
    }
}
