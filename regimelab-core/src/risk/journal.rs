//! Realised trade outcomes and the win/loss payoff ratio derived from them.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Ratio used until the journal has enough history.
pub const DEFAULT_WIN_LOSS_RATIO: f64 = 2.0;

const CAPACITY: usize = 100;
const MIN_TRADES: usize = 10;
const RECENT_WINDOW: usize = 20;

/// Bounded history of trade returns (fractions, e.g. `0.03` for +3%).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradeJournal {
    outcomes: VecDeque<f64>,
}

impl TradeJournal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Journal holding the most recent of `returns`, oldest first.
    pub fn from_returns(returns: impl IntoIterator<Item = f64>) -> Self {
        let mut journal = Self::new();
        for pnl in returns {
            journal.record(pnl);
        }
        journal
    }

    /// Record one realised return. Non-finite values are ignored.
    pub fn record(&mut self, pnl: f64) {
        if !pnl.is_finite() {
            tracing::warn!(pnl, "ignoring non-finite trade outcome");
            return;
        }
        if self.outcomes.len() == CAPACITY {
            self.outcomes.pop_front();
        }
        self.outcomes.push_back(pnl);
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Mean win over |mean loss| of the last 20 trades, clamped to `[1, 5]`.
    ///
    /// Returns 2.0 with fewer than 10 trades or when the recent window has
    /// no wins or no losses.
    pub fn win_loss_ratio(&self) -> f64 {
        if self.outcomes.len() < MIN_TRADES {
            return DEFAULT_WIN_LOSS_RATIO;
        }
        let skip = self.outcomes.len().saturating_sub(RECENT_WINDOW);
        let recent = self.outcomes.iter().skip(skip);

        let (mut win_sum, mut wins, mut loss_sum, mut losses) = (0.0, 0usize, 0.0, 0usize);
        for &pnl in recent {
            if pnl > 0.0 {
                win_sum += pnl;
                wins += 1;
            } else if pnl < 0.0 {
                loss_sum += pnl;
                losses += 1;
            }
        }
        if wins == 0 || losses == 0 {
            return DEFAULT_WIN_LOSS_RATIO;
        }
        let avg_win = win_sum / wins as f64;
        let avg_loss = (loss_sum / losses as f64).abs();
        (avg_win / avg_loss).clamp(1.0, 5.0)
    }
}
