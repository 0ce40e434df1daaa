use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The fixed-shape performance summary computed over the qualifying subset
/// of a trade snapshot.
///
/// This struct is the main output of the `AnalyticsEngine` and the data
/// transfer object for the stats cards of any presentation surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    // I. Trade tallies
    pub total_trades: usize,
    /// Trades with `pnl > 0`. Breakeven trades count in neither tally.
    pub wins: usize,
    /// Trades with `pnl < 0`.
    pub losses: usize,
    /// `wins / total_trades * 100`, 0 when there are no qualifying trades.
    pub win_rate_pct: Decimal,

    // II. Profitability
    /// Signed sum of PnL over the qualifying subset.
    pub net_profit: Decimal,
    /// `gross_profit / gross_loss`. `Some(0)` when there is nothing on
    /// either side; `None` stands for positive infinity (wins, no losses),
    /// since `Decimal` has no infinity.
    pub profit_factor: Option<Decimal>,
    pub average_win: Decimal,
    pub average_loss: Decimal,
    pub best_trade: Decimal,
    pub worst_trade: Decimal,

    // III. Risk
    /// Largest peak-to-trough equity deficit, reported as a magnitude.
    pub max_drawdown: Decimal,

    // IV. Direction breakdown (winning trades only)
    pub longs_won: usize,
    pub shorts_won: usize,
}

impl MetricsSummary {
    /// Creates a zeroed-out summary, the defined result for an empty or
    /// all-open snapshot.
    pub fn new() -> Self {
        Self {
            total_trades: 0,
            wins: 0,
            losses: 0,
            win_rate_pct: Decimal::ZERO,
            net_profit: Decimal::ZERO,
            profit_factor: Some(Decimal::ZERO),
            average_win: Decimal::ZERO,
            average_loss: Decimal::ZERO,
            best_trade: Decimal::ZERO,
            worst_trade: Decimal::ZERO,
            max_drawdown: Decimal::ZERO,
            longs_won: 0,
            shorts_won: 0,
        }
    }
}

impl Default for MetricsSummary {
    fn default() -> Self {
        Self::new()
    }
}

/// One point of the cumulative equity curve. The first point of a non-empty
/// curve is a synthetic zero baseline dated at the first qualifying trade,
/// so line charts render a visible start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    pub date: DateTime<Utc>,
    /// Cumulative PnL up to and including this trade, rounded to 2 dp.
    pub equity: Decimal,
    pub pnl: Decimal,
}

/// One point of the drawdown series: current equity minus the running peak,
/// always <= 0, rounded to 2 dp for display stability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawdownPoint {
    pub date: DateTime<Utc>,
    pub drawdown: Decimal,
}

/// Per-symbol performance breakdown row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolMetrics {
    pub symbol: String,
    pub total_trades: usize,
    pub wins: usize,
    pub losses: usize,
    pub win_rate_pct: Decimal,
    pub net_profit: Decimal,
}
