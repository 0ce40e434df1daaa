use crate::calendar::{CalendarMonth, DayBucket, HeatmapYear};
use crate::report::{DrawdownPoint, EquityPoint, MetricsSummary, SymbolMetrics};
use chrono::NaiveDate;
use core_types::{Direction, TradeRecord};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// A stateless calculator deriving performance views from a trade snapshot.
///
/// Every method filters the snapshot down to the qualifying subset (closed
/// trades with a recorded PnL), orders it by `created_at` ascending where the
/// view is time-ordered, and reduces it in a single pass. Inputs are never
/// mutated.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyticsEngine {}

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// The qualifying subset in ascending trade-date order. The sort is
    /// stable, so trades sharing a timestamp keep their input order.
    fn qualifying<'a>(&self, trades: &'a [TradeRecord]) -> Vec<&'a TradeRecord> {
        let mut subset: Vec<&TradeRecord> = trades.iter().filter(|t| t.is_qualifying()).collect();
        subset.sort_by_key(|t| t.created_at);
        subset
    }

    /// Computes the fixed-shape performance summary.
    ///
    /// An empty or all-open snapshot yields a fully zeroed summary, not an
    /// error. Breakeven trades (`pnl == 0`) enter `total_trades` and
    /// `net_profit` but neither win nor loss tallies.
    pub fn summarize(&self, trades: &[TradeRecord]) -> MetricsSummary {
        let subset = self.qualifying(trades);

        let mut summary = MetricsSummary::new();
        summary.total_trades = subset.len();
        if subset.is_empty() {
            return summary;
        }

        let mut gross_profit = Decimal::ZERO;
        let mut gross_loss = Decimal::ZERO;
        let mut running_equity = Decimal::ZERO;
        let mut peak_equity = Decimal::ZERO;
        let mut best_trade: Option<Decimal> = None;
        let mut worst_trade: Option<Decimal> = None;

        for trade in &subset {
            let pnl = trade.pnl.unwrap_or_default();
            summary.net_profit += pnl;
            running_equity += pnl;

            if pnl > Decimal::ZERO {
                summary.wins += 1;
                gross_profit += pnl;
                best_trade = Some(best_trade.map_or(pnl, |b| b.max(pnl)));
                match trade.direction {
                    Direction::Long => summary.longs_won += 1,
                    Direction::Short => summary.shorts_won += 1,
                }
            } else if pnl < Decimal::ZERO {
                summary.losses += 1;
                gross_loss += pnl.abs();
                worst_trade = Some(worst_trade.map_or(pnl, |w| w.min(pnl)));
            }

            // Pre-trade equity of 0 counts as the initial peak candidate.
            if running_equity > peak_equity {
                peak_equity = running_equity;
            } else {
                let drawdown = peak_equity - running_equity;
                if drawdown > summary.max_drawdown {
                    summary.max_drawdown = drawdown;
                }
            }
        }

        summary.win_rate_pct = Decimal::from(summary.wins) / Decimal::from(summary.total_trades)
            * Decimal::ONE_HUNDRED;

        summary.profit_factor = if gross_loss > Decimal::ZERO {
            Some(gross_profit / gross_loss)
        } else if gross_profit > Decimal::ZERO {
            // Gains and no losses: positive infinity, modeled as None.
            None
        } else {
            Some(Decimal::ZERO)
        };

        if summary.wins > 0 {
            summary.average_win = gross_profit / Decimal::from(summary.wins);
        }
        if summary.losses > 0 {
            summary.average_loss = gross_loss / Decimal::from(summary.losses);
        }

        summary.best_trade = best_trade.unwrap_or(Decimal::ZERO);
        summary.worst_trade = worst_trade.unwrap_or(Decimal::ZERO);

        summary
    }

    /// Produces the chronological cumulative-equity curve.
    ///
    /// A non-empty curve starts with a synthetic `{equity: 0, pnl: 0}` point
    /// dated at the first qualifying trade; no qualifying trades yields an
    /// empty curve.
    pub fn equity_curve(&self, trades: &[TradeRecord]) -> Vec<EquityPoint> {
        let subset = self.qualifying(trades);

        let mut curve = Vec::with_capacity(subset.len() + 1);
        let Some(first) = subset.first() else {
            return curve;
        };
        curve.push(EquityPoint {
            date: first.created_at,
            equity: Decimal::ZERO,
            pnl: Decimal::ZERO,
        });

        let mut running_equity = Decimal::ZERO;
        for trade in &subset {
            let pnl = trade.pnl.unwrap_or_default();
            running_equity += pnl;
            curve.push(EquityPoint {
                date: trade.created_at,
                equity: running_equity.round_dp(2),
                pnl,
            });
        }

        curve
    }

    /// Produces the per-trade drawdown series using the same running-peak
    /// reduction as `summarize`, emitting one non-positive point per trade
    /// plus the zero baseline point.
    pub fn drawdown_series(&self, trades: &[TradeRecord]) -> Vec<DrawdownPoint> {
        let subset = self.qualifying(trades);

        let mut points = Vec::with_capacity(subset.len() + 1);
        let Some(first) = subset.first() else {
            return points;
        };
        points.push(DrawdownPoint {
            date: first.created_at,
            drawdown: Decimal::ZERO,
        });

        let mut running_equity = Decimal::ZERO;
        let mut peak_equity = Decimal::ZERO;
        for trade in &subset {
            running_equity += trade.pnl.unwrap_or_default();
            if running_equity > peak_equity {
                peak_equity = running_equity;
            }
            points.push(DrawdownPoint {
                date: trade.created_at,
                drawdown: (running_equity - peak_equity).round_dp(2),
            });
        }

        points
    }

    /// Groups qualifying trades by symbol (case-sensitive; symbols are
    /// uppercased at entry) and returns the rows sorted descending by trade
    /// count. The sort is stable, so count ties keep encounter order.
    pub fn symbol_breakdown(&self, trades: &[TradeRecord]) -> Vec<SymbolMetrics> {
        let mut order: Vec<&str> = Vec::new();
        let mut stats: HashMap<&str, (usize, usize, usize, Decimal)> = HashMap::new();

        for trade in trades.iter().filter(|t| t.is_qualifying()) {
            let pnl = trade.pnl.unwrap_or_default();
            let entry = stats.entry(trade.symbol.as_str()).or_insert_with(|| {
                order.push(trade.symbol.as_str());
                (0, 0, 0, Decimal::ZERO)
            });
            entry.0 += 1;
            entry.3 += pnl;
            if pnl > Decimal::ZERO {
                entry.1 += 1;
            } else if pnl < Decimal::ZERO {
                entry.2 += 1;
            }
        }

        let mut rows: Vec<SymbolMetrics> = order
            .into_iter()
            .filter_map(|symbol| stats.get(symbol).map(|s| (symbol, s)))
            .map(|(symbol, &(total, wins, losses, pnl))| SymbolMetrics {
                symbol: symbol.to_string(),
                total_trades: total,
                wins,
                losses,
                win_rate_pct: Decimal::from(wins) / Decimal::from(total) * Decimal::ONE_HUNDRED,
                net_profit: pnl.round_dp(2),
            })
            .collect();

        rows.sort_by(|a, b| b.total_trades.cmp(&a.total_trades));
        rows
    }

    /// Buckets qualifying trades by calendar day (the UTC date of
    /// `created_at`) into `{pnl, count}` accumulators. Both the heatmap and
    /// the calendar view consume this bucketing.
    pub fn daily_buckets(&self, trades: &[TradeRecord]) -> HashMap<NaiveDate, DayBucket> {
        let mut buckets: HashMap<NaiveDate, DayBucket> = HashMap::new();
        for trade in trades.iter().filter(|t| t.is_qualifying()) {
            let bucket = buckets
                .entry(trade.created_at.date_naive())
                .or_insert_with(DayBucket::default);
            bucket.pnl += trade.pnl.unwrap_or_default();
            bucket.count += 1;
        }
        buckets
    }

    /// Builds the annual consistency heatmap for `year`. See
    /// [`HeatmapYear`] for the grid layout and intensity quantization.
    pub fn heatmap_year(&self, trades: &[TradeRecord], year: i32) -> HeatmapYear {
        HeatmapYear::build(&self.daily_buckets(trades), year)
    }

    /// Builds the monthly calendar grid for `year`/`month`, including the
    /// partial boundary weeks, weekly roll-ups and the in-month total.
    pub fn calendar_month(&self, trades: &[TradeRecord], year: i32, month: u32) -> CalendarMonth {
        CalendarMonth::build(&self.daily_buckets(trades), year, month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use core_types::TradeStatus;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn trade(day: u32, pnl: Option<Decimal>) -> TradeRecord {
        trade_full("EURUSD", Direction::Long, TradeStatus::Closed, day, pnl)
    }

    fn trade_full(
        symbol: &str,
        direction: Direction,
        status: TradeStatus,
        day: u32,
        pnl: Option<Decimal>,
    ) -> TradeRecord {
        TradeRecord {
            id: Uuid::new_v4(),
            account_id: Uuid::new_v4(),
            symbol: symbol.to_string(),
            direction,
            status,
            entry_price: dec!(1.10),
            exit_price: Some(dec!(1.12)),
            size: dec!(1),
            pnl,
            notes: None,
            mood: None,
            emotions: vec![],
            created_at: Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn summary_of_win_then_loss() {
        let engine = AnalyticsEngine::new();
        let trades = vec![trade(1, Some(dec!(100))), trade(2, Some(dec!(-40)))];

        let summary = engine.summarize(&trades);

        assert_eq!(summary.total_trades, 2);
        assert_eq!(summary.wins, 1);
        assert_eq!(summary.losses, 1);
        assert_eq!(summary.win_rate_pct, dec!(50));
        assert_eq!(summary.net_profit, dec!(60));
        assert_eq!(summary.profit_factor, Some(dec!(2.5)));
        assert_eq!(summary.max_drawdown, dec!(40));
        assert_eq!(summary.average_win, dec!(100));
        assert_eq!(summary.average_loss, dec!(40));
        assert_eq!(summary.best_trade, dec!(100));
        assert_eq!(summary.worst_trade, dec!(-40));
    }

    #[test]
    fn empty_snapshot_yields_zeroed_summary() {
        let summary = AnalyticsEngine::new().summarize(&[]);
        assert_eq!(summary, MetricsSummary::new());
        assert_eq!(summary.profit_factor, Some(dec!(0)));
    }

    #[test]
    fn breakeven_counts_in_neither_tally() {
        let summary = AnalyticsEngine::new().summarize(&[trade(1, Some(dec!(0)))]);
        assert_eq!(summary.total_trades, 1);
        assert_eq!(summary.wins, 0);
        assert_eq!(summary.losses, 0);
        assert_eq!(summary.net_profit, dec!(0));
        assert_eq!(summary.win_rate_pct, dec!(0));
        assert_eq!(summary.profit_factor, Some(dec!(0)));
    }

    #[test]
    fn open_and_unpriced_trades_never_qualify() {
        let engine = AnalyticsEngine::new();
        let trades = vec![
            trade(1, Some(dec!(50))),
            trade_full("EURUSD", Direction::Long, TradeStatus::Open, 2, Some(dec!(999))),
            trade(3, None),
        ];

        let summary = engine.summarize(&trades);
        assert_eq!(summary.total_trades, 1);
        assert_eq!(summary.net_profit, dec!(50));
    }

    #[test]
    fn profit_factor_is_infinite_with_wins_and_no_losses() {
        let engine = AnalyticsEngine::new();
        let trades = vec![trade(1, Some(dec!(10))), trade(2, Some(dec!(5)))];
        assert_eq!(engine.summarize(&trades).profit_factor, None);
    }

    #[test]
    fn drawdown_is_zero_for_monotone_equity() {
        let engine = AnalyticsEngine::new();
        let trades = vec![
            trade(1, Some(dec!(10))),
            trade(2, Some(dec!(0))),
            trade(3, Some(dec!(25))),
        ];
        assert_eq!(engine.summarize(&trades).max_drawdown, dec!(0));
    }

    #[test]
    fn drawdown_tracks_deficit_from_initial_peak() {
        // Equity never recovers above 0, so the whole decline counts.
        let engine = AnalyticsEngine::new();
        let trades = vec![trade(1, Some(dec!(-30))), trade(2, Some(dec!(-20)))];
        assert_eq!(engine.summarize(&trades).max_drawdown, dec!(50));
    }

    #[test]
    fn wins_by_direction_ignores_losers() {
        let engine = AnalyticsEngine::new();
        let trades = vec![
            trade_full("A", Direction::Long, TradeStatus::Closed, 1, Some(dec!(10))),
            trade_full("A", Direction::Short, TradeStatus::Closed, 2, Some(dec!(5))),
            trade_full("A", Direction::Short, TradeStatus::Closed, 3, Some(dec!(-5))),
        ];

        let summary = engine.summarize(&trades);
        assert_eq!(summary.longs_won, 1);
        assert_eq!(summary.shorts_won, 1);
    }

    #[test]
    fn equity_curve_starts_at_zero_baseline() {
        let engine = AnalyticsEngine::new();
        let trades = vec![trade(2, Some(dec!(-40))), trade(1, Some(dec!(100)))];

        let curve = engine.equity_curve(&trades);

        assert_eq!(curve.len(), 3);
        assert_eq!(curve[0].equity, dec!(0));
        assert_eq!(curve[0].pnl, dec!(0));
        // Baseline shares the date of the first real point.
        assert_eq!(curve[0].date, curve[1].date);
        assert_eq!(curve[1].equity, dec!(100));
        assert_eq!(curve[2].equity, dec!(60));
    }

    #[test]
    fn equity_curve_is_empty_without_qualifying_trades() {
        let engine = AnalyticsEngine::new();
        let trades = vec![trade_full("A", Direction::Long, TradeStatus::Open, 1, None)];
        assert!(engine.equity_curve(&trades).is_empty());
    }

    #[test]
    fn last_equity_point_equals_net_profit() {
        let engine = AnalyticsEngine::new();
        let trades = vec![
            trade(1, Some(dec!(12.50))),
            trade(2, Some(dec!(-3.25))),
            trade(3, Some(dec!(7.00))),
        ];

        let summary = engine.summarize(&trades);
        let curve = engine.equity_curve(&trades);
        assert_eq!(curve.last().unwrap().equity, summary.net_profit);
    }

    #[test]
    fn drawdown_series_emits_non_positive_points() {
        let engine = AnalyticsEngine::new();
        let trades = vec![
            trade(1, Some(dec!(100))),
            trade(2, Some(dec!(-40))),
            trade(3, Some(dec!(60))),
        ];

        let points = engine.drawdown_series(&trades);

        assert_eq!(points.len(), 4);
        assert_eq!(points[0].drawdown, dec!(0));
        assert_eq!(points[1].drawdown, dec!(0));
        assert_eq!(points[2].drawdown, dec!(-40));
        assert_eq!(points[3].drawdown, dec!(0));
        assert!(points.iter().all(|p| p.drawdown <= dec!(0)));
    }

    #[test]
    fn symbol_breakdown_groups_and_sorts_by_count() {
        let engine = AnalyticsEngine::new();
        let trades = vec![
            trade_full("NQ", Direction::Long, TradeStatus::Closed, 1, Some(dec!(20))),
            trade_full("ES", Direction::Long, TradeStatus::Closed, 2, Some(dec!(-10))),
            trade_full("NQ", Direction::Short, TradeStatus::Closed, 3, Some(dec!(-5))),
        ];

        let rows = engine.symbol_breakdown(&trades);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].symbol, "NQ");
        assert_eq!(rows[0].total_trades, 2);
        assert_eq!(rows[0].wins, 1);
        assert_eq!(rows[0].losses, 1);
        assert_eq!(rows[0].win_rate_pct, dec!(50));
        assert_eq!(rows[0].net_profit, dec!(15));
        assert_eq!(rows[1].symbol, "ES");
        assert_eq!(rows[1].net_profit, dec!(-10));
    }

    #[test]
    fn symbol_breakdown_ties_keep_encounter_order() {
        let engine = AnalyticsEngine::new();
        let trades = vec![
            trade_full("GC", Direction::Long, TradeStatus::Closed, 1, Some(dec!(1))),
            trade_full("CL", Direction::Long, TradeStatus::Closed, 2, Some(dec!(1))),
        ];

        let rows = engine.symbol_breakdown(&trades);
        assert_eq!(rows[0].symbol, "GC");
        assert_eq!(rows[1].symbol, "CL");
    }

    #[test]
    fn symbol_net_profits_sum_to_overall_net_profit() {
        let engine = AnalyticsEngine::new();
        let trades = vec![
            trade_full("NQ", Direction::Long, TradeStatus::Closed, 1, Some(dec!(20))),
            trade_full("ES", Direction::Long, TradeStatus::Closed, 2, Some(dec!(-10))),
            trade_full("GC", Direction::Short, TradeStatus::Closed, 3, Some(dec!(2.50))),
        ];

        let total: Decimal = engine
            .symbol_breakdown(&trades)
            .iter()
            .map(|r| r.net_profit)
            .sum();
        assert_eq!(total, engine.summarize(&trades).net_profit);
    }

    #[test]
    fn same_day_trades_share_a_bucket() {
        let engine = AnalyticsEngine::new();
        let trades = vec![
            trade(5, Some(dec!(10))),
            trade(5, Some(dec!(-5))),
            trade(5, Some(dec!(20))),
        ];

        let buckets = engine.daily_buckets(&trades);
        let day = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();

        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[&day].count, 3);
        assert_eq!(buckets[&day].pnl, dec!(25));
    }
}
