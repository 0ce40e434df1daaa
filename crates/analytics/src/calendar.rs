use chrono::{Datelike, Days, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Accumulator for one calendar day of qualifying trades.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DayBucket {
    pub pnl: Decimal,
    pub count: usize,
}

/// Color family of a heatmap cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PnlTone {
    Gain,
    Loss,
    Flat,
}

/// One day cell of the annual heatmap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapCell {
    pub date: NaiveDate,
    pub pnl: Decimal,
    pub count: usize,
    pub tone: PnlTone,
    /// Intensity bin: 0 for a flat day, otherwise
    /// `min(ceil(|pnl| / max_abs_pnl * 4), 4)`.
    pub level: u8,
}

/// The annual consistency heatmap: week columns of up to 7 day cells,
/// starting on the Sunday on or before January 1st and ending on
/// December 31st (the last column may be partial).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapYear {
    pub year: i32,
    pub max_abs_pnl: Decimal,
    pub weeks: Vec<Vec<HeatmapCell>>,
}

impl HeatmapYear {
    pub(crate) fn build(buckets: &HashMap<NaiveDate, DayBucket>, year: i32) -> Self {
        let empty = Self {
            year,
            max_abs_pnl: Decimal::ZERO,
            weeks: Vec::new(),
        };
        let (Some(jan_first), Some(dec_last)) = (
            NaiveDate::from_ymd_opt(year, 1, 1),
            NaiveDate::from_ymd_opt(year, 12, 31),
        ) else {
            return empty;
        };

        let start = week_start_sunday(jan_first);
        let days: Vec<(NaiveDate, DayBucket)> = start
            .iter_days()
            .take_while(|d| *d <= dec_last)
            .map(|d| (d, buckets.get(&d).cloned().unwrap_or_default()))
            .collect();

        let max_abs_pnl = days
            .iter()
            .map(|(_, b)| b.pnl.abs())
            .max()
            .unwrap_or(Decimal::ZERO);

        let weeks = days
            .chunks(7)
            .map(|week| {
                week.iter()
                    .map(|(date, bucket)| HeatmapCell {
                        date: *date,
                        pnl: bucket.pnl,
                        count: bucket.count,
                        tone: tone_of(bucket.pnl),
                        level: intensity(bucket.pnl, max_abs_pnl),
                    })
                    .collect()
            })
            .collect();

        Self {
            year,
            max_abs_pnl,
            weeks,
        }
    }
}

/// One day cell of the monthly calendar grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub pnl: Decimal,
    pub count: usize,
    /// False for the boundary days that pad the grid out to full weeks.
    pub in_month: bool,
}

/// One Sunday-to-Saturday row of the calendar with its roll-up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarWeek {
    pub days: Vec<CalendarDay>,
    pub pnl: Decimal,
    pub count: usize,
}

/// The monthly calendar view: full weeks covering the month, weekly
/// roll-ups, and a month total restricted to in-month days (boundary days
/// stay visible in the grid but do not enter the total).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarMonth {
    pub year: i32,
    pub month: u32,
    pub weeks: Vec<CalendarWeek>,
    pub month_pnl: Decimal,
}

impl CalendarMonth {
    pub(crate) fn build(buckets: &HashMap<NaiveDate, DayBucket>, year: i32, month: u32) -> Self {
        let empty = Self {
            year,
            month,
            weeks: Vec::new(),
            month_pnl: Decimal::ZERO,
        };
        let Some(month_start) = NaiveDate::from_ymd_opt(year, month, 1) else {
            return empty;
        };
        let Some(month_end) = end_of_month(month_start) else {
            return empty;
        };

        let grid_start = week_start_sunday(month_start);
        let grid_end = week_start_sunday(month_end) + Days::new(6);

        let mut month_pnl = Decimal::ZERO;
        let days: Vec<CalendarDay> = grid_start
            .iter_days()
            .take_while(|d| *d <= grid_end)
            .map(|date| {
                let bucket = buckets.get(&date).cloned().unwrap_or_default();
                let in_month = date.year() == year && date.month() == month;
                if in_month {
                    month_pnl += bucket.pnl;
                }
                CalendarDay {
                    date,
                    pnl: bucket.pnl,
                    count: bucket.count,
                    in_month,
                }
            })
            .collect();

        let weeks = days
            .chunks(7)
            .map(|week| CalendarWeek {
                pnl: week.iter().map(|d| d.pnl).sum(),
                count: week.iter().map(|d| d.count).sum(),
                days: week.to_vec(),
            })
            .collect();

        Self {
            year,
            month,
            weeks,
            month_pnl,
        }
    }
}

/// The Sunday on or before `date`.
fn week_start_sunday(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.weekday().num_days_from_sunday()))
}

fn end_of_month(month_start: NaiveDate) -> Option<NaiveDate> {
    let (year, month) = (month_start.year(), month_start.month());
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    next.and_then(|d| d.pred_opt())
}

fn tone_of(pnl: Decimal) -> PnlTone {
    if pnl > Decimal::ZERO {
        PnlTone::Gain
    } else if pnl < Decimal::ZERO {
        PnlTone::Loss
    } else {
        PnlTone::Flat
    }
}

/// Quantizes a day's PnL magnitude into the 0..=4 intensity bins relative
/// to the largest magnitude on the grid.
fn intensity(pnl: Decimal, max_abs_pnl: Decimal) -> u8 {
    if pnl.is_zero() || max_abs_pnl <= Decimal::ZERO {
        return 0;
    }
    let scaled = (pnl.abs() * Decimal::from(4) / max_abs_pnl).ceil();
    scaled.to_u32().unwrap_or(4).clamp(1, 4) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;
    use rust_decimal_macros::dec;

    fn buckets(entries: &[(i32, u32, u32, Decimal, usize)]) -> HashMap<NaiveDate, DayBucket> {
        entries
            .iter()
            .map(|&(y, m, d, pnl, count)| {
                (
                    NaiveDate::from_ymd_opt(y, m, d).unwrap(),
                    DayBucket { pnl, count },
                )
            })
            .collect()
    }

    #[test]
    fn heatmap_grid_starts_on_a_sunday_and_ends_december_31() {
        let view = HeatmapYear::build(&HashMap::new(), 2024);

        let first = view.weeks[0][0].date;
        assert_eq!(first.weekday(), Weekday::Sun);
        assert!(first <= NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());

        let last_week = view.weeks.last().unwrap();
        assert_eq!(
            last_week.last().unwrap().date,
            NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()
        );
        // 2024 opens on a Monday: one leading cell from 2023, 53 columns.
        assert_eq!(view.weeks.len(), 53);
        assert!(view.weeks.iter().all(|w| w.len() <= 7));
    }

    #[test]
    fn heatmap_levels_quantize_against_the_largest_day() {
        let data = buckets(&[
            (2024, 6, 3, dec!(100), 2),
            (2024, 6, 4, dec!(-10), 1),
            (2024, 6, 5, dec!(0), 1),
        ]);

        let view = HeatmapYear::build(&data, 2024);
        assert_eq!(view.max_abs_pnl, dec!(100));

        let cell = |day: u32| {
            view.weeks
                .iter()
                .flatten()
                .find(|c| c.date == NaiveDate::from_ymd_opt(2024, 6, day).unwrap())
                .unwrap()
                .clone()
        };

        let top = cell(3);
        assert_eq!(top.tone, PnlTone::Gain);
        assert_eq!(top.level, 4);

        let small_loss = cell(4);
        assert_eq!(small_loss.tone, PnlTone::Loss);
        assert_eq!(small_loss.level, 1);

        let flat = cell(5);
        assert_eq!(flat.tone, PnlTone::Flat);
        assert_eq!(flat.level, 0);

        // Untraded days are flat level 0.
        assert_eq!(cell(6).level, 0);
    }

    #[test]
    fn heatmap_with_no_trades_is_all_flat() {
        let view = HeatmapYear::build(&HashMap::new(), 2024);
        assert_eq!(view.max_abs_pnl, dec!(0));
        assert!(view.weeks.iter().flatten().all(|c| c.level == 0));
    }

    #[test]
    fn calendar_pads_to_full_weeks() {
        let view = CalendarMonth::build(&HashMap::new(), 2024, 3);

        // March 2024 spans Feb 25 (Sunday) through Apr 6 (Saturday).
        assert_eq!(view.weeks.len(), 6);
        assert!(view.weeks.iter().all(|w| w.days.len() == 7));
        assert_eq!(
            view.weeks[0].days[0].date,
            NaiveDate::from_ymd_opt(2024, 2, 25).unwrap()
        );
        assert_eq!(
            view.weeks[5].days[6].date,
            NaiveDate::from_ymd_opt(2024, 4, 6).unwrap()
        );
        assert!(!view.weeks[0].days[0].in_month);
        assert!(view.weeks[0].days[5].in_month); // March 1st
    }

    #[test]
    fn month_total_excludes_boundary_days_but_weeks_include_them() {
        let data = buckets(&[
            (2024, 2, 26, dec!(80), 1),  // boundary day in the March grid
            (2024, 3, 5, dec!(25), 2),
            (2024, 3, 28, dec!(-10), 1),
        ]);

        let view = CalendarMonth::build(&data, 2024, 3);

        assert_eq!(view.month_pnl, dec!(15));
        // First row still rolls up the February boundary day.
        assert_eq!(view.weeks[0].pnl, dec!(80));
        assert_eq!(view.weeks[0].count, 1);
        assert_eq!(view.weeks[1].pnl, dec!(25));
        assert_eq!(view.weeks[1].count, 2);
    }

    #[test]
    fn december_grid_handles_the_year_rollover() {
        let data = buckets(&[(2025, 1, 2, dec!(40), 1)]);
        let view = CalendarMonth::build(&data, 2024, 12);

        // Dec 2024 ends mid-week; January boundary days are shown but
        // excluded from the total.
        assert_eq!(view.month_pnl, dec!(0));
        let last_week = view.weeks.last().unwrap();
        assert_eq!(last_week.pnl, dec!(40));
        assert!(last_week.days.iter().any(|d| !d.in_month));
    }
}
