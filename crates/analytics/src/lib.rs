//! # Trade Analytics Engine
//!
//! This crate derives every performance view of the journal from a snapshot
//! of trade records. It is the single shared home of the equity/drawdown
//! reduction that the presentation surfaces consume.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** A pure logic crate with no knowledge of external
//!   systems. It depends only on `core-types` (Layer 0).
//! - **Stateless Calculation:** The `AnalyticsEngine` holds no state. Every
//!   method is a deterministic, side-effect-free reduction over the list it
//!   is handed, so it can be invoked once per chart on the same snapshot.
//! - **Total Functions:** Degenerate input (an empty list, all-open trades)
//!   produces a zero-shaped result, never an error. There is no error type
//!   in this crate.
//!
//! ## Public API
//!
//! - `AnalyticsEngine`: the stateless calculator.
//! - `MetricsSummary`, `EquityPoint`, `DrawdownPoint`, `SymbolMetrics`:
//!   summary and time-series value objects.
//! - `DayBucket`, `HeatmapYear`, `CalendarMonth`: calendar-bucketed views.

pub mod calendar;
pub mod engine;
pub mod report;

// Re-export the key components to create a clean, public-facing API.
pub use calendar::{
    CalendarDay, CalendarMonth, CalendarWeek, DayBucket, HeatmapCell, HeatmapYear, PnlTone,
};
pub use engine::AnalyticsEngine;
pub use report::{DrawdownPoint, EquityPoint, MetricsSummary, SymbolMetrics};
