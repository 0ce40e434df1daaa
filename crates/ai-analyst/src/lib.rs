//! # AI Analyst Client
//!
//! The journal's boundary to the AI narrative service: it renders a
//! delimited export of recent trade history, sends it to a generate-content
//! API with a coaching prompt, and parses the structured review the model
//! returns. The service's output is opaque text; any parse failure is a
//! reportable error, never a panic.

use async_trait::async_trait;
use core_types::TradeRecord;

pub mod error;
pub mod export;
pub mod gemini;
pub mod responses;

// --- Public API ---
pub use error::AnalystError;
pub use export::render_trade_history;
pub use gemini::GeminiClient;
pub use responses::AnalystReview;

/// The abstract interface to the coaching-summary service. The web layer
/// talks to this trait, allowing the concrete provider (or a mock) to be
/// swapped out.
#[async_trait]
pub trait AnalystClient: Send + Sync {
    /// Produces a structured coaching review of the given trade history.
    async fn review(&self, trades: &[TradeRecord]) -> Result<AnalystReview, AnalystError>;
}
