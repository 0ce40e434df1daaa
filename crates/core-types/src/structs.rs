use crate::enums::{Direction, TradeStatus};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single journaled trade, as handed to the analytics engine.
///
/// Records are immutable snapshots from the engine's perspective: they are
/// created, edited and deleted by the surrounding infrastructure, and every
/// derived view is a new value object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub id: Uuid,
    pub account_id: Uuid,
    /// Instrument identifier, uppercased at entry.
    pub symbol: String,
    pub direction: Direction,
    pub status: TradeStatus,
    pub entry_price: Decimal,
    pub exit_price: Option<Decimal>,
    pub size: Decimal,
    /// Realized profit/loss. `Some(0)` is a breakeven trade; `None` means
    /// the result has not been computed yet.
    pub pnl: Option<Decimal>,
    pub notes: Option<String>,
    pub mood: Option<String>,
    pub emotions: Vec<String>,
    /// Trade date and the sole ordering key for time-series derivations.
    pub created_at: DateTime<Utc>,
}

impl TradeRecord {
    /// A trade contributes to performance statistics iff it is closed and
    /// its PnL has been recorded.
    pub fn is_qualifying(&self) -> bool {
        self.status == TradeStatus::Closed && self.pnl.is_some()
    }
}

/// A brokerage account grouping trades in the journal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    pub broker: Option<String>,
    pub currency: String,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
}
