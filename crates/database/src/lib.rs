//! # Journal Database Crate
//!
//! A high-level, application-specific interface to the PostgreSQL database.
//! This crate is the journal's record source: the analytics engine never
//! talks to it directly, it only consumes the already-materialized trade
//! snapshots the repository returns.
//!
//! ## Architectural Principles
//!
//! - **Adapter Layer:** Encapsulates all SQL and row-mapping details behind
//!   a clean API; callers see `core-types` values, never database rows.
//! - **Asynchronous & Pooled:** All operations run on a shared `PgPool`.
//!
//! ## Public API
//!
//! - `connect`: establishes the connection pool from `DATABASE_URL`.
//! - `run_migrations`: applies the embedded schema migrations.
//! - `DbRepository`: account and trade data access, including the filtered
//!   snapshot query the analytics endpoints use.
//! - `DbError`: the crate's error type.

pub mod connection;
pub mod error;
pub mod repository;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{connect, run_migrations};
pub use error::DbError;
pub use repository::{DbRepository, NewAccount, NewTrade, TradeFilter};
