use crate::error::DbError;
use chrono::{DateTime, Utc};
use core_types::{Account, Direction, TradeRecord, TradeStatus};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::FromRow;
use sqlx::postgres::PgPool;
use uuid::Uuid;

/// The `DbRepository` provides a high-level, application-specific interface
/// to the database. It encapsulates all SQL queries and data access logic.
#[derive(Debug, Clone)]
pub struct DbRepository {
    pool: PgPool,
}

/// Optional narrowing of the trade snapshot handed to the analytics engine.
/// All bounds are inclusive.
#[derive(Debug, Clone, Copy, Default)]
pub struct TradeFilter {
    pub account_id: Option<Uuid>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

/// Payload for creating or fully updating a trade.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTrade {
    pub account_id: Uuid,
    pub symbol: String,
    pub direction: Direction,
    pub status: TradeStatus,
    pub entry_price: Decimal,
    pub exit_price: Option<Decimal>,
    pub size: Decimal,
    pub pnl: Option<Decimal>,
    pub notes: Option<String>,
    pub mood: Option<String>,
    #[serde(default)]
    pub emotions: Vec<String>,
}

/// Payload for creating or updating an account.
#[derive(Debug, Clone, Deserialize)]
pub struct NewAccount {
    pub name: String,
    pub broker: Option<String>,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub is_default: bool,
}

fn default_currency() -> String {
    "USD".to_string()
}

/// Database row for the trades table. Direction and status live as TEXT and
/// are converted into the core enums on the way out.
#[derive(Debug, Clone, FromRow)]
struct DbTrade {
    id: Uuid,
    account_id: Uuid,
    symbol: String,
    direction: String,
    status: String,
    entry_price: Decimal,
    exit_price: Option<Decimal>,
    size: Decimal,
    pnl: Option<Decimal>,
    notes: Option<String>,
    mood: Option<String>,
    emotions: Vec<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<DbTrade> for TradeRecord {
    type Error = DbError;

    fn try_from(row: DbTrade) -> Result<Self, Self::Error> {
        Ok(TradeRecord {
            id: row.id,
            account_id: row.account_id,
            symbol: row.symbol,
            direction: row.direction.parse()?,
            status: row.status.parse()?,
            entry_price: row.entry_price,
            exit_price: row.exit_price,
            size: row.size,
            pnl: row.pnl,
            notes: row.notes,
            mood: row.mood,
            emotions: row.emotions,
            created_at: row.created_at,
        })
    }
}

/// Database row for the accounts table.
#[derive(Debug, Clone, FromRow)]
struct DbAccount {
    id: Uuid,
    name: String,
    broker: Option<String>,
    currency: String,
    is_default: bool,
    created_at: DateTime<Utc>,
}

impl From<DbAccount> for Account {
    fn from(row: DbAccount) -> Self {
        Account {
            id: row.id,
            name: row.name,
            broker: row.broker,
            currency: row.currency,
            is_default: row.is_default,
            created_at: row.created_at,
        }
    }
}

const TRADE_COLUMNS: &str = "id, account_id, symbol, direction, status, entry_price, exit_price, \
                             size, pnl, notes, mood, emotions, created_at";

impl DbRepository {
    /// Creates a new `DbRepository` with a shared database connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---------------------------------------------------------------------
    // Trades
    // ---------------------------------------------------------------------

    /// Fetches the trade snapshot for the analytics engine: optionally
    /// narrowed by account and date range, always ordered ascending by
    /// `created_at` so ties keep insertion order.
    pub async fn list_trades(&self, filter: TradeFilter) -> Result<Vec<TradeRecord>, DbError> {
        let sql = format!(
            "SELECT {TRADE_COLUMNS} FROM trades \
             WHERE ($1::uuid IS NULL OR account_id = $1) \
               AND ($2::timestamptz IS NULL OR created_at >= $2) \
               AND ($3::timestamptz IS NULL OR created_at <= $3) \
             ORDER BY created_at ASC, id ASC"
        );
        let rows: Vec<DbTrade> = sqlx::query_as(&sql)
            .bind(filter.account_id)
            .bind(filter.from)
            .bind(filter.to)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(TradeRecord::try_from).collect()
    }

    /// Inserts a new trade. The symbol is normalized to uppercase here so
    /// every downstream consumer sees canonical identifiers.
    pub async fn create_trade(&self, input: NewTrade) -> Result<TradeRecord, DbError> {
        let sql = format!(
            "INSERT INTO trades (account_id, symbol, direction, status, entry_price, exit_price, \
                                 size, pnl, notes, mood, emotions) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             RETURNING {TRADE_COLUMNS}"
        );
        let row: DbTrade = sqlx::query_as(&sql)
            .bind(input.account_id)
            .bind(input.symbol.to_uppercase())
            .bind(input.direction.to_string())
            .bind(input.status.to_string())
            .bind(input.entry_price)
            .bind(input.exit_price)
            .bind(input.size)
            .bind(input.pnl)
            .bind(input.notes)
            .bind(input.mood)
            .bind(input.emotions)
            .fetch_one(&self.pool)
            .await?;

        row.try_into()
    }

    /// Replaces an existing trade's fields.
    pub async fn update_trade(&self, id: Uuid, input: NewTrade) -> Result<TradeRecord, DbError> {
        let sql = format!(
            "UPDATE trades SET account_id = $2, symbol = $3, direction = $4, status = $5, \
                               entry_price = $6, exit_price = $7, size = $8, pnl = $9, \
                               notes = $10, mood = $11, emotions = $12 \
             WHERE id = $1 \
             RETURNING {TRADE_COLUMNS}"
        );
        let row: Option<DbTrade> = sqlx::query_as(&sql)
            .bind(id)
            .bind(input.account_id)
            .bind(input.symbol.to_uppercase())
            .bind(input.direction.to_string())
            .bind(input.status.to_string())
            .bind(input.entry_price)
            .bind(input.exit_price)
            .bind(input.size)
            .bind(input.pnl)
            .bind(input.notes)
            .bind(input.mood)
            .bind(input.emotions)
            .fetch_optional(&self.pool)
            .await?;

        row.ok_or(DbError::NotFound)?.try_into()
    }

    /// Deletes a trade by id.
    pub async fn delete_trade(&self, id: Uuid) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM trades WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Accounts
    // ---------------------------------------------------------------------

    /// Fetches all accounts, oldest first.
    pub async fn list_accounts(&self) -> Result<Vec<Account>, DbError> {
        let rows: Vec<DbAccount> = sqlx::query_as(
            "SELECT id, name, broker, currency, is_default, created_at \
             FROM accounts ORDER BY created_at ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Account::from).collect())
    }

    /// Creates an account. When the new account is flagged as the default,
    /// the previous default is cleared in the same transaction.
    pub async fn create_account(&self, input: NewAccount) -> Result<Account, DbError> {
        let mut tx = self.pool.begin().await?;

        if input.is_default {
            sqlx::query("UPDATE accounts SET is_default = FALSE WHERE is_default")
                .execute(&mut *tx)
                .await?;
        }

        let row: DbAccount = sqlx::query_as(
            "INSERT INTO accounts (name, broker, currency, is_default) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, name, broker, currency, is_default, created_at",
        )
        .bind(input.name)
        .bind(input.broker)
        .bind(input.currency)
        .bind(input.is_default)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(row.into())
    }

    /// Updates an account's descriptive fields. The default flag is managed
    /// separately through `set_default_account`.
    pub async fn update_account(&self, id: Uuid, input: NewAccount) -> Result<Account, DbError> {
        let row: Option<DbAccount> = sqlx::query_as(
            "UPDATE accounts SET name = $2, broker = $3, currency = $4 \
             WHERE id = $1 \
             RETURNING id, name, broker, currency, is_default, created_at",
        )
        .bind(id)
        .bind(input.name)
        .bind(input.broker)
        .bind(input.currency)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Account::from).ok_or(DbError::NotFound)
    }

    /// Makes `id` the single default account, transactionally.
    pub async fn set_default_account(&self, id: Uuid) -> Result<Account, DbError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE accounts SET is_default = FALSE WHERE is_default")
            .execute(&mut *tx)
            .await?;

        let row: Option<DbAccount> = sqlx::query_as(
            "UPDATE accounts SET is_default = TRUE \
             WHERE id = $1 \
             RETURNING id, name, broker, currency, is_default, created_at",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let account = row.ok_or(DbError::NotFound)?;
        tx.commit().await?;
        Ok(account.into())
    }

    /// Deletes an account and, via the schema's cascade, its trades.
    pub async fn delete_account(&self, id: Uuid) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }
        Ok(())
    }
}
