//! PostgreSQL-backed `LikeLedger` implementation — the like engine core.
//!
//! Dedup safety is layered, all inside one transaction per call:
//!
//! 1. a transaction-scoped advisory lock keyed on the (quote, client) pair
//!    serialises racing likes even when no ledger row exists yet — row
//!    locks alone cannot lock the *absence* of a row, so two transactions
//!    could otherwise both pass the existence check and both increment;
//! 2. a `SELECT ... FOR UPDATE` on any existing ledger row makes the
//!    duplicate check block behind an in-flight like for the same pair;
//! 3. the counter increment fails the whole unit when the quote vanished;
//! 4. the insert carries `ON CONFLICT DO NOTHING` as the final backstop:
//!    zero inserted rows means another writer won, and the transaction
//!    aborts so the increment rolls back and counter and ledger stay in
//!    agreement.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::sql_types::Integer;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use sha2::{Digest, Sha256};
use tracing::debug;
use uuid::Uuid;

use crate::domain::ClientIdentity;
use crate::domain::ports::{LikeLedger, LikeLedgerError};

use super::models::NewLikeRow;
use super::pool::{DbPool, PoolError};
use super::schema::{likes, quotes};

/// Diesel-backed implementation of the `LikeLedger` port.
#[derive(Clone)]
pub struct DieselLikeLedger {
    pool: DbPool,
}

impl DieselLikeLedger {
    /// Create a new ledger adapter with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Derive a stable 32-bit advisory lock key from an opaque token.
///
/// `pg_advisory_xact_lock(int, int)` takes two keys; quote id and client
/// identity each contribute one, hashed so arbitrary-length tokens fit the
/// key space. Collisions only cost spurious serialisation, never missed
/// exclusion.
fn advisory_key(token: &str) -> i32 {
    let digest = Sha256::digest(token.as_bytes());
    i32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]])
}

/// Map pool errors to the port's error variants.
fn map_pool_error(error: PoolError) -> LikeLedgerError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            LikeLedgerError::connection(message)
        }
    }
}

/// Map Diesel errors to the port's error variants.
///
/// A unique violation on the ledger means a concurrent like for the same
/// pair slipped past the advisory lock, which reads as a duplicate to the
/// caller.
fn map_diesel_error(error: diesel::result::Error) -> LikeLedgerError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            LikeLedgerError::AlreadyLiked
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
            LikeLedgerError::connection(info.message().to_owned())
        }
        DieselError::DatabaseError(_, info) => LikeLedgerError::query(info.message().to_owned()),
        other => LikeLedgerError::query(other.to_string()),
    }
}

// Lets `?` abort the transaction closure with a mapped port error while
// diesel-async rolls the unit back.
impl From<diesel::result::Error> for LikeLedgerError {
    fn from(error: diesel::result::Error) -> Self {
        map_diesel_error(error)
    }
}

#[async_trait]
impl LikeLedger for DieselLikeLedger {
    async fn like(&self, quote_id: Uuid, client: &ClientIdentity) -> Result<(), LikeLedgerError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let ip = client.ip().to_owned();
        let user_agent = client.user_agent().map(str::to_owned);
        let quote_key = advisory_key(&quote_id.to_string());
        let client_key = advisory_key(&ip);

        conn.transaction::<(), LikeLedgerError, _>(|conn| {
            async move {
                // Serialise racing likes for this pair before the existence
                // check; released automatically at commit or rollback.
                diesel::sql_query("SELECT pg_advisory_xact_lock($1, $2)")
                    .bind::<Integer, _>(quote_key)
                    .bind::<Integer, _>(client_key)
                    .execute(conn)
                    .await?;

                let existing: Option<Uuid> = likes::table
                    .filter(likes::quote_id.eq(quote_id).and(likes::user_ip.eq(&ip)))
                    .select(likes::id)
                    .for_update()
                    .first(conn)
                    .await
                    .optional()?;

                if existing.is_some() {
                    return Err(LikeLedgerError::AlreadyLiked);
                }

                let updated = diesel::update(quotes::table.find(quote_id))
                    .set((
                        quotes::likes_count.eq(quotes::likes_count + 1),
                        quotes::updated_at.eq(Utc::now()),
                    ))
                    .execute(conn)
                    .await?;

                if updated == 0 {
                    return Err(LikeLedgerError::QuoteNotFound);
                }

                let new_row = NewLikeRow {
                    id: Uuid::new_v4(),
                    quote_id,
                    user_ip: &ip,
                    user_agent: user_agent.as_deref(),
                    created_at: Utc::now(),
                };

                let inserted = diesel::insert_into(likes::table)
                    .values(&new_row)
                    .on_conflict((likes::quote_id, likes::user_ip))
                    .do_nothing()
                    .execute(conn)
                    .await?;

                // A racer won despite the lock; abort so the increment above
                // rolls back and the counter keeps agreeing with the ledger.
                if inserted == 0 {
                    return Err(LikeLedgerError::AlreadyLiked);
                }

                Ok(())
            }
            .scope_boxed()
        })
        .await
    }

    async fn is_liked(&self, quote_id: Uuid, ip: &str) -> Result<bool, LikeLedgerError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::select(diesel::dsl::exists(
            likes::table.filter(likes::quote_id.eq(quote_id).and(likes::user_ip.eq(ip))),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_diesel_error)
    }

    async fn reset_all(&self) -> Result<(), LikeLedgerError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction::<(), LikeLedgerError, _>(|conn| {
            async move {
                diesel::update(quotes::table)
                    .set((
                        quotes::likes_count.eq(0),
                        quotes::updated_at.eq(Utc::now()),
                    ))
                    .execute(conn)
                    .await?;

                diesel::delete(likes::table).execute(conn).await?;

                Ok(())
            }
            .scope_boxed()
        })
        .await
    }
}
