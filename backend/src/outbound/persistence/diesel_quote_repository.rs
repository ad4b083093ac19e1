//! PostgreSQL-backed `QuoteRepository` implementation using Diesel ORM.
//!
//! A thin adapter: it translates between Diesel rows and domain quotes and
//! maps database failures into the port's error variants. No business logic
//! lives here, and the ledger is never touched — counter mutations belong to
//! the like engine adapter.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;
use uuid::Uuid;

use crate::domain::Quote;
use crate::domain::ports::{ListWindow, QuoteRepository, QuoteRepositoryError};

use super::models::{NewQuoteRow, QuoteChanges, QuoteRow};
use super::pool::{DbPool, PoolError};
use super::schema::quotes;

diesel::define_sql_function! {
    /// SQL `RANDOM()`, used for uniform random row selection.
    fn random() -> Double
}

/// Diesel-backed implementation of the `QuoteRepository` port.
#[derive(Clone)]
pub struct DieselQuoteRepository {
    pool: DbPool,
}

impl DieselQuoteRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to the port's error variants.
fn map_pool_error(error: PoolError) -> QuoteRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            QuoteRepositoryError::connection(message)
        }
    }
}

/// Map Diesel errors to the port's error variants.
fn map_diesel_error(error: diesel::result::Error) -> QuoteRepositoryError {
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
        DieselError::NotFound => QuoteRepositoryError::NotFound,
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
            QuoteRepositoryError::connection(info.message().to_owned())
        }
        DieselError::DatabaseError(_, info) => QuoteRepositoryError::query(info.message().to_owned()),
        other => QuoteRepositoryError::query(other.to_string()),
    }
}

#[async_trait]
impl QuoteRepository for DieselQuoteRepository {
    async fn get_random(&self) -> Result<Quote, QuoteRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<QuoteRow> = quotes::table
            .order(random())
            .select(QuoteRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(Quote::from).ok_or(QuoteRepositoryError::NotFound)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Quote, QuoteRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<QuoteRow> = quotes::table
            .find(id)
            .select(QuoteRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(Quote::from).ok_or(QuoteRepositoryError::NotFound)
    }

    async fn list(&self, window: &ListWindow) -> Result<(Vec<Quote>, i64), QuoteRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let (rows, total): (Vec<QuoteRow>, i64) = match &window.search {
            Some(term) => {
                let pattern = format!("%{term}%");
                let matches = quotes::text
                    .ilike(pattern.clone())
                    .or(quotes::author.ilike(pattern));

                let total = quotes::table
                    .filter(matches.clone())
                    .count()
                    .get_result(&mut conn)
                    .await
                    .map_err(map_diesel_error)?;

                let rows = quotes::table
                    .filter(matches)
                    .order(quotes::created_at.desc())
                    .limit(window.limit)
                    .offset(window.offset)
                    .select(QuoteRow::as_select())
                    .load(&mut conn)
                    .await
                    .map_err(map_diesel_error)?;

                (rows, total)
            }
            None => {
                let total = quotes::table
                    .count()
                    .get_result(&mut conn)
                    .await
                    .map_err(map_diesel_error)?;

                let rows = quotes::table
                    .order(quotes::created_at.desc())
                    .limit(window.limit)
                    .offset(window.offset)
                    .select(QuoteRow::as_select())
                    .load(&mut conn)
                    .await
                    .map_err(map_diesel_error)?;

                (rows, total)
            }
        };

        Ok((rows.into_iter().map(Quote::from).collect(), total))
    }

    async fn create(&self, quote: &Quote) -> Result<(), QuoteRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::insert_into(quotes::table)
            .values(NewQuoteRow::from_domain(quote))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn update(
        &self,
        id: Uuid,
        text: &str,
        author: &str,
    ) -> Result<Quote, QuoteRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let changes = QuoteChanges {
            text,
            author,
            updated_at: Utc::now(),
        };

        let row: Option<QuoteRow> = diesel::update(quotes::table.find(id))
            .set(changes)
            .returning(QuoteRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(Quote::from).ok_or(QuoteRepositoryError::NotFound)
    }

    async fn delete(&self, id: Uuid) -> Result<(), QuoteRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(quotes::table.find(id))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        if deleted == 0 {
            return Err(QuoteRepositoryError::NotFound);
        }
        Ok(())
    }

    async fn top_since(&self, cutoff: DateTime<Utc>) -> Result<Quote, QuoteRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<QuoteRow> = quotes::table
            .filter(quotes::created_at.ge(cutoff))
            .order((quotes::likes_count.desc(), quotes::created_at.desc()))
            .select(QuoteRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(Quote::from).ok_or(QuoteRepositoryError::NotFound)
    }

    async fn top_all_time(&self) -> Result<Quote, QuoteRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<QuoteRow> = quotes::table
            .order((quotes::likes_count.desc(), quotes::created_at.desc()))
            .select(QuoteRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(Quote::from).ok_or(QuoteRepositoryError::NotFound)
    }
}
