//! Domain ports defining the edges of the hexagon.
//!
//! Ports describe how the domain expects to interact with driven adapters.
//! Each trait exposes strongly typed errors so adapters map their failures
//! into predictable variants instead of returning `anyhow::Result`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use super::quote::{ClientIdentity, Quote};

/// Window selecting one page of quotes, already normalised by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListWindow {
    /// Maximum number of rows to return.
    pub limit: i64,
    /// Number of rows to skip, derived from the page number.
    pub offset: i64,
    /// Case-insensitive substring matched against text and author.
    pub search: Option<String>,
}

/// Errors surfaced by the quote persistence adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuoteRepositoryError {
    /// No quote matched the lookup.
    #[error("quote not found")]
    NotFound,
    /// Database connectivity or pool checkout failures.
    #[error("quote store connection failed: {message}")]
    Connection {
        /// Adapter-provided failure detail.
        message: String,
    },
    /// Catch-all for query failures that bubble up from the adapter.
    #[error("quote store query failed: {message}")]
    Query {
        /// Adapter-provided failure detail.
        message: String,
    },
}

impl QuoteRepositoryError {
    /// Helper for connection related adapter errors.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for query failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Durable store of quote records.
///
/// Owns the `quotes` table. The like engine mutates `likes_count` through
/// its own transactional port; this repository never touches the ledger.
#[async_trait]
pub trait QuoteRepository: Send + Sync {
    /// Fetch one quote chosen uniformly at random.
    async fn get_random(&self) -> Result<Quote, QuoteRepositoryError>;

    /// Fetch a quote by identifier.
    async fn get_by_id(&self, id: Uuid) -> Result<Quote, QuoteRepositoryError>;

    /// Fetch one page ordered by creation time, newest first, with the total
    /// matching count.
    async fn list(&self, window: &ListWindow) -> Result<(Vec<Quote>, i64), QuoteRepositoryError>;

    /// Persist a freshly created quote.
    async fn create(&self, quote: &Quote) -> Result<(), QuoteRepositoryError>;

    /// Replace text and author, refreshing `updated_at`, and return the
    /// stored row.
    async fn update(
        &self,
        id: Uuid,
        text: &str,
        author: &str,
    ) -> Result<Quote, QuoteRepositoryError>;

    /// Remove a quote; the store cascades removal of its ledger rows.
    async fn delete(&self, id: Uuid) -> Result<(), QuoteRepositoryError>;

    /// Highest counter among quotes created at or after `cutoff`, ties broken
    /// by newest creation time.
    async fn top_since(&self, cutoff: DateTime<Utc>) -> Result<Quote, QuoteRepositoryError>;

    /// Highest counter over all quotes, same tie-break.
    async fn top_all_time(&self) -> Result<Quote, QuoteRepositoryError>;
}

/// Errors surfaced by the engagement ledger adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LikeLedgerError {
    /// The liked quote does not exist.
    #[error("quote not found")]
    QuoteNotFound,
    /// A ledger row already exists for this (quote, client) pair.
    #[error("you have already liked this quote")]
    AlreadyLiked,
    /// Database connectivity or pool checkout failures.
    #[error("like ledger connection failed: {message}")]
    Connection {
        /// Adapter-provided failure detail.
        message: String,
    },
    /// Catch-all for failures that abort the unit of work.
    #[error("like ledger operation failed: {message}")]
    Query {
        /// Adapter-provided failure detail.
        message: String,
    },
}

impl LikeLedgerError {
    /// Helper for connection related adapter errors.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for query failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Transactional ledger of per-client engagements.
///
/// Implementations must make [`LikeLedger::like`] an indivisible unit: the
/// counter increment and the ledger append either both persist or neither
/// does, and at most one row ever exists per (quote, client) pair even under
/// concurrent calls with identical arguments.
#[async_trait]
pub trait LikeLedger: Send + Sync {
    /// Register one engagement from `client` against `quote_id`.
    ///
    /// Exactly one of N concurrent calls with the same arguments succeeds;
    /// the rest fail with [`LikeLedgerError::AlreadyLiked`].
    async fn like(&self, quote_id: Uuid, client: &ClientIdentity) -> Result<(), LikeLedgerError>;

    /// Whether a ledger row exists for the pair. Pure read, no side effects.
    async fn is_liked(&self, quote_id: Uuid, ip: &str) -> Result<bool, LikeLedgerError>;

    /// Zero every counter and delete every ledger row as one unit.
    async fn reset_all(&self) -> Result<(), LikeLedgerError>;
}
