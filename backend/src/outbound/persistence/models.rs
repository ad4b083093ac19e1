//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::Quote;

use super::schema::{likes, quotes};

/// Row struct for reading from the quotes table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = quotes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct QuoteRow {
    pub id: Uuid,
    pub text: String,
    pub author: String,
    pub likes_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<QuoteRow> for Quote {
    fn from(row: QuoteRow) -> Self {
        Self {
            id: row.id,
            text: row.text,
            author: row.author,
            likes_count: row.likes_count,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Insertable struct for creating new quote records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = quotes)]
pub(crate) struct NewQuoteRow<'a> {
    pub id: Uuid,
    pub text: &'a str,
    pub author: &'a str,
    pub likes_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<'a> NewQuoteRow<'a> {
    pub(crate) fn from_domain(quote: &'a Quote) -> Self {
        Self {
            id: quote.id,
            text: &quote.text,
            author: &quote.author,
            likes_count: quote.likes_count,
            created_at: quote.created_at,
            updated_at: quote.updated_at,
        }
    }
}

/// Changeset struct for updating quote text and attribution.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = quotes)]
pub(crate) struct QuoteChanges<'a> {
    pub text: &'a str,
    pub author: &'a str,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for appending ledger rows.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = likes)]
pub(crate) struct NewLikeRow<'a> {
    pub id: Uuid,
    pub quote_id: Uuid,
    pub user_ip: &'a str,
    pub user_agent: Option<&'a str>,
    pub created_at: DateTime<Utc>,
}
