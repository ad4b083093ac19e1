//! Quote CRUD and query use-cases.
//!
//! [`QuoteService`] composes the quote repository with the like ledger's
//! membership check so every returned quote carries a `liked` annotation for
//! the calling client. The annotation is best effort: a failed ledger lookup
//! degrades to `liked = false` instead of failing the whole response.

use std::sync::Arc;

use tracing::warn;
use uuid::Uuid;

use super::ports::{LikeLedger, ListWindow, QuoteRepository, QuoteRepositoryError};
use super::quote::Quote;
use super::Error;

/// Default page size when the caller omits or botches `page_size`.
pub const DEFAULT_PAGE_SIZE: i64 = 10;
/// Upper bound on `page_size`; larger values fall back to the default.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Normalised pagination parameters.
///
/// Out-of-range inputs are corrected silently rather than rejected: `page`
/// is floored at 1 and `page_size` outside `[1, MAX_PAGE_SIZE]` falls back
/// to [`DEFAULT_PAGE_SIZE`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListParams {
    page: i64,
    page_size: i64,
    search: Option<String>,
}

impl ListParams {
    /// Normalise raw query values into valid pagination parameters.
    pub fn new(page: Option<i64>, page_size: Option<i64>, search: Option<String>) -> Self {
        let page = page.unwrap_or(1).max(1);
        let page_size = match page_size {
            Some(size) if (1..=MAX_PAGE_SIZE).contains(&size) => size,
            _ => DEFAULT_PAGE_SIZE,
        };
        let search = search.filter(|term| !term.trim().is_empty());
        Self {
            page,
            page_size,
            search,
        }
    }

    /// One-based page number, always >= 1.
    pub fn page(&self) -> i64 {
        self.page
    }

    /// Rows per page, always within `[1, MAX_PAGE_SIZE]`.
    pub fn page_size(&self) -> i64 {
        self.page_size
    }

    fn window(&self) -> ListWindow {
        ListWindow {
            limit: self.page_size,
            offset: (self.page - 1) * self.page_size,
            search: self.search.clone(),
        }
    }
}

/// A quote annotated with the calling client's engagement status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikedQuote {
    /// The underlying record.
    pub quote: Quote,
    /// Whether the calling client already liked this quote.
    pub liked: bool,
}

/// One page of annotated quotes plus pagination bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotePage {
    /// Annotated records, newest first.
    pub quotes: Vec<LikedQuote>,
    /// Total records matching the search, across all pages.
    pub total: i64,
    /// Echo of the normalised page number.
    pub page: i64,
    /// Echo of the normalised page size.
    pub page_size: i64,
    /// `ceil(total / page_size)`.
    pub total_pages: i64,
}

/// Compute the page count without floating point arithmetic.
fn total_pages(total: i64, page_size: i64) -> i64 {
    total.div_ceil(page_size)
}

/// CRUD and read-path use-cases over the quote store.
#[derive(Clone)]
pub struct QuoteService {
    repository: Arc<dyn QuoteRepository>,
    ledger: Arc<dyn LikeLedger>,
}

impl QuoteService {
    /// Create a service over the given ports.
    pub fn new(repository: Arc<dyn QuoteRepository>, ledger: Arc<dyn LikeLedger>) -> Self {
        Self { repository, ledger }
    }

    /// Fetch one random quote, annotated for `client_ip`.
    pub async fn get_random(&self, client_ip: &str) -> Result<LikedQuote, Error> {
        let quote = self
            .repository
            .get_random()
            .await
            .map_err(|err| map_repository_error(err, "no quotes found"))?;
        Ok(self.annotate(quote, client_ip).await)
    }

    /// Fetch a quote by id, annotated for `client_ip`.
    pub async fn get_by_id(&self, id: Uuid, client_ip: &str) -> Result<LikedQuote, Error> {
        let quote = self
            .repository
            .get_by_id(id)
            .await
            .map_err(|err| map_repository_error(err, "quote not found"))?;
        Ok(self.annotate(quote, client_ip).await)
    }

    /// Fetch one page ordered newest first, each quote annotated.
    pub async fn list(&self, params: &ListParams, client_ip: &str) -> Result<QuotePage, Error> {
        let (quotes, total) = self
            .repository
            .list(&params.window())
            .await
            .map_err(|err| map_repository_error(err, "quote not found"))?;

        let mut annotated = Vec::with_capacity(quotes.len());
        for quote in quotes {
            annotated.push(self.annotate(quote, client_ip).await);
        }

        Ok(QuotePage {
            quotes: annotated,
            total,
            page: params.page(),
            page_size: params.page_size(),
            total_pages: total_pages(total, params.page_size()),
        })
    }

    /// Create a quote from validated fields. A fresh quote is never liked.
    pub async fn create(&self, text: String, author: String) -> Result<LikedQuote, Error> {
        let quote = Quote::new(text, author)?;
        self.repository
            .create(&quote)
            .await
            .map_err(|err| map_repository_error(err, "quote not found"))?;
        Ok(LikedQuote {
            quote,
            liked: false,
        })
    }

    /// Update text and/or author. Blank or absent fields keep the stored
    /// value, mirroring the partial-update contract of the HTTP surface.
    pub async fn update(
        &self,
        id: Uuid,
        text: Option<String>,
        author: Option<String>,
        client_ip: &str,
    ) -> Result<LikedQuote, Error> {
        let existing = self
            .repository
            .get_by_id(id)
            .await
            .map_err(|err| map_repository_error(err, "quote not found"))?;

        let text = non_blank(text).unwrap_or(existing.text);
        let author = non_blank(author).unwrap_or(existing.author);

        let updated = self
            .repository
            .update(id, &text, &author)
            .await
            .map_err(|err| map_repository_error(err, "quote not found"))?;
        Ok(self.annotate(updated, client_ip).await)
    }

    /// Delete a quote; the store cascades removal of its ledger rows.
    pub async fn delete(&self, id: Uuid) -> Result<(), Error> {
        self.repository
            .delete(id)
            .await
            .map_err(|err| map_repository_error(err, "quote not found"))
    }

    /// Top quote of the trailing seven days, ties broken by newest creation.
    pub async fn top_weekly(&self, client_ip: &str) -> Result<LikedQuote, Error> {
        let cutoff = chrono::Utc::now() - chrono::Duration::days(7);
        let quote = self
            .repository
            .top_since(cutoff)
            .await
            .map_err(|err| map_repository_error(err, "no quotes found for the last week"))?;
        Ok(self.annotate(quote, client_ip).await)
    }

    /// All-time top quote, same tie-break.
    pub async fn top_all_time(&self, client_ip: &str) -> Result<LikedQuote, Error> {
        let quote = self
            .repository
            .top_all_time()
            .await
            .map_err(|err| map_repository_error(err, "no quotes found"))?;
        Ok(self.annotate(quote, client_ip).await)
    }

    async fn annotate(&self, quote: Quote, client_ip: &str) -> LikedQuote {
        let liked = match self.ledger.is_liked(quote.id, client_ip).await {
            Ok(liked) => liked,
            Err(err) => {
                warn!(quote_id = %quote.id, error = %err, "like lookup failed, reporting unliked");
                false
            }
        };
        LikedQuote { quote, liked }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn map_repository_error(error: QuoteRepositoryError, not_found_message: &str) -> Error {
    match error {
        QuoteRepositoryError::NotFound => Error::not_found(not_found_message),
        QuoteRepositoryError::Connection { message } | QuoteRepositoryError::Query { message } => {
            Error::internal(message)
        }
    }
}
