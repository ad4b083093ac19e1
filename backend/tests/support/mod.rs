//! In-memory port implementations backing the HTTP integration tests.
//!
//! One mutex guards both the quote map and the like set, so the ledger's
//! atomicity contract holds by construction: a `like` observes and mutates
//! both under a single lock, exactly as the transactional adapter does with
//! a database transaction.

// Each suite uses a different subset of the helpers.
#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use backend::domain::ports::{
    LikeLedger, LikeLedgerError, ListWindow, QuoteRepository, QuoteRepositoryError,
};
use backend::domain::{ClientIdentity, Quote};

#[derive(Default)]
struct StoreState {
    quotes: Vec<Quote>,
    likes: HashSet<(Uuid, String)>,
    fail_is_liked: bool,
    fail_reset: bool,
}

/// Single-mutex implementation of both persistence ports.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<StoreState>,
}

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Insert a quote directly, bypassing the repository port.
    pub fn seed(&self, quote: Quote) {
        self.lock().quotes.push(quote);
    }

    /// Build and seed a quote with an explicit creation instant, so ordering
    /// assertions stay deterministic.
    pub fn seed_at(&self, text: &str, author: &str, created_at: DateTime<Utc>) -> Uuid {
        let id = Uuid::new_v4();
        self.seed(Quote {
            id,
            text: text.to_owned(),
            author: author.to_owned(),
            likes_count: 0,
            created_at,
            updated_at: created_at,
        });
        id
    }

    /// Current counter value, read outside any port.
    pub fn likes_count(&self, id: Uuid) -> Option<i32> {
        self.lock()
            .quotes
            .iter()
            .find(|quote| quote.id == id)
            .map(|quote| quote.likes_count)
    }

    /// Number of ledger rows held.
    pub fn ledger_len(&self) -> usize {
        self.lock().likes.len()
    }

    /// Make every `is_liked` call fail with a query error.
    pub fn break_is_liked(&self) {
        self.lock().fail_is_liked = true;
    }

    /// Make `reset_all` fail before touching any state.
    pub fn break_reset(&self) {
        self.lock().fail_reset = true;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, StoreState> {
        self.state.lock().expect("store mutex poisoned")
    }
}

fn matches_search(quote: &Quote, term: &str) -> bool {
    let term = term.to_lowercase();
    quote.text.to_lowercase().contains(&term) || quote.author.to_lowercase().contains(&term)
}

#[async_trait]
impl QuoteRepository for InMemoryStore {
    async fn get_random(&self) -> Result<Quote, QuoteRepositoryError> {
        // Deterministic pick; callers only assert that some quote comes back.
        self.lock()
            .quotes
            .first()
            .cloned()
            .ok_or(QuoteRepositoryError::NotFound)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Quote, QuoteRepositoryError> {
        self.lock()
            .quotes
            .iter()
            .find(|quote| quote.id == id)
            .cloned()
            .ok_or(QuoteRepositoryError::NotFound)
    }

    async fn list(&self, window: &ListWindow) -> Result<(Vec<Quote>, i64), QuoteRepositoryError> {
        let state = self.lock();
        let mut matching: Vec<Quote> = state
            .quotes
            .iter()
            .filter(|quote| {
                window
                    .search
                    .as_deref()
                    .is_none_or(|term| matches_search(quote, term))
            })
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = matching.len() as i64;
        let page = matching
            .into_iter()
            .skip(usize::try_from(window.offset).unwrap_or(0))
            .take(usize::try_from(window.limit).unwrap_or(0))
            .collect();
        Ok((page, total))
    }

    async fn create(&self, quote: &Quote) -> Result<(), QuoteRepositoryError> {
        self.lock().quotes.push(quote.clone());
        Ok(())
    }

    async fn update(
        &self,
        id: Uuid,
        text: &str,
        author: &str,
    ) -> Result<Quote, QuoteRepositoryError> {
        let mut state = self.lock();
        let quote = state
            .quotes
            .iter_mut()
            .find(|quote| quote.id == id)
            .ok_or(QuoteRepositoryError::NotFound)?;
        quote.text = text.to_owned();
        quote.author = author.to_owned();
        quote.updated_at = Utc::now();
        Ok(quote.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), QuoteRepositoryError> {
        let mut state = self.lock();
        let before = state.quotes.len();
        state.quotes.retain(|quote| quote.id != id);
        if state.quotes.len() == before {
            return Err(QuoteRepositoryError::NotFound);
        }
        state.likes.retain(|(quote_id, _)| *quote_id != id);
        Ok(())
    }

    async fn top_since(&self, cutoff: DateTime<Utc>) -> Result<Quote, QuoteRepositoryError> {
        self.lock()
            .quotes
            .iter()
            .filter(|quote| quote.created_at >= cutoff)
            .max_by_key(|quote| (quote.likes_count, quote.created_at))
            .cloned()
            .ok_or(QuoteRepositoryError::NotFound)
    }

    async fn top_all_time(&self) -> Result<Quote, QuoteRepositoryError> {
        self.lock()
            .quotes
            .iter()
            .max_by_key(|quote| (quote.likes_count, quote.created_at))
            .cloned()
            .ok_or(QuoteRepositoryError::NotFound)
    }
}

#[async_trait]
impl LikeLedger for InMemoryStore {
    async fn like(&self, quote_id: Uuid, client: &ClientIdentity) -> Result<(), LikeLedgerError> {
        let mut state = self.lock();
        let key = (quote_id, client.ip().to_owned());
        if state.likes.contains(&key) {
            return Err(LikeLedgerError::AlreadyLiked);
        }
        let quote = state
            .quotes
            .iter_mut()
            .find(|quote| quote.id == quote_id)
            .ok_or(LikeLedgerError::QuoteNotFound)?;
        quote.likes_count += 1;
        quote.updated_at = Utc::now();
        state.likes.insert(key);
        Ok(())
    }

    async fn is_liked(&self, quote_id: Uuid, ip: &str) -> Result<bool, LikeLedgerError> {
        let state = self.lock();
        if state.fail_is_liked {
            return Err(LikeLedgerError::query("ledger offline"));
        }
        Ok(state.likes.contains(&(quote_id, ip.to_owned())))
    }

    async fn reset_all(&self) -> Result<(), LikeLedgerError> {
        let mut state = self.lock();
        if state.fail_reset {
            return Err(LikeLedgerError::query("ledger offline"));
        }
        for quote in &mut state.quotes {
            quote.likes_count = 0;
        }
        state.likes.clear();
        Ok(())
    }
}
