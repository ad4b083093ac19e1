//! Like engine use-cases.
//!
//! [`LikeService`] fronts the transactional [`LikeLedger`] port. The
//! dedup-safety itself lives behind the port: the adapter must make the
//! counter increment and the ledger append one indivisible unit. This
//! service translates ledger outcomes into the domain error taxonomy and
//! re-reads the quote so callers can return the fresh counter.

use std::sync::Arc;

use uuid::Uuid;

use super::ports::{LikeLedger, LikeLedgerError, QuoteRepository, QuoteRepositoryError};
use super::quote::ClientIdentity;
use super::quotes::LikedQuote;
use super::Error;

/// Duplicate-engagement message surfaced to HTTP callers.
pub const ALREADY_LIKED_MESSAGE: &str = "you have already liked this quote";

/// Engagement use-cases over the ledger and quote store.
#[derive(Clone)]
pub struct LikeService {
    repository: Arc<dyn QuoteRepository>,
    ledger: Arc<dyn LikeLedger>,
}

impl LikeService {
    /// Create a service over the given ports.
    pub fn new(repository: Arc<dyn QuoteRepository>, ledger: Arc<dyn LikeLedger>) -> Self {
        Self { repository, ledger }
    }

    /// Register one engagement and return the updated quote.
    ///
    /// # Errors
    ///
    /// - [`crate::domain::ErrorCode::NotFound`] when the quote does not exist;
    /// - [`crate::domain::ErrorCode::Conflict`] when this client already
    ///   liked the quote, including when it lost a race against itself;
    /// - [`crate::domain::ErrorCode::InternalError`] when storage failed and
    ///   the unit of work was rolled back.
    pub async fn like(
        &self,
        quote_id: Uuid,
        client: &ClientIdentity,
    ) -> Result<LikedQuote, Error> {
        self.ledger
            .like(quote_id, client)
            .await
            .map_err(map_ledger_error)?;

        // The increment has committed; the re-read only shapes the response.
        let quote = self
            .repository
            .get_by_id(quote_id)
            .await
            .map_err(map_refetch_error)?;
        Ok(LikedQuote { quote, liked: true })
    }

    /// Whether `ip` already liked `quote_id`.
    pub async fn is_liked(&self, quote_id: Uuid, ip: &str) -> Result<bool, Error> {
        self.ledger
            .is_liked(quote_id, ip)
            .await
            .map_err(map_ledger_error)
    }

    /// Zero every counter and clear the ledger atomically.
    pub async fn reset_all(&self) -> Result<(), Error> {
        self.ledger.reset_all().await.map_err(map_ledger_error)
    }
}

fn map_ledger_error(error: LikeLedgerError) -> Error {
    match error {
        LikeLedgerError::QuoteNotFound => Error::not_found("quote not found"),
        LikeLedgerError::AlreadyLiked => Error::conflict(ALREADY_LIKED_MESSAGE),
        LikeLedgerError::Connection { message } | LikeLedgerError::Query { message } => {
            Error::internal(message)
        }
    }
}

fn map_refetch_error(error: QuoteRepositoryError) -> Error {
    // A successful like whose quote vanished before the re-read is a
    // storage-level surprise, not a caller mistake.
    Error::internal(error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Quote;
    use crate::domain::error::ErrorCode;
    use crate::domain::test_doubles::{MockLedger, MockQuoteRepo};
    use mockall::predicate::eq;
    use rstest::rstest;

    fn client() -> ClientIdentity {
        ClientIdentity::new("203.0.113.9", Some("test-agent".into())).expect("valid client")
    }

    fn sample_quote() -> Quote {
        Quote::new("Premature optimization is the root of all evil.", "Knuth")
            .expect("valid quote")
    }

    #[rstest]
    #[actix_rt::test]
    async fn like_returns_the_updated_quote_marked_liked() {
        let mut quote = sample_quote();
        quote.likes_count = 1;
        let id = quote.id;

        let mut ledger = MockLedger::new();
        ledger
            .expect_like()
            .withf(move |got_id, got_client| *got_id == id && got_client.ip() == "203.0.113.9")
            .return_once(|_, _| Ok(()));

        let mut repo = MockQuoteRepo::new();
        repo.expect_get_by_id()
            .with(eq(id))
            .return_once(move |_| Ok(quote));

        let service = LikeService::new(Arc::new(repo), Arc::new(ledger));
        let liked = service.like(id, &client()).await.expect("like succeeds");
        assert!(liked.liked);
        assert_eq!(liked.quote.likes_count, 1);
    }

    #[rstest]
    #[actix_rt::test]
    async fn duplicate_like_surfaces_a_conflict() {
        let mut ledger = MockLedger::new();
        ledger
            .expect_like()
            .return_once(|_, _| Err(LikeLedgerError::AlreadyLiked));
        let repo = MockQuoteRepo::new();

        let service = LikeService::new(Arc::new(repo), Arc::new(ledger));
        let err = service
            .like(Uuid::new_v4(), &client())
            .await
            .expect_err("duplicate");
        assert_eq!(err.code(), ErrorCode::Conflict);
        assert_eq!(err.message(), ALREADY_LIKED_MESSAGE);
    }

    #[rstest]
    #[actix_rt::test]
    async fn liking_a_missing_quote_is_not_found() {
        let mut ledger = MockLedger::new();
        ledger
            .expect_like()
            .return_once(|_, _| Err(LikeLedgerError::QuoteNotFound));
        let repo = MockQuoteRepo::new();

        let service = LikeService::new(Arc::new(repo), Arc::new(ledger));
        let err = service
            .like(Uuid::new_v4(), &client())
            .await
            .expect_err("missing quote");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[actix_rt::test]
    async fn storage_failure_is_internal_and_carries_no_partial_state() {
        let mut ledger = MockLedger::new();
        ledger
            .expect_like()
            .return_once(|_, _| Err(LikeLedgerError::query("deadlock detected")));
        let repo = MockQuoteRepo::new();

        let service = LikeService::new(Arc::new(repo), Arc::new(ledger));
        let err = service
            .like(Uuid::new_v4(), &client())
            .await
            .expect_err("storage failure");
        assert_eq!(err.code(), ErrorCode::InternalError);
    }

    #[rstest]
    #[actix_rt::test]
    async fn reset_all_propagates_success() {
        let mut ledger = MockLedger::new();
        ledger.expect_reset_all().return_once(|| Ok(()));
        let repo = MockQuoteRepo::new();

        let service = LikeService::new(Arc::new(repo), Arc::new(ledger));
        service.reset_all().await.expect("reset succeeds");
    }
}
