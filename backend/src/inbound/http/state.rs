//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain services over ports and remain testable without I/O:
//! tests inject in-memory port implementations instead of Diesel adapters.

use std::sync::Arc;

use crate::domain::ports::{LikeLedger, QuoteRepository};
use crate::domain::{LikeService, QuoteService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// CRUD and read-path use-cases.
    pub quotes: QuoteService,
    /// Engagement use-cases over the dedup ledger.
    pub likes: LikeService,
}

impl HttpState {
    /// Wire both services over one repository/ledger pair.
    pub fn new(repository: Arc<dyn QuoteRepository>, ledger: Arc<dyn LikeLedger>) -> Self {
        Self {
            quotes: QuoteService::new(Arc::clone(&repository), Arc::clone(&ledger)),
            likes: LikeService::new(repository, ledger),
        }
    }
}
