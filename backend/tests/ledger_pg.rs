//! Adapter tests against a real PostgreSQL instance.
//!
//! Ignored by default; run with `cargo test -- --ignored` after pointing
//! `TEST_DATABASE_URL` at a disposable database. Each test creates its own
//! quote and deletes it afterwards, cascading its ledger rows away.

use futures::future::join_all;
use uuid::Uuid;

use backend::domain::ports::{LikeLedger, LikeLedgerError, QuoteRepository};
use backend::domain::{ClientIdentity, Quote};
use backend::outbound::persistence::{
    DbPool, DieselLikeLedger, DieselQuoteRepository, PoolConfig, run_pending,
};

async fn connect() -> (DieselQuoteRepository, DieselLikeLedger) {
    let url = std::env::var("TEST_DATABASE_URL")
        .expect("TEST_DATABASE_URL must point at a PostgreSQL instance");
    run_pending(&url).await.expect("migrations apply");
    let pool = DbPool::new(PoolConfig::new(&url)).await.expect("pool builds");
    (
        DieselQuoteRepository::new(pool.clone()),
        DieselLikeLedger::new(pool),
    )
}

async fn seed(repo: &DieselQuoteRepository) -> Quote {
    let quote = Quote::new(format!("integration {}", Uuid::new_v4()), "Test Rig")
        .expect("valid quote");
    repo.create(&quote).await.expect("quote persists");
    quote
}

#[actix_rt::test]
#[ignore = "needs PostgreSQL at TEST_DATABASE_URL"]
async fn duplicate_like_rolls_back_the_increment() {
    let (repo, ledger) = connect().await;
    let quote = seed(&repo).await;
    let client = ClientIdentity::new("203.0.113.77", Some("it-test".into())).expect("client");

    ledger.like(quote.id, &client).await.expect("first like");
    let err = ledger
        .like(quote.id, &client)
        .await
        .expect_err("second like");
    assert_eq!(err, LikeLedgerError::AlreadyLiked);

    let stored = repo.get_by_id(quote.id).await.expect("fetch");
    assert_eq!(stored.likes_count, 1);
    assert!(ledger
        .is_liked(quote.id, client.ip())
        .await
        .expect("membership read"));

    repo.delete(quote.id).await.expect("cleanup");
}

#[actix_rt::test]
#[ignore = "needs PostgreSQL at TEST_DATABASE_URL"]
async fn racing_identical_likes_increment_exactly_once() {
    let (repo, ledger) = connect().await;
    let quote = seed(&repo).await;
    let client = ClientIdentity::new("203.0.113.78", None).expect("client");

    let attempts = (0..50).map(|_| {
        let ledger = ledger.clone();
        let client = client.clone();
        async move { ledger.like(quote.id, &client).await }
    });
    let results = join_all(attempts).await;

    let successes = results.iter().filter(|result| result.is_ok()).count();
    let conflicts = results
        .iter()
        .filter(|result| matches!(result, Err(LikeLedgerError::AlreadyLiked)))
        .count();
    assert_eq!(successes, 1);
    assert_eq!(conflicts, 49);

    let stored = repo.get_by_id(quote.id).await.expect("fetch");
    assert_eq!(stored.likes_count, 1);

    repo.delete(quote.id).await.expect("cleanup");
}

#[actix_rt::test]
#[ignore = "needs PostgreSQL at TEST_DATABASE_URL"]
async fn top_since_breaks_counter_ties_by_newest_creation() {
    let (repo, ledger) = connect().await;
    // Cutoff just before seeding keeps leftover rows from earlier runs out
    // of the window.
    let cutoff = chrono::Utc::now() - chrono::Duration::seconds(5);
    let older = seed(&repo).await;
    let newer = seed(&repo).await;

    for (quote, ip) in [(&older, "203.0.113.80"), (&newer, "203.0.113.81")] {
        let client = ClientIdentity::new(ip, None).expect("client");
        ledger.like(quote.id, &client).await.expect("like persists");
    }

    let top = repo.top_since(cutoff).await.expect("window has quotes");
    assert_eq!(top.id, newer.id);
    assert_eq!(top.likes_count, 1);

    repo.delete(older.id).await.expect("cleanup");
    repo.delete(newer.id).await.expect("cleanup");
}

#[actix_rt::test]
#[ignore = "needs PostgreSQL at TEST_DATABASE_URL"]
async fn liking_a_missing_quote_reports_not_found() {
    let (_repo, ledger) = connect().await;
    let client = ClientIdentity::new("203.0.113.79", None).expect("client");

    let err = ledger
        .like(Uuid::new_v4(), &client)
        .await
        .expect_err("missing quote");
    assert_eq!(err, LikeLedgerError::QuoteNotFound);
}
