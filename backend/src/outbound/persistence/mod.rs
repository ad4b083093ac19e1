//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the domain's repository and ledger ports,
//! backed by PostgreSQL via `diesel-async` with `bb8` connection pooling.
//!
//! # Architecture
//!
//! - **Thin adapters**: implementations only translate between Diesel rows
//!   and domain types; the dedup transaction in [`DieselLikeLedger`] is the
//!   one place holding real invariants.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leak to the domain layer.
//! - **Strongly typed errors**: database failures map onto the port error
//!   enums, never onto strings at the call site.

mod diesel_like_ledger;
mod diesel_quote_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_like_ledger::DieselLikeLedger;
pub use diesel_quote_repository::DieselQuoteRepository;
pub use migrations::{MigrationError, run_pending};
pub use pool::{DbPool, PoolConfig, PoolError};
