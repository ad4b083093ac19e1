//! Quote service backend.
//!
//! A small HTTP service for curating quotes, built around a deduplicated
//! like counter: each client identity may raise a quote's counter at most
//! once, and concurrent duplicates are rejected inside a single database
//! transaction.
//!
//! The crate is split along hexagonal lines:
//!
//! - [`domain`] holds the services, ports, and error model, free of any
//!   HTTP or database types.
//! - [`inbound`] adapts HTTP requests onto the domain services.
//! - [`outbound`] implements the ports against PostgreSQL via Diesel.
//! - [`server`] carries process configuration and the CORS policy.

// `i64::div_ceil` (used for page counts) is still gated behind
// `int_roundings`, so this crate builds on nightly.
#![feature(int_roundings)]

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod outbound;
pub mod server;
