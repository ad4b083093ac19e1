//! Domain entities, ports, and use-case services.
//!
//! The domain is transport and storage agnostic. Inbound adapters call the
//! services; outbound adapters implement the ports. Nothing in this module
//! touches actix or Diesel.

pub mod error;
pub mod likes;
pub mod ports;
pub mod quote;
pub mod quotes;

pub use self::error::{Error, ErrorCode};
pub use self::likes::{ALREADY_LIKED_MESSAGE, LikeService};
pub use self::quote::{ClientIdentity, Quote};
pub use self::quotes::{LikedQuote, ListParams, QuotePage, QuoteService};
