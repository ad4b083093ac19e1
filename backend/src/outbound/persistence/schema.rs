//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the migrations exactly; Diesel uses them for
//! compile-time query validation and type-safe SQL generation.

diesel::table! {
    /// Quote records with their deduplicated engagement counters.
    quotes (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Quote body.
        text -> Text,
        /// Attribution (max 255 characters).
        author -> Varchar,
        /// Deduplicated like counter, kept in agreement with the ledger.
        likes_count -> Int4,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp, like increments included.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// One-row-per-(quote, client) engagement ledger.
    ///
    /// `UNIQUE (quote_id, user_ip)` is the hard dedup constraint the like
    /// engine relies on as its last line of defence.
    likes (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Liked quote; rows cascade away with the quote.
        quote_id -> Uuid,
        /// Coarse client identity token (max 64 characters).
        user_ip -> Varchar,
        /// Declared agent string, non-authoritative (max 512 characters).
        user_agent -> Nullable<Varchar>,
        /// Engagement timestamp.
        created_at -> Timestamptz,
    }
}

diesel::joinable!(likes -> quotes (quote_id));
diesel::allow_tables_to_appear_in_same_query!(quotes, likes);
