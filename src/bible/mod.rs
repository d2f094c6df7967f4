//! Verse content: records, the provider interface, and the HTTP client

pub mod client;
pub mod provider;
pub mod verse;

pub use client::HttpVerseProvider;
pub use provider::{InMemoryVerseProvider, VerseProvider};
pub use verse::{strip_html, Verse};
