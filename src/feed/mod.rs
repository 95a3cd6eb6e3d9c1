//! Air-quality feed client
//!
//! Fetches the current station reading for one location from a
//! WAQI-compatible feed and flattens it into a [`Reading`].

pub mod client;
pub mod model;

pub use client::{FeedClient, FetchError, ReadingSource};
pub use model::Reading;
