//! Client for the FleetFlow back-office REST API.
//!
//! [`Client`] sends authenticated JSON and multipart requests and returns
//! raw JSON; [`normalize`] turns the several response envelopes the backend
//! uses into one canonical shape.

mod client;
mod errors;
pub mod normalize;
mod query;
pub mod session;
pub mod types;

pub use self::client::{Client, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use self::errors::Error;
pub use self::query::{ListQuery, Query, QueryCommon};
pub use reqwest::multipart;
