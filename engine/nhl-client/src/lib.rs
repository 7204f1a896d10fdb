//! # nhl-client
//!
//! Typed client for the NHL web API (standings, schedules, game logs,
//! player landing pages) and the NHL stats REST API (league-wide skater
//! summaries).
//!
//! Snapshot DTOs tolerate absent sub-fields (every leaf defaults to
//! zero/unset), but a response missing its top-level collection fails to
//! decode, which callers treat as a malformed snapshot.

pub mod client;
pub mod error;
pub mod models;

pub use client::{NhlApi, NhlApiConfig, NhlHttpClient};
pub use error::NhlClientError;
pub use models::*;
