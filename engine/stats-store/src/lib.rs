//! # stats-store
//!
//! Season-partitioned keyed storage for the Whos Hot engine.
//!
//! Entities are keyed by composite natural keys (`team code + season`,
//! `player id + season`). Game history sets (player game logs, team games)
//! are replaced wholesale on every sync; the store guarantees readers never
//! observe a partially replaced set.

pub mod entity;
pub mod memory;
pub mod store;

pub use entity::{GameLog, Player, PlayerKey, Season, Team, TeamGame, TeamKey};
pub use memory::InMemoryStore;
pub use store::{StatsStore, StoreError};
