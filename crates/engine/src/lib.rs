//! Engine crate for the SwipeByte community favourites.
//!
//! This crate contains the orchestrator that serialises recomputation
//! triggers and publishes ranked favourites snapshots.

pub mod orchestrator;

pub use orchestrator::{FavouritesEngine, FavouritesSnapshot, PipelineState, SwipeEvent};
