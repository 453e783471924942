//! Core contracts for recipehub.
//!
//! This crate holds the domain model and the traits the service is composed
//! from: cache operations, repository access, and the event channel. No
//! backend code lives here - concrete implementations are selected by the
//! binary crate via feature flags.

pub mod cache;
pub mod events;
pub mod recipe;
pub mod storage;
