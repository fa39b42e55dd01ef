//! Concrete storage backend implementations.
//!
//! Currently one backend is provided:
//!
//! - [`redb`] - Pure-Rust embedded database with ACID transactions

pub mod redb;

pub use redb::{RedbConfig, RedbEngine};
