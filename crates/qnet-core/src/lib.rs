//! # qnet-core — Foundational Types for the QueryNet Lifecycle Engine
//!
//! This crate is the leaf of the workspace DAG: it defines the primitive
//! types every other crate builds on and depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for domain identifiers.** `QuestionId`, `AnswerId`,
//!    `UserId` — all uuid-backed newtypes. No bare strings or naked UUIDs
//!    for identifiers, so a `UserId` can never be passed where a
//!    `QuestionId` is expected.
//!
//! 2. **UTC-only timestamps.** The `Timestamp` type enforces UTC with Z
//!    suffix and seconds precision. Deadline comparisons are wall-clock
//!    comparisons between `Timestamp` values, never elapsed-tick counting.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `qnet-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - All public types derive `Debug`, `Clone`, and implement
//!   `Serialize`/`Deserialize`.

pub mod error;
pub mod identity;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use error::CoreError;
pub use identity::{AnswerId, QuestionId, UserId};
pub use temporal::Timestamp;
