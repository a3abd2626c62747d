//! Domain model for product records.
//!
//! # Responsibility
//! - Define the canonical product shape persisted by the repository layer.
//! - Express the persistence lifecycle (transient / persistent / detached)
//!   at the type level where Rust can observe it.
//!
//! # Invariants
//! - Every persisted record is identified by a stable `ProductId`.
//! - Domain validation runs before any write reaches SQL.

pub mod product;
