//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the product data-access contract.
//! - Isolate SQLite query and transaction details from service callers.
//!
//! # Invariants
//! - Repository writes must enforce `Product::validate()` before SQL.
//! - Every mutating call runs inside its own transaction and commits
//!   before returning; a failed call rolls back on drop.
//! - Repository APIs return semantic errors (`NotFound`,
//!   `TransientEntity`) in addition to DB transport errors.

pub mod product_repo;
