//! Product domain model.
//!
//! # Responsibility
//! - Define the canonical product record and its lifecycle states.
//! - Enforce domain validation before persistence.
//!
//! # Invariants
//! - `id` is assigned by a save and stays stable until a delete clears it.
//! - `buy_price` must stay strictly below [`buy_price_limit`] for the
//!   record to be accepted by any write path.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable integer identity for persisted product rows.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type ProductId = i64;

/// Highest accepted buy price, exclusive.
///
/// Records priced at or above this limit are rejected before persistence.
pub fn buy_price_limit() -> Decimal {
    Decimal::new(1200, 2)
}

/// Persistence lifecycle state of a product record.
///
/// - `Transient`: in-memory only, no storage identity.
/// - `Persistent`: tracked by a live unit of work. Observable through a
///   [`LazyProduct`](crate::repo::product_repo::LazyProduct) handle, which
///   borrows the open connection; a plain `Product` value is never in this
///   state because every repository call owns its own unit of work.
/// - `Detached`: carries a storage identity but is no longer tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityState {
    Transient,
    Persistent,
    Detached,
}

/// Domain validation failure raised before persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductValidationError {
    /// Buy price at or above the fixed acceptance limit.
    BuyPriceTooHigh { buy_price: Decimal, limit: Decimal },
    /// Product code is empty or whitespace.
    EmptyCode,
    /// A price field is negative.
    NegativePrice {
        field: &'static str,
        value: Decimal,
    },
}

impl Display for ProductValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BuyPriceTooHigh { buy_price, limit } => write!(
                f,
                "buy price {buy_price} is at or above the acceptance limit {limit}"
            ),
            Self::EmptyCode => write!(f, "product code must not be empty"),
            Self::NegativePrice { field, value } => {
                write!(f, "{field} must not be negative, got {value}")
            }
        }
    }
}

impl Error for ProductValidationError {}

/// Canonical product record.
///
/// The record is plain data: it carries no connection or session handle,
/// so ownership and borrowing stay simple at call sites. Lifecycle state
/// is derived from the identity field instead of hidden tracking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Storage identity. `None` while transient; set by a save.
    pub id: Option<ProductId>,
    /// Merchandise code, e.g. `ABC123`.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Packaging descriptor, e.g. `20x1`.
    pub quantity_per_unit: String,
    /// Unit label, e.g. `box`.
    pub unit: String,
    /// Selling price. Serialized as a canonical decimal string.
    pub sell_price: Decimal,
    /// Purchase price. Must stay below [`buy_price_limit`].
    pub buy_price: Decimal,
    /// Free-form remark.
    pub remark: String,
}

impl Product {
    /// Creates a transient record with empty descriptors and zero prices.
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: None,
            code: code.into(),
            name: name.into(),
            quantity_per_unit: String::new(),
            unit: String::new(),
            sell_price: Decimal::ZERO,
            buy_price: Decimal::ZERO,
            remark: String::new(),
        }
    }

    /// Creates a detached record carrying an externally known identity.
    ///
    /// Used by reattachment paths where the row already exists and the
    /// caller wants to push new field values via an update.
    pub fn with_id(
        id: ProductId,
        code: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: Some(id),
            ..Self::new(code, name)
        }
    }

    /// Returns the lifecycle state derivable from the record alone.
    ///
    /// Never returns `Persistent`: that state requires a live unit of
    /// work, which a plain value cannot hold.
    pub fn state(&self) -> EntityState {
        if self.id.is_none() {
            EntityState::Transient
        } else {
            EntityState::Detached
        }
    }

    /// Returns whether the record has no storage identity yet.
    pub fn is_transient(&self) -> bool {
        self.id.is_none()
    }

    /// Checks domain invariants.
    ///
    /// Called by every repository write path before SQL, and on rows read
    /// back from storage so corrupt persisted state is rejected instead of
    /// masked.
    pub fn validate(&self) -> Result<(), ProductValidationError> {
        if self.code.trim().is_empty() {
            return Err(ProductValidationError::EmptyCode);
        }
        if self.sell_price < Decimal::ZERO {
            return Err(ProductValidationError::NegativePrice {
                field: "sell_price",
                value: self.sell_price,
            });
        }
        if self.buy_price < Decimal::ZERO {
            return Err(ProductValidationError::NegativePrice {
                field: "buy_price",
                value: self.buy_price,
            });
        }
        if self.buy_price >= buy_price_limit() {
            return Err(ProductValidationError::BuyPriceTooHigh {
                buy_price: self.buy_price,
                limit: buy_price_limit(),
            });
        }
        Ok(())
    }
}
