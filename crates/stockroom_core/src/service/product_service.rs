//! Product use-case service.
//!
//! # Responsibility
//! - Provide stable CRUD entry points for core callers.
//! - Delegate persistence to repository implementations.
//!
//! # Invariants
//! - Service APIs never bypass repository validation contracts.
//! - Service layer remains storage-agnostic.

use crate::model::product::{Product, ProductId};
use crate::repo::product_repo::{ProductRepository, RepoError, RepoResult};
use rust_decimal::Decimal;

/// Use-case service wrapper for product CRUD operations.
pub struct ProductService<R: ProductRepository> {
    repo: R,
}

/// Request model for registering a new product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub code: String,
    pub name: String,
    pub quantity_per_unit: String,
    pub unit: String,
    pub sell_price: Decimal,
    pub buy_price: Decimal,
    pub remark: String,
}

impl<R: ProductRepository> ProductService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Registers a new product from request fields.
    ///
    /// Returns the persisted record with its assigned identity.
    pub fn register_product(&mut self, request: NewProduct) -> RepoResult<Product> {
        let mut product = Product::new(request.code, request.name);
        product.quantity_per_unit = request.quantity_per_unit;
        product.unit = request.unit;
        product.sell_price = request.sell_price;
        product.buy_price = request.buy_price;
        product.remark = request.remark;

        self.repo.save(&mut product)?;
        Ok(product)
    }

    /// Persists a record through repository validation.
    pub fn save_product(&mut self, product: &mut Product) -> RepoResult<ProductId> {
        self.repo.save(product)
    }

    /// Gets one product by identity.
    pub fn get_product(&self, id: ProductId) -> RepoResult<Option<Product>> {
        self.repo.get(id)
    }

    /// Lists all products ordered by identity.
    pub fn list_products(&self) -> RepoResult<Vec<Product>> {
        self.repo.load_all()
    }

    /// Updates an existing product by identity.
    ///
    /// Returns repository-level not-found or validation errors unchanged.
    pub fn update_product(&mut self, product: &Product) -> RepoResult<()> {
        self.repo.update(product)
    }

    /// Fetches a product, applies new prices, and pushes the update.
    pub fn reprice_product(
        &mut self,
        id: ProductId,
        sell_price: Decimal,
        buy_price: Decimal,
    ) -> RepoResult<Product> {
        let mut product = self.repo.get(id)?.ok_or(RepoError::NotFound(id))?;
        product.sell_price = sell_price;
        product.buy_price = buy_price;
        self.repo.update(&product)?;
        Ok(product)
    }

    /// Deletes a product and clears its identity.
    pub fn delete_product(&mut self, product: &mut Product) -> RepoResult<()> {
        self.repo.delete(product)
    }
}
