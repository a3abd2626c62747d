//! Entity lifecycle transitions: transient, persistent, detached.

use rust_decimal::Decimal;
use stockroom_core::db::open_db_in_memory;
use stockroom_core::{
    EntityState, Product, ProductRepository, RepoError, SqliteProductRepository,
};

fn open_repo() -> SqliteProductRepository {
    let conn = open_db_in_memory().unwrap();
    SqliteProductRepository::try_new(conn).unwrap()
}

fn sample_product(code: &str) -> Product {
    let mut product = Product::new(code, "laptop");
    product.quantity_per_unit = "20x1".to_string();
    product.unit = "box".to_string();
    product.sell_price = Decimal::new(1100, 2);
    product.buy_price = Decimal::new(1000, 2);
    product
}

#[test]
fn save_moves_transient_record_to_persisted_identity() {
    let mut repo = open_repo();

    let mut product = sample_product("ABC123");
    assert_eq!(product.state(), EntityState::Transient);

    let id = repo.save(&mut product).unwrap();

    assert_eq!(product.id, Some(id));
    assert_eq!(product.state(), EntityState::Detached);
    assert!(repo.get(id).unwrap().is_some());
}

#[test]
fn fetched_record_detaches_and_reattaches_via_update() {
    let mut repo = open_repo();

    let mut product = sample_product("ABC123");
    let id = repo.save(&mut product).unwrap();

    // The returned value is a detached copy; mutating it touches no SQL.
    let mut detached = repo.get(id).unwrap().unwrap();
    assert_eq!(detached.state(), EntityState::Detached);
    detached.remark = "edited offline".to_string();
    assert_eq!(repo.get(id).unwrap().unwrap().remark, "");

    repo.update(&detached).unwrap();
    assert_eq!(repo.get(id).unwrap().unwrap().remark, "edited offline");
}

#[test]
fn hand_built_detached_record_reattaches_via_update() {
    let mut repo = open_repo();

    let mut product = sample_product("ABC123");
    let id = repo.save(&mut product).unwrap();

    // A record built from a known identity is detached from the start;
    // update is what reattaches it to storage.
    let mut replacement = sample_product("ABC456");
    replacement.id = Some(id);
    repo.update(&replacement).unwrap();

    assert_eq!(repo.get(id).unwrap().unwrap().code, "ABC456");
}

#[test]
fn delete_reverts_record_to_transient() {
    let mut repo = open_repo();

    let mut product = sample_product("ABC123");
    let id = repo.save(&mut product).unwrap();

    repo.delete(&mut product).unwrap();

    assert!(product.is_transient());
    assert_eq!(product.state(), EntityState::Transient);
    assert!(repo.get(id).unwrap().is_none());
}

#[test]
fn lazy_load_defers_sql_until_first_access() {
    let mut repo = open_repo();

    let mut product = sample_product("ABC123");
    let id = repo.save(&mut product).unwrap();

    let lazy = repo.load(id);
    assert_eq!(lazy.id(), id);
    assert!(!lazy.is_loaded());
    assert_eq!(lazy.state(), EntityState::Persistent);

    let loaded = lazy.get().unwrap();
    assert_eq!(loaded.code, "ABC123");
    assert!(lazy.is_loaded());

    // Second access reuses the cached row.
    let again = lazy.get().unwrap();
    assert_eq!(again.name, "laptop");
}

#[test]
fn lazy_load_of_missing_row_fails_on_first_access() {
    let repo = open_repo();

    let lazy = repo.load(404);
    assert!(!lazy.is_loaded());

    let err = lazy.get().unwrap_err();
    assert!(matches!(err, RepoError::NotFound(404)));
}

#[test]
fn lazy_handle_detaches_into_plain_record() {
    let mut repo = open_repo();

    let mut product = sample_product("ABC123");
    let id = repo.save(&mut product).unwrap();

    let detached = repo.load(id).into_detached().unwrap();
    assert_eq!(detached.state(), EntityState::Detached);
    assert_eq!(detached, product);
}
