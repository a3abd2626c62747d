use rust_decimal::Decimal;
use stockroom_core::{buy_price_limit, EntityState, Product, ProductValidationError};

#[test]
fn new_product_is_transient_with_zeroed_prices() {
    let product = Product::new("ABC123", "laptop");

    assert_eq!(product.id, None);
    assert_eq!(product.code, "ABC123");
    assert_eq!(product.name, "laptop");
    assert_eq!(product.quantity_per_unit, "");
    assert_eq!(product.unit, "");
    assert_eq!(product.sell_price, Decimal::ZERO);
    assert_eq!(product.buy_price, Decimal::ZERO);
    assert_eq!(product.remark, "");
    assert!(product.is_transient());
    assert_eq!(product.state(), EntityState::Transient);
}

#[test]
fn with_id_produces_detached_record() {
    let product = Product::with_id(8888, "ABC123", "laptop");

    assert_eq!(product.id, Some(8888));
    assert!(!product.is_transient());
    assert_eq!(product.state(), EntityState::Detached);
}

#[test]
fn validate_rejects_buy_price_at_limit() {
    let mut product = Product::new("ABC123", "laptop");
    product.buy_price = buy_price_limit();

    let err = product.validate().unwrap_err();
    assert!(matches!(
        err,
        ProductValidationError::BuyPriceTooHigh { buy_price, limit }
            if buy_price == buy_price_limit() && limit == buy_price_limit()
    ));
}

#[test]
fn validate_accepts_buy_price_just_below_limit() {
    let mut product = Product::new("ABC123", "laptop");
    product.buy_price = Decimal::new(1199, 2);

    product.validate().unwrap();
}

#[test]
fn validate_rejects_empty_code() {
    let product = Product::new("   ", "laptop");

    let err = product.validate().unwrap_err();
    assert_eq!(err, ProductValidationError::EmptyCode);
}

#[test]
fn validate_rejects_negative_prices() {
    let mut product = Product::new("ABC123", "laptop");
    product.sell_price = Decimal::new(-100, 2);

    let err = product.validate().unwrap_err();
    assert!(matches!(
        err,
        ProductValidationError::NegativePrice {
            field: "sell_price",
            ..
        }
    ));

    product.sell_price = Decimal::ZERO;
    product.buy_price = Decimal::new(-1, 2);
    let err = product.validate().unwrap_err();
    assert!(matches!(
        err,
        ProductValidationError::NegativePrice {
            field: "buy_price",
            ..
        }
    ));
}

#[test]
fn product_serialization_uses_expected_wire_fields() {
    let mut product = Product::with_id(42, "ABC123", "laptop");
    product.quantity_per_unit = "20x1".to_string();
    product.unit = "box".to_string();
    product.sell_price = Decimal::new(1100, 2);
    product.buy_price = Decimal::new(1000, 2);
    product.remark = "restocked".to_string();

    let json = serde_json::to_value(&product).unwrap();
    assert_eq!(json["id"], 42);
    assert_eq!(json["code"], "ABC123");
    assert_eq!(json["name"], "laptop");
    assert_eq!(json["quantity_per_unit"], "20x1");
    assert_eq!(json["unit"], "box");
    assert_eq!(json["sell_price"], "11.00");
    assert_eq!(json["buy_price"], "10.00");
    assert_eq!(json["remark"], "restocked");

    let decoded: Product = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, product);
}

#[test]
fn entity_state_serializes_snake_case() {
    assert_eq!(
        serde_json::to_value(EntityState::Transient).unwrap(),
        "transient"
    );
    assert_eq!(
        serde_json::to_value(EntityState::Detached).unwrap(),
        "detached"
    );
}
