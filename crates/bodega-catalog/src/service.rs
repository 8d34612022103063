// SPDX-FileCopyrightText: 2026 Bodega Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Stock arithmetic and the order placement sequence.

use std::str::FromStr;

use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use bodega_core::types::{settings, Cart, CartItem, NewOrder, OrderId, OrderStatus, SavedLine};
use bodega_core::{BodegaError, ProductId, Storage};

/// Result of attempting to place an order.
///
/// Rejections are ordinary outcomes, not errors: each carries the data the
/// dialogue needs for its customer-facing message.
#[derive(Debug, Clone, PartialEq)]
pub enum PlacementOutcome {
    Placed { order_id: OrderId },
    EmptyCart,
    BelowMinimum { total: Decimal, minimum: Decimal },
    InsufficientStock { product_name: String, available: Decimal },
}

/// The configured minimum order value, zero when unset or unparsable.
pub async fn minimum_order_value(storage: &dyn Storage) -> Result<Decimal, BodegaError> {
    let raw = storage.get_setting(settings::MIN_ORDER_VALUE).await?;
    Ok(raw
        .and_then(|v| Decimal::from_str(&v).ok())
        .unwrap_or(Decimal::ZERO))
}

/// Attempt to place an order for the given cart.
///
/// Preconditions are checked in order and each is a hard stop: non-empty
/// cart, total at or above the configured minimum, and a fresh stock
/// re-check per line item to catch depletion between add-to-cart and
/// checkout. When all pass, the order row and its snapshots are created and
/// stock is decremented per line.
pub async fn place_order(
    storage: &dyn Storage,
    customer_phone: &str,
    cart: &Cart,
    status: OrderStatus,
) -> Result<PlacementOutcome, BodegaError> {
    if cart.is_empty() {
        return Ok(PlacementOutcome::EmptyCart);
    }

    let total = cart.total();
    let minimum = minimum_order_value(storage).await?;
    if total < minimum {
        return Ok(PlacementOutcome::BelowMinimum { total, minimum });
    }

    for item in &cart.items {
        let (product_name, available) = match storage.get_product(item.product_id).await? {
            Some(product) if product.stock >= Decimal::from(item.quantity) => continue,
            Some(product) => (product.name, product.stock),
            // Product deleted since it was added to the cart.
            None => (item.product_name.clone(), Decimal::ZERO),
        };
        return Ok(PlacementOutcome::InsufficientStock { product_name, available });
    }

    let order = NewOrder {
        customer_phone: customer_phone.to_string(),
        total,
        status,
        created_at: chrono::Utc::now().to_rfc3339(),
    };
    let order_id = storage.create_order(&order, &cart.items).await?;

    for item in &cart.items {
        storage
            .adjust_stock(item.product_id, -Decimal::from(item.quantity))
            .await?;
    }

    info!(order_id, customer = customer_phone, %total, "order placed");
    Ok(PlacementOutcome::Placed { order_id })
}

/// Restore stock for every line item of an order.
///
/// The compensating half of the placement saga: restoration is a pure
/// function of the stored `order_items` rows, so it works even after a
/// process restart. Lines whose product was deleted are skipped.
pub async fn restore_order_stock(
    storage: &dyn Storage,
    order_id: OrderId,
) -> Result<(), BodegaError> {
    let items = storage.get_order_items(order_id).await?;
    for item in &items {
        let Some(product_id) = item.product_id else {
            continue;
        };
        if storage.get_product(product_id).await?.is_none() {
            warn!(order_id, product_id, "skipping stock restore for deleted product");
            continue;
        }
        storage.adjust_stock(product_id, Decimal::from(item.quantity)).await?;
    }
    info!(order_id, lines = items.len(), "order stock restored");
    Ok(())
}

/// Add packages to a product's stock and return the new level.
pub async fn add_stock(
    storage: &dyn Storage,
    product_id: ProductId,
    quantity: Decimal,
) -> Result<Decimal, BodegaError> {
    if quantity <= Decimal::ZERO {
        return Err(BodegaError::Validation("quantity must be positive".to_string()));
    }
    storage.adjust_stock(product_id, quantity).await
}

/// Remove packages from a product's stock and return the new level.
///
/// Removing more than the current stock is rejected with
/// [`BodegaError::InsufficientStock`] carrying the actual level, and nothing
/// is mutated.
pub async fn remove_stock(
    storage: &dyn Storage,
    product_id: ProductId,
    quantity: Decimal,
) -> Result<Decimal, BodegaError> {
    if quantity <= Decimal::ZERO {
        return Err(BodegaError::Validation("quantity must be positive".to_string()));
    }
    let product = storage
        .get_product(product_id)
        .await?
        .ok_or_else(|| BodegaError::Internal(format!("product {product_id} not found")))?;
    if product.stock < quantity {
        return Err(BodegaError::InsufficientStock { available: product.stock });
    }
    storage.adjust_stock(product_id, -quantity).await
}

/// Save the customer's most recent order as their standard order, replacing
/// any prior saved set. Returns false when the customer has no orders.
pub async fn save_standard_order(
    storage: &dyn Storage,
    customer_phone: &str,
) -> Result<bool, BodegaError> {
    let orders = storage.get_orders_by_customer(customer_phone, 1).await?;
    let Some(last) = orders.first() else {
        return Ok(false);
    };
    let items = storage.get_order_items(last.id).await?;
    let lines: Vec<SavedLine> = items
        .iter()
        .filter_map(|item| {
            item.product_id
                .map(|product_id| SavedLine { product_id, quantity: item.quantity })
        })
        .collect();
    storage.replace_saved_order(customer_phone, &lines).await?;
    debug!(customer = customer_phone, lines = lines.len(), "standard order saved");
    Ok(true)
}

/// Load the customer's standard order as cart items at current prices.
///
/// Lines whose product no longer covers the saved quantity are silently
/// dropped; a partial load is acceptable. Returns `None` when no standard
/// order is saved.
pub async fn load_standard_order(
    storage: &dyn Storage,
    customer_phone: &str,
) -> Result<Option<Vec<CartItem>>, BodegaError> {
    let lines = storage.get_saved_order(customer_phone).await?;
    if lines.is_empty() {
        return Ok(None);
    }

    let mut items = Vec::new();
    for line in lines {
        match storage.get_product(line.product_id).await? {
            Some(product) if product.stock >= Decimal::from(line.quantity) => {
                items.push(CartItem {
                    product_id: product.id,
                    product_name: product.name,
                    quantity: line.quantity,
                    unit_price: product.price,
                });
            }
            _ => {}
        }
    }
    Ok(Some(items))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bodega_config::model::StorageConfig;
    use bodega_core::types::{ContentKind, NewProduct};
    use bodega_storage::SqliteStorage;
    use tempfile::tempdir;

    async fn setup_storage() -> (SqliteStorage, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("catalog.db");
        let storage = SqliteStorage::new(StorageConfig {
            database_path: path.to_string_lossy().to_string(),
            wal_mode: true,
        });
        storage.initialize().await.unwrap();
        (storage, dir)
    }

    async fn seed_product(storage: &dyn Storage, name: &str, price: &str, stock: u32) -> i64 {
        storage
            .create_product(&NewProduct {
                name: name.to_string(),
                price: Decimal::from_str(price).unwrap(),
                stock: Decimal::from(stock),
                content_kind: ContentKind::Unit,
                content_value: Decimal::from(6),
            })
            .await
            .unwrap()
    }

    fn cart(lines: &[(i64, &str, u32, &str)]) -> Cart {
        Cart {
            items: lines
                .iter()
                .map(|(id, name, qty, price)| CartItem {
                    product_id: *id,
                    product_name: name.to_string(),
                    quantity: *qty,
                    unit_price: Decimal::from_str(price).unwrap(),
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn empty_cart_is_rejected_without_side_effects() {
        let (storage, _dir) = setup_storage().await;
        let outcome = place_order(&storage, "c", &Cart::default(), OrderStatus::Confirmed)
            .await
            .unwrap();
        assert_eq!(outcome, PlacementOutcome::EmptyCart);
        assert!(storage.list_orders().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn below_minimum_creates_no_order_and_keeps_stock() {
        let (storage, _dir) = setup_storage().await;
        let id = seed_product(&storage, "A", "10.00", 5).await;
        storage.set_setting(settings::MIN_ORDER_VALUE, "25").await.unwrap();

        let outcome = place_order(
            &storage,
            "c",
            &cart(&[(id, "A", 2, "10.00")]),
            OrderStatus::Confirmed,
        )
        .await
        .unwrap();

        assert_eq!(
            outcome,
            PlacementOutcome::BelowMinimum {
                total: Decimal::from_str("20.00").unwrap(),
                minimum: Decimal::from(25),
            }
        );
        assert!(storage.list_orders().await.unwrap().is_empty());
        assert_eq!(storage.get_product(id).await.unwrap().unwrap().stock, Decimal::from(5));
    }

    #[tokio::test]
    async fn placement_decrements_stock_and_snapshots_lines() {
        let (storage, _dir) = setup_storage().await;
        let id_a = seed_product(&storage, "A", "10.00", 5).await;
        let id_b = seed_product(&storage, "B", "20.00", 3).await;
        storage.set_setting(settings::MIN_ORDER_VALUE, "0").await.unwrap();

        let outcome = place_order(
            &storage,
            "c",
            &cart(&[(id_a, "A", 2, "10.00"), (id_b, "B", 1, "20.00")]),
            OrderStatus::Confirmed,
        )
        .await
        .unwrap();

        let PlacementOutcome::Placed { order_id } = outcome else {
            panic!("expected placement, got {outcome:?}");
        };

        assert_eq!(storage.get_product(id_a).await.unwrap().unwrap().stock, Decimal::from(3));
        assert_eq!(storage.get_product(id_b).await.unwrap().unwrap().stock, Decimal::from(2));

        let items = storage.get_order_items(order_id).await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].product_name, "A");
        assert_eq!(items[0].quantity, 2);
        assert_eq!(items[0].unit_price, Decimal::from_str("10.00").unwrap());
    }

    #[tokio::test]
    async fn concurrent_depletion_is_caught_at_checkout() {
        let (storage, _dir) = setup_storage().await;
        let id = seed_product(&storage, "A", "10.00", 5).await;
        storage.set_setting(settings::MIN_ORDER_VALUE, "0").await.unwrap();

        // Someone else bought most of the stock after this cart was built.
        storage.adjust_stock(id, Decimal::from(-4)).await.unwrap();

        let outcome = place_order(
            &storage,
            "c",
            &cart(&[(id, "A", 3, "10.00")]),
            OrderStatus::Confirmed,
        )
        .await
        .unwrap();

        assert_eq!(
            outcome,
            PlacementOutcome::InsufficientStock {
                product_name: "A".to_string(),
                available: Decimal::from(1),
            }
        );
        assert!(storage.list_orders().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn restore_returns_stock_to_pre_decrement_level() {
        let (storage, _dir) = setup_storage().await;
        let id = seed_product(&storage, "A", "10.00", 5).await;
        storage.set_setting(settings::MIN_ORDER_VALUE, "0").await.unwrap();

        let outcome = place_order(
            &storage,
            "c",
            &cart(&[(id, "A", 3, "10.00")]),
            OrderStatus::PendingPayment,
        )
        .await
        .unwrap();
        let PlacementOutcome::Placed { order_id } = outcome else { panic!() };
        assert_eq!(storage.get_product(id).await.unwrap().unwrap().stock, Decimal::from(2));

        restore_order_stock(&storage, order_id).await.unwrap();
        assert_eq!(storage.get_product(id).await.unwrap().unwrap().stock, Decimal::from(5));
    }

    #[tokio::test]
    async fn remove_stock_rejects_overdraw_and_reports_level() {
        let (storage, _dir) = setup_storage().await;
        let id = seed_product(&storage, "A", "10.00", 3).await;

        let err = remove_stock(&storage, id, Decimal::from(10)).await.unwrap_err();
        match err {
            BodegaError::InsufficientStock { available } => {
                assert_eq!(available, Decimal::from(3));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(storage.get_product(id).await.unwrap().unwrap().stock, Decimal::from(3));
    }

    #[tokio::test]
    async fn standard_order_round_trip_drops_out_of_stock_lines() {
        let (storage, _dir) = setup_storage().await;
        let id_a = seed_product(&storage, "A", "10.00", 5).await;
        let id_b = seed_product(&storage, "B", "20.00", 5).await;
        storage.set_setting(settings::MIN_ORDER_VALUE, "0").await.unwrap();

        let outcome = place_order(
            &storage,
            "c",
            &cart(&[(id_a, "A", 2, "10.00"), (id_b, "B", 3, "20.00")]),
            OrderStatus::Confirmed,
        )
        .await
        .unwrap();
        assert!(matches!(outcome, PlacementOutcome::Placed { .. }));

        assert!(save_standard_order(&storage, "c").await.unwrap());

        // B's remaining stock (2) no longer covers the saved quantity (3).
        let loaded = load_standard_order(&storage, "c").await.unwrap().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].product_id, id_a);
        assert_eq!(loaded[0].quantity, 2);
    }

    #[tokio::test]
    async fn no_standard_order_loads_as_none() {
        let (storage, _dir) = setup_storage().await;
        assert!(load_standard_order(&storage, "nobody").await.unwrap().is_none());
        assert!(!save_standard_order(&storage, "nobody").await.unwrap());
    }
}
