// SPDX-FileCopyrightText: 2026 Bodega Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Admin stage handlers: product lifecycle, stock adjustment, customer
//! registration with tax-registry enrichment, reports, and settings.

use tracing::{debug, warn};

use bodega_core::types::{
    settings, ContentKind, Customer, ListMessage, ListOption, ListSection, NewProduct,
};
use bodega_core::{BodegaError, ChatChannel, Storage, TaxLookup};

use crate::copy::{money, stock_level, DELETE_CONFIRMATION_WORD};
use crate::input::{digits_only, parse_decimal, parse_positive_decimal};
use crate::rows;
use crate::session::{AdminStage, Stage};
use crate::{notify, Engine};

/// Show the admin root menu. Resets the sender's session to idle.
pub(crate) async fn show_menu(engine: &Engine, sender: &str) -> Result<(), BodegaError> {
    engine.sessions.clear(sender).await;
    let minimum = engine
        .storage
        .get_setting(settings::MIN_ORDER_VALUE)
        .await?
        .unwrap_or_else(|| "0".to_string());

    let options = vec![
        ListOption::new(rows::ADMIN_PRODUCTS, "📦 Manage products")
            .with_description("Register, edit, remove, and adjust stock"),
        ListOption::new(rows::ADMIN_CUSTOMERS, "👥 Manage customers")
            .with_description("Add or remove customers"),
        ListOption::new(rows::ADMIN_REPORTS, "📊 Reports")
            .with_description("Sales figures"),
        ListOption::new(rows::ADMIN_MIN_ORDER, "💰 Set minimum order")
            .with_description(format!("Current value: R$ {minimum}")),
    ];
    let list = ListMessage {
        prompt: "View options".to_string(),
        title: engine.copy().render("admin_menu_title", &[]),
        description: None,
        sections: vec![ListSection { title: Some("Management".to_string()), options }],
    };
    engine.chat.send_list(sender, &list).await
}

/// Route an admin list selection by row id. Unmatched ids are no-ops.
pub(crate) async fn handle_list(
    engine: &Engine,
    sender: &str,
    option_id: &str,
) -> Result<(), BodegaError> {
    match option_id {
        rows::CONFIRM_TAXID_YES => confirm_tax_lookup(engine, sender, true).await,
        rows::CONFIRM_TAXID_NO => confirm_tax_lookup(engine, sender, false).await,
        rows::ADMIN_CUSTOMERS => {
            let list = ListMessage::single_section(
                "Options",
                "Manage customers",
                vec![
                    ListOption::new(rows::CUSTOMER_ADD, "Add customer"),
                    ListOption::new(rows::CUSTOMER_REMOVE, "Remove customer"),
                ],
            );
            engine.chat.send_list(sender, &list).await
        }
        rows::CUSTOMER_ADD => {
            engine.sessions.set(sender, Stage::Admin(AdminStage::AddCustomerPhone)).await;
            engine.say(sender, "customer_add_phone_prompt", &[]).await
        }
        rows::CUSTOMER_REMOVE => {
            let customers = engine.storage.list_customers().await?;
            if customers.is_empty() {
                return engine.say(sender, "no_customers_to_remove", &[]).await;
            }
            let options = customers
                .iter()
                .map(|c| {
                    ListOption::new(rows::remove_customer_row(&c.phone), c.phone.clone())
                        .with_description(c.name.clone().unwrap_or_default())
                })
                .collect();
            let list = ListMessage {
                prompt: "Customers".to_string(),
                title: "Remove customer".to_string(),
                description: None,
                sections: vec![ListSection {
                    title: Some("Pick a customer to remove".to_string()),
                    options,
                }],
            };
            engine.chat.send_list(sender, &list).await
        }
        rows::ADMIN_PRODUCTS => {
            let list = ListMessage::single_section(
                "Actions",
                "Manage products",
                vec![
                    ListOption::new(rows::PRODUCT_ADD, "➕ Register new product"),
                    ListOption::new(rows::PRODUCT_EDIT_MENU, "✏️ Edit/remove existing product"),
                ],
            );
            engine.chat.send_list(sender, &list).await
        }
        rows::PRODUCT_ADD => {
            engine.sessions.set(sender, Stage::Admin(AdminStage::AddProductName)).await;
            engine.say(sender, "product_add_name_prompt", &[]).await
        }
        rows::PRODUCT_EDIT_MENU => {
            let products = engine.storage.list_products().await?;
            if products.is_empty() {
                return engine.say(sender, "no_products", &[]).await;
            }
            let options = products
                .iter()
                .map(|p| {
                    ListOption::new(rows::manage_product_row(p.id), p.name.clone())
                        .with_description(format!("Stock: {} packages", stock_level(p.stock)))
                })
                .collect();
            let list = ListMessage::single_section(
                "Products",
                engine.copy().render("product_select_title", &[]),
                options,
            );
            engine.chat.send_list(sender, &list).await
        }
        rows::EDIT_NAME => to_product_action(engine, sender, ProductAction::EditName).await,
        rows::EDIT_PRICE => to_product_action(engine, sender, ProductAction::EditPrice).await,
        rows::STOCK_ADD => to_product_action(engine, sender, ProductAction::AddStock).await,
        rows::STOCK_REMOVE => to_product_action(engine, sender, ProductAction::RemoveStock).await,
        rows::PRODUCT_DELETE => to_product_action(engine, sender, ProductAction::Delete).await,
        rows::CONTENT_UNIT => choose_content_kind(engine, sender, ContentKind::Unit).await,
        rows::CONTENT_WEIGHT => choose_content_kind(engine, sender, ContentKind::Weight).await,
        rows::ADMIN_REPORTS => {
            let list = ListMessage::single_section(
                "Reports",
                "Generate report",
                vec![
                    ListOption::new(rows::REPORT_PRODUCTS, "🏆 Best-selling products"),
                    ListOption::new(rows::REPORT_CUSTOMERS, "⭐ Top customers"),
                ],
            );
            engine.chat.send_list(sender, &list).await
        }
        rows::REPORT_PRODUCTS => send_top_products(engine, sender).await,
        rows::REPORT_CUSTOMERS => send_top_customers(engine, sender).await,
        rows::ADMIN_MIN_ORDER => {
            engine.sessions.set(sender, Stage::Admin(AdminStage::SetMinimumOrder)).await;
            engine.say(sender, "min_order_prompt", &[]).await
        }
        other => {
            if let Some(product_id) = rows::parse_id_suffix(other, rows::PRODUCT_MANAGE_PREFIX) {
                return open_product_menu(engine, sender, product_id).await;
            }
            if let Some(phone) = rows::parse_suffix(other, rows::CUSTOMER_REMOVE_PREFIX) {
                engine.storage.delete_customer(phone).await?;
                return engine
                    .say(sender, "customer_removed", &[("phone", phone.to_string())])
                    .await;
            }
            debug!(option_id = other, "unmatched admin option id");
            Ok(())
        }
    }
}

/// Staged admin text input, driven entirely by the session stage.
pub(crate) async fn handle_text(
    engine: &Engine,
    sender: &str,
    stage: AdminStage,
    body: &str,
) -> Result<(), BodegaError> {
    match stage {
        AdminStage::AddCustomerPhone => {
            let phone = digits_only(body);
            if phone.is_empty() {
                return engine.say(sender, "invalid_value", &[]).await;
            }
            engine
                .sessions
                .set(sender, Stage::Admin(AdminStage::AddCustomerTaxId { phone }))
                .await;
            engine.say(sender, "customer_add_taxid_prompt", &[]).await
        }
        AdminStage::AddCustomerTaxId { phone } => {
            let tax_id = digits_only(body);
            if tax_id.is_empty() {
                return engine.say(sender, "invalid_value", &[]).await;
            }
            engine
                .say(sender, "taxid_looking_up", &[("tax_id", tax_id.clone())])
                .await?;
            match engine.lookup.lookup(&tax_id).await {
                Ok(profile) => {
                    engine
                        .say(
                            sender,
                            "taxid_found",
                            &[
                                ("legal_name", profile.legal_name.clone()),
                                ("address", profile.address.clone()),
                                ("city", profile.city.clone()),
                                ("region", profile.region.clone()),
                            ],
                        )
                        .await?;
                    let list = ListMessage::single_section(
                        "Confirm",
                        "Data confirmation",
                        vec![
                            ListOption::new(rows::CONFIRM_TAXID_YES, "Yes, register this company"),
                            ListOption::new(rows::CONFIRM_TAXID_NO, "No, enter data manually"),
                        ],
                    );
                    engine.chat.send_list(sender, &list).await?;
                    engine
                        .sessions
                        .set(
                            sender,
                            Stage::Admin(AdminStage::ConfirmTaxLookup { phone, tax_id, profile }),
                        )
                        .await;
                    Ok(())
                }
                Err(e) => {
                    // Enrichment is best-effort: degrade to manual entry.
                    warn!(error = %e, "tax registry lookup failed");
                    engine.say(sender, "taxid_lookup_failed", &[]).await?;
                    engine
                        .sessions
                        .set(sender, Stage::Admin(AdminStage::AddCustomerAddress { phone, tax_id }))
                        .await;
                    Ok(())
                }
            }
        }
        AdminStage::ConfirmTaxLookup { .. } => {
            // A list choice is expected here, not text.
            engine.say(sender, "invalid_value", &[]).await
        }
        AdminStage::AddCustomerAddress { phone, tax_id } => {
            engine
                .sessions
                .set(
                    sender,
                    Stage::Admin(AdminStage::AddCustomerCity {
                        phone,
                        tax_id,
                        address: body.trim().to_string(),
                    }),
                )
                .await;
            engine.say(sender, "customer_add_city_prompt", &[]).await
        }
        AdminStage::AddCustomerCity { phone, tax_id, address } => {
            engine
                .sessions
                .set(
                    sender,
                    Stage::Admin(AdminStage::AddCustomerRegion {
                        phone,
                        tax_id,
                        address,
                        city: body.trim().to_string(),
                    }),
                )
                .await;
            engine.say(sender, "customer_add_region_prompt", &[]).await
        }
        AdminStage::AddCustomerRegion { phone, tax_id, address, city } => {
            let customer = Customer {
                phone,
                tax_id: Some(tax_id),
                name: None,
                address: Some(address),
                city: Some(city),
                region: Some(body.trim().to_string()),
                human_mode: false,
            };
            register_customer(engine, sender, &customer, "customer_registered_manual").await?;
            engine.sessions.clear(sender).await;
            Ok(())
        }
        AdminStage::AddProductName => {
            engine
                .sessions
                .set(
                    sender,
                    Stage::Admin(AdminStage::AddProductPrice { name: body.trim().to_string() }),
                )
                .await;
            engine
                .say(sender, "product_add_price_prompt", &[("name", body.trim().to_string())])
                .await
        }
        AdminStage::AddProductPrice { name } => {
            let Some(price) = parse_decimal(body) else {
                return engine.say(sender, "invalid_value", &[]).await;
            };
            engine
                .sessions
                .set(sender, Stage::Admin(AdminStage::AddProductStock { name, price }))
                .await;
            engine
                .say(sender, "product_add_stock_prompt", &[("price", money(price))])
                .await
        }
        AdminStage::AddProductStock { name, price } => {
            let Some(stock) = parse_decimal(body) else {
                return engine.say(sender, "invalid_value", &[]).await;
            };
            let list = ListMessage::single_section(
                "Content kind",
                engine.copy().render("content_kind_title", &[]),
                vec![
                    ListOption::new(rows::CONTENT_UNIT, "Units")
                        .with_description("e.g. a package with 6 croissants"),
                    ListOption::new(rows::CONTENT_WEIGHT, "Weight (kg)")
                        .with_description("e.g. a 1.2 kg package of beef"),
                ],
            );
            engine.chat.send_list(sender, &list).await?;
            engine
                .sessions
                .set(sender, Stage::Admin(AdminStage::ChooseContentKind { name, price, stock }))
                .await;
            Ok(())
        }
        AdminStage::ChooseContentKind { .. } => {
            // A list choice is expected here, not text.
            engine.say(sender, "invalid_value", &[]).await
        }
        AdminStage::AddContentValue { name, price, stock, kind } => {
            let Some(content_value) = parse_decimal(body) else {
                return engine.say(sender, "invalid_value", &[]).await;
            };
            engine
                .storage
                .create_product(&NewProduct {
                    name: name.clone(),
                    price,
                    stock,
                    content_kind: kind,
                    content_value,
                })
                .await?;
            engine.say(sender, "product_created", &[("product", name)]).await?;
            engine.sessions.clear(sender).await;
            show_menu(engine, sender).await
        }
        AdminStage::ProductMenu { .. } => {
            // An action choice is pending; free text resets to the root menu.
            show_menu(engine, sender).await
        }
        AdminStage::EditProductName { product_id } => {
            let name = body.trim().to_string();
            engine.storage.update_product_name(product_id, &name).await?;
            engine.say(sender, "name_updated", &[("name", name)]).await?;
            engine.sessions.clear(sender).await;
            Ok(())
        }
        AdminStage::EditProductPrice { product_id } => {
            let Some(price) = parse_decimal(body) else {
                return engine.say(sender, "invalid_value", &[]).await;
            };
            engine.storage.update_product_price(product_id, price).await?;
            engine.say(sender, "price_updated", &[("price", money(price))]).await?;
            engine.sessions.clear(sender).await;
            Ok(())
        }
        AdminStage::AddStockQuantity { product_id } => {
            let Some(quantity) = parse_positive_decimal(body) else {
                return engine.say(sender, "invalid_value", &[]).await;
            };
            let Some(product) = engine.storage.get_product(product_id).await? else {
                engine.sessions.clear(sender).await;
                return engine.say(sender, "generic_error", &[]).await;
            };
            let new_stock =
                bodega_catalog::add_stock(engine.storage.as_ref(), product_id, quantity).await?;
            engine
                .say(
                    sender,
                    "stock_updated",
                    &[("product", product.name.clone()), ("stock", stock_level(new_stock))],
                )
                .await?;
            notify::fan_out_restock(engine, sender, product_id, &product.name).await?;
            engine.sessions.clear(sender).await;
            show_menu(engine, sender).await
        }
        AdminStage::RemoveStockQuantity { product_id } => {
            let Some(quantity) = parse_positive_decimal(body) else {
                return engine.say(sender, "invalid_value", &[]).await;
            };
            match bodega_catalog::remove_stock(engine.storage.as_ref(), product_id, quantity).await
            {
                Ok(new_stock) => {
                    let product_name = engine
                        .storage
                        .get_product(product_id)
                        .await?
                        .map(|p| p.name)
                        .unwrap_or_default();
                    engine
                        .say(
                            sender,
                            "stock_updated",
                            &[("product", product_name), ("stock", stock_level(new_stock))],
                        )
                        .await?;
                }
                Err(BodegaError::InsufficientStock { available }) => {
                    // Report the current level; the admin re-navigates.
                    engine
                        .say(
                            sender,
                            "stock_insufficient",
                            &[("qty", stock_level(quantity)), ("stock", stock_level(available))],
                        )
                        .await?;
                }
                Err(e) => return Err(e),
            }
            engine.sessions.clear(sender).await;
            show_menu(engine, sender).await
        }
        AdminStage::ConfirmProductDelete { product_id } => {
            if body.trim().eq_ignore_ascii_case(DELETE_CONFIRMATION_WORD) {
                engine.storage.delete_product(product_id).await?;
                engine.say(sender, "product_deleted", &[]).await?;
            } else {
                engine.say(sender, "operation_cancelled", &[]).await?;
            }
            engine.sessions.clear(sender).await;
            Ok(())
        }
        AdminStage::SetMinimumOrder => {
            let Some(value) = parse_decimal(body) else {
                return engine.say(sender, "invalid_value", &[]).await;
            };
            engine
                .storage
                .set_setting(settings::MIN_ORDER_VALUE, &value.to_string())
                .await?;
            engine.say(sender, "min_order_updated", &[("value", money(value))]).await?;
            engine.sessions.clear(sender).await;
            show_menu(engine, sender).await
        }
    }
}

enum ProductAction {
    EditName,
    EditPrice,
    AddStock,
    RemoveStock,
    Delete,
}

/// Transition from the product action menu into the chosen staged input.
/// Requires a `ProductMenu` stage; the action id is a no-op otherwise.
async fn to_product_action(
    engine: &Engine,
    sender: &str,
    action: ProductAction,
) -> Result<(), BodegaError> {
    let Some(Stage::Admin(AdminStage::ProductMenu { product_id })) =
        engine.sessions.get(sender).await
    else {
        debug!(sender, "product action without a selected product");
        return Ok(());
    };

    let (stage, copy_key) = match action {
        ProductAction::EditName => {
            (AdminStage::EditProductName { product_id }, "edit_name_prompt")
        }
        ProductAction::EditPrice => {
            (AdminStage::EditProductPrice { product_id }, "edit_price_prompt")
        }
        ProductAction::AddStock => {
            (AdminStage::AddStockQuantity { product_id }, "stock_add_prompt")
        }
        ProductAction::RemoveStock => {
            (AdminStage::RemoveStockQuantity { product_id }, "stock_remove_prompt")
        }
        ProductAction::Delete => {
            (AdminStage::ConfirmProductDelete { product_id }, "confirm_delete_product")
        }
    };
    engine.sessions.set(sender, Stage::Admin(stage)).await;
    engine.say(sender, copy_key, &[]).await
}

async fn open_product_menu(
    engine: &Engine,
    sender: &str,
    product_id: i64,
) -> Result<(), BodegaError> {
    let Some(product) = engine.storage.get_product(product_id).await? else {
        debug!(product_id, "manage request for unknown product ignored");
        return Ok(());
    };
    engine
        .sessions
        .set(sender, Stage::Admin(AdminStage::ProductMenu { product_id }))
        .await;
    let list = ListMessage::single_section(
        "Actions",
        engine.copy().render("product_actions_title", &[("product", product.name)]),
        vec![
            ListOption::new(rows::EDIT_NAME, "✏️ Change name"),
            ListOption::new(rows::EDIT_PRICE, "💰 Change price"),
            ListOption::new(rows::STOCK_ADD, "➕ Add stock"),
            ListOption::new(rows::STOCK_REMOVE, "➖ Remove stock"),
            ListOption::new(rows::PRODUCT_DELETE, "🗑️ Delete product"),
        ],
    );
    engine.chat.send_list(sender, &list).await
}

/// Resolve the pending tax-lookup confirmation branch.
async fn confirm_tax_lookup(
    engine: &Engine,
    sender: &str,
    accepted: bool,
) -> Result<(), BodegaError> {
    let Some(Stage::Admin(AdminStage::ConfirmTaxLookup { phone, tax_id, profile })) =
        engine.sessions.get(sender).await
    else {
        debug!(sender, "tax confirmation without a pending lookup");
        return Ok(());
    };

    if !accepted {
        engine
            .sessions
            .set(sender, Stage::Admin(AdminStage::AddCustomerAddress { phone, tax_id }))
            .await;
        return engine.say(sender, "customer_add_manual_prompt", &[]).await;
    }

    let customer = Customer {
        phone,
        tax_id: Some(tax_id),
        name: Some(profile.legal_name.clone()),
        address: Some(profile.address),
        city: Some(profile.city),
        region: Some(profile.region),
        human_mode: false,
    };
    register_customer(engine, sender, &customer, "customer_registered").await?;
    engine.sessions.clear(sender).await;
    show_menu(engine, sender).await
}

/// Insert a customer, translating the duplicate-phone constraint into the
/// friendly "already exists" reply.
async fn register_customer(
    engine: &Engine,
    sender: &str,
    customer: &Customer,
    success_key: &str,
) -> Result<(), BodegaError> {
    match engine.storage.insert_customer(customer).await {
        Ok(()) => {
            engine
                .say(
                    sender,
                    success_key,
                    &[("name", customer.name.clone().unwrap_or_else(|| customer.phone.clone()))],
                )
                .await
        }
        Err(BodegaError::Duplicate { .. }) => {
            engine.say(sender, "customer_already_exists", &[]).await
        }
        Err(e) => Err(e),
    }
}

async fn choose_content_kind(
    engine: &Engine,
    sender: &str,
    kind: ContentKind,
) -> Result<(), BodegaError> {
    let Some(Stage::Admin(AdminStage::ChooseContentKind { name, price, stock })) =
        engine.sessions.get(sender).await
    else {
        debug!(sender, "content kind choice without a pending product");
        return Ok(());
    };
    engine
        .sessions
        .set(sender, Stage::Admin(AdminStage::AddContentValue { name, price, stock, kind }))
        .await;
    let copy_key = match kind {
        ContentKind::Unit => "content_unit_prompt",
        ContentKind::Weight => "content_weight_prompt",
    };
    engine.say(sender, copy_key, &[]).await
}

async fn send_top_products(engine: &Engine, sender: &str) -> Result<(), BodegaError> {
    let top = engine.storage.top_products(5).await?;
    let copy = engine.copy();
    let mut text = copy.render("report_top_products_header", &[]);
    text.push('\n');
    if top.is_empty() {
        text.push('\n');
        text.push_str(&copy.render("report_empty", &[]));
    } else {
        for (i, entry) in top.iter().enumerate() {
            text.push_str(&format!(
                "\n{}. *{}*: {} packages sold",
                i + 1,
                entry.product_name,
                stock_level(entry.total_sold)
            ));
        }
    }
    engine.chat.send_text(sender, &text).await
}

async fn send_top_customers(engine: &Engine, sender: &str) -> Result<(), BodegaError> {
    let top = engine.storage.top_customers(5).await?;
    let copy = engine.copy();
    let mut text = copy.render("report_top_customers_header", &[]);
    text.push('\n');
    if top.is_empty() {
        text.push('\n');
        text.push_str(&copy.render("report_empty", &[]));
    } else {
        for (i, entry) in top.iter().enumerate() {
            let label = entry.name.clone().unwrap_or_else(|| entry.customer_phone.clone());
            text.push_str(&format!(
                "\n{}. *{}*\n   Orders: {} | Total spent: R$ {}",
                i + 1,
                label,
                entry.order_count,
                money(entry.total_spent)
            ));
        }
    }
    engine.chat.send_text(sender, &text).await
}
