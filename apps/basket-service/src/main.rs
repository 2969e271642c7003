//! # Basket Demo Entry Point
//!
//! Runs one basket through the engine and logs the result.
//!
//! ## Scenario
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  create_basket                                                          │
//! │  add_items    Laptop × 1 (£1000.00)                                     │
//! │               Wireless Mouse × 2 (£30.00, 10% line discount)            │
//! │  get_total    sub_total 1054.00  vat 210.80  total 1264.80              │
//! │  set_shipping UK (£5.99)                                                │
//! │  apply        SAVE10 (line-discounted mice are exempt)                  │
//! │  get_total                                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! `BASKET_*` environment variables (see [`basket_service::config`]) and
//! `RUST_LOG`.

use basket_core::{AddItemRequest, BasketTotal, ItemId};
use basket_service::commands::{AddBasketItemsCommand, ApplyDiscountCommand, SetShippingCommand};
use basket_service::{init_tracing, BasketService, ServiceConfig};
use tracing::info;

const LAPTOP: &str = "11111111-1111-1111-1111-111111111111";
const MOUSE: &str = "22222222-2222-2222-2222-222222222222";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = ServiceConfig::load()?;
    info!(
        vat_bps = config.vat_rate.bps(),
        domestic = config.shipping.domestic_country(),
        "Starting basket demo"
    );

    let service = BasketService::from_config(&config).await?;
    let basket = service.create_basket().await?;

    service
        .add_items(AddBasketItemsCommand {
            basket_id: basket.id,
            items: vec![
                AddItemRequest::new(LAPTOP.parse::<ItemId>()?, 1),
                AddItemRequest::new(MOUSE.parse::<ItemId>()?, 2).discounted(10),
            ],
        })
        .await?;
    log_totals("Items only", &service.get_total(basket.id).await?);

    service
        .set_shipping(SetShippingCommand {
            basket_id: basket.id,
            country: "UK".to_string(),
        })
        .await?;
    service
        .apply_discount(ApplyDiscountCommand {
            basket_id: basket.id,
            code: "SAVE10".to_string(),
        })
        .await?;
    log_totals("With shipping and SAVE10", &service.get_total(basket.id).await?);

    Ok(())
}

fn log_totals(label: &str, totals: &BasketTotal) {
    info!(
        basket_id = %totals.basket_id,
        items = totals.total_items,
        sub_total = %totals.sub_total,
        shipping = %totals.shipping_cost,
        vat = %totals.vat_amount,
        total = %totals.total_with_vat,
        "{label}"
    );
}
