//! # Basket Commands
//!
//! Handlers for basket mutation and totals.
//!
//! ## Basket Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  create_basket ──► ┌──────────┐  add_items / remove_item               │
//! │                    │  Basket  │◄──────────────────────────┐            │
//! │                    │ (stored) │  apply_discount           │            │
//! │                    └────┬─────┘  set_shipping ────────────┘            │
//! │                         │                                               │
//! │                         ▼                                               │
//! │                    get_total ──► BasketTotal (computed, never stored)   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use basket_core::pricing::calculate_totals;
use basket_core::validation::{validate_add_requests, validate_decrement, validate_discount_code};
use basket_core::{Basket, BasketId, BasketTotal, ItemId};
use tracing::{debug, info, warn};

use super::{AddBasketItemsCommand, ApplyDiscountCommand, RemoveBasketItemCommand, SetShippingCommand};
use crate::error::{ServiceError, ServiceResult};
use crate::service::BasketService;

impl BasketService {
    /// Creates a new empty basket.
    pub async fn create_basket(&self) -> ServiceResult<Basket> {
        debug!("create_basket command");
        let basket = self.baskets.create().await?;
        info!(basket_id = %basket.id, "Basket created");
        Ok(basket)
    }

    /// Adds items to a basket.
    ///
    /// ## Behavior
    /// - Item already in basket: quantity increases, discount flags replaced
    /// - Item not in basket: new line with the catalog price frozen
    /// - Any unknown item: nothing is added
    ///
    /// ## Order of Checks
    /// ```text
    /// invalid_request / invalid_quantity / invalid_discount_percentage
    ///      │  (no lookup yet)
    ///      ▼
    /// basket_not_found
    ///      ▼
    /// item_not_found (one batched catalog lookup)
    ///      ▼
    /// merge + replace
    /// ```
    pub async fn add_items(&self, cmd: AddBasketItemsCommand) -> ServiceResult<Basket> {
        debug!(basket_id = %cmd.basket_id, items = cmd.items.len(), "add_items command");

        let lines = validate_add_requests(&cmd.items)?;
        let basket = self.load_basket(cmd.basket_id).await?;

        let ids: Vec<ItemId> = lines.iter().map(|line| line.item_id()).collect();
        let resolved = self.catalog.get_items(&ids).await?;
        if let Some(missing) = ids.iter().find(|id| !resolved.contains_key(id)) {
            warn!(basket_id = %cmd.basket_id, item_id = %missing, "Item not found");
        }

        let basket = basket.add_or_merge_items(&lines, &resolved)?;
        let basket = self.save_basket(basket).await?;

        info!(
            basket_id = %basket.id,
            lines = basket.items.len(),
            total_items = basket.total_items(),
            "Items added to basket"
        );
        Ok(basket)
    }

    /// Removes a line, or takes `quantity` units off it.
    ///
    /// Removing the last line is not an error; the basket is left empty.
    pub async fn remove_item(&self, cmd: RemoveBasketItemCommand) -> ServiceResult<Basket> {
        debug!(
            basket_id = %cmd.basket_id,
            line_id = %cmd.line_id,
            quantity = ?cmd.quantity,
            "remove_item command"
        );

        if let Some(amount) = cmd.quantity {
            validate_decrement(cmd.line_id, amount)?;
        }

        let basket = self.load_basket(cmd.basket_id).await?;
        let basket = match cmd.quantity {
            None => basket.remove_line(cmd.line_id),
            Some(amount) => basket.decrement_line(cmd.line_id, amount),
        }
        .map_err(|err| {
            warn!(basket_id = %cmd.basket_id, line_id = %cmd.line_id, error = %err, "Remove failed");
            ServiceError::from(err)
        })?;

        self.save_basket(basket).await
    }

    /// Applies a basket-level discount code, replacing any previous one.
    ///
    /// An invalid code fails before the basket is loaded and leaves the
    /// stored code untouched.
    pub async fn apply_discount(&self, cmd: ApplyDiscountCommand) -> ServiceResult<Basket> {
        debug!(basket_id = %cmd.basket_id, code = %cmd.code, "apply_discount command");

        let (code, percentage) = validate_discount_code(&cmd.code, self.codes.as_ref())?;
        let basket = self.load_basket(cmd.basket_id).await?;

        let basket = self.save_basket(basket.with_discount_code(code)).await?;
        info!(basket_id = %basket.id, %percentage, "Discount code applied");
        Ok(basket)
    }

    /// Sets the shipping destination; the cost comes from the shipping policy.
    pub async fn set_shipping(&self, cmd: SetShippingCommand) -> ServiceResult<Basket> {
        debug!(basket_id = %cmd.basket_id, country = %cmd.country, "set_shipping command");

        let shipping = self.shipping.quote(&cmd.country)?;
        let basket = self.load_basket(cmd.basket_id).await?;

        let basket = self.save_basket(basket.with_shipping(shipping)).await?;
        info!(basket_id = %basket.id, cost = %basket.shipping_cost(), "Shipping set");
        Ok(basket)
    }

    /// Computes the basket's totals. Nothing is written.
    pub async fn get_total(&self, basket_id: BasketId) -> ServiceResult<BasketTotal> {
        debug!(basket_id = %basket_id, "get_total command");

        let basket = self.load_basket(basket_id).await?;
        let totals = calculate_totals(&basket, self.codes.as_ref(), self.vat_rate).map_err(|err| {
            warn!(basket_id = %basket_id, error = %err, "Totals out of range");
            ServiceError::from(err)
        })?;

        debug!(
            basket_id = %basket_id,
            sub_total = %totals.sub_total,
            vat = %totals.vat_amount,
            total = %totals.total_with_vat,
            "Totals calculated"
        );
        Ok(totals)
    }

    /// Reads a basket.
    pub async fn get_basket(&self, basket_id: BasketId) -> ServiceResult<Basket> {
        debug!(basket_id = %basket_id, "get_basket command");
        self.load_basket(basket_id).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use basket_core::{AddItemRequest, ErrorCode, LineItemId, Money};

    fn id(s: &str) -> ItemId {
        s.parse().unwrap()
    }

    fn laptop() -> ItemId {
        id("11111111-1111-1111-1111-111111111111")
    }

    fn mouse() -> ItemId {
        id("22222222-2222-2222-2222-222222222222")
    }

    fn money(s: &str) -> Money {
        Money::from_str_exact(s).unwrap()
    }

    async fn basket_with(service: &BasketService, items: Vec<AddItemRequest>) -> Basket {
        let basket = service.create_basket().await.unwrap();
        service
            .add_items(AddBasketItemsCommand {
                basket_id: basket.id,
                items,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_scenario_totals() {
        let service = BasketService::in_memory();
        let basket = basket_with(
            &service,
            vec![
                AddItemRequest::new(laptop(), 1),
                AddItemRequest::new(mouse(), 2).discounted(10),
            ],
        )
        .await;

        let totals = service.get_total(basket.id).await.unwrap();
        assert_eq!(totals.sub_total, money("1054.00"));
        assert_eq!(totals.vat_amount, money("210.80"));
        assert_eq!(totals.total_with_vat, money("1264.80"));
        assert_eq!(totals.total_items, 3);
    }

    #[tokio::test]
    async fn test_add_items_validation_precedes_lookup() {
        let service = BasketService::in_memory();

        // Unknown basket, but the empty request is reported first.
        let err = service
            .add_items(AddBasketItemsCommand {
                basket_id: BasketId::new(),
                items: vec![],
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidRequest);

        let err = service
            .add_items(AddBasketItemsCommand {
                basket_id: BasketId::new(),
                items: vec![AddItemRequest::new(laptop(), 1).discounted(150)],
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidDiscountPercentage);
    }

    #[tokio::test]
    async fn test_add_unknown_item_changes_nothing() {
        let service = BasketService::in_memory();
        let basket = basket_with(&service, vec![AddItemRequest::new(laptop(), 1)]).await;

        let err = service
            .add_items(AddBasketItemsCommand {
                basket_id: basket.id,
                items: vec![
                    AddItemRequest::new(mouse(), 1),
                    AddItemRequest::new(ItemId::new(), 1),
                ],
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ItemNotFound);

        let stored = service.get_basket(basket.id).await.unwrap();
        assert_eq!(stored, basket);
    }

    #[tokio::test]
    async fn test_remove_item_full_and_partial() {
        let service = BasketService::in_memory();
        let basket = basket_with(
            &service,
            vec![AddItemRequest::new(laptop(), 3), AddItemRequest::new(mouse(), 1)],
        )
        .await;
        let laptop_line = basket.items[0].id;
        let mouse_line = basket.items[1].id;

        let basket = service
            .remove_item(RemoveBasketItemCommand {
                basket_id: basket.id,
                line_id: laptop_line,
                quantity: Some(2),
            })
            .await
            .unwrap();
        assert_eq!(basket.line(laptop_line).map(|l| l.quantity), Some(1));

        let basket = service
            .remove_item(RemoveBasketItemCommand {
                basket_id: basket.id,
                line_id: mouse_line,
                quantity: None,
            })
            .await
            .unwrap();
        assert!(basket.line(mouse_line).is_none());
        assert_eq!(basket.items.len(), 1);
    }

    #[tokio::test]
    async fn test_remove_unknown_line() {
        let service = BasketService::in_memory();
        let basket = service.create_basket().await.unwrap();

        let err = service
            .remove_item(RemoveBasketItemCommand {
                basket_id: basket.id,
                line_id: LineItemId::new(),
                quantity: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ItemNotFound);

        let err = service
            .remove_item(RemoveBasketItemCommand {
                basket_id: BasketId::new(),
                line_id: LineItemId::new(),
                quantity: Some(0),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidQuantity);
    }

    #[tokio::test]
    async fn test_invalid_code_keeps_previous_code() {
        let service = BasketService::in_memory();
        let basket = service.create_basket().await.unwrap();

        service
            .apply_discount(ApplyDiscountCommand {
                basket_id: basket.id,
                code: "save10".to_string(),
            })
            .await
            .unwrap();

        let err = service
            .apply_discount(ApplyDiscountCommand {
                basket_id: basket.id,
                code: "BOGUS".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidDiscountCode);

        let stored = service.get_basket(basket.id).await.unwrap();
        assert_eq!(stored.discount_code.as_deref(), Some("SAVE10"));
    }

    #[tokio::test]
    async fn test_set_shipping() {
        let service = BasketService::in_memory();
        let basket = service.create_basket().await.unwrap();

        let basket = service
            .set_shipping(SetShippingCommand {
                basket_id: basket.id,
                country: "uk".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(basket.shipping_cost(), money("5.99"));

        let basket = service
            .set_shipping(SetShippingCommand {
                basket_id: basket.id,
                country: "France".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(basket.shipping_cost(), money("12.99"));

        let err = service
            .set_shipping(SetShippingCommand {
                basket_id: basket.id,
                country: " ".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidShippingCountry);
    }

    #[tokio::test]
    async fn test_total_for_unknown_basket() {
        let service = BasketService::in_memory();
        let err = service.get_total(BasketId::new()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::BasketNotFound);
    }
}
