//! End-to-end basket flows through the command handlers, against both the
//! in-memory and the SQLite stores.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use basket_core::{
    AddItemRequest, Basket, BasketId, BasketTotal, ErrorCode, ErrorKind, Item, ItemId, Money,
};
use basket_db::{
    default_items, BasketRepository, Database, DbConfig, InMemoryBasketRepository,
    InMemoryItemCatalog, ItemCatalog, StoreError, StoreResult,
};
use basket_service::commands::{
    AddBasketItemsCommand, ApplyDiscountCommand, RemoveBasketItemCommand, SetShippingCommand,
};
use basket_service::{BasketService, ServiceError, ServiceResult};
use tokio::sync::Barrier;

// =============================================================================
// Helpers
// =============================================================================

const LAPTOP: &str = "11111111-1111-1111-1111-111111111111";
const MOUSE: &str = "22222222-2222-2222-2222-222222222222";
const KEYBOARD: &str = "33333333-3333-3333-3333-333333333333";

fn item(id: &str) -> ItemId {
    id.parse().unwrap()
}

fn money(s: &str) -> Money {
    Money::from_str_exact(s).unwrap()
}

fn add(basket_id: BasketId, items: Vec<AddItemRequest>) -> AddBasketItemsCommand {
    AddBasketItemsCommand { basket_id, items }
}

async fn sqlite_service() -> BasketService {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    BasketService::new(Arc::new(db.items()), Arc::new(db.baskets()))
}

/// Counts reads so tests can assert that validation happens before lookup.
#[derive(Default)]
struct CountingBaskets {
    inner: InMemoryBasketRepository,
    reads: AtomicUsize,
}

#[async_trait]
impl BasketRepository for CountingBaskets {
    async fn create(&self) -> StoreResult<Basket> {
        self.inner.create().await
    }

    async fn get(&self, id: BasketId) -> StoreResult<Basket> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.get(id).await
    }

    async fn replace(&self, basket: Basket) -> StoreResult<Basket> {
        self.inner.replace(basket).await
    }
}

/// A catalog whose backend is down.
struct BrokenCatalog;

#[async_trait]
impl ItemCatalog for BrokenCatalog {
    async fn get_item(&self, _id: ItemId) -> StoreResult<Item> {
        Err(StoreError::ConnectionFailed("catalog offline".to_string()))
    }

    async fn get_items(&self, _ids: &[ItemId]) -> StoreResult<HashMap<ItemId, Item>> {
        Err(StoreError::ConnectionFailed("catalog offline".to_string()))
    }

    async fn list_items(&self) -> StoreResult<Vec<Item>> {
        Err(StoreError::ConnectionFailed("catalog offline".to_string()))
    }
}

// =============================================================================
// Scenario
// =============================================================================

async fn run_scenario(service: &BasketService) {
    let basket = service.create_basket().await.unwrap();
    assert!(basket.is_empty());

    service
        .add_items(add(
            basket.id,
            vec![
                AddItemRequest::new(item(LAPTOP), 1),
                AddItemRequest::new(item(MOUSE), 2).discounted(10),
            ],
        ))
        .await
        .unwrap();

    let totals = service.get_total(basket.id).await.unwrap();
    assert_eq!(totals.basket_id, basket.id);
    assert_eq!(totals.sub_total, money("1054.00"));
    assert_eq!(totals.shipping_cost, Money::zero());
    assert_eq!(totals.vat_amount, money("210.80"));
    assert_eq!(totals.total_without_vat, money("1054.00"));
    assert_eq!(totals.total_with_vat, money("1264.80"));
    assert_eq!(totals.total_items, 3);

    // SAVE10 only touches the undiscounted laptop.
    service
        .apply_discount(ApplyDiscountCommand {
            basket_id: basket.id,
            code: "SAVE10".to_string(),
        })
        .await
        .unwrap();
    let totals = service.get_total(basket.id).await.unwrap();
    assert_eq!(totals.sub_total, money("954.00"));
}

#[tokio::test]
async fn scenario_in_memory() {
    run_scenario(&BasketService::in_memory()).await;
}

#[tokio::test]
async fn scenario_sqlite() {
    run_scenario(&sqlite_service().await).await;
}

#[tokio::test]
async fn shipping_is_taxed() {
    let service = sqlite_service().await;
    let basket = service.create_basket().await.unwrap();

    service
        .add_items(add(basket.id, vec![AddItemRequest::new(item(MOUSE), 1)]))
        .await
        .unwrap();
    service
        .set_shipping(SetShippingCommand {
            basket_id: basket.id,
            country: "UK".to_string(),
        })
        .await
        .unwrap();

    let totals = service.get_total(basket.id).await.unwrap();
    assert_eq!(totals.shipping_cost, money("5.99"));
    assert_eq!(totals.total_without_vat, money("35.99"));
    assert_eq!(totals.vat_amount, money("7.198"));
    assert_eq!(totals.total_with_vat, money("43.188"));
}

// =============================================================================
// Mutation
// =============================================================================

#[tokio::test]
async fn repeated_add_merges_into_one_line() {
    let service = BasketService::in_memory();
    let basket = service.create_basket().await.unwrap();

    service
        .add_items(add(basket.id, vec![AddItemRequest::new(item(KEYBOARD), 1)]))
        .await
        .unwrap();
    let basket = service
        .add_items(add(
            basket.id,
            vec![AddItemRequest::new(item(KEYBOARD), 2).discounted(25)],
        ))
        .await
        .unwrap();

    assert_eq!(basket.items.len(), 1);
    let line = &basket.items[0];
    assert_eq!(line.quantity, 3);
    assert_eq!(line.discount_percentage().map(|p| p.value()), Some(25));
}

#[tokio::test]
async fn removing_last_line_leaves_empty_basket() {
    let service = sqlite_service().await;
    let basket = service.create_basket().await.unwrap();
    let basket = service
        .add_items(add(basket.id, vec![AddItemRequest::new(item(LAPTOP), 2)]))
        .await
        .unwrap();
    let line_id = basket.items[0].id;

    let basket = service
        .remove_item(RemoveBasketItemCommand {
            basket_id: basket.id,
            line_id,
            quantity: Some(1),
        })
        .await
        .unwrap();
    assert_eq!(basket.items[0].quantity, 1);

    let basket = service
        .remove_item(RemoveBasketItemCommand {
            basket_id: basket.id,
            line_id,
            quantity: Some(5),
        })
        .await
        .unwrap();
    assert!(basket.is_empty());

    let totals = service.get_total(basket.id).await.unwrap();
    assert_eq!(totals.total_with_vat, Money::zero());
    assert_eq!(totals.total_items, 0);
}

#[tokio::test]
async fn unknown_item_adds_nothing() {
    let service = sqlite_service().await;
    let basket = service.create_basket().await.unwrap();

    let err = service
        .add_items(add(
            basket.id,
            vec![
                AddItemRequest::new(item(LAPTOP), 1),
                AddItemRequest::new(ItemId::new(), 1),
            ],
        ))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ItemNotFound);
    assert_eq!(err.kind(), ErrorKind::NotFound);

    assert!(service.get_basket(basket.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn line_too_large_to_total_is_rejected() {
    let vault = Item::new(
        ItemId::new(),
        "Vault",
        money("100000000000000000000"),
    );
    let catalog = InMemoryItemCatalog::new([vault.clone()]).unwrap();
    let service = BasketService::new(Arc::new(catalog), Arc::new(InMemoryBasketRepository::new()));
    let basket = service.create_basket().await.unwrap();

    let err = service
        .add_items(add(basket.id, vec![AddItemRequest::new(vault.id, 4_000_000_000)]))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidQuantity);

    // Nothing was stored, so the basket still totals.
    assert!(service.get_basket(basket.id).await.unwrap().is_empty());
    let totals = service.get_total(basket.id).await.unwrap();
    assert_eq!(totals.total_with_vat, Money::zero());
}

#[tokio::test]
async fn invalid_code_keeps_previous_code() {
    let service = sqlite_service().await;
    let basket = service.create_basket().await.unwrap();

    service
        .apply_discount(ApplyDiscountCommand {
            basket_id: basket.id,
            code: " student15 ".to_string(),
        })
        .await
        .unwrap();
    let err = service
        .apply_discount(ApplyDiscountCommand {
            basket_id: basket.id,
            code: "NOPE".to_string(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidDiscountCode);

    let stored = service.get_basket(basket.id).await.unwrap();
    assert_eq!(stored.discount_code.as_deref(), Some("STUDENT15"));
}

// =============================================================================
// Errors
// =============================================================================

#[tokio::test]
async fn validation_runs_before_basket_lookup() {
    let baskets = Arc::new(CountingBaskets::default());
    let service = BasketService::new(Arc::new(InMemoryItemCatalog::default()), baskets.clone());
    let missing = BasketId::new();

    let cases = [
        service
            .add_items(add(missing, vec![AddItemRequest::new(item(LAPTOP), 0)]))
            .await
            .unwrap_err()
            .code,
        service
            .add_items(add(
                missing,
                vec![AddItemRequest {
                    item_id: item(LAPTOP),
                    quantity: 1,
                    is_discounted: true,
                    discount_percentage: None,
                }],
            ))
            .await
            .unwrap_err()
            .code,
        service
            .apply_discount(ApplyDiscountCommand {
                basket_id: missing,
                code: "BOGUS".to_string(),
            })
            .await
            .unwrap_err()
            .code,
        service
            .set_shipping(SetShippingCommand {
                basket_id: missing,
                country: String::new(),
            })
            .await
            .unwrap_err()
            .code,
    ];

    assert_eq!(
        cases,
        [
            ErrorCode::InvalidQuantity,
            ErrorCode::InvalidDiscountPercentage,
            ErrorCode::InvalidDiscountCode,
            ErrorCode::InvalidShippingCountry,
        ]
    );
    assert_eq!(baskets.reads.load(Ordering::SeqCst), 0);

    let err = service.get_total(missing).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::BasketNotFound);
    assert_eq!(baskets.reads.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn infrastructure_failure_is_server_error() {
    let service = BasketService::new(
        Arc::new(BrokenCatalog),
        Arc::new(InMemoryBasketRepository::new()),
    );
    let basket = service.create_basket().await.unwrap();

    let err = service
        .add_items(add(basket.id, vec![AddItemRequest::new(item(LAPTOP), 1)]))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ServerError);
    assert_eq!(err.kind(), ErrorKind::Infrastructure);
    assert!(!err.message.contains("offline"));

    let err = service.list_items().await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ServerError);
}

#[tokio::test]
async fn error_serializes_with_code_and_message() {
    let service = BasketService::in_memory();
    let err = service.get_basket(BasketId::new()).await.unwrap_err();

    let json = serde_json::to_value(&err).unwrap();
    assert_eq!(json["code"], "basket_not_found");
    assert!(json["message"].is_string());
}

// =============================================================================
// Concurrency
// =============================================================================

const CODES: [&str; 4] = ["SAVE10", "WINTER15", "VIP30", "LOYALTY10"];
const BASKETS: usize = 24;

/// Add, discount and ship one basket; the inputs vary with `seed`.
async fn shop(service: &BasketService, basket_id: BasketId, seed: usize) -> ServiceResult<BasketTotal> {
    let catalog = default_items();
    let first = &catalog[seed % catalog.len()];
    let second = &catalog[(seed + 3) % catalog.len()];
    let qty = i64::try_from(seed % 5 + 1).unwrap();

    service
        .add_items(add(
            basket_id,
            vec![
                AddItemRequest::new(first.id, qty),
                AddItemRequest::new(second.id, 1).discounted(i64::try_from(seed % 20 + 5).unwrap()),
            ],
        ))
        .await?;
    service
        .apply_discount(ApplyDiscountCommand {
            basket_id,
            code: CODES[seed % CODES.len()].to_string(),
        })
        .await?;
    service
        .set_shipping(SetShippingCommand {
            basket_id,
            country: if seed % 2 == 0 { "UK" } else { "Germany" }.to_string(),
        })
        .await?;
    service.get_total(basket_id).await
}

/// Totals each seed would get with nothing else running.
async fn sequential_totals() -> Vec<BasketTotal> {
    let service = BasketService::in_memory();
    let mut totals = Vec::with_capacity(BASKETS);
    for seed in 0..BASKETS {
        let basket = service.create_basket().await.unwrap();
        totals.push(shop(&service, basket.id, seed).await.unwrap());
    }
    totals
}

async fn assert_baskets_do_not_interfere(service: BasketService) {
    let expected = sequential_totals().await;
    let barrier = Arc::new(Barrier::new(BASKETS));

    let handles: Vec<_> = (0..BASKETS)
        .map(|seed| {
            let service = service.clone();
            let barrier = barrier.clone();
            tokio::spawn(async move {
                let basket = service.create_basket().await?;
                barrier.wait().await;
                let totals = shop(&service, basket.id, seed).await?;
                let stored = service.get_basket(basket.id).await?;
                Ok::<_, ServiceError>((basket.id, totals, stored))
            })
        })
        .collect();

    for (seed, handle) in handles.into_iter().enumerate() {
        let (basket_id, totals, stored) = handle.await.unwrap().unwrap();

        let mut want = expected[seed].clone();
        want.basket_id = basket_id;
        assert_eq!(totals, want, "basket {seed}");

        assert_eq!(stored.id, basket_id);
        assert_eq!(stored.items.len(), 2);
        assert_eq!(stored.discount_code.as_deref(), Some(CODES[seed % CODES.len()]));
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_baskets_in_memory() {
    assert_baskets_do_not_interfere(BasketService::in_memory()).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_baskets_sqlite() {
    assert_baskets_do_not_interfere(sqlite_service().await).await;
}
