//! # Item Commands
//!
//! Read-only access to the catalog.

use basket_core::Item;
use tracing::debug;

use crate::error::ServiceResult;
use crate::service::BasketService;

impl BasketService {
    /// Lists every catalog item.
    pub async fn list_items(&self) -> ServiceResult<Vec<Item>> {
        debug!("list_items command");
        let items = self.catalog.list_items().await?;
        debug!(count = items.len(), "Catalog listed");
        Ok(items)
    }
}
