//! Shopping list generation seam.
//!
//! No real planning logic exists yet. The trait marks the interface a
//! future planner fills in; `MockPlanner` is the canned stand-in wired
//! up today.

use async_trait::async_trait;
use tracing::debug;

use pantrysnap_core::{PantryError, ShoppingList, ShoppingListRequest};

use crate::mock::mock_shopping_list;

/// Produces a shopping list from the current inventory and the user's
/// selections.
#[async_trait]
pub trait ShoppingPlanner: Send + Sync {
    fn name(&self) -> &str;

    async fn plan(&self, request: &ShoppingListRequest) -> Result<ShoppingList, PantryError>;
}

/// Planner that always returns the canned list.
pub struct MockPlanner;

#[async_trait]
impl ShoppingPlanner for MockPlanner {
    fn name(&self) -> &str {
        "mock"
    }

    async fn plan(&self, request: &ShoppingListRequest) -> Result<ShoppingList, PantryError> {
        debug!(
            selected = request.selected_items.len(),
            has_inventory = request.inventory.is_some(),
            "Serving canned shopping list"
        );
        Ok(mock_shopping_list())
    }
}
