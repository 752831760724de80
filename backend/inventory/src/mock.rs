//! Canned inventory and shopping data, served whenever the real
//! pipeline cannot answer.

use pantrysnap_core::{InventoryItem, InventorySnapshot, ShoppingList, ShoppingListItem};

/// The fixed snapshot returned when image processing fails.
pub fn mock_inventory(date: &str) -> InventorySnapshot {
    let mut snapshot = InventorySnapshot::new(
        date,
        vec![
            InventoryItem::new("Milk", "1 bottle")
                .with_category("dairy")
                .with_expiry_date("2024-01-15"),
            InventoryItem::new("Bread", "2 loaves")
                .with_category("bakery")
                .with_expiry_date("2024-01-10"),
            InventoryItem::new("Eggs", "12 pieces")
                .with_category("dairy")
                .with_expiry_date("2024-01-20"),
            InventoryItem::new("Apples", "6 pieces")
                .with_category("fruits")
                .with_expiry_date("2024-01-18"),
            InventoryItem::new("Rice", "1 kg").with_category("grains"),
        ],
    );
    snapshot.is_mock = true;
    snapshot
}

/// The fixed list served by the stub shopping planner.
pub fn mock_shopping_list() -> ShoppingList {
    ShoppingList {
        items: vec![
            shopping_item("Milk", "2 bottles", "dairy", "high"),
            shopping_item("Bread", "1 loaf", "bakery", "medium"),
            shopping_item("Bananas", "1 bunch", "fruits", "low"),
            shopping_item("Chicken", "1 kg", "meat", "high"),
            shopping_item("Yogurt", "4 cups", "dairy", "medium"),
        ],
        is_mock: true,
    }
}

fn shopping_item(name: &str, quantity: &str, category: &str, priority: &str) -> ShoppingListItem {
    ShoppingListItem {
        name: name.to_string(),
        quantity: quantity.to_string(),
        category: Some(category.to_string()),
        priority: Some(priority.to_string()),
    }
}
