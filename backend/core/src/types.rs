use serde::{Deserialize, Serialize};

/// A single item recognized in an uploaded pantry or receipt image.
///
/// `quantity` is a display string ("2 loaves", "1 kg") rather than a
/// number, matching what vision models actually return for groceries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InventoryItem {
    pub name: String,
    pub quantity: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,
}

impl InventoryItem {
    pub fn new(name: impl Into<String>, quantity: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity: quantity.into(),
            category: None,
            expiry_date: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_expiry_date(mut self, expiry_date: impl Into<String>) -> Self {
        self.expiry_date = Some(expiry_date.into());
        self
    }
}

/// The inventory extracted from one processed image.
///
/// `is_mock` is false for snapshots derived from real model output and
/// true for the canned fallback served when the pipeline fails, so
/// callers can tell the two apart without the response shape changing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InventorySnapshot {
    /// Snapshot date in `YYYY-MM-DD` form.
    pub date: String,
    pub items: Vec<InventoryItem>,
    #[serde(default)]
    pub is_mock: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl InventorySnapshot {
    pub fn new(date: impl Into<String>, items: Vec<InventoryItem>) -> Self {
        Self {
            date: date.into(),
            items,
            is_mock: false,
            note: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// One entry on a generated shopping list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShoppingListItem {
    pub name: String,
    pub quantity: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// "high", "medium", or "low".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
}

/// A shopping list produced by a planner.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShoppingList {
    pub items: Vec<ShoppingListItem>,
    #[serde(default)]
    pub is_mock: bool,
}

/// Request body for shopping list generation.
///
/// Both fields are optional so clients can send an edited inventory,
/// a bare list of item names, or an empty body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShoppingListRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inventory: Option<InventorySnapshot>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub selected_items: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_builder() {
        let item = InventoryItem::new("Milk", "1 bottle")
            .with_category("dairy")
            .with_expiry_date("2024-01-15");
        assert_eq!(item.name, "Milk");
        assert_eq!(item.category.as_deref(), Some("dairy"));
        assert_eq!(item.expiry_date.as_deref(), Some("2024-01-15"));
    }

    #[test]
    fn test_optional_fields_omitted_from_json() {
        let item = InventoryItem::new("Rice", "1 kg").with_category("grains");
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["category"], "grains");
        assert!(json.get("expiry_date").is_none());
    }

    #[test]
    fn test_snapshot_round_trip() {
        let snapshot = InventorySnapshot::new(
            "2024-01-20",
            vec![InventoryItem::new("Eggs", "12 pieces").with_category("dairy")],
        );
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: InventorySnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
        assert!(!back.is_mock);
    }

    #[test]
    fn test_is_mock_defaults_to_false_when_absent() {
        let snapshot: InventorySnapshot =
            serde_json::from_str(r#"{"date":"2024-01-20","items":[]}"#).unwrap();
        assert!(!snapshot.is_mock);
        assert!(snapshot.note.is_none());
    }

    #[test]
    fn test_shopping_request_accepts_empty_body() {
        let request: ShoppingListRequest = serde_json::from_str("{}").unwrap();
        assert!(request.inventory.is_none());
        assert!(request.selected_items.is_empty());
    }

    #[test]
    fn test_shopping_request_accepts_selected_items_only() {
        let request: ShoppingListRequest =
            serde_json::from_str(r#"{"selected_items":["Milk","Bread"]}"#).unwrap();
        assert_eq!(request.selected_items, vec!["Milk", "Bread"]);
    }
}
