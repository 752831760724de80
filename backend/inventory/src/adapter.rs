//! Maps the vision tool's loosely-shaped JSON into the inventory schema.
//!
//! Model output varies between receipt-style item tables and plain
//! descriptions. The mapping is best-effort and lossy on purpose:
//! whatever the shape, the caller gets a schema-valid, non-empty
//! snapshot and never a JSON-shape error.

use chrono::Utc;
use serde_json::{Map, Value};
use tracing::debug;

use pantrysnap_core::{InventoryItem, InventorySnapshot};

/// Keys that may hold an array of structured item objects.
const ITEM_ARRAY_KEYS: [&str; 3] = ["items", "items_purchased", "products"];
/// Keys that may hold an array of bare item names.
const NAME_ARRAY_KEYS: [&str; 2] = ["objects", "text_content"];
/// Containers that receipt-style output nests its payload under.
const NESTING_KEYS: [&str; 1] = ["text"];

/// Today's date in `YYYY-MM-DD` form.
pub fn current_date() -> String {
    Utc::now().format("%Y-%m-%d").to_string()
}

/// Build an `InventorySnapshot` from arbitrary extracted JSON.
pub fn snapshot_from_json(json: &Value, today: &str) -> InventorySnapshot {
    // Tool responses nest the real payload one level down.
    let json = json
        .get("json_data")
        .filter(|value| value.is_object())
        .unwrap_or(json);

    let date = find_date(json).unwrap_or_else(|| today.to_string());

    if let Some(objects) = find_item_objects(json) {
        let items: Vec<InventoryItem> = objects.iter().filter_map(item_from_object).collect();
        if !items.is_empty() {
            debug!(count = items.len(), "Mapped structured item objects");
            return InventorySnapshot::new(date, items);
        }
    }

    let names = collect_item_names(json);
    if !names.is_empty() {
        debug!(count = names.len(), "Mapped bare item names");
        let items = names
            .into_iter()
            .map(|name| InventoryItem::new(name, "1 unit"))
            .collect();
        return InventorySnapshot::new(date, items);
    }

    placeholder_snapshot(date)
}

fn containers(json: &Value) -> impl Iterator<Item = &Value> {
    std::iter::once(json).chain(NESTING_KEYS.iter().filter_map(|key| json.get(*key)))
}

fn find_item_objects(json: &Value) -> Option<&Vec<Value>> {
    for container in containers(json) {
        for key in ITEM_ARRAY_KEYS {
            if let Some(array) = container.get(key).and_then(Value::as_array) {
                if array.iter().any(Value::is_object) {
                    return Some(array);
                }
            }
        }
    }
    None
}

fn item_from_object(value: &Value) -> Option<InventoryItem> {
    let object = value.as_object()?;
    let name = ["item", "item_name", "name"]
        .iter()
        .find_map(|key| object.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .filter(|name| !name.is_empty())?
        .to_string();

    let mut item = InventoryItem::new(name, format_quantity(object));
    if let Some(category) = object.get("category").and_then(Value::as_str) {
        item = item.with_category(category);
    }
    if let Some(expiry) = ["expiry_date", "expires"]
        .iter()
        .find_map(|key| object.get(*key).and_then(Value::as_str))
    {
        item = item.with_expiry_date(expiry);
    }
    Some(item)
}

/// Merge `quantity` and `unit` fields into one display string.
fn format_quantity(object: &Map<String, Value>) -> String {
    let unit = object
        .get("unit")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|unit| !unit.is_empty());
    let quantity = match object.get("quantity") {
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    };

    match (quantity, unit) {
        (Some(quantity), Some(unit)) => format!("{quantity} {unit}"),
        (Some(quantity), None) => quantity,
        (None, Some(unit)) => format!("1 {unit}"),
        (None, None) => "1 unit".to_string(),
    }
}

fn collect_item_names(json: &Value) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for container in containers(json) {
        for key in NAME_ARRAY_KEYS {
            if let Some(array) = container.get(key).and_then(Value::as_array) {
                for entry in array {
                    let Some(name) = entry
                        .as_str()
                        .map(str::trim)
                        .filter(|name| !name.is_empty())
                    else {
                        continue;
                    };
                    if !names.iter().any(|seen| seen.eq_ignore_ascii_case(name)) {
                        names.push(name.to_string());
                    }
                }
            }
        }
    }
    names
}

fn find_date(json: &Value) -> Option<String> {
    for container in containers(json) {
        if let Some(date) = container
            .get("transaction_details")
            .and_then(|details| details.get("date"))
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|date| !date.is_empty())
        {
            return Some(date.to_string());
        }
    }
    json.get("date")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|date| !date.is_empty())
        .map(String::from)
}

fn placeholder_snapshot(date: String) -> InventorySnapshot {
    InventorySnapshot::new(
        date,
        vec![InventoryItem::new("Processing Complete", "1 unit").with_category("info")],
    )
    .with_note("Image processed but could not extract items.")
}
