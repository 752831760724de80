//! Inventory domain: JSON-to-snapshot mapping, the shopping planner
//! seam, and the canned fallback data.

pub mod adapter;
pub mod mock;
pub mod shopping;

pub use adapter::{current_date, snapshot_from_json};
pub use mock::{mock_inventory, mock_shopping_list};
pub use shopping::{MockPlanner, ShoppingPlanner};
