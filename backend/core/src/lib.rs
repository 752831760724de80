pub mod error;
pub mod traits;
pub mod types;

pub use error::PantryError;
pub use traits::{VisionModel, VisionRequest, VisionResponse};
pub use types::{
    InventoryItem, InventorySnapshot, ShoppingList, ShoppingListItem, ShoppingListRequest,
};
