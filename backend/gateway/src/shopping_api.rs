//! Shopping list endpoint.
//!
//! Mirrors the inventory endpoint's availability policy: planner
//! failures are absorbed into the canned list, never surfaced as HTTP
//! errors.

use axum::{Json, extract::State};
use tracing::{error, info};
use uuid::Uuid;

use logging::redact_api_keys;
use pantrysnap_core::{ShoppingList, ShoppingListRequest};
use pantrysnap_inventory::mock_shopping_list;

use crate::server::GatewayState;

/// Handler for `POST /generate-shopping-list`.
///
/// A missing or malformed body is treated as an empty request rather
/// than rejected; the planner decides what to make of it.
pub async fn generate_shopping_list(
    State(state): State<GatewayState>,
    body: Option<Json<ShoppingListRequest>>,
) -> Json<ShoppingList> {
    let request_id = Uuid::new_v4();
    let request = body.map(|Json(request)| request).unwrap_or_default();

    info!(
        %request_id,
        planner = state.planner.name(),
        selected = request.selected_items.len(),
        "Generating shopping list"
    );

    match state.planner.plan(&request).await {
        Ok(list) => Json(list),
        Err(err) => {
            error!(
                %request_id,
                error = %redact_api_keys(&err.to_string()),
                "Planner failed, serving mock shopping list"
            );
            Json(mock_shopping_list())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pantrysnap_core::PantryError;
    use pantrysnap_inventory::{MockPlanner, ShoppingPlanner};
    use pantrysnap_vision::{ImageToJsonTool, MockVision, VisionSettings};
    use std::sync::Arc;

    struct FailingPlanner;

    #[async_trait]
    impl ShoppingPlanner for FailingPlanner {
        fn name(&self) -> &str {
            "failing"
        }

        async fn plan(&self, _request: &ShoppingListRequest) -> Result<ShoppingList, PantryError> {
            Err(PantryError::ModelUnavailable("planner offline".to_string()))
        }
    }

    fn state_with(planner: Arc<dyn ShoppingPlanner>) -> GatewayState {
        let tool = Arc::new(ImageToJsonTool::new(
            Arc::new(MockVision::new("{}")),
            VisionSettings::default(),
        ));
        GatewayState::new(tool, planner)
    }

    #[tokio::test]
    async fn returns_planner_list() {
        let state = state_with(Arc::new(MockPlanner));
        let Json(list) = generate_shopping_list(
            State(state),
            Some(Json(ShoppingListRequest::default())),
        )
        .await;
        assert!(list.is_mock);
        assert_eq!(list.items.len(), 5);
    }

    #[tokio::test]
    async fn missing_body_is_treated_as_empty_request() {
        let state = state_with(Arc::new(MockPlanner));
        let Json(list) = generate_shopping_list(State(state), None).await;
        assert_eq!(list.items.len(), 5);
    }

    #[tokio::test]
    async fn planner_failure_falls_back_to_mock() {
        let state = state_with(Arc::new(FailingPlanner));
        let Json(list) = generate_shopping_list(State(state), None).await;
        assert!(list.is_mock);
        assert!(!list.items.is_empty());
    }
}
