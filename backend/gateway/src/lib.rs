//! HTTP gateway: routes, handlers, and the availability-over-correctness
//! fallback policy at the endpoint boundary.

pub mod health_api;
pub mod inventory_api;
pub mod server;
pub mod shopping_api;

pub use server::{GatewayState, MAX_UPLOAD_BYTES, SERVICE_NAME, build_router, serve};
