//! Test fixtures: ids, request factories and the per-test context.

pub mod context;
pub mod factory;
pub mod ids;

pub use context::TestContext;
pub use factory::{order_request, OrderRequestBuilder};
pub use ids::{generate_product_id, generate_test_id, generate_user_id};
