//! Test data factory for order requests.

use crate::client::types::CreateOrderRequest;
use crate::fixtures::ids::{generate_product_id, generate_user_id};

pub const DEFAULT_PRODUCT_NAME: &str = "Test Product";
pub const DEFAULT_QUANTITY: i32 = 1;
pub const DEFAULT_PRICE: f64 = 99.99;

/// Builder for a valid [`CreateOrderRequest`] with fresh ids.
///
/// ```ignore
/// let request = order_request().quantity(3).price(49.99).build();
/// ```
#[derive(Debug, Clone)]
pub struct OrderRequestBuilder {
    request: CreateOrderRequest,
}

impl OrderRequestBuilder {
    pub fn new() -> Self {
        Self {
            request: CreateOrderRequest {
                user_id: generate_user_id(),
                product_id: generate_product_id(),
                product_name: DEFAULT_PRODUCT_NAME.to_string(),
                quantity: DEFAULT_QUANTITY,
                price: DEFAULT_PRICE,
            },
        }
    }

    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.request.user_id = user_id.into();
        self
    }

    pub fn product_id(mut self, product_id: impl Into<String>) -> Self {
        self.request.product_id = product_id.into();
        self
    }

    pub fn product_name(mut self, name: impl Into<String>) -> Self {
        self.request.product_name = name.into();
        self
    }

    pub fn quantity(mut self, quantity: i32) -> Self {
        self.request.quantity = quantity;
        self
    }

    pub fn price(mut self, price: f64) -> Self {
        self.request.price = price;
        self
    }

    pub fn build(self) -> CreateOrderRequest {
        self.request
    }
}

impl Default for OrderRequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Shorthand for [`OrderRequestBuilder::new`].
pub fn order_request() -> OrderRequestBuilder {
    OrderRequestBuilder::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let request = order_request().build();
        assert!(request.user_id.starts_with("user-test-"));
        assert!(request.product_id.starts_with("PROD-"));
        assert_eq!(request.product_name, "Test Product");
        assert_eq!(request.quantity, 1);
        assert_eq!(request.price, 99.99);
    }

    #[test]
    fn test_overrides_keep_other_defaults() {
        let request = order_request()
            .user_id("user-fixed")
            .quantity(5)
            .price(10.0)
            .build();

        assert_eq!(request.user_id, "user-fixed");
        assert_eq!(request.expected_total(), 50.0);
        assert_eq!(request.product_name, DEFAULT_PRODUCT_NAME);
    }

    #[test]
    fn test_each_request_gets_fresh_ids() {
        let a = order_request().build();
        let b = order_request().build();
        assert_ne!(a.user_id, b.user_id);
    }
}
