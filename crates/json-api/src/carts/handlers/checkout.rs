//! Checkout Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use ecom_app::domain::checkout::data::{Cart, CartItem};

use crate::{
    carts::errors::{into_status_error, outcome},
    extensions::*,
    money::to_json_number,
    observability::{CheckoutOutcome, observe_checkout},
    state::State,
};

/// Checkout Request
///
/// Either a bare list of lines or an object with lines and a delivery address.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub(crate) enum CheckoutRequest {
    Cart {
        items: Vec<CheckoutItemRequest>,

        #[serde(default)]
        address: Option<String>,
    },
    Items(Vec<CheckoutItemRequest>),
}

/// One cart line
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CheckoutItemRequest {
    #[serde(rename = "productId", alias = "productID", alias = "ProductID")]
    pub product_id: Uuid,

    #[serde(alias = "Quantity")]
    pub quantity: i32,
}

impl From<CheckoutItemRequest> for CartItem {
    fn from(item: CheckoutItemRequest) -> Self {
        CartItem {
            product: item.product_id.into(),
            quantity: item.quantity,
        }
    }
}

impl From<CheckoutRequest> for Cart {
    fn from(request: CheckoutRequest) -> Self {
        let (items, address) = match request {
            CheckoutRequest::Cart { items, address } => (items, address),
            CheckoutRequest::Items(items) => (items, None),
        };

        Cart {
            items: items.into_iter().map(CartItem::from).collect(),
            address,
        }
    }
}

/// Checkout Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CheckoutResponse {
    /// The created order
    pub order_id: Uuid,

    /// Sum of quantity times unit price over every line
    pub total: f64,
}

/// Checkout Handler
///
/// Reserves stock and places a pending order for the authenticated user.
#[endpoint(
    tags("carts"),
    summary = "Checkout Cart",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Order placed"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid cart or insufficient stock"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Missing or invalid bearer token"),
        (status_code = StatusCode::NOT_FOUND, description = "Unknown product"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CheckoutRequest>,
    depot: &mut Depot,
) -> Result<Json<CheckoutResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.current_user_or_401()?.uuid;

    let receipt = state
        .app
        .checkout
        .checkout(user, json.into_inner().into())
        .await
        .map_err(|error| {
            observe_checkout(outcome(&error));

            into_status_error(error)
        })?;

    observe_checkout(CheckoutOutcome::Placed);

    Ok(Json(CheckoutResponse {
        order_id: receipt.order.into(),
        total: to_json_number(receipt.total)?,
    }))
}
