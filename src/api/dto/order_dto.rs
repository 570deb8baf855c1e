//! Order request bodies and query parameters.

use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::domain::ExhibitionId;
use crate::service::OrderDraft;

/// Request body for `POST /orders`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    /// Target exhibition; defaults to the salesman's assignment.
    #[schema(format = Uuid)]
    pub exhibition_id: Option<String>,
    /// Customer name.
    pub customer_name: Option<String>,
    /// Customer phone.
    pub customer_phone: Option<String>,
    /// Customer address.
    pub customer_address: Option<String>,
    /// Product being sold.
    #[schema(format = Uuid)]
    pub product_id: Option<String>,
    /// Units sold, at least 1: an integer or integer string.
    #[schema(value_type = Option<u32>)]
    pub quantity: Option<serde_json::Value>,
    /// `"CASH"` or a payment transaction ID.
    pub payment_ref: Option<String>,
}

/// Ids are handed over as given: the order pipeline decides whether an
/// unparsable id is an unknown exhibition or an unknown product.
impl From<CreateOrderRequest> for OrderDraft {
    fn from(req: CreateOrderRequest) -> Self {
        Self {
            exhibition_id: req.exhibition_id,
            customer_name: req.customer_name,
            customer_phone: req.customer_phone,
            customer_address: req.customer_address,
            product_id: req.product_id,
            quantity: req.quantity,
            payment_ref: req.payment_ref,
        }
    }
}

/// Query parameters for `GET /orders`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OrderListQuery {
    /// Only orders of this exhibition.
    #[param(value_type = Option<String>, format = Uuid)]
    pub exhibition_id: Option<ExhibitionId>,
}
