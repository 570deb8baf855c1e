//! Product request bodies.

use serde::Deserialize;
use utoipa::ToSchema;

use super::common::double_option;
use crate::domain::{Money, ProductPatch};
use crate::error::SalesError;
use crate::service::{NewProduct, missing_fields};

/// Request body for `POST /products`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Unique SKU.
    #[serde(default)]
    pub sku: String,
    /// Whole currency units, as a number or numeric string.
    #[serde(default)]
    #[schema(value_type = i64)]
    pub base_price: Option<serde_json::Value>,
    /// Optional picture URL.
    #[serde(default)]
    pub image_url: Option<String>,
}

impl TryFrom<CreateProductRequest> for NewProduct {
    type Error = SalesError;

    fn try_from(req: CreateProductRequest) -> Result<Self, Self::Error> {
        let base_price = match req.base_price {
            None | Some(serde_json::Value::Null) => {
                return Err(missing_fields(&[
                    ("name", req.name.as_str()),
                    ("sku", req.sku.as_str()),
                    ("base_price", ""),
                ]));
            }
            Some(ref raw) => Money::from_json("base_price", raw)?,
        };
        Ok(Self {
            name: req.name,
            sku: req.sku,
            base_price,
            image_url: req.image_url.filter(|u| !u.trim().is_empty()),
        })
    }
}

/// Request body for `PATCH /products/{id}`. Absent fields are unchanged.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateProductRequest {
    /// New display name.
    pub name: Option<String>,
    /// New SKU.
    pub sku: Option<String>,
    /// New price, as a number or numeric string.
    #[schema(value_type = Option<i64>)]
    pub base_price: Option<serde_json::Value>,
    /// New picture URL; `null` clears it.
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub image_url: Option<Option<String>>,
    /// `false` soft-deletes, `true` restores.
    pub is_active: Option<bool>,
}

impl TryFrom<UpdateProductRequest> for ProductPatch {
    type Error = SalesError;

    fn try_from(req: UpdateProductRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name: req.name,
            sku: req.sku,
            base_price: req
                .base_price
                .as_ref()
                .map(|raw| Money::from_json("base_price", raw))
                .transpose()?,
            image_url: req.image_url,
            is_active: req.is_active,
        })
    }
}
