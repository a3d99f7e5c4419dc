use serde::{Deserialize, Serialize};

use crate::coerce;
use crate::errors::ModelError;

/// A catalog entry as stored in the snapshot and returned over the wire.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offer_price: Option<f64>,
    #[serde(default)]
    pub images: Vec<String>,
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "coerce::stock")]
    pub stock: u32,
}

/// Create payload. Everything is optional at decode time so that a missing
/// field surfaces as a validation error rather than a decode error.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    #[serde(default, deserialize_with = "coerce::text", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "coerce::number", skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "coerce::number", skip_serializing_if = "Option::is_none")]
    pub offer_price: Option<f64>,
    #[serde(default, deserialize_with = "coerce::images")]
    pub images: Vec<String>,
    #[serde(default, deserialize_with = "coerce::text", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "coerce::description")]
    pub description: String,
    #[serde(default, deserialize_with = "coerce::stock")]
    pub stock: u32,
}

impl NewProduct {
    pub fn new(name: impl Into<String>, price: f64, category: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            price: Some(price),
            category: Some(category.into()),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_images<I, S>(mut self, images: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.images = images.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_stock(mut self, stock: u32) -> Self {
        self.stock = stock;
        self
    }

    /// `name`, `price` and `category` must be present and truthy:
    /// empty strings and a zero price are rejected.
    pub fn validate(&self) -> Result<(), ModelError> {
        let mut missing = Vec::new();
        if self.name.as_deref().map_or(true, str::is_empty) {
            missing.push("name");
        }
        if self.price.map_or(true, |p| p == 0.0) {
            missing.push("price");
        }
        if self.category.as_deref().map_or(true, str::is_empty) {
            missing.push("category");
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ModelError::Validation(format!("missing required field(s): {}", missing.join(", "))))
        }
    }

    /// Build the stored record. Does not validate; the client also uses this
    /// for local-only records when the service is unreachable.
    pub fn into_product(self, id: String) -> Product {
        Product {
            id,
            name: self.name.unwrap_or_default(),
            price: self.price.unwrap_or_default(),
            offer_price: self.offer_price,
            images: self.images,
            category: self.category.unwrap_or_default(),
            description: self.description,
            stock: self.stock,
        }
    }
}

/// Partial update merged field-by-field into an existing product.
/// `id` is absent: ids never change after creation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdates {
    #[serde(default, deserialize_with = "coerce::text", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "coerce::number", skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    /// `Some(None)` clears the offer price; serialized as `null`.
    #[serde(default, deserialize_with = "coerce::nullable_number", skip_serializing_if = "Option::is_none")]
    pub offer_price: Option<Option<f64>>,
    #[serde(default, deserialize_with = "coerce::some_images", skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(default, deserialize_with = "coerce::text", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "coerce::some_description", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "coerce::some_stock", skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
}

impl ProductUpdates {
    /// Shallow overwrite; fields not present are retained. Empty `name` or
    /// `category` values are ignored so a record never loses its label.
    pub fn apply(&self, product: &mut Product) {
        if let Some(name) = self.name.as_ref().filter(|n| !n.is_empty()) {
            product.name = name.clone();
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(offer_price) = self.offer_price {
            product.offer_price = offer_price;
        }
        if let Some(images) = &self.images {
            product.images = images.clone();
        }
        if let Some(category) = self.category.as_ref().filter(|c| !c.is_empty()) {
            product.category = category.clone();
        }
        if let Some(description) = &self.description {
            product.description = description.clone();
        }
        if let Some(stock) = self.stock {
            product.stock = stock;
        }
    }
}

/// PUT body: `{ "id": ..., "updates": { ... } }`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateProductRequest {
    #[serde(default, deserialize_with = "coerce::text", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updates: Option<ProductUpdates>,
}

impl UpdateProductRequest {
    pub fn new(id: impl Into<String>, updates: ProductUpdates) -> Self {
        Self { id: Some(id.into()), updates: Some(updates) }
    }

    pub fn into_parts(self) -> Result<(String, ProductUpdates), ModelError> {
        match (self.id.filter(|id| !id.is_empty()), self.updates) {
            (Some(id), Some(updates)) => Ok((id, updates)),
            _ => Err(ModelError::Validation("id and updates are required".into())),
        }
    }
}

/// DELETE body: `{ "id": ... }`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DeleteProductRequest {
    #[serde(default, deserialize_with = "coerce::text", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl DeleteProductRequest {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: Some(id.into()) }
    }

    pub fn into_id(self) -> Result<String, ModelError> {
        self.id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ModelError::Validation("id is required".into()))
    }
}
