// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Product catalog adapter: paged search plus the admin CRUD surface.

use std::sync::Arc;

use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};

use crate::api::{endpoints, PagePayload};
use crate::error::{ApiError, ApiResult, ErrorKind};
use crate::http::ApiClient;
use crate::query::{Page, PageSource, QueryDescriptor};

/// Filter names understood by the product search endpoint.
pub mod filters {
    pub const NAME: &str = "productName";
    pub const MIN_PRICE: &str = "minPrice";
    pub const MAX_PRICE: &str = "maxPrice";
    pub const CATEGORY: &str = "categoryId";
    pub const FEATURED: &str = "isFeatured";
}

/// Product as returned by the backend. Transient view-model: nothing here
/// is derived or validated client-side beyond deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: u64,
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub category_id: Option<u64>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub average_rating: Option<f64>,
    #[serde(default)]
    pub image_urls: Vec<String>,
}

/// Fields for a product create/update, sent as the JSON part of a multipart
/// form alongside zero or more image parts.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductForm {
    pub product_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: f64,
    pub quantity: i64,
    pub category_id: u64,
    pub is_featured: bool,
}

/// An image file attached to a product or category form.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Assemble the multipart form: one JSON part named after the resource plus
/// an `images` part per file.
pub(crate) fn multipart_form<T: Serialize>(
    json_part: &str,
    payload: &T,
    images: Vec<ImageUpload>,
) -> ApiResult<Form> {
    let json = serde_json::to_string(payload)
        .map_err(|e| ApiError::new(ErrorKind::Unknown, format!("serialize form payload: {e}")))?;
    let part = Part::text(json)
        .mime_str("application/json")
        .map_err(|e| ApiError::new(ErrorKind::Unknown, format!("build multipart form: {e}")))?;
    let mut form = Form::new().part(json_part.to_owned(), part);
    for image in images {
        form = form.part("images", Part::bytes(image.bytes).file_name(image.file_name));
    }
    Ok(form)
}

pub struct ProductApi {
    client: Arc<ApiClient>,
}

impl ProductApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// `GET /products` with the descriptor's filters, paging, and sort.
    pub async fn search(&self, descriptor: &QueryDescriptor) -> ApiResult<Page<Product>> {
        let envelope = self.client.get(endpoints::PRODUCTS, &descriptor.to_query()).await?;
        let payload: PagePayload<Product> = envelope.data_as()?;
        Ok(payload.into_page())
    }

    /// `GET /products/{id}`.
    pub async fn get(&self, id: u64) -> ApiResult<Product> {
        let envelope = self.client.get(&endpoints::product(id), &[]).await?;
        envelope.data_as()
    }

    /// `POST /products` (multipart: JSON part + images). Admin only.
    pub async fn create(&self, form: &ProductForm, images: Vec<ImageUpload>) -> ApiResult<Product> {
        let multipart = multipart_form("product", form, images)?;
        let envelope = self.client.post_multipart(endpoints::PRODUCTS, multipart).await?;
        envelope.data_as()
    }

    /// `PUT /products/{id}` (multipart). Admin only.
    pub async fn update(
        &self,
        id: u64,
        form: &ProductForm,
        images: Vec<ImageUpload>,
    ) -> ApiResult<Product> {
        let multipart = multipart_form("product", form, images)?;
        let envelope = self.client.put_multipart(&endpoints::product(id), multipart).await?;
        envelope.data_as()
    }

    /// `DELETE /products/{id}`. Admin only.
    pub async fn delete(&self, id: u64) -> ApiResult<()> {
        self.client.delete(&endpoints::product(id)).await?;
        Ok(())
    }

    /// `PUT /products/{id}/rate?rating=n`.
    pub async fn rate(&self, id: u64, rating: u8) -> ApiResult<()> {
        self.client
            .put(&endpoints::product_rate(id), &[("rating".to_owned(), rating.to_string())])
            .await?;
        Ok(())
    }
}

impl PageSource for ProductApi {
    type Item = Product;

    async fn fetch_page(&self, descriptor: &QueryDescriptor) -> ApiResult<Page<Product>> {
        self.search(descriptor).await
    }
}
