// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Category adapter. The list endpoint is unpaginated; the `PageSource`
//! impl wraps the full array as a single page so category lists plug into
//! the same query machinery as everything else.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::api::endpoints;
use crate::api::products::{multipart_form, ImageUpload};
use crate::error::ApiResult;
use crate::http::ApiClient;
use crate::query::{Page, PageSource, QueryDescriptor};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: u64,
    #[serde(default)]
    pub category_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Fields for a category create/update (JSON part of the multipart form).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryForm {
    pub category_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

pub struct CategoryApi {
    client: Arc<ApiClient>,
}

impl CategoryApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// `GET /categories`: the backend returns the full array.
    pub async fn list(&self) -> ApiResult<Vec<Category>> {
        let envelope = self.client.get(endpoints::CATEGORIES, &[]).await?;
        envelope.data_as()
    }

    /// `GET /categories/{id}`.
    pub async fn get(&self, id: u64) -> ApiResult<Category> {
        let envelope = self.client.get(&endpoints::category(id), &[]).await?;
        envelope.data_as()
    }

    /// `POST /categories` (multipart: JSON part + optional image). Admin only.
    pub async fn create(
        &self,
        form: &CategoryForm,
        image: Option<ImageUpload>,
    ) -> ApiResult<Category> {
        let multipart = multipart_form("category", form, image.into_iter().collect())?;
        let envelope = self.client.post_multipart(endpoints::CATEGORIES, multipart).await?;
        envelope.data_as()
    }

    /// `PUT /categories/{id}` (multipart). Admin only.
    pub async fn update(
        &self,
        id: u64,
        form: &CategoryForm,
        image: Option<ImageUpload>,
    ) -> ApiResult<Category> {
        let multipart = multipart_form("category", form, image.into_iter().collect())?;
        let envelope = self.client.put_multipart(&endpoints::category(id), multipart).await?;
        envelope.data_as()
    }

    /// `DELETE /categories/{id}`. Admin only.
    pub async fn delete(&self, id: u64) -> ApiResult<()> {
        self.client.delete(&endpoints::category(id)).await?;
        Ok(())
    }
}

impl PageSource for CategoryApi {
    type Item = Category;

    // Descriptor filters don't apply to the unpaginated endpoint.
    async fn fetch_page(&self, _descriptor: &QueryDescriptor) -> ApiResult<Page<Category>> {
        Ok(Page::single(self.list().await?))
    }
}
