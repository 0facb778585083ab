// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shopping cart adapter. Mutations return `()` and callers refetch; the
//! cart is always read back from the server, never patched locally.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::api::endpoints;
use crate::error::ApiResult;
use crate::http::ApiClient;
use crate::query::{Page, PageSource, QueryDescriptor};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Cart line id (not the product id).
    pub id: u64,
    pub product_id: u64,
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub price: f64,
    pub quantity: u32,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    #[serde(default)]
    pub items: Vec<CartItem>,
    #[serde(default)]
    pub total_price: f64,
}

pub struct CartApi {
    client: Arc<ApiClient>,
}

impl CartApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// `GET /cart`: the authenticated user's cart.
    pub async fn get(&self) -> ApiResult<Cart> {
        let envelope = self.client.get(endpoints::CART, &[]).await?;
        envelope.data_as()
    }

    /// `POST /cart`.
    pub async fn add_item(&self, product_id: u64, quantity: u32) -> ApiResult<()> {
        self.client
            .post(
                endpoints::CART,
                &serde_json::json!({ "productId": product_id, "quantity": quantity }),
            )
            .await?;
        Ok(())
    }

    /// `PUT /cart/{itemId}?quantity=n`.
    pub async fn update_quantity(&self, item_id: u64, quantity: u32) -> ApiResult<()> {
        self.client
            .put(
                &endpoints::cart_item(item_id),
                &[("quantity".to_owned(), quantity.to_string())],
            )
            .await?;
        Ok(())
    }

    /// `DELETE /cart/{itemId}`.
    pub async fn remove_item(&self, item_id: u64) -> ApiResult<()> {
        self.client.delete(&endpoints::cart_item(item_id)).await?;
        Ok(())
    }

    /// `DELETE /cart`.
    pub async fn clear(&self) -> ApiResult<()> {
        self.client.delete(endpoints::CART).await?;
        Ok(())
    }
}

impl PageSource for CartApi {
    type Item = CartItem;

    // The cart has no server-side pagination; one page holds every line.
    async fn fetch_page(&self, _descriptor: &QueryDescriptor) -> ApiResult<Page<CartItem>> {
        Ok(Page::single(self.get().await?.items))
    }
}
