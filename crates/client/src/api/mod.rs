// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resource service adapters over the backend REST API.
//!
//! One module per backend resource family; each function maps one intent to
//! one HTTP call plus payload conversion. Descriptor state and error
//! normalization live elsewhere ([`crate::query`], [`crate::http`]); these
//! adapters stay thin.

pub mod auth;
pub mod cart;
pub mod categories;
pub mod products;
pub mod users;

use serde::Deserialize;

use crate::query::Page;

/// Backend endpoint paths.
pub mod endpoints {
    pub const LOGIN: &str = "/users/login";
    pub const REGISTER: &str = "/users/register";
    pub const LOGOUT: &str = "/users/logout";
    pub const FORGOT_PASSWORD: &str = "/users/forgot-password";
    pub const VERIFY_OTP: &str = "/users/verify-otp";
    pub const CHANGE_PASSWORD: &str = "/users/change-password";
    pub const ME: &str = "/users/me";

    pub const USERS: &str = "/users";
    pub const USER_PROFILE: &str = "/users/profile";
    pub fn user(id: u64) -> String {
        format!("/users/{id}")
    }
    pub fn user_activate(id: u64) -> String {
        format!("/users/{id}/activate")
    }

    pub const PRODUCTS: &str = "/products";
    pub fn product(id: u64) -> String {
        format!("/products/{id}")
    }
    pub fn product_rate(id: u64) -> String {
        format!("/products/{id}/rate")
    }

    pub const CATEGORIES: &str = "/categories";
    pub fn category(id: u64) -> String {
        format!("/categories/{id}")
    }

    pub const CART: &str = "/cart";
    pub fn cart_item(id: u64) -> String {
        format!("/cart/{id}")
    }
}

/// Page payload shape returned by paginated endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PagePayload<T> {
    #[serde(default = "Vec::new")]
    pub content: Vec<T>,
    #[serde(default)]
    pub total_elements: u64,
    /// Zero-based page index.
    #[serde(default)]
    pub number: u32,
    #[serde(default)]
    pub size: u32,
}

impl<T> PagePayload<T> {
    /// Convert to the client-side page shape. `total_pages` is re-derived
    /// from the count and size so the ceil invariant holds even when the
    /// backend omits it.
    pub fn into_page(self) -> Page<T> {
        let size = if self.size == 0 { self.content.len().max(1) as u32 } else { self.size };
        Page::new(self.content, self.total_elements, self.number, size)
    }
}
