// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User directory and profile adapter (admin console surface).
//!
//! The directory search carries its criteria as a structured body, too
//! much for a query string, so it goes through the client's GET-with-body
//! path and reaches the wire as POST plus the method-override marker.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::api::{endpoints, PagePayload};
use crate::error::ApiResult;
use crate::http::ApiClient;
use crate::query::{Page, PageSource, QueryDescriptor};

/// Filter names understood by the user directory search.
pub mod filters {
    pub const NAME: &str = "name";
    pub const EMAIL: &str = "email";
    pub const PHONE: &str = "phone";
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u64,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub is_active: bool,
}

/// Directory search criteria as the backend expects them. The descriptor's
/// `name` filter maps to the backend's `search` field.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct UserCriteria {
    current_page: u32,
    page_size: u32,
    search: String,
    email: String,
    phone: String,
}

impl UserCriteria {
    fn from_descriptor(descriptor: &QueryDescriptor) -> Self {
        Self {
            current_page: descriptor.page,
            page_size: descriptor.page_size,
            search: descriptor.filter(filters::NAME).unwrap_or_default().to_owned(),
            email: descriptor.filter(filters::EMAIL).unwrap_or_default().to_owned(),
            phone: descriptor.filter(filters::PHONE).unwrap_or_default().to_owned(),
        }
    }
}

/// New user created from the admin console.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Profile fields the user can edit.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
}

pub struct UserApi {
    client: Arc<ApiClient>,
}

impl UserApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Paged directory search: `POST /users` with the method-override
    /// marker; semantically a GET. Admin only.
    pub async fn search(&self, descriptor: &QueryDescriptor) -> ApiResult<Page<User>> {
        let criteria = UserCriteria::from_descriptor(descriptor);
        let envelope = self.client.get_with_body(endpoints::USERS, &criteria).await?;
        let payload: PagePayload<User> = envelope.data_as()?;
        Ok(payload.into_page())
    }

    /// `GET /users/profile`.
    pub async fn profile(&self) -> ApiResult<User> {
        let envelope = self.client.get(endpoints::USER_PROFILE, &[]).await?;
        envelope.data_as()
    }

    /// `PUT /users/profile`.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> ApiResult<User> {
        let envelope = self.client.put_json(endpoints::USER_PROFILE, update).await?;
        envelope.data_as()
    }

    /// `POST /users`: create a user from the admin console.
    pub async fn create(&self, user: &NewUser) -> ApiResult<User> {
        let envelope = self.client.post(endpoints::USERS, user).await?;
        envelope.data_as()
    }

    /// `PUT /users/{id}/activate`. Admin only.
    pub async fn activate(&self, id: u64) -> ApiResult<()> {
        self.client.put(&endpoints::user_activate(id), &[]).await?;
        Ok(())
    }

    /// `DELETE /users/{id}`: deactivate. Admin only.
    pub async fn deactivate(&self, id: u64) -> ApiResult<()> {
        self.client.delete(&endpoints::user(id)).await?;
        Ok(())
    }
}

impl PageSource for UserApi {
    type Item = User;

    async fn fetch_page(&self, descriptor: &QueryDescriptor) -> ApiResult<Page<User>> {
        self.search(descriptor).await
    }
}
