use serde::Serialize;

use super::ApiClient;
use crate::error::ApiError;
use crate::models::User;

/// Partial update; unset fields are left untouched server-side.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl ApiClient {
    pub async fn user(&self, id: &str) -> Result<User, ApiError> {
        self.http.get(&format!("/users/{id}")).await
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, ApiError> {
        self.http.put("/users/me", update).await
    }
}
