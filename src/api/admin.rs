use serde::Serialize;

use super::ApiClient;
use crate::error::ApiError;
use crate::models::{Booking, Paginated, User};

#[derive(Debug, Clone, Copy, Serialize)]
pub struct PageQuery {
    pub page: u32,
}

// Admin-scoped variants of the user and booking resources. The server
// enforces the role; these calls simply 403 for everyone else.
impl ApiClient {
    pub async fn admin_users(&self, page: u32) -> Result<Paginated<User>, ApiError> {
        self.http.get_query("/admin/users", &PageQuery { page }).await
    }

    pub async fn set_user_active(&self, user_id: &str, active: bool) -> Result<User, ApiError> {
        self.http
            .put(
                &format!("/admin/users/{user_id}/status"),
                &serde_json::json!({ "active": active }),
            )
            .await
    }

    pub async fn admin_bookings(&self, page: u32) -> Result<Paginated<Booking>, ApiError> {
        self.http
            .get_query("/admin/bookings", &PageQuery { page })
            .await
    }
}
