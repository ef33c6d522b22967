use serde::Serialize;

use super::ApiClient;
use crate::error::ApiError;
use crate::models::{Conversation, Message};

/// Either continues an existing conversation or opens one with a
/// recipient (optionally anchored to a listing enquiry).
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutgoingMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listing_id: Option<String>,
    pub body: String,
}

impl ApiClient {
    pub async fn conversations(&self) -> Result<Vec<Conversation>, ApiError> {
        self.http.get("/messages/conversations").await
    }

    pub async fn conversation_messages(
        &self,
        conversation_id: &str,
    ) -> Result<Vec<Message>, ApiError> {
        self.http
            .get(&format!("/messages/conversations/{conversation_id}"))
            .await
    }

    pub async fn send_message(&self, message: &OutgoingMessage) -> Result<Message, ApiError> {
        self.http.post("/messages", message).await
    }
}
