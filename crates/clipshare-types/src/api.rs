use serde::{Deserialize, Serialize};

// -- Messages --

/// `content` is optional on the wire so a missing field reaches the
/// validation path instead of failing deserialization.
#[derive(Debug, Default, Deserialize)]
pub struct CreateMessageRequest {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetPinnedRequest {
    pub id: String,
    pub is_pinned: bool,
}

/// An absent `id` means "delete every message".
#[derive(Debug, Default, Deserialize)]
pub struct DeleteMessageRequest {
    #[serde(default)]
    pub id: Option<String>,
}

// -- Responses --

#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
