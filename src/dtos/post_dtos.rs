use serde::{Deserialize, Serialize};

/// Form body of `POST /new`.
#[derive(Debug, Deserialize)]
pub struct NewPostForm {
    pub content: String,
}

/// JSON body of `POST /posts/{id}/edit`.
#[derive(Debug, Deserialize)]
pub struct EditPostIn {
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct EditPostOut {
    pub message: String,
    pub data: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LikeOut {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub like_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl LikeOut {
    pub fn failure(message: &str) -> Self {
        Self {
            success: false,
            like_count: None,
            action: None,
            message: Some(message.to_string()),
        }
    }
}
