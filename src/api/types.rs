use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::MediaId;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// `?page=` for paginated listings, one-based.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MediaListQuery {
    #[serde(rename = "type")]
    pub media_type: Option<String>,
    pub query: Option<String>,
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(rename = "type")]
    pub search_type: Option<String>,
    #[serde(default)]
    pub query: String,
    pub page: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct LinkRequest {
    pub other_id: MediaId,
    pub kind: crate::domain::LinkKind,
}

/// Body of `PUT /api/lists/{media_id}`. An explicit `"score": null` clears
/// the score; omitting it leaves the score alone.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateEntryRequest {
    #[serde(default, deserialize_with = "present")]
    pub score: Option<Option<f64>>,
    pub progress: Option<i32>,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub page: u64,
    pub page_size: u64,
    pub total: u64,
    pub items: Vec<T>,
}

#[derive(Debug, Serialize)]
pub struct SystemStatus {
    pub version: String,
    pub uptime: u64,
    pub users: u64,
    pub films: u64,
    pub series: u64,
    pub books: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_request_distinguishes_null_from_missing() {
        let req: UpdateEntryRequest = serde_json::from_str(r#"{"score": null}"#).unwrap();
        assert_eq!(req.score, Some(None));

        let req: UpdateEntryRequest = serde_json::from_str(r#"{"progress": 3}"#).unwrap();
        assert_eq!(req.score, None);
        assert_eq!(req.progress, Some(3));

        let req: UpdateEntryRequest = serde_json::from_str(r#"{"score": 7.5}"#).unwrap();
        assert_eq!(req.score, Some(Some(7.5)));
    }
}
