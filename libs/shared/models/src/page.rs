use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Paginated list body as returned by the API.
///
/// Fields the client does not model (`pageable`, `sort`, ...) are kept in
/// `extra` so the body is handed back exactly as received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    #[serde(default)]
    pub total_elements: u64,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub number: u32,
    #[serde(default)]
    pub size: u32,
    #[serde(default)]
    pub first: bool,
    #[serde(default)]
    pub last: bool,
    #[serde(default)]
    pub empty: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        !self.last && self.number.saturating_add(1) < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        !self.first && self.number > 0
    }
}
