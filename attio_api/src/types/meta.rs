use serde::{Deserialize, Serialize};

/// One page of query results.
#[derive(Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub next_page_offset: Option<String>,
}
