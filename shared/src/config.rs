use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE_URL: &str = "https://my-genius.it/wp-json/genius/v1";

/// Where filtered leave lists come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeaveSource {
    /// Query the dataset loaded at startup
    InMemory,
    /// Call the `get_leaves` endpoint
    Remote,
}

/// Configuration for the leave administration screen
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdminConfig {
    pub api_base_url: String,
    pub bearer_token: Option<String>,
    pub dataset_path: String,
    pub leave_source: LeaveSource,
    pub request_timeout_ms: u32,
    pub search_debounce_ms: u32,
    pub min_year: i32,
    pub max_year: i32,
    pub year_picker_window: i32,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            bearer_token: None,
            dataset_path: "mockdata/mockdata.JSON".to_string(),
            leave_source: LeaveSource::InMemory,
            request_timeout_ms: 30_000,
            search_debounce_ms: 2_000,
            min_year: 1900,
            max_year: 2100,
            year_picker_window: 12,
        }
    }
}

impl AdminConfig {
    /// Apply build-time overrides; blank values are ignored
    pub fn with_overrides(mut self, api_base_url: Option<&str>, bearer_token: Option<&str>) -> Self {
        if let Some(base) = api_base_url.map(str::trim).filter(|base| !base.is_empty()) {
            self.api_base_url = base.trim_end_matches('/').to_string();
        }
        if let Some(token) = bearer_token.map(str::trim).filter(|token| !token.is_empty()) {
            self.bearer_token = Some(token.to_string());
        }
        self
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base_url, path.trim_start_matches('/'))
    }
}
