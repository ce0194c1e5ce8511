use futures::future::{select, Either};
use gloo::net::http::{Request, RequestBuilder, Response};
use gloo::timers::future::TimeoutFuture;
use serde::de::DeserializeOwned;
use shared::config::LeaveSource;
use shared::filters::run_leave_query;
use shared::inps::parse_dataset;
use shared::{
    AdminConfig, LeaveAdminError, LeaveAdminScreenConfig, LeaveListResponse, LeaveQuery,
    LeaveRequest,
};

use crate::services::logging::Logger;

/// Configuration with the build-time overrides applied
pub fn runtime_config() -> AdminConfig {
    let mut config = AdminConfig::default().with_overrides(
        option_env!("LEAVE_ADMIN_API_BASE"),
        option_env!("LEAVE_ADMIN_API_TOKEN"),
    );
    if option_env!("LEAVE_ADMIN_REMOTE_LEAVES") == Some("1") {
        config.leave_source = LeaveSource::Remote;
    }
    config
}

/// API client for the HR endpoints and the certificate dataset
#[derive(Clone, PartialEq)]
pub struct ApiClient {
    config: AdminConfig,
}

impl ApiClient {
    pub fn from_config(config: &AdminConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        self.config.endpoint(path)
    }

    /// Load and normalize the INPS certificate dataset
    pub async fn load_dataset(&self) -> Result<Vec<LeaveRequest>, LeaveAdminError> {
        let response = self.send(Request::get(&self.config.dataset_path)).await?;
        let body = response
            .text()
            .await
            .map_err(|e| LeaveAdminError::Network(e.to_string()))?;
        parse_dataset(&body)
    }

    /// Filter lists for the screen (types, departments, tasks)
    pub async fn fetch_screen_config(&self) -> Result<LeaveAdminScreenConfig, LeaveAdminError> {
        let url = self.endpoint("leave_admin_screen_config");
        let response = self.send(Request::get(&url)).await?;
        Self::parse_json(response).await
    }

    /// Run a leave query against the configured source
    pub async fn query_leaves(
        &self,
        dataset: &[LeaveRequest],
        query: &LeaveQuery,
    ) -> Result<Vec<LeaveRequest>, LeaveAdminError> {
        match self.config.leave_source {
            LeaveSource::InMemory => Ok(run_leave_query(dataset, query)),
            LeaveSource::Remote => self.get_leaves(query).await,
        }
    }

    /// `GET get_leaves`; accepts a bare array or an `{ items }` envelope
    pub async fn get_leaves(&self, query: &LeaveQuery) -> Result<Vec<LeaveRequest>, LeaveAdminError> {
        let url = self.endpoint("get_leaves");
        let request = Request::get(&url).query(query.to_query_pairs());
        let response = self.send(request).await?;
        let body = response
            .text()
            .await
            .map_err(|e| LeaveAdminError::Network(e.to_string()))?;

        match serde_json::from_str::<Vec<LeaveRequest>>(&body) {
            Ok(items) => Ok(items),
            Err(_) => Ok(serde_json::from_str::<LeaveListResponse>(&body)?.items),
        }
    }

    /// Send with the bearer token, racing the request against the timeout
    async fn send(&self, request: RequestBuilder) -> Result<Response, LeaveAdminError> {
        let request = match &self.config.bearer_token {
            Some(token) => request.header("Authorization", &format!("Bearer {}", token)),
            None => request,
        };

        let response = request.send();
        let timeout = TimeoutFuture::new(self.config.request_timeout_ms);
        futures::pin_mut!(response, timeout);

        match select(response, timeout).await {
            Either::Left((result, _)) => {
                let response = result.map_err(|e| LeaveAdminError::Network(e.to_string()))?;
                if response.ok() {
                    Ok(response)
                } else {
                    Err(LeaveAdminError::Http {
                        status: response.status(),
                        status_text: response.status_text(),
                    })
                }
            }
            Either::Right(_) => {
                Logger::warn_with_component(
                    "api",
                    &format!("⏱️ Request timed out after {} ms", self.config.request_timeout_ms),
                );
                Err(LeaveAdminError::Timeout(self.config.request_timeout_ms))
            }
        }
    }

    async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T, LeaveAdminError> {
        let body = response
            .text()
            .await
            .map_err(|e| LeaveAdminError::Network(e.to_string()))?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::filters::day_query;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_endpoint_join() {
        let client = ApiClient::from_config(&AdminConfig::default());
        assert_eq!(
            client.endpoint("/get_leaves"),
            "https://my-genius.it/wp-json/genius/v1/get_leaves"
        );
    }

    #[wasm_bindgen_test]
    async fn test_in_memory_query_skips_network() {
        let client = ApiClient::from_config(&AdminConfig::default());
        let query = day_query(chrono::NaiveDate::from_ymd_opt(2025, 1, 22).unwrap());
        let rows = client.query_leaves(&[], &query).await.unwrap();
        assert!(rows.is_empty());
    }
}
