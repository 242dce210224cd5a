//! Request/response transport to the widget API.
//!
//! [`WidgetApi`] is the seam the service talks through; [`HttpWidgetApi`]
//! implements it over HTTP with [`reqwest`].

use async_trait::async_trait;
use insight_core::types::DbId;
use insight_core::widget::{NewWidget, ReorderRequest, Widget, WidgetPatch};
use serde::Deserialize;

use crate::config::ClientConfig;
use crate::error::ClientError;

/// Operations the widget API exposes to the client.
#[async_trait]
pub trait WidgetApi: Send + Sync {
    /// `GET /api/widgets?userId=`
    async fn list_widgets(&self, user_id: DbId) -> Result<Vec<Widget>, ClientError>;

    /// `POST /api/widgets`
    async fn create_widget(&self, input: &NewWidget) -> Result<Widget, ClientError>;

    /// `PUT /api/widgets/{id}`
    async fn update_widget(&self, id: DbId, patch: &WidgetPatch) -> Result<Widget, ClientError>;

    /// `DELETE /api/widgets/{id}`; `false` when there was nothing to delete.
    async fn delete_widget(&self, id: DbId) -> Result<bool, ClientError>;

    /// `PUT /api/widgets/positions`
    async fn set_positions(&self, request: &ReorderRequest) -> Result<Vec<Widget>, ClientError>;
}

#[derive(Debug, Deserialize)]
struct WidgetList {
    widgets: Vec<Widget>,
}

#[derive(Debug, Deserialize)]
struct DeleteResult {
    success: bool,
}

/// HTTP client for the widget API.
pub struct HttpWidgetApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpWidgetApi {
    /// * `base_url` - e.g. `http://localhost:3000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Reuse an existing [`reqwest::Client`] (shared connection pool).
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.base_url.clone())
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    /// Return the response unchanged on success, or the classified error.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::from_status(status.as_u16(), &body));
        }
        Ok(response)
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl WidgetApi for HttpWidgetApi {
    async fn list_widgets(&self, user_id: DbId) -> Result<Vec<Widget>, ClientError> {
        let response = self
            .client
            .get(self.url("/widgets"))
            .query(&[("userId", user_id)])
            .send()
            .await?;

        let list: WidgetList = Self::parse_response(response).await?;
        Ok(list.widgets)
    }

    async fn create_widget(&self, input: &NewWidget) -> Result<Widget, ClientError> {
        let response = self
            .client
            .post(self.url("/widgets"))
            .json(input)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    async fn update_widget(&self, id: DbId, patch: &WidgetPatch) -> Result<Widget, ClientError> {
        let response = self
            .client
            .put(self.url(&format!("/widgets/{id}")))
            .json(patch)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    async fn delete_widget(&self, id: DbId) -> Result<bool, ClientError> {
        let response = self
            .client
            .delete(self.url(&format!("/widgets/{id}")))
            .send()
            .await?;

        let result: DeleteResult = Self::parse_response(response).await?;
        Ok(result.success)
    }

    async fn set_positions(&self, request: &ReorderRequest) -> Result<Vec<Widget>, ClientError> {
        let response = self
            .client
            .put(self.url("/widgets/positions"))
            .json(request)
            .send()
            .await?;

        let list: WidgetList = Self::parse_response(response).await?;
        Ok(list.widgets)
    }
}
