//! HTTP implementation of [`TableApi`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::Method;
use reqwest::RequestBuilder;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

use super::TableApi;
use crate::error::FetchError;
use crate::model::PageToken;
use crate::model::ResourceItem;
use crate::model::ResourceName;
use crate::model::TableField;
use crate::model::TableHeader;
use crate::query::Params;

/// Talks to a table server over HTTP.
///
/// This client is cheap to clone (uses `Arc` internally).
///
/// Endpoints, relative to the base URL:
///
/// - `GET api/{resource}/resource/table?{params}`
/// - `GET api/{resource}/resource/table/rows/page?pageToken={token}`
/// - `PATCH api/{resource}/resource/item`
///
/// # Example
///
/// ```ignore
/// use resource_table_lib::api::HttpTableApi;
///
/// let api = HttpTableApi::builder()
///     .url("http://localhost:3000")
///     .timeout(Duration::from_secs(30))
///     .build()?;
/// ```
#[derive(Clone)]
pub struct HttpTableApi {
    inner: Arc<HttpTableApiInner>,
}

struct HttpTableApiInner {
    base_url: Url,
    http_client: Client,
    timeout: Option<Duration>,
}

#[derive(Debug, Deserialize)]
struct RowsPageBody {
    items: Vec<ResourceItem>,
}

impl HttpTableApi {
    /// Creates a new builder.
    pub fn builder() -> HttpTableApiBuilder<Missing> {
        HttpTableApiBuilder::new()
    }

    /// Returns the base URL.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    fn endpoint(&self, resource: &ResourceName, segments: &[&str]) -> Result<Url, FetchError> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::InvalidUrl(self.inner.base_url.to_string()))?
            .pop_if_empty()
            .push("api")
            .push(resource.as_str())
            .extend(segments);
        Ok(url)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, FetchError> {
        let request = match self.inner.timeout {
            Some(timeout) => request.timeout(timeout),
            None => request,
        };

        let response = request.send().await.map_err(|e| self.map_error(e))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| self.map_error(e))?;

        if !status.is_success() {
            return Err(FetchError::http(status.as_u16(), body));
        }

        serde_json::from_str(&body).map_err(|e| FetchError::parse_with_body(e.to_string(), body))
    }

    fn map_error(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout(self.inner.timeout.unwrap_or_default())
        } else {
            FetchError::from(err)
        }
    }
}

#[async_trait]
impl TableApi for HttpTableApi {
    async fn fetch_table(
        &self,
        resource: &ResourceName,
        params: &Params,
    ) -> Result<TableHeader, FetchError> {
        let mut url = self.endpoint(resource, &["resource", "table"])?;
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params.iter());
        }
        log::debug!("GET {url}");
        self.send(self.inner.http_client.request(Method::GET, url)).await
    }

    async fn fetch_page(
        &self,
        resource: &ResourceName,
        token: &PageToken,
    ) -> Result<Vec<ResourceItem>, FetchError> {
        let mut url = self.endpoint(resource, &["resource", "table", "rows", "page"])?;
        url.query_pairs_mut().append_pair("pageToken", token.as_str());
        log::debug!("GET {url}");
        let body: RowsPageBody = self
            .send(self.inner.http_client.request(Method::GET, url))
            .await?;
        Ok(body.items)
    }

    async fn patch_field(
        &self,
        resource: &ResourceName,
        field: &TableField,
    ) -> Result<ResourceItem, FetchError> {
        let url = self.endpoint(resource, &["resource", "item"])?;
        log::debug!("PATCH {url} ({})", field.path);
        self.send(self.inner.http_client.request(Method::PATCH, url).json(field))
            .await
    }
}

// =============================================================================
// Typestate Builder
// =============================================================================

/// Marker type for missing required builder fields.
pub struct Missing;

/// Marker type for set builder fields.
pub struct Set<T>(T);

/// Builder for constructing an [`HttpTableApi`].
///
/// The base URL is required and enforced at compile time.
pub struct HttpTableApiBuilder<U> {
    url: U,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    http_client: Option<Client>,
}

impl HttpTableApiBuilder<Missing> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            url: Missing,
            timeout: None,
            connect_timeout: None,
            http_client: None,
        }
    }

    /// Sets the server base URL.
    pub fn url(self, url: impl Into<String>) -> HttpTableApiBuilder<Set<String>> {
        HttpTableApiBuilder {
            url: Set(url.into()),
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            http_client: self.http_client,
        }
    }
}

impl Default for HttpTableApiBuilder<Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U> HttpTableApiBuilder<U> {
    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connection timeout.
    ///
    /// Ignored when a custom HTTP client is supplied.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets a custom HTTP client.
    pub fn http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }
}

impl HttpTableApiBuilder<Set<String>> {
    /// Builds the [`HttpTableApi`].
    pub fn build(self) -> Result<HttpTableApi, FetchError> {
        let base_url = Url::parse(&self.url.0)?;
        let http_client = match self.http_client {
            Some(client) => client,
            None => {
                let mut builder = Client::builder();
                if let Some(timeout) = self.connect_timeout {
                    builder = builder.connect_timeout(timeout);
                }
                builder.build().map_err(FetchError::from)?
            }
        };

        Ok(HttpTableApi {
            inner: Arc::new(HttpTableApiInner {
                base_url,
                http_client,
                timeout: self.timeout,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_paths() {
        let api = HttpTableApi::builder()
            .url("http://localhost:3000/")
            .build()
            .unwrap();
        let url = api
            .endpoint(&ResourceName::new("users"), &["resource", "table", "rows", "page"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:3000/api/users/resource/table/rows/page"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let api = HttpTableApi::builder()
            .url("http://example.com/app")
            .build()
            .unwrap();
        let url = api
            .endpoint(&ResourceName::new("a b"), &["resource", "item"])
            .unwrap();
        assert_eq!(url.as_str(), "http://example.com/app/api/a%20b/resource/item");
    }

    #[test]
    fn test_invalid_base_url() {
        let result = HttpTableApi::builder().url("not a url").build();
        assert!(matches!(result, Err(FetchError::InvalidUrl(_))));
    }
}
