//! Single-request execution with normalized failure handling.
//!
//! One HTTP call per invocation: 2xx responses deserialize into typed
//! values, everything else becomes an [`ApiError`] carrying the request
//! URL and payload for diagnostics. Retries and authentication live
//! elsewhere; the only error this layer swallows is the 404 case in
//! [`RequestExecutor::get_by_id`].

use reqwest::header::HeaderMap;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error, warn};

use super::error::ApiError;

/// Executes single HTTP requests against the swarm memory service.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub(crate) struct RequestExecutor {
    client: Client,
}

impl RequestExecutor {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// GET a typed value.
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        url: &str,
        headers: HeaderMap,
    ) -> Result<T, ApiError> {
        self.execute(self.client.get(url).headers(headers), url, None)
            .await
    }

    /// GET a typed value with query parameters serialized from `query`.
    /// `None` fields in the params struct are omitted from the query string.
    pub(crate) async fn get_with_query<T, Q>(
        &self,
        url: &str,
        query: &Q,
        headers: HeaderMap,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.execute(self.client.get(url).query(query).headers(headers), url, None)
            .await
    }

    /// POST a JSON body (or nothing) and deserialize the response.
    pub(crate) async fn post<T, B>(
        &self,
        url: &str,
        body: Option<&B>,
        headers: HeaderMap,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let payload = body.and_then(|b| serde_json::to_string(b).ok());
        let mut request = self.client.post(url).headers(headers);
        if let Some(body) = body {
            request = request.json(body);
        }
        self.execute(request, url, payload).await
    }

    /// POST where the response body is empty or `null` and is discarded.
    pub(crate) async fn post_no_content<B>(
        &self,
        url: &str,
        body: Option<&B>,
        headers: HeaderMap,
    ) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized,
    {
        let payload = body.and_then(|b| serde_json::to_string(b).ok());
        let mut request = self.client.post(url).headers(headers);
        if let Some(body) = body {
            request = request.json(body);
        }
        self.send(request, url, payload.as_deref()).await?;
        Ok(())
    }

    /// GET by ID, treating 404 as "entity does not exist".
    ///
    /// Branches on the typed status code of the failure, never on message
    /// text; every failure other than 404 propagates unchanged.
    pub(crate) async fn get_by_id<T: DeserializeOwned>(
        &self,
        entity: &str,
        id: &str,
        url: &str,
        headers: HeaderMap,
    ) -> Result<Option<T>, ApiError> {
        match self.get(url, headers).await {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.is_not_found() => {
                warn!(entity = entity, id = id, "{} with ID {} not found", entity, id);
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        url: &str,
        payload: Option<String>,
    ) -> Result<T, ApiError> {
        let response = self.send(request, url, payload.as_deref()).await?;
        let url = response.url().to_string();
        let text = response.text().await.map_err(|err| ApiError::Network {
            url: url.clone(),
            source: err,
        })?;
        serde_json::from_str(&text).map_err(|err| {
            error!(url = %url, "failed to decode response body: {}", err);
            ApiError::InvalidResponse {
                url,
                reason: err.to_string(),
            }
        })
    }

    /// Send one request and check its status, logging any failure together
    /// with the URL and payload that produced it.
    async fn send(
        &self,
        request: RequestBuilder,
        url: &str,
        payload: Option<&str>,
    ) -> Result<Response, ApiError> {
        let request = request.build().map_err(|err| ApiError::Network {
            url: url.to_string(),
            source: err,
        })?;
        let full_url = request.url().to_string();
        debug!(url = %full_url, payload, "sending request");

        let response = self.client.execute(request).await.map_err(|err| {
            error!(url = %full_url, payload, "{}. Server response: <none>", err);
            ApiError::Network {
                url: full_url.clone(),
                source: err,
            }
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.ok().filter(|b| !b.is_empty());
        error!(
            url = %full_url,
            payload,
            "request failed with status {}. Server response: {}",
            status,
            body.as_deref().unwrap_or("<none>")
        );
        Err(ApiError::from_status(status, &full_url, body.as_deref()))
    }
}
