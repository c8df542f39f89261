//! HTTP client for the catalogue service.
//!
//! The client mirrors the service's generated-client contract: list
//! endpoints return a JSON array plus an `x-total-count` header, mutations
//! go through `POST`/`PATCH`/`DELETE`, and every request carries an
//! `Authorization` header. The [`AuthGateway`] trait keeps the login flow
//! mockable in tests while [`CatalogClient`] handles real HTTP requests.

use async_trait::async_trait;
use http::StatusCode;
use reqwest::header::{AUTHORIZATION, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use super::error::{ApiError, prettify_error_detail};
use super::locator::{AccessToken, Resource, ServiceLocator};
use super::models::{ListPage, SalePopularityRow, TokenResponse, User};
use super::query::ListQuery;

/// Response header carrying the collection total for list endpoints.
pub const TOTAL_COUNT_HEADER: &str = "x-total-count";

/// Gateway for authentication operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Exchanges credentials for a bearer token.
    async fn login(&self, username: &str, password: &str) -> Result<TokenResponse, ApiError>;

    /// Returns the user owning the presented token.
    async fn current_user(&self) -> Result<User, ApiError>;
}

/// Reqwest-backed client for the catalogue service.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    locator: ServiceLocator,
    token: Option<AccessToken>,
}

impl CatalogClient {
    /// Creates a client for the given service locator and optional token.
    ///
    /// When no token is held the `Authorization` header is still sent, with
    /// an empty value; the service treats that as an anonymous request.
    #[must_use]
    pub fn new(locator: ServiceLocator, token: Option<AccessToken>) -> Self {
        Self {
            http: reqwest::Client::new(),
            locator,
            token,
        }
    }

    /// Returns the service locator the client was built with.
    #[must_use]
    pub const fn locator(&self) -> &ServiceLocator {
        &self.locator
    }

    /// Replaces the held token, e.g. after a successful login.
    pub fn set_token(&mut self, token: AccessToken) {
        self.token = Some(token);
    }

    fn authorization_value(&self) -> HeaderValue {
        match &self.token {
            // Tokens are validated to visible ASCII on construction, so the
            // fallback arm is never taken for a held token.
            Some(token) => HeaderValue::from_str(&format!("Bearer {}", token.value()))
                .unwrap_or_else(|_| HeaderValue::from_static("")),
            None => HeaderValue::from_static(""),
        }
    }

    fn request(&self, method: reqwest::Method, url: Url) -> reqwest::RequestBuilder {
        self.http
            .request(method, url)
            .header(AUTHORIZATION, self.authorization_value())
    }

    /// Fetches one page of records plus the collection total.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Network`] on transport failure and the mapped
    /// taxonomy error for non-success statuses. A success response without
    /// the `x-total-count` header is an [`ApiError::Api`].
    pub async fn list<T: DeserializeOwned>(
        &self,
        resource: Resource,
        query: &ListQuery,
    ) -> Result<ListPage<T>, ApiError> {
        let operation = format!("list {resource}");
        let url = self.locator.collection_url(resource);
        debug!(%resource, skip = query.skip(), limit = query.limit(), "listing records");

        let response = self
            .request(reqwest::Method::GET, url)
            .query(&query.to_pairs())
            .send()
            .await
            .map_err(|error| map_transport_error(&operation, &error))?;
        let response = check_status(&operation, response).await?;

        let total = parse_total_count(&operation, &response)?;
        let items: Vec<T> = decode_body(&operation, response).await?;
        Ok(ListPage { items, total })
    }

    /// Fetches a single record by identifier.
    ///
    /// # Errors
    ///
    /// Returns the mapped taxonomy error on failure.
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        resource: Resource,
        id: &str,
    ) -> Result<T, ApiError> {
        let operation = format!("fetch {resource} record");
        let response = self
            .request(reqwest::Method::GET, self.locator.record_url(resource, id))
            .send()
            .await
            .map_err(|error| map_transport_error(&operation, &error))?;
        let response = check_status(&operation, response).await?;
        decode_body(&operation, response).await
    }

    /// Creates a record and returns the stored representation.
    ///
    /// # Errors
    ///
    /// Returns the mapped taxonomy error on failure; validation failures
    /// surface as [`ApiError::Validation`].
    pub async fn create<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        resource: Resource,
        payload: &B,
    ) -> Result<T, ApiError> {
        let operation = format!("create {resource} record");
        let response = self
            .request(reqwest::Method::POST, self.locator.collection_url(resource))
            .json(payload)
            .send()
            .await
            .map_err(|error| map_transport_error(&operation, &error))?;
        let response = check_status(&operation, response).await?;
        decode_body(&operation, response).await
    }

    /// Applies a minimal patch to a record and returns the updated
    /// representation.
    ///
    /// Callers are expected to short-circuit empty patches before reaching
    /// the network; see [`crate::diff`].
    ///
    /// # Errors
    ///
    /// Returns the mapped taxonomy error on failure.
    pub async fn update<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        resource: Resource,
        id: &str,
        patch: &B,
    ) -> Result<T, ApiError> {
        let operation = format!("update {resource} record");
        let response = self
            .request(
                reqwest::Method::PATCH,
                self.locator.record_url(resource, id),
            )
            .json(patch)
            .send()
            .await
            .map_err(|error| map_transport_error(&operation, &error))?;
        let response = check_status(&operation, response).await?;
        decode_body(&operation, response).await
    }

    /// Deletes a single record.
    ///
    /// # Errors
    ///
    /// Returns the mapped taxonomy error on failure.
    pub async fn delete(&self, resource: Resource, id: &str) -> Result<(), ApiError> {
        let operation = format!("delete {resource} record");
        let response = self
            .request(
                reqwest::Method::DELETE,
                self.locator.record_url(resource, id),
            )
            .send()
            .await
            .map_err(|error| map_transport_error(&operation, &error))?;
        check_status(&operation, response).await.map(drop)
    }

    /// Deletes several records in one request (JSON array body of ids).
    ///
    /// # Errors
    ///
    /// Returns the mapped taxonomy error on failure.
    pub async fn delete_many(&self, resource: Resource, ids: &[String]) -> Result<(), ApiError> {
        let operation = format!("bulk delete {resource}");
        debug!(%resource, count = ids.len(), "bulk deleting records");
        let response = self
            .request(
                reqwest::Method::DELETE,
                self.locator.collection_url(resource),
            )
            .json(&ids)
            .send()
            .await
            .map_err(|error| map_transport_error(&operation, &error))?;
        check_status(&operation, response).await.map(drop)
    }

    /// Fetches the sale popularity statistics.
    ///
    /// # Errors
    ///
    /// Returns the mapped taxonomy error on failure.
    pub async fn popularity_statistics(&self) -> Result<Vec<SalePopularityRow>, ApiError> {
        let operation = "sale popularity statistics";
        let response = self
            .request(
                reqwest::Method::GET,
                self.locator.popularity_statistics_url(),
            )
            .send()
            .await
            .map_err(|error| map_transport_error(operation, &error))?;
        let response = check_status(operation, response).await?;
        decode_body(operation, response).await
    }
}

#[async_trait]
impl AuthGateway for CatalogClient {
    async fn login(&self, username: &str, password: &str) -> Result<TokenResponse, ApiError> {
        let operation = "login";
        let form = [("username", username), ("password", password)];
        let response = self
            .request(reqwest::Method::POST, self.locator.access_token_url())
            .form(&form)
            .send()
            .await
            .map_err(|error| map_transport_error(operation, &error))?;
        let response = check_status(operation, response).await?;
        decode_body(operation, response).await
    }

    async fn current_user(&self) -> Result<User, ApiError> {
        let operation = "current user";
        let response = self
            .request(reqwest::Method::POST, self.locator.test_token_url())
            .send()
            .await
            .map_err(|error| map_transport_error(operation, &error))?;
        let response = check_status(operation, response).await?;
        decode_body(operation, response).await
    }
}

// --- Response handling helpers ---

/// Maps a non-success response into the error taxonomy, consuming the body
/// for its detail message. Success responses pass through untouched.
async fn check_status(
    operation: &str,
    response: reqwest::Response,
) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let detail = extract_detail(&body).unwrap_or_else(|| body.clone());
    debug!(%operation, status = status.as_u16(), "request failed");

    if status == StatusCode::UNPROCESSABLE_ENTITY {
        return Err(ApiError::Validation {
            detail: prettify_error_detail(&detail),
        });
    }
    if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
        return Err(ApiError::Authentication {
            message: format!("{operation} failed: {detail}"),
        });
    }
    Err(ApiError::Api {
        status: status.as_u16(),
        message: format!("{operation} failed: {detail}"),
    })
}

fn map_transport_error(operation: &str, error: &reqwest::Error) -> ApiError {
    ApiError::Network {
        message: format!("{operation} failed: {error}"),
    }
}

async fn decode_body<T: DeserializeOwned>(
    operation: &str,
    response: reqwest::Response,
) -> Result<T, ApiError> {
    let status = response.status().as_u16();
    response.json::<T>().await.map_err(|error| ApiError::Api {
        status,
        message: format!("{operation} response deserialisation failed: {error}"),
    })
}

fn parse_total_count(operation: &str, response: &reqwest::Response) -> Result<u64, ApiError> {
    let status = response.status().as_u16();
    let raw = response
        .headers()
        .get(TOTAL_COUNT_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| ApiError::Api {
            status,
            message: format!("{operation} response is missing the {TOTAL_COUNT_HEADER} header"),
        })?;
    raw.parse::<u64>().map_err(|_| ApiError::Api {
        status,
        message: format!("{operation} returned a malformed {TOTAL_COUNT_HEADER}: {raw}"),
    })
}

/// Pulls the `detail` field out of a service error body when present.
///
/// FastAPI-style services return `{"detail": <string or structure>}`;
/// structured details are re-serialised verbatim.
fn extract_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::String(text) => Some(text.clone()),
        other => serde_json::to_string(other).ok(),
    }
}
