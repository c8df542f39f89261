//! CLI operation handlers.
//!
//! This module contains the implementations for the operation modes:
//! - [`auth`]: Login, logout, and identity reporting
//! - [`listing`]: Paginated listings and single-record show
//! - [`mutation`]: Create, update, and delete (single and bulk)
//! - [`stats`]: Sale popularity statistics
//!
//! Payload construction from field assignments lives in [`forms`]; output
//! formatting utilities are in [`output`].

use curator::{
    AccessToken, ApiError, AppContext, AuthGateway, CatalogClient, CuratorConfig, ServiceLocator,
    TokenStore,
};

pub mod auth;
pub mod forms;
pub mod listing;
pub mod mutation;
pub mod output;
pub mod stats;

/// Resolves the token for this run: an explicit `--token` wins over the
/// persisted one; absence is not an error, requests go out anonymously.
pub(crate) fn resolve_token(config: &CuratorConfig) -> Result<Option<AccessToken>, ApiError> {
    if let Some(value) = config.token.as_deref() {
        return AccessToken::new(value).map(Some);
    }
    TokenStore::from_environment()?.load()
}

/// Builds the service client from the configured base URL and token.
pub(crate) fn build_client(config: &CuratorConfig) -> Result<CatalogClient, ApiError> {
    let locator = ServiceLocator::parse(config.require_api_base_url()?)?;
    Ok(CatalogClient::new(locator, resolve_token(config)?))
}

/// Builds the client and application context for a mutating run.
///
/// The token is resolved exactly once; when one is held, the signed-in
/// identity is fetched so mutating operations can gate on the superuser
/// role.
pub(crate) async fn connect(
    config: &CuratorConfig,
) -> Result<(CatalogClient, AppContext), ApiError> {
    let token = resolve_token(config)?;
    let authenticated = token.is_some();
    let locator = ServiceLocator::parse(config.require_api_base_url()?)?;
    let client = CatalogClient::new(locator, token);

    let mut context = AppContext::new();
    if authenticated {
        context.session.login(client.current_user().await?);
    }
    Ok((client, context))
}

#[cfg(test)]
mod tests {
    use curator::CuratorConfig;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::connect;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[tokio::test]
    async fn connect_resolves_the_identity_exactly_once() -> TestResult {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "u-1",
                "username": "sam",
                "email": "sam@example.com",
                "is_superuser": true,
                "is_primary": false,
                "created_at": "2022-05-01T12:00:00Z"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let config = CuratorConfig {
            api_base_url: Some(server.uri()),
            token: Some("tok-42".to_owned()),
            ..Default::default()
        };

        let (_client, context) = connect(&config).await?;
        if !context.session.is_superuser() {
            return Err("connect should resolve the signed-in identity".into());
        }
        server.verify().await;

        Ok(())
    }

    #[tokio::test]
    async fn connect_without_a_token_issues_no_identity_request() -> TestResult {
        // No mocks are mounted: any request would 404 and fail the connect.
        let server = MockServer::start().await;
        let state_dir = tempfile::TempDir::new()?;
        let _guard = env_lock::lock_env([(
            "XDG_STATE_HOME",
            Some(state_dir.path().to_str().ok_or("state dir must be UTF-8")?),
        )]);

        let config = CuratorConfig {
            api_base_url: Some(server.uri()),
            ..Default::default()
        };

        let (_client, context) = connect(&config).await?;
        if context.session.is_authenticated() {
            return Err("an anonymous run must not sign anyone in".into());
        }

        Ok(())
    }
}
