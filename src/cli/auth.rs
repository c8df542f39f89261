//! Login, logout, and identity operations.

use std::io::{self, Write};

use curator::{
    AccessToken, ApiError, AuthGateway, CatalogClient, CuratorConfig, ServiceLocator, TokenStore,
};

use super::output::{io_error, write_identity};

/// Exchanges credentials for a token, persists it, and reports the
/// signed-in identity.
///
/// # Errors
///
/// Returns [`ApiError::Configuration`] when credentials are missing and
/// [`ApiError::Authentication`] when the service rejects them.
pub async fn run_login(config: &CuratorConfig) -> Result<(), ApiError> {
    let mut stdout = io::stdout().lock();
    let store = TokenStore::from_environment()?;
    let locator = ServiceLocator::parse(config.require_api_base_url()?)?;
    login_with_gateway_builder(
        config,
        |token| Ok(CatalogClient::new(locator.clone(), token)),
        &store,
        &mut stdout,
    )
    .await
}

/// Runs the login flow using a custom gateway builder.
///
/// The builder is called twice: once without a token for the credential
/// exchange, then with the issued token to resolve the identity. This
/// function is exposed for testing with stub gateways.
pub async fn login_with_gateway_builder<G, F, W>(
    config: &CuratorConfig,
    build_gateway: F,
    store: &TokenStore,
    writer: &mut W,
) -> Result<(), ApiError>
where
    G: AuthGateway,
    F: Fn(Option<AccessToken>) -> Result<G, ApiError>,
    W: Write,
{
    let (username, password) = config.require_credentials()?;

    let anonymous = build_gateway(None)?;
    let issued = anonymous.login(username, password).await?;
    let token = AccessToken::new(issued.access_token)?;
    store.save(&token)?;

    let authenticated = build_gateway(Some(token))?;
    let me = authenticated.current_user().await?;
    write_identity(writer, &me)
}

/// Discards the persisted token.
///
/// # Errors
///
/// Returns [`ApiError::Io`] when the token file cannot be removed.
pub fn run_logout() -> Result<(), ApiError> {
    let mut stdout = io::stdout().lock();
    let store = TokenStore::from_environment()?;
    logout(&store, &mut stdout)
}

/// Removes the stored token and confirms. Exposed for testing.
pub fn logout<W: Write>(store: &TokenStore, writer: &mut W) -> Result<(), ApiError> {
    store.clear()?;
    writeln!(writer, "Signed out.").map_err(|e| io_error(&e))
}

/// Reports the identity owning the current token.
///
/// # Errors
///
/// Returns [`ApiError::Authentication`] when the service rejects the token
/// (or its absence).
pub async fn run_whoami(config: &CuratorConfig) -> Result<(), ApiError> {
    let mut stdout = io::stdout().lock();
    let client = super::build_client(config)?;
    whoami_with_gateway(&client, &mut stdout).await
}

/// Resolves and writes the current identity. Exposed for testing.
pub async fn whoami_with_gateway<G: AuthGateway, W: Write>(
    gateway: &G,
    writer: &mut W,
) -> Result<(), ApiError> {
    let me = gateway.current_user().await?;
    write_identity(writer, &me)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::Utc;
    use camino::Utf8PathBuf;
    use curator::api::models::{TokenResponse, User};
    use curator::{AccessToken, ApiError, AuthGateway, CuratorConfig, TokenStore};
    use tempfile::TempDir;

    use super::{login_with_gateway_builder, logout, whoami_with_gateway};

    #[derive(Clone)]
    struct StubGateway {
        captured_credentials: Arc<Mutex<Option<(String, String)>>>,
        login_response: Arc<Mutex<Option<Result<TokenResponse, ApiError>>>>,
        identity: User,
    }

    #[async_trait]
    impl AuthGateway for StubGateway {
        async fn login(&self, username: &str, password: &str) -> Result<TokenResponse, ApiError> {
            self.captured_credentials
                .lock()
                .expect("credentials mutex should be available")
                .replace((username.to_owned(), password.to_owned()));
            self.login_response
                .lock()
                .expect("response mutex should be available")
                .take()
                .expect("login response should only be consumed once")
        }

        async fn current_user(&self) -> Result<User, ApiError> {
            Ok(self.identity.clone())
        }
    }

    fn admin() -> User {
        User {
            id: "u-1".to_owned(),
            username: "admin".to_owned(),
            email: "admin@example.com".to_owned(),
            is_superuser: true,
            is_primary: true,
            created_at: Utc::now(),
        }
    }

    fn store_in(temp_dir: &TempDir) -> TokenStore {
        let base = Utf8PathBuf::from_path_buf(temp_dir.path().to_path_buf())
            .expect("temp directory path must be UTF-8");
        TokenStore::new(base.join("token"))
    }

    #[tokio::test]
    async fn login_persists_token_and_reports_identity() {
        let config = CuratorConfig {
            username: Some("admin".to_owned()),
            password: Some("hunter2".to_owned()),
            ..Default::default()
        };
        let temp_dir = TempDir::new().expect("temp dir should create");
        let store = store_in(&temp_dir);

        let captured = Arc::new(Mutex::new(None));
        let gateway = StubGateway {
            captured_credentials: Arc::clone(&captured),
            login_response: Arc::new(Mutex::new(Some(Ok(TokenResponse {
                access_token: "tok-42".to_owned(),
                token_type: "Bearer".to_owned(),
            })))),
            identity: admin(),
        };

        let seen_tokens = Arc::new(Mutex::new(Vec::new()));
        let mut buffer = Vec::new();
        login_with_gateway_builder(
            &config,
            {
                let gateway = gateway.clone();
                let seen_tokens = Arc::clone(&seen_tokens);
                move |token: Option<AccessToken>| {
                    seen_tokens
                        .lock()
                        .expect("token mutex should be available")
                        .push(token.map(|t| t.value().to_owned()));
                    Ok(gateway.clone())
                }
            },
            &store,
            &mut buffer,
        )
        .await
        .expect("login should succeed");

        let credentials = captured
            .lock()
            .expect("credentials mutex should be available")
            .clone()
            .expect("login should have been called");
        assert_eq!(credentials, ("admin".to_owned(), "hunter2".to_owned()));

        let tokens = seen_tokens
            .lock()
            .expect("token mutex should be available")
            .clone();
        assert_eq!(
            tokens,
            vec![None, Some("tok-42".to_owned())],
            "the builder should see no token first, then the issued one"
        );

        let persisted = store
            .load()
            .expect("token should load")
            .expect("token should be persisted");
        assert_eq!(persisted.value(), "tok-42");

        let output = String::from_utf8(buffer).expect("output should be valid UTF-8");
        assert!(
            output.contains("Signed in as admin <admin@example.com> [superuser]"),
            "missing identity: {output}"
        );
    }

    #[tokio::test]
    async fn rejected_credentials_do_not_persist_a_token() {
        let config = CuratorConfig {
            username: Some("admin".to_owned()),
            password: Some("wrong".to_owned()),
            ..Default::default()
        };
        let temp_dir = TempDir::new().expect("temp dir should create");
        let store = store_in(&temp_dir);

        let gateway = StubGateway {
            captured_credentials: Arc::new(Mutex::new(None)),
            login_response: Arc::new(Mutex::new(Some(Err(ApiError::Authentication {
                message: "login failed: Invalid password".to_owned(),
            })))),
            identity: admin(),
        };

        let mut buffer = Vec::new();
        let result = login_with_gateway_builder(
            &config,
            move |_token| Ok(gateway.clone()),
            &store,
            &mut buffer,
        )
        .await;

        assert!(
            matches!(result, Err(ApiError::Authentication { .. })),
            "expected Authentication, got {result:?}"
        );
        assert!(
            store.load().expect("load should succeed").is_none(),
            "no token may be stored after a failed login"
        );
    }

    #[tokio::test]
    async fn whoami_writes_the_gateway_identity() {
        let gateway = StubGateway {
            captured_credentials: Arc::new(Mutex::new(None)),
            login_response: Arc::new(Mutex::new(None)),
            identity: admin(),
        };

        let mut buffer = Vec::new();
        whoami_with_gateway(&gateway, &mut buffer)
            .await
            .expect("whoami should succeed");

        let output = String::from_utf8(buffer).expect("output should be valid UTF-8");
        assert!(
            output.contains("Signed in as admin"),
            "missing identity: {output}"
        );
    }

    #[test]
    fn logout_clears_the_stored_token() {
        let temp_dir = TempDir::new().expect("temp dir should create");
        let store = store_in(&temp_dir);
        store
            .save(&AccessToken::new("tok").expect("token should be valid"))
            .expect("save should succeed");

        let mut buffer = Vec::new();
        logout(&store, &mut buffer).expect("logout should succeed");

        assert!(
            store.load().expect("load should succeed").is_none(),
            "token should be cleared"
        );
        let output = String::from_utf8(buffer).expect("output should be valid UTF-8");
        assert_eq!(output, "Signed out.\n");
    }
}
