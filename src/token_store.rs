//! Access-token persistence between runs.
//!
//! A successful login stores the bearer token in a small state file so later
//! invocations stay signed in; logout removes it. File access goes through
//! `cap-std` so only the token directory is ever opened.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;

use crate::api::error::ApiError;
use crate::api::locator::AccessToken;

/// Stores and retrieves the persisted access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenStore {
    path: Utf8PathBuf,
}

impl TokenStore {
    /// Creates a store over an explicit token file path.
    #[must_use]
    pub const fn new(path: Utf8PathBuf) -> Self {
        Self { path }
    }

    /// Creates a store at the default state location.
    ///
    /// Defaults to `${XDG_STATE_HOME}/curator/token` when `XDG_STATE_HOME`
    /// is set, else to `${HOME}/.local/state/curator/token`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Configuration`] when neither `XDG_STATE_HOME` nor
    /// `HOME` is available.
    pub fn from_environment() -> Result<Self, ApiError> {
        let xdg = std::env::var("XDG_STATE_HOME")
            .ok()
            .filter(|v| !v.is_empty());
        let home = std::env::var("HOME").ok().filter(|v| !v.is_empty());

        Ok(Self::new(resolve_token_path(
            xdg.as_deref(),
            home.as_deref(),
        )?))
    }

    /// Returns the token file path.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        self.path.as_path()
    }

    /// Persists the token, creating parent directories when needed.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Io`] when the directory cannot be created or the
    /// file cannot be written.
    pub fn save(&self, token: &AccessToken) -> Result<(), ApiError> {
        let (dir, file_name) = self.open_parent(true)?;
        dir.write(file_name, token.value())
            .map_err(|error| ApiError::Io {
                message: format!("failed to write token file '{}': {error}", self.path),
            })
    }

    /// Reads the persisted token, when any.
    ///
    /// A missing file is not an error: it means no login has happened yet.
    /// A present but blank file is treated the same way.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Io`] when the file exists but cannot be read.
    pub fn load(&self) -> Result<Option<AccessToken>, ApiError> {
        let Some((dir, file_name)) = self.try_open_parent()? else {
            return Ok(None);
        };
        match dir.read_to_string(file_name) {
            Ok(contents) => Ok(AccessToken::new(contents).ok()),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(ApiError::Io {
                message: format!("failed to read token file '{}': {error}", self.path),
            }),
        }
    }

    /// Removes the persisted token. Removing an absent token is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Io`] when the file exists but cannot be removed.
    pub fn clear(&self) -> Result<(), ApiError> {
        let Some((dir, file_name)) = self.try_open_parent()? else {
            return Ok(());
        };
        match dir.remove_file(file_name) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(ApiError::Io {
                message: format!("failed to remove token file '{}': {error}", self.path),
            }),
        }
    }

    /// Opens the parent directory, optionally creating it first.
    fn open_parent(&self, create: bool) -> Result<(Dir, &str), ApiError> {
        let parent = self.path.parent().unwrap_or_else(|| Utf8Path::new("."));
        let file_name = self.path.file_name().ok_or_else(|| ApiError::Io {
            message: format!("invalid token path '{}': no file name", self.path),
        })?;

        if create {
            std::fs::create_dir_all(parent.as_std_path()).map_err(|error| ApiError::Io {
                message: format!("failed to create token directory '{parent}': {error}"),
            })?;
        }
        let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(|error| {
            ApiError::Io {
                message: format!("failed to open token directory '{parent}': {error}"),
            }
        })?;
        Ok((dir, file_name))
    }

    /// Opens the parent directory when it exists; `None` when it does not.
    fn try_open_parent(&self) -> Result<Option<(Dir, &str)>, ApiError> {
        let parent = self.path.parent().unwrap_or_else(|| Utf8Path::new("."));
        if !parent.as_std_path().exists() {
            return Ok(None);
        }
        self.open_parent(false).map(Some)
    }
}

/// Resolves the token path from optional environment values.
///
/// This helper keeps environment-sensitive logic unit-testable without
/// mutating process environment variables in tests.
pub(crate) fn resolve_token_path(
    xdg_state_home: Option<&str>,
    home: Option<&str>,
) -> Result<Utf8PathBuf, ApiError> {
    if let Some(state_home) = xdg_state_home {
        return Ok(Utf8PathBuf::from(state_home).join("curator").join("token"));
    }

    if let Some(home_dir) = home {
        return Ok(Utf8PathBuf::from(home_dir)
            .join(".local")
            .join("state")
            .join("curator")
            .join("token"));
    }

    Err(ApiError::Configuration {
        message: "unable to resolve token path: neither XDG_STATE_HOME nor HOME is set".to_owned(),
    })
}

#[cfg(test)]
mod tests {
    //! Unit tests for token path resolution and persistence.

    use rstest::rstest;
    use tempfile::TempDir;

    use super::*;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    fn store_in(temp_dir: &TempDir) -> Result<TokenStore, Box<dyn std::error::Error>> {
        let base = Utf8PathBuf::from_path_buf(temp_dir.path().to_path_buf())
            .map_err(|_| "temp directory path must be UTF-8")?;
        Ok(TokenStore::new(base.join("state").join("token")))
    }

    #[rstest]
    fn resolve_token_path_prefers_xdg_state_home() -> TestResult {
        let path = resolve_token_path(Some("/tmp/state-root"), Some("/home/example"))?;

        let expected = Utf8PathBuf::from("/tmp/state-root/curator/token");
        if path != expected {
            return Err(format!("expected {expected:?}, got {path:?}").into());
        }

        Ok(())
    }

    #[rstest]
    fn resolve_token_path_falls_back_to_home() -> TestResult {
        let path = resolve_token_path(None, Some("/home/example"))?;

        let expected = Utf8PathBuf::from("/home/example/.local/state/curator/token");
        if path != expected {
            return Err(format!("expected {expected:?}, got {path:?}").into());
        }

        Ok(())
    }

    #[rstest]
    fn from_environment_prefers_xdg_state_home() -> TestResult {
        let _guard = env_lock::lock_env([
            ("XDG_STATE_HOME", Some("/tmp/state-root")),
            ("HOME", Some("/home/example")),
        ]);

        let store = TokenStore::from_environment()?;
        let expected = Utf8Path::new("/tmp/state-root/curator/token");
        if store.path() != expected {
            return Err(format!("expected {expected:?}, got {:?}", store.path()).into());
        }

        Ok(())
    }

    #[rstest]
    fn from_environment_treats_blank_xdg_state_home_as_unset() -> TestResult {
        let _guard = env_lock::lock_env([
            ("XDG_STATE_HOME", Some("")),
            ("HOME", Some("/home/example")),
        ]);

        let store = TokenStore::from_environment()?;
        let expected = Utf8Path::new("/home/example/.local/state/curator/token");
        if store.path() != expected {
            return Err(format!("expected {expected:?}, got {:?}", store.path()).into());
        }

        Ok(())
    }

    #[rstest]
    fn resolve_token_path_errors_without_any_base() -> TestResult {
        let result = resolve_token_path(None, None);
        if !matches!(result, Err(ApiError::Configuration { .. })) {
            return Err(format!("expected Configuration error, got {result:?}").into());
        }

        Ok(())
    }

    #[rstest]
    fn save_then_load_round_trips_the_token() -> TestResult {
        let temp_dir = TempDir::new()?;
        let store = store_in(&temp_dir)?;
        let token = AccessToken::new("sesame")?;

        store.save(&token)?;
        let loaded = store.load()?.ok_or("token should be present")?;
        if loaded != token {
            return Err(format!("expected {token:?}, got {loaded:?}").into());
        }

        Ok(())
    }

    #[rstest]
    fn load_without_prior_login_is_none() -> TestResult {
        let temp_dir = TempDir::new()?;
        let store = store_in(&temp_dir)?;

        if store.load()?.is_some() {
            return Err("expected no token before any login".into());
        }

        Ok(())
    }

    #[rstest]
    fn clear_removes_the_token_and_is_idempotent() -> TestResult {
        let temp_dir = TempDir::new()?;
        let store = store_in(&temp_dir)?;
        store.save(&AccessToken::new("sesame")?)?;

        store.clear()?;
        if store.load()?.is_some() {
            return Err("expected token removed after clear".into());
        }
        store.clear()?;

        Ok(())
    }
}
