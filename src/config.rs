//! Application configuration loaded from CLI, environment, and files.
//!
//! This module provides a unified configuration struct that merges values
//! from command-line arguments, environment variables, and configuration
//! files using ortho-config's layered approach.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – Built-in application defaults
//! 2. **Configuration file** – `.curator.toml` in current directory, home
//!    directory, or XDG config directory
//! 3. **Environment variables** – `CURATOR_API_BASE_URL`, `CURATOR_TOKEN`,
//!    and friends
//! 4. **Command-line arguments** – `--entity`/`-e`, `--page`, `--filter`/`-f`
//!    and the rest
//!
//! # Configuration File
//!
//! Place `.curator.toml` in the current directory, home directory, or XDG
//! config directory with:
//!
//! ```toml
//! api_base_url = "http://localhost:8000"
//! token = "eyJhbGciOi..."
//! ```

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::locator::Resource;
use crate::api::query::{ListQuery, SortKey, SortSpec};

/// Operation determined by the supplied arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationMode {
    /// Exchange credentials for an access token and persist it.
    Login,
    /// Discard the persisted access token.
    Logout,
    /// Report who owns the current token.
    WhoAmI,
    /// List one page of a catalogue resource.
    List,
    /// Show a single record by identifier.
    Show,
    /// Create a record from field assignments.
    Create,
    /// Patch a record with changed field assignments.
    Update,
    /// Delete one record, or the whole `--ids` batch.
    Delete,
    /// Show sale popularity statistics.
    Stats,
}

/// Application configuration supporting CLI, environment, and file sources.
///
/// # Environment Variables
///
/// - `CURATOR_API_BASE_URL` or `--api-base-url`: Catalogue service base URL
/// - `CURATOR_TOKEN` or `--token`: Bearer token from a previous login
/// - `CURATOR_USERNAME` / `CURATOR_PASSWORD`: Login credentials
/// - `CURATOR_ENTITY` or `--entity`: Resource to operate on
///
/// # Example
///
/// ```no_run
/// use curator::CuratorConfig;
/// use ortho_config::OrthoConfig;
///
/// let config = CuratorConfig::load().expect("failed to load configuration");
/// let base = config.require_api_base_url().expect("base URL required");
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "CURATOR",
    discovery(
        dotfile_name = ".curator.toml",
        config_file_name = "curator.toml",
        app_name = "curator"
    )
)]
pub struct CuratorConfig {
    /// Base URL of the catalogue service.
    ///
    /// Can be provided via:
    /// - CLI: `--api-base-url <URL>` or `-a <URL>`
    /// - Environment: `CURATOR_API_BASE_URL`
    /// - Config file: `api_base_url = "..."`
    #[ortho_config(cli_short = 'a')]
    pub api_base_url: Option<String>,

    /// Bearer token for authenticated requests.
    ///
    /// Usually persisted by `--login`; an explicit value overrides the
    /// stored one for a single run.
    #[ortho_config(cli_short = 't')]
    pub token: Option<String>,

    /// Login name used with `--login`.
    #[ortho_config(cli_short = 'u')]
    pub username: Option<String>,

    /// Password used with `--login`.
    #[ortho_config(cli_short = 'p')]
    pub password: Option<String>,

    /// Catalogue resource to operate on (e.g. `games`, `companies`).
    #[ortho_config(cli_short = 'e')]
    pub entity: Option<String>,

    /// 1-based page number for listings. Defaults to the first page.
    pub page: Option<u64>,

    /// Comma-separated filter assignments, e.g. `title=zelda,is_superuser=true`.
    ///
    /// Boolean-looking values become flag filters; everything else is a
    /// text filter.
    #[ortho_config(cli_short = 'f')]
    pub filter: Option<String>,

    /// Comma-separated sort tokens in click order, e.g. `+title,-released_at`.
    ///
    /// A bare field name sorts ascending.
    #[ortho_config(cli_short = 's')]
    pub sort: Option<String>,

    /// Record identifier for show, update, and single delete.
    pub id: Option<String>,

    /// Comma-separated record identifiers for a bulk delete.
    pub ids: Option<String>,

    /// Comma-separated field assignments for create and update,
    /// e.g. `title=Okami,released_at=2006-04-20`.
    pub set: Option<String>,

    /// Exchanges `--username`/`--password` for a token, persists it, and
    /// reports the signed-in identity.
    pub login: bool,

    /// Discards the persisted token.
    pub logout: bool,

    /// Reports the identity owning the current token.
    pub whoami: bool,

    /// Creates a record on the selected entity from `--set` assignments.
    pub create: bool,

    /// Deletes the record named by `--id`, or every record in `--ids`.
    pub delete: bool,

    /// Shows sale popularity statistics.
    pub stats: bool,
}

impl CuratorConfig {
    /// Returns the service base URL or an error if missing.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Configuration`] when no base URL is configured.
    pub fn require_api_base_url(&self) -> Result<&str, ApiError> {
        self.api_base_url
            .as_deref()
            .ok_or_else(|| ApiError::Configuration {
                message: "service base URL is required (use --api-base-url or -a)".to_owned(),
            })
    }

    /// Returns login credentials if both are configured.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Configuration`] when username or password is
    /// missing.
    pub fn require_credentials(&self) -> Result<(&str, &str), ApiError> {
        match (&self.username, &self.password) {
            (Some(username), Some(password)) => Ok((username.as_str(), password.as_str())),
            (None, _) => Err(ApiError::Configuration {
                message: "login name is required (use --username or -u)".to_owned(),
            }),
            (_, None) => Err(ApiError::Configuration {
                message: "password is required (use --password or -p)".to_owned(),
            }),
        }
    }

    /// Parses the selected catalogue resource.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Configuration`] when no entity is configured and
    /// [`ApiError::UnknownResource`] when the name is not a catalogue
    /// resource.
    pub fn require_entity(&self) -> Result<Resource, ApiError> {
        let name = self.entity.as_deref().ok_or_else(|| ApiError::Configuration {
            message: "an entity is required (use --entity or -e)".to_owned(),
        })?;
        name.parse()
    }

    /// Returns the record identifier or an error if missing.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Configuration`] when no identifier is configured.
    pub fn require_id(&self) -> Result<&str, ApiError> {
        self.id.as_deref().ok_or_else(|| ApiError::Configuration {
            message: "a record identifier is required (use --id)".to_owned(),
        })
    }

    /// Returns the 1-based page number, defaulting to the first page.
    #[must_use]
    pub fn page(&self) -> u64 {
        self.page.unwrap_or(1)
    }

    /// Builds the list query from page, filters, and sort.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidPagination`] for page zero,
    /// [`ApiError::Configuration`] for a malformed filter assignment, and
    /// [`ApiError::InvalidSort`] for a malformed sort token.
    pub fn list_query(&self) -> Result<ListQuery, ApiError> {
        let mut query = ListQuery::for_page(self.page())?;
        for (field, value) in parse_assignments(self.filter.as_deref())? {
            query = match value.as_str() {
                "true" => query.with_flag(field, true),
                "false" => query.with_flag(field, false),
                _ => query.with_filter(field, value),
            };
        }
        Ok(query.with_sort(self.sort_spec()?))
    }

    /// Parses the sort tokens into an ordered specification.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidSort`] for a malformed token.
    pub fn sort_spec(&self) -> Result<SortSpec, ApiError> {
        self.sort
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::parse::<SortKey>)
            .collect()
    }

    /// Parses the `--set` field assignments for create and update.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Configuration`] for a malformed assignment or
    /// when no assignment was supplied.
    pub fn field_assignments(&self) -> Result<Vec<(String, String)>, ApiError> {
        let assignments = parse_assignments(self.set.as_deref())?;
        if assignments.is_empty() {
            return Err(ApiError::Configuration {
                message: "at least one field assignment is required (use --set field=value)"
                    .to_owned(),
            });
        }
        Ok(assignments)
    }

    /// Returns the identifiers targeted by a delete: the `--ids` batch, or
    /// the single `--id`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Configuration`] when neither is configured.
    pub fn delete_targets(&self) -> Result<Vec<String>, ApiError> {
        if let Some(ids) = self.ids.as_deref() {
            let ids: Vec<String> = ids
                .split(',')
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_owned)
                .collect();
            if !ids.is_empty() {
                return Ok(ids);
            }
        }
        if let Some(id) = self.id.as_deref() {
            return Ok(vec![id.to_owned()]);
        }
        Err(ApiError::Configuration {
            message: "a delete needs --id or --ids".to_owned(),
        })
    }

    /// Determines the operation based on provided configuration.
    ///
    /// Action flags win over positional intent; among the rest, `--id` with
    /// `--set` means an update, a bare `--id` a show, and a bare entity a
    /// listing. With nothing at all the run reports the current identity.
    #[must_use]
    pub const fn operation_mode(&self) -> OperationMode {
        if self.login {
            OperationMode::Login
        } else if self.logout {
            OperationMode::Logout
        } else if self.whoami {
            OperationMode::WhoAmI
        } else if self.stats {
            OperationMode::Stats
        } else if self.delete {
            OperationMode::Delete
        } else if self.create {
            OperationMode::Create
        } else if self.id.is_some() && self.set.is_some() {
            OperationMode::Update
        } else if self.id.is_some() {
            OperationMode::Show
        } else if self.entity.is_some() {
            OperationMode::List
        } else {
            OperationMode::WhoAmI
        }
    }
}

/// Parses comma-separated `field=value` assignments.
fn parse_assignments(raw: Option<&str>) -> Result<Vec<(String, String)>, ApiError> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            entry
                .split_once('=')
                .map(|(field, value)| (field.trim().to_owned(), value.trim().to_owned()))
                .ok_or_else(|| ApiError::Configuration {
                    message: format!("malformed assignment '{entry}': expected field=value"),
                })
        })
        .collect()
}
