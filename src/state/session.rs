//! Session context and the per-resource listing registry.
//!
//! Rather than ambient global state, the application carries one explicit
//! [`AppContext`] handed to each operation. Views read snapshots from it;
//! the operation currently running is the single writer.

use crate::api::error::ApiError;
use crate::api::models::{Backup, Company, Game, Genre, Platform, Sale, User};
use crate::state::list::ListState;
use crate::state::selection::Selection;

/// Authenticated-user session state.
#[derive(Debug, Clone, Default)]
pub struct Session {
    me: Option<User>,
}

impl Session {
    /// Creates a signed-out session.
    #[must_use]
    pub const fn new() -> Self {
        Self { me: None }
    }

    /// Records a successful login.
    pub fn login(&mut self, user: User) {
        self.me = Some(user);
    }

    /// Clears the session on logout.
    pub fn logout(&mut self) {
        self.me = None;
    }

    /// Returns the signed-in user, when any.
    #[must_use]
    pub const fn me(&self) -> Option<&User> {
        self.me.as_ref()
    }

    /// Returns true when a user is signed in.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.me.is_some()
    }

    /// Returns true when the signed-in user may perform mutations.
    #[must_use]
    pub fn is_superuser(&self) -> bool {
        self.me.as_ref().is_some_and(|user| user.is_superuser)
    }

    /// Role gate for mutating operations.
    ///
    /// Refuses locally before a request is issued when the signed-in user is
    /// known to lack the superuser role. An anonymous session passes through:
    /// the service is the authority when the role is unknown.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Authentication`] for a signed-in non-superuser.
    pub fn require_superuser(&self) -> Result<(), ApiError> {
        match &self.me {
            Some(user) if !user.is_superuser => Err(ApiError::Authentication {
                message: format!("user {} is not a superuser", user.username),
            }),
            _ => Ok(()),
        }
    }
}

/// One listing state per catalogue resource.
///
/// Keeping a named slot per resource lets pagination survive navigation
/// between views within a run.
#[derive(Debug, Clone, Default)]
pub struct ListRegistry {
    /// Games listing state.
    pub games: ListState<Game>,
    /// Companies listing state.
    pub companies: ListState<Company>,
    /// Platforms listing state.
    pub platforms: ListState<Platform>,
    /// Genres listing state.
    pub genres: ListState<Genre>,
    /// Sales listing state.
    pub sales: ListState<Sale>,
    /// Users listing state.
    pub users: ListState<User>,
    /// Backups listing state.
    pub backups: ListState<Backup>,
}

/// Application context threaded through every operation.
#[derive(Debug, Clone, Default)]
pub struct AppContext {
    /// Who is signed in.
    pub session: Session,
    /// Per-resource listing state.
    pub lists: ListRegistry,
    /// Current row selection for bulk actions.
    pub selection: Selection,
}

impl AppContext {
    /// Creates a fresh signed-out context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}
