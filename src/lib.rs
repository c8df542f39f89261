//! Curator library crate: a terminal admin client for a game-catalogue
//! service.
//!
//! The library wraps reqwest to encode canonical list queries, fetch and
//! reconcile paginated listings, compute minimal record patches, and surface
//! friendly errors that can be displayed in the CLI.

pub mod api;
pub mod config;
pub mod diff;
pub mod state;
pub mod token_store;

pub use api::{
    AccessToken, ApiError, AuthGateway, CatalogClient, ListPage, ListQuery, PAGE_SIZE, Resource,
    ServiceLocator, SortKey, SortSpec, TokenResponse, User,
};
pub use config::{CuratorConfig, OperationMode};
pub use state::{AppContext, FetchOutcome, ListState, Selection, Session};
pub use token_store::TokenStore;
