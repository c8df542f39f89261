//! Typed HTTP client layer for the catalogue service.
//!
//! Submodules cover the canonical list-query encoding ([`query`]), the wire
//! models ([`models`]), URL/identity handling ([`locator`]), the error
//! taxonomy ([`error`]), and the reqwest-backed client ([`client`]).

pub mod client;
pub mod error;
pub mod locator;
pub mod models;
pub mod query;

pub use client::{AuthGateway, CatalogClient, TOTAL_COUNT_HEADER};
pub use error::{ApiError, prettify_error_detail};
pub use locator::{AccessToken, Resource, ServiceLocator};
pub use models::{
    Backup, Company, CompanyCreate, CompanyUpdate, Game, GameCreate, GameUpdate, Genre,
    GenreCreate, GenreUpdate, ListPage, Platform, PlatformCreate, PlatformUpdate, Sale,
    SaleCreate, SalePopularityRow, SaleUpdate, TokenResponse, User, UserCreate, UserUpdate,
};
pub use query::{FilterValue, ListQuery, PAGE_SIZE, SortDirection, SortKey, SortSpec};
