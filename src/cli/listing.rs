//! Catalogue listing and single-record operations.

use std::io::{self, Write};

use curator::api::models::{Backup, Company, Game, Genre, Platform, Sale, User};
use curator::{
    ApiError, AppContext, CatalogClient, CuratorConfig, FetchOutcome, ListQuery, ListState,
    Resource,
};
use serde::de::DeserializeOwned;

use super::output::{RowSummary, write_listing, write_record};

/// Lists one page of the selected resource.
///
/// # Errors
///
/// Returns [`ApiError::Configuration`] if required configuration is missing
/// and the mapped taxonomy error if the request fails.
pub async fn run_list(config: &CuratorConfig) -> Result<(), ApiError> {
    let mut stdout = io::stdout().lock();
    let client = super::build_client(config)?;
    let mut context = AppContext::new();
    run_list_with_client(config, &client, &mut context, &mut stdout).await
}

/// Lists one page using a caller-supplied client and context.
///
/// This function is exposed for testing against a mock server.
pub async fn run_list_with_client<W: Write>(
    config: &CuratorConfig,
    client: &CatalogClient,
    context: &mut AppContext,
    writer: &mut W,
) -> Result<(), ApiError> {
    let resource = config.require_entity()?;
    let template = config.list_query()?;
    let lists = &mut context.lists;
    match resource {
        Resource::Games => {
            page_listing::<Game, _>(config, client, resource, &mut lists.games, &template, writer)
                .await
        }
        Resource::Companies => {
            page_listing::<Company, _>(
                config,
                client,
                resource,
                &mut lists.companies,
                &template,
                writer,
            )
            .await
        }
        Resource::Platforms => {
            page_listing::<Platform, _>(
                config,
                client,
                resource,
                &mut lists.platforms,
                &template,
                writer,
            )
            .await
        }
        Resource::Genres => {
            page_listing::<Genre, _>(config, client, resource, &mut lists.genres, &template, writer)
                .await
        }
        Resource::Sales => {
            page_listing::<Sale, _>(config, client, resource, &mut lists.sales, &template, writer)
                .await
        }
        Resource::Users => {
            page_listing::<User, _>(config, client, resource, &mut lists.users, &template, writer)
                .await
        }
        Resource::Backups => {
            page_listing::<Backup, _>(
                config,
                client,
                resource,
                &mut lists.backups,
                &template,
                writer,
            )
            .await
        }
    }
}

/// Moves a listing to the configured page, fetches it, and renders it.
async fn page_listing<T, W>(
    config: &CuratorConfig,
    client: &CatalogClient,
    resource: Resource,
    state: &mut ListState<T>,
    template: &ListQuery,
    writer: &mut W,
) -> Result<(), ApiError>
where
    T: DeserializeOwned + RowSummary,
    W: Write,
{
    let query = state.goto_page(config.page(), template)?;
    fetch_and_render(client, resource, state, query, writer).await
}

/// Runs one fetch/reconcile cycle for a listing and renders the result.
///
/// Shared with the post-delete re-fetch; the query passed in becomes the
/// listing's last-known parameters.
pub(crate) async fn fetch_and_render<T, W>(
    client: &CatalogClient,
    resource: Resource,
    state: &mut ListState<T>,
    query: ListQuery,
    writer: &mut W,
) -> Result<(), ApiError>
where
    T: DeserializeOwned + RowSummary,
    W: Write,
{
    let ticket = state.begin_fetch(query.clone());
    let result = client.list::<T>(resource, &query).await;
    match state.complete_fetch(ticket, result) {
        FetchOutcome::Failed(error) => Err(error),
        FetchOutcome::Applied | FetchOutcome::Stale => write_listing(writer, resource, state),
    }
}

/// Shows a single record by identifier.
///
/// # Errors
///
/// Returns [`ApiError::Configuration`] if entity or identifier is missing
/// and the mapped taxonomy error if the request fails.
pub async fn run_show(config: &CuratorConfig) -> Result<(), ApiError> {
    let mut stdout = io::stdout().lock();
    let client = super::build_client(config)?;
    run_show_with_client(config, &client, &mut stdout).await
}

/// Shows a single record using a caller-supplied client.
///
/// This function is exposed for testing against a mock server.
pub async fn run_show_with_client<W: Write>(
    config: &CuratorConfig,
    client: &CatalogClient,
    writer: &mut W,
) -> Result<(), ApiError> {
    let resource = config.require_entity()?;
    let id = config.require_id()?;
    match resource {
        Resource::Games => show_record::<Game, _>(client, resource, id, writer).await,
        Resource::Companies => show_record::<Company, _>(client, resource, id, writer).await,
        Resource::Platforms => show_record::<Platform, _>(client, resource, id, writer).await,
        Resource::Genres => show_record::<Genre, _>(client, resource, id, writer).await,
        Resource::Sales => show_record::<Sale, _>(client, resource, id, writer).await,
        Resource::Users => show_record::<User, _>(client, resource, id, writer).await,
        Resource::Backups => show_record::<Backup, _>(client, resource, id, writer).await,
    }
}

async fn show_record<T, W>(
    client: &CatalogClient,
    resource: Resource,
    id: &str,
    writer: &mut W,
) -> Result<(), ApiError>
where
    T: DeserializeOwned + RowSummary,
    W: Write,
{
    let record: T = client.fetch(resource, id).await?;
    write_record(writer, &record)
}
