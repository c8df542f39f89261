//! Create, update, and delete operations.
//!
//! Mutations are gated on the superuser role when the signed-in identity is
//! known. Updates fetch the original record first and send only the fields
//! that actually changed; a no-change edit never reaches the network. A bulk
//! delete consumes the selection and re-fetches the listing with its
//! last-known parameters.

use std::io::{self, Write};

use curator::api::models::{Backup, Company, Game, Genre, Platform, Sale, User};
use curator::diff;
use curator::{ApiError, AppContext, CatalogClient, CuratorConfig, ListQuery, Resource};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::forms;
use super::listing::fetch_and_render;
use super::output::{RowSummary, io_error};

/// Creates a record on the selected resource.
///
/// # Errors
///
/// Returns [`ApiError::Authentication`] for a known non-superuser,
/// [`ApiError::Configuration`] for missing or malformed fields, and the
/// mapped taxonomy error if the request fails.
pub async fn run_create(config: &CuratorConfig) -> Result<(), ApiError> {
    let mut stdout = io::stdout().lock();
    let (client, mut context) = super::connect(config).await?;
    run_create_with_client(config, &client, &mut context, &mut stdout).await
}

/// Creates a record using a caller-supplied client and context.
///
/// This function is exposed for testing against a mock server.
pub async fn run_create_with_client<W: Write>(
    config: &CuratorConfig,
    client: &CatalogClient,
    context: &mut AppContext,
    writer: &mut W,
) -> Result<(), ApiError> {
    context.session.require_superuser()?;
    let resource = config.require_entity()?;

    match resource {
        // A backup is created server-side from the live database; it takes
        // no field assignments.
        Resource::Backups => {
            let empty = serde_json::Map::new();
            create_record::<Backup, _, _>(client, resource, &empty, writer).await
        }
        Resource::Games => {
            let payload = forms::game_create(&config.field_assignments()?)?;
            create_record::<Game, _, _>(client, resource, &payload, writer).await
        }
        Resource::Companies => {
            let payload = forms::company_create(&config.field_assignments()?)?;
            create_record::<Company, _, _>(client, resource, &payload, writer).await
        }
        Resource::Platforms => {
            let payload = forms::platform_create(&config.field_assignments()?)?;
            create_record::<Platform, _, _>(client, resource, &payload, writer).await
        }
        Resource::Genres => {
            let payload = forms::genre_create(&config.field_assignments()?)?;
            create_record::<Genre, _, _>(client, resource, &payload, writer).await
        }
        Resource::Sales => {
            let payload = forms::sale_create(&config.field_assignments()?)?;
            create_record::<Sale, _, _>(client, resource, &payload, writer).await
        }
        Resource::Users => {
            let payload = forms::user_create(&config.field_assignments()?)?;
            create_record::<User, _, _>(client, resource, &payload, writer).await
        }
    }
}

async fn create_record<T, B, W>(
    client: &CatalogClient,
    resource: Resource,
    payload: &B,
    writer: &mut W,
) -> Result<(), ApiError>
where
    T: DeserializeOwned + RowSummary,
    B: Serialize + Sync,
    W: Write,
{
    let created: T = client.create(resource, payload).await?;
    writeln!(writer, "Created {}", created.summary_line()).map_err(|e| io_error(&e))
}

/// Patches a record with the changed fields only.
///
/// # Errors
///
/// Returns [`ApiError::Authentication`] for a known non-superuser,
/// [`ApiError::Configuration`] for malformed fields, and the mapped
/// taxonomy error if a request fails.
pub async fn run_update(config: &CuratorConfig) -> Result<(), ApiError> {
    let mut stdout = io::stdout().lock();
    let (client, mut context) = super::connect(config).await?;
    run_update_with_client(config, &client, &mut context, &mut stdout).await
}

/// Patches a record using a caller-supplied client and context.
///
/// This function is exposed for testing against a mock server.
pub async fn run_update_with_client<W: Write>(
    config: &CuratorConfig,
    client: &CatalogClient,
    context: &mut AppContext,
    writer: &mut W,
) -> Result<(), ApiError> {
    context.session.require_superuser()?;
    let resource = config.require_entity()?;
    let id = config.require_id()?;
    let fields = config.field_assignments()?;

    match resource {
        Resource::Games => {
            let original: Game = client.fetch(resource, id).await?;
            let patch = diff::game_patch(&original, &forms::game_edit(&fields)?);
            apply_patch::<Game, _, _>(client, resource, id, patch, writer).await
        }
        Resource::Companies => {
            let original: Company = client.fetch(resource, id).await?;
            let patch = diff::company_patch(&original, &forms::company_edit(&fields)?);
            apply_patch::<Company, _, _>(client, resource, id, patch, writer).await
        }
        Resource::Platforms => {
            let original: Platform = client.fetch(resource, id).await?;
            let patch = diff::platform_patch(&original, &forms::platform_edit(&fields)?);
            apply_patch::<Platform, _, _>(client, resource, id, patch, writer).await
        }
        Resource::Genres => {
            let original: Genre = client.fetch(resource, id).await?;
            let patch = diff::genre_patch(&original, &forms::genre_edit(&fields)?);
            apply_patch::<Genre, _, _>(client, resource, id, patch, writer).await
        }
        Resource::Sales => {
            let original: Sale = client.fetch(resource, id).await?;
            let patch = diff::sale_patch(&original, &forms::sale_edit(&fields)?);
            apply_patch::<Sale, _, _>(client, resource, id, patch, writer).await
        }
        Resource::Users => {
            let original: User = client.fetch(resource, id).await?;
            let patch = diff::user_patch(&original, &forms::user_edit(&fields)?);
            apply_patch::<User, _, _>(client, resource, id, patch, writer).await
        }
        Resource::Backups => Err(ApiError::Configuration {
            message: "backups cannot be updated".to_owned(),
        }),
    }
}

/// Sends a computed patch, or reports a no-op when nothing changed.
async fn apply_patch<T, B, W>(
    client: &CatalogClient,
    resource: Resource,
    id: &str,
    patch: Option<B>,
    writer: &mut W,
) -> Result<(), ApiError>
where
    T: DeserializeOwned + RowSummary,
    B: Serialize + Sync,
    W: Write,
{
    let Some(patch) = patch else {
        return writeln!(writer, "No changes to apply.").map_err(|e| io_error(&e));
    };
    let updated: T = client.update(resource, id, &patch).await?;
    writeln!(writer, "Updated {}", updated.summary_line()).map_err(|e| io_error(&e))
}

/// Deletes the record named by `--id`, or the whole `--ids` batch.
///
/// # Errors
///
/// Returns [`ApiError::Authentication`] for a known non-superuser,
/// [`ApiError::Configuration`] when no target is named, and the mapped
/// taxonomy error if a request fails.
pub async fn run_delete(config: &CuratorConfig) -> Result<(), ApiError> {
    let mut stdout = io::stdout().lock();
    let (client, mut context) = super::connect(config).await?;
    run_delete_with_client(config, &client, &mut context, &mut stdout).await
}

/// Deletes records using a caller-supplied client and context.
///
/// After a bulk delete the listing is re-fetched with its last-known
/// parameters (or the configured ones on a fresh context) and re-rendered,
/// and the selection is left empty. This function is exposed for testing
/// against a mock server.
pub async fn run_delete_with_client<W: Write>(
    config: &CuratorConfig,
    client: &CatalogClient,
    context: &mut AppContext,
    writer: &mut W,
) -> Result<(), ApiError> {
    context.session.require_superuser()?;
    let resource = config.require_entity()?;
    let targets = config.delete_targets()?;

    if config.ids.is_none() {
        let id = targets.first().ok_or_else(|| ApiError::Configuration {
            message: "a delete needs --id or --ids".to_owned(),
        })?;
        client.delete(resource, id).await?;
        return writeln!(writer, "Deleted 1 {resource} record.").map_err(|e| io_error(&e));
    }

    for id in targets {
        context.selection.select(id);
    }
    let ids = context.selection.take_ids();
    client.delete_many(resource, &ids).await?;
    writeln!(writer, "Deleted {} {resource} records.", ids.len()).map_err(|e| io_error(&e))?;

    refetch_listing(config, client, resource, context, writer).await
}

/// Re-fetches and renders the listing after a bulk delete.
async fn refetch_listing<W: Write>(
    config: &CuratorConfig,
    client: &CatalogClient,
    resource: Resource,
    context: &mut AppContext,
    writer: &mut W,
) -> Result<(), ApiError> {
    let fallback = config.list_query()?;
    let lists = &mut context.lists;
    match resource {
        Resource::Games => {
            let query = last_or(&fallback, lists.games.last_query());
            fetch_and_render::<Game, _>(client, resource, &mut lists.games, query, writer).await
        }
        Resource::Companies => {
            let query = last_or(&fallback, lists.companies.last_query());
            fetch_and_render::<Company, _>(client, resource, &mut lists.companies, query, writer)
                .await
        }
        Resource::Platforms => {
            let query = last_or(&fallback, lists.platforms.last_query());
            fetch_and_render::<Platform, _>(client, resource, &mut lists.platforms, query, writer)
                .await
        }
        Resource::Genres => {
            let query = last_or(&fallback, lists.genres.last_query());
            fetch_and_render::<Genre, _>(client, resource, &mut lists.genres, query, writer).await
        }
        Resource::Sales => {
            let query = last_or(&fallback, lists.sales.last_query());
            fetch_and_render::<Sale, _>(client, resource, &mut lists.sales, query, writer).await
        }
        Resource::Users => {
            let query = last_or(&fallback, lists.users.last_query());
            fetch_and_render::<User, _>(client, resource, &mut lists.users, query, writer).await
        }
        Resource::Backups => {
            let query = last_or(&fallback, lists.backups.last_query());
            fetch_and_render::<Backup, _>(client, resource, &mut lists.backups, query, writer)
                .await
        }
    }
}

fn last_or(fallback: &ListQuery, last: Option<&ListQuery>) -> ListQuery {
    last.unwrap_or(fallback).clone()
}
