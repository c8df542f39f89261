//! Sale popularity statistics operation.

use std::io::{self, Write};

use curator::{ApiError, CatalogClient, CuratorConfig};

use super::output::write_statistics;

/// Shows the sale popularity statistics.
///
/// # Errors
///
/// Returns [`ApiError::Configuration`] if the base URL is missing and the
/// mapped taxonomy error if the request fails.
pub async fn run_stats(config: &CuratorConfig) -> Result<(), ApiError> {
    let mut stdout = io::stdout().lock();
    let client = super::build_client(config)?;
    run_stats_with_client(&client, &mut stdout).await
}

/// Shows statistics using a caller-supplied client.
///
/// This function is exposed for testing against a mock server.
pub async fn run_stats_with_client<W: Write>(
    client: &CatalogClient,
    writer: &mut W,
) -> Result<(), ApiError> {
    let rows = client.popularity_statistics().await?;
    write_statistics(writer, &rows)
}
