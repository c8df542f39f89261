//! Output formatting utilities for CLI operations.

use std::io::{self, Write};

use curator::api::models::{
    Backup, Company, Game, Genre, Platform, Sale, SalePopularityRow, User,
};
use curator::{ApiError, ListState, Resource};

/// One-line terminal rendering of a listed record.
pub trait RowSummary {
    /// Returns the single line shown for this record in listings.
    fn summary_line(&self) -> String;
}

impl RowSummary for Game {
    fn summary_line(&self) -> String {
        format!(
            "{} {} ({}) by {}",
            self.id, self.title, self.released_at, self.created_by_company.title
        )
    }
}

impl RowSummary for Company {
    fn summary_line(&self) -> String {
        format!("{} {} (founded {})", self.id, self.title, self.founded_at)
    }
}

impl RowSummary for Platform {
    fn summary_line(&self) -> String {
        format!("{} {}", self.id, self.title)
    }
}

impl RowSummary for Genre {
    fn summary_line(&self) -> String {
        format!("{} {}", self.id, self.title)
    }
}

impl RowSummary for Sale {
    fn summary_line(&self) -> String {
        format!(
            "{} {} on {}: {} sold",
            self.id, self.game.title, self.platform.title, self.amount
        )
    }
}

impl RowSummary for User {
    fn summary_line(&self) -> String {
        let role = if self.is_superuser { " [superuser]" } else { "" };
        format!("{} {} <{}>{role}", self.id, self.username, self.email)
    }
}

impl RowSummary for Backup {
    fn summary_line(&self) -> String {
        format!("{} {} ({})", self.id, self.title, self.url)
    }
}

/// Writes one page of a listing with its pagination footer.
pub fn write_listing<W: Write, T: RowSummary>(
    writer: &mut W,
    resource: Resource,
    state: &ListState<T>,
) -> Result<(), ApiError> {
    writeln!(writer, "{resource}:").map_err(|e| io_error(&e))?;
    writeln!(writer).map_err(|e| io_error(&e))?;

    for item in state.items() {
        writeln!(writer, "  {}", item.summary_line()).map_err(|e| io_error(&e))?;
    }

    writeln!(writer).map_err(|e| io_error(&e))?;
    writeln!(
        writer,
        "Page {} of {} ({} shown, {} total)",
        state.page().current(),
        state.page().total_pages(),
        state.items().len(),
        state.page().total()
    )
    .map_err(|e| io_error(&e))
}

/// Writes a single record line.
pub fn write_record<W: Write, T: RowSummary>(writer: &mut W, record: &T) -> Result<(), ApiError> {
    writeln!(writer, "{}", record.summary_line()).map_err(|e| io_error(&e))
}

/// Writes the signed-in identity.
pub fn write_identity<W: Write>(writer: &mut W, user: &User) -> Result<(), ApiError> {
    let role = if user.is_superuser { " [superuser]" } else { "" };
    writeln!(writer, "Signed in as {} <{}>{role}", user.username, user.email)
        .map_err(|e| io_error(&e))
}

/// Writes the sale popularity statistics.
pub fn write_statistics<W: Write>(
    writer: &mut W,
    rows: &[SalePopularityRow],
) -> Result<(), ApiError> {
    writeln!(writer, "Sale popularity:").map_err(|e| io_error(&e))?;
    writeln!(writer).map_err(|e| io_error(&e))?;
    for row in rows {
        writeln!(writer, "  {} on {}: {} sold", row.game, row.platform, row.amount)
            .map_err(|e| io_error(&e))?;
    }
    writeln!(writer).map_err(|e| io_error(&e))?;
    writeln!(writer, "{} rows", rows.len()).map_err(|e| io_error(&e))
}

/// Converts an I/O error to an [`ApiError::Io`].
pub(crate) fn io_error(error: &io::Error) -> ApiError {
    ApiError::Io {
        message: error.to_string(),
    }
}
