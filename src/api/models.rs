//! Wire models for the catalogue service.
//!
//! Records arrive as JSON bodies; list endpoints additionally carry the
//! collection total in an `x-total-count` response header, so a list result
//! is represented here as [`ListPage`] pairing the items with that total.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One fetched page of records plus the authoritative collection total.
#[derive(Debug, Clone, PartialEq)]
pub struct ListPage<T> {
    /// Records on this page, in server order.
    pub items: Vec<T>,
    /// Total record count from the `x-total-count` header.
    pub total: u64,
}

/// Abbreviated user reference embedded in other records.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserRef {
    /// User identifier.
    pub id: String,
    /// Login name.
    pub username: String,
}

/// Abbreviated company reference embedded in other records.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CompanyRef {
    /// Company identifier.
    pub id: String,
    /// Company title.
    pub title: String,
}

/// Abbreviated game reference embedded in other records.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GameRef {
    /// Game identifier.
    pub id: String,
    /// Game title.
    pub title: String,
}

/// Abbreviated platform reference embedded in other records.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PlatformRef {
    /// Platform identifier.
    pub id: String,
    /// Platform title.
    pub title: String,
}

/// Abbreviated genre reference embedded in other records.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GenreRef {
    /// Genre identifier.
    pub id: String,
    /// Genre title.
    pub title: String,
}

/// Abbreviated sale reference embedded in game records.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SaleRef {
    /// Sale identifier.
    pub id: String,
    /// Units sold.
    pub amount: i64,
}

/// A game in the catalogue.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Game {
    /// Record identifier.
    pub id: String,
    /// Game title.
    pub title: String,
    /// Release date.
    pub released_at: NaiveDate,
    /// Record creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Publishing company.
    pub created_by_company: CompanyRef,
    /// Administrator who created the record, when known.
    #[serde(default)]
    pub created_by_user: Option<UserRef>,
    /// Associated genres.
    #[serde(default)]
    pub genres: Vec<GenreRef>,
    /// Platforms the game was released on.
    #[serde(default)]
    pub platforms: Vec<PlatformRef>,
    /// Recorded sales.
    #[serde(default)]
    pub sales: Vec<SaleRef>,
}

/// A company in the catalogue.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Company {
    /// Record identifier.
    pub id: String,
    /// Company title.
    pub title: String,
    /// Founding date.
    pub founded_at: NaiveDate,
    /// Record creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Administrator who created the record, when known.
    #[serde(default)]
    pub created_by_user: Option<UserRef>,
    /// Games published by this company.
    #[serde(default)]
    pub games: Vec<GameRef>,
}

/// A platform in the catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Platform {
    /// Record identifier.
    pub id: String,
    /// Platform title.
    pub title: String,
    /// Administrator who created the record, when known.
    #[serde(default)]
    pub created_by_user: Option<UserRef>,
    /// Games released on this platform.
    #[serde(default)]
    pub games: Vec<GameRef>,
    /// Sales recorded on this platform.
    #[serde(default)]
    pub sales: Vec<SaleRef>,
}

/// A genre in the catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Genre {
    /// Record identifier.
    pub id: String,
    /// Genre title.
    pub title: String,
    /// Administrator who created the record, when known.
    #[serde(default)]
    pub created_by_user: Option<UserRef>,
    /// Games tagged with this genre.
    #[serde(default)]
    pub games: Vec<GameRef>,
}

/// A sale record.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Sale {
    /// Record identifier.
    pub id: String,
    /// Units sold.
    pub amount: i64,
    /// Game the sale belongs to.
    pub game: GameRef,
    /// Platform the sale was recorded on.
    pub platform: PlatformRef,
    /// Administrator who created the record, when known.
    #[serde(default)]
    pub created_by_user: Option<UserRef>,
}

/// A user account.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct User {
    /// Record identifier.
    pub id: String,
    /// Login name.
    pub username: String,
    /// Contact e-mail.
    pub email: String,
    /// Whether the account may perform mutations.
    pub is_superuser: bool,
    /// Whether this is the seeded primary account.
    pub is_primary: bool,
    /// Record creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// A database backup record.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Backup {
    /// Record identifier.
    pub id: String,
    /// Backup title.
    pub title: String,
    /// Download URL of the uploaded archive.
    pub url: String,
    /// Record creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Administrator who created the backup, when known.
    #[serde(default)]
    pub created_by_user: Option<UserRef>,
}

/// Payload for creating a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameCreate {
    /// Game title.
    pub title: String,
    /// Release date.
    pub released_at: NaiveDate,
    /// Publishing company identifier.
    pub created_by_company_id: String,
    /// Genre identifiers.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub genres: Vec<String>,
    /// Platform identifiers.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub platforms: Vec<String>,
}

/// Payload for creating a company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompanyCreate {
    /// Company title.
    pub title: String,
    /// Founding date.
    pub founded_at: NaiveDate,
}

/// Payload for creating a platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformCreate {
    /// Platform title.
    pub title: String,
}

/// Payload for creating a genre.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenreCreate {
    /// Genre title.
    pub title: String,
}

/// Payload for creating a sale record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaleCreate {
    /// Units sold.
    pub amount: i64,
    /// Game identifier.
    pub game_id: String,
    /// Platform identifier.
    pub platform_id: String,
}

/// Payload for registering a user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserCreate {
    /// Login name.
    pub username: String,
    /// Contact e-mail.
    pub email: String,
    /// Plain-text password, hashed server-side.
    pub password: String,
}

/// Minimal patch for a game; only present fields are serialised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct GameUpdate {
    /// New title, when changed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New release date, when changed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub released_at: Option<NaiveDate>,
    /// New publishing company identifier, when changed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by_company_id: Option<String>,
    /// Replacement genre identifier set, when changed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genres: Option<Vec<String>>,
    /// Replacement platform identifier set, when changed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platforms: Option<Vec<String>>,
}

impl GameUpdate {
    /// Returns true when no field is present, i.e. a no-op submit.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.released_at.is_none()
            && self.created_by_company_id.is_none()
            && self.genres.is_none()
            && self.platforms.is_none()
    }
}

/// Minimal patch for a company; only present fields are serialised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct CompanyUpdate {
    /// New title, when changed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New founding date, when changed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub founded_at: Option<NaiveDate>,
}

impl CompanyUpdate {
    /// Returns true when no field is present.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none() && self.founded_at.is_none()
    }
}

/// Minimal patch for a platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct PlatformUpdate {
    /// New title, when changed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl PlatformUpdate {
    /// Returns true when no field is present.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
    }
}

/// Minimal patch for a genre.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct GenreUpdate {
    /// New title, when changed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl GenreUpdate {
    /// Returns true when no field is present.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
    }
}

/// Minimal patch for a sale record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct SaleUpdate {
    /// New amount, when changed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<i64>,
    /// New game identifier, when changed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_id: Option<String>,
    /// New platform identifier, when changed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform_id: Option<String>,
}

impl SaleUpdate {
    /// Returns true when no field is present.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.amount.is_none() && self.game_id.is_none() && self.platform_id.is_none()
    }
}

/// Minimal patch for a user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct UserUpdate {
    /// New login name, when changed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// New contact e-mail, when changed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// New superuser flag, when changed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_superuser: Option<bool>,
}

impl UserUpdate {
    /// Returns true when no field is present.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.username.is_none() && self.email.is_none() && self.is_superuser.is_none()
    }
}

/// Bearer token issued by the login endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenResponse {
    /// The bearer token value.
    pub access_token: String,
    /// Token scheme, always `Bearer`.
    pub token_type: String,
}

/// One row of the sale popularity statistics.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SalePopularityRow {
    /// Game title.
    pub game: String,
    /// Platform title.
    pub platform: String,
    /// Aggregate units sold.
    pub amount: i64,
}

#[cfg(test)]
mod tests {
    use super::{GameUpdate, UserUpdate};

    #[test]
    fn empty_game_update_serialises_to_empty_object() {
        let patch = GameUpdate::default();
        assert!(patch.is_empty());
        let json = serde_json::to_string(&patch).expect("patch should serialise");
        assert_eq!(json, "{}");
    }

    #[test]
    fn partial_game_update_serialises_only_present_fields() {
        let patch = GameUpdate {
            title: Some("Chrono Trigger".to_owned()),
            ..Default::default()
        };
        let json = serde_json::to_value(&patch).expect("patch should serialise");
        assert_eq!(json, serde_json::json!({"title": "Chrono Trigger"}));
    }

    #[test]
    fn user_update_serialises_boolean_fields_when_present() {
        let patch = UserUpdate {
            is_superuser: Some(false),
            ..Default::default()
        };
        let json = serde_json::to_value(&patch).expect("patch should serialise");
        assert_eq!(json, serde_json::json!({"is_superuser": false}));
    }
}
