//! Builds typed create payloads and edit values from `--set` assignments.
//!
//! Assignments arrive as `field=value` pairs. Identifier lists use `;` as
//! the separator inside a value, e.g. `genres=ge-1;ge-2`, because `,`
//! already separates assignments. Unknown field names are rejected so a
//! typo cannot silently drop a value.

use chrono::NaiveDate;
use curator::ApiError;
use curator::api::models::{
    CompanyCreate, GameCreate, GenreCreate, PlatformCreate, SaleCreate, UserCreate,
};
use curator::diff::{CompanyEdit, GameEdit, GenreEdit, PlatformEdit, SaleEdit, UserEdit};

/// Field assignments parsed from the command line.
pub type Assignments = [(String, String)];

fn lookup<'a>(fields: &'a Assignments, key: &str) -> Option<&'a str> {
    fields
        .iter()
        .find(|(field, _)| field == key)
        .map(|(_, value)| value.as_str())
}

fn require<'a>(fields: &'a Assignments, key: &str) -> Result<&'a str, ApiError> {
    lookup(fields, key).ok_or_else(|| ApiError::Configuration {
        message: format!("missing required field '{key}'"),
    })
}

fn reject_unknown(fields: &Assignments, allowed: &[&str]) -> Result<(), ApiError> {
    for (field, _) in fields {
        if !allowed.contains(&field.as_str()) {
            return Err(ApiError::Configuration {
                message: format!("unknown field '{field}' (expected one of: {})", allowed.join(", ")),
            });
        }
    }
    Ok(())
}

fn parse_date(field: &str, value: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|error| ApiError::Configuration {
        message: format!("field '{field}' is not a valid date (expected YYYY-MM-DD): {error}"),
    })
}

fn parse_amount(field: &str, value: &str) -> Result<i64, ApiError> {
    value.parse().map_err(|error| ApiError::Configuration {
        message: format!("field '{field}' is not a valid amount: {error}"),
    })
}

fn parse_bool(field: &str, value: &str) -> Result<bool, ApiError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(ApiError::Configuration {
            message: format!("field '{field}' must be true or false, got '{other}'"),
        }),
    }
}

fn parse_id_list(value: &str) -> Vec<String> {
    value
        .split(';')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Builds a game create payload.
///
/// # Errors
///
/// Returns [`ApiError::Configuration`] for missing, unknown, or malformed
/// fields.
pub fn game_create(fields: &Assignments) -> Result<GameCreate, ApiError> {
    reject_unknown(
        fields,
        &["title", "released_at", "created_by_company_id", "genres", "platforms"],
    )?;
    Ok(GameCreate {
        title: require(fields, "title")?.to_owned(),
        released_at: parse_date("released_at", require(fields, "released_at")?)?,
        created_by_company_id: require(fields, "created_by_company_id")?.to_owned(),
        genres: lookup(fields, "genres").map(parse_id_list).unwrap_or_default(),
        platforms: lookup(fields, "platforms")
            .map(parse_id_list)
            .unwrap_or_default(),
    })
}

/// Builds a company create payload.
///
/// # Errors
///
/// Returns [`ApiError::Configuration`] for missing, unknown, or malformed
/// fields.
pub fn company_create(fields: &Assignments) -> Result<CompanyCreate, ApiError> {
    reject_unknown(fields, &["title", "founded_at"])?;
    Ok(CompanyCreate {
        title: require(fields, "title")?.to_owned(),
        founded_at: parse_date("founded_at", require(fields, "founded_at")?)?,
    })
}

/// Builds a platform create payload.
///
/// # Errors
///
/// Returns [`ApiError::Configuration`] for missing or unknown fields.
pub fn platform_create(fields: &Assignments) -> Result<PlatformCreate, ApiError> {
    reject_unknown(fields, &["title"])?;
    Ok(PlatformCreate {
        title: require(fields, "title")?.to_owned(),
    })
}

/// Builds a genre create payload.
///
/// # Errors
///
/// Returns [`ApiError::Configuration`] for missing or unknown fields.
pub fn genre_create(fields: &Assignments) -> Result<GenreCreate, ApiError> {
    reject_unknown(fields, &["title"])?;
    Ok(GenreCreate {
        title: require(fields, "title")?.to_owned(),
    })
}

/// Builds a sale create payload.
///
/// # Errors
///
/// Returns [`ApiError::Configuration`] for missing, unknown, or malformed
/// fields.
pub fn sale_create(fields: &Assignments) -> Result<SaleCreate, ApiError> {
    reject_unknown(fields, &["amount", "game_id", "platform_id"])?;
    Ok(SaleCreate {
        amount: parse_amount("amount", require(fields, "amount")?)?,
        game_id: require(fields, "game_id")?.to_owned(),
        platform_id: require(fields, "platform_id")?.to_owned(),
    })
}

/// Builds a user registration payload.
///
/// # Errors
///
/// Returns [`ApiError::Configuration`] for missing or unknown fields.
pub fn user_create(fields: &Assignments) -> Result<UserCreate, ApiError> {
    reject_unknown(fields, &["username", "email", "password"])?;
    Ok(UserCreate {
        username: require(fields, "username")?.to_owned(),
        email: require(fields, "email")?.to_owned(),
        password: require(fields, "password")?.to_owned(),
    })
}

/// Builds the edited game values for a patch.
///
/// # Errors
///
/// Returns [`ApiError::Configuration`] for unknown or malformed fields.
pub fn game_edit(fields: &Assignments) -> Result<GameEdit, ApiError> {
    reject_unknown(
        fields,
        &["title", "released_at", "created_by_company", "genres", "platforms"],
    )?;
    Ok(GameEdit {
        title: lookup(fields, "title").map(str::to_owned),
        released_at: lookup(fields, "released_at")
            .map(|value| parse_date("released_at", value))
            .transpose()?,
        created_by_company: lookup(fields, "created_by_company").map(str::to_owned),
        genres: lookup(fields, "genres").map(parse_id_list),
        platforms: lookup(fields, "platforms").map(parse_id_list),
    })
}

/// Builds the edited company values for a patch.
///
/// # Errors
///
/// Returns [`ApiError::Configuration`] for unknown or malformed fields.
pub fn company_edit(fields: &Assignments) -> Result<CompanyEdit, ApiError> {
    reject_unknown(fields, &["title", "founded_at"])?;
    Ok(CompanyEdit {
        title: lookup(fields, "title").map(str::to_owned),
        founded_at: lookup(fields, "founded_at")
            .map(|value| parse_date("founded_at", value))
            .transpose()?,
    })
}

/// Builds the edited platform values for a patch.
///
/// # Errors
///
/// Returns [`ApiError::Configuration`] for unknown fields.
pub fn platform_edit(fields: &Assignments) -> Result<PlatformEdit, ApiError> {
    reject_unknown(fields, &["title"])?;
    Ok(PlatformEdit {
        title: lookup(fields, "title").map(str::to_owned),
    })
}

/// Builds the edited genre values for a patch.
///
/// # Errors
///
/// Returns [`ApiError::Configuration`] for unknown fields.
pub fn genre_edit(fields: &Assignments) -> Result<GenreEdit, ApiError> {
    reject_unknown(fields, &["title"])?;
    Ok(GenreEdit {
        title: lookup(fields, "title").map(str::to_owned),
    })
}

/// Builds the edited sale values for a patch.
///
/// # Errors
///
/// Returns [`ApiError::Configuration`] for unknown or malformed fields.
pub fn sale_edit(fields: &Assignments) -> Result<SaleEdit, ApiError> {
    reject_unknown(fields, &["amount", "game_id", "platform_id"])?;
    Ok(SaleEdit {
        amount: lookup(fields, "amount")
            .map(|value| parse_amount("amount", value))
            .transpose()?,
        game_id: lookup(fields, "game_id").map(str::to_owned),
        platform_id: lookup(fields, "platform_id").map(str::to_owned),
    })
}

/// Builds the edited user values for a patch.
///
/// # Errors
///
/// Returns [`ApiError::Configuration`] for unknown or malformed fields.
pub fn user_edit(fields: &Assignments) -> Result<UserEdit, ApiError> {
    reject_unknown(fields, &["username", "email", "is_superuser"])?;
    Ok(UserEdit {
        username: lookup(fields, "username").map(str::to_owned),
        email: lookup(fields, "email").map(str::to_owned),
        is_superuser: lookup(fields, "is_superuser")
            .map(|value| parse_bool("is_superuser", value))
            .transpose()?,
    })
}
