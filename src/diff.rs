//! Minimal-patch computation for edit forms.
//!
//! Before a `PATCH` is issued the edited values are compared against the
//! original record and only changed fields are kept, so unrelated fields are
//! never overwritten server-side. An empty diff means a no-op submit: the
//! caller skips the network call entirely.
//!
//! Relation arrays (genres, platforms) are compared by value-set equality:
//! the same identifiers in a different order are not a change.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::api::models::{
    Company, CompanyUpdate, CompanyRef, Game, GameUpdate, Genre, GenreUpdate, Platform,
    PlatformUpdate, Sale, SaleUpdate, User, UserUpdate,
};

/// Edited field values for a game form.
///
/// `None` means the field was left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameEdit {
    /// Edited title.
    pub title: Option<String>,
    /// Edited release date.
    pub released_at: Option<NaiveDate>,
    /// Edited publishing company (identifier or current title).
    pub created_by_company: Option<String>,
    /// Edited genre identifier list.
    pub genres: Option<Vec<String>>,
    /// Edited platform identifier list.
    pub platforms: Option<Vec<String>>,
}

/// Edited field values for a company form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompanyEdit {
    /// Edited title.
    pub title: Option<String>,
    /// Edited founding date.
    pub founded_at: Option<NaiveDate>,
}

/// Edited field values for a platform form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlatformEdit {
    /// Edited title.
    pub title: Option<String>,
}

/// Edited field values for a genre form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenreEdit {
    /// Edited title.
    pub title: Option<String>,
}

/// Edited field values for a sale form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaleEdit {
    /// Edited amount.
    pub amount: Option<i64>,
    /// Edited game identifier.
    pub game_id: Option<String>,
    /// Edited platform identifier.
    pub platform_id: Option<String>,
}

/// Edited field values for a user form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserEdit {
    /// Edited login name.
    pub username: Option<String>,
    /// Edited e-mail.
    pub email: Option<String>,
    /// Edited superuser flag.
    pub is_superuser: Option<bool>,
}

/// Keeps an edited scalar only when it differs from the original.
fn changed<T: PartialEq + Clone>(edited: Option<&T>, original: &T) -> Option<T> {
    edited.filter(|value| *value != original).cloned()
}

/// Keeps an edited relation list only when it differs from the original as
/// a set of identifiers.
fn changed_id_set(edited: Option<&Vec<String>>, original_ids: &[&str]) -> Option<Vec<String>> {
    let edited = edited?;
    let edited_set: BTreeSet<&str> = edited.iter().map(String::as_str).collect();
    let original_set: BTreeSet<&str> = original_ids.iter().copied().collect();
    if edited_set == original_set {
        None
    } else {
        Some(edited.clone())
    }
}

/// A company assignment matches when it names the current company by
/// identifier or by title; edit forms prefill the title.
fn changed_company(edited: Option<&String>, current: &CompanyRef) -> Option<String> {
    edited
        .filter(|value| *value != &current.id && *value != &current.title)
        .cloned()
}

/// Computes the minimal patch for a game edit.
///
/// Returns `None` when nothing changed, in which case no request should be
/// issued.
#[must_use]
pub fn game_patch(original: &Game, edit: &GameEdit) -> Option<GameUpdate> {
    let genre_ids: Vec<&str> = original.genres.iter().map(|g| g.id.as_str()).collect();
    let platform_ids: Vec<&str> = original.platforms.iter().map(|p| p.id.as_str()).collect();

    let patch = GameUpdate {
        title: changed(edit.title.as_ref(), &original.title),
        released_at: changed(edit.released_at.as_ref(), &original.released_at),
        created_by_company_id: changed_company(
            edit.created_by_company.as_ref(),
            &original.created_by_company,
        ),
        genres: changed_id_set(edit.genres.as_ref(), &genre_ids),
        platforms: changed_id_set(edit.platforms.as_ref(), &platform_ids),
    };
    (!patch.is_empty()).then_some(patch)
}

/// Computes the minimal patch for a company edit.
#[must_use]
pub fn company_patch(original: &Company, edit: &CompanyEdit) -> Option<CompanyUpdate> {
    let patch = CompanyUpdate {
        title: changed(edit.title.as_ref(), &original.title),
        founded_at: changed(edit.founded_at.as_ref(), &original.founded_at),
    };
    (!patch.is_empty()).then_some(patch)
}

/// Computes the minimal patch for a platform edit.
#[must_use]
pub fn platform_patch(original: &Platform, edit: &PlatformEdit) -> Option<PlatformUpdate> {
    let patch = PlatformUpdate {
        title: changed(edit.title.as_ref(), &original.title),
    };
    (!patch.is_empty()).then_some(patch)
}

/// Computes the minimal patch for a genre edit.
#[must_use]
pub fn genre_patch(original: &Genre, edit: &GenreEdit) -> Option<GenreUpdate> {
    let patch = GenreUpdate {
        title: changed(edit.title.as_ref(), &original.title),
    };
    (!patch.is_empty()).then_some(patch)
}

/// Computes the minimal patch for a sale edit.
#[must_use]
pub fn sale_patch(original: &Sale, edit: &SaleEdit) -> Option<SaleUpdate> {
    let patch = SaleUpdate {
        amount: changed(edit.amount.as_ref(), &original.amount),
        game_id: changed(edit.game_id.as_ref(), &original.game.id),
        platform_id: changed(edit.platform_id.as_ref(), &original.platform.id),
    };
    (!patch.is_empty()).then_some(patch)
}

/// Computes the minimal patch for a user edit.
#[must_use]
pub fn user_patch(original: &User, edit: &UserEdit) -> Option<UserUpdate> {
    let patch = UserUpdate {
        username: changed(edit.username.as_ref(), &original.username),
        email: changed(edit.email.as_ref(), &original.email),
        is_superuser: changed(edit.is_superuser.as_ref(), &original.is_superuser),
    };
    (!patch.is_empty()).then_some(patch)
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};

    use super::{GameEdit, UserEdit, game_patch, user_patch};
    use crate::api::models::{CompanyRef, Game, GenreRef, PlatformRef, User};

    fn original_game() -> Game {
        Game {
            id: "g-1".to_owned(),
            title: "Majora's Mask".to_owned(),
            released_at: NaiveDate::from_ymd_opt(2000, 4, 27).expect("date should be valid"),
            created_at: Utc::now(),
            created_by_company: CompanyRef {
                id: "c-1".to_owned(),
                title: "Nintendo".to_owned(),
            },
            created_by_user: None,
            genres: vec![
                GenreRef {
                    id: "ge-1".to_owned(),
                    title: "Adventure".to_owned(),
                },
                GenreRef {
                    id: "ge-2".to_owned(),
                    title: "Action".to_owned(),
                },
            ],
            platforms: vec![PlatformRef {
                id: "p-1".to_owned(),
                title: "N64".to_owned(),
            }],
            sales: vec![],
        }
    }

    #[test]
    fn untouched_edit_yields_no_patch() {
        let patch = game_patch(&original_game(), &GameEdit::default());
        assert_eq!(patch, None, "no-op submit must not produce a patch");
    }

    #[test]
    fn resubmitting_original_values_yields_no_patch() {
        let game = original_game();
        let edit = GameEdit {
            title: Some(game.title.clone()),
            released_at: Some(game.released_at),
            created_by_company: Some(game.created_by_company.title.clone()),
            genres: Some(vec!["ge-2".to_owned(), "ge-1".to_owned()]),
            platforms: Some(vec!["p-1".to_owned()]),
        };
        assert_eq!(
            game_patch(&game, &edit),
            None,
            "identical values (relations order-insensitive) must diff empty"
        );
    }

    #[test]
    fn title_only_change_patches_exactly_title() {
        let game = original_game();
        let edit = GameEdit {
            title: Some("Ocarina of Time".to_owned()),
            ..Default::default()
        };
        let patch = game_patch(&game, &edit).expect("patch expected");

        assert_eq!(patch.title.as_deref(), Some("Ocarina of Time"));
        assert_eq!(
            serde_json::to_value(&patch).expect("patch should serialise"),
            serde_json::json!({"title": "Ocarina of Time"})
        );
    }

    #[test]
    fn company_assignment_matching_id_or_title_is_not_a_change() {
        let game = original_game();
        let by_id = GameEdit {
            created_by_company: Some("c-1".to_owned()),
            ..Default::default()
        };
        let by_title = GameEdit {
            created_by_company: Some("Nintendo".to_owned()),
            ..Default::default()
        };
        assert_eq!(game_patch(&game, &by_id), None);
        assert_eq!(game_patch(&game, &by_title), None);

        let reassigned = GameEdit {
            created_by_company: Some("c-2".to_owned()),
            ..Default::default()
        };
        let patch = game_patch(&game, &reassigned).expect("patch expected");
        assert_eq!(patch.created_by_company_id.as_deref(), Some("c-2"));
    }

    #[test]
    fn relation_set_change_includes_full_replacement_list() {
        let game = original_game();
        let edit = GameEdit {
            genres: Some(vec!["ge-1".to_owned(), "ge-3".to_owned()]),
            ..Default::default()
        };
        let patch = game_patch(&game, &edit).expect("patch expected");
        assert_eq!(
            patch.genres,
            Some(vec!["ge-1".to_owned(), "ge-3".to_owned()])
        );
        assert_eq!(patch.platforms, None);
    }

    #[test]
    fn boolean_flip_is_detected_for_users() {
        let user = User {
            id: "u-1".to_owned(),
            username: "sam".to_owned(),
            email: "sam@example.com".to_owned(),
            is_superuser: false,
            is_primary: false,
            created_at: Utc::now(),
        };
        let edit = UserEdit {
            is_superuser: Some(true),
            ..Default::default()
        };
        let patch = user_patch(&user, &edit).expect("patch expected");
        assert_eq!(patch.is_superuser, Some(true));
        assert_eq!(patch.username, None);

        let same = UserEdit {
            is_superuser: Some(false),
            ..Default::default()
        };
        assert_eq!(user_patch(&user, &same), None);
    }
}
