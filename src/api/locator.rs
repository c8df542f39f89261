//! Service URL resolution and identity wrappers for the catalogue API.

use std::fmt;
use std::str::FromStr;

use url::Url;

use super::error::ApiError;

/// Catalogue resources exposed by the service under `/api/<segment>/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    /// Games catalogue.
    Games,
    /// Companies catalogue.
    Companies,
    /// Platforms catalogue.
    Platforms,
    /// Genres catalogue.
    Genres,
    /// Sales records.
    Sales,
    /// User accounts.
    Users,
    /// Database backups.
    Backups,
}

impl Resource {
    /// Returns the URL path segment for this resource.
    #[must_use]
    pub const fn path_segment(self) -> &'static str {
        match self {
            Self::Games => "games",
            Self::Companies => "companies",
            Self::Platforms => "platforms",
            Self::Genres => "genres",
            Self::Sales => "sales",
            Self::Users => "users",
            Self::Backups => "backups",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_segment())
    }
}

impl FromStr for Resource {
    type Err = ApiError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "games" | "game" => Ok(Self::Games),
            "companies" | "company" => Ok(Self::Companies),
            "platforms" | "platform" => Ok(Self::Platforms),
            "genres" | "genre" => Ok(Self::Genres),
            "sales" | "sale" => Ok(Self::Sales),
            "users" | "user" => Ok(Self::Users),
            "backups" | "backup" => Ok(Self::Backups),
            other => Err(ApiError::UnknownResource {
                name: other.to_owned(),
            }),
        }
    }
}

/// Access token wrapper enforcing presence.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Validates that the token is non-empty and trims whitespace.
    ///
    /// Only visible ASCII is accepted: the token must be usable verbatim in
    /// an `Authorization` header value.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::MissingToken`] when the supplied string is blank
    /// and [`ApiError::Configuration`] when it contains bytes that cannot
    /// appear in an `Authorization` header.
    pub fn new(token: impl AsRef<str>) -> Result<Self, ApiError> {
        let trimmed = token.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ApiError::MissingToken);
        }
        if !trimmed.bytes().all(|byte| byte.is_ascii_graphic()) {
            return Err(ApiError::Configuration {
                message: "token contains characters not permitted in an Authorization header"
                    .to_owned(),
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the token value.
    #[must_use]
    pub const fn value(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for AccessToken {
    fn as_ref(&self) -> &str {
        self.value()
    }
}

impl fmt::Debug for AccessToken {
    // Never echo token material into logs.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// Resolved base URL of the catalogue service plus path helpers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceLocator {
    base: Url,
}

impl ServiceLocator {
    /// Parses the service base URL (e.g. `http://localhost:8000`).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidUrl`] when the value is not an absolute
    /// HTTP(S) URL.
    pub fn parse(base: &str) -> Result<Self, ApiError> {
        let url = Url::parse(base.trim_end_matches('/'))
            .map_err(|error| ApiError::InvalidUrl(error.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ApiError::InvalidUrl(format!(
                "unsupported scheme: {}",
                url.scheme()
            )));
        }
        Ok(Self { base: url })
    }

    /// Returns the service base URL.
    #[must_use]
    pub const fn base(&self) -> &Url {
        &self.base
    }

    /// Collection endpoint for a resource: `/api/<segment>/`.
    ///
    /// The trailing slash is part of the service contract.
    #[must_use]
    pub fn collection_url(&self, resource: Resource) -> Url {
        self.join(&format!("api/{}/", resource.path_segment()))
    }

    /// Record endpoint for a resource: `/api/<segment>/{id}`.
    #[must_use]
    pub fn record_url(&self, resource: Resource, id: &str) -> Url {
        self.join(&format!("api/{}/{id}", resource.path_segment()))
    }

    /// Login endpoint issuing bearer tokens.
    #[must_use]
    pub fn access_token_url(&self) -> Url {
        self.join("api/auth/access-token")
    }

    /// Endpoint returning the user owning the presented token.
    #[must_use]
    pub fn test_token_url(&self) -> Url {
        self.join("api/auth/test-token")
    }

    /// Sale popularity statistics endpoint.
    #[must_use]
    pub fn popularity_statistics_url(&self) -> Url {
        self.join("api/sales/popularity-statistics")
    }

    fn join(&self, path: &str) -> Url {
        let mut url = self.base.clone();
        // Rebuild the path explicitly so a base URL with a trailing path
        // segment cannot swallow the `api/` prefix.
        url.set_path(path);
        url
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{AccessToken, ApiError, Resource, ServiceLocator};

    #[rstest]
    #[case::plural("games", Resource::Games)]
    #[case::singular("game", Resource::Games)]
    #[case::mixed_case("Users", Resource::Users)]
    #[case::padded(" backups ", Resource::Backups)]
    fn resource_parses_known_names(#[case] input: &str, #[case] expected: Resource) {
        let parsed: Resource = input.parse().expect("resource should parse");
        assert_eq!(parsed, expected);
    }

    #[test]
    fn resource_rejects_unknown_names() {
        let error = "weapons".parse::<Resource>().expect_err("should fail");
        assert!(
            matches!(error, ApiError::UnknownResource { name } if name == "weapons"),
            "expected UnknownResource"
        );
    }

    #[test]
    fn access_token_rejects_blank_values() {
        let error = AccessToken::new("   ").expect_err("blank token should fail");
        assert_eq!(error, ApiError::MissingToken);
    }

    #[rstest]
    #[case::embedded_newline("tok\nen")]
    #[case::embedded_space("tok en")]
    #[case::non_ascii("tøken")]
    fn access_token_rejects_header_unsafe_values(#[case] input: &str) {
        let error = AccessToken::new(input).expect_err("unsafe token should fail");
        assert!(
            matches!(error, ApiError::Configuration { .. }),
            "expected a Configuration error"
        );
    }

    #[test]
    fn access_token_trims_whitespace() {
        let token = AccessToken::new("  abc123  ").expect("token should be valid");
        assert_eq!(token.value(), "abc123");
    }

    #[test]
    fn access_token_debug_hides_material() {
        let token = AccessToken::new("secret").expect("token should be valid");
        assert_eq!(format!("{token:?}"), "AccessToken(***)");
    }

    #[test]
    fn locator_builds_collection_and_record_urls() {
        let locator = ServiceLocator::parse("http://localhost:8000").expect("should parse");
        assert_eq!(
            locator.collection_url(Resource::Games).as_str(),
            "http://localhost:8000/api/games/"
        );
        assert_eq!(
            locator.record_url(Resource::Companies, "abc").as_str(),
            "http://localhost:8000/api/companies/abc"
        );
        assert_eq!(
            locator.access_token_url().as_str(),
            "http://localhost:8000/api/auth/access-token"
        );
        assert_eq!(
            locator.popularity_statistics_url().as_str(),
            "http://localhost:8000/api/sales/popularity-statistics"
        );
    }

    #[test]
    fn locator_rejects_non_http_schemes() {
        let error = ServiceLocator::parse("ftp://example.com").expect_err("should fail");
        assert!(matches!(error, ApiError::InvalidUrl(_)));
    }
}
