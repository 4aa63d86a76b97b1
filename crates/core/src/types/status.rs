//! Status enums for Directus records.

use serde::{Deserialize, Serialize};

/// Account status of a Directus user.
///
/// Only `Active` users are considered signed in. Anything the backend sends
/// that this enum does not know about is kept as `Unknown` rather than
/// failing the whole response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    Active,
    Invited,
    Draft,
    Suspended,
    Archived,
    #[default]
    Unknown,
}

impl UserStatus {
    /// Parse a backend value, mapping unrecognised values to `Unknown`.
    #[must_use]
    pub fn from_backend(value: Option<&str>) -> Self {
        value.and_then(|s| s.parse().ok()).unwrap_or_default()
    }
}

impl std::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Invited => write!(f, "invited"),
            Self::Draft => write!(f, "draft"),
            Self::Suspended => write!(f, "suspended"),
            Self::Archived => write!(f, "archived"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

impl std::str::FromStr for UserStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "invited" => Ok(Self::Invited),
            "draft" => Ok(Self::Draft),
            "suspended" => Ok(Self::Suspended),
            "archived" => Ok(Self::Archived),
            _ => Err(format!("invalid user status: {s}")),
        }
    }
}

/// Publication status of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    Published,
    Draft,
    Archived,
    #[default]
    Unknown,
}

impl ProductStatus {
    /// Parse a backend value, mapping unrecognised values to `Unknown`.
    #[must_use]
    pub fn from_backend(value: Option<&str>) -> Self {
        value.and_then(|s| s.parse().ok()).unwrap_or_default()
    }
}

impl std::fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Published => write!(f, "published"),
            Self::Draft => write!(f, "draft"),
            Self::Archived => write!(f, "archived"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

impl std::str::FromStr for ProductStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "published" => Ok(Self::Published),
            "draft" => Ok(Self::Draft),
            "archived" => Ok(Self::Archived),
            _ => Err(format!("invalid product status: {s}")),
        }
    }
}
