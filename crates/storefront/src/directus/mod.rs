//! Directus GraphQL client.
//!
//! # Architecture
//!
//! - Uses `graphql-client` crate for type-safe GraphQL queries
//! - Directus is source of truth - NO local persistence, direct API calls
//! - In-memory caching via `moka` for catalogue reads (5 minute TTL)
//!
//! # Endpoints
//!
//! Directus serves two GraphQL schemas:
//!
//! - `/graphql` - content collections (products, categories, boutiques, terminals)
//! - `/graphql/system` - system collections (current user, profile updates)
//!
//! # Example
//!
//! ```rust,ignore
//! use wardrobe_storefront::{StorefrontClient, StorefrontConfig, ProductQuery};
//!
//! let client = StorefrontClient::new(&StorefrontConfig::from_env()?)?;
//!
//! let me = client.current_user().await?;
//! let page = client.products(&ProductQuery::default().with_search("coat")).await?;
//! ```

mod client;
pub mod types;

pub use client::{Endpoint, StorefrontClient};
pub use types::*;

use thiserror::Error;

/// Errors that can occur when talking to the Directus API.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// GraphQL query returned errors.
    #[error("GraphQL errors: {}", format_graphql_errors(.0))]
    GraphQL(Vec<GraphQLError>),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by the backend.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),
}

/// A GraphQL error returned by Directus.
#[derive(Debug, Clone)]
pub struct GraphQLError {
    /// Error message.
    pub message: String,
    /// Source locations in the query.
    pub locations: Vec<GraphQLErrorLocation>,
    /// Path to the error in the response.
    pub path: Vec<serde_json::Value>,
}

impl GraphQLError {
    /// An error with only a message.
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            locations: Vec::new(),
            path: Vec::new(),
        }
    }
}

/// Location in a GraphQL query where an error occurred.
#[derive(Debug, Clone)]
pub struct GraphQLErrorLocation {
    /// Line number (1-indexed).
    pub line: i64,
    /// Column number (1-indexed).
    pub column: i64,
}

fn format_graphql_errors(errors: &[GraphQLError]) -> String {
    if errors.is_empty() {
        return "(no error details provided)".to_string();
    }

    errors
        .iter()
        .enumerate()
        .map(|(i, e)| {
            let mut parts = Vec::new();

            if !e.message.is_empty() {
                parts.push(e.message.clone());
            }

            if !e.path.is_empty() {
                let path_str = e
                    .path
                    .iter()
                    .map(|p| match p {
                        serde_json::Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(".");
                parts.push(format!("path: {path_str}"));
            }

            if let Some(loc) = e.locations.first() {
                parts.push(format!("at line {}:{}", loc.line, loc.column));
            }

            if parts.is_empty() {
                format!("[error {}]: (no details)", i + 1)
            } else {
                parts.join(" ")
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = StorefrontError::NotFound("current user".to_string());
        assert_eq!(err.to_string(), "Not found: current user");
    }

    #[test]
    fn test_graphql_error_formatting() {
        let err = StorefrontError::GraphQL(vec![
            GraphQLError::message("You don't have permission to access this."),
            GraphQLError::message("Invalid ID"),
        ]);
        assert_eq!(
            err.to_string(),
            "GraphQL errors: You don't have permission to access this.; Invalid ID"
        );
    }

    #[test]
    fn test_graphql_error_path_and_location() {
        let err = StorefrontError::GraphQL(vec![GraphQLError {
            message: String::new(),
            locations: vec![GraphQLErrorLocation { line: 2, column: 3 }],
            path: vec![
                serde_json::Value::String("products".to_string()),
                serde_json::Value::Number(4.into()),
            ],
        }]);
        assert_eq!(
            err.to_string(),
            "GraphQL errors: path: products.4 at line 2:3"
        );
    }

    #[test]
    fn test_graphql_error_no_details() {
        let err = StorefrontError::GraphQL(vec![GraphQLError::message("")]);
        assert_eq!(err.to_string(), "GraphQL errors: [error 1]: (no details)");

        let err = StorefrontError::GraphQL(vec![]);
        assert_eq!(
            err.to_string(),
            "GraphQL errors: (no error details provided)"
        );
    }

    #[test]
    fn test_rate_limited_error() {
        let err = StorefrontError::RateLimited(30);
        assert_eq!(err.to_string(), "Rate limited, retry after 30 seconds");
    }
}
