//! GraphQL operation definitions for the Directus schemas.

use graphql_client::GraphQLQuery;

// Scalar types for the Directus schemas
// Must be defined in the same module where GraphQLQuery derive is used
#[allow(clippy::upper_case_acronyms)]
type JSON = serde_json::Value;
type Date = String;

// System schema (/graphql/system)
#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/directus/system_schema.graphql",
    query_path = "graphql/directus/queries/users.graphql",
    response_derives = "Debug, Clone"
)]
pub struct GetCurrentUser;

#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/directus/system_schema.graphql",
    query_path = "graphql/directus/queries/users.graphql",
    response_derives = "Debug, Clone"
)]
pub struct UpdateUser;

// Items schema (/graphql)
#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/directus/schema.graphql",
    query_path = "graphql/directus/queries/products.graphql",
    response_derives = "Debug, Clone"
)]
pub struct GetProducts;

#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/directus/schema.graphql",
    query_path = "graphql/directus/queries/products.graphql",
    response_derives = "Debug, Clone"
)]
pub struct SearchProducts;

#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/directus/schema.graphql",
    query_path = "graphql/directus/queries/products.graphql",
    response_derives = "Debug, Clone"
)]
pub struct GetProductsByCategory;

#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/directus/schema.graphql",
    query_path = "graphql/directus/queries/products.graphql",
    response_derives = "Debug, Clone"
)]
pub struct SearchProductsByCategory;

#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/directus/schema.graphql",
    query_path = "graphql/directus/queries/products.graphql",
    response_derives = "Debug, Clone"
)]
pub struct GetProductDetail;

#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/directus/schema.graphql",
    query_path = "graphql/directus/queries/categories.graphql",
    response_derives = "Debug, Clone"
)]
pub struct GetCategories;

#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/directus/schema.graphql",
    query_path = "graphql/directus/queries/boutiques.graphql",
    response_derives = "Debug, Clone"
)]
pub struct GetBoutiques;

#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/directus/schema.graphql",
    query_path = "graphql/directus/queries/boutiques.graphql",
    response_derives = "Debug, Clone"
)]
pub struct GetBoutique;

#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/directus/schema.graphql",
    query_path = "graphql/directus/queries/terminals.graphql",
    response_derives = "Debug, Clone"
)]
pub struct GetBoutiqueTerminals;

#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/directus/schema.graphql",
    query_path = "graphql/directus/queries/terminals.graphql",
    response_derives = "Debug, Clone"
)]
pub struct GetTerminalByAndroidId;

// Unset device fields are left out of the mutation input so an update
// never blanks a column the device did not report.
#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/directus/schema.graphql",
    query_path = "graphql/directus/queries/terminals.graphql",
    response_derives = "Debug, Clone",
    variables_derives = "Debug",
    skip_serializing_none
)]
pub struct CreateTerminal;

#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/directus/schema.graphql",
    query_path = "graphql/directus/queries/terminals.graphql",
    response_derives = "Debug, Clone",
    variables_derives = "Debug",
    skip_serializing_none
)]
pub struct UpdateTerminal;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    const PRODUCTS: &str = include_str!("../../../graphql/directus/queries/products.graphql");

    /// Text of one operation in the products document.
    fn operation(name: &str) -> &'static str {
        let start = PRODUCTS.find(&format!("query {name}(")).unwrap();
        let rest = &PRODUCTS[start..];
        let end = rest[1..].find("\nquery ").map_or(rest.len(), |i| i + 1);
        &rest[..end]
    }

    #[test]
    fn test_listing_has_no_status_filter_or_sort() {
        for name in [
            "GetProducts",
            "SearchProducts",
            "GetProductsByCategory",
            "SearchProductsByCategory",
        ] {
            let op = operation(name);
            assert!(!op.contains("published"), "{name} filters on status");
            assert!(!op.contains("sort"), "{name} sorts");
            assert!(!op.contains("search: $search"), "{name} uses full-text search");
        }
        assert!(!operation("GetProducts").contains("filter"));
    }

    #[test]
    fn test_search_matches_name_or_description() {
        for name in ["SearchProducts", "SearchProductsByCategory"] {
            let op = operation(name);
            assert!(op.contains("_or: [{ name: { _contains: $search } }, { description: { _contains: $search } }]"));
        }
    }

    #[test]
    fn test_category_filter() {
        let expected = "category_id: { id: { _eq: $category_id } }";
        assert!(operation("GetProductsByCategory").contains(expected));
        let combined = operation("SearchProductsByCategory");
        assert!(combined.contains("_and"));
        assert!(combined.contains(expected));
    }
}
