//! Directus GraphQL client implementation.
//!
//! Uses `graphql_client` for type-safe queries with `reqwest` 0.13 for HTTP.
//! Caches products, categories and boutiques using `moka` (5-minute TTL).

mod cache;
mod conversions;
mod queries;

use std::sync::Arc;
use std::time::Duration;

use graphql_client::{GraphQLQuery, Response};
use moka::future::Cache;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, instrument};
use url::Url;
use wardrobe_core::{BoutiqueId, FileId, ProductId, UserId};

use crate::assets::{self, AssetTransform};
use crate::config::StorefrontConfig;
use crate::directus::types::{
    Boutique, Category, Product, ProductQuery, ProductSummary, ProfileUpdate, Terminal,
    TerminalRegistration, TerminalSync, UpdatedProfile, User,
};
use crate::directus::{GraphQLError, GraphQLErrorLocation, StorefrontError};

use cache::{CacheKey, CacheValue};
use conversions::{
    convert_boutique, convert_boutique_item, convert_category,
    convert_category_product_summary, convert_category_search_product_summary, convert_product,
    convert_product_summary, convert_search_product_summary, convert_terminal,
    convert_terminal_by_android_id, convert_updated_profile, convert_user, create_terminal_input,
    update_terminal_input,
};
use queries::{
    CreateTerminal, GetBoutique, GetBoutiqueTerminals, GetBoutiques, GetCategories,
    GetCurrentUser, GetProductDetail, GetProducts, GetProductsByCategory,
    GetTerminalByAndroidId, SearchProducts, SearchProductsByCategory, UpdateTerminal,
    UpdateUser, create_terminal, get_boutique, get_boutique_terminals, get_boutiques,
    get_categories, get_current_user, get_product_detail, get_products,
    get_products_by_category, get_terminal_by_android_id, search_products,
    search_products_by_category, update_terminal, update_user,
};

/// Overall timeout for one GraphQL round trip.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Which Directus GraphQL schema an operation runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// Content collections at `/graphql`.
    Items,
    /// System collections at `/graphql/system`.
    System,
}

// =============================================================================
// StorefrontClient
// =============================================================================

/// Client for the Directus GraphQL API.
///
/// Cheap to clone; clones share the HTTP connection pool and cache.
#[derive(Clone)]
pub struct StorefrontClient {
    inner: Arc<StorefrontClientInner>,
}

struct StorefrontClientInner {
    client: reqwest::Client,
    items_endpoint: Url,
    system_endpoint: Url,
    assets_base: Url,
    access_token: Option<SecretString>,
    cache: Cache<CacheKey, CacheValue>,
}

impl std::fmt::Debug for StorefrontClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorefrontClient")
            .field("items_endpoint", &self.inner.items_endpoint.as_str())
            .field("system_endpoint", &self.inner.system_endpoint.as_str())
            .field("authenticated", &self.inner.access_token.is_some())
            .finish_non_exhaustive()
    }
}

impl StorefrontClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &StorefrontConfig) -> Result<Self, StorefrontError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Ok(Self {
            inner: Arc::new(StorefrontClientInner {
                client,
                items_endpoint: config.graphql_endpoint(),
                system_endpoint: config.system_endpoint(),
                assets_base: config.assets_base().clone(),
                access_token: config.access_token.clone(),
                cache,
            }),
        })
    }

    /// URL an endpoint resolves to.
    #[must_use]
    pub fn endpoint_url(&self, endpoint: Endpoint) -> &Url {
        match endpoint {
            Endpoint::Items => &self.inner.items_endpoint,
            Endpoint::System => &self.inner.system_endpoint,
        }
    }

    /// Execute a GraphQL operation.
    async fn execute<Q: GraphQLQuery>(
        &self,
        endpoint: Endpoint,
        variables: Q::Variables,
    ) -> Result<Q::ResponseData, StorefrontError>
    where
        Q::Variables: serde::Serialize,
    {
        let request_body = Q::build_query(variables);

        let mut request = self
            .inner
            .client
            .post(self.endpoint_url(endpoint).clone())
            .header("Content-Type", "application/json")
            .json(&request_body);

        if let Some(token) = &self.inner.access_token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.trim().parse::<u64>().ok())
                .unwrap_or(1);
            return Err(StorefrontError::RateLimited(retry_after));
        }

        // Read as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %truncate(&response_text, 500),
                "Directus returned non-success status"
            );
            return Err(StorefrontError::GraphQL(vec![GraphQLError::message(
                format!("HTTP {status}: {}", truncate(&response_text, 200)),
            )]));
        }

        let response: Response<Q::ResponseData> = match serde_json::from_str(&response_text) {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %truncate(&response_text, 500),
                    "Failed to parse Directus GraphQL response"
                );
                return Err(StorefrontError::Parse(e));
            }
        };

        if let Some(errors) = response.errors
            && !errors.is_empty()
        {
            debug!(errors = ?errors, "GraphQL errors in response");
            return Err(StorefrontError::GraphQL(
                errors.into_iter().map(convert_graphql_error).collect(),
            ));
        }

        response.data.ok_or_else(|| {
            tracing::error!(
                body = %truncate(&response_text, 500),
                "Directus GraphQL response has no data and no errors"
            );
            StorefrontError::GraphQL(vec![GraphQLError::message("No data in response")])
        })
    }

    // =========================================================================
    // User Methods
    // =========================================================================

    /// Fetch the signed-in user. Always hits the network.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::NotFound` if Directus reports no current
    /// user, or an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn current_user(&self) -> Result<User, StorefrontError> {
        let data = self
            .execute::<GetCurrentUser>(Endpoint::System, get_current_user::Variables)
            .await?;

        data.users_me
            .map(convert_user)
            .ok_or_else(|| StorefrontError::NotFound("current user".to_string()))
    }

    /// Update a user's first and last name.
    ///
    /// # Errors
    ///
    /// Returns an error if the mutation is rejected or the API request fails.
    #[instrument(skip(self, update), fields(user_id = %id))]
    pub async fn update_user(
        &self,
        id: &UserId,
        update: &ProfileUpdate,
    ) -> Result<UpdatedProfile, StorefrontError> {
        let variables = update_user::Variables {
            id: id.to_string(),
            first_name: Some(update.first_name.clone()),
            last_name: Some(update.last_name.clone()),
        };

        let data = self
            .execute::<UpdateUser>(Endpoint::System, variables)
            .await?;

        let updated = data
            .update_users_item
            .map(convert_updated_profile)
            .ok_or_else(|| StorefrontError::NotFound(format!("User not found: {id}")))?;

        debug!("Profile updated");
        Ok(updated)
    }

    // =========================================================================
    // Catalogue Methods
    // =========================================================================

    /// List all categories.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<Category>, StorefrontError> {
        if let Some(CacheValue::Categories(categories)) =
            self.inner.cache.get(&CacheKey::Categories).await
        {
            debug!("Cache hit for categories");
            return Ok(categories);
        }

        let data = self
            .execute::<GetCategories>(Endpoint::Items, get_categories::Variables)
            .await?;

        let categories: Vec<Category> = data.categories.into_iter().map(convert_category).collect();

        self.inner
            .cache
            .insert(
                CacheKey::Categories,
                CacheValue::Categories(categories.clone()),
            )
            .await;

        Ok(categories)
    }

    /// List products, optionally within a category and matching a search
    /// term on name or description.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn products(
        &self,
        query: &ProductQuery,
    ) -> Result<Vec<ProductSummary>, StorefrontError> {
        let cache_key = CacheKey::Products(query.clone());

        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let limit = Some(query.limit());
        let offset = Some(query.offset());

        let products: Vec<ProductSummary> = match (query.category(), query.search()) {
            (None, None) => self
                .execute::<GetProducts>(Endpoint::Items, get_products::Variables { limit, offset })
                .await?
                .products
                .into_iter()
                .map(convert_product_summary)
                .collect(),
            (None, Some(search)) => {
                let variables = search_products::Variables {
                    search: search.to_string(),
                    limit,
                    offset,
                };
                self.execute::<SearchProducts>(Endpoint::Items, variables)
                    .await?
                    .products
                    .into_iter()
                    .map(convert_search_product_summary)
                    .collect()
            }
            (Some(category), None) => {
                let variables = get_products_by_category::Variables {
                    category_id: category.to_string(),
                    limit,
                    offset,
                };
                self.execute::<GetProductsByCategory>(Endpoint::Items, variables)
                    .await?
                    .products
                    .into_iter()
                    .map(convert_category_product_summary)
                    .collect()
            }
            (Some(category), Some(search)) => {
                let variables = search_products_by_category::Variables {
                    category_id: category.to_string(),
                    search: search.to_string(),
                    limit,
                    offset,
                };
                self.execute::<SearchProductsByCategory>(Endpoint::Items, variables)
                    .await?
                    .products
                    .into_iter()
                    .map(convert_category_search_product_summary)
                    .collect()
            }
        };

        self.inner
            .cache
            .insert(cache_key, CacheValue::Products(products.clone()))
            .await;

        Ok(products)
    }

    /// Get one product with all detail fields.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::NotFound` if no product has this ID, or an
    /// error if the API request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn product(&self, id: &ProductId) -> Result<Product, StorefrontError> {
        let cache_key = CacheKey::Product(id.clone());

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let variables = get_product_detail::Variables { id: id.to_string() };

        let data = self
            .execute::<GetProductDetail>(Endpoint::Items, variables)
            .await?;

        let product = data
            .products_by_id
            .map(convert_product)
            .ok_or_else(|| StorefrontError::NotFound(format!("Product not found: {id}")))?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    // =========================================================================
    // Boutique Methods
    // =========================================================================

    /// List all boutiques.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn boutiques(&self) -> Result<Vec<Boutique>, StorefrontError> {
        if let Some(CacheValue::Boutiques(boutiques)) =
            self.inner.cache.get(&CacheKey::Boutiques).await
        {
            debug!("Cache hit for boutiques");
            return Ok(boutiques);
        }

        let variables = get_boutiques::Variables {
            limit: None,
            offset: None,
        };
        let boutiques: Vec<Boutique> = self
            .execute::<GetBoutiques>(Endpoint::Items, variables)
            .await?
            .boutiques
            .into_iter()
            .map(convert_boutique_item)
            .collect();

        self.inner
            .cache
            .insert(CacheKey::Boutiques, CacheValue::Boutiques(boutiques.clone()))
            .await;

        Ok(boutiques)
    }

    /// Get one boutique.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::NotFound` if no boutique has this ID, or an
    /// error if the API request fails.
    #[instrument(skip(self), fields(boutique_id = %id))]
    pub async fn boutique(&self, id: &BoutiqueId) -> Result<Boutique, StorefrontError> {
        let cache_key = CacheKey::Boutique(id.clone());

        if let Some(CacheValue::Boutique(boutique)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for boutique");
            return Ok(*boutique);
        }

        let variables = get_boutique::Variables { id: id.to_string() };
        let boutique = self
            .execute::<GetBoutique>(Endpoint::Items, variables)
            .await?
            .boutiques_by_id
            .map(convert_boutique)
            .ok_or_else(|| StorefrontError::NotFound(format!("Boutique not found: {id}")))?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Boutique(Box::new(boutique.clone())))
            .await;

        Ok(boutique)
    }

    // =========================================================================
    // Terminal Methods
    // =========================================================================

    /// List the terminals authorized for a boutique. Always hits the network.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(boutique_id = %boutique))]
    pub async fn terminals(&self, boutique: &BoutiqueId) -> Result<Vec<Terminal>, StorefrontError> {
        let variables = get_boutique_terminals::Variables {
            boutique_id: boutique.to_string(),
        };
        let terminals: Vec<Terminal> = self
            .execute::<GetBoutiqueTerminals>(Endpoint::Items, variables)
            .await?
            .terminals
            .into_iter()
            .map(convert_terminal)
            .collect();

        debug!(count = terminals.len(), "Loaded terminals");
        Ok(terminals)
    }

    /// Find the terminal registered under an Android ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn terminal_by_android_id(
        &self,
        android_id: &str,
    ) -> Result<Option<Terminal>, StorefrontError> {
        let variables = get_terminal_by_android_id::Variables {
            android_id: android_id.to_string(),
        };

        Ok(self
            .execute::<GetTerminalByAndroidId>(Endpoint::Items, variables)
            .await?
            .terminals
            .into_iter()
            .next()
            .map(convert_terminal_by_android_id))
    }

    /// Create or update the terminal record for a device.
    ///
    /// The device is matched on its Android ID: an existing record is
    /// updated in place, otherwise a new one is created.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::NotFound` if the backend returns no record
    /// for the mutation, or an error if an API request fails.
    #[instrument(skip(self, registration), fields(android_id = %registration.android_id))]
    pub async fn sync_terminal(
        &self,
        registration: &TerminalRegistration,
    ) -> Result<TerminalSync, StorefrontError> {
        let existing = self.terminal_by_android_id(&registration.android_id).await?;

        let sync = if let Some(existing) = existing {
            let variables = update_terminal::Variables {
                id: existing.id.to_string(),
                data: update_terminal_input(registration),
            };
            let updated = self
                .execute::<UpdateTerminal>(Endpoint::Items, variables)
                .await?
                .update_terminals_item
                .ok_or_else(|| {
                    StorefrontError::NotFound(format!("Terminal not found: {}", existing.id))
                })?;
            TerminalSync::Updated(updated.id.into())
        } else {
            let variables = create_terminal::Variables {
                data: create_terminal_input(registration),
            };
            let created = self
                .execute::<CreateTerminal>(Endpoint::Items, variables)
                .await?
                .create_terminals_item
                .ok_or_else(|| StorefrontError::NotFound("created terminal".to_string()))?;
            TerminalSync::Created(created.id.into())
        };

        debug!(terminal_id = %sync.id(), "Terminal synced");
        Ok(sync)
    }

    /// Drop all cached catalogue data.
    pub fn invalidate_cache(&self) {
        self.inner.cache.invalidate_all();
    }

    // =========================================================================
    // Assets
    // =========================================================================

    /// URL of an asset on the Directus host.
    #[must_use]
    pub fn asset_url(&self, id: &FileId, transform: AssetTransform) -> Option<Url> {
        assets::asset_url(&self.inner.assets_base, id, transform)
    }

    /// Square thumbnail URL; `size` defaults to 300.
    #[must_use]
    pub fn thumbnail_url(&self, id: &FileId, size: Option<u32>) -> Option<Url> {
        assets::thumbnail_url(&self.inner.assets_base, id, size)
    }
}

fn convert_graphql_error(error: graphql_client::Error) -> GraphQLError {
    GraphQLError {
        message: error.message,
        locations: error.locations.map_or_else(Vec::new, |locs| {
            locs.into_iter()
                .map(|l| GraphQLErrorLocation {
                    line: i64::from(l.line),
                    column: i64::from(l.column),
                })
                .collect()
        }),
        path: error.path.map_or_else(Vec::new, |p| {
            p.into_iter()
                .map(|fragment| match fragment {
                    graphql_client::PathFragment::Key(s) => serde_json::Value::String(s),
                    graphql_client::PathFragment::Index(i) => serde_json::Value::Number(i.into()),
                })
                .collect()
        }),
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
