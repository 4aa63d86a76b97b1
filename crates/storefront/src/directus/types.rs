//! Domain types for the Directus storefront API.
//!
//! These types provide a clean, ergonomic API separate from the raw
//! `graphql_client` generated types.

use serde::{Deserialize, Serialize};
use wardrobe_core::{
    BoutiqueId, CategoryId, FileId, Price, ProductId, ProductStatus, RoleId, TerminalId, UserId,
    UserStatus,
};

/// Products shown per page by default.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

// =============================================================================
// User Types
// =============================================================================

/// The signed-in Directus user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub status: UserStatus,
    pub role: Option<Role>,
    /// Last access timestamp as reported by Directus (ISO 8601).
    pub last_access: Option<String>,
    pub avatar: Option<FileId>,
}

impl User {
    /// Only active accounts count as signed in.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.status == UserStatus::Active
    }

    /// Full name, or the email address when no name is set.
    #[must_use]
    pub fn display_name(&self) -> String {
        let name = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        if name.is_empty() {
            self.email.clone().unwrap_or_default()
        } else {
            name
        }
    }
}

/// A Directus role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    pub name: Option<String>,
}

/// Editable profile fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub first_name: String,
    pub last_name: String,
}

/// Result of a profile update mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatedProfile {
    pub id: UserId,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

// =============================================================================
// Catalogue Types
// =============================================================================

/// Product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: Option<String>,
    pub description: Option<String>,
}

/// A product as shown in a listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub id: ProductId,
    pub name: Option<String>,
    pub image: Option<FileId>,
    pub price: Option<Price>,
    pub description: Option<String>,
}

/// A product with every detail field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: Option<String>,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub price: Option<Price>,
    /// Reference ("was") price.
    pub market_price: Option<Price>,
    pub stock: Option<i64>,
    pub barcode: Option<String>,
    pub brand: Option<String>,
    pub main_image: Option<FileId>,
    pub images: Vec<FileId>,
    pub video_url: Option<String>,
    pub is_on_sale: bool,
    pub status: ProductStatus,
    pub location: Option<String>,
    pub total_sales_volume: Option<i64>,
    pub rating_avg: Option<f64>,
    pub total_reviews: Option<i64>,
    pub category: Option<Category>,
}

impl Product {
    /// Whether any stock is left. Unknown stock counts as available.
    #[must_use]
    pub fn in_stock(&self) -> bool {
        self.stock.is_none_or(|stock| stock > 0)
    }
}

/// Parameters for a product listing.
///
/// Built through the `with_*` methods so the search term is always trimmed
/// and the page size is never zero.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProductQuery {
    category: Option<CategoryId>,
    search: Option<String>,
    page: u32,
    page_size: u32,
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self {
            category: None,
            search: None,
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ProductQuery {
    /// Listing for one category.
    #[must_use]
    pub fn in_category(category: CategoryId) -> Self {
        Self {
            category: Some(category),
            ..Self::default()
        }
    }

    /// Set the search term. Blank terms clear the search.
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        let search = search.into();
        let trimmed = search.trim();
        self.search = (!trimmed.is_empty()).then(|| trimmed.to_string());
        self
    }

    /// Set the zero-based page.
    #[must_use]
    pub const fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Set the page size. Zero falls back to the default.
    #[must_use]
    pub const fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = if page_size == 0 {
            DEFAULT_PAGE_SIZE
        } else {
            page_size
        };
        self
    }

    /// Category filter, if any.
    #[must_use]
    pub const fn category(&self) -> Option<&CategoryId> {
        self.category.as_ref()
    }

    /// Trimmed, non-empty search term, if any.
    #[must_use]
    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    /// Zero-based page index.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Row offset for this page.
    #[must_use]
    pub fn offset(&self) -> i64 {
        i64::from(self.page) * i64::from(self.page_size)
    }

    /// Row limit for this page.
    #[must_use]
    pub fn limit(&self) -> i64 {
        i64::from(self.page_size)
    }
}

// =============================================================================
// Boutique Types
// =============================================================================

/// A shop the storefront devices are authorized for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Boutique {
    pub id: BoutiqueId,
    pub name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub code: Option<String>,
    pub category: Option<String>,
    pub contact: Option<String>,
    /// Contract expiry date as reported by Directus.
    pub expire_date: Option<String>,
    pub main_image: Option<FileId>,
    pub images: Vec<FileId>,
    pub status: Option<String>,
    pub stars: Option<i64>,
}

/// The boutique a terminal is bound to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoutiqueRef {
    pub id: BoutiqueId,
    pub name: Option<String>,
}

// =============================================================================
// Terminal Types
// =============================================================================

/// A registered in-store device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Terminal {
    pub id: TerminalId,
    pub android_id: Option<String>,
    pub brand: Option<String>,
    pub manufacturer: Option<String>,
    pub model_name: Option<String>,
    pub device_type: Option<String>,
    pub device_name: Option<String>,
    pub os_name: Option<String>,
    pub os_version: Option<String>,
    pub supported_cpu_architectures: Option<String>,
    pub total_memory: Option<String>,
    pub date_created: Option<String>,
    pub date_updated: Option<String>,
    pub boutique: Option<BoutiqueRef>,
}

/// Device details reported when a terminal checks in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalRegistration {
    pub android_id: String,
    pub brand: Option<String>,
    pub manufacturer: Option<String>,
    pub model_name: Option<String>,
    pub device_type: Option<String>,
    pub os_name: Option<String>,
    pub os_version: Option<String>,
    pub supported_cpu_architectures: Option<String>,
    pub total_memory: Option<String>,
}

impl TerminalRegistration {
    /// `"{brand} {model}"`, or `None` when both are blank.
    #[must_use]
    pub fn device_name(&self) -> Option<String> {
        let name = [self.brand.as_deref(), self.model_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        (!name.is_empty()).then_some(name)
    }
}

/// Outcome of [`StorefrontClient::sync_terminal`](crate::StorefrontClient::sync_terminal).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "id", rename_all = "snake_case")]
pub enum TerminalSync {
    /// No terminal had this Android ID; a new record was created.
    Created(TerminalId),
    /// The existing record was updated in place.
    Updated(TerminalId),
}

impl TerminalSync {
    #[must_use]
    pub const fn id(&self) -> &TerminalId {
        match self {
            Self::Created(id) | Self::Updated(id) => id,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn user(first: Option<&str>, last: Option<&str>, email: Option<&str>) -> User {
        User {
            id: UserId::new("u1"),
            email: email.map(String::from),
            first_name: first.map(String::from),
            last_name: last.map(String::from),
            status: UserStatus::Active,
            role: None,
            last_access: None,
            avatar: None,
        }
    }

    #[test]
    fn test_display_name() {
        assert_eq!(user(Some("Li"), Some("Wei"), None).display_name(), "Li Wei");
        assert_eq!(user(Some(" Li "), Some(""), None).display_name(), "Li");
        assert_eq!(
            user(None, None, Some("li@example.com")).display_name(),
            "li@example.com"
        );
        assert_eq!(user(None, None, None).display_name(), "");
    }

    #[test]
    fn test_is_authenticated_requires_active() {
        let mut u = user(None, None, None);
        assert!(u.is_authenticated());
        u.status = UserStatus::Suspended;
        assert!(!u.is_authenticated());
    }

    #[test]
    fn test_product_query_paging() {
        let query = ProductQuery::default().with_page(2);
        assert_eq!(query.limit(), 10);
        assert_eq!(query.offset(), 20);

        let query = query.with_page_size(0);
        assert_eq!(query.page_size(), DEFAULT_PAGE_SIZE);

        let query = ProductQuery::default().with_page_size(25).with_page(3);
        assert_eq!(query.offset(), 75);
    }

    #[test]
    fn test_product_query_search_is_trimmed() {
        assert_eq!(
            ProductQuery::default().with_search("  coat ").search(),
            Some("coat")
        );
        assert_eq!(ProductQuery::default().with_search("   ").search(), None);
    }

    #[test]
    fn test_terminal_device_name() {
        let mut registration = TerminalRegistration {
            android_id: "a-1".to_string(),
            brand: Some("Xiaomi ".to_string()),
            model_name: Some("Pad 6".to_string()),
            ..TerminalRegistration::default()
        };
        assert_eq!(registration.device_name().as_deref(), Some("Xiaomi Pad 6"));

        registration.model_name = None;
        assert_eq!(registration.device_name().as_deref(), Some("Xiaomi"));

        registration.brand = Some("  ".to_string());
        assert_eq!(registration.device_name(), None);
    }

    #[test]
    fn test_terminal_sync_json() {
        let sync = TerminalSync::Updated(TerminalId::new("t-3"));
        assert_eq!(sync.id().as_str(), "t-3");
        assert_eq!(
            serde_json::to_value(&sync).unwrap(),
            serde_json::json!({ "action": "updated", "id": "t-3" })
        );
    }
}
