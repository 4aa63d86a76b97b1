//! Conversions from generated GraphQL types to domain types.

use serde_json::Value;
use wardrobe_core::{
    BoutiqueId, CategoryId, FileId, Price, ProductId, ProductStatus, RoleId, TerminalId, UserId,
    UserStatus,
};

use crate::directus::types::{
    Boutique, BoutiqueRef, Category, Product, ProductSummary, Role, Terminal,
    TerminalRegistration, UpdatedProfile, User,
};

use super::queries::{
    create_terminal, get_boutique, get_boutique_terminals, get_boutiques, get_categories,
    get_current_user, get_product_detail, get_products, get_products_by_category,
    get_terminal_by_android_id, search_products, search_products_by_category, update_terminal,
    update_user,
};

/// Treat empty strings from Directus as absent.
fn file_id(value: Option<String>) -> Option<FileId> {
    value.filter(|v| !v.is_empty()).map(FileId::from)
}

fn price(value: Option<f64>) -> Option<Price> {
    value.and_then(Price::from_f64)
}

/// Extract file IDs from the `images` JSON field.
///
/// Directus stores galleries either as a plain array of file IDs or, for
/// many-to-many file fields, as junction objects carrying
/// `directus_files_id`.
pub fn convert_images(value: Option<Value>) -> Vec<FileId> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };

    items
        .into_iter()
        .filter_map(|item| match item {
            Value::String(id) => Some(id),
            Value::Object(map) => map
                .get("directus_files_id")
                .or_else(|| map.get("id"))
                .and_then(Value::as_str)
                .map(String::from),
            _ => None,
        })
        .filter(|id| !id.is_empty())
        .map(FileId::from)
        .collect()
}

// =============================================================================
// Users
// =============================================================================

pub fn convert_user(user: get_current_user::GetCurrentUserUsersMe) -> User {
    User {
        id: UserId::from(user.id),
        email: user.email,
        first_name: user.first_name,
        last_name: user.last_name,
        status: UserStatus::from_backend(user.status.as_deref()),
        role: user.role.map(|role| Role {
            id: RoleId::from(role.id),
            name: role.name,
        }),
        last_access: user.last_access,
        avatar: file_id(user.avatar),
    }
}

pub fn convert_updated_profile(user: update_user::UpdateUserUpdateUsersItem) -> UpdatedProfile {
    UpdatedProfile {
        id: UserId::from(user.id),
        first_name: user.first_name,
        last_name: user.last_name,
    }
}

// =============================================================================
// Catalogue
// =============================================================================

pub fn convert_category(category: get_categories::GetCategoriesCategories) -> Category {
    Category {
        id: CategoryId::from(category.id),
        name: category.name,
        description: category.description,
    }
}

// Every listing operation selects the same summary fields, but
// graphql_client generates a distinct struct for each one.
macro_rules! product_summary {
    ($name:ident, $ty:ty) => {
        pub fn $name(product: $ty) -> ProductSummary {
            ProductSummary {
                id: ProductId::from(product.id),
                name: product.name,
                image: file_id(product.image),
                price: price(product.price),
                description: product.description,
            }
        }
    };
}

product_summary!(convert_product_summary, get_products::GetProductsProducts);
product_summary!(
    convert_search_product_summary,
    search_products::SearchProductsProducts
);
product_summary!(
    convert_category_product_summary,
    get_products_by_category::GetProductsByCategoryProducts
);
product_summary!(
    convert_category_search_product_summary,
    search_products_by_category::SearchProductsByCategoryProducts
);

pub fn convert_product(product: get_product_detail::GetProductDetailProductsById) -> Product {
    Product {
        id: ProductId::from(product.id),
        name: product.name,
        subtitle: product.subtitle,
        description: product.description,
        price: price(product.price),
        market_price: price(product.market_price),
        stock: product.stock,
        barcode: product.barcode,
        brand: product.brand,
        main_image: file_id(product.main_image),
        images: convert_images(product.images),
        video_url: product.video_url.filter(|url| !url.is_empty()),
        is_on_sale: product.is_on_sale.unwrap_or(false),
        status: ProductStatus::from_backend(product.status.as_deref()),
        location: product.location,
        total_sales_volume: product.total_sales_volume,
        rating_avg: product.rating_avg,
        total_reviews: product.total_reviews,
        category: product.category_id.map(|category| Category {
            id: CategoryId::from(category.id),
            name: category.name,
            description: category.description,
        }),
    }
}

// =============================================================================
// Boutiques
// =============================================================================

macro_rules! boutique {
    ($name:ident, $ty:ty) => {
        pub fn $name(boutique: $ty) -> Boutique {
            Boutique {
                id: BoutiqueId::from(boutique.id),
                name: boutique.name,
                address: boutique.address,
                city: boutique.city,
                code: boutique.code,
                category: boutique.category,
                contact: boutique.contact,
                expire_date: boutique.expire_date,
                main_image: file_id(boutique.main_image),
                images: convert_images(boutique.images),
                status: boutique.status,
                stars: boutique.stars,
            }
        }
    };
}

boutique!(convert_boutique_item, get_boutiques::GetBoutiquesBoutiques);
boutique!(convert_boutique, get_boutique::GetBoutiqueBoutiquesById);

// =============================================================================
// Terminals
// =============================================================================

macro_rules! terminal {
    ($name:ident, $ty:ty) => {
        pub fn $name(terminal: $ty) -> Terminal {
            Terminal {
                id: TerminalId::from(terminal.id),
                android_id: terminal.android_id,
                brand: terminal.brand,
                manufacturer: terminal.manufacturer,
                model_name: terminal.model_name,
                device_type: terminal.device_type,
                device_name: terminal.device_name,
                os_name: terminal.os_name,
                os_version: terminal.os_version,
                supported_cpu_architectures: terminal.supported_cpu_architectures,
                total_memory: terminal.total_memory,
                date_created: terminal.date_created,
                date_updated: terminal.date_updated,
                boutique: terminal.authorized_boutique.map(|boutique| BoutiqueRef {
                    id: BoutiqueId::from(boutique.id),
                    name: boutique.name,
                }),
            }
        }
    };
}

terminal!(
    convert_terminal,
    get_boutique_terminals::GetBoutiqueTerminalsTerminals
);
terminal!(
    convert_terminal_by_android_id,
    get_terminal_by_android_id::GetTerminalByAndroidIdTerminals
);

macro_rules! terminal_input {
    ($name:ident, $ty:path) => {
        pub fn $name(registration: &TerminalRegistration) -> $ty {
            $ty {
                android_id: Some(registration.android_id.clone()),
                brand: registration.brand.clone(),
                manufacturer: registration.manufacturer.clone(),
                model_name: registration.model_name.clone(),
                device_type: registration.device_type.clone(),
                device_name: registration.device_name(),
                os_name: registration.os_name.clone(),
                os_version: registration.os_version.clone(),
                supported_cpu_architectures: registration.supported_cpu_architectures.clone(),
                total_memory: registration.total_memory.clone(),
            }
        }
    };
}

terminal_input!(create_terminal_input, create_terminal::create_terminals_input);
terminal_input!(update_terminal_input, update_terminal::update_terminals_input);

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_convert_images_plain_ids() {
        let images = convert_images(Some(json!(["a1", "", "b2"])));
        assert_eq!(images, vec![FileId::new("a1"), FileId::new("b2")]);
    }

    #[test]
    fn test_convert_images_junction_objects() {
        let images = convert_images(Some(json!([
            { "directus_files_id": "f1" },
            { "id": "f2" },
            { "other": "ignored" },
            42
        ])));
        assert_eq!(images, vec![FileId::new("f1"), FileId::new("f2")]);
    }

    #[test]
    fn test_convert_images_non_array() {
        assert!(convert_images(None).is_empty());
        assert!(convert_images(Some(json!("f1"))).is_empty());
        assert!(convert_images(Some(Value::Null)).is_empty());
    }

    #[test]
    fn test_terminal_input_fills_device_name() {
        let registration = TerminalRegistration {
            android_id: "a-9".to_string(),
            brand: Some("Huawei".to_string()),
            model_name: Some("MatePad".to_string()),
            ..TerminalRegistration::default()
        };

        let input = update_terminal_input(&registration);
        assert_eq!(input.android_id.as_deref(), Some("a-9"));
        assert_eq!(input.device_name.as_deref(), Some("Huawei MatePad"));
        assert_eq!(input.os_name, None);
    }

    #[test]
    fn test_file_id_skips_empty() {
        assert_eq!(file_id(Some(String::new())), None);
        assert_eq!(file_id(Some("x".to_string())), Some(FileId::new("x")));
    }
}
