//! Catalogue commands.
//!
//! # Usage
//!
//! ```bash
//! wardrobe products list --category 3 --page 2
//! wardrobe products show 42
//! wardrobe categories
//! ```

use std::fmt::Write as _;

use wardrobe_core::{CategoryId, Price, ProductId};
use wardrobe_storefront::{Category, Product, ProductQuery, ProductSummary, StorefrontClient};

use super::{CliError, Output, or_dash};

/// Build a listing query from CLI flags. `page` is 1-based.
pub fn list_query(
    category: Option<String>,
    search: Option<String>,
    page: u32,
    page_size: u32,
) -> ProductQuery {
    let mut query = category
        .filter(|c| !c.trim().is_empty())
        .map_or_else(ProductQuery::default, |c| {
            ProductQuery::in_category(CategoryId::from(c.trim()))
        })
        .with_page(page.saturating_sub(1))
        .with_page_size(page_size);
    if let Some(search) = search {
        query = query.with_search(search);
    }
    query
}

pub async fn list(
    client: &StorefrontClient,
    out: &Output,
    query: &ProductQuery,
) -> Result<(), CliError> {
    let products = client.products(query).await?;
    out.emit(products.as_slice(), |products| render_summaries(products, query))
}

pub async fn show(client: &StorefrontClient, out: &Output, id: &str) -> Result<(), CliError> {
    let product = client.product(&ProductId::from(id)).await?;
    out.emit(&product, |product| {
        let mut text = render_product(product);
        if let Some(url) = product
            .main_image
            .as_ref()
            .and_then(|image| client.thumbnail_url(image, None))
        {
            let _ = writeln!(text, "Image:       {url}");
        }
        text
    })
}

pub async fn categories(client: &StorefrontClient, out: &Output) -> Result<(), CliError> {
    let categories = client.categories().await?;
    out.emit(categories.as_slice(), render_categories)
}

fn price(price: Option<&Price>) -> String {
    price.map_or_else(|| "-".to_string(), Price::display)
}

fn render_summaries(products: &[ProductSummary], query: &ProductQuery) -> String {
    if products.is_empty() {
        return "No products found.".to_string();
    }

    let mut text = String::new();
    for product in products {
        let _ = writeln!(
            text,
            "{:<24} {:>12}  {}",
            product.id,
            price(product.price.as_ref()),
            or_dash(product.name.as_deref())
        );
    }
    let _ = writeln!(
        text,
        "\nPage {} ({} per page)",
        query.page() + 1,
        query.page_size()
    );
    text
}

fn render_product(product: &Product) -> String {
    let mut text = String::new();
    let _ = writeln!(text, "{}", or_dash(product.name.as_deref()));
    if let Some(subtitle) = product.subtitle.as_deref().filter(|s| !s.is_empty()) {
        let _ = writeln!(text, "{subtitle}");
    }
    let _ = writeln!(text);
    let _ = writeln!(text, "ID:          {}", product.id);
    let _ = writeln!(text, "Price:       {}", price(product.price.as_ref()));
    if product.market_price.is_some() {
        let _ = writeln!(text, "Was:         {}", price(product.market_price.as_ref()));
    }
    if product.is_on_sale {
        let _ = writeln!(text, "On sale:     yes");
    }
    let stock = match product.stock {
        Some(stock) if stock > 0 => stock.to_string(),
        Some(_) => "sold out".to_string(),
        None => "-".to_string(),
    };
    let _ = writeln!(text, "Stock:       {stock}");
    let _ = writeln!(text, "Brand:       {}", or_dash(product.brand.as_deref()));
    let category = product.category.as_ref().and_then(|c| c.name.as_deref());
    let _ = writeln!(text, "Category:    {}", or_dash(category));
    if let Some(rating) = product.rating_avg {
        let _ = writeln!(
            text,
            "Rating:      {rating:.1} ({} reviews)",
            product.total_reviews.unwrap_or(0)
        );
    }
    if let Some(sold) = product.total_sales_volume {
        let _ = writeln!(text, "Sold:        {sold}");
    }
    let _ = writeln!(text, "Status:      {}", product.status);
    if let Some(description) = product.description.as_deref().filter(|d| !d.is_empty()) {
        let _ = writeln!(text, "\n{description}");
    }
    text
}

fn render_categories(categories: &[Category]) -> String {
    if categories.is_empty() {
        return "No categories found.".to_string();
    }

    let mut text = String::new();
    for category in categories {
        let _ = writeln!(
            text,
            "{:<24} {}",
            category.id,
            or_dash(category.name.as_deref())
        );
    }
    text
}
