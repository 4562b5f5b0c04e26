//! Menu and category listings.

use delicious_bakers_core::{Price, Product};
use delicious_bakers_storefront::error::Result;
use delicious_bakers_storefront::state::AppState;

/// List products, optionally limited to one category or to featured items.
pub async fn menu(state: &AppState, category: Option<&str>, featured: bool) -> Result<()> {
    let client = state.supabase()?;

    let mut products = match category {
        Some(category) => client.products_in_category(category).await?,
        None => client.products().await?,
    };
    if featured {
        products.retain(|p| p.is_featured);
    }

    print_products(&products);
    Ok(())
}

/// List category names.
pub async fn categories(state: &AppState) -> Result<()> {
    let names = state.supabase()?.categories().await?;

    #[allow(clippy::print_stdout)]
    {
        println!("All");
        for name in names {
            println!("{name}");
        }
    }
    Ok(())
}

fn print_products(products: &[Product]) {
    #[allow(clippy::print_stdout)]
    {
        if products.is_empty() {
            println!("No products found.");
            return;
        }
        for product in products {
            let star = if product.is_featured { " *" } else { "" };
            println!(
                "{:<12} {:<28} {:<12} {:>12}{star}",
                product.id.as_str(),
                product.name,
                product.category,
                Price::local(product.price).to_string(),
            );
            if !product.description.is_empty() {
                println!("{:<12} {}", "", product.description);
            }
        }
    }
}
