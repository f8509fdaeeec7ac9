//! Catalog and promotion browsing.

use clap::Subcommand;
use shopmint_core::ProductId;
use shopmint_storefront::Storefront;

#[derive(Subcommand)]
pub enum ShopAction {
    /// List products
    Products {
        /// Page size
        #[arg(long, default_value_t = 20)]
        limit: u64,

        /// Offset into the catalog
        #[arg(long, default_value_t = 0)]
        skip: u64,
    },
    /// Show one product with its variants
    Product {
        /// Product id
        id: i64,
    },
    /// List currently active promo codes
    Promos,
}

pub async fn run(
    engine: &Storefront,
    action: ShopAction,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ShopAction::Products { limit, skip } => {
            let page = engine.client().get_products(limit, skip).await?;
            println!(
                "{} products ({} total):",
                page.products.len(),
                page.total
            );
            for product in &page.products {
                let brand = product.brand.as_deref().unwrap_or("-");
                println!("  #{:<6} {:<40} {:>10}  {brand}", product.id, product.title, product.price.to_string());
            }
        }
        ShopAction::Product { id } => {
            let product = engine.client().get_product(ProductId::new(id)).await?;
            println!("#{} {}", product.id, product.title);
            println!("  price: {}", product.price);
            if let Some(description) = &product.description {
                println!("  {description}");
            }
            for variant in &product.variants {
                let price = variant.price.map_or_else(|| "-".to_string(), |p| p.to_string());
                println!(
                    "  variant #{:<6} sku={:<12} color={:<10} size={:<6} price={price}",
                    variant.id,
                    variant.sku,
                    variant.color.as_deref().unwrap_or("-"),
                    variant.size.as_deref().unwrap_or("-"),
                );
            }
        }
        ShopAction::Promos => {
            let promos = engine.client().get_active_promos().await?;
            for promo in &promos {
                println!(
                    "  {:<16} {:?} (until {})",
                    promo.code,
                    promo.discount,
                    promo.ends_at.date_naive()
                );
            }
        }
    }
    Ok(())
}
