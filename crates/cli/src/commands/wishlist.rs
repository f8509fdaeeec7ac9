//! Wishlist commands.

use clap::Subcommand;
use shopmint_core::ProductId;
use shopmint_storefront::Storefront;

#[derive(Subcommand)]
pub enum WishlistAction {
    /// Show saved products
    Show,
    /// Save a product
    Add {
        /// Product id
        product_id: i64,
    },
    /// Remove a saved product
    Remove {
        /// Product id
        product_id: i64,
    },
    /// Toggle a product's saved state
    Toggle {
        /// Product id
        product_id: i64,
    },
    /// Clear the wishlist
    Clear,
    /// Move a saved product into the cart
    Move {
        /// Product id
        product_id: i64,
    },
}

pub async fn run(
    engine: &mut Storefront,
    action: WishlistAction,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        WishlistAction::Show => print_wishlist(engine),
        WishlistAction::Add { product_id } => {
            let product = engine
                .client()
                .get_product(ProductId::new(product_id))
                .await?;
            engine.wishlist.add_item(&product).await;
            print_wishlist(engine);
        }
        WishlistAction::Remove { product_id } => {
            engine.wishlist.remove_item(ProductId::new(product_id)).await;
            print_wishlist(engine);
        }
        WishlistAction::Toggle { product_id } => {
            let product = engine
                .client()
                .get_product(ProductId::new(product_id))
                .await?;
            engine.wishlist.toggle_item(&product).await;
            print_wishlist(engine);
        }
        WishlistAction::Clear => {
            engine.wishlist.clear().await;
            println!("Wishlist cleared");
        }
        WishlistAction::Move { product_id } => {
            let product = engine
                .client()
                .get_product(ProductId::new(product_id))
                .await?;
            engine.move_to_cart(&product).await;
            println!("Moved {} to cart", product.title);
        }
    }
    Ok(())
}

fn print_wishlist(engine: &Storefront) {
    if engine.wishlist.items().is_empty() {
        println!("Wishlist is empty");
        return;
    }
    for item in engine.wishlist.items() {
        println!("  #{:<6} {:<40} {:>10}", item.id, item.title, item.price.to_string());
    }
    if let Some(error) = engine.wishlist.sync_state().error() {
        println!("  (sync failed: {error})");
    }
}
