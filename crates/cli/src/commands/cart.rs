//! Cart commands: build a cart, apply a promo, check out.

use chrono::Utc;
use clap::Subcommand;
use shopmint_core::{LineKey, ProductId, VariantId};
use shopmint_storefront::Storefront;

#[derive(Subcommand)]
pub enum CartAction {
    /// Show the cart
    Show,
    /// Add a product to the cart
    Add {
        /// Product id
        product_id: i64,

        /// Variant id, for products with color/size options
        #[arg(long)]
        variant: Option<i64>,

        /// Quantity to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Set a line's quantity (0 removes it)
    Set {
        /// Product id
        product_id: i64,

        /// New quantity
        quantity: u32,

        /// Variant id
        #[arg(long)]
        variant: Option<i64>,
    },
    /// Remove a line
    Remove {
        /// Product id
        product_id: i64,

        /// Variant id
        #[arg(long)]
        variant: Option<i64>,
    },
    /// Empty the cart
    Clear,
    /// Apply a promo code
    Promo {
        /// The code, matched case-insensitively
        code: String,
    },
    /// Remove the applied promo code
    PromoRemove,
    /// Show the composed checkout totals
    Totals,
    /// Place the order and print the hosted payment URL
    Checkout,
}

fn key(product_id: i64, variant: Option<i64>) -> LineKey {
    LineKey {
        product: ProductId::new(product_id),
        variant: variant.map(VariantId::new),
    }
}

pub async fn run(
    engine: &mut Storefront,
    action: CartAction,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        CartAction::Show => print_cart(engine),
        CartAction::Add {
            product_id,
            variant,
            quantity,
        } => {
            let product = engine
                .client()
                .get_product(ProductId::new(product_id))
                .await?;
            let variant = variant
                .map(VariantId::new)
                .and_then(|id| product.variants.iter().find(|v| v.id == id).cloned());
            engine.cart.add_item(&product, variant, quantity).await;
            print_cart(engine);
        }
        CartAction::Set {
            product_id,
            quantity,
            variant,
        } => {
            engine.cart.set_quantity(key(product_id, variant), quantity).await;
            print_cart(engine);
        }
        CartAction::Remove {
            product_id,
            variant,
        } => {
            engine.cart.remove_item(key(product_id, variant)).await;
            print_cart(engine);
        }
        CartAction::Clear => {
            engine.cart.clear().await;
            println!("Cart emptied");
        }
        CartAction::Promo { code } => {
            let applied = engine.cart.apply_promo(&code, Utc::now()).await?;
            println!("Applied {}: -{}", applied.code, applied.amount);
        }
        CartAction::PromoRemove => {
            engine.cart.remove_promo();
            println!("Promo removed");
        }
        CartAction::Totals => print_totals(engine),
        CartAction::Checkout => {
            let order = engine.checkout().await?;
            println!("Order #{} created ({:?})", order.id, order.status);
            println!("Pay here: {}", order.checkout_url);
        }
    }
    Ok(())
}

fn print_cart(engine: &Storefront) {
    if engine.cart.is_empty() {
        println!("Cart is empty");
        return;
    }
    for line in engine.cart.lines() {
        let variant = line
            .variant
            .as_ref()
            .map_or_else(String::new, |v| format!(" [{}]", v.sku));
        println!(
            "  #{:<6} {:<40}{variant} x{:<3} {:>10}",
            line.product.id,
            line.product.title,
            line.quantity,
            line.line_total.to_string(),
        );
    }
    println!(
        "  {} items, subtotal {}",
        engine.cart.total_items(),
        engine.cart.subtotal()
    );
    if let Some(error) = engine.cart.sync_state().error() {
        println!("  (sync failed: {error})");
    }
}

fn print_totals(engine: &Storefront) {
    let totals = engine.checkout_totals();
    println!("  subtotal  {}", totals.subtotal);
    if !totals.discount.is_zero() {
        println!("  discount -{}", totals.discount);
    }
    println!("  shipping  {}", totals.shipping);
    println!("  tax       {}", totals.tax);
    println!("  total     {}", totals.total);
}
