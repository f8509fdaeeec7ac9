//! Order history commands.

use clap::Subcommand;
use shopmint_core::OrderId;
use shopmint_storefront::api::types::Order;
use shopmint_storefront::Storefront;

#[derive(Subcommand)]
pub enum OrdersAction {
    /// List your orders
    List,
    /// Show one order in detail
    Show {
        /// Order id
        order_id: i64,
    },
    /// Cancel a pending order
    Cancel {
        /// Order id
        order_id: i64,
    },
}

pub async fn run(
    engine: &Storefront,
    action: OrdersAction,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        OrdersAction::List => {
            let orders = engine.client().list_my_orders().await?;
            if orders.is_empty() {
                println!("No orders yet");
                return Ok(());
            }
            for order in &orders {
                println!(
                    "  #{:<6} {:<10} {:>10}  {}",
                    order.id,
                    format!("{:?}", order.status).to_lowercase(),
                    order.totals.total.to_string(),
                    order.created_at.format("%Y-%m-%d %H:%M"),
                );
            }
        }
        OrdersAction::Show { order_id } => {
            let order = engine.client().get_order(OrderId::new(order_id)).await?;
            print_order(&order);
        }
        OrdersAction::Cancel { order_id } => {
            let order = engine.cancel_order(OrderId::new(order_id)).await?;
            println!("Order #{} is now {:?}", order.id, order.status);
        }
    }
    Ok(())
}

fn print_order(order: &Order) {
    println!(
        "Order #{} ({:?}), placed {}",
        order.id,
        order.status,
        order.created_at.format("%Y-%m-%d %H:%M")
    );
    for line in &order.lines {
        println!(
            "  {:<40} x{:<3} {:>10}",
            line.product.title,
            line.quantity,
            line.line_total.to_string(),
        );
    }
    let totals = &order.totals;
    println!("  subtotal  {}", totals.subtotal);
    if !totals.discount.is_zero() {
        println!("  discount -{}", totals.discount);
    }
    println!("  shipping  {}", totals.shipping);
    println!("  tax       {}", totals.tax);
    println!("  total     {}", totals.total);
}
