//! Cart commands.

use anyhow::Result;
use store_commerce::catalog::VariantSelector;
use store_commerce::{CartItemId, ProductId};
use store_session::Access;

use super::{confirm, print_cart, CartArgs, CartCommand};
use crate::context::Context;

/// Run the cart command.
pub async fn run(args: CartArgs, ctx: &Context) -> Result<()> {
    ctx.user(Access::Authenticated).await?;

    match args.command {
        CartCommand::Show => print_cart(ctx, &ctx.session.cart().snapshot().await),
        CartCommand::Add {
            product_id,
            quantity,
            size,
            color,
        } => add(&ProductId::new(product_id), quantity, size, color, ctx).await,
        CartCommand::Update { item_id, quantity } => {
            let cart = ctx
                .fetch(
                    "Updating cart",
                    ctx.session
                        .cart()
                        .update_quantity(&CartItemId::new(item_id), quantity),
                )
                .await?;
            print_cart(ctx, &cart)
        }
        CartCommand::Remove { item_id } => {
            let cart = ctx
                .fetch(
                    "Removing item",
                    ctx.session.cart().remove(&CartItemId::new(item_id)),
                )
                .await?;
            ctx.output.success("Removed");
            print_cart(ctx, &cart)
        }
        CartCommand::Clear { yes } => {
            if !confirm(ctx, yes, "Empty your cart?")? {
                return Ok(());
            }
            ctx.fetch("Clearing cart", ctx.session.cart().clear()).await?;
            ctx.output.success("Cart cleared");
            Ok(())
        }
    }
}

/// Add through the selector so size, color and stock are checked first.
async fn add(
    product_id: &ProductId,
    quantity: i64,
    size: Option<String>,
    color: Option<String>,
    ctx: &Context,
) -> Result<()> {
    let product = ctx
        .fetch("Loading product", ctx.api().products().get(product_id))
        .await?;

    let mut selector = VariantSelector::new(&product);
    if let Some(ref size) = size {
        selector.select_size(size)?;
    }
    if let Some(ref color) = color {
        selector.select_color(color)?;
    }
    let clamped = selector.set_quantity(quantity);
    if clamped != quantity {
        ctx.output
            .warn(&format!("Quantity adjusted to {}", clamped));
    }

    let item = selector.add_to_cart()?;
    let cart = ctx
        .fetch("Adding to cart", ctx.session.cart().add(&item))
        .await?;
    ctx.output.success(&format!("Added {}", product.name));
    print_cart(ctx, &cart)
}
