//! Wishlist commands.

use anyhow::Result;
use store_commerce::wishlist::WishlistItem;
use store_commerce::ProductId;
use store_session::Access;

use super::{WishlistArgs, WishlistCommand};
use crate::context::Context;

/// Run the wishlist command.
pub async fn run(args: WishlistArgs, ctx: &Context) -> Result<()> {
    ctx.user(Access::Authenticated).await?;

    match args.command {
        WishlistCommand::Show => show(ctx).await,
        WishlistCommand::Toggle { product_id } => toggle(ProductId::new(product_id), ctx).await,
    }
}

async fn show(ctx: &Context) -> Result<()> {
    let wishlist = ctx.session.wishlist().snapshot().await;

    if ctx.output.is_json() {
        ctx.output.json(&wishlist);
        return Ok(());
    }
    if wishlist.is_empty() {
        ctx.output.info("Your wishlist is empty");
        return Ok(());
    }

    ctx.output.header("Wishlist");
    for item in &wishlist.items {
        let name = if item.name.is_empty() {
            item.product_id.as_str()
        } else {
            item.name.as_str()
        };
        let price = item.price.map(|p| p.to_string()).unwrap_or_default();
        ctx.output
            .list_item(&format!("{}  {}  [{}]", name, price, item.product_id));
    }
    Ok(())
}

async fn toggle(product_id: ProductId, ctx: &Context) -> Result<()> {
    let saved = ctx
        .fetch(
            "Updating wishlist",
            ctx.session
                .wishlist()
                .toggle(WishlistItem::reference(product_id.clone())),
        )
        .await?;

    if ctx.output.is_json() {
        ctx.output
            .json(&serde_json::json!({ "product_id": product_id, "saved": saved }));
    } else if saved {
        ctx.output.success(&format!("Saved {} to your wishlist", product_id));
    } else {
        ctx.output
            .success(&format!("Removed {} from your wishlist", product_id));
    }
    Ok(())
}
