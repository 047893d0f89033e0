//! Order history and manual payment retry.

use std::sync::Arc;

use anyhow::Result;
use store_commerce::OrderId;
use store_session::{Access, CheckoutService};

use super::{print_order, print_order_rows, OrdersArgs, OrdersCommand};
use crate::context::Context;
use crate::prompt::{PromptPaypal, TerminalCardForm};

/// Run the orders command.
pub async fn run(args: OrdersArgs, ctx: &Context) -> Result<()> {
    ctx.user(Access::Authenticated).await?;

    match args.command {
        OrdersCommand::Mine => {
            let orders = ctx
                .fetch("Loading orders", ctx.api().orders().mine())
                .await?;
            ctx.output.header("Your orders");
            print_order_rows(ctx, &orders);
            Ok(())
        }
        OrdersCommand::Show { id } => {
            let order = ctx
                .fetch("Loading order", ctx.api().orders().get(&OrderId::new(id)))
                .await?;
            print_order(ctx, &order);
            Ok(())
        }
        OrdersCommand::Pay { id } => pay(OrderId::new(id), ctx).await,
    }
}

async fn pay(id: OrderId, ctx: &Context) -> Result<()> {
    let order = ctx
        .fetch("Loading order", ctx.api().orders().get(&id))
        .await?;
    if order.is_paid {
        ctx.output.info(&format!("Order {} is already paid", order.short_id()));
        return Ok(());
    }

    let service = CheckoutService::new(
        &ctx.session,
        ctx.pricing()?,
        Arc::new(TerminalCardForm::new(ctx.output.clone())),
        Arc::new(PromptPaypal::new(ctx.output.clone())),
    );
    let paid = service
        .pay_existing(&order)
        .await
        .map_err(crate::context::friendly)?;

    ctx.output
        .success(&format!("Payment received for order {}", paid.short_id()));
    print_order(ctx, &paid);
    Ok(())
}
