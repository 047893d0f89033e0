//! Interactive three-step checkout.

use std::sync::Arc;

use anyhow::{anyhow, bail, Result};
use dialoguer::{Input, Select};
use store_commerce::cart::PricingRules;
use store_commerce::checkout::{
    Address, CheckoutStep, CheckoutWizard, NewOrder, PaymentMethod, ShippingChoice,
};
use store_session::{Access, CheckoutService};

use super::{print_cart, print_order, CheckoutArgs};
use crate::context::{friendly, Context};
use crate::prompt::{PromptPaypal, TerminalCardForm};

enum ReviewAction {
    Place,
    Back,
    Cancel,
}

/// Run the checkout command.
pub async fn run(args: CheckoutArgs, ctx: &Context) -> Result<()> {
    ctx.user(Access::Authenticated).await?;

    let cart = ctx.session.cart().snapshot().await;
    if cart.is_empty() {
        bail!("Your cart is empty");
    }
    print_cart(ctx, &cart)?;

    let rules = ctx.pricing()?;
    let service = CheckoutService::new(
        &ctx.session,
        rules.clone(),
        Arc::new(TerminalCardForm::new(ctx.output.clone())),
        Arc::new(PromptPaypal::new(ctx.output.clone())),
    );

    let saved = ctx
        .fetch("Loading addresses", ctx.api().addresses().list())
        .await?;
    let mut address_flag = args.address;
    let mut method_flag = args.method;
    let mut wizard = CheckoutWizard::new();

    loop {
        let step = wizard.step();
        ctx.output
            .step(usize::from(step.number()), 3, step.display_name());

        match step {
            CheckoutStep::Shipping => {
                let choice = match address_flag.take() {
                    Some(id) => saved_by_id(&saved, &id)?,
                    None => choose_shipping(&saved)?,
                };
                if wizard.submit_shipping(choice).is_err() {
                    ctx.output.warn(wizard.error().unwrap_or("Address incomplete"));
                }
            }
            CheckoutStep::Payment => {
                let method = match method_flag.take() {
                    Some(method) => method.parse::<PaymentMethod>()?,
                    None => choose_method()?,
                };
                wizard.select_payment_method(method)?;
            }
            CheckoutStep::Review => {
                if wizard.pending_order().is_none() {
                    preview(ctx, &wizard, &rules).await?;
                }

                match review_action(args.yes, &wizard)? {
                    ReviewAction::Cancel => {
                        ctx.output.warn("Checkout cancelled");
                        return Ok(());
                    }
                    ReviewAction::Back => {
                        if let Err(e) = wizard.back() {
                            ctx.output.warn(&e.to_string());
                        }
                    }
                    ReviewAction::Place => match service.submit(&mut wizard).await {
                        Ok(order) => {
                            ctx.output.success(&format!("Order {} placed", order.short_id()));
                            print_order(ctx, &order);
                            return Ok(());
                        }
                        Err(e) if args.yes => {
                            return Err(pending_hint(ctx, &wizard, friendly(e)));
                        }
                        Err(e) => {
                            ctx.output.error(&e.user_message());
                            if let Some(id) = wizard.pending_order() {
                                ctx.output.info(&format!(
                                    "Order {} was created and is awaiting payment",
                                    id
                                ));
                            }
                        }
                    },
                }
            }
        }
    }
}

fn saved_by_id(saved: &[Address], id: &str) -> Result<ShippingChoice> {
    saved
        .iter()
        .find(|a| a.id.as_ref().is_some_and(|saved_id| saved_id.as_str() == id))
        .cloned()
        .map(ShippingChoice::Saved)
        .ok_or_else(|| anyhow!("No saved address with id {}", id))
}

fn choose_shipping(saved: &[Address]) -> Result<ShippingChoice> {
    if !saved.is_empty() {
        let mut items: Vec<String> = saved
            .iter()
            .map(|a| {
                if a.is_default {
                    format!("{} (default)", a.one_line())
                } else {
                    a.one_line()
                }
            })
            .collect();
        items.push("Enter a new address".to_string());

        let default = saved.iter().position(|a| a.is_default).unwrap_or(0);
        let picked = Select::new()
            .with_prompt("Ship to")
            .items(&items)
            .default(default)
            .interact()?;
        if let Some(address) = saved.get(picked) {
            return Ok(ShippingChoice::Saved(address.clone()));
        }
    }

    Ok(ShippingChoice::New(read_address()?))
}

/// Prompt for every address field. Blank answers are allowed and reported
/// by the wizard.
pub(crate) fn read_address() -> Result<Address> {
    let field = |prompt: &str| -> Result<String> {
        Ok(Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?)
    };

    let mut address = Address::new(
        field("Full name")?,
        field("Address")?,
        field("City")?,
        field("Postal code")?,
        field("Country")?,
    );
    let phone = field("Phone (optional)")?;
    address.phone = Some(phone.trim().to_string()).filter(|p| !p.is_empty());
    Ok(address)
}

fn choose_method() -> Result<PaymentMethod> {
    let labels: Vec<&str> = PaymentMethod::ALL.iter().map(|m| m.display_name()).collect();
    let picked = Select::new()
        .with_prompt("Payment method")
        .items(&labels)
        .default(0)
        .interact()?;
    Ok(PaymentMethod::ALL[picked])
}

async fn preview(ctx: &Context, wizard: &CheckoutWizard, rules: &PricingRules) -> Result<()> {
    let (Some(address), Some(method)) = (wizard.shipping_address(), wizard.payment_method()) else {
        return Ok(());
    };

    let cart = ctx.session.cart().snapshot().await;
    let order = NewOrder::from_cart(&cart, address.clone(), method, rules)?;

    if ctx.output.is_json() {
        ctx.output.json(&order);
        return Ok(());
    }
    ctx.output.kv("Ship to", &address.one_line());
    ctx.output.kv("Payment", method.display_name());
    ctx.output.kv("Items", &order.totals.items_price.to_string());
    ctx.output.kv("Shipping", &order.totals.shipping_price.to_string());
    ctx.output.kv("Tax", &order.totals.tax_price.to_string());
    ctx.output.kv("Total", &order.totals.total_price.to_string());
    Ok(())
}

fn review_action(yes: bool, wizard: &CheckoutWizard) -> Result<ReviewAction> {
    if yes {
        return Ok(ReviewAction::Place);
    }

    let place = if wizard.pending_order().is_some() {
        "Retry payment"
    } else {
        "Place order"
    };
    let picked = Select::new()
        .with_prompt("Review")
        .items(&[place, "Back", "Cancel"])
        .default(0)
        .interact()?;
    Ok(match picked {
        0 => ReviewAction::Place,
        1 => ReviewAction::Back,
        _ => ReviewAction::Cancel,
    })
}

fn pending_hint(ctx: &Context, wizard: &CheckoutWizard, err: anyhow::Error) -> anyhow::Error {
    match wizard.pending_order() {
        Some(id) => {
            ctx.output.info(&format!(
                "Order {} is awaiting payment. Retry with `store orders pay {}`",
                id, id
            ));
            err
        }
        None => err,
    }
}
