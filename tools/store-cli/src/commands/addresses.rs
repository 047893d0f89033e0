//! Saved shipping addresses.

use anyhow::{bail, Result};
use store_commerce::AddressId;
use store_session::Access;

use super::checkout::read_address;
use super::{confirm, AddressesArgs, AddressesCommand};
use crate::context::Context;

/// Run the addresses command.
pub async fn run(args: AddressesArgs, ctx: &Context) -> Result<()> {
    ctx.user(Access::Authenticated).await?;

    match args.command {
        AddressesCommand::List => list(ctx).await,
        AddressesCommand::Add { default } => add(default, ctx).await,
        AddressesCommand::Remove { id, yes } => {
            if !confirm(ctx, yes, &format!("Delete address {}?", id))? {
                return Ok(());
            }
            ctx.fetch(
                "Deleting address",
                ctx.api().addresses().delete(&AddressId::new(id)),
            )
            .await?;
            ctx.output.success("Address deleted");
            Ok(())
        }
    }
}

async fn list(ctx: &Context) -> Result<()> {
    let addresses = ctx
        .fetch("Loading addresses", ctx.api().addresses().list())
        .await?;

    if ctx.output.is_json() {
        ctx.output.json(&addresses);
        return Ok(());
    }
    if addresses.is_empty() {
        ctx.output.info("No saved addresses");
        return Ok(());
    }

    ctx.output.header("Addresses");
    for address in &addresses {
        let id = address.id.as_ref().map(|id| id.as_str()).unwrap_or("-");
        let marker = if address.is_default { " (default)" } else { "" };
        ctx.output
            .list_item(&format!("[{}] {}{}", id, address.one_line(), marker));
    }
    Ok(())
}

async fn add(default: bool, ctx: &Context) -> Result<()> {
    let mut address = read_address()?;
    address.is_default = default;

    let missing = address.missing_fields();
    if !missing.is_empty() {
        bail!("Please fill in: {}", missing.join(", "));
    }

    let saved = ctx
        .fetch("Saving address", ctx.api().addresses().create(&address))
        .await?;
    if ctx.output.is_json() {
        ctx.output.json(&saved);
    } else {
        ctx.output.success("Address saved");
        ctx.output.info(&saved.multi_line());
    }
    Ok(())
}
