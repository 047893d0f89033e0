//! Admin commands: catalog, orders, users and review moderation.

use anyhow::{anyhow, Context as _, Result};
use dialoguer::Input;
use rust_decimal::Decimal;
use serde::Deserialize;
use store_api::ProductInput;
use store_commerce::catalog::{ReviewStatus, Variant};
use store_commerce::user::Role;
use store_commerce::{Currency, Money, OrderId, ProductId, ReviewId, UserId};
use store_session::Access;

use super::{
    confirm, print_order, print_order_rows, AdminArgs, AdminCommand, AdminOrdersCommand,
    AdminProductsCommand, AdminReviewsCommand, AdminUsersCommand,
};
use crate::context::Context;
use crate::output::{review_badge, stars, truncate};

/// Run the admin command.
pub async fn run(args: AdminArgs, ctx: &Context) -> Result<()> {
    let admin = ctx.user(Access::Admin).await?;
    tracing::debug!(user_id = %admin.id, "admin command");

    match args.command {
        AdminCommand::Products(command) => products(command, ctx).await,
        AdminCommand::Orders(command) => orders(command, ctx).await,
        AdminCommand::Users(command) => users(command, admin.is_super_admin(), ctx).await,
        AdminCommand::Reviews(command) => reviews(command, ctx).await,
    }
}

/// Product fields as written in a JSON file.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductFile {
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    brand: Option<String>,
    #[serde(default)]
    category: Option<String>,
    price: Decimal,
    #[serde(default)]
    count_in_stock: i64,
    #[serde(default)]
    images: Vec<String>,
    #[serde(default)]
    variants: Vec<VariantFile>,
}

#[derive(Debug, Deserialize)]
struct VariantFile {
    size: String,
    color: String,
    #[serde(default)]
    stock: i64,
    #[serde(default)]
    price: Option<Decimal>,
}

impl ProductFile {
    fn into_input(self, currency: Currency) -> Result<ProductInput> {
        let variants = self
            .variants
            .into_iter()
            .map(|v| -> Result<Variant> {
                let mut variant = Variant::new(v.size, v.color, v.stock);
                variant.price = v
                    .price
                    .map(|p| Money::from_decimal(p, currency))
                    .transpose()?;
                Ok(variant)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ProductInput {
            name: self.name,
            description: self.description,
            brand: self.brand.filter(|b| !b.is_empty()),
            category: self.category.filter(|c| !c.is_empty()),
            price: Money::from_decimal(self.price, currency)?,
            count_in_stock: self.count_in_stock,
            images: self.images,
            variants,
        })
    }
}

fn read_product_file(path: &str, currency: Currency) -> Result<ProductInput> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read product file: {}", path))?;
    let file: ProductFile = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse product file: {}", path))?;
    file.into_input(currency)
}

/// Prompt for the basic fields, defaulting to `current`.
fn prompt_product(current: &ProductInput) -> Result<ProductInput> {
    let currency = current.price.currency;
    let name: String = Input::new()
        .with_prompt("Name")
        .with_initial_text(current.name.clone())
        .interact_text()?;
    let price: Decimal = Input::new()
        .with_prompt(format!("Price ({})", currency.code()))
        .default(current.price.to_decimal())
        .interact_text()?;
    let count_in_stock: i64 = Input::new()
        .with_prompt("Count in stock")
        .default(current.count_in_stock)
        .interact_text()?;
    let optional = |prompt: &str, value: &Option<String>| -> Result<Option<String>> {
        let answer: String = Input::new()
            .with_prompt(prompt)
            .with_initial_text(value.clone().unwrap_or_default())
            .allow_empty(true)
            .interact_text()?;
        Ok(Some(answer.trim().to_string()).filter(|a| !a.is_empty()))
    };
    let brand = optional("Brand", &current.brand)?;
    let category = optional("Category", &current.category)?;
    let description: String = Input::new()
        .with_prompt("Description")
        .with_initial_text(current.description.clone())
        .allow_empty(true)
        .interact_text()?;

    Ok(ProductInput {
        name,
        description,
        brand,
        category,
        price: Money::from_decimal(price, currency)?,
        count_in_stock,
        images: current.images.clone(),
        variants: current.variants.clone(),
    })
}

async fn products(command: AdminProductsCommand, ctx: &Context) -> Result<()> {
    let currency = ctx.api().currency();

    match command {
        AdminProductsCommand::Create { file } => {
            let input = match file {
                Some(path) => read_product_file(&path, currency)?,
                None => prompt_product(&ProductInput {
                    name: String::new(),
                    description: String::new(),
                    brand: None,
                    category: None,
                    price: Money::zero(currency),
                    count_in_stock: 0,
                    images: Vec::new(),
                    variants: Vec::new(),
                })?,
            };
            let product = ctx
                .fetch("Creating product", ctx.api().products().create(&input))
                .await?;
            ctx.output
                .success(&format!("Created {} ({})", product.name, product.id));
        }
        AdminProductsCommand::Update { id, file } => {
            let id = ProductId::new(id);
            let input = match file {
                Some(path) => read_product_file(&path, currency)?,
                None => {
                    let current = ctx
                        .fetch("Loading product", ctx.api().products().get(&id))
                        .await?;
                    prompt_product(&ProductInput::from(&current))?
                }
            };
            let product = ctx
                .fetch("Saving product", ctx.api().products().update(&id, &input))
                .await?;
            ctx.output.success(&format!("Updated {}", product.name));
        }
        AdminProductsCommand::Delete { id, yes } => {
            if !confirm(ctx, yes, &format!("Delete product {}?", id))? {
                return Ok(());
            }
            ctx.fetch(
                "Deleting product",
                ctx.api().products().delete(&ProductId::new(id)),
            )
            .await?;
            ctx.output.success("Product deleted");
        }
    }
    Ok(())
}

async fn orders(command: AdminOrdersCommand, ctx: &Context) -> Result<()> {
    match command {
        AdminOrdersCommand::List => {
            let orders = ctx
                .fetch("Loading orders", ctx.api().orders().list())
                .await?;
            ctx.output.header("All orders");
            print_order_rows(ctx, &orders);
        }
        AdminOrdersCommand::Deliver { id } => {
            let order = ctx
                .fetch(
                    "Marking delivered",
                    ctx.api().orders().deliver(&OrderId::new(id)),
                )
                .await?;
            ctx.output
                .success(&format!("Order {} marked delivered", order.short_id()));
            print_order(ctx, &order);
        }
        AdminOrdersCommand::Delete { id, yes } => {
            if !confirm(ctx, yes, &format!("Delete order {}?", id))? {
                return Ok(());
            }
            ctx.fetch(
                "Deleting order",
                ctx.api().orders().delete(&OrderId::new(id)),
            )
            .await?;
            ctx.output.success("Order deleted");
        }
    }
    Ok(())
}

async fn users(command: AdminUsersCommand, super_admin: bool, ctx: &Context) -> Result<()> {
    match command {
        AdminUsersCommand::List => {
            let users = ctx.fetch("Loading users", ctx.api().users().list()).await?;
            if ctx.output.is_json() {
                ctx.output.json(&users);
                return Ok(());
            }

            let widths = [26, 24, 30, 10];
            ctx.output
                .table_row(&["ID", "NAME", "EMAIL", "ROLE"], &widths);
            for user in &users {
                ctx.output.table_row(
                    &[
                        user.id.as_str(),
                        &truncate(&user.name, 24),
                        &truncate(&user.email, 30),
                        user.role.as_str(),
                    ],
                    &widths,
                );
            }
        }
        AdminUsersCommand::Promote { id, role } => {
            let role: Role = role
                .parse()
                .map_err(|_| anyhow!("Unknown role: {} (client, admin, superadmin)", role))?;
            if !super_admin {
                ctx.output
                    .warn("Role changes usually need a superadmin; the server decides");
            }
            let user = ctx
                .fetch(
                    "Updating role",
                    ctx.api().users().promote(&UserId::new(id), role),
                )
                .await?;
            ctx.output
                .success(&format!("{} is now {}", user.name, user.role.as_str()));
        }
        AdminUsersCommand::Delete { id, yes } => {
            if !confirm(ctx, yes, &format!("Delete user {}?", id))? {
                return Ok(());
            }
            ctx.fetch(
                "Deleting user",
                ctx.api().users().delete(&UserId::new(id)),
            )
            .await?;
            ctx.output.success("User deleted");
        }
    }
    Ok(())
}

async fn reviews(command: AdminReviewsCommand, ctx: &Context) -> Result<()> {
    let (id, status) = match command {
        AdminReviewsCommand::List { all } => {
            let reviews = ctx
                .fetch("Loading reviews", ctx.api().reviews().admin_list())
                .await?;
            let shown: Vec<_> = reviews
                .into_iter()
                .filter(|r| all || r.status == ReviewStatus::Pending)
                .collect();

            if ctx.output.is_json() {
                ctx.output.json(&shown);
                return Ok(());
            }
            if shown.is_empty() {
                ctx.output.info("Nothing to moderate");
                return Ok(());
            }
            for review in &shown {
                ctx.output.list_item(&format!(
                    "[{}] {} {} on {}: {} ({})",
                    review.id,
                    stars(f64::from(review.rating)),
                    review.author,
                    review.product_id,
                    truncate(&review.comment, 60),
                    review_badge(review.status)
                ));
            }
            return Ok(());
        }
        AdminReviewsCommand::Approve { id } => (id, ReviewStatus::Approved),
        AdminReviewsCommand::Reject { id } => (id, ReviewStatus::Rejected),
    };

    let review = ctx
        .fetch(
            "Updating review",
            ctx.api().reviews().set_status(&ReviewId::new(id), status),
        )
        .await?;
    ctx.output.success(&format!(
        "Review {} is now {}",
        review.id,
        review.status.as_str()
    ));
    Ok(())
}
