//! CLI command implementations.

pub mod addresses;
pub mod admin;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod config;
pub mod orders;
pub mod products;
pub mod reviews;
pub mod wishlist;

use anyhow::Result;
use clap::{Args, Subcommand};
use store_commerce::cart::Cart;
use store_commerce::checkout::Order;

use crate::context::Context;
use crate::output::{order_badge, truncate};

/// Arguments for the auth command.
#[derive(Args)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub command: AuthCommand,
}

#[derive(Subcommand)]
pub enum AuthCommand {
    /// Sign in and store the session token.
    Login {
        #[arg(short, long)]
        email: Option<String>,
    },
    /// Create an account and sign in.
    Register {
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        email: Option<String>,
    },
    /// Forget the stored session.
    Logout,
    /// Show the signed-in user.
    Whoami,
    /// Update name, email or password.
    Profile {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        /// Prompt for a new password.
        #[arg(long)]
        password: bool,
    },
    /// Request a password reset email.
    Forgot {
        #[arg(short, long)]
        email: Option<String>,
    },
    /// Set a new password with a reset token.
    Reset {
        /// Token from the reset email.
        token: String,
    },
}

/// Arguments for the products command.
#[derive(Args)]
pub struct ProductsArgs {
    #[command(subcommand)]
    pub command: ProductsCommand,
}

#[derive(Subcommand)]
pub enum ProductsCommand {
    /// Browse the catalog.
    List {
        #[arg(short, long)]
        keyword: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
        #[arg(short, long)]
        page: Option<u32>,
    },
    /// Show one product with its variants and reviews.
    Show {
        id: String,
    },
    /// Top-rated products.
    Top,
    /// Pick a size, color and quantity, then add to the cart.
    Select {
        id: String,
    },
}

/// Arguments for the cart command.
#[derive(Args)]
pub struct CartArgs {
    #[command(subcommand)]
    pub command: CartCommand,
}

#[derive(Subcommand)]
pub enum CartCommand {
    /// Show the cart with line totals.
    Show,
    /// Add a product.
    Add {
        product_id: String,
        #[arg(short, long, default_value = "1")]
        quantity: i64,
        #[arg(short, long)]
        size: Option<String>,
        #[arg(short, long)]
        color: Option<String>,
    },
    /// Change a line's quantity. Zero removes it.
    Update {
        item_id: String,
        quantity: i64,
    },
    /// Remove a line.
    Remove {
        item_id: String,
    },
    /// Empty the cart.
    Clear {
        #[arg(short, long)]
        yes: bool,
    },
}

/// Arguments for the wishlist command.
#[derive(Args)]
pub struct WishlistArgs {
    #[command(subcommand)]
    pub command: WishlistCommand,
}

#[derive(Subcommand)]
pub enum WishlistCommand {
    /// List saved products.
    Show,
    /// Save or unsave a product.
    Toggle {
        product_id: String,
    },
}

/// Arguments for the checkout command.
#[derive(Args)]
pub struct CheckoutArgs {
    /// Ship to this saved address instead of choosing interactively.
    #[arg(long)]
    pub address: Option<String>,

    /// Payment method (credit_card, paypal, bank_transfer, cash_on_delivery).
    #[arg(short, long)]
    pub method: Option<String>,

    /// Place the order without the final confirmation.
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the orders command.
#[derive(Args)]
pub struct OrdersArgs {
    #[command(subcommand)]
    pub command: OrdersCommand,
}

#[derive(Subcommand)]
pub enum OrdersCommand {
    /// Your orders.
    Mine,
    /// One order in detail.
    Show {
        id: String,
    },
    /// Pay an order that is awaiting payment.
    Pay {
        id: String,
    },
}

/// Arguments for the addresses command.
#[derive(Args)]
pub struct AddressesArgs {
    #[command(subcommand)]
    pub command: AddressesCommand,
}

#[derive(Subcommand)]
pub enum AddressesCommand {
    /// Saved addresses.
    List,
    /// Save a new address.
    Add {
        /// Make it the default address.
        #[arg(long)]
        default: bool,
    },
    /// Delete a saved address.
    Remove {
        id: String,
        #[arg(short, long)]
        yes: bool,
    },
}

/// Arguments for the reviews command.
#[derive(Args)]
pub struct ReviewsArgs {
    #[command(subcommand)]
    pub command: ReviewsCommand,
}

#[derive(Subcommand)]
pub enum ReviewsCommand {
    /// Approved reviews for a product.
    List {
        product_id: String,
    },
    /// Review a product.
    Add {
        product_id: String,
        #[arg(short, long)]
        rating: Option<u8>,
        #[arg(short, long)]
        comment: Option<String>,
    },
}

/// Arguments for the admin command.
#[derive(Args)]
pub struct AdminArgs {
    #[command(subcommand)]
    pub command: AdminCommand,
}

#[derive(Subcommand)]
pub enum AdminCommand {
    /// Manage the catalog.
    #[command(subcommand)]
    Products(AdminProductsCommand),
    /// Manage orders.
    #[command(subcommand)]
    Orders(AdminOrdersCommand),
    /// Manage users.
    #[command(subcommand)]
    Users(AdminUsersCommand),
    /// Moderate reviews.
    #[command(subcommand)]
    Reviews(AdminReviewsCommand),
}

#[derive(Subcommand)]
pub enum AdminProductsCommand {
    /// Create a product from a JSON file or prompts.
    Create {
        #[arg(short, long)]
        file: Option<String>,
    },
    /// Edit a product.
    Update {
        id: String,
        #[arg(short, long)]
        file: Option<String>,
    },
    Delete {
        id: String,
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum AdminOrdersCommand {
    /// All orders.
    List,
    /// Mark an order delivered.
    Deliver {
        id: String,
    },
    Delete {
        id: String,
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum AdminUsersCommand {
    /// All users.
    List,
    /// Change a user's role (client, admin, superadmin).
    Promote {
        id: String,
        role: String,
    },
    Delete {
        id: String,
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum AdminReviewsCommand {
    /// Reviews awaiting moderation, or all with `--all`.
    List {
        #[arg(short, long)]
        all: bool,
    },
    Approve {
        id: String,
    },
    Reject {
        id: String,
    },
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
}

/// Print cart lines and the subtotal.
pub(crate) fn print_cart(ctx: &Context, cart: &Cart) -> Result<()> {
    let pricing = cart.calculate_pricing()?;

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({ "cart": cart, "pricing": pricing }));
        return Ok(());
    }

    if cart.is_empty() {
        ctx.output.info("Your cart is empty");
        return Ok(());
    }

    let widths = [10, 32, 5, 10, 10];
    ctx.output
        .table_row(&["LINE", "ITEM", "QTY", "PRICE", "TOTAL"], &widths);
    for (item, line) in cart.items.iter().zip(pricing.line_items.iter()) {
        ctx.output.table_row(
            &[
                item.id.as_str(),
                &truncate(&item.title(), 32),
                &item.quantity.to_string(),
                &item.unit_price.to_string(),
                &line.total.to_string(),
            ],
            &widths,
        );
    }
    ctx.output.kv("Items", &pricing.item_count.to_string());
    ctx.output.kv("Subtotal", &pricing.subtotal.to_string());
    Ok(())
}

/// Print an order summary.
pub(crate) fn print_order(ctx: &Context, order: &Order) {
    if ctx.output.is_json() {
        ctx.output.json(order);
        return;
    }

    ctx.output.header(&format!("Order {}", order.id));
    ctx.output.kv("Status", &order_badge(order.status()));
    if let Some(created) = order.created_at {
        ctx.output.kv("Placed", &created.format("%Y-%m-%d %H:%M").to_string());
    }
    if let Some(ref name) = order.customer_name {
        ctx.output.kv("Customer", name);
    }
    ctx.output.kv("Ship to", &order.shipping_address.one_line());
    ctx.output.kv("Payment", order.payment_method.display_name());
    if let Some(paid) = order.paid_at {
        ctx.output.kv("Paid", &paid.format("%Y-%m-%d %H:%M").to_string());
    }
    if let Some(delivered) = order.delivered_at {
        ctx.output.kv("Delivered", &delivered.format("%Y-%m-%d %H:%M").to_string());
    }

    for item in &order.items {
        let title = match &item.variant {
            Some(variant) => format!("{} ({})", item.name, variant),
            None => item.name.clone(),
        };
        ctx.output.list_item(&format!(
            "{} × {} @ {}",
            item.quantity, title, item.unit_price
        ));
    }

    let totals = &order.totals;
    ctx.output.kv("Items", &totals.items_price.to_string());
    ctx.output.kv("Shipping", &totals.shipping_price.to_string());
    ctx.output.kv("Tax", &totals.tax_price.to_string());
    ctx.output.kv("Total", &totals.total_price.to_string());
}

/// One row per order.
pub(crate) fn print_order_rows(ctx: &Context, orders: &[Order]) {
    if ctx.output.is_json() {
        ctx.output.json(orders);
        return;
    }
    if orders.is_empty() {
        ctx.output.info("No orders yet");
        return;
    }

    let widths = [26, 12, 12, 18];
    ctx.output.table_row(&["ID", "DATE", "TOTAL", "STATUS"], &widths);
    for order in orders {
        let date = order
            .created_at
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        ctx.output.table_row(
            &[
                order.id.as_str(),
                &date,
                &order.totals.total_price.to_string(),
                &order_badge(order.status()),
            ],
            &widths,
        );
    }
}

/// Ask before a destructive call unless `yes` was passed.
pub(crate) fn confirm(ctx: &Context, yes: bool, prompt: &str) -> Result<bool> {
    if yes {
        return Ok(true);
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()?;
    if !confirmed {
        ctx.output.warn("Cancelled");
    }
    Ok(confirmed)
}
