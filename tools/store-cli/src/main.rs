//! Store CLI - terminal storefront and admin client.
//!
//! Commands:
//! - `store auth` - Sign in, register, profile, password reset
//! - `store products` - Browse the catalog and pick variants
//! - `store cart` - View and edit the cart
//! - `store wishlist` - Saved products
//! - `store checkout` - Place an order
//! - `store orders` - Order history and payment retry
//! - `store addresses` - Saved shipping addresses
//! - `store reviews` - Read and write reviews
//! - `store admin` - Catalog, orders, users and moderation
//! - `store config` - Manage configuration

mod commands;
mod config;
mod context;
mod output;
mod prompt;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{
    AddressesArgs, AdminArgs, AuthArgs, CartArgs, CheckoutArgs, ConfigArgs, OrdersArgs,
    ProductsArgs, ReviewsArgs, WishlistArgs,
};

/// Store CLI - shop and manage the storefront from the terminal
#[derive(Parser)]
#[command(name = "store")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Environment from the config's [environments] table
    #[arg(short, long, global = true)]
    env: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in, register and manage your profile
    Auth(AuthArgs),

    /// Browse products
    Products(ProductsArgs),

    /// View and edit your cart
    Cart(CartArgs),

    /// Saved-for-later products
    Wishlist(WishlistArgs),

    /// Place an order from your cart
    Checkout(CheckoutArgs),

    /// Your orders
    Orders(OrdersArgs),

    /// Saved shipping addresses
    Addresses(AddressesArgs),

    /// Product reviews
    Reviews(ReviewsArgs),

    /// Store administration
    Admin(AdminArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

/// Logs go to stderr so JSON output on stdout stays parseable.
fn init_tracing(verbose: bool, json: bool) {
    let default = if verbose {
        "warn,store_cli=debug,store_data=debug,store_api=debug,store_session=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.json);

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    let ctx = match context::Context::load(cli.config.as_deref(), cli.env.as_deref(), output.clone())
    {
        Ok(ctx) => ctx,
        Err(e) => {
            output.error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Auth(args) => commands::auth::run(args, &ctx).await,
        Commands::Products(args) => commands::products::run(args, &ctx).await,
        Commands::Cart(args) => commands::cart::run(args, &ctx).await,
        Commands::Wishlist(args) => commands::wishlist::run(args, &ctx).await,
        Commands::Checkout(args) => commands::checkout::run(args, &ctx).await,
        Commands::Orders(args) => commands::orders::run(args, &ctx).await,
        Commands::Addresses(args) => commands::addresses::run(args, &ctx).await,
        Commands::Reviews(args) => commands::reviews::run(args, &ctx).await,
        Commands::Admin(args) => commands::admin::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
