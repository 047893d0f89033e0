//! Catalog browsing and variant selection.

use anyhow::{bail, Result};
use dialoguer::{Confirm, Input, Select};
use store_api::ProductQuery;
use store_commerce::catalog::{average_rating, Product, SelectionState, VariantSelector};
use store_commerce::ProductId;
use store_session::Access;

use super::{print_cart, ProductsArgs, ProductsCommand};
use crate::context::Context;
use crate::output::{stars, truncate};

/// Run the products command.
pub async fn run(args: ProductsArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ProductsCommand::List {
            keyword,
            category,
            page,
        } => list(
            ProductQuery {
                keyword,
                category,
                page,
            },
            ctx,
        )
        .await,
        ProductsCommand::Show { id } => show(&ProductId::new(id), ctx).await,
        ProductsCommand::Top => top(ctx).await,
        ProductsCommand::Select { id } => select(&ProductId::new(id), ctx).await,
    }
}

async fn list(query: ProductQuery, ctx: &Context) -> Result<()> {
    let page = ctx
        .fetch("Loading products", ctx.api().products().list(&query))
        .await?;

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "products": page.products,
            "page": page.page,
            "pages": page.pages,
        }));
        return Ok(());
    }

    print_rows(ctx, &page.products);
    if page.pages > 1 {
        ctx.output
            .info(&format!("Page {} of {}", page.page, page.pages));
        if page.has_next() {
            ctx.output
                .info(&format!("Next: store products list --page {}", page.page + 1));
        }
    }
    Ok(())
}

async fn top(ctx: &Context) -> Result<()> {
    let products = ctx
        .fetch("Loading top products", ctx.api().products().top())
        .await?;
    if ctx.output.is_json() {
        ctx.output.json(&products);
        return Ok(());
    }
    ctx.output.header("Top rated");
    print_rows(ctx, &products);
    Ok(())
}

fn print_rows(ctx: &Context, products: &[Product]) {
    if products.is_empty() {
        ctx.output.info("No products found");
        return;
    }

    let widths = [26, 30, 10, 7, 10];
    ctx.output
        .table_row(&["ID", "NAME", "PRICE", "RATING", "STOCK"], &widths);
    for product in products {
        let stock = if product.is_in_stock() {
            product.total_stock().to_string()
        } else {
            "sold out".to_string()
        };
        ctx.output.table_row(
            &[
                product.id.as_str(),
                &truncate(&product.name, 30),
                &product.price.to_string(),
                &stars(product.rating),
                &stock,
            ],
            &widths,
        );
    }
}

async fn show(id: &ProductId, ctx: &Context) -> Result<()> {
    let products = ctx.api().products();
    let reviews = ctx.api().reviews();
    let (product, reviews) = tokio::join!(
        ctx.fetch("Loading product", products.get(id)),
        reviews.for_product(id),
    );
    let product = product?;
    let reviews: Vec<_> = reviews
        .unwrap_or_default()
        .into_iter()
        .filter(|r| r.is_visible())
        .collect();

    if ctx.output.is_json() {
        ctx.output
            .json(&serde_json::json!({ "product": product, "reviews": reviews }));
        return Ok(());
    }

    ctx.output.header(&product.name);
    ctx.output.kv("Price", &product.price.to_string());
    if let Some(ref brand) = product.brand {
        ctx.output.kv("Brand", brand);
    }
    if let Some(ref category) = product.category {
        ctx.output.kv("Category", category);
    }
    ctx.output.kv(
        "Rating",
        &format!("{} ({} reviews)", stars(product.rating), product.num_reviews),
    );
    ctx.output.kv("In stock", &product.total_stock().to_string());
    if let Some(image) = product.primary_image() {
        ctx.output.kv("Image", image);
    }
    if !product.description.is_empty() {
        ctx.output.info(&product.description);
    }

    if product.has_variants() {
        ctx.output.header("Variants");
        for variant in &product.variants {
            let price = product.price_for(Some(variant));
            let stock = if variant.is_in_stock() {
                format!("{} left", variant.stock)
            } else {
                "out of stock".to_string()
            };
            ctx.output
                .list_item(&format!("{}  {}  {}", variant.label(), price, stock));
        }
    }

    if !reviews.is_empty() {
        let average = average_rating(&reviews).unwrap_or_default();
        ctx.output
            .header(&format!("Reviews {}", stars(average)));
        for review in &reviews {
            ctx.output.list_item(&format!(
                "{} {}: {}",
                stars(f64::from(review.rating)),
                review.author,
                review.comment
            ));
        }
    }
    Ok(())
}

/// Drive the variant selector at the terminal.
async fn select(id: &ProductId, ctx: &Context) -> Result<()> {
    ctx.user(Access::Authenticated).await?;
    let product = ctx
        .fetch("Loading product", ctx.api().products().get(id))
        .await?;

    ctx.output.header(&product.name);
    let mut selector = VariantSelector::new(&product);

    while matches!(
        selector.state(),
        SelectionState::NoSize | SelectionState::SizeSelected | SelectionState::Unresolved
    ) {
        if let Some(message) = selector.message() {
            ctx.output.info(message);
        }

        let sizes = selector.sizes();
        let size = Select::new()
            .with_prompt("Size")
            .items(&sizes)
            .default(0)
            .interact()?;
        selector.select_size(sizes[size])?;

        let options = selector.color_options();
        let labels: Vec<String> = options
            .iter()
            .map(|o| {
                if o.in_stock {
                    o.color.clone()
                } else {
                    format!("{} (out of stock)", o.color)
                }
            })
            .collect();
        if labels.is_empty() {
            ctx.output.warn("No colors for this size");
            continue;
        }
        let color = Select::new()
            .with_prompt("Color")
            .items(&labels)
            .default(0)
            .interact()?;
        selector.select_color(&options[color].color)?;
    }

    if !selector.can_add_to_cart() {
        bail!(selector
            .message()
            .unwrap_or("Not available")
            .to_string());
    }

    let stock = selector.available_stock();
    let wanted: i64 = Input::new()
        .with_prompt(format!("Quantity (1-{})", stock))
        .default(1)
        .interact_text()?;
    let quantity = selector.set_quantity(wanted);
    if quantity != wanted {
        ctx.output
            .warn(&format!("Quantity adjusted to {}", quantity));
    }

    let item = selector.add_to_cart()?;
    let label = selector
        .resolved_variant()
        .map(|v| format!("{} ({})", product.name, v.label()))
        .unwrap_or_else(|| product.name.clone());

    if !Confirm::new()
        .with_prompt(format!(
            "Add {} × {} at {} to cart?",
            quantity, label, item.unit_price
        ))
        .default(true)
        .interact()?
    {
        ctx.output.warn("Cancelled");
        return Ok(());
    }

    let cart = ctx
        .fetch("Adding to cart", ctx.session.cart().add(&item))
        .await?;
    ctx.output.success("Added to cart");
    print_cart(ctx, &cart)
}
