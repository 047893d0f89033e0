//! Product reviews.

use anyhow::Result;
use dialoguer::{Input, Select};
use store_commerce::catalog::{average_rating, NewReview};
use store_commerce::ProductId;
use store_session::Access;

use super::{ReviewsArgs, ReviewsCommand};
use crate::context::Context;
use crate::output::stars;

/// Run the reviews command.
pub async fn run(args: ReviewsArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ReviewsCommand::List { product_id } => list(&ProductId::new(product_id), ctx).await,
        ReviewsCommand::Add {
            product_id,
            rating,
            comment,
        } => add(ProductId::new(product_id), rating, comment, ctx).await,
    }
}

async fn list(product_id: &ProductId, ctx: &Context) -> Result<()> {
    let reviews = ctx
        .fetch("Loading reviews", ctx.api().reviews().for_product(product_id))
        .await?;
    let visible: Vec<_> = reviews.into_iter().filter(|r| r.is_visible()).collect();

    if ctx.output.is_json() {
        ctx.output.json(&visible);
        return Ok(());
    }
    match average_rating(&visible) {
        Some(average) => ctx.output.header(&format!(
            "{} {:.1} from {} review(s)",
            stars(average),
            average,
            visible.len()
        )),
        None => {
            ctx.output.info("No reviews yet");
            return Ok(());
        }
    }

    for review in &visible {
        let date = review
            .created_at
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        ctx.output.list_item(&format!(
            "{} {} {}",
            stars(f64::from(review.rating)),
            review.author,
            date
        ));
        if !review.comment.is_empty() {
            ctx.output.info(&review.comment);
        }
    }
    Ok(())
}

async fn add(
    product_id: ProductId,
    rating: Option<u8>,
    comment: Option<String>,
    ctx: &Context,
) -> Result<()> {
    ctx.user(Access::Authenticated).await?;

    let rating = match rating {
        Some(rating) => rating,
        None => {
            let choices = ["★★★★★", "★★★★☆", "★★★☆☆", "★★☆☆☆", "★☆☆☆☆"];
            let picked = Select::new()
                .with_prompt("Rating")
                .items(&choices)
                .default(0)
                .interact()?;
            5 - picked as u8
        }
    };
    let comment = match comment {
        Some(comment) => comment,
        None => Input::new().with_prompt("Comment").interact_text()?,
    };

    let review = NewReview {
        product_id,
        rating,
        comment,
    };
    review.validate()?;
    let created = ctx
        .fetch("Posting review", ctx.api().reviews().create(&review))
        .await?;

    if ctx.output.is_json() {
        ctx.output.json(&created);
    } else {
        ctx.output
            .success("Thanks! Your review will appear once it is approved.");
    }
    Ok(())
}
