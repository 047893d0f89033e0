//! Sign-in, registration and profile.

use anyhow::{bail, Result};
use dialoguer::{Input, Password};
use store_api::ProfileUpdate;
use store_session::Access;

use super::{AuthArgs, AuthCommand};
use crate::context::{friendly, Context};

/// Run the auth command.
pub async fn run(args: AuthArgs, ctx: &Context) -> Result<()> {
    match args.command {
        AuthCommand::Login { email } => login(email, ctx).await,
        AuthCommand::Register { name, email } => register(name, email, ctx).await,
        AuthCommand::Logout => logout(ctx).await,
        AuthCommand::Whoami => whoami(ctx).await,
        AuthCommand::Profile {
            name,
            email,
            password,
        } => profile(name, email, password, ctx).await,
        AuthCommand::Forgot { email } => forgot(email, ctx).await,
        AuthCommand::Reset { token } => reset(&token, ctx).await,
    }
}

fn ask(prompt: &str, given: Option<String>) -> Result<String> {
    match given {
        Some(value) => Ok(value),
        None => Ok(Input::new().with_prompt(prompt).interact_text()?),
    }
}

async fn login(email: Option<String>, ctx: &Context) -> Result<()> {
    let email = ask("Email", email)?;
    let password = Password::new().with_prompt("Password").interact()?;

    let user = ctx
        .fetch("Signing in", ctx.session.login(&email, &password))
        .await?;

    if ctx.output.is_json() {
        ctx.output.json(&user);
        return Ok(());
    }
    ctx.output
        .success(&format!("Signed in as {} ({})", user.name, user.role.as_str()));
    let items = ctx.session.cart().item_count().await;
    if items > 0 {
        ctx.output.info(&format!("{} item(s) in your cart", items));
    }
    Ok(())
}

async fn register(name: Option<String>, email: Option<String>, ctx: &Context) -> Result<()> {
    let name = ask("Name", name)?;
    let email = ask("Email", email)?;
    let password = Password::new()
        .with_prompt("Password")
        .with_confirmation("Confirm password", "Passwords do not match")
        .interact()?;

    let user = ctx
        .fetch(
            "Creating account",
            ctx.session.register(&name, &email, &password),
        )
        .await?;

    if ctx.output.is_json() {
        ctx.output.json(&user);
    } else {
        ctx.output.success(&format!("Welcome, {}!", user.name));
    }
    Ok(())
}

async fn logout(ctx: &Context) -> Result<()> {
    ctx.session.logout().await.map_err(friendly)?;
    ctx.output.success("Signed out");
    Ok(())
}

async fn whoami(ctx: &Context) -> Result<()> {
    let user = ctx.user(Access::Authenticated).await?;

    if ctx.output.is_json() {
        ctx.output.json(&user);
        return Ok(());
    }
    ctx.output.header(&user.name);
    ctx.output.kv("Email", &user.email);
    ctx.output.kv("Role", user.role.as_str());
    ctx.output.kv("User ID", user.id.as_str());
    Ok(())
}

async fn profile(
    name: Option<String>,
    email: Option<String>,
    change_password: bool,
    ctx: &Context,
) -> Result<()> {
    ctx.user(Access::Authenticated).await?;

    let password = if change_password {
        Some(
            Password::new()
                .with_prompt("New password")
                .with_confirmation("Confirm password", "Passwords do not match")
                .interact()?,
        )
    } else {
        None
    };

    let update = ProfileUpdate {
        name,
        email,
        password,
    };
    if update.name.is_none() && update.email.is_none() && update.password.is_none() {
        bail!("Nothing to update. Pass --name, --email or --password.");
    }

    let user = ctx
        .fetch("Updating profile", ctx.session.update_profile(&update))
        .await?;
    if ctx.output.is_json() {
        ctx.output.json(&user);
    } else {
        ctx.output.success("Profile updated");
    }
    Ok(())
}

async fn forgot(email: Option<String>, ctx: &Context) -> Result<()> {
    let email = ask("Email", email)?;
    let message = ctx
        .fetch("Requesting reset", ctx.api().password().forgot(&email))
        .await?;
    ctx.output.success(&message);
    Ok(())
}

async fn reset(token: &str, ctx: &Context) -> Result<()> {
    let password = Password::new()
        .with_prompt("New password")
        .with_confirmation("Confirm password", "Passwords do not match")
        .interact()?;
    let message = ctx
        .fetch("Resetting password", ctx.api().password().reset(token, &password))
        .await?;
    ctx.output.success(&message);
    Ok(())
}
