//! Configuration management commands.

use anyhow::{bail, Result};

use super::{ConfigArgs, ConfigCommand};
use crate::config::{generate_default_config, CONFIG_NAMES};
use crate::context::Context;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Init { force } => init_config(force, ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match ctx.config_path {
        Some(ref path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }

    let api = ctx.config.api.clone().with_env_override();
    ctx.output.info("[api]");
    ctx.output.kv("base_url", &api.base_url);
    if api.base_url != ctx.config.api.base_url {
        ctx.output
            .kv("overridden by", store_data::API_URL_ENV);
    }
    ctx.output.kv("timeout_secs", &api.timeout_secs.to_string());

    let pricing = &ctx.config.pricing;
    ctx.output.info("[pricing]");
    ctx.output.kv("currency", pricing.currency.code());
    ctx.output.kv(
        "free_shipping_threshold_cents",
        &pricing.free_shipping_threshold_cents.to_string(),
    );
    ctx.output
        .kv("flat_shipping_cents", &pricing.flat_shipping_cents.to_string());
    ctx.output
        .kv("tax_rate_percent", &pricing.tax_rate_percent.to_string());

    ctx.output.info("[session]");
    ctx.output.kv(
        "token_file",
        &ctx.config.session.token_file.display().to_string(),
    );

    if !ctx.config.environments.is_empty() {
        ctx.output.info("Environments:");
        let mut envs: Vec<_> = ctx.config.environments.iter().collect();
        envs.sort_by(|a, b| a.0.cmp(b.0));
        for (name, env) in envs {
            match env.api {
                Some(ref api) if ctx.output.is_verbose() => {
                    ctx.output
                        .list_item(&format!("{} ({})", name, api.base_url));
                }
                _ => ctx.output.list_item(name),
            }
        }
    }

    Ok(())
}

fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join(CONFIG_NAMES[0]);

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(&config_path, generate_default_config())?;
    ctx.output
        .success(&format!("Created: {}", config_path.display()));

    Ok(())
}
