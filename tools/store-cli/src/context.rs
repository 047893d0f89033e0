//! CLI execution context.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Context as _, Result};
use store_api::StoreApi;
use store_commerce::cart::PricingRules;
use store_commerce::user::User;
use store_data::{ApiClient, FetchError, FileTokenStore, ViewScope};
use store_session::{Access, Session, SessionError};
use tracing::debug;

use crate::config::{CliConfig, CONFIG_NAMES};
use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// Effective configuration, environment overrides applied.
    pub config: CliConfig,
    /// File the configuration came from, if any.
    pub config_path: Option<PathBuf>,
    pub output: Output,
    pub cwd: PathBuf,
    pub session: Session,
}

impl Context {
    /// Load the config, open the token file and build the session.
    pub fn load(config_path: Option<&str>, env: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = match config_path {
            Some(path) => {
                let path = resolve(&cwd, Path::new(path));
                (CliConfig::load(&path)?, Some(path))
            }
            None => match Self::find_config(&cwd) {
                Some((config, path)) => (config, Some(path)),
                None => (CliConfig::default(), None),
            },
        };

        let config = match env {
            Some(env) => config.for_environment(env)?,
            None => config,
        };

        let api_config = config.api.clone().with_env_override();
        let token_file = resolve(&cwd, &config.session.token_file);
        debug!(
            base_url = %api_config.base_url,
            token_file = %token_file.display(),
            "loaded configuration"
        );

        let client = ApiClient::new(&api_config, Arc::new(FileTokenStore::new(token_file)))
            .context("Failed to create HTTP client")?;
        let api = StoreApi::new(client).with_currency(config.pricing.currency);

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
            session: Session::new(api),
        })
    }

    /// Find config file in directory tree.
    fn find_config(start: &Path) -> Option<(CliConfig, PathBuf)> {
        let mut current = start.to_path_buf();
        loop {
            for name in &CONFIG_NAMES {
                let config_path = current.join(name);
                if config_path.exists() {
                    if let Ok(config) = CliConfig::load(&config_path) {
                        return Some((config, config_path));
                    }
                }
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    pub fn api(&self) -> &StoreApi {
        self.session.api()
    }

    pub fn pricing(&self) -> Result<PricingRules> {
        self.config.pricing.rules()
    }

    /// Restore the stored session and check it against `access`.
    pub async fn user(&self, access: Access) -> Result<User> {
        self.fetch("Checking session", self.session.restore()).await?;
        self.session.require(access).await.map_err(friendly)
    }

    /// Await `fut` behind a spinner. Ctrl-C cancels it.
    pub async fn fetch<T, E>(&self, msg: &str, fut: impl Future<Output = Result<T, E>>) -> Result<T>
    where
        E: From<FetchError> + Into<SessionError>,
    {
        let pb = self.output.spinner(msg);
        let scope = ViewScope::new();
        let interrupt = scope.token();
        let watcher = tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                interrupt.cancel();
            }
        });

        let result = scope.run(fut).await;
        watcher.abort();
        pb.finish_and_clear();
        result.map_err(|e| friendly(e.into()))
    }
}

/// Turn a session error into what the user should read.
pub fn friendly(e: SessionError) -> anyhow::Error {
    match e {
        SessionError::NotAuthenticated => anyhow!("Not signed in. Run `store auth login` first."),
        SessionError::Forbidden => anyhow!("This command needs an admin account."),
        e if e.is_cancelled() => anyhow!("Cancelled"),
        e => anyhow!(e.user_message()),
    }
}

fn resolve(cwd: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}
