//! Process-wide client wiring: settings file, session, API client and notifications.

use std::io::IsTerminal as _;
use std::sync::Arc;

use anyhow::{Context as _, Result, bail};
use corral_business::screens::Services;
use corral_business::{
    ApiClient, BusinessConfig, NotificationReceiver, Notifier, Session, TokenStore,
};
use corral_states::Subscription;
use tracing::{debug, info, instrument};

use crate::config::{FileTokenStore, SettingsFile};
use crate::output::Output;

const API_URL_ENV: &str = "CORRAL_API_URL";

/// Picks the API base URL: `--api-url`, then `CORRAL_API_URL`, then the settings file.
///
/// `None` keeps whatever [`BusinessConfig::from_env`] settled on.
pub fn resolve_api_url(
    flag: Option<&str>,
    env_set: bool,
    file: Option<&str>,
) -> Option<String> {
    if let Some(url) = flag {
        return Some(url.to_owned());
    }
    if env_set {
        return None;
    }
    file.map(str::to_owned)
}

pub struct AppContext {
    services: Services,
    receiver: NotificationReceiver,
    subscriptions: Vec<Subscription>,
}

impl AppContext {
    /// Opens the settings file and builds the client on top of it.
    #[instrument(skip_all, name = "context")]
    pub fn open(api_url: Option<&str>) -> Result<Self> {
        let path = SettingsFile::default_path()?;
        let store = FileTokenStore::open(path)?;
        debug!(path = %store.path().display(), "settings loaded");

        let mut config = BusinessConfig::from_env().context("Invalid CORRAL_* configuration")?;
        let env_set = std::env::var_os(API_URL_ENV).is_some();
        if let Some(url) = resolve_api_url(api_url, env_set, store.api_url().as_deref()) {
            config.api_base_url = url.trim_end_matches('/').to_owned();
        }
        info!(api = %config.api_base_url, "using API");

        let store: Arc<dyn TokenStore> = Arc::new(store);
        Self::with_store(config, store)
    }

    /// Builds the client over an arbitrary token store.
    pub fn with_store(config: BusinessConfig, store: Arc<dyn TokenStore>) -> Result<Self> {
        let session = Session::new(store, &config);
        let api = ApiClient::new(config, session).context("Failed to build the HTTP client")?;
        let (notifier, receiver) = Notifier::channel();

        let subscriptions = vec![
            api.session().subscribe(|user| match user {
                Some(user) => debug!(username = %user.username, "session started"),
                None => debug!("session cleared"),
            }),
            api.busy().subscribe(|busy| debug!(busy, "request activity")),
        ];

        Ok(Self {
            services: Services::new(api, notifier),
            receiver,
            subscriptions,
        })
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    pub fn api(&self) -> &ApiClient {
        &self.services.api
    }

    pub fn session(&self) -> &Session {
        self.services.api.session()
    }

    /// Prints every pending notification to stderr.
    pub fn flush_notifications(&self) {
        let out = Output::stderr();
        for notification in self.receiver.drain() {
            out.notification(&notification);
        }
    }

    /// Fails unless a session is stored, offering an interactive login on a terminal.
    pub async fn ensure_authenticated(&self) -> Result<()> {
        if self.session().is_authenticated() {
            return Ok(());
        }
        if !std::io::stdin().is_terminal() {
            bail!("Not signed in, run 'corral login' first");
        }
        Output::stderr().warning("No hay una sesión activa");
        crate::commands::login::prompt_login(self, None).await?;
        self.flush_notifications();
        Ok(())
    }

    /// Drops the listeners and prints what is left in the notification queue.
    pub fn shutdown(self) {
        self.flush_notifications();
        for subscription in self.subscriptions {
            subscription.unsubscribe();
        }
    }
}
