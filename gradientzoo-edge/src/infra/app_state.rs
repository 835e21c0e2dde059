use std::{fmt, sync::Arc};

use gradientzoo_config::Config;

use crate::proxy::{ApiProxy, ProxyError};

/// Shared, immutable per-process state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub proxy: Arc<ApiProxy>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, ProxyError> {
        let proxy = ApiProxy::from_config(&config.proxy)?;
        Ok(Self {
            config: Arc::new(config),
            proxy: Arc::new(proxy),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
