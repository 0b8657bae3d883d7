use anyhow::{bail, Context, Result};
use std::{path::PathBuf, time::Duration};
use url::Url;

use crate::fetch::AnalyticsClient;
use crate::store::{DatasetStore, FileStore};

pub const DEFAULT_STORE_DIR: &str = ".energyboard";
pub const DEFAULT_ANALYTICS_URL: &str = "http://127.0.0.1:5000/";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Validated runtime settings.
#[derive(Debug, Clone)]
pub struct Config {
    pub store_dir: PathBuf,
    /// Always ends in `/` so endpoint names join beneath it.
    pub analytics_url: Url,
    pub timeout: Duration,
}

impl Config {
    pub fn new(store_dir: impl Into<PathBuf>, analytics_url: &str, timeout_secs: u64) -> Result<Self> {
        let mut url = Url::parse(analytics_url)
            .with_context(|| format!("invalid analytics URL `{}`", analytics_url))?;
        if url.cannot_be_a_base() {
            bail!("analytics URL `{}` cannot carry endpoint paths", analytics_url);
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        if timeout_secs == 0 {
            bail!("timeout must be at least one second");
        }
        Ok(Self {
            store_dir: store_dir.into(),
            analytics_url: url,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    pub fn open_store(&self) -> Result<DatasetStore<FileStore>> {
        Ok(DatasetStore::new(FileStore::new(&self.store_dir)?))
    }

    pub fn analytics_client(&self) -> Result<AnalyticsClient> {
        AnalyticsClient::new(self.analytics_url.clone(), self.timeout)
            .context("building analytics client")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_dir: PathBuf::from(DEFAULT_STORE_DIR),
            analytics_url: Url::parse(DEFAULT_ANALYTICS_URL).expect("default URL should be valid"),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}
