use std::fmt;
use std::path::PathBuf;

use anyhow::Context;

use crate::util::retry::RetryPolicy;

pub const DEFAULT_API_BASE: &str = "https://open.larksuite.com";
pub const DEFAULT_LINK_TITLE: &str = "Explore in Superset";

/// Application-level settings shared by every Lark notification.
#[derive(Clone)]
pub struct Settings {
    pub app_id: String,
    pub app_secret: String,
    pub api_base: String,
    pub tmp_dir: PathBuf,
    pub link_title: String,
    pub upload_retry: RetryPolicy,
    pub send_retry: RetryPolicy,
}

impl Settings {
    pub fn new(app_id: impl Into<String>, app_secret: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            app_secret: app_secret.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            tmp_dir: std::env::temp_dir(),
            link_title: DEFAULT_LINK_TITLE.to_string(),
            upload_retry: RetryPolicy::UPLOAD,
            send_retry: RetryPolicy::SEND,
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_tmp_dir(mut self, tmp_dir: impl Into<PathBuf>) -> Self {
        self.tmp_dir = tmp_dir.into();
        self
    }

    pub fn with_link_title(mut self, link_title: impl Into<String>) -> Self {
        self.link_title = link_title.into();
        self
    }

    pub fn with_retry(mut self, upload_retry: RetryPolicy, send_retry: RetryPolicy) -> Self {
        self.upload_retry = upload_retry;
        self.send_retry = send_retry;
        self
    }

    /// Loads `.env` if present, then reads the `LARK_*` variables.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let app_id = lookup("LARK_APP_ID").context("LARK_APP_ID must be set")?;
        let app_secret = lookup("LARK_APP_SECRET").context("LARK_APP_SECRET must be set")?;

        let mut settings = Settings::new(app_id, app_secret);
        if let Some(api_base) = lookup("LARK_API_BASE") {
            settings.api_base = api_base;
        }
        if let Some(tmp_dir) = lookup("LARK_TMP_DIR") {
            settings.tmp_dir = PathBuf::from(tmp_dir);
        }
        if let Some(link_title) = lookup("LARK_LINK_TITLE") {
            settings.link_title = link_title;
        }

        Ok(settings)
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_base.trim_end_matches('/'), path)
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("app_id", &self.app_id)
            .field("app_secret", &"***")
            .field("api_base", &self.api_base)
            .field("tmp_dir", &self.tmp_dir)
            .field("link_title", &self.link_title)
            .field("upload_retry", &self.upload_retry)
            .field("send_retry", &self.send_retry)
            .finish()
    }
}
