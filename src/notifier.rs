use chrono::Local;
use reqwest::Client;
use tracing::{info, instrument};

use crate::configuration::Settings;
use crate::model::{LarkMessage, NotificationError, ReportContent, ReportRecipient};
use crate::util::lark;
use crate::util::retry::retry;

/// Delivers one report to one Lark webhook recipient.
pub struct LarkNotifier {
    settings: Settings,
    recipient: ReportRecipient,
    content: ReportContent,
    http: Client,
}

impl LarkNotifier {
    pub fn new(settings: Settings, recipient: ReportRecipient, content: ReportContent) -> Self {
        Self {
            settings,
            recipient,
            content,
            http: Client::new(),
        }
    }

    /// Uses the given client instead of a fresh one, e.g. to share a pool.
    pub fn with_client(mut self, http: Client) -> Self {
        self.http = http;
        self
    }

    /// Sends the report. Network and temp-file failures re-run the whole
    /// delivery according to `settings.send_retry`.
    pub async fn send(&self) -> Result<(), NotificationError> {
        retry(
            &self.settings.send_retry,
            "lark_send",
            move || self.try_send(),
            NotificationError::is_transport,
        )
        .await
    }

    #[instrument(skip(self), fields(report = %self.content.name))]
    async fn try_send(&self) -> Result<(), NotificationError> {
        let webhook_url = self.recipient.webhook_url()?;
        let token = lark::fetch_tenant_access_token(&self.http, &self.settings).await?;

        let files = self.content.attachments();
        let image_key = if files.is_empty() {
            None
        } else {
            info!("Uploading file to lark server...");
            let token = token.as_deref();
            let files = files.as_slice();
            let image_key = retry(
                &self.settings.upload_retry,
                "lark_upload",
                move || {
                    lark::upload_images(&self.http, &self.settings, token, &self.content.name, files)
                },
                NotificationError::is_retryable_upload,
            )
            .await?;
            info!(image_key = %image_key, "image uploaded");
            Some(image_key)
        };

        let now = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let payload = LarkMessage::build(
            &self.content,
            image_key.as_deref(),
            &self.settings.link_title,
            &now,
        );

        info!("Sending report to lark...");
        lark::request_lark_api(&self.http, &webhook_url, &payload).await?;
        info!("Report sent to lark");

        Ok(())
    }
}
