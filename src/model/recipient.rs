use serde::Deserialize;

use crate::model::global_error::NotificationError;

/// A report recipient as stored by the dispatching side: an opaque JSON
/// document which, for Lark, must carry the webhook URL under `target`.
#[derive(Debug, Clone)]
pub struct ReportRecipient {
    pub recipient_config_json: String,
}

#[derive(Debug, Deserialize)]
struct RecipientConfig {
    target: String,
}

impl ReportRecipient {
    pub fn new(recipient_config_json: impl Into<String>) -> Self {
        Self {
            recipient_config_json: recipient_config_json.into(),
        }
    }

    pub fn webhook_url(&self) -> Result<String, NotificationError> {
        let config: RecipientConfig = serde_json::from_str(&self.recipient_config_json)
            .map_err(|e| NotificationError::InvalidRecipient(e.to_string()))?;

        Ok(config.target)
    }
}
