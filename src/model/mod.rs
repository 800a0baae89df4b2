pub mod content;
pub mod global_error;
pub mod payload;
pub mod recipient;

pub use content::ReportContent;
pub use global_error::{NotificationError, UPLOAD_THROTTLED_CODE};
pub use payload::LarkMessage;
pub use recipient::ReportRecipient;
