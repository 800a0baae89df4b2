pub mod configuration;
pub mod model;
pub mod notifier;
pub mod telemetry;
pub mod util;

pub use configuration::Settings;
pub use model::{LarkMessage, NotificationError, ReportContent, ReportRecipient};
pub use notifier::LarkNotifier;
pub use util::retry::RetryPolicy;
