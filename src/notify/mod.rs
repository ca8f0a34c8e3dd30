pub mod embed;
pub mod webhook;

pub use webhook::{Notifier, WebhookNotifier};
