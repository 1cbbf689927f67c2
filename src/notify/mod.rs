// Notifier — delivers announcements to a chat webhook.

pub mod discord;
pub mod traits;

pub use discord::DiscordWebhook;
pub use traits::{Delivery, Notifier};
