//! 具体渠道实现

pub mod discord;
pub mod dry_run;

pub use discord::{DiscordWebhookChannel, DiscordWebhookConfig};
pub use dry_run::DryRunChannel;
