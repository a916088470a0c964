//! Dry-run 渠道（只打印不发送）

use anyhow::Result;
use tracing::info;

use crate::notification::channel::{DeliveryChannel, SendResult};
use crate::notification::message::PresentationMessage;

/// Dry-run 渠道
#[derive(Debug, Default)]
pub struct DryRunChannel;

impl DeliveryChannel for DryRunChannel {
    fn name(&self) -> &str {
        "dry-run"
    }

    async fn deliver(&self, message: &PresentationMessage) -> Result<SendResult> {
        let payload = message.to_json_pretty()?;
        eprintln!("[DRY-RUN] Would send to Discord:\n{}", payload);
        info!(channel = "dry-run", title = %message.title, "Skipped delivery");
        Ok(SendResult::Skipped("dry-run".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::palette::EmbedColor;

    #[tokio::test]
    async fn test_dry_run_skips() {
        let message = PresentationMessage {
            title: "In Review".to_string(),
            description: String::new(),
            color: EmbedColor::Info,
            url: None,
            fields: Vec::new(),
            footer_text: "Type: appStoreVersionAppVersionStateUpdated".to_string(),
            timestamp: "2024-01-01T00:00:00Z".to_string(),
        };

        let result = DryRunChannel.deliver(&message).await.unwrap();
        assert_eq!(result, SendResult::Skipped("dry-run".to_string()));
        assert_eq!(DryRunChannel.name(), "dry-run");
    }
}
