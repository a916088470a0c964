//! 消息渲染 - 把解码后的通知或分类后的事件转换为 `PresentationMessage`

use chrono::{DateTime, Utc};

use super::clock::to_iso8601;
use super::event::ClassifiedEvent;
use super::message::{PresentationMessage, RenderedField};
use super::palette::EmbedColor;
use super::token::DecodedNotification;
use crate::error::PipelineError;

const UNKNOWN_APP: &str = "Unknown App";
const NO_VERSION: &str = "N/A";
const DEFAULT_ENVIRONMENT: &str = "Production";

/// 渲染签名通知
pub fn render_decoded(decoded: &DecodedNotification) -> Result<PresentationMessage, PipelineError> {
    let bundle_id = decoded
        .app
        .as_ref()
        .map(|app| app.bundle_id.as_str())
        .filter(|s| !s.is_empty())
        .unwrap_or(UNKNOWN_APP);
    let version = decoded
        .build
        .as_ref()
        .map(|build| build.version.as_str())
        .filter(|s| !s.is_empty())
        .unwrap_or(NO_VERSION);
    let environment = decoded
        .environment
        .as_deref()
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_ENVIRONMENT);

    let description = match decoded.summary.as_deref().filter(|s| !s.is_empty()) {
        Some(summary) => summary.to_string(),
        None => format!("Event: {}", decoded.subtype.as_deref().unwrap_or("")),
    };

    let signed_date = decoded
        .signed_date
        .ok_or_else(|| PipelineError::internal("missing signedDate"))?;
    let signed_at = DateTime::<Utc>::from_timestamp_millis(signed_date)
        .ok_or_else(|| PipelineError::internal(format!("signedDate out of range: {}", signed_date)))?;

    Ok(PresentationMessage {
        title: decoded.notification_type.replace('_', " "),
        description,
        color: EmbedColor::for_notification_type(&decoded.notification_type),
        url: None,
        fields: vec![
            RenderedField::inline("App Bundle ID", bundle_id),
            RenderedField::inline("Version", version),
            RenderedField::inline("Environment", environment),
        ],
        footer_text: format!("UUID: {}", decoded.notification_uuid),
        timestamp: to_iso8601(signed_at),
    })
}

/// 渲染原始事件
pub fn render_classified(classified: ClassifiedEvent) -> PresentationMessage {
    PresentationMessage {
        footer_text: format!("Type: {}", classified.event_type),
        title: classified.title,
        description: classified.description,
        color: classified.color,
        url: classified.url,
        fields: classified.fields,
        timestamp: classified.timestamp,
    }
}
