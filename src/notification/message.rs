//! 出站展示消息
//!
//! `PresentationMessage` 是两条渲染路径的统一输出，序列化为 Discord webhook 格式：
//! ```json
//! {
//!   "embeds": [{
//!     "title": "Build Processing Failed",
//!     "url": "https://api.appstoreconnect.apple.com/v1/builds/123",
//!     "description": "...",
//!     "color": 15548997,
//!     "fields": [{ "name": "Old State", "value": "PROCESSING", "inline": true }],
//!     "footer": { "text": "Type: buildUploadStateUpdated" },
//!     "timestamp": "2024-01-01T00:00:00.000Z"
//!   }]
//! }
//! ```

use serde::Serialize;

use super::palette::EmbedColor;

/// Embed 字段
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl RenderedField {
    /// 同行并排显示的字段
    pub fn inline(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            inline: true,
        }
    }

    /// 独占一行的字段
    pub fn block(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            inline: false,
        }
    }
}

/// 展示消息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentationMessage {
    pub title: String,
    pub description: String,
    pub color: EmbedColor,
    /// 标题链接（仅当事件带有资源链接时存在）
    pub url: Option<String>,
    pub fields: Vec<RenderedField>,
    pub footer_text: String,
    /// ISO-8601 时间戳
    pub timestamp: String,
}

impl PresentationMessage {
    /// 按名称查找字段
    pub fn field(&self, name: &str) -> Option<&RenderedField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// 转换为 Discord webhook 请求体
    pub fn discord_payload(&self) -> DiscordPayload<'_> {
        DiscordPayload {
            embeds: [DiscordEmbed {
                title: &self.title,
                url: self.url.as_deref(),
                description: &self.description,
                color: self.color,
                fields: &self.fields,
                footer: DiscordFooter {
                    text: &self.footer_text,
                },
                timestamp: &self.timestamp,
            }],
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.discord_payload())
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.discord_payload())
    }
}

/// Discord webhook 请求体
#[derive(Debug, Serialize)]
pub struct DiscordPayload<'a> {
    pub embeds: [DiscordEmbed<'a>; 1],
}

#[derive(Debug, Serialize)]
pub struct DiscordEmbed<'a> {
    pub title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<&'a str>,
    pub description: &'a str,
    pub color: EmbedColor,
    pub fields: &'a [RenderedField],
    pub footer: DiscordFooter<'a>,
    pub timestamp: &'a str,
}

#[derive(Debug, Serialize)]
pub struct DiscordFooter<'a> {
    pub text: &'a str,
}
