//! App Store Connect raw event 分类
//!
//! 未签名的 webhook 事件（构建处理、版本审核状态、测试 ping）按 `data.type`
//! 分类，生成标题、描述、颜色和字段列表。
//!
//! 未知的事件类型和状态值不是错误：它们走默认分支，渲染为通用消息，
//! 保证 Apple 新增事件类型时仍能收到可读通知。

use serde_json::{Map, Value};

use super::clock::{to_iso8601, Clock};
use super::message::RenderedField;
use super::palette::EmbedColor;
use crate::error::PipelineError;

/// 诊断字段保留的最大字符数
pub const RAW_PAYLOAD_LIMIT: usize = 1000;

/// 属性缺失时的默认值
const UNKNOWN: &str = "UNKNOWN";

/// 消息文案
mod msg {
    pub const BUILD_COMPLETE_TITLE: &str = "Build Processing Complete";
    pub const BUILD_COMPLETE_DESC: &str = "The build is ready for TestFlight or Submission.";
    pub const BUILD_FAILED_TITLE: &str = "Build Processing Failed";
    pub const BUILD_FAILED_DESC: &str = "Apple failed to process the uploaded binary.";
    pub const BUILD_UPDATED_TITLE: &str = "Build State Updated";

    pub const WAITING_FOR_REVIEW: &str = "Waiting For Review";
    pub const IN_REVIEW: &str = "In Review";
    pub const REJECTED: &str = "Submission Rejected";
    pub const READY_FOR_DISTRIBUTION: &str = "Ready For Distribution";
    pub const NOW_LIVE: &str = "The app is now Live on the App Store!";
    pub const PREPARE_FOR_SUBMISSION: &str = "Prepare For Submission";
    pub const READY_FOR_REVIEW: &str = "Ready For Review";
    pub const APP_STATUS_PREFIX: &str = "App Status: ";

    pub const PING_TITLE: &str = "Webhook Configured Successfully";
    pub const PING_DESC: &str = "Test signal received.";

    pub const GENERIC_TITLE_PREFIX: &str = "App Store Connect Event: ";
    pub const GENERIC_DESC: &str = "Received a raw status update.";
}

/// 字段名
pub mod field {
    pub const OLD_STATE: &str = "Old State";
    pub const NEW_STATE: &str = "New State";
    pub const PREVIOUS: &str = "Previous";
    pub const NEW_STATUS: &str = "New Status";
    pub const RESOURCE_ID: &str = "Resource ID";
    pub const LINK: &str = "Link";
    pub const EVENT_ID: &str = "Event ID";
    pub const RAW_PAYLOAD: &str = "Full Raw Payload";
}

/// 事件类别
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// `buildUploadStateUpdated`
    BuildUploadStateUpdated,
    /// `appStoreVersionAppVersionStateUpdated`
    AppVersionStateUpdated,
    /// `webhookPingCreated`
    WebhookPing,
    /// 其他类型（保留原始字符串）
    Other(String),
}

impl EventKind {
    pub fn parse(event_type: &str) -> Self {
        match event_type {
            "buildUploadStateUpdated" => EventKind::BuildUploadStateUpdated,
            "appStoreVersionAppVersionStateUpdated" => EventKind::AppVersionStateUpdated,
            "webhookPingCreated" => EventKind::WebhookPing,
            other => EventKind::Other(other.to_string()),
        }
    }
}

/// 构建处理状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildState {
    Complete,
    Failed,
    Other(String),
}

impl BuildState {
    pub fn parse(state: &str) -> Self {
        match state {
            "COMPLETE" => BuildState::Complete,
            "FAILED" => BuildState::Failed,
            other => BuildState::Other(other.to_string()),
        }
    }
}

/// App 版本审核状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppVersionState {
    WaitingForReview,
    InReview,
    Rejected,
    DeveloperRejected,
    ReadyForDistribution,
    PrepareForSubmission,
    ReadyForReview,
    Other(String),
}

impl AppVersionState {
    pub fn parse(state: &str) -> Self {
        match state {
            "WAITING_FOR_REVIEW" => AppVersionState::WaitingForReview,
            "IN_REVIEW" => AppVersionState::InReview,
            "REJECTED" => AppVersionState::Rejected,
            "DEVELOPER_REJECTED" => AppVersionState::DeveloperRejected,
            "READY_FOR_DISTRIBUTION" => AppVersionState::ReadyForDistribution,
            "PREPARE_FOR_SUBMISSION" => AppVersionState::PrepareForSubmission,
            "READY_FOR_REVIEW" => AppVersionState::ReadyForReview,
            other => AppVersionState::Other(other.to_string()),
        }
    }

    /// (标题, 颜色, 覆盖描述)
    fn presentation(&self) -> (String, EmbedColor, Option<&'static str>) {
        match self {
            AppVersionState::WaitingForReview => {
                (msg::WAITING_FOR_REVIEW.to_string(), EmbedColor::Warning, None)
            }
            AppVersionState::InReview => (msg::IN_REVIEW.to_string(), EmbedColor::Info, None),
            AppVersionState::Rejected | AppVersionState::DeveloperRejected => {
                (msg::REJECTED.to_string(), EmbedColor::Failure, None)
            }
            AppVersionState::ReadyForDistribution => (
                msg::READY_FOR_DISTRIBUTION.to_string(),
                EmbedColor::Success,
                Some(msg::NOW_LIVE),
            ),
            AppVersionState::PrepareForSubmission => {
                (msg::PREPARE_FOR_SUBMISSION.to_string(), EmbedColor::Neutral, None)
            }
            AppVersionState::ReadyForReview => {
                (msg::READY_FOR_REVIEW.to_string(), EmbedColor::Neutral, None)
            }
            AppVersionState::Other(value) => (
                format!("{}{}", msg::APP_STATUS_PREFIX, value.replace('_', " ")),
                EmbedColor::Neutral,
                None,
            ),
        }
    }
}

/// `relationships.instance` 中的资源关联
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Relationship {
    pub resource_id: Option<String>,
    pub resource_type: Option<String>,
    pub self_link: Option<String>,
}

/// 未签名的原始事件
#[derive(Debug, Clone, PartialEq)]
pub struct RawEvent {
    pub event_type: String,
    pub id: String,
    pub attributes: Map<String, Value>,
    pub relationship: Option<Relationship>,
}

impl RawEvent {
    /// 从入站文档的 `data` 信封提取事件；`data.type` 缺失或为空时返回 None
    pub fn from_document(document: &Value) -> Option<Self> {
        let data = document.get("data")?;
        let event_type = non_empty_str(data.get("type"))?;

        let attributes = data
            .get("attributes")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();

        let instance = data.get("relationships").and_then(|r| r.get("instance"));
        let relationship = instance.and_then(|inst| {
            let rel = Relationship {
                resource_id: non_empty_str(inst.get("data").and_then(|d| d.get("id"))),
                resource_type: non_empty_str(inst.get("data").and_then(|d| d.get("type"))),
                self_link: non_empty_str(inst.get("links").and_then(|l| l.get("self"))),
            };
            // 只有 id 或 link 会被渲染
            if rel.resource_id.is_none() && rel.self_link.is_none() {
                None
            } else {
                Some(rel)
            }
        });

        Some(Self {
            event_type,
            id: non_empty_str(data.get("id")).unwrap_or_default(),
            attributes,
            relationship,
        })
    }

    pub fn kind(&self) -> EventKind {
        EventKind::parse(&self.event_type)
    }

    /// 读取标量属性
    ///
    /// 字符串原样返回，数字/布尔值返回 JSON 文本；
    /// 缺失、null、空字符串、数组和对象都视为缺失。
    pub fn attribute(&self, key: &str) -> Option<String> {
        match self.attributes.get(key)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    pub fn attribute_or(&self, key: &str, default: &str) -> String {
        self.attribute(key).unwrap_or_else(|| default.to_string())
    }

    /// `attributes.timestamp`（仅接受非空字符串）
    pub fn timestamp(&self) -> Option<String> {
        non_empty_str(self.attributes.get("timestamp"))
    }
}

/// 分类结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedEvent {
    pub event_type: String,
    pub title: String,
    pub description: String,
    pub color: EmbedColor,
    pub url: Option<String>,
    pub fields: Vec<RenderedField>,
    pub timestamp: String,
}

/// 对原始事件分类
///
/// `document` 是完整入站文档，用于生成诊断字段。
pub fn classify(
    event: &RawEvent,
    document: &Value,
    clock: &dyn Clock,
) -> Result<ClassifiedEvent, PipelineError> {
    let mut title = format!("{}{}", msg::GENERIC_TITLE_PREFIX, event.event_type);
    let mut description = msg::GENERIC_DESC.to_string();
    let mut color = EmbedColor::Neutral;
    let mut fields = Vec::new();

    match event.kind() {
        EventKind::BuildUploadStateUpdated => {
            let old_state = event.attribute_or("oldState", UNKNOWN);
            let new_state = event.attribute_or("newState", UNKNOWN);

            match BuildState::parse(&new_state) {
                BuildState::Complete => {
                    title = msg::BUILD_COMPLETE_TITLE.to_string();
                    description = msg::BUILD_COMPLETE_DESC.to_string();
                    color = EmbedColor::Success;
                }
                BuildState::Failed => {
                    title = msg::BUILD_FAILED_TITLE.to_string();
                    description = msg::BUILD_FAILED_DESC.to_string();
                    color = EmbedColor::Failure;
                }
                BuildState::Other(_) => {
                    title = msg::BUILD_UPDATED_TITLE.to_string();
                    description = format!("State changed: {} -> {}", old_state, new_state);
                }
            }

            fields.push(RenderedField::inline(field::OLD_STATE, old_state));
            fields.push(RenderedField::inline(field::NEW_STATE, new_state));
        }
        EventKind::AppVersionStateUpdated => {
            let old_value = event.attribute_or("oldValue", UNKNOWN);
            let new_value = event.attribute_or("newValue", UNKNOWN);

            let (state_title, state_color, state_desc) =
                AppVersionState::parse(&new_value).presentation();
            title = state_title;
            color = state_color;
            if let Some(desc) = state_desc {
                description = desc.to_string();
            }

            fields.push(RenderedField::inline(field::PREVIOUS, old_value));
            fields.push(RenderedField::inline(field::NEW_STATUS, new_value));
        }
        EventKind::WebhookPing => {
            title = msg::PING_TITLE.to_string();
            description = msg::PING_DESC.to_string();
            color = EmbedColor::Success;
        }
        EventKind::Other(_) => {}
    }

    // 资源关联
    let mut url = None;
    if let Some(rel) = &event.relationship {
        if let Some(resource_id) = &rel.resource_id {
            fields.push(RenderedField::inline(field::RESOURCE_ID, resource_id.clone()));
        }
        if let Some(link) = &rel.self_link {
            fields.push(RenderedField::inline(field::LINK, link.clone()));
            url = Some(link.clone());
        }
    }

    if !event.id.is_empty() {
        fields.push(RenderedField::inline(field::EVENT_ID, event.id.clone()));
    }

    fields.push(raw_payload_field(document)?);

    let timestamp = event
        .timestamp()
        .unwrap_or_else(|| to_iso8601(clock.now()));

    Ok(ClassifiedEvent {
        event_type: event.event_type.clone(),
        title,
        description,
        color,
        url,
        fields,
        timestamp,
    })
}

/// 完整入站文档（格式化 JSON，截断到前 1000 个字符）
fn raw_payload_field(document: &Value) -> Result<RenderedField, PipelineError> {
    let pretty = serde_json::to_string_pretty(document)
        .map_err(|e| PipelineError::internal(format!("cannot serialize raw payload: {}", e)))?;
    let truncated = truncate_chars(&pretty, RAW_PAYLOAD_LIMIT);
    Ok(RenderedField::block(
        field::RAW_PAYLOAD,
        format!("```json\n{}\n```", truncated),
    ))
}

/// 按字符（而非字节）截断
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}
