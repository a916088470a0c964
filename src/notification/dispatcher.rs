//! 入站文档分发 - 识别格式并路由到解码器或分类器

use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

use super::clock::{Clock, SystemClock};
use super::event::{classify, RawEvent};
use super::message::PresentationMessage;
use super::renderer::{render_classified, render_decoded};
use super::token::{decode_header, decode_signed_payload};
use crate::error::{DecodeError, PipelineError};

/// 入站文档格式
#[derive(Debug, Clone, PartialEq)]
pub enum InboundFormat<'a> {
    /// `{ "signedPayload": "..." }`
    SignedToken(&'a Value),
    /// `{ "data": { "type": "...", ... } }`
    RawEvent(RawEvent),
    Unrecognized,
}

impl<'a> InboundFormat<'a> {
    /// 识别文档格式（只看形状，不做解码）
    pub fn detect(document: &'a Value) -> Self {
        if let Some(token) = document.get("signedPayload").filter(|v| is_present(v)) {
            return InboundFormat::SignedToken(token);
        }

        match RawEvent::from_document(document) {
            Some(event) => InboundFormat::RawEvent(event),
            None => InboundFormat::Unrecognized,
        }
    }
}

/// `null`、`false`、`0` 和空字符串视为没有 token，文档继续按 raw event 识别。
/// 其他非字符串值仍当作 token，解码时报 malformed token。
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => false,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        _ => true,
    }
}

/// 入站文档分发器
pub struct Dispatcher {
    clock: Arc<dyn Clock>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self {
            clock: Arc::new(SystemClock),
        }
    }

    /// 使用指定时钟（测试时冻结时间）
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// 处理一个入站文档，生成展示消息
    pub fn dispatch(&self, document: &Value) -> Result<PresentationMessage, PipelineError> {
        match InboundFormat::detect(document) {
            InboundFormat::SignedToken(token) => {
                let token = token.as_str().ok_or_else(DecodeError::malformed_token)?;

                if let Ok(header) = decode_header(token) {
                    debug!(alg = %header.alg, certs = header.x5c.len(), "Signed payload header");
                }

                let decoded = decode_signed_payload(token)?;
                info!(
                    notification_type = %decoded.notification_type,
                    subtype = ?decoded.subtype,
                    "Processed signed notification"
                );
                render_decoded(&decoded)
            }
            InboundFormat::RawEvent(event) => {
                info!(event_type = %event.event_type, "Received raw event");
                let classified = classify(&event, document, self.clock.as_ref())?;
                Ok(render_classified(classified))
            }
            InboundFormat::Unrecognized => Err(PipelineError::UnrecognizedFormat),
        }
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}
