//! signedPayload 解码
//!
//! App Store 的标准通知以紧凑 JWS（`header.payload.signature`）形式送达。
//! 这里只做结构解码，**不**校验签名，也不校验 `x5c` 证书链。
//! 解码结果只能当作"声称的"内容，不能作为鉴权依据。

use base64::alphabet;
use base64::engine::{GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::DecodeError;

/// 标准字母表，允许末尾多余 bit（部分编码器不会清零）
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_allow_trailing_bits(true),
);

/// 解码后的通知
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedNotification {
    pub notification_type: String,
    pub subtype: Option<String>,
    #[serde(rename = "notificationUUID")]
    pub notification_uuid: String,
    pub version: String,
    /// epoch 毫秒；缺失时在渲染阶段报错
    pub signed_date: Option<i64>,
    pub summary: Option<String>,
    pub app: Option<AppInfo>,
    pub build: Option<BuildInfo>,
    pub environment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppInfo {
    #[serde(default)]
    pub bundle_id: String,
    #[serde(default)]
    pub adam_id: i64,
    #[serde(default)]
    pub app_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildInfo {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub uploaded_date: String,
}

/// JWS header（仅用于诊断日志）
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TokenHeader {
    #[serde(default)]
    pub alg: String,
    #[serde(default)]
    pub x5c: Vec<String>,
}

/// payload 的线上结构，app/build/environment 嵌套在 `data` 下
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WirePayload {
    notification_type: String,
    #[serde(default)]
    subtype: Option<String>,
    #[serde(default, rename = "notificationUUID")]
    notification_uuid: String,
    #[serde(default)]
    version: String,
    #[serde(default)]
    signed_date: Option<i64>,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    data: Option<WireData>,
}

#[derive(Debug, Default, Deserialize)]
struct WireData {
    #[serde(default)]
    app: Option<AppInfo>,
    #[serde(default)]
    build: Option<BuildInfo>,
    #[serde(default)]
    environment: Option<String>,
}

impl From<WirePayload> for DecodedNotification {
    fn from(wire: WirePayload) -> Self {
        let data = wire.data.unwrap_or_default();
        Self {
            notification_type: wire.notification_type,
            subtype: wire.subtype,
            notification_uuid: wire.notification_uuid,
            version: wire.version,
            signed_date: wire.signed_date,
            summary: wire.summary,
            app: data.app,
            build: data.build,
            environment: data.environment,
        }
    }
}

/// 解码 signedPayload 的 payload 段
pub fn decode_signed_payload(token: &str) -> Result<DecodedNotification, DecodeError> {
    let [_, payload, _] = split_segments(token)?;
    let text = decode_segment_text(payload)?;

    let value: Value = serde_json::from_str(&text).map_err(|_| DecodeError::invalid_json())?;

    let has_type = value
        .get("notificationType")
        .and_then(Value::as_str)
        .map_or(false, |t| !t.is_empty());
    if !has_type {
        return Err(DecodeError::missing_notification_type());
    }

    let wire: WirePayload =
        serde_json::from_value(value).map_err(|_| DecodeError::invalid_json())?;
    Ok(wire.into())
}

/// 解码 header 段
pub fn decode_header(token: &str) -> Result<TokenHeader, DecodeError> {
    let [header, _, _] = split_segments(token)?;
    let text = decode_segment_text(header)?;
    serde_json::from_str(&text).map_err(|_| DecodeError::invalid_json())
}

fn split_segments(token: &str) -> Result<[&str; 3], DecodeError> {
    let mut parts = token.split('.');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(header), Some(payload), Some(signature), None) => Ok([header, payload, signature]),
        _ => Err(DecodeError::malformed_token()),
    }
}

/// base64url → 标准 base64 → bytes → UTF-8
fn decode_segment_text(segment: &str) -> Result<String, DecodeError> {
    let mut standard: String = segment
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();
    while standard.len() % 4 != 0 {
        standard.push('=');
    }

    let bytes = PAYLOAD_ENGINE
        .decode(standard.as_bytes())
        .map_err(|_| DecodeError::invalid_base64())?;

    String::from_utf8(bytes).map_err(|_| DecodeError::invalid_utf8())
}
