//! 管道错误类型
//!
//! - `DecodeError` - signedPayload 结构/编码/内容错误
//! - `PipelineError` - 一次入站文档处理的三种失败出口

use thiserror::Error;

/// Token 解码失败
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct DecodeError {
    pub reason: String,
}

impl DecodeError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn malformed_token() -> Self {
        Self::new("malformed token")
    }

    pub fn invalid_base64() -> Self {
        Self::new("invalid base64")
    }

    pub fn invalid_utf8() -> Self {
        Self::new("invalid utf-8")
    }

    pub fn invalid_json() -> Self {
        Self::new("invalid json")
    }

    pub fn missing_notification_type() -> Self {
        Self::new("missing notificationType")
    }
}

/// 管道处理失败
#[derive(Debug, Error)]
pub enum PipelineError {
    /// signedPayload 无法解码
    #[error("token decode failed: {0}")]
    Decode(#[from] DecodeError),

    /// 既不是 token 信封也不是 raw event 信封
    #[error("unrecognized payload format")]
    UnrecognizedFormat,

    /// 组装出站消息失败
    #[error("internal pipeline failure: {0}")]
    Internal(String),
}

impl PipelineError {
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_display() {
        assert_eq!(DecodeError::malformed_token().to_string(), "malformed token");
        assert_eq!(
            DecodeError::missing_notification_type().to_string(),
            "missing notificationType"
        );
    }

    #[test]
    fn test_pipeline_error_from_decode_error() {
        let err: PipelineError = DecodeError::invalid_base64().into();
        assert!(matches!(err, PipelineError::Decode(ref e) if e.reason == "invalid base64"));
        assert_eq!(err.to_string(), "token decode failed: invalid base64");
    }
}
