//! Embed 颜色
//!
//! Discord embed 的 `color` 字段只接受整数。两条渲染路径共用同一套色板。

use serde::{Serialize, Serializer};

/// 消息严重程度对应的颜色
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbedColor {
    /// 红色 - 处理失败、审核被拒
    Failure,
    /// 绿色 - 处理完成、已上架
    Success,
    /// 黄色 - 等待审核
    Warning,
    /// 橙色 - 审核中
    Info,
    /// 蓝色 - 其他状态（默认）
    Neutral,
}

impl EmbedColor {
    pub fn value(&self) -> u32 {
        match self {
            EmbedColor::Failure => 15548997,
            EmbedColor::Success => 5763719,
            EmbedColor::Warning => 16776960,
            EmbedColor::Info => 15105570,
            EmbedColor::Neutral => 3447003,
        }
    }

    /// 根据 notificationType 的关键字选择颜色
    ///
    /// FAIL 优先于 SUCCESS/READY/PROCESSED
    pub fn for_notification_type(notification_type: &str) -> Self {
        if notification_type.contains("FAIL") {
            EmbedColor::Failure
        } else if ["SUCCESS", "READY", "PROCESSED"]
            .iter()
            .any(|k| notification_type.contains(k))
        {
            EmbedColor::Success
        } else {
            EmbedColor::Neutral
        }
    }
}

impl Default for EmbedColor {
    fn default() -> Self {
        EmbedColor::Neutral
    }
}

impl Serialize for EmbedColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_values_are_distinct() {
        let all = [
            EmbedColor::Failure,
            EmbedColor::Success,
            EmbedColor::Warning,
            EmbedColor::Info,
            EmbedColor::Neutral,
        ];
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_ne!(a.value(), b.value(), "{:?} and {:?} share a value", a, b);
            }
        }
    }

    #[test]
    fn test_for_notification_type() {
        assert_eq!(
            EmbedColor::for_notification_type("BUILD_PROCESSING_FAILED"),
            EmbedColor::Failure
        );
        assert_eq!(
            EmbedColor::for_notification_type("BUILD_PROCESSED"),
            EmbedColor::Success
        );
        assert_eq!(
            EmbedColor::for_notification_type("READY_FOR_SALE"),
            EmbedColor::Success
        );
        assert_eq!(
            EmbedColor::for_notification_type("TEST_SUCCESS"),
            EmbedColor::Success
        );
        assert_eq!(EmbedColor::for_notification_type("TEST"), EmbedColor::Neutral);
    }

    #[test]
    fn test_fail_takes_precedence_over_success_keywords() {
        assert_eq!(
            EmbedColor::for_notification_type("READY_BUT_FAILED"),
            EmbedColor::Failure
        );
    }

    #[test]
    fn test_serializes_as_integer() {
        let json = serde_json::to_value(EmbedColor::Warning).unwrap();
        assert_eq!(json, serde_json::json!(16776960));
    }
}
