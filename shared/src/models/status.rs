//! 订单状态
//!
//! Order status as shown to the customer. The serialized labels are the
//! exact domain strings (Dutch, customer-visible milestones) — they appear
//! on the storefront order page and in notification messages, so they are
//! part of the wire contract and must not be renamed.

use serde::{Deserialize, Serialize};

/// Customer-visible order milestone.
///
/// 状态按里程碑顺序排列，但顺序不在类型层强制 —
/// 见 `TransitionPolicy`（后台允许跳过或回退状态）。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum OrderStatus {
    /// 初始状态（刚下单，还未被员工处理）
    #[default]
    #[serde(rename = "pending")]
    Pending,
    /// 新订单已登记
    #[serde(rename = "Nieuw")]
    New,
    /// 订单处理中
    #[serde(rename = "Bestelling in verwerking")]
    Processing,
    /// 订单已处理
    #[serde(rename = "Bestelling verwerkt")]
    Processed,
    /// 订单生产中
    #[serde(rename = "Bestelling in productie")]
    InProduction,
    /// 订单已就绪
    #[serde(rename = "Bestelling is gereed")]
    Ready,
    /// 等待配送电话（终态，无后续自动转换）
    #[serde(rename = "U wordt gebeld voor levering")]
    AwaitingDeliveryCall,
}

impl OrderStatus {
    /// All statuses in milestone order.
    pub const ALL: [OrderStatus; 7] = [
        OrderStatus::Pending,
        OrderStatus::New,
        OrderStatus::Processing,
        OrderStatus::Processed,
        OrderStatus::InProduction,
        OrderStatus::Ready,
        OrderStatus::AwaitingDeliveryCall,
    ];

    /// The customer-visible label (identical to the serialized form).
    pub fn label(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::New => "Nieuw",
            OrderStatus::Processing => "Bestelling in verwerking",
            OrderStatus::Processed => "Bestelling verwerkt",
            OrderStatus::InProduction => "Bestelling in productie",
            OrderStatus::Ready => "Bestelling is gereed",
            OrderStatus::AwaitingDeliveryCall => "U wordt gebeld voor levering",
        }
    }

    /// Position in the milestone sequence (0-based).
    ///
    /// Used by the forward-only transition policy; the permissive policy
    /// ignores it.
    pub fn milestone_index(&self) -> usize {
        Self::ALL.iter().position(|s| s == self).unwrap_or(0)
    }

    /// 最后一个里程碑（没有定义后续自动转换）
    pub fn is_final_milestone(&self) -> bool {
        matches!(self, OrderStatus::AwaitingDeliveryCall)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_to_domain_labels() {
        let json = serde_json::to_string(&OrderStatus::Processing).unwrap();
        assert_eq!(json, "\"Bestelling in verwerking\"");

        let back: OrderStatus = serde_json::from_str("\"Bestelling is gereed\"").unwrap();
        assert_eq!(back, OrderStatus::Ready);
    }

    #[test]
    fn unknown_label_is_rejected() {
        let result = serde_json::from_str::<OrderStatus>("\"Verzonnen status\"");
        assert!(result.is_err());
    }

    #[test]
    fn milestone_order_is_stable() {
        assert_eq!(OrderStatus::Pending.milestone_index(), 0);
        assert_eq!(OrderStatus::AwaitingDeliveryCall.milestone_index(), 6);
        assert!(
            OrderStatus::Processing.milestone_index() < OrderStatus::Processed.milestone_index()
        );
    }
}
