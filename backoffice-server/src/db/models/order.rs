//! Order Model

use super::serde_helpers;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::OrderStatus;
use surrealdb::RecordId;
use validator::Validate;

/// Order ID type
pub type OrderId = RecordId;

/// Order entity matching the SurrealDB `order` table
///
/// 订单永不删除（审计要求），状态只通过更新操作变化。
/// `bonnummer` 是面向客户的单号 — 全局唯一，分配后不可变。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<OrderId>,
    pub bonnummer: String,

    // Customer fields (free text)
    pub customer_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub postcode: String,
    #[serde(default)]
    pub city: String,

    /// Order total in EUR
    pub amount: Decimal,

    #[serde(default)]
    pub status: OrderStatus,

    // Product fields (free text)
    #[serde(default)]
    pub product_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub product_details: String,

    // Notes (staff-mutable)
    #[serde(default)]
    pub client_note: String,
    #[serde(default)]
    pub note_from_entrepreneur: String,

    // Notification preferences
    // 联系字段只在对应开关打开时使用；空联系字段抑制该渠道
    #[serde(default)]
    pub notify_by_email: bool,
    #[serde(default)]
    pub notify_by_whatsapp: bool,
    #[serde(default)]
    pub notification_email: String,
    #[serde(default)]
    pub notification_phone: String,

    /// Unix 毫秒时间戳
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create order payload
///
/// `bonnummer` omitted → generated server-side.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderCreate {
    #[validate(length(min = 1, max = 200))]
    pub customer_name: String,
    #[validate(email)]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub street: Option<String>,
    pub postcode: Option<String>,
    pub city: Option<String>,
    pub amount: Decimal,
    pub status: Option<OrderStatus>,
    pub product_type: Option<String>,
    pub description: Option<String>,
    pub product_details: Option<String>,
    pub client_note: Option<String>,
    #[validate(length(min = 3, max = 40))]
    pub bonnummer: Option<String>,
    #[serde(default)]
    pub notify_by_email: bool,
    #[serde(default)]
    pub notify_by_whatsapp: bool,
    #[validate(email)]
    pub notification_email: Option<String>,
    pub notification_phone: Option<String>,
}

/// Staff update payload (all optional)
///
/// `bonnummer` 不在此结构中 — 分配后不可变。
/// `status` 出现在载荷中（即使值不变）就会触发客户通知，
/// 见订单生命周期模块。
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct OrderUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[validate(email)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postcode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note_from_entrepreneur: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notify_by_email: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notify_by_whatsapp: Option<bool>,
    #[validate(email)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification_phone: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_with_unknown_status_is_rejected() {
        let result = serde_json::from_str::<OrderUpdate>(r#"{"status": "Niet bestaand"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn update_serializes_only_present_fields() {
        let update = OrderUpdate {
            note_from_entrepreneur: Some("Levering volgende week".into()),
            ..Default::default()
        };
        let value = serde_json::to_value(&update).unwrap();
        let map = value.as_object().unwrap();
        assert_eq!(map.len(), 1);
        assert!(map.contains_key("note_from_entrepreneur"));
    }

    #[test]
    fn create_validates_email_shape() {
        use validator::Validate;
        let mut create: OrderCreate = serde_json::from_value(serde_json::json!({
            "customer_name": "J. de Vries",
            "amount": 249.95,
            "notification_email": "geen-email"
        }))
        .unwrap();
        assert!(create.validate().is_err());

        create.notification_email = Some("klant@example.nl".into());
        assert!(create.validate().is_ok());
    }
}
