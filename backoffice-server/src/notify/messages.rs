//! 通知文案
//!
//! 状态 → 客户可读文案的固定映射，以及渠道模板。
//! 文案是荷兰语域字符串，和状态标签一样属于对外契约。

use crate::db::models::Order;
use shared::OrderStatus;

/// Customer-facing message for a status.
///
/// 没有专属文案的状态回落到原始标签（沿用原查表未命中行为）。
pub fn status_message(status: OrderStatus) -> &'static str {
    match status {
        OrderStatus::New => "Uw bestelling is bij ons geregistreerd.",
        OrderStatus::Processing => "Uw bestelling is in verwerking genomen.",
        OrderStatus::Processed => "Uw bestelling is verwerkt.",
        OrderStatus::InProduction => "Uw bestelling is in productie genomen.",
        OrderStatus::Ready => "Uw bestelling is gereed.",
        OrderStatus::AwaitingDeliveryCall => {
            "U wordt binnenkort gebeld om de levering in te plannen."
        }
        // pending has no crafted message — raw label passes through
        other => other.label(),
    }
}

/// Email subject line
pub fn email_subject(bonnummer: &str) -> String {
    format!("Update van uw bestelling {bonnummer}")
}

/// Email body (plain text)
pub fn email_body(order: &Order, message: &str) -> String {
    format!(
        "Beste {name},\n\n\
         {message}\n\n\
         Bestelnummer: {bonnummer}\n\
         Status: {status}\n\n\
         Met vriendelijke groet,\n\
         Uw raamdecoratie-specialist",
        name = order.customer_name,
        message = message,
        bonnummer = order.bonnummer,
        status = order.status,
    )
}

/// WhatsApp text (single block)
pub fn whatsapp_text(order: &Order, message: &str) -> String {
    format!(
        "Beste {name}, {message} (bestelling {bonnummer})",
        name = order.customer_name,
        message = message,
        bonnummer = order.bonnummer,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn order_fixture(status: OrderStatus) -> Order {
        Order {
            id: None,
            bonnummer: "B260807-0042".into(),
            customer_name: "J. de Vries".into(),
            email: String::new(),
            phone: String::new(),
            street: String::new(),
            postcode: String::new(),
            city: String::new(),
            amount: Decimal::new(24995, 2),
            status,
            product_type: "Rolgordijn".into(),
            description: String::new(),
            product_details: String::new(),
            client_note: String::new(),
            note_from_entrepreneur: String::new(),
            notify_by_email: true,
            notify_by_whatsapp: false,
            notification_email: "klant@example.nl".into(),
            notification_phone: String::new(),
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn every_status_has_a_message() {
        for status in OrderStatus::ALL {
            assert!(!status_message(status).is_empty());
        }
    }

    #[test]
    fn pending_falls_back_to_raw_label() {
        assert_eq!(status_message(OrderStatus::Pending), "pending");
    }

    #[test]
    fn email_template_mentions_order_and_customer() {
        let order = order_fixture(OrderStatus::Ready);
        let body = email_body(&order, status_message(order.status));

        assert!(body.contains("J. de Vries"));
        assert!(body.contains("B260807-0042"));
        assert!(body.contains("Uw bestelling is gereed."));
        assert!(body.contains("Bestelling is gereed"));

        let subject = email_subject(&order.bonnummer);
        assert!(subject.contains("B260807-0042"));
    }

    #[test]
    fn whatsapp_text_is_single_block() {
        let order = order_fixture(OrderStatus::InProduction);
        let text = whatsapp_text(&order, status_message(order.status));
        assert!(!text.contains('\n'));
        assert!(text.contains("B260807-0042"));
    }
}
