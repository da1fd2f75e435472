//! Database models

pub mod admin;
pub mod notification_log;
pub mod order;
pub mod serde_helpers;

pub use admin::{AdminAccount, AdminCreate, AdminId};
pub use notification_log::{NotificationLogEntry, NotificationLogId};
pub use order::{Order, OrderCreate, OrderId, OrderUpdate};
