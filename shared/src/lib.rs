//! Shared types for the back-office order service
//!
//! Common types used across crates: order status enums, notification
//! channel types, API DTOs and small utilities.

pub mod client;
pub mod models;
pub mod util;

// Re-exports
pub use models::notification::{NotificationChannel, NotificationStatus};
pub use models::status::OrderStatus;
pub use serde::{Deserialize, Serialize};
