//! 订单状态生命周期
//!
//! 状态建模为客户可见的里程碑，不是严格的工作流：员工可以纠正或
//! 跳过状态。因此默认策略允许任意状态间转换（[`PermissivePolicy`]）。
//! 需要强制顺序时换上 [`SequentialPolicy`] — 调用方不变。
//!
//! # 通知触发规则
//!
//! 更新载荷中**出现** `status` 字段即触发客户通知，与值是否变化无关：
//! 重复提交同一状态会重新发送通知。这是沿用的既有行为，
//! 由 `resubmitting_same_status_dispatches_again` 测试钉住 —
//! 改动此规则前先改测试和本注释。

use crate::db::models::OrderUpdate;
use shared::OrderStatus;
use std::sync::Arc;
use thiserror::Error;

/// Transition rejection
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Status change from '{from}' to '{to}' is not allowed")]
    NotAllowed {
        from: OrderStatus,
        to: OrderStatus,
    },
}

/// Pluggable transition validation hook
pub trait TransitionPolicy: Send + Sync {
    fn check(&self, from: OrderStatus, to: OrderStatus) -> Result<(), TransitionError>;
}

/// 默认策略：任意转换都允许（现状行为）
#[derive(Debug, Clone, Copy, Default)]
pub struct PermissivePolicy;

impl TransitionPolicy for PermissivePolicy {
    fn check(&self, _from: OrderStatus, _to: OrderStatus) -> Result<(), TransitionError> {
        Ok(())
    }
}

/// 只允许停留或前进的策略（未默认启用）
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialPolicy;

impl TransitionPolicy for SequentialPolicy {
    fn check(&self, from: OrderStatus, to: OrderStatus) -> Result<(), TransitionError> {
        if to.milestone_index() >= from.milestone_index() {
            Ok(())
        } else {
            Err(TransitionError::NotAllowed { from, to })
        }
    }
}

/// Order lifecycle service
#[derive(Clone)]
pub struct OrderLifecycle {
    policy: Arc<dyn TransitionPolicy>,
}

impl OrderLifecycle {
    /// Lifecycle with the default permissive policy
    pub fn permissive() -> Self {
        Self::with_policy(Arc::new(PermissivePolicy))
    }

    pub fn with_policy(policy: Arc<dyn TransitionPolicy>) -> Self {
        Self { policy }
    }

    /// Validate a requested status change before it is written
    pub fn authorize(
        &self,
        current: OrderStatus,
        requested: OrderStatus,
    ) -> Result<(), TransitionError> {
        self.policy.check(current, requested)
    }

    /// Whether an update payload triggers customer notification.
    ///
    /// 规则：`status` 字段存在即触发 — 即使值与当前状态相同。
    pub fn should_notify(update: &OrderUpdate) -> bool {
        update.status.is_some()
    }
}

impl std::fmt::Debug for OrderLifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderLifecycle").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permissive_allows_any_transition() {
        let lifecycle = OrderLifecycle::permissive();

        for from in OrderStatus::ALL {
            for to in OrderStatus::ALL {
                assert!(lifecycle.authorize(from, to).is_ok());
            }
        }
    }

    #[test]
    fn sequential_rejects_backward_moves() {
        let lifecycle = OrderLifecycle::with_policy(Arc::new(SequentialPolicy));

        // Forward and same-status are fine
        assert!(lifecycle
            .authorize(OrderStatus::New, OrderStatus::Processing)
            .is_ok());
        assert!(lifecycle
            .authorize(OrderStatus::Ready, OrderStatus::Ready)
            .is_ok());
        assert!(lifecycle
            .authorize(OrderStatus::Pending, OrderStatus::AwaitingDeliveryCall)
            .is_ok());

        // Backward is rejected
        let err = lifecycle
            .authorize(OrderStatus::Ready, OrderStatus::New)
            .unwrap_err();
        assert_eq!(
            err,
            TransitionError::NotAllowed {
                from: OrderStatus::Ready,
                to: OrderStatus::New,
            }
        );
    }

    #[test]
    fn notify_fires_iff_status_present() {
        let without_status = OrderUpdate {
            note_from_entrepreneur: Some("Notitie".into()),
            ..Default::default()
        };
        assert!(!OrderLifecycle::should_notify(&without_status));

        // Status present — even when it equals the stored value, the
        // dispatcher fires. The stored value is not consulted at all.
        let with_status = OrderUpdate {
            status: Some(OrderStatus::Pending),
            ..Default::default()
        };
        assert!(OrderLifecycle::should_notify(&with_status));
    }
}
