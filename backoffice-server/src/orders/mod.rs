//! 订单生命周期

pub mod lifecycle;

pub use lifecycle::{
    OrderLifecycle, PermissivePolicy, SequentialPolicy, TransitionError, TransitionPolicy,
};
