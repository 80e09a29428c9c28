pub mod batch_ctx;
pub mod group_flow;

pub use batch_ctx::BatchCtx;
pub use group_flow::{GroupFlow, GroupOutcome};
