pub mod combination_ctx;
pub mod combination_flow;

pub use combination_ctx::CombinationCtx;
pub use combination_flow::{CombinationFlow, CombinationResult};
