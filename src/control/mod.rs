//! Climate control core: accumulated zone state, the decision policy, and
//! the idempotent actuation gateway.

pub mod outputs;
pub mod policy;
pub mod state;
