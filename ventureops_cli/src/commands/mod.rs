//! CLI subcommand implementations.

pub mod assessment;
pub mod companies;
pub mod coverage;
pub mod funnel;
pub mod pipeline;
pub mod sync;
