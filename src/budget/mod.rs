pub mod changes;
pub mod rollup;
pub mod workflow;
