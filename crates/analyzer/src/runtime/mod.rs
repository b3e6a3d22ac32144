//! Runtime module: batch lifecycle: boot, pipeline, output.

pub mod boot;
pub mod pipeline;
