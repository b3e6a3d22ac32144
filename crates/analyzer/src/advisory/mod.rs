//! Advisory collaborator boundary: bounded sample out, tolerant decoding in.

pub mod client;
pub mod fake;
pub mod model;

pub use client::{consult, Advisor, FileAdvisor};
pub use model::{Advisory, AdvisoryError, AdvisoryRequest};
