//! Filter module: compiled byte matchers and the built-in pattern catalogue.

pub mod engine;
pub mod regex;

pub use engine::{PatternError, SignatureMatcher};
pub use self::regex::{AttackSignatures, Patterns};
