//! Field intent classification without a schema.
//!
//! - [`signal`] turns an element's identifying attributes into a normalized
//!   lowercase fingerprint.
//! - [`rules`] holds the ordered rule table; the first matching rule wins.
//! - [`classifier`] resolves a matched rule against a profile snapshot.

pub mod classifier;
pub mod rules;
pub mod signal;

pub use classifier::{Classification, ClassifierDefaults, FieldClassifier};
pub use rules::{first_match, rule_table, FieldRule};
pub use signal::{Signal, SignalScope};
