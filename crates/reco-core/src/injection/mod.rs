//! Resolución de params efectivos: base del step + overrides del run.

pub mod merge;

pub use merge::merge_json;
