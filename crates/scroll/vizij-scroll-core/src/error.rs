//! Error types for section configuration and engine setup.
//!
//! Only configuration problems are errors. Runtime conditions such as missing
//! geometry or an empty page are handled as no-ops by the engine.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ScrollError {
    #[error("section '{section}': transition {index} offset {offset} is outside [0, 1]")]
    InvalidOffset {
        section: String,
        index: usize,
        offset: f32,
    },

    #[error("section '{section}': transition {index} span {span} must be finite and > 0")]
    InvalidSpan {
        section: String,
        index: usize,
        span: f32,
    },

    #[error("section '{section}': transition {index} stagger {stagger} must be finite and >= 0")]
    InvalidStagger {
        section: String,
        index: usize,
        stagger: f32,
    },

    #[error("section '{section}': transition {index} has no targets")]
    EmptyTargets { section: String, index: usize },

    #[error("section '{section}': transition {index} has an empty `to` set")]
    EmptyTransition { section: String, index: usize },

    #[error("section '{section}': property '{property}' has non-finite value")]
    NonFiniteProperty { section: String, property: String },

    #[error("section '{section}': scroll distance {distance} must be finite and > 0")]
    InvalidScrollDistance { section: String, distance: f32 },

    #[error("section '{section}': {reason}")]
    InvalidTrigger { section: String, reason: String },

    #[error("config error: {0}")]
    InvalidConfig(String),

    #[error("parse error: {0}")]
    Parse(String),
}
