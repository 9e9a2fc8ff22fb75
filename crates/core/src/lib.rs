//! Domain logic for the practice video review service.
//!
//! Everything in this crate is pure: request validation, the prompt sent to
//! the inference services, and the tolerant parser that turns model output
//! into an [`analysis::AnalysisResult`]. No I/O happens here.

pub mod analysis;
pub mod error;
pub mod parser;
pub mod prompt;
pub mod types;
pub mod video;
