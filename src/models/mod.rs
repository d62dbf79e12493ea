//! Models module for the PDF highlight core
//!
//! Plain data carried between the geometry normalizer, the highlight store,
//! selection capture and the overlay renderer. Everything here is serde-ready
//! so the same types cross the JS boundary and the persisted JSON layout.

pub mod annotator_state;
pub mod geometry;
pub mod highlight;
pub mod serde_helpers;

// Re-export commonly used types
pub use annotator_state::{AnnotatorState, SharedState};
pub use geometry::*;
pub use highlight::*;
