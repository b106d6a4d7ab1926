//! Geometric operators: rotation, flips and resizing.
//!
//! These run in the pre-stage, before tonal adjustments and stylistic
//! filters.
//!
//! # Transform Order
//!
//! 1. Rotation (quarter turns)
//! 2. Flip
//! 3. Resize
//!
//! # Coordinate System
//!
//! - Rotation angles are in degrees, positive = clockwise
//! - Origin is the top-left corner

mod flip;
mod resize;
mod rotation;

pub use flip::{flip, FlipMode};
pub use resize::{fit_to_width, resize};
pub use rotation::{rotate, Rotation};
