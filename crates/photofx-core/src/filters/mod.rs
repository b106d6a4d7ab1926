//! Stylistic filters that can be chained in any order.
//!
//! Every filter takes its input buffer by value and returns a new buffer.
//! Parameters and channel layout are validated before any pixel is touched,
//! so a failing filter never produces a partial result.
//!
//! | Filter        | Input layouts    | Output layout      |
//! |---------------|------------------|--------------------|
//! | grayscale     | Rgb, Bgr         | Gray               |
//! | gaussian blur | any              | same as input      |
//! | sepia         | Rgb, Bgr         | Rgb                |
//! | sharpen       | any              | same as input      |
//! | cartoon       | Rgb, Bgr         | same as input      |

mod blur;
mod cartoon;
mod grayscale;
mod sepia;
mod sharpen;

pub use blur::{gaussian_blur, DEFAULT_BLUR_INTENSITY};
pub use cartoon::{cartoon, CARTOON_BILATERAL_DIAMETER, CARTOON_BLOCK_SIZE, CARTOON_THRESHOLD_C};
pub use grayscale::grayscale;
pub use sepia::{sepia, SEPIA_MATRIX};
pub use sharpen::{sharpen, SHARPEN_KERNEL};
