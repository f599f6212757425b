//! Pipeline stages for brochure generation.
//!
//! Each submodule implements exactly one transformation step.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ extract ──▶ profile ──▶ render ×3
//! (file/bytes) (blocks)  (profile)   (brochure text)
//!                                 └─▶ background ×3 ──▶ encode
//!                                     (gradient)        (png/jpeg)
//! ```
//!
//! 1. [`input`]: resolve paths and declared formats; the only stage
//!    that touches the file system
//! 2. [`extract`]: HTML, text or image → ordered content blocks
//! 3. [`profile`]: blocks → business profile behind the `Profiler` trait
//! 4. [`render`]: profile + audience template → brochure text
//! 5. [`background`]: audience palette → gradient canvas; CPU-bound, run in
//!    `spawn_blocking`
//! 6. [`encode`]: canvas → PNG/JPEG bytes
//!
//! [`keywords`] and [`normalize`] are shared text helpers.

pub mod background;
pub mod encode;
pub mod extract;
pub mod input;
pub mod keywords;
pub mod normalize;
pub mod profile;
pub mod render;
