//! PDF output: page canvases, image streams, text metrics and the
//! append-only document builder.

mod builder;
mod canvas;
pub mod text;
mod xobject;

pub use builder::DocumentBuilder;
pub use canvas::{ColorMode, PageCanvas, Rect, RgbColor};
pub use text::{FittedText, fit_text, text_width_pt};
pub use xobject::image_stream;
