pub mod grid;
pub mod io;
pub mod traits;

pub use self::grid::{PixelGrid, FOREGROUND, MATCH_MARKER};
pub use self::io::{RasterU8, RgbRaster};
pub use self::traits::{ImageView, ImageViewMut, Rows};
