//! Horizontal mirror and vertical flip.
//!
//! Destructive one-shot edits applied to the working image; the session
//! snapshots before calling in.

use crate::raster::RasterBuffer;

/// Direction of a flip operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum FlipDirection {
    /// Mirror left-right.
    Horizontal,
    /// Flip top-bottom.
    Vertical,
}

/// Mirror or flip a raster.
pub fn flip(src: &RasterBuffer, direction: FlipDirection) -> RasterBuffer {
    if src.is_empty() {
        return src.clone();
    }

    let mut out = RasterBuffer::transparent(src.width, src.height);
    for y in 0..src.height {
        for x in 0..src.width {
            let (sx, sy) = match direction {
                FlipDirection::Horizontal => (src.width - 1 - x, y),
                FlipDirection::Vertical => (x, src.height - 1 - y),
            };
            out.put(x, y, src.get(sx, sy));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marked() -> RasterBuffer {
        let mut img = RasterBuffer::solid(10, 6, [0, 0, 0, 255]);
        img.put(0, 0, [255, 0, 0, 255]); // top-left red
        img.put(9, 5, [0, 0, 255, 255]); // bottom-right blue
        img
    }

    #[test]
    fn test_horizontal_mirror() {
        let out = flip(&marked(), FlipDirection::Horizontal);
        assert_eq!(out.get(9, 0), [255, 0, 0, 255]);
        assert_eq!(out.get(0, 5), [0, 0, 255, 255]);
    }

    #[test]
    fn test_vertical_flip() {
        let out = flip(&marked(), FlipDirection::Vertical);
        assert_eq!(out.get(0, 5), [255, 0, 0, 255]);
        assert_eq!(out.get(9, 0), [0, 0, 255, 255]);
    }

    #[test]
    fn test_double_flip_is_identity() {
        let img = marked();
        let twice = flip(&flip(&img, FlipDirection::Horizontal), FlipDirection::Horizontal);
        assert_eq!(twice, img);
        let twice = flip(&flip(&img, FlipDirection::Vertical), FlipDirection::Vertical);
        assert_eq!(twice, img);
    }

    #[test]
    fn test_dimensions_preserved() {
        let out = flip(&marked(), FlipDirection::Horizontal);
        assert_eq!((out.width, out.height), (10, 6));
    }
}
