//! Pixel / normalized coordinate conversion.
//!
//! Every function here is a pure mapping of (pixel value, image dimension).
//! Pixel boxes are integer-valued and clamped into the image; normalized
//! values divide by the image extent and therefore land in [0, 1] whenever
//! the input was clamped.

use serde::{Deserialize, Serialize};

/// Integer bounding box in pixel coordinates. Width and height are never
/// below one pixel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelBox {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

/// Bounding box with every component divided by the image extent.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NormBox {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

/// Clamp a pixel coordinate into `[0, extent - 1]`.
pub fn clamp_coord(value: f32, extent: u32) -> f32 {
    value.max(0.0).min((extent - 1) as f32)
}

/// Axis-aligned bounding box over a set of pixel points.
///
/// Coordinates are clamped to `[0, width-1]` / `[0, height-1]` and rounded;
/// width and height are forced to at least one pixel. An empty point set
/// yields the full image extent so call sites that must not fail still get
/// a usable box.
pub fn bbox_from_points(points: &[(f32, f32)], width: u32, height: u32) -> PixelBox {
    if points.is_empty() {
        return PixelBox {
            x: 0,
            y: 0,
            w: width,
            h: height,
        };
    }

    let mut min_x = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    let mut min_y = f32::INFINITY;
    let mut max_y = f32::NEG_INFINITY;
    for &(x, y) in points {
        min_x = min_x.min(x);
        max_x = max_x.max(x);
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }

    let min_x = clamp_coord(min_x, width);
    let max_x = clamp_coord(max_x, width);
    let min_y = clamp_coord(min_y, height);
    let max_y = clamp_coord(max_y, height);

    PixelBox {
        x: min_x.round() as u32,
        y: min_y.round() as u32,
        w: ((max_x - min_x).round() as u32).max(1),
        h: ((max_y - min_y).round() as u32).max(1),
    }
}

/// Normalize a pixel point by the image extent.
pub fn normalize_point(x: f32, y: f32, width: u32, height: u32) -> (f64, f64) {
    (x as f64 / width as f64, y as f64 / height as f64)
}

/// Inverse of [`normalize_point`].
pub fn denormalize_point(nx: f64, ny: f64, width: u32, height: u32) -> (f64, f64) {
    (nx * width as f64, ny * height as f64)
}

/// Normalize a pixel box by the image extent.
pub fn normalize_box(bbox: PixelBox, width: u32, height: u32) -> NormBox {
    NormBox {
        x: bbox.x as f64 / width as f64,
        y: bbox.y as f64 / height as f64,
        w: bbox.w as f64 / width as f64,
        h: bbox.h as f64 / height as f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bbox_spans_points_and_rounds() {
        let points = [(100.0, 50.0), (700.0, 550.0), (400.0, 300.0)];
        let bbox = bbox_from_points(&points, 800, 600);
        assert_eq!(
            bbox,
            PixelBox {
                x: 100,
                y: 50,
                w: 600,
                h: 500
            }
        );
    }

    #[test]
    fn bbox_clamps_out_of_range_points() {
        let points = [(-20.0, -5.0), (1000.0, 700.0)];
        let bbox = bbox_from_points(&points, 800, 600);
        assert_eq!(bbox.x, 0);
        assert_eq!(bbox.y, 0);
        assert_eq!(bbox.w, 799);
        assert_eq!(bbox.h, 599);
    }

    #[test]
    fn bbox_of_empty_set_covers_full_image() {
        let bbox = bbox_from_points(&[], 640, 480);
        assert_eq!(
            bbox,
            PixelBox {
                x: 0,
                y: 0,
                w: 640,
                h: 480
            }
        );
    }

    #[test]
    fn bbox_of_single_point_has_unit_extent() {
        let bbox = bbox_from_points(&[(320.0, 240.0)], 640, 480);
        assert_eq!(bbox.w, 1);
        assert_eq!(bbox.h, 1);
    }

    #[test]
    fn normalized_values_stay_in_unit_range() {
        let bbox = bbox_from_points(&[(100.0, 50.0), (700.0, 550.0)], 800, 600);
        let norm = normalize_box(bbox, 800, 600);
        assert!((norm.x - 0.125).abs() < 1e-9);
        assert!((norm.y - 0.0833).abs() < 1e-3);
        assert!((norm.w - 0.75).abs() < 1e-9);
        assert!((norm.h - 0.8333).abs() < 1e-3);
    }

    #[test]
    fn normalize_round_trips() {
        let (w, h) = (1280, 720);
        for &(x, y) in &[(0.0f32, 0.0f32), (639.5, 360.25), (1279.0, 719.0)] {
            let (nx, ny) = normalize_point(x, y, w, h);
            let (bx, by) = denormalize_point(nx, ny, w, h);
            assert!((bx - x as f64).abs() < 1e-9);
            assert!((by - y as f64).abs() < 1e-9);
        }
    }
}
