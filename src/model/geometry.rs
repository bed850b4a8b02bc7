//! Geometric primitives shared by the assembly and outline stages.

use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box in page coordinates.
///
/// The origin is the top-left corner of the page; `y` grows downward,
/// matching the coordinate space of layout-detection output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    /// Left edge
    pub x0: f32,
    /// Top edge
    pub y0: f32,
    /// Right edge
    pub x1: f32,
    /// Bottom edge
    pub y1: f32,
}

impl BBox {
    /// Create a bounding box from its four edges.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Build a bounding box from an eight-value polygon (x,y pairs,
    /// clockwise from top-left), as emitted by layout detectors.
    pub fn from_poly(poly: &[f32]) -> Option<Self> {
        if poly.len() < 8 {
            return None;
        }
        let xs = [poly[0], poly[2], poly[4], poly[6]];
        let ys = [poly[1], poly[3], poly[5], poly[7]];
        let min = |v: &[f32; 4]| v.iter().copied().fold(f32::INFINITY, f32::min);
        let max = |v: &[f32; 4]| v.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        Some(Self::new(min(&xs), min(&ys), max(&xs), max(&ys)))
    }

    /// Box width. Negative extents clamp to zero.
    pub fn width(&self) -> f32 {
        (self.x1 - self.x0).max(0.0)
    }

    /// Box height. Negative extents clamp to zero.
    pub fn height(&self) -> f32 {
        (self.y1 - self.y0).max(0.0)
    }

    /// Box area.
    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    /// True when the box has no area.
    pub fn is_empty(&self) -> bool {
        self.x1 <= self.x0 || self.y1 <= self.y0
    }

    /// Area of the intersection with `other`, zero when disjoint.
    pub fn intersection_area(&self, other: &BBox) -> f32 {
        let w = self.x1.min(other.x1) - self.x0.max(other.x0);
        let h = self.y1.min(other.y1) - self.y0.max(other.y0);
        if w <= 0.0 || h <= 0.0 {
            0.0
        } else {
            w * h
        }
    }

    /// Fraction of this box's own area covered by `other`.
    ///
    /// Returns 0.0 for a zero-area box, so degenerate spans are never
    /// claimed by any region.
    pub fn coverage_by(&self, other: &BBox) -> f32 {
        let area = self.area();
        if area <= 0.0 {
            return 0.0;
        }
        self.intersection_area(other) / area
    }

    /// Vertical overlap with `other` as a fraction of the shorter height.
    ///
    /// Returns 0.0 when either height is zero or the projections are
    /// disjoint.
    pub fn vertical_overlap_ratio(&self, other: &BBox) -> f32 {
        let overlap = self.y1.min(other.y1) - self.y0.max(other.y0);
        if overlap <= 0.0 {
            return 0.0;
        }
        let min_height = self.height().min(other.height());
        if min_height <= 0.0 {
            return 0.0;
        }
        overlap / min_height
    }

    /// Smallest box containing both `self` and `other`.
    pub fn hull(&self, other: &BBox) -> BBox {
        BBox::new(
            self.x0.min(other.x0),
            self.y0.min(other.y0),
            self.x1.max(other.x1),
            self.y1.max(other.y1),
        )
    }

    /// True when the point lies inside the box (edges inclusive).
    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        x >= self.x0 && x <= self.x1 && y >= self.y0 && y <= self.y1
    }

    /// Squared distance between the centers of two boxes.
    ///
    /// Used to attach captions to their nearest figure or table; squared
    /// form avoids the sqrt since only ordering matters.
    pub fn center_distance_sq(&self, other: &BBox) -> f32 {
        let (cx0, cy0) = self.center();
        let (cx1, cy1) = other.center();
        let dx = cx1 - cx0;
        let dy = cy1 - cy0;
        dx * dx + dy * dy
    }

    /// Center point as (x, y).
    pub fn center(&self) -> (f32, f32) {
        (
            (self.x0 + self.x1) / 2.0,
            (self.y0 + self.y1) / 2.0,
        )
    }
}

impl Default for BBox {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }
}

/// A 2D anchor point used for outline ordering and excerpt scans.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate
    pub x: f32,
    /// Vertical coordinate
    pub y: f32,
}

impl Point {
    /// Create a point.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_poly() {
        let poly = [10.0, 20.0, 110.0, 20.0, 110.0, 40.0, 10.0, 40.0];
        let bbox = BBox::from_poly(&poly).unwrap();
        assert_eq!(bbox, BBox::new(10.0, 20.0, 110.0, 40.0));
    }

    #[test]
    fn test_from_poly_short() {
        assert!(BBox::from_poly(&[1.0, 2.0, 3.0]).is_none());
    }

    #[test]
    fn test_coverage_by() {
        let span = BBox::new(0.0, 0.0, 10.0, 10.0);
        let region = BBox::new(0.0, 0.0, 8.0, 10.0);
        let ratio = span.coverage_by(&region);
        assert!((ratio - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_coverage_by_zero_area() {
        let span = BBox::new(5.0, 5.0, 5.0, 10.0);
        let region = BBox::new(0.0, 0.0, 100.0, 100.0);
        assert_eq!(span.coverage_by(&region), 0.0);
    }

    #[test]
    fn test_vertical_overlap_ratio() {
        // Heights 10 and 10, overlap 8.5 of the shorter.
        let a = BBox::new(0.0, 0.0, 50.0, 10.0);
        let b = BBox::new(60.0, 1.5, 100.0, 11.5);
        let ratio = a.vertical_overlap_ratio(&b);
        assert!((ratio - 0.85).abs() < 1e-6);
    }

    #[test]
    fn test_vertical_overlap_disjoint() {
        let a = BBox::new(0.0, 0.0, 50.0, 10.0);
        let b = BBox::new(0.0, 20.0, 50.0, 30.0);
        assert_eq!(a.vertical_overlap_ratio(&b), 0.0);
    }

    #[test]
    fn test_hull() {
        let a = BBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BBox::new(5.0, 5.0, 20.0, 8.0);
        assert_eq!(a.hull(&b), BBox::new(0.0, 0.0, 20.0, 10.0));
    }

    #[test]
    fn test_contains_point() {
        let b = BBox::new(0.0, 0.0, 10.0, 10.0);
        assert!(b.contains_point(10.0, 0.0));
        assert!(!b.contains_point(10.1, 0.0));
    }
}
