use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in PDF user space (`[x0, y0, x1, y1]`).
///
/// Serializes as a flat four-element array so findings stay flat records.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct Rect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl Rect {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Build a rectangle from two arbitrary corners.
    pub fn from_corners(ax: f64, ay: f64, bx: f64, by: f64) -> Self {
        Self {
            x0: ax.min(bx),
            y0: ay.min(by),
            x1: ax.max(bx),
            y1: ay.max(by),
        }
    }

    pub fn width(&self) -> f64 {
        (self.x1 - self.x0).max(0.0)
    }

    pub fn height(&self) -> f64 {
        (self.y1 - self.y0).max(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.x0 >= self.x1 || self.y0 >= self.y1
    }

    pub fn union(&self, other: &Self) -> Self {
        Self {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    /// True when the interiors overlap. Empty rectangles never intersect.
    pub fn intersects(&self, other: &Self) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.x0 < other.x1
            && other.x0 < self.x1
            && self.y0 < other.y1
            && other.y0 < self.y1
    }

    /// True when `other` lies entirely inside `self` (edges inclusive).
    pub fn contains(&self, other: &Self) -> bool {
        self.x0 <= other.x0 && self.y0 <= other.y0 && self.x1 >= other.x1 && self.y1 >= other.y1
    }

    /// Grow the rectangle by `amount` on every side.
    pub fn expand(&self, amount: f64) -> Self {
        Self {
            x0: self.x0 - amount,
            y0: self.y0 - amount,
            x1: self.x1 + amount,
            y1: self.y1 + amount,
        }
    }

    pub fn to_array(&self) -> [f64; 4] {
        [self.x0, self.y0, self.x1, self.y1]
    }
}

impl From<[f64; 4]> for Rect {
    fn from(a: [f64; 4]) -> Self {
        Rect::new(a[0], a[1], a[2], a[3])
    }
}

impl From<Rect> for [f64; 4] {
    fn from(r: Rect) -> Self {
        r.to_array()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn overlapping_rects_intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 15.0, 15.0);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
    }

    #[test]
    fn touching_edges_do_not_intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 20.0, 10.0);
        assert!(!a.intersects(&b));
    }

    #[test]
    fn contains_is_inclusive() {
        let page = Rect::new(0.0, 0.0, 612.0, 792.0);
        assert!(page.contains(&page));
        assert!(page.contains(&Rect::new(72.0, 72.0, 100.0, 100.0)));
        assert!(!Rect::new(72.0, 72.0, 100.0, 100.0).contains(&page));
    }

    #[test]
    fn expand_grows_every_side() {
        let r = Rect::new(72.0, 388.0, 160.0, 408.0).expand(3.0);
        assert_eq!(r, Rect::new(69.0, 385.0, 163.0, 411.0));
    }

    #[test]
    fn from_corners_normalizes() {
        let r = Rect::from_corners(100.0, 50.0, 10.0, 80.0);
        assert_eq!(r, Rect::new(10.0, 50.0, 100.0, 80.0));
    }

    #[test]
    fn serializes_as_flat_array() {
        let json = serde_json::to_string(&Rect::new(1.0, 2.0, 3.0, 4.0)).unwrap();
        assert_eq!(json, "[1.0,2.0,3.0,4.0]");
        let back: Rect = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Rect::new(1.0, 2.0, 3.0, 4.0));
    }

    fn coord() -> impl Strategy<Value = f64> {
        -2000.0f64..2000.0
    }

    proptest! {
        #[test]
        fn from_corners_is_always_ordered(ax in coord(), ay in coord(), bx in coord(), by in coord()) {
            let r = Rect::from_corners(ax, ay, bx, by);
            prop_assert!(r.x0 <= r.x1);
            prop_assert!(r.y0 <= r.y1);
            prop_assert_eq!(r, Rect::from_corners(bx, by, ax, ay));
        }

        #[test]
        fn union_contains_both(a in (coord(), coord(), coord(), coord()), b in (coord(), coord(), coord(), coord())) {
            let a = Rect::from_corners(a.0, a.1, a.2, a.3);
            let b = Rect::from_corners(b.0, b.1, b.2, b.3);
            let u = a.union(&b);
            prop_assert!(u.contains(&a));
            prop_assert!(u.contains(&b));
            prop_assert_eq!(a.intersects(&b), b.intersects(&a));
        }

        #[test]
        fn json_array_form_is_lossless(x0 in coord(), y0 in coord(), x1 in coord(), y1 in coord()) {
            let rect = Rect::new(x0, y0, x1, y1);
            let json = serde_json::to_string(&rect).unwrap();
            let back: Rect = serde_json::from_str(&json).unwrap();
            prop_assert_eq!(back, rect);
        }
    }
}
