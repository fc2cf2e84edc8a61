use super::Vec2;

/// Axis-aligned rectangle stored as min/max corners (top-left origin).
///
/// Clip rectangles are compared and clamped corner-wise, so corners are the
/// native representation here rather than origin + size.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    #[inline]
    pub const fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    #[inline]
    pub const fn from_coords(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { min: Vec2::new(x0, y0), max: Vec2::new(x1, y1) }
    }

    #[inline]
    pub const fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self {
            min: pos,
            max: Vec2::new(pos.x + size.x, pos.y + size.y),
        }
    }

    /// Inverted "nothing yet" rect for building bounding unions with
    /// [`add`](Self::add).
    #[inline]
    pub const fn nothing() -> Self {
        Self {
            min: Vec2::new(f32::MAX, f32::MAX),
            max: Vec2::new(-f32::MAX, -f32::MAX),
        }
    }

    #[inline]
    pub fn width(self) -> f32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(self) -> f32 {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn size(self) -> Vec2 {
        self.max - self.min
    }

    /// A zero-area rect is a legal value; it clips everything out and is
    /// filtered downstream rather than erroring.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.max.x <= self.min.x || self.max.y <= self.min.y
    }

    /// Half-open containment: [min, max).
    #[inline]
    pub fn contains(self, p: Vec2) -> bool {
        p.x >= self.min.x && p.y >= self.min.y && p.x < self.max.x && p.y < self.max.y
    }

    /// Intersection by corner clamp. Disjoint inputs yield a rect that is
    /// normalized to zero area (max pinned to min), never an inverted one.
    #[inline]
    pub fn intersect(self, other: Rect) -> Rect {
        Rect {
            min: self.min.max(other.min),
            max: self.max.min(other.max),
        }
        .clamped()
    }

    /// Ensures `max >= min` on each axis by pulling `max` up to `min`.
    #[inline]
    pub fn clamped(self) -> Rect {
        Rect { min: self.min, max: self.max.max(self.min) }
    }

    /// Expands to also cover `other` (bounding union).
    #[inline]
    pub fn add(self, other: Rect) -> Rect {
        Rect {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    #[inline]
    pub fn translate(self, delta: Vec2) -> Rect {
        Rect { min: self.min + delta, max: self.max + delta }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(x0: f32, y0: f32, x1: f32, y1: f32) -> Rect {
        Rect::from_coords(x0, y0, x1, y1)
    }

    // ── intersect ─────────────────────────────────────────────────────────

    #[test]
    fn intersect_overlapping() {
        let i = r(0.0, 0.0, 10.0, 10.0).intersect(r(5.0, 5.0, 15.0, 15.0));
        assert_eq!(i, r(5.0, 5.0, 10.0, 10.0));
    }

    #[test]
    fn intersect_contained() {
        let outer = r(0.0, 0.0, 100.0, 100.0);
        let inner = r(10.0, 10.0, 30.0, 30.0);
        assert_eq!(outer.intersect(inner), inner);
    }

    #[test]
    fn intersect_disjoint_is_empty_not_inverted() {
        let i = r(0.0, 0.0, 5.0, 5.0).intersect(r(20.0, 20.0, 25.0, 25.0));
        assert!(i.is_empty());
        assert!(i.max.x >= i.min.x && i.max.y >= i.min.y);
    }

    // ── clamped ───────────────────────────────────────────────────────────

    #[test]
    fn clamped_pins_max_to_min() {
        let c = r(10.0, 10.0, 2.0, 20.0).clamped();
        assert_eq!(c.max.x, 10.0);
        assert_eq!(c.max.y, 20.0);
    }

    // ── add / nothing ─────────────────────────────────────────────────────

    #[test]
    fn nothing_plus_rect_is_rect() {
        let a = r(1.0, 2.0, 3.0, 4.0);
        assert_eq!(Rect::nothing().add(a), a);
    }

    #[test]
    fn add_is_bounding_union() {
        let u = r(0.0, 0.0, 1.0, 1.0).add(r(5.0, -2.0, 6.0, 0.5));
        assert_eq!(u, r(0.0, -2.0, 6.0, 1.0));
    }

    // ── contains ──────────────────────────────────────────────────────────

    #[test]
    fn contains_is_half_open() {
        let a = r(0.0, 0.0, 10.0, 10.0);
        assert!(a.contains(Vec2::new(0.0, 0.0)));
        assert!(!a.contains(Vec2::new(10.0, 10.0)));
    }
}
