/// Axis-aligned boxes in world pixels (y grows downward).

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Rect { x, y, w, h }
    }

    #[inline] pub fn left(&self) -> f32 { self.x }
    #[inline] pub fn right(&self) -> f32 { self.x + self.w }
    #[inline] pub fn top(&self) -> f32 { self.y }
    #[inline] pub fn bottom(&self) -> f32 { self.y + self.h }
    #[inline] pub fn center_x(&self) -> f32 { self.x + self.w / 2.0 }

    #[inline] pub fn set_left(&mut self, v: f32) { self.x = v; }
    #[inline] pub fn set_right(&mut self, v: f32) { self.x = v - self.w; }
    #[inline] pub fn set_top(&mut self, v: f32) { self.y = v; }
    #[inline] pub fn set_bottom(&mut self, v: f32) { self.y = v - self.h; }

    /// Strict overlap: boxes that only share an edge do not collide.
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }
}
