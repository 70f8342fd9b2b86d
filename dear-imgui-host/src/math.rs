/// 2D vector compatible with mint
pub type Vector2 = [f32; 2];

/// Mint-compatible 2D vector type
pub(crate) type MintVec2 = mint::Vector2<f32>;

/// RGBA color (4 floats, 0.0-1.0 range)
pub type Color = [f32; 4];

/// 32-bit packed color, `0xAABBGGRR` (red in the low byte)
pub type ColorU32 = u32;

/// Utility functions for color conversion
pub fn color_to_u32(color: Color) -> ColorU32 {
    let r = (color[0].clamp(0.0, 1.0) * 255.0 + 0.5) as u32;
    let g = (color[1].clamp(0.0, 1.0) * 255.0 + 0.5) as u32;
    let b = (color[2].clamp(0.0, 1.0) * 255.0 + 0.5) as u32;
    let a = (color[3].clamp(0.0, 1.0) * 255.0 + 0.5) as u32;
    (a << 24) | (b << 16) | (g << 8) | r
}

pub fn color_from_u32(color: ColorU32) -> Color {
    [
        ((color & 0xFF) as f32) / 255.0,
        (((color >> 8) & 0xFF) as f32) / 255.0,
        (((color >> 16) & 0xFF) as f32) / 255.0,
        (((color >> 24) & 0xFF) as f32) / 255.0,
    ]
}

/// Unpacks a packed color into host byte order `[r, g, b, a]`.
#[inline]
pub fn unpack_color(color: ColorU32) -> [u8; 4] {
    color.to_le_bytes()
}

/// Common packed colors
pub mod colors {
    use super::ColorU32;

    pub const WHITE: ColorU32 = 0xFFFF_FFFF;
    pub const BLACK: ColorU32 = 0xFF00_0000;
    pub const MAGENTA: ColorU32 = 0xFFFF_00FF;
    pub const TRANSPARENT: ColorU32 = 0x0000_0000;
}

/// Axis-aligned rectangle, `min` inclusive and `max` exclusive.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub min: Vector2,
    pub max: Vector2,
}

impl Rect {
    pub const ZERO: Rect = Rect {
        min: [0.0, 0.0],
        max: [0.0, 0.0],
    };

    #[inline]
    pub const fn new(min: Vector2, max: Vector2) -> Self {
        Self { min, max }
    }

    /// Rectangle anchored at `pos` with the given size.
    #[inline]
    pub fn from_pos_size(pos: Vector2, size: Vector2) -> Self {
        Self {
            min: pos,
            max: [pos[0] + size[0], pos[1] + size[1]],
        }
    }

    /// Builds a rectangle from a `[x1, y1, x2, y2]` clip rectangle.
    #[inline]
    pub const fn from_clip_rect(clip: [f32; 4]) -> Self {
        Self {
            min: [clip[0], clip[1]],
            max: [clip[2], clip[3]],
        }
    }

    #[inline]
    pub const fn to_clip_rect(self) -> [f32; 4] {
        [self.min[0], self.min[1], self.max[0], self.max[1]]
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max[0] - self.min[0]
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max[1] - self.min[1]
    }

    #[inline]
    pub fn size(&self) -> Vector2 {
        [self.width(), self.height()]
    }

    /// Whether the rectangle covers no area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.max[0] <= self.min[0] || self.max[1] <= self.min[1]
    }

    #[inline]
    pub fn contains(&self, point: Vector2) -> bool {
        point[0] >= self.min[0]
            && point[1] >= self.min[1]
            && point[0] < self.max[0]
            && point[1] < self.max[1]
    }

    /// Overlap of two rectangles. Disjoint rectangles produce an empty
    /// rectangle collapsed onto the nearest edge instead of an inverted one.
    pub fn intersection(&self, other: &Rect) -> Rect {
        let min = [self.min[0].max(other.min[0]), self.min[1].max(other.min[1])];
        let max = [
            self.max[0].min(other.max[0]).max(min[0]),
            self.max[1].min(other.max[1]).max(min[1]),
        ];
        Rect { min, max }
    }

    /// Rectangle with ordered corners.
    pub fn normalized(&self) -> Rect {
        Rect {
            min: [self.min[0].min(self.max[0]), self.min[1].min(self.max[1])],
            max: [self.min[0].max(self.max[0]), self.min[1].max(self.max[1])],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intersection_of_overlapping_rects() {
        let a = Rect::new([0.0, 0.0], [100.0, 100.0]);
        let b = Rect::new([50.0, 25.0], [150.0, 75.0]);
        assert_eq!(a.intersection(&b), Rect::new([50.0, 25.0], [100.0, 75.0]));
    }

    #[test]
    fn intersection_of_disjoint_rects_is_empty() {
        let a = Rect::new([0.0, 0.0], [10.0, 10.0]);
        let b = Rect::new([20.0, 20.0], [30.0, 30.0]);
        let clipped = a.intersection(&b);
        assert!(clipped.is_empty());
        assert!(clipped.width() >= 0.0 && clipped.height() >= 0.0);
    }

    #[test]
    fn color_packing_is_rgba_low_to_high() {
        let packed = color_to_u32([1.0, 0.0, 1.0, 1.0]);
        assert_eq!(packed, colors::MAGENTA);
        assert_eq!(unpack_color(packed), [255, 0, 255, 255]);
        assert_eq!(color_from_u32(colors::WHITE), [1.0, 1.0, 1.0, 1.0]);
    }
}
