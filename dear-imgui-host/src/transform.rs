//! Canvas and screen space transforms.
//!
//! Draw lists are produced in canvas space. A canvas transform (pan and zoom)
//! is applied first, then the host widget's own transform takes the result to
//! screen space.

use glam::{Affine2, Vec2};

use crate::math::{Rect, Vector2};

/// 2D affine transform between GUI spaces.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CanvasTransform(Affine2);

impl Default for CanvasTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl CanvasTransform {
    pub const IDENTITY: CanvasTransform = CanvasTransform(Affine2::IDENTITY);

    /// Uniform scale followed by a translation.
    pub fn from_scale_translation(scale: f32, translation: Vector2) -> Self {
        Self(Affine2::from_scale_angle_translation(
            Vec2::splat(scale),
            0.0,
            Vec2::from(translation),
        ))
    }

    pub fn from_translation(translation: Vector2) -> Self {
        Self(Affine2::from_translation(Vec2::from(translation)))
    }

    pub const fn from_affine(affine: Affine2) -> Self {
        Self(affine)
    }

    pub const fn affine(&self) -> Affine2 {
        self.0
    }

    pub fn translation(&self) -> Vector2 {
        self.0.translation.to_array()
    }

    /// Horizontal scale factor
    pub fn scale(&self) -> f32 {
        self.0.matrix2.x_axis.length()
    }

    /// Transform applying `self` first and `then` second.
    pub fn concatenate(&self, then: &CanvasTransform) -> CanvasTransform {
        CanvasTransform(then.0 * self.0)
    }

    pub fn inverse(&self) -> CanvasTransform {
        CanvasTransform(self.0.inverse())
    }

    pub fn transform_point(&self, point: Vector2) -> Vector2 {
        self.0.transform_point2(Vec2::from(point)).to_array()
    }

    /// Transforms both corners and re-orders them, so mirrored transforms still
    /// produce a valid rectangle.
    pub fn transform_rect(&self, rect: Rect) -> Rect {
        Rect::new(self.transform_point(rect.min), self.transform_point(rect.max)).normalized()
    }

    /// Same transform with its translation rounded to whole pixels.
    pub fn round_translation(&self) -> CanvasTransform {
        let mut affine = self.0;
        affine.translation = affine.translation.round();
        CanvasTransform(affine)
    }
}

/// Canvas to screen transform used for painting.
pub fn canvas_to_screen(canvas: &CanvasTransform, widget_to_screen: &CanvasTransform) -> CanvasTransform {
    canvas.concatenate(widget_to_screen).round_translation()
}

/// Maps a screen point into canvas space, used for pointer events.
///
/// The translation is not rounded here so pointer positions keep sub-pixel
/// precision.
pub fn screen_to_canvas(
    point: Vector2,
    canvas: &CanvasTransform,
    widget_to_screen: &CanvasTransform,
) -> Vector2 {
    canvas
        .concatenate(widget_to_screen)
        .inverse()
        .transform_point(point)
}
