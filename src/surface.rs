//! Drawing surface boundary.
//!
//! The field never owns its surface. It measures the surface through
//! [`Surface::layout_size`], sizes the drawable buffer with
//! [`Surface::set_size`], and paints through an immediate-mode
//! [`DrawContext`] that may not exist yet (a surface that has not been
//! attached to any layout region has no context).

use palette::{FromColor, Hsl, Srgb};

/// A 2D point in surface pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Fully saturated HSL color with alpha
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsla {
    /// Hue in degrees
    pub hue: f32,
    /// Lightness in percent (0-100)
    pub lightness: f32,
    /// Alpha (0.0-1.0)
    pub alpha: f32,
}

impl Hsla {
    pub const fn new(hue: f32, lightness: f32, alpha: f32) -> Self {
        Self {
            hue,
            lightness,
            alpha,
        }
    }

    /// sRGB components in 0.0-1.0, alpha not applied
    pub fn to_rgb(self) -> [f32; 3] {
        let hsl = Hsl::new(self.hue, 1.0, (self.lightness / 100.0).clamp(0.0, 1.0));
        let rgb = Srgb::from_color(hsl);
        [rgb.red, rgb.green, rgb.blue]
    }
}

/// Immediate-mode 2D drawing API
pub trait DrawContext {
    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32);
    fn fill_circle(&mut self, center: Point, radius: f32, color: Hsla);
    fn stroke_line(&mut self, from: Point, to: Point, width: f32, color: Hsla);
}

/// A host-owned drawing region
pub trait Surface {
    type Context: DrawContext;

    /// Size currently allotted by the containing layout, in pixels
    fn layout_size(&self) -> (i32, i32);

    /// Resize the drawable buffer
    fn set_size(&mut self, width: u32, height: u32);

    /// Current drawable buffer size
    fn size(&self) -> (u32, u32);

    /// Drawing context, or None while the surface is not usable
    fn context(&mut self) -> Option<&mut Self::Context>;
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// One recorded draw call
    #[derive(Debug, Clone, PartialEq)]
    pub enum DrawOp {
        Clear { width: f32, height: f32 },
        Circle { center: Point, radius: f32, color: Hsla },
        Line { from: Point, to: Point, width: f32, color: Hsla },
    }

    /// Context that records draw calls instead of rasterizing them
    #[derive(Debug, Default)]
    pub struct RecordingContext {
        pub ops: Vec<DrawOp>,
    }

    impl RecordingContext {
        pub fn lines(&self) -> impl Iterator<Item = &DrawOp> {
            self.ops.iter().filter(|op| matches!(op, DrawOp::Line { .. }))
        }

        pub fn circles(&self) -> impl Iterator<Item = &DrawOp> {
            self.ops.iter().filter(|op| matches!(op, DrawOp::Circle { .. }))
        }
    }

    impl DrawContext for RecordingContext {
        fn clear_rect(&mut self, _x: f32, _y: f32, width: f32, height: f32) {
            self.ops.push(DrawOp::Clear { width, height });
        }

        fn fill_circle(&mut self, center: Point, radius: f32, color: Hsla) {
            self.ops.push(DrawOp::Circle {
                center,
                radius,
                color,
            });
        }

        fn stroke_line(&mut self, from: Point, to: Point, width: f32, color: Hsla) {
            self.ops.push(DrawOp::Line {
                from,
                to,
                width,
                color,
            });
        }
    }

    /// Surface with a fixed layout size and an optional recording context
    pub struct FakeSurface {
        pub layout: (i32, i32),
        pub buffer: (u32, u32),
        pub context: Option<RecordingContext>,
    }

    impl FakeSurface {
        pub fn new(width: i32, height: i32) -> Self {
            Self {
                layout: (width, height),
                buffer: (0, 0),
                context: Some(RecordingContext::default()),
            }
        }

        pub fn detached(width: i32, height: i32) -> Self {
            Self {
                context: None,
                ..Self::new(width, height)
            }
        }
    }

    impl Surface for FakeSurface {
        type Context = RecordingContext;

        fn layout_size(&self) -> (i32, i32) {
            self.layout
        }

        fn set_size(&mut self, width: u32, height: u32) {
            self.buffer = (width, height);
        }

        fn size(&self) -> (u32, u32) {
            self.buffer
        }

        fn context(&mut self) -> Option<&mut RecordingContext> {
            self.context.as_mut()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert_eq!(a.distance(b), 5.0);
        assert_eq!(b.distance(a), 5.0);
    }

    #[test]
    fn test_link_color_is_teal() {
        let [r, g, b] = Hsla::new(160.0, 70.0, 1.0).to_rgb();
        // hsl(160, 100%, 70%) = rgb(102, 255, 204)
        assert!((r - 0.4).abs() < 0.01);
        assert!((g - 1.0).abs() < 0.01);
        assert!((b - 0.8).abs() < 0.01);
    }
}
