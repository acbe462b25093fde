use crate::surface::{DrawContext, Hsla, Point, Surface};
use ratatui::style::Color;

/// Braille character rendering for high-resolution terminal graphics.
/// Each Braille character represents a 2x4 grid of dots (8 dots total).
///
/// Dot positions and their bit values:
/// ```text
/// (0,0)=0x01  (1,0)=0x08
/// (0,1)=0x02  (1,1)=0x10
/// (0,2)=0x04  (1,2)=0x20
/// (0,3)=0x40  (1,3)=0x80
/// ```
///
/// Unicode Braille patterns: U+2800 to U+28FF (256 patterns)
const BRAILLE_BASE: u32 = 0x2800;

/// Dot position to bit mapping for Braille characters
const BRAILLE_DOTS: [[u8; 4]; 2] = [
    [0x01, 0x02, 0x04, 0x40], // Left column (x=0): rows 0,1,2,3
    [0x08, 0x10, 0x20, 0x80], // Right column (x=1): rows 0,1,2,3
];

/// Dots dimmer than this (max channel, 0-1) are left blank
const LIT_THRESHOLD: f32 = 0.004;

/// Exponent applied to composited intensity before it reaches the terminal.
/// Terminal cells can't blend, so faint strokes are lifted instead.
const DISPLAY_GAMMA: f32 = 0.5;

/// A single rendered Braille cell with position and color
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BrailleCell {
    pub x: u16,
    pub y: u16,
    pub char: char,
    pub color: Color,
}

/// Dot buffer that rasterizes surface-pixel geometry, alpha-composited
/// onto black. One dot covers `scale` x `scale` surface pixels.
#[derive(Debug, Clone)]
pub struct DotCanvas {
    width: usize,
    height: usize,
    scale: f32,
    dots: Vec<[f32; 3]>,
}

impl DotCanvas {
    fn new(scale: f32) -> Self {
        Self {
            width: 0,
            height: 0,
            scale,
            dots: Vec::new(),
        }
    }

    fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.dots = vec![[0.0; 3]; width * height];
    }

    #[cfg(test)]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Composited color of a dot, or None outside the buffer
    pub fn dot(&self, x: usize, y: usize) -> Option<[f32; 3]> {
        if x < self.width && y < self.height {
            Some(self.dots[y * self.width + x])
        } else {
            None
        }
    }

    #[cfg(test)]
    pub fn is_lit(&self, x: usize, y: usize) -> bool {
        self.dot(x, y).is_some_and(|c| intensity(c) > LIT_THRESHOLD)
    }

    fn to_dot(&self, p: Point) -> (f32, f32) {
        (p.x / self.scale, p.y / self.scale)
    }

    fn blend(&mut self, x: i64, y: i64, rgb: [f32; 3], alpha: f32) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let dot = &mut self.dots[y as usize * self.width + x as usize];
        for (channel, src) in dot.iter_mut().zip(rgb) {
            *channel = src * alpha + *channel * (1.0 - alpha);
        }
    }
}

impl DrawContext for DotCanvas {
    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        let (x0, y0) = self.to_dot(Point::new(x, y));
        let (x1, y1) = self.to_dot(Point::new(x + width, y + height));
        let x0 = (x0.floor().max(0.0) as usize).min(self.width);
        let y0 = (y0.floor().max(0.0) as usize).min(self.height);
        let x1 = (x1.ceil().max(0.0) as usize).min(self.width);
        let y1 = (y1.ceil().max(0.0) as usize).min(self.height);
        if x0 >= x1 || y0 >= y1 {
            return;
        }
        for row in y0..y1 {
            self.dots[row * self.width + x0..row * self.width + x1].fill([0.0; 3]);
        }
    }

    fn fill_circle(&mut self, center: Point, radius: f32, color: Hsla) {
        let rgb = color.to_rgb();
        let (cx, cy) = self.to_dot(center);
        let r = radius / self.scale;
        let r_sq = r * r;

        let mut covered = false;
        for y in (cy - r).floor() as i64..=(cy + r).ceil() as i64 {
            for x in (cx - r).floor() as i64..=(cx + r).ceil() as i64 {
                let dx = x as f32 + 0.5 - cx;
                let dy = y as f32 + 0.5 - cy;
                if dx * dx + dy * dy <= r_sq {
                    self.blend(x, y, rgb, color.alpha);
                    covered = true;
                }
            }
        }
        // Discs smaller than a dot still mark the dot they sit in
        if !covered {
            self.blend(cx.floor() as i64, cy.floor() as i64, rgb, color.alpha);
        }
    }

    fn stroke_line(&mut self, from: Point, to: Point, _width: f32, color: Hsla) {
        let rgb = color.to_rgb();
        let (x0, y0) = self.to_dot(from);
        let (x1, y1) = self.to_dot(to);
        let steps = (x1 - x0).abs().max((y1 - y0).abs()).ceil().max(1.0) as usize;

        let mut last = None;
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let x = (x0 + (x1 - x0) * t).floor() as i64;
            let y = (y0 + (y1 - y0) * t).floor() as i64;
            if last != Some((x, y)) {
                self.blend(x, y, rgb, color.alpha);
                last = Some((x, y));
            }
        }
    }
}

/// Terminal-backed drawing surface. Surface pixels map onto Braille dots
/// through `pixel_scale`, so a field sized for a browser window still looks
/// right in an 80x24 terminal.
#[derive(Debug, Clone)]
pub struct BrailleSurface {
    /// Allotted layout region in terminal cells, None while detached
    region: Option<(u16, u16)>,
    pixel_scale: f32,
    /// Opacity of the whole surface, applied when cells are produced
    opacity: f32,
    buffer: (u32, u32),
    canvas: DotCanvas,
}

impl BrailleSurface {
    pub fn new(pixel_scale: f32, opacity: f32) -> Self {
        let pixel_scale = pixel_scale.max(f32::EPSILON);
        Self {
            region: None,
            pixel_scale,
            opacity: opacity.clamp(0.0, 1.0),
            buffer: (0, 0),
            canvas: DotCanvas::new(pixel_scale),
        }
    }

    /// Assign the layout region (in terminal cells) the surface occupies
    pub fn attach(&mut self, cols: u16, rows: u16) {
        self.region = Some((cols, rows));
    }

    pub fn detach(&mut self) {
        self.region = None;
    }

    pub fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity.clamp(0.0, 1.0);
    }

    #[cfg(test)]
    pub fn canvas(&self) -> &DotCanvas {
        &self.canvas
    }

    /// Fold the dot buffer into Braille cells for a `cols` x `rows` region.
    /// Each cell takes the color of its brightest dot.
    pub fn cells(&self, cols: u16, rows: u16) -> Vec<BrailleCell> {
        let mut cells = Vec::new();

        for cy in 0..rows {
            for cx in 0..cols {
                let mut pattern: u8 = 0;
                let mut brightest = [0.0f32; 3];

                // Sample the 2x4 dots for this Braille character
                let base_bx = cx as usize * 2;
                let base_by = cy as usize * 4;

                for dx in 0..2 {
                    for dy in 0..4 {
                        if let Some(dot) = self.canvas.dot(base_bx + dx, base_by + dy) {
                            if intensity(dot) > LIT_THRESHOLD {
                                pattern |= BRAILLE_DOTS[dx][dy];
                                if intensity(dot) > intensity(brightest) {
                                    brightest = dot;
                                }
                            }
                        }
                    }
                }

                // Only emit cells that have at least one dot
                if pattern != 0 {
                    let braille_char = char::from_u32(BRAILLE_BASE + pattern as u32).unwrap_or(' ');
                    cells.push(BrailleCell {
                        x: cx,
                        y: cy,
                        char: braille_char,
                        color: self.display_color(brightest),
                    });
                }
            }
        }

        cells
    }

    fn display_color(&self, rgb: [f32; 3]) -> Color {
        let encode = |c: f32| ((c * self.opacity).clamp(0.0, 1.0).powf(DISPLAY_GAMMA) * 255.0).round() as u8;
        Color::Rgb(encode(rgb[0]), encode(rgb[1]), encode(rgb[2]))
    }
}

impl Surface for BrailleSurface {
    type Context = DotCanvas;

    fn layout_size(&self) -> (i32, i32) {
        match self.region {
            Some((cols, rows)) => (
                (cols as f32 * 2.0 * self.pixel_scale).round() as i32,
                (rows as f32 * 4.0 * self.pixel_scale).round() as i32,
            ),
            None => (0, 0),
        }
    }

    fn set_size(&mut self, width: u32, height: u32) {
        self.buffer = (width, height);
        let dots_w = (width as f32 / self.pixel_scale).ceil() as usize;
        let dots_h = (height as f32 / self.pixel_scale).ceil() as usize;
        self.canvas.resize(dots_w, dots_h);
    }

    fn size(&self) -> (u32, u32) {
        self.buffer
    }

    fn context(&mut self) -> Option<&mut DotCanvas> {
        if self.region.is_some() {
            Some(&mut self.canvas)
        } else {
            None
        }
    }
}

fn intensity(rgb: [f32; 3]) -> f32 {
    rgb[0].max(rgb[1]).max(rgb[2])
}
