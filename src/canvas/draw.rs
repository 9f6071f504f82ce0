//! Outline primitives and image blits
//!
//! Every operation here requires an open edit transaction and clips to the
//! canvas silently: off-canvas coordinates are not errors.

use crate::buffer::PixelBuffer;
use crate::color::{BlendMode, PixelCombination};
use crate::error::Result;
use crate::mask::Mask;
use crate::shape::{saturate, Ellipse, Polygon, Polyline, Rect, RoundRect, Shape};

use super::Canvas;

impl Canvas {
    /// Write one pixel; ignored outside the canvas
    pub fn set_pixel(&mut self, x: i32, y: i32, color: u32, mode: BlendMode) -> Result<()> {
        self.ensure_editing()?;
        if let Some(old) = self.surface.get(x, y) {
            self.surface.set(x, y, mode.apply(old, color));
        }
        Ok(())
    }

    /// Set every pixel to `color`
    pub fn clear(&mut self, color: u32) -> Result<()> {
        self.ensure_editing()?;
        self.surface.fill(color);
        Ok(())
    }

    // ========================================================================
    // Lines
    // ========================================================================

    /// Bresenham line, both endpoints included
    #[allow(clippy::too_many_arguments)]
    pub fn draw_line(
        &mut self,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        color: u32,
        mode: BlendMode,
    ) -> Result<()> {
        self.ensure_editing()?;
        if mode.is_noop(color) {
            return Ok(());
        }
        let surface = &mut self.surface;
        let (w, h) = surface.size();
        trace_line(x1, y1, x2, y2, w, h, |x, y| {
            let idx = y as usize * w as usize + x as usize;
            let px = &mut surface.pixels_mut()[idx];
            *px = mode.apply(*px, color);
        });
        Ok(())
    }

    /// Row `y` from `x1` to `x2` inclusive, in either order
    pub fn draw_horizontal_line(
        &mut self,
        x1: i32,
        x2: i32,
        y: i32,
        color: u32,
        mode: BlendMode,
    ) -> Result<()> {
        self.ensure_editing()?;
        if y < 0 || y >= self.height() as i32 || mode.is_noop(color) {
            return Ok(());
        }
        let (x1, x2) = if x1 <= x2 { (x1, x2) } else { (x2, x1) };
        let start = x1.max(0);
        let end = x2.min(self.width() as i32 - 1);
        if start > end {
            return Ok(());
        }

        let row = y as usize * self.width() as usize;
        let span = &mut self.surface.pixels_mut()[row + start as usize..=row + end as usize];
        for px in span {
            *px = mode.apply(*px, color);
        }
        Ok(())
    }

    /// Column `x` from `y1` to `y2` inclusive, in either order
    pub fn draw_vertical_line(
        &mut self,
        x: i32,
        y1: i32,
        y2: i32,
        color: u32,
        mode: BlendMode,
    ) -> Result<()> {
        self.ensure_editing()?;
        if x < 0 || x >= self.width() as i32 || mode.is_noop(color) {
            return Ok(());
        }
        let (y1, y2) = if y1 <= y2 { (y1, y2) } else { (y2, y1) };
        let start = y1.max(0);
        let end = y2.min(self.height() as i32 - 1);
        if start > end {
            return Ok(());
        }

        let stride = self.width() as usize;
        let pixels = self.surface.pixels_mut();
        let mut idx = start as usize * stride + x as usize;
        for _ in start..=end {
            pixels[idx] = mode.apply(pixels[idx], color);
            idx += stride;
        }
        Ok(())
    }

    /// One-pixel rectangle border covering `width` x `height` pixels.
    /// Corners are written once.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_rectangle(
        &mut self,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        color: u32,
        mode: BlendMode,
    ) -> Result<()> {
        self.ensure_editing()?;
        if width == 0 || height == 0 {
            return Ok(());
        }
        // Off-canvas edges are pinned one pixel outside the canvas
        let (w, h) = (i64::from(self.width()), i64::from(self.height()));
        let pin_x = |v: i64| v.clamp(-1, w) as i32;
        let pin_y = |v: i64| v.clamp(-1, h) as i32;
        let (x1, y1) = (i64::from(x), i64::from(y));
        let (x2, y2) = (x1 + i64::from(width) - 1, y1 + i64::from(height) - 1);

        self.draw_horizontal_line(pin_x(x1), pin_x(x2), pin_y(y1), color, mode)?;
        if y2 != y1 {
            self.draw_horizontal_line(pin_x(x1), pin_x(x2), pin_y(y2), color, mode)?;
        }
        if height > 2 {
            self.draw_vertical_line(pin_x(x1), pin_y(y1 + 1), pin_y(y2 - 1), color, mode)?;
            if x2 != x1 {
                self.draw_vertical_line(pin_x(x2), pin_y(y1 + 1), pin_y(y2 - 1), color, mode)?;
            }
        }
        Ok(())
    }

    // ========================================================================
    // Shape outlines
    // ========================================================================

    /// Trace every outline polyline of `shape`. Pixels shared by adjacent
    /// segments are written once.
    pub fn draw_shape(&mut self, shape: &dyn Shape, color: u32, mode: BlendMode) -> Result<()> {
        self.ensure_editing()?;
        if mode.is_noop(color) {
            return Ok(());
        }
        let outline = shape.outline();
        let Some(area) = outline_box(&outline).and_then(|b| b.intersect(&self.bounds_rect())) else {
            return Ok(());
        };

        // Stroke pixels land inside the box around the outline vertices
        let (w, h) = self.surface.size();
        let mut stroke = Mask::new(area.width, area.height)?;
        let mut plot = |x: i32, y: i32| stroke.set(x - area.x, y - area.y, true);
        for polyline in &outline {
            match polyline.points.as_slice() {
                [] => {}
                [(x, y)] => {
                    if self.surface.in_bounds(*x, *y) {
                        plot(*x, *y);
                    }
                }
                _ => {
                    for ((x1, y1), (x2, y2)) in polyline.segments() {
                        trace_line(x1, y1, x2, y2, w, h, &mut plot);
                    }
                }
            }
        }

        let stride = w as usize;
        let pixels = self.surface.pixels_mut();
        for my in 0..area.height as i32 {
            let row = (area.y + my) as usize * stride + area.x as usize;
            for mx in 0..area.width as i32 {
                if stroke.get(mx, my) {
                    let px = &mut pixels[row + mx as usize];
                    *px = mode.apply(*px, color);
                }
            }
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    pub fn draw_ellipse(
        &mut self,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        color: u32,
        mode: BlendMode,
    ) -> Result<()> {
        self.draw_shape(&Ellipse::new(x, y, width, height), color, mode)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn draw_round_rectangle(
        &mut self,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        arc_width: u32,
        arc_height: u32,
        color: u32,
        mode: BlendMode,
    ) -> Result<()> {
        let shape = RoundRect::new(x, y, width, height, arc_width, arc_height);
        self.draw_shape(&shape, color, mode)
    }

    /// Closed polygon through paired coordinate slices
    pub fn draw_polygon(&mut self, xs: &[i32], ys: &[i32], color: u32, mode: BlendMode) -> Result<()> {
        self.draw_shape(&Polygon::from_coords(xs, ys), color, mode)
    }

    // ========================================================================
    // Images
    // ========================================================================

    /// Draw all of `image` with its top-left at (`x`, `y`)
    pub fn draw_image(&mut self, image: &PixelBuffer, x: i32, y: i32, mode: BlendMode) -> Result<()> {
        self.ensure_editing()?;
        match mode {
            BlendMode::Override => self.surface.blit(image, x, y),
            BlendMode::Alpha => self.surface.blit_blend(image, x, y),
        }
        Ok(())
    }

    /// Draw the `rect` block of `image` with its top-left at (`x`, `y`)
    pub fn draw_image_part(
        &mut self,
        image: &PixelBuffer,
        rect: Rect,
        x: i32,
        y: i32,
        mode: BlendMode,
    ) -> Result<()> {
        self.ensure_editing()?;
        let (w, h) = (saturate(i64::from(rect.width)), saturate(i64::from(rect.height)));
        match mode {
            BlendMode::Override => self.surface.copy_region(x, y, image, rect.x, rect.y, w, h),
            BlendMode::Alpha => self.surface.blend_region(x, y, image, rect.x, rect.y, w, h),
        }
        Ok(())
    }

    /// Mix `image` over the canvas with one constant alpha, ignoring its own
    pub fn draw_image_alpha(&mut self, image: &PixelBuffer, x: i32, y: i32, alpha: u8) -> Result<()> {
        self.ensure_editing()?;
        let (w, h) = image.size();
        self.surface
            .blend_region_alpha(x, y, image, 0, 0, w as i32, h as i32, alpha);
        Ok(())
    }

    /// Bitwise-combine `image` into the canvas
    pub fn draw_image_combined(
        &mut self,
        image: &PixelBuffer,
        x: i32,
        y: i32,
        combination: PixelCombination,
    ) -> Result<()> {
        self.ensure_editing()?;
        let (w, h) = image.size();
        self.surface
            .combine_region(x, y, image, 0, 0, w as i32, h as i32, combination);
        Ok(())
    }
}

/// Smallest rectangle holding every outline vertex
fn outline_box(outline: &[Polyline]) -> Option<Rect> {
    let mut points = outline.iter().flat_map(|p| p.points.iter().copied());
    let (fx, fy) = points.next()?;
    let (mut x1, mut y1, mut x2, mut y2) = (fx, fy, fx, fy);
    for (x, y) in points {
        x1 = x1.min(x);
        y1 = y1.min(y);
        x2 = x2.max(x);
        y2 = y2.max(y);
    }
    let span = |a: i32, b: i32| u32::try_from(i64::from(b) - i64::from(a) + 1).unwrap_or(u32::MAX);
    Some(Rect::new(x1, y1, span(x1, x2), span(y1, y2)))
}

// ============================================================================
// Line rasterization
// ============================================================================

/// Visit every pixel of the line inside a `width` x `height` grid.
///
/// Clips first so the Bresenham walk never leaves the grid.
#[allow(clippy::too_many_arguments)]
pub(crate) fn trace_line(
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
    width: u32,
    height: u32,
    mut plot: impl FnMut(i32, i32),
) {
    let Some((cx0, cy0, cx1, cy1)) = clip_line(x0, y0, x1, y1, width, height) else {
        return;
    };

    let dx = (cx1 - cx0).abs();
    let dy = -((cy1 - cy0).abs());
    let sx = if cx0 < cx1 { 1 } else { -1 };
    let sy = if cy0 < cy1 { 1 } else { -1 };
    let mut err = dx + dy;
    let mut x = cx0;
    let mut y = cy0;

    loop {
        plot(x, y);
        if x == cx1 && y == cy1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

/// Cohen-Sutherland clipping to `[0, width) x [0, height)`.
/// Returns the clipped endpoints, `None` when nothing is visible.
fn clip_line(x0: i32, y0: i32, x1: i32, y1: i32, width: u32, height: u32) -> Option<(i32, i32, i32, i32)> {
    const INSIDE: u8 = 0;
    const LEFT: u8 = 1;
    const RIGHT: u8 = 2;
    const BOTTOM: u8 = 4;
    const TOP: u8 = 8;
    // Converges in at most 4 rounds; the cap guards degenerate input
    const MAX_ITERATIONS: u32 = 16;

    let w = width as i64;
    let h = height as i64;
    let (mut x0, mut y0, mut x1, mut y1) = (x0 as i64, y0 as i64, x1 as i64, y1 as i64);

    let outcode = |x: i64, y: i64| -> u8 {
        let mut code = INSIDE;
        if x < 0 {
            code |= LEFT;
        } else if x >= w {
            code |= RIGHT;
        }
        if y < 0 {
            code |= TOP;
        } else if y >= h {
            code |= BOTTOM;
        }
        code
    };

    let mut code0 = outcode(x0, y0);
    let mut code1 = outcode(x1, y1);

    for _ in 0..MAX_ITERATIONS {
        if (code0 | code1) == 0 {
            return Some((x0 as i32, y0 as i32, x1 as i32, y1 as i32));
        }
        if (code0 & code1) != 0 {
            return None;
        }

        let code_out = if code0 != 0 { code0 } else { code1 };
        let dy = y1 - y0;
        let dx = x1 - x0;
        let (x, y);

        if (code_out & BOTTOM) != 0 {
            if dy == 0 {
                return None;
            }
            x = x0 + dx * (h - 1 - y0) / dy;
            y = h - 1;
        } else if (code_out & TOP) != 0 {
            if dy == 0 {
                return None;
            }
            x = x0 + dx * (0 - y0) / dy;
            y = 0;
        } else if (code_out & RIGHT) != 0 {
            if dx == 0 {
                return None;
            }
            y = y0 + dy * (w - 1 - x0) / dx;
            x = w - 1;
        } else {
            if dx == 0 {
                return None;
            }
            y = y0 + dy * (0 - x0) / dx;
            x = 0;
        }

        if code_out == code0 {
            x0 = x;
            y0 = y;
            code0 = outcode(x0, y0);
        } else {
            x1 = x;
            y1 = y;
            code1 = outcode(x1, y1);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{self, mix_over};
    use crate::error::CanvasError;

    const BG: u32 = 0xFF000000;
    const INK: u32 = 0xFFFFFFFF;

    fn canvas(w: u32, h: u32) -> Canvas {
        Canvas::with_color(w, h, BG).unwrap()
    }

    fn inked(canvas: &Canvas) -> usize {
        canvas.pixels().iter().filter(|&&p| p != BG).count()
    }

    #[test]
    fn test_drawing_requires_edit() {
        let mut c = canvas(4, 4);
        assert!(matches!(
            c.draw_line(0, 0, 3, 3, INK, BlendMode::Override),
            Err(CanvasError::NotEditing)
        ));
        assert!(c.set_pixel(1, 1, INK, BlendMode::Override).is_err());
        assert!(c.draw_rectangle(0, 0, 2, 2, INK, BlendMode::Override).is_err());
        assert!(c.clear(INK).is_err());
        assert_eq!(inked(&c), 0);
    }

    #[test]
    fn test_line_endpoints_exact() {
        let mut c = canvas(10, 8);
        let color = 0x80123456;
        {
            let mut e = c.begin_edit();
            e.draw_line(1, 6, 8, 2, color, BlendMode::Override).unwrap();
        }
        assert_eq!(c.pick(1, 6).unwrap(), color);
        assert_eq!(c.pick(8, 2).unwrap(), color);
    }

    #[test]
    fn test_line_is_connected() {
        let mut c = canvas(10, 10);
        {
            let mut e = c.begin_edit();
            e.draw_line(0, 0, 9, 3, INK, BlendMode::Override).unwrap();
        }
        // One pixel per column on a shallow line
        assert_eq!(inked(&c), 10);
    }

    #[test]
    fn test_line_clipped_to_canvas() {
        let mut c = canvas(5, 5);
        {
            let mut e = c.begin_edit();
            e.draw_line(-10, 2, 20, 2, INK, BlendMode::Override).unwrap();
            e.draw_line(-3, -3, -1, -8, INK, BlendMode::Override).unwrap();
        }
        assert_eq!(inked(&c), 5);
        for x in 0..5 {
            assert_eq!(c.pick(x, 2).unwrap(), INK);
        }
    }

    #[test]
    fn test_alpha_line_blends_once() {
        let mut c = canvas(6, 1);
        let src = color::argb(128, 255, 0, 0);
        {
            let mut e = c.begin_edit();
            e.draw_horizontal_line(5, 0, 0, src, BlendMode::Alpha).unwrap();
        }
        let expected = mix_over(BG, src);
        assert!(c.pixels().iter().all(|&p| p == expected));
    }

    #[test]
    fn test_vertical_line_clamped() {
        let mut c = canvas(3, 4);
        {
            let mut e = c.begin_edit();
            e.draw_vertical_line(1, 10, -5, INK, BlendMode::Override).unwrap();
            e.draw_vertical_line(3, 0, 3, INK, BlendMode::Override).unwrap();
        }
        assert_eq!(inked(&c), 4);
    }

    #[test]
    fn test_rectangle_corners_blended_once() {
        let mut c = canvas(6, 5);
        let src = color::argb(128, 255, 255, 255);
        {
            let mut e = c.begin_edit();
            e.draw_rectangle(1, 1, 4, 3, src, BlendMode::Alpha).unwrap();
        }
        let once = mix_over(BG, src);
        for (x, y) in [(1, 1), (4, 1), (1, 3), (4, 3), (1, 2), (4, 2), (2, 1)] {
            assert_eq!(c.pick(x, y).unwrap(), once, "({x}, {y})");
        }
        assert_eq!(c.pick(2, 2).unwrap(), BG);
        assert_eq!(inked(&c), 10);
    }

    #[test]
    fn test_rectangle_past_i32_range() {
        let mut c = canvas(4, 4);
        let src = color::argb(128, 255, 255, 255);
        {
            let mut e = c.begin_edit();
            e.draw_rectangle(i32::MAX - 1, 0, 10, 10, INK, BlendMode::Override)
                .unwrap();
            e.draw_rectangle(0, i32::MAX, 2, 3, INK, BlendMode::Override)
                .unwrap();
            assert_eq!(inked(&e), 0);
            e.draw_rectangle(-1, 1, u32::MAX, u32::MAX, src, BlendMode::Alpha)
                .unwrap();
        }
        let once = mix_over(BG, src);
        assert_eq!(c.pick(0, 1).unwrap(), once);
        assert_eq!(c.pick(3, 1).unwrap(), once);
        assert_eq!(c.pick(0, 0).unwrap(), BG);
        assert_eq!(c.pick(2, 3).unwrap(), BG);
        assert_eq!(inked(&c), 4);
    }

    #[test]
    fn test_empty_rectangle_is_noop() {
        let mut c = canvas(4, 4);
        {
            let mut e = c.begin_edit();
            e.draw_rectangle(0, 0, 0, 3, INK, BlendMode::Override).unwrap();
            e.draw_rectangle(0, 0, 3, 0, INK, BlendMode::Override).unwrap();
        }
        assert_eq!(inked(&c), 0);
    }

    #[test]
    fn test_polygon_outline_vertices_blended_once() {
        let mut c = canvas(8, 8);
        let src = color::argb(100, 0, 255, 0);
        {
            let mut e = c.begin_edit();
            e.draw_polygon(&[1, 6, 6, 1], &[1, 1, 6, 6], src, BlendMode::Alpha)
                .unwrap();
        }
        let once = mix_over(BG, src);
        assert_eq!(c.pick(1, 1).unwrap(), once);
        assert_eq!(c.pick(6, 6).unwrap(), once);
        assert_eq!(c.pick(3, 3).unwrap(), BG);
        assert_eq!(inked(&c), 20);
    }

    #[test]
    fn test_outline_partly_off_canvas() {
        let mut c = canvas(6, 6);
        {
            let mut e = c.begin_edit();
            e.draw_polygon(&[-3, 4, 4], &[2, 2, 9], INK, BlendMode::Override)
                .unwrap();
            e.draw_polygon(&[40, 50, 45], &[40, 40, 50], INK, BlendMode::Override)
                .unwrap();
        }
        for x in 0..=4 {
            assert_eq!(c.pick(x, 2).unwrap(), INK, "({x}, 2)");
        }
        for y in 3..=5 {
            assert_eq!(c.pick(4, y).unwrap(), INK, "(4, {y})");
        }
        assert_eq!(c.pick(0, 5).unwrap(), INK);
        assert_eq!(inked(&c), 9);
    }

    #[test]
    fn test_ellipse_outline_touches_frame() {
        let mut c = canvas(11, 11);
        {
            let mut e = c.begin_edit();
            e.draw_ellipse(0, 0, 11, 11, INK, BlendMode::Override).unwrap();
        }
        for (x, y) in [(10, 5), (5, 10), (0, 5), (5, 0)] {
            assert_eq!(c.pick(x, y).unwrap(), INK, "({x}, {y})");
        }
        assert_eq!(c.pick(5, 5).unwrap(), BG);
        assert_eq!(c.pick(0, 0).unwrap(), BG);
    }

    #[test]
    fn test_draw_image_modes() {
        let mut c = canvas(4, 4);
        let image = PixelBuffer::filled(2, 2, 0x00FF0000).unwrap();
        {
            let mut e = c.begin_edit();
            e.draw_image(&image, 0, 0, BlendMode::Alpha).unwrap();
            assert_eq!(e.pick(0, 0).unwrap(), BG);
            e.draw_image(&image, 3, 3, BlendMode::Override).unwrap();
        }
        assert_eq!(c.pick(3, 3).unwrap(), 0x00FF0000);
        assert_eq!(inked(&c), 1);
    }

    #[test]
    fn test_draw_image_part() {
        let mut c = canvas(4, 4);
        let mut image = PixelBuffer::filled(3, 3, INK).unwrap();
        image.set(2, 2, 0xFF00FF00);
        {
            let mut e = c.begin_edit();
            e.draw_image_part(&image, Rect::new(2, 2, 1, 1), 0, 0, BlendMode::Override)
                .unwrap();
        }
        assert_eq!(c.pick(0, 0).unwrap(), 0xFF00FF00);
        assert_eq!(inked(&c), 1);
    }

    #[test]
    fn test_draw_image_combined() {
        let mut c = Canvas::with_color(2, 1, 0xFFF0F0F0).unwrap();
        let image = PixelBuffer::filled(1, 1, 0x000F0F0F).unwrap();
        {
            let mut e = c.begin_edit();
            e.draw_image_combined(&image, 1, 0, PixelCombination::Xor).unwrap();
        }
        assert_eq!(c.pick(0, 0).unwrap(), 0xFFF0F0F0);
        assert_eq!(c.pick(1, 0).unwrap(), 0xFFFFFFFF);
    }

    #[test]
    fn test_clip_line_rejects_outside() {
        assert_eq!(clip_line(-5, -5, -1, -1, 4, 4), None);
        assert_eq!(clip_line(0, 0, 3, 3, 4, 4), Some((0, 0, 3, 3)));
        assert_eq!(clip_line(-2, 1, 6, 1, 4, 4), Some((0, 1, 3, 1)));
    }
}
