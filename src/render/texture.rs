//! Texture sources and the subdivided quad mapper.
//!
//! tiny-skia blits are affine, so a perspective quad is approximated by an
//! S×S grid of bilinear-interpolated cells, each split into two triangles
//! blitted with their own closed-form affine transform under a triangle
//! clip mask.

use std::path::Path;

use anyhow::{Context, Result};
use tiny_skia::{
    FillRule, FilterQuality, Mask, PathBuilder, Pixmap, PixmapPaint, PixmapRef, Transform,
};

use crate::geometry::ScreenQuad;

/// Pixel content to show on the monitor screen.
///
/// `frame` may return `None` while the source is warming up; the renderer
/// falls back to a flat fill until frames arrive. `pause` is a hint from the
/// lifecycle controller that no frames will be requested for a while.
pub trait TextureSource {
    fn dimensions(&self) -> (u32, u32);
    fn is_ready(&self) -> bool;
    fn frame(&self) -> Option<PixmapRef<'_>>;
    fn pause(&mut self) {}
}

/// A still image loaded once and served on every frame.
pub struct ImageTexture {
    pixmap: Pixmap,
}

impl ImageTexture {
    pub fn from_path(path: &Path) -> Result<Self> {
        let image = image::open(path)
            .with_context(|| format!("failed to load texture {}", path.display()))?
            .to_rgba8();
        let (width, height) = image.dimensions();
        let mut pixmap = Pixmap::new(width, height)
            .with_context(|| format!("texture {} has zero dimensions", path.display()))?;
        // image gives straight alpha; tiny-skia stores premultiplied RGBA8.
        for (dst, src) in pixmap.data_mut().chunks_exact_mut(4).zip(image.pixels()) {
            let [r, g, b, a] = src.0;
            let alpha = a as u16;
            dst[0] = ((r as u16 * alpha) / 255) as u8;
            dst[1] = ((g as u16 * alpha) / 255) as u8;
            dst[2] = ((b as u16 * alpha) / 255) as u8;
            dst[3] = a;
        }
        Ok(Self { pixmap })
    }

    pub fn from_pixmap(pixmap: Pixmap) -> Self {
        Self { pixmap }
    }
}

impl TextureSource for ImageTexture {
    fn dimensions(&self) -> (u32, u32) {
        (self.pixmap.width(), self.pixmap.height())
    }

    fn is_ready(&self) -> bool {
        true
    }

    fn frame(&self) -> Option<PixmapRef<'_>> {
        Some(self.pixmap.as_ref())
    }
}

/// Bilinear interpolation across the quad at normalized `(u, v)`.
fn quad_point(quad: &ScreenQuad, u: f32, v: f32) -> (f32, f32) {
    let top_x = quad.tl.x + (quad.tr.x - quad.tl.x) * u;
    let top_y = quad.tl.y + (quad.tr.y - quad.tl.y) * u;
    let bottom_x = quad.bl.x + (quad.br.x - quad.bl.x) * u;
    let bottom_y = quad.bl.y + (quad.br.y - quad.bl.y) * u;
    (top_x + (bottom_x - top_x) * v, top_y + (bottom_y - top_y) * v)
}

/// Solve for the affine transform taking three source points to three
/// destination points. Returns `None` when the source triangle is degenerate.
pub(crate) fn solve_affine(src: [(f32, f32); 3], dst: [(f32, f32); 3]) -> Option<Transform> {
    let (x0, y0) = src[0];
    let (x1, y1) = src[1];
    let (x2, y2) = src[2];
    let det = (x1 - x0) * (y2 - y0) - (x2 - x0) * (y1 - y0);
    if det.abs() < 1e-6 {
        return None;
    }
    let inv = 1.0 / det;

    let (u0, v0) = dst[0];
    let (u1, v1) = dst[1];
    let (u2, v2) = dst[2];

    let a = ((u1 - u0) * (y2 - y0) - (u2 - u0) * (y1 - y0)) * inv;
    let c = ((u2 - u0) * (x1 - x0) - (u1 - u0) * (x2 - x0)) * inv;
    let e = u0 - a * x0 - c * y0;

    let b = ((v1 - v0) * (y2 - y0) - (v2 - v0) * (y1 - y0)) * inv;
    let d = ((v2 - v0) * (x1 - x0) - (v1 - v0) * (x2 - x0)) * inv;
    let f = v0 - b * x0 - d * y0;

    Some(Transform::from_row(a, b, c, d, e, f))
}

/// Map `texture` onto the projected screen quad.
///
/// `base` carries the device-pixel-ratio scale so the mask and the blit agree
/// on physical pixels. Cells whose triangles collapse (off-axis quads at
/// extreme tilt) are skipped rather than smeared.
pub fn map_quad(
    pixmap: &mut Pixmap,
    quad: &ScreenQuad,
    texture: PixmapRef<'_>,
    grid: u32,
    base: Transform,
) {
    let grid = grid.max(1);
    let (tex_w, tex_h) = (texture.width() as f32, texture.height() as f32);
    if tex_w <= 0.0 || tex_h <= 0.0 {
        return;
    }

    let mut mask = match Mask::new(pixmap.width(), pixmap.height()) {
        Some(mask) => mask,
        None => return,
    };
    let paint = PixmapPaint {
        quality: FilterQuality::Bilinear,
        ..PixmapPaint::default()
    };

    for row in 0..grid {
        for col in 0..grid {
            let u0 = col as f32 / grid as f32;
            let u1 = (col + 1) as f32 / grid as f32;
            let v0 = row as f32 / grid as f32;
            let v1 = (row + 1) as f32 / grid as f32;

            let p00 = quad_point(quad, u0, v0);
            let p10 = quad_point(quad, u1, v0);
            let p11 = quad_point(quad, u1, v1);
            let p01 = quad_point(quad, u0, v1);

            let s00 = (u0 * tex_w, v0 * tex_h);
            let s10 = (u1 * tex_w, v0 * tex_h);
            let s11 = (u1 * tex_w, v1 * tex_h);
            let s01 = (u0 * tex_w, v1 * tex_h);

            let tri_a = ([s00, s10, s11], [p00, p10, p11]);
            let tri_b = ([s00, s11, s01], [p00, p11, p01]);
            for (src, dst) in [tri_a, tri_b] {
                blit_triangle(pixmap, &mut mask, texture, &paint, src, dst, base);
            }
        }
    }
}

fn blit_triangle(
    pixmap: &mut Pixmap,
    mask: &mut Mask,
    texture: PixmapRef<'_>,
    paint: &PixmapPaint,
    src: [(f32, f32); 3],
    dst: [(f32, f32); 3],
    base: Transform,
) {
    let Some(affine) = solve_affine(src, dst) else {
        return;
    };

    let mut pb = PathBuilder::new();
    pb.move_to(dst[0].0, dst[0].1);
    pb.line_to(dst[1].0, dst[1].1);
    pb.line_to(dst[2].0, dst[2].1);
    pb.close();
    let Some(path) = pb.finish() else {
        return;
    };

    mask.clear();
    mask.fill_path(&path, FillRule::Winding, true, base);

    pixmap.draw_pixmap(
        0,
        0,
        texture,
        paint,
        affine.post_concat(base),
        Some(mask),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::ScreenPoint;
    use approx::assert_relative_eq;

    fn sp(x: f32, y: f32) -> ScreenPoint {
        ScreenPoint { x, y, scale: 1.0 }
    }

    fn unit_quad() -> ScreenQuad {
        ScreenQuad {
            tl: sp(10.0, 20.0),
            tr: sp(110.0, 24.0),
            br: sp(108.0, 140.0),
            bl: sp(12.0, 136.0),
        }
    }

    #[test]
    fn quad_point_hits_corners() {
        let quad = unit_quad();
        let (x, y) = quad_point(&quad, 0.0, 0.0);
        assert_relative_eq!(x, 10.0);
        assert_relative_eq!(y, 20.0);
        let (x, y) = quad_point(&quad, 1.0, 1.0);
        assert_relative_eq!(x, 108.0);
        assert_relative_eq!(y, 140.0);
        let (x, y) = quad_point(&quad, 1.0, 0.0);
        assert_relative_eq!(x, 110.0);
        assert_relative_eq!(y, 24.0);
    }

    #[test]
    fn affine_solve_maps_all_three_points() {
        let src = [(0.0, 0.0), (100.0, 0.0), (0.0, 50.0)];
        let dst = [(10.0, 20.0), (90.0, 35.0), (22.0, 95.0)];
        let t = solve_affine(src, dst).unwrap();
        for (s, d) in src.iter().zip(dst.iter()) {
            let mut pts = [tiny_skia::Point::from_xy(s.0, s.1)];
            t.map_points(&mut pts);
            assert_relative_eq!(pts[0].x, d.0, epsilon = 1e-3);
            assert_relative_eq!(pts[0].y, d.1, epsilon = 1e-3);
        }
    }

    #[test]
    fn degenerate_source_triangle_is_rejected() {
        let src = [(0.0, 0.0), (50.0, 50.0), (100.0, 100.0)];
        let dst = [(0.0, 0.0), (10.0, 0.0), (0.0, 10.0)];
        assert!(solve_affine(src, dst).is_none());
    }

    #[test]
    fn map_quad_paints_inside_and_leaves_outside() {
        let mut target = Pixmap::new(200, 200).unwrap();
        let mut texture = Pixmap::new(64, 64).unwrap();
        texture.fill(tiny_skia::Color::from_rgba(1.0, 0.0, 0.0, 1.0).unwrap());

        let quad = ScreenQuad {
            tl: sp(50.0, 50.0),
            tr: sp(150.0, 50.0),
            br: sp(150.0, 150.0),
            bl: sp(50.0, 150.0),
        };
        map_quad(&mut target, &quad, texture.as_ref(), 4, Transform::identity());

        let inside = target.pixel(100, 100).unwrap();
        assert!(inside.red() > 200, "centre should be painted red");
        let outside = target.pixel(10, 10).unwrap();
        assert_eq!(outside.alpha(), 0, "corners outside the quad stay clear");
    }

    #[test]
    fn zero_sized_texture_is_a_no_op() {
        let mut target = Pixmap::new(50, 50).unwrap();
        let texture = Pixmap::new(1, 1).unwrap();
        // grid of 0 clamps to 1 rather than dividing by zero
        map_quad(
            &mut target,
            &unit_quad(),
            texture.as_ref(),
            0,
            Transform::identity(),
        );
    }
}
