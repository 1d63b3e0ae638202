//! World-space solid for the monitor and the derived screen-space quad.
//!
//! All dimensions are proportions of the logical surface size so the scene
//! scales with its container instead of treating pixels as fixed.

use crate::config::ProjectionTuning;
use crate::projection::{Point3, ScreenPoint, SurfaceSize, project};

const BODY_WIDTH_RATIO: f32 = 0.68;
const BODY_HEIGHT_RATIO: f32 = 0.74;
const BODY_DEPTH_RATIO: f32 = 0.052;
const BEZEL_RATIO: f32 = 0.044;

const NECK_RADIUS_X_RATIO: f32 = 0.025;
const NECK_RADIUS_Z_RATIO: f32 = 0.65;
const NECK_LENGTH_RATIO: f32 = 0.12;

const BASE_RADIUS_X_RATIO: f32 = 0.86;
const BASE_RADIUS_Z_RATIO: f32 = 1.1;
const BASE_THICKNESS_RATIO: f32 = 0.018;
const HOLE_RADIUS_SCALE: f32 = 1.05;

const SHADOW_DROP_RATIO: f32 = 0.08;

/// Proportional dimensions of the monitor solid for one surface size.
#[derive(Debug, Clone, Copy)]
pub struct MonitorMetrics {
    pub body_w: f32,
    pub body_h: f32,
    pub body_d: f32,
    pub bezel: f32,
    pub half_w: f32,
    pub half_h: f32,
    pub half_d: f32,
    pub neck_rx: f32,
    pub neck_rz: f32,
    pub neck_top_y: f32,
    pub neck_bottom_y: f32,
    pub base_rx: f32,
    pub base_rz: f32,
    pub base_thickness: f32,
    pub shadow_drop: f32,
}

impl MonitorMetrics {
    pub fn from_size(size: &SurfaceSize) -> Self {
        let w = size.logical_width();
        let h = size.logical_height();
        let body_w = w * BODY_WIDTH_RATIO;
        let body_h = h * BODY_HEIGHT_RATIO;
        let body_d = w * BODY_DEPTH_RATIO;
        let half_h = body_h / 2.0;
        let neck_top_y = half_h;
        Self {
            body_w,
            body_h,
            body_d,
            bezel: body_h * BEZEL_RATIO,
            half_w: body_w / 2.0,
            half_h,
            half_d: body_d / 2.0,
            neck_rx: body_w * NECK_RADIUS_X_RATIO,
            neck_rz: body_d * NECK_RADIUS_Z_RATIO,
            neck_top_y,
            neck_bottom_y: neck_top_y + h * NECK_LENGTH_RATIO,
            base_rx: body_w * BASE_RADIUS_X_RATIO,
            base_rz: body_d * BASE_RADIUS_Z_RATIO,
            base_thickness: h * BASE_THICKNESS_RATIO,
            shadow_drop: body_h * SHADOW_DROP_RATIO,
        }
    }

    pub fn hole_rx(&self) -> f32 {
        self.neck_rx * HOLE_RADIUS_SCALE
    }

    pub fn hole_rz(&self) -> f32 {
        self.neck_rz * HOLE_RADIUS_SCALE
    }
}

/// The eight corners of the monitor body. Front face sits at `z = -half_d`
/// (toward the viewer), back face at `z = +half_d`.
#[derive(Debug, Clone, Copy)]
pub struct BodyCorners {
    pub ftl: Point3,
    pub ftr: Point3,
    pub fbr: Point3,
    pub fbl: Point3,
    pub btl: Point3,
    pub btr: Point3,
    pub bbr: Point3,
    pub bbl: Point3,
}

pub fn body_corners(m: &MonitorMetrics) -> BodyCorners {
    let (hw, hh, hd) = (m.half_w, m.half_h, m.half_d);
    BodyCorners {
        ftl: Point3::new(-hw, -hh, -hd),
        ftr: Point3::new(hw, -hh, -hd),
        fbr: Point3::new(hw, hh, -hd),
        fbl: Point3::new(-hw, hh, -hd),
        btl: Point3::new(-hw, -hh, hd),
        btr: Point3::new(hw, -hh, hd),
        bbr: Point3::new(hw, hh, hd),
        bbl: Point3::new(-hw, hh, hd),
    }
}

/// Screen-plane corners: the front face inset by the bezel margin, in
/// tl/tr/br/bl order.
pub fn screen_corners(m: &MonitorMetrics) -> [Point3; 4] {
    let (hw, hh, hd, b) = (m.half_w, m.half_h, m.half_d, m.bezel);
    [
        Point3::new(-hw + b, -hh + b, -hd),
        Point3::new(hw - b, -hh + b, -hd),
        Point3::new(hw - b, hh - b, -hd),
        Point3::new(-hw + b, hh - b, -hd),
    ]
}

/// Sample a horizontal ellipse at `segments` steps. Returns `segments + 1`
/// points with the last equal to the first so callers can walk closed loops
/// and adjacent quad strips without wrapping arithmetic.
pub fn ring(radius_x: f32, radius_z: f32, y: f32, segments: u32) -> Vec<Point3> {
    let segments = segments.max(3);
    (0..=segments)
        .map(|i| {
            let angle = (i as f32 / segments as f32) * std::f32::consts::TAU;
            Point3::new(angle.cos() * radius_x, y, angle.sin() * radius_z)
        })
        .collect()
}

/// Projected corners of the screen area, used for both texture mapping and
/// pointer hit-testing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenQuad {
    pub tl: ScreenPoint,
    pub tr: ScreenPoint,
    pub br: ScreenPoint,
    pub bl: ScreenPoint,
}

fn edge_cross(a: &ScreenPoint, b: &ScreenPoint, x: f32, y: f32) -> f32 {
    (b.x - a.x) * (y - a.y) - (b.y - a.y) * (x - a.x)
}

impl ScreenQuad {
    /// Point-in-convex-quad via four cross-product sign checks. The quad is
    /// convex for all valid sizes and progress values (yaw/pitch stay within
    /// bounds), which this test relies on.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        let signs = [
            edge_cross(&self.tl, &self.tr, x, y),
            edge_cross(&self.tr, &self.br, x, y),
            edge_cross(&self.br, &self.bl, x, y),
            edge_cross(&self.bl, &self.tl, x, y),
        ];
        signs.iter().all(|s| *s >= 0.0) || signs.iter().all(|s| *s <= 0.0)
    }

    pub fn centroid(&self) -> (f32, f32) {
        (
            (self.tl.x + self.tr.x + self.br.x + self.bl.x) / 4.0,
            (self.tl.y + self.tr.y + self.br.y + self.bl.y) / 4.0,
        )
    }
}

/// Compute the screen quad for a surface size and progress. Pure; this is
/// the one geometry query exposed to collaborators outside the renderer.
pub fn screen_quad(size: &SurfaceSize, progress: f32, tuning: &ProjectionTuning) -> ScreenQuad {
    let m = MonitorMetrics::from_size(size);
    let [tl, tr, br, bl] = screen_corners(&m).map(|p| project(p, size, progress, tuning));
    ScreenQuad { tl, tr, br, bl }
}

/// Caches the most recent screen quad keyed on `(size, progress)`.
/// A change to either key recomputes; the cache can never serve stale
/// geometry across a resize or scroll tick.
#[derive(Debug, Default)]
pub struct QuadCache {
    key: Option<(SurfaceSize, f32)>,
    quad: Option<ScreenQuad>,
}

impl QuadCache {
    pub fn get(
        &mut self,
        size: &SurfaceSize,
        progress: f32,
        tuning: &ProjectionTuning,
    ) -> ScreenQuad {
        let key = (*size, progress);
        match (&self.key, &self.quad) {
            (Some(cached_key), Some(quad)) if *cached_key == key => *quad,
            _ => {
                let quad = screen_quad(size, progress, tuning);
                self.key = Some(key);
                self.quad = Some(quad);
                quad
            }
        }
    }

    pub fn invalidate(&mut self) {
        self.key = None;
        self.quad = None;
    }
}
