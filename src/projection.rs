//! Pure fixed-focal-length perspective projection for the monitor scene.
//!
//! Everything here is a function of `(point, surface size, progress)` and the
//! injected [`ProjectionTuning`] — no hidden state — so the hit-test path and
//! the drawing path always agree on where geometry lands.

use crate::config::ProjectionTuning;

/// World-space coordinate in abstract units scaled off the surface size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Point3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Projected 2D point in logical pixels plus the perspective scale factor,
/// used to size strokes and dots consistently across depth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
    pub scale: f32,
}

/// Physical drawing-surface dimensions plus the device pixel ratio.
///
/// Projection and hit-testing operate in logical pixels (`physical / dpr`);
/// the DPR only shows up as the rasterization base transform, so geometry is
/// identical across display densities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
    pub device_pixel_ratio: f32,
}

impl SurfaceSize {
    pub fn new(width: u32, height: u32, device_pixel_ratio: f32) -> Self {
        let dpr = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio
        } else {
            1.0
        };
        Self {
            width,
            height,
            device_pixel_ratio: dpr,
        }
    }

    pub fn logical_width(&self) -> f32 {
        self.width as f32 / self.device_pixel_ratio
    }

    pub fn logical_height(&self) -> f32 {
        self.height as f32 / self.device_pixel_ratio
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Yaw and pitch in radians for a given reveal progress.
///
/// Both interpolate linearly from their configured extremes at progress 0 to
/// zero at progress 1 (face-on).
pub fn yaw_pitch(progress: f32, tuning: &ProjectionTuning) -> (f32, f32) {
    let tilt = 1.0 - progress.clamp(0.0, 1.0);
    (
        tilt * tuning.yaw_max_deg.to_radians(),
        tilt * tuning.pitch_max_deg.to_radians(),
    )
}

/// Project a world-space point to logical surface pixels.
///
/// Yaw rotates x/z, pitch rotates y/z, then a fixed-focal-length divide maps
/// view space into pixels around a progress-dependent vertical centre.
pub fn project(
    point: Point3,
    size: &SurfaceSize,
    progress: f32,
    tuning: &ProjectionTuning,
) -> ScreenPoint {
    let w = size.logical_width();
    let h = size.logical_height();
    let (yaw, pitch) = yaw_pitch(progress, tuning);

    let (sin_yaw, cos_yaw) = yaw.sin_cos();
    let x1 = point.x * cos_yaw + point.z * sin_yaw;
    let z1 = -point.x * sin_yaw + point.z * cos_yaw;

    let (sin_pitch, cos_pitch) = pitch.sin_cos();
    let y2 = point.y * cos_pitch - z1 * sin_pitch;
    let z2 = point.y * sin_pitch + z1 * cos_pitch;

    let scale = tuning.focal_length / (tuning.focal_length + z2 + tuning.depth_offset);

    let tilt = 1.0 - progress.clamp(0.0, 1.0);
    let center_y = h * (tuning.center_y_base + tilt * tuning.center_y_tilt);

    ScreenPoint {
        x: w * 0.5 + x1 * scale,
        y: center_y + y2 * scale,
        scale,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_relative_eq, relative_eq};

    fn tuning() -> ProjectionTuning {
        ProjectionTuning::default()
    }

    fn size() -> SurfaceSize {
        SurfaceSize::new(1000, 600, 1.0)
    }

    #[test]
    fn projection_is_deterministic() {
        let p = Point3::new(123.4, -56.7, 89.0);
        let a = project(p, &size(), 0.37, &tuning());
        let b = project(p, &size(), 0.37, &tuning());
        assert_eq!(a.x.to_bits(), b.x.to_bits());
        assert_eq!(a.y.to_bits(), b.y.to_bits());
        assert_eq!(a.scale.to_bits(), b.scale.to_bits());
    }

    #[test]
    fn angles_hit_extremes_and_interpolate_linearly() {
        let t = tuning();
        let (yaw0, pitch0) = yaw_pitch(0.0, &t);
        assert_relative_eq!(yaw0, (-28.0f32).to_radians());
        assert_relative_eq!(pitch0, (-18.0f32).to_radians());

        let (yaw1, pitch1) = yaw_pitch(1.0, &t);
        assert_relative_eq!(yaw1, 0.0);
        assert_relative_eq!(pitch1, 0.0);

        for i in 0..=10 {
            let progress = i as f32 / 10.0;
            let (yaw, pitch) = yaw_pitch(progress, &t);
            assert_relative_eq!(yaw, (1.0 - progress) * yaw0, epsilon = 1e-5);
            assert_relative_eq!(pitch, (1.0 - progress) * pitch0, epsilon = 1e-5);
        }
    }

    #[test]
    fn face_on_projection_is_centered() {
        let t = tuning();
        let s = size();
        let origin = project(Point3::new(0.0, 0.0, 0.0), &s, 1.0, &t);
        assert_relative_eq!(origin.x, 500.0);
        assert_relative_eq!(origin.y, 600.0 * 0.46);

        // No yaw at progress 1: symmetric x offsets stay symmetric.
        let left = project(Point3::new(-120.0, 0.0, 0.0), &s, 1.0, &t);
        let right = project(Point3::new(120.0, 0.0, 0.0), &s, 1.0, &t);
        assert_relative_eq!(500.0 - left.x, right.x - 500.0, epsilon = 1e-3);
        assert_relative_eq!(left.y, right.y, epsilon = 1e-3);
    }

    #[test]
    fn closer_points_project_larger() {
        let t = tuning();
        let s = size();
        // Face-on, view z equals world z; walk the point toward the camera.
        let far = project(Point3::new(0.0, 0.0, 200.0), &s, 1.0, &t);
        let mid = project(Point3::new(0.0, 0.0, 0.0), &s, 1.0, &t);
        let near = project(Point3::new(0.0, 0.0, -200.0), &s, 1.0, &t);
        assert!(near.scale > mid.scale);
        assert!(mid.scale > far.scale);
    }

    #[test]
    fn finite_inputs_never_produce_nan() {
        let t = tuning();
        let s = size();
        let points = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(-340.0, 222.0, 26.0),
            Point3::new(720.0, -222.0, -26.0),
            Point3::new(1.0e6, -1.0e6, 1.0e3),
        ];
        for i in 0..=20 {
            let progress = i as f32 / 20.0;
            for p in points {
                let out = project(p, &s, progress, &t);
                assert!(out.x.is_finite() && out.y.is_finite() && out.scale.is_finite());
            }
        }
    }

    #[test]
    fn dpr_does_not_change_logical_projection() {
        let t = tuning();
        let p = Point3::new(80.0, -40.0, 10.0);
        let low = project(p, &SurfaceSize::new(1000, 600, 1.0), 0.4, &t);
        let high = project(p, &SurfaceSize::new(2000, 1200, 2.0), 0.4, &t);
        assert!(relative_eq!(low.x, high.x, epsilon = 1e-3));
        assert!(relative_eq!(low.y, high.y, epsilon = 1e-3));
    }

    #[test]
    fn bogus_dpr_falls_back_to_one() {
        let s = SurfaceSize::new(100, 100, 0.0);
        assert_relative_eq!(s.device_pixel_ratio, 1.0);
        let s = SurfaceSize::new(100, 100, f32::NAN);
        assert_relative_eq!(s.device_pixel_ratio, 1.0);
    }
}
