use std::path::Path;

use anyhow::{Context, Result, ensure};
use serde::Deserialize;

/// Projection constants. These are deterministic tuning values, not runtime
/// state: hit-testing and drawing must agree on them, so they are injected
/// once at construction and held fixed.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct ProjectionTuning {
    /// Yaw at full tilt (progress = 0), degrees. Negative swings the body left.
    pub yaw_max_deg: f32,
    /// Pitch at full tilt, degrees. Negative tips the bottom toward the viewer.
    pub pitch_max_deg: f32,
    pub focal_length: f32,
    pub depth_offset: f32,
    /// Projection centre Y as a fraction of surface height when face-on.
    pub center_y_base: f32,
    /// Extra centre-Y fraction added at full tilt.
    pub center_y_tilt: f32,
}

impl Default for ProjectionTuning {
    fn default() -> Self {
        Self {
            yaw_max_deg: -28.0,
            pitch_max_deg: -18.0,
            focal_length: 2400.0,
            depth_offset: 600.0,
            center_y_base: 0.46,
            center_y_tilt: 0.02,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct ScrollTuning {
    /// Fraction of the viewport height that counts as 100% scroll.
    pub max_scroll_factor: f32,
    /// Companion element scale at progress = 0.
    pub scale_start: f32,
    /// Companion element scale at progress = 1.
    pub scale_end: f32,
    /// Companion element translate-Y in logical px at progress = 0.
    pub translate_y_start: f32,
    /// Viewports at most this wide skip the animation and pin progress to 1.
    pub narrow_viewport_max: f32,
}

impl Default for ScrollTuning {
    fn default() -> Self {
        Self {
            max_scroll_factor: 0.65,
            scale_start: 0.68,
            scale_end: 1.0,
            translate_y_start: 32.0,
            narrow_viewport_max: 640.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct RenderTuning {
    /// Ring samples for the stand neck. Must be even: the neck is drawn as
    /// two half-cylinder panels split at `segments / 2`.
    pub neck_segments: u32,
    /// Ring samples for the base ellipse.
    pub base_segments: u32,
    /// Texture-mapping subdivision: the screen quad becomes an S×S grid of
    /// affine-blitted triangle pairs. Higher is smoother and slower.
    pub texture_grid: u32,
}

impl Default for RenderTuning {
    fn default() -> Self {
        Self {
            neck_segments: 32,
            base_segments: 64,
            texture_grid: 6,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct SceneConfig {
    pub projection: ProjectionTuning,
    pub scroll: ScrollTuning,
    pub render: RenderTuning,
}

impl SceneConfig {
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config at {}", path.display()))?;
        serde_yaml::from_str(&text)
            .with_context(|| format!("failed to parse config at {}", path.display()))
    }

    pub fn validated(self) -> Result<Self> {
        let p = &self.projection;
        ensure!(
            p.focal_length.is_finite() && p.focal_length > 0.0,
            "projection.focal-length must be positive"
        );
        ensure!(
            p.depth_offset.is_finite() && p.depth_offset >= 0.0,
            "projection.depth-offset must be non-negative"
        );
        ensure!(
            p.focal_length + p.depth_offset > 0.0,
            "projection focal horizon must sit in front of the camera"
        );

        let s = &self.scroll;
        ensure!(
            s.max_scroll_factor.is_finite() && s.max_scroll_factor > 0.0,
            "scroll.max-scroll-factor must be positive"
        );
        ensure!(
            s.scale_start.is_finite() && s.scale_start > 0.0,
            "scroll.scale-start must be positive"
        );
        ensure!(
            s.scale_end.is_finite() && s.scale_end > 0.0,
            "scroll.scale-end must be positive"
        );
        ensure!(
            s.narrow_viewport_max.is_finite() && s.narrow_viewport_max >= 0.0,
            "scroll.narrow-viewport-max must be non-negative"
        );

        let r = &self.render;
        ensure!(
            r.neck_segments >= 4 && r.neck_segments % 2 == 0,
            "render.neck-segments must be an even number of at least 4"
        );
        ensure!(
            r.base_segments >= 3,
            "render.base-segments must be at least 3"
        );
        ensure!(r.texture_grid >= 1, "render.texture-grid must be at least 1");

        Ok(self)
    }
}
