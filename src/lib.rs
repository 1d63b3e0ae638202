//! Scroll-driven 3D monitor renderer.
//!
//! A CPU rasterizer that paints a stylized desktop monitor into a
//! [`tiny_skia::Pixmap`] as it "reveals" from a tilted, viewed-from-below
//! pose to face-on, driven by a single scroll-derived progress scalar.
//! The crate also ships the scroll driver that produces that scalar and a
//! frame-coalescing lifecycle controller that owns the drawing surface.

pub mod config;
pub mod geometry;
pub mod projection;
pub mod render;
pub mod scheduler;
pub mod scroll;
