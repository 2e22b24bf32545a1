// src/stocking/occlusion/raster.rs
//! Coverage raster: every covered pixel keeps all (object, depth) samples that landed on it.

use bevy::prelude::*;

use crate::stocking::core::{Bounds, OcclusionSample};

/// Per-object pixel counts after depth resolution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Coverage {
    /// Pixels where this object is the nearest sample.
    pub visible: u32,
    /// Pixels this object covers at all.
    pub total: u32,
}

impl Coverage {
    /// `visible / total`, 0 for an object that covers nothing.
    pub fn ratio(&self) -> f32 {
        if self.total == 0 { 0.0 } else { self.visible as f32 / self.total as f32 }
    }
}

/// Orthographic raster looking down +X: grid x follows world Y, grid y follows
/// world Z, and depth is world X (smaller is nearer).
pub struct DepthRaster {
    width: usize,
    height: usize,
    origin: Vec2,
    pixels_per_unit: Vec2,
    cells: Vec<Vec<OcclusionSample>>,
    touched: Vec<usize>,
}

impl DepthRaster {
    /// Raster of `width × height` pixels stretched over the window's Y/Z face.
    pub fn new(window: &Bounds, width: u32, height: u32) -> Self {
        let (width, height) = (width.max(1) as usize, height.max(1) as usize);
        let min = window.min();
        let size = window.size();
        let per = |pixels: usize, span: f32| if span > 0.0 { pixels as f32 / span } else { 0.0 };
        Self {
            width,
            height,
            origin: Vec2::new(min.y, min.z),
            pixels_per_unit: Vec2::new(per(width, size.y), per(height, size.z)),
            cells: vec![Vec::new(); width * height],
            touched: Vec::new(),
        }
    }

    #[inline]
    fn project(&self, p: Vec3) -> Vec3 {
        let g = (Vec2::new(p.y, p.z) - self.origin) * self.pixels_per_unit;
        Vec3::new(g.x, g.y, p.x)
    }

    /// Rasterize one world-space triangle for `object`, whichever way it winds.
    pub fn rasterize(&mut self, object: u32, tri: &[Vec3; 3]) {
        let [a, b, c] = tri.map(|p| self.project(p));
        self.fill(object, a, b, c);
        self.fill(object, a, c, b);
    }

    /// Half-edge fill of a counter-clockwise (positive area) triangle in grid space.
    fn fill(&mut self, object: u32, a: Vec3, b: Vec3, c: Vec3) {
        let area = edge(a, b, c);
        if area <= 0.0 {
            return;
        }
        let lo = a.min(b).min(c);
        let hi = a.max(b).max(c);
        let x0 = lo.x.floor().max(0.0) as usize;
        let y0 = lo.y.floor().max(0.0) as usize;
        let x1 = (hi.x.ceil().max(0.0) as usize).min(self.width);
        let y1 = (hi.y.ceil().max(0.0) as usize).min(self.height);

        for py in y0..y1 {
            for px in x0..x1 {
                let p = Vec3::new(px as f32 + 0.5, py as f32 + 0.5, 0.0);
                let w0 = edge(b, c, p);
                let w1 = edge(c, a, p);
                let w2 = edge(a, b, p);
                if w0 <= 0.0 || w1 <= 0.0 || w2 <= 0.0 {
                    continue;
                }
                let depth = (w0 * a.z + w1 * b.z + w2 * c.z) / area;
                let idx = py * self.width + px;
                if self.cells[idx].is_empty() {
                    self.touched.push(idx);
                }
                self.cells[idx].push(OcclusionSample { object, depth });
            }
        }
    }

    /// Number of pixels holding at least one sample.
    pub fn covered_pixels(&self) -> usize {
        self.touched.len()
    }

    /// Resolve depth at every covered pixel. Objects are indexed `0..objects`.
    pub fn resolve(&self, objects: usize) -> Vec<Coverage> {
        let mut out = vec![Coverage::default(); objects];
        let mut samples: Vec<OcclusionSample> = Vec::new();
        let mut seen: Vec<u32> = Vec::new();

        for &idx in &self.touched {
            samples.clear();
            samples.extend_from_slice(&self.cells[idx]);
            samples.sort_by(|a, b| a.depth.total_cmp(&b.depth).then(a.object.cmp(&b.object)));

            if let Some(c) = out.get_mut(samples[0].object as usize) {
                c.visible += 1;
            }
            seen.clear();
            seen.extend(samples.iter().map(|s| s.object));
            seen.sort_unstable();
            seen.dedup();
            for &o in &seen {
                if let Some(c) = out.get_mut(o as usize) {
                    c.total += 1;
                }
            }
        }
        out
    }
}

/// 2D edge function on the x/y components; positive when `p` is left of `a → b`
/// in a y-up frame.
#[inline]
fn edge(a: Vec3, b: Vec3, p: Vec3) -> f32 {
    (p.x - a.x) * (b.y - a.y) - (p.y - a.y) * (b.x - a.x)
}
