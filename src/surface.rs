//! Nearest-point oracles used for surface-adaptive steering.

use bevy_math::primitives::Sphere;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Answers "what is the closest point on the reference surface to `query`?".
///
/// Must be defined everywhere the walk can reach; the interpreter does not
/// guard against out-of-domain answers.
pub trait SurfaceOracle {
    fn nearest_point(&self, query: Vec3) -> Vec3;
}

impl<F> SurfaceOracle for F
where
    F: Fn(Vec3) -> Vec3,
{
    fn nearest_point(&self, query: Vec3) -> Vec3 {
        self(query)
    }
}

/// A solid sphere, the usual thing for a plant to wrap around.
///
/// Behaves like a sphere collider: a query inside the sphere is its own
/// nearest point, anything outside projects onto the shell.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SphereSurface {
    pub center: Vec3,
    pub radius: f32,
}

impl SphereSurface {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self {
            center,
            radius: radius.abs(),
        }
    }

    fn primitive(&self) -> Sphere {
        Sphere::new(self.radius)
    }
}

impl Default for SphereSurface {
    fn default() -> Self {
        Self::new(Vec3::ZERO, 0.5)
    }
}

impl SurfaceOracle for SphereSurface {
    fn nearest_point(&self, query: Vec3) -> Vec3 {
        self.center + self.primitive().closest_point(query - self.center)
    }
}

/// No surface at all: every query is its own nearest point, which disables steering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoSurface;

impl SurfaceOracle for NoSurface {
    fn nearest_point(&self, query: Vec3) -> Vec3 {
        query
    }
}
