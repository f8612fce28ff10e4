//! Branch segments and the emitter they are handed to.
//!
//! The interpreter never retains branches. Each [`Draw`](crate::TurtleOp::Draw)
//! produces one complete segment that goes straight to a [`BranchEmitter`];
//! rendering or instantiating it is the emitter's business.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A drawn segment, start then end.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    pub start: Vec3,
    pub end: Vec3,
}

impl Branch {
    pub fn new(start: Vec3, end: Vec3) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f32 {
        self.start.distance(self.end)
    }

    /// Unit vector from start to end, or zero for a degenerate segment.
    pub fn direction(&self) -> Vec3 {
        (self.end - self.start).normalize_or_zero()
    }
}

/// Receives every branch the turtle draws.
pub trait BranchEmitter {
    fn emit(&mut self, start: Vec3, end: Vec3);
}

impl<F> BranchEmitter for F
where
    F: FnMut(Vec3, Vec3),
{
    fn emit(&mut self, start: Vec3, end: Vec3) {
        self(start, end)
    }
}

/// An emitter that keeps every branch in draw order.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BranchCollector {
    pub branches: Vec<Branch>,
}

impl BranchCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.branches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }

    /// Sum of all branch lengths.
    pub fn total_length(&self) -> f32 {
        self.branches.iter().map(Branch::length).sum()
    }

    pub fn into_branches(self) -> Vec<Branch> {
        self.branches
    }
}

impl BranchEmitter for BranchCollector {
    fn emit(&mut self, start: Vec3, end: Vec3) {
        self.branches.push(Branch::new(start, end));
    }
}
