//! Step pacing between draws.
//!
//! Pacing only decides *when* the next branch is drawn, never *what* is drawn.
//! A pacer may also stop the walk early; branches emitted before that stay emitted.

use std::ops::ControlFlow;
use std::time::Duration;

/// Called before every draw step with the 0-based index of that step.
pub trait Pacer {
    fn before_step(&mut self, step: usize) -> ControlFlow<()>;
}

impl<F> Pacer for F
where
    F: FnMut(usize) -> ControlFlow<()>,
{
    fn before_step(&mut self, step: usize) -> ControlFlow<()> {
        self(step)
    }
}

/// Draws as fast as possible.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoPacing;

impl Pacer for NoPacing {
    fn before_step(&mut self, _step: usize) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }
}

/// Blocks the calling thread for a fixed delay before each draw.
#[derive(Clone, Copy, Debug, Default)]
pub struct SleepPacer {
    pub delay: Duration,
}

impl SleepPacer {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Pacer for SleepPacer {
    fn before_step(&mut self, _step: usize) -> ControlFlow<()> {
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
        ControlFlow::Continue(())
    }
}

/// Stops the walk once `limit` draws have happened.
#[derive(Clone, Copy, Debug)]
pub struct StepLimit {
    pub limit: usize,
}

impl Pacer for StepLimit {
    fn before_step(&mut self, step: usize) -> ControlFlow<()> {
        if step < self.limit {
            ControlFlow::Continue(())
        } else {
            ControlFlow::Break(())
        }
    }
}
