//! Lifecycle of one mounted particle field.
//!
//! ```text
//! Unmounted --mount--> Measuring --seeded--> Running --unmount--> Unmounted
//!                          ^                    |
//!                          +------resize--------+
//! ```
//!
//! A mount against a surface without a drawing context does nothing and is
//! not retried. Mounting again after teardown starts a fresh population.

use crate::particle::{self, Particle};
use crate::renderer;
use crate::resize::{ResizeNotifier, SubscriptionId};
use crate::scheduler::{FrameHandle, FrameScheduler};
use crate::settings::FieldConfig;
use crate::stepper;
use crate::surface::Surface;
use rand::rngs::StdRng;
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    #[default]
    Unmounted,
    Measuring,
    Running,
}

impl Lifecycle {
    pub fn name(&self) -> &'static str {
        match self {
            Lifecycle::Unmounted => "UNMOUNTED",
            Lifecycle::Measuring => "MEASURING",
            Lifecycle::Running => "RUNNING",
        }
    }
}

/// Owns the particles, the pending frame and the resize subscription of one field
pub struct FieldController<R: Rng = StdRng> {
    config: FieldConfig,
    rng: R,
    state: Lifecycle,
    particles: Vec<Particle>,
    width: i32,
    height: i32,
    frame: Option<FrameHandle>,
    subscription: Option<SubscriptionId>,
    paused: bool,
    link_count: usize,
    frames_rendered: u64,
}

impl<R: Rng> FieldController<R> {
    pub fn new(config: FieldConfig, rng: R) -> Self {
        Self {
            config,
            rng,
            state: Lifecycle::Unmounted,
            particles: Vec::new(),
            width: 0,
            height: 0,
            frame: None,
            subscription: None,
            paused: false,
            link_count: 0,
            frames_rendered: 0,
        }
    }

    /// Attach to a surface and start the frame loop.
    /// Returns false when already mounted or when the surface has no context yet.
    pub fn mount<S, F>(
        &mut self,
        surface: &mut S,
        scheduler: &mut F,
        resize: &mut ResizeNotifier,
    ) -> bool
    where
        S: Surface,
        F: FrameScheduler + ?Sized,
    {
        if self.state != Lifecycle::Unmounted {
            return false;
        }
        if surface.context().is_none() {
            log::debug!("surface has no drawing context, skipping mount");
            return false;
        }

        self.measure(surface);
        self.subscription = Some(resize.subscribe());
        self.frame = Some(scheduler.request_frame());
        self.frames_rendered = 0;
        self.state = Lifecycle::Running;
        log::info!(
            "field mounted at {}x{} with {} particles",
            self.width,
            self.height,
            self.particles.len()
        );
        true
    }

    /// Run one scheduled frame: step, render, then request the next frame.
    /// Stale or foreign handles are ignored.
    pub fn on_frame<S, F>(&mut self, handle: FrameHandle, surface: &mut S, scheduler: &mut F) -> bool
    where
        S: Surface,
        F: FrameScheduler + ?Sized,
    {
        if self.state != Lifecycle::Running || self.frame != Some(handle) {
            return false;
        }
        self.frame = None;

        let (width, height) = (self.width as f32, self.height as f32);
        if !self.paused {
            stepper::advance(&mut self.particles, width, height);
        }
        if let Some(ctx) = surface.context() {
            self.link_count = renderer::render(
                ctx,
                width,
                height,
                &self.particles,
                self.config.max_link_distance,
                self.config.global_opacity,
            );
            self.frames_rendered += 1;
        }

        self.frame = Some(scheduler.request_frame());
        true
    }

    /// Re-measure and reseed after the host changed size
    pub fn on_resize<S: Surface>(&mut self, surface: &mut S) -> bool {
        if self.state != Lifecycle::Running {
            return false;
        }
        self.measure(surface);
        self.state = Lifecycle::Running;
        log::debug!(
            "field resized to {}x{}, reseeded {} particles",
            self.width,
            self.height,
            self.particles.len()
        );
        true
    }

    /// Replace the population without a size change
    pub fn reseed<S: Surface>(&mut self, surface: &mut S) -> bool {
        self.on_resize(surface)
    }

    /// Cancel the pending frame and release the resize subscription. Safe to repeat.
    pub fn unmount<F>(&mut self, scheduler: &mut F, resize: &mut ResizeNotifier)
    where
        F: FrameScheduler + ?Sized,
    {
        if let Some(handle) = self.frame.take() {
            scheduler.cancel_frame(handle);
        }
        if let Some(id) = self.subscription.take() {
            resize.unsubscribe(id);
        }
        if self.state != Lifecycle::Unmounted {
            log::info!("field unmounted after {} frames", self.frames_rendered);
        }
        self.particles.clear();
        self.link_count = 0;
        self.state = Lifecycle::Unmounted;
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    fn measure<S: Surface>(&mut self, surface: &mut S) {
        self.state = Lifecycle::Measuring;
        let (width, height) = surface.layout_size();
        surface.set_size(width.max(0) as u32, height.max(0) as u32);
        self.width = width;
        self.height = height;
        self.particles = particle::seed(width, height, &self.config, &mut self.rng);
    }

    pub fn state(&self) -> Lifecycle {
        self.state
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Last measured surface size
    pub fn size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    #[cfg(test)]
    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.frame
    }

    pub fn subscription(&self) -> Option<SubscriptionId> {
        self.subscription
    }

    /// Links drawn in the last rendered frame
    pub fn link_count(&self) -> usize {
        self.link_count
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }
}
