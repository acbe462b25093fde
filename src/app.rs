use crate::braille::BrailleSurface;
use crate::config::AppConfig;
use crate::controller::FieldController;
use crate::error::AppError;
use crate::resize::ResizeNotifier;
use crate::scheduler::FrameClock;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Focus state for parameter editing in the sidebar
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Focus {
    #[default]
    None,
    Density,
    Speed,
    LinkDistance,
    Opacity,
    // Controls box (not a param)
    Controls,
}

impl Focus {
    /// Tab cycles through parameters in display order
    pub fn next(&self) -> Focus {
        match self {
            Focus::None | Focus::Controls => Focus::Density,
            Focus::Density => Focus::Speed,
            Focus::Speed => Focus::LinkDistance,
            Focus::LinkDistance => Focus::Opacity,
            Focus::Opacity => Focus::Density,
        }
    }

    pub fn prev(&self) -> Focus {
        match self {
            Focus::None | Focus::Controls => Focus::Opacity,
            Focus::Density => Focus::Opacity,
            Focus::Speed => Focus::Density,
            Focus::LinkDistance => Focus::Speed,
            Focus::Opacity => Focus::LinkDistance,
        }
    }

    /// Check if focus is on a parameter (not Controls or None)
    pub fn is_param(&self) -> bool {
        !matches!(self, Focus::None | Focus::Controls)
    }
}

/// Main application state
pub struct App {
    pub field: FieldController,
    pub surface: BrailleSurface,
    pub clock: FrameClock,
    pub resize: ResizeNotifier,
    pub config: AppConfig,
    pub config_path: Option<PathBuf>,
    pub focus: Focus,
    pub fullscreen_mode: bool,
    pub show_help: bool,
    pub help_scroll: u16,
    pub controls_scroll: u16,
    /// One-line feedback shown in the status box
    pub status_message: Option<String>,
    /// Source of per-field random generators
    seeder: StdRng,
}

impl App {
    pub fn new(config: AppConfig, config_path: Option<PathBuf>, seed: Option<u64>) -> Self {
        let mut seeder = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let field_rng = StdRng::seed_from_u64(seeder.gen());
        Self {
            field: FieldController::new(config.field, field_rng),
            surface: BrailleSurface::new(config.pixel_scale, config.field.global_opacity),
            clock: FrameClock::with_fps(config.fps),
            resize: ResizeNotifier::new(),
            config,
            config_path,
            focus: Focus::Controls,
            fullscreen_mode: false,
            show_help: false,
            help_scroll: 0,
            controls_scroll: 0,
            status_message: None,
            seeder,
        }
    }

    /// Give the surface its canvas region. Mounts the field on first use,
    /// afterwards notifies resize subscribers.
    pub fn resize(&mut self, canvas_width: u16, canvas_height: u16) {
        self.surface.attach(canvas_width, canvas_height);
        if self.field.subscription().is_none() {
            self.field
                .mount(&mut self.surface, &mut self.clock, &mut self.resize);
            return;
        }
        for id in self.resize.notify() {
            if self.field.subscription() == Some(id) {
                self.field.on_resize(&mut self.surface);
            }
        }
    }

    /// Run every frame that is due
    pub fn tick(&mut self, now: Instant) {
        for handle in self.clock.due_frames(now) {
            self.field.on_frame(handle, &mut self.surface, &mut self.clock);
        }
    }

    /// How long the event loop may wait for input before the next frame
    pub fn poll_timeout(&self, now: Instant) -> Duration {
        self.clock
            .time_until_next(now)
            .unwrap_or_else(|| self.clock.interval())
    }

    /// Tear down the current field and mount a fresh one with the current config
    pub fn remount(&mut self) {
        self.field.unmount(&mut self.clock, &mut self.resize);
        let paused = self.field.is_paused();
        self.field = FieldController::new(self.config.field, StdRng::seed_from_u64(self.seeder.gen()));
        if paused {
            self.field.toggle_pause();
        }
        self.surface.set_opacity(self.config.field.global_opacity);
        self.field
            .mount(&mut self.surface, &mut self.clock, &mut self.resize);
    }

    /// Handle adjusting the currently focused parameter
    pub fn adjust_focused_up(&mut self) {
        self.adjust_focused(1.0);
    }

    /// Handle adjusting the currently focused parameter
    pub fn adjust_focused_down(&mut self) {
        self.adjust_focused(-1.0);
    }

    fn adjust_focused(&mut self, sign: f32) {
        let field = &mut self.config.field;
        match self.focus {
            Focus::None | Focus::Controls => return,
            Focus::Density => field.adjust_density(10.0 * sign),
            Focus::Speed => field.adjust_speed(0.1 * sign),
            Focus::LinkDistance => field.adjust_max_link_distance(10.0 * sign),
            Focus::Opacity => field.adjust_global_opacity(0.05 * sign),
        }
        self.remount();
    }

    /// Navigate to next parameter (Tab)
    pub fn next_focus(&mut self) {
        self.focus = self.focus.next();
    }

    /// Navigate to previous parameter (Shift+Tab)
    pub fn prev_focus(&mut self) {
        self.focus = self.focus.prev();
    }

    /// Toggle pause state
    pub fn toggle_pause(&mut self) {
        self.field.toggle_pause();
    }

    /// Replace the particle population
    pub fn reseed(&mut self) {
        self.field.reseed(&mut self.surface);
    }

    /// Toggle fullscreen mode. The caller resizes the surface afterwards.
    pub fn toggle_fullscreen(&mut self) {
        self.fullscreen_mode = !self.fullscreen_mode;
    }

    /// Toggle help overlay
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
        if self.show_help {
            self.help_scroll = 0; // Reset scroll when opening
        }
    }

    /// Scroll help content up
    pub fn scroll_help_up(&mut self) {
        self.help_scroll = self.help_scroll.saturating_sub(1);
    }

    /// Scroll help content down
    pub fn scroll_help_down(&mut self, max_scroll: u16) {
        self.help_scroll = (self.help_scroll + 1).min(max_scroll);
    }

    /// Scroll controls box up
    pub fn scroll_controls_up(&mut self) {
        self.controls_scroll = self.controls_scroll.saturating_sub(1);
    }

    /// Scroll controls box down
    pub fn scroll_controls_down(&mut self, max_scroll: u16) {
        self.controls_scroll = (self.controls_scroll + 1).min(max_scroll);
    }

    /// Write the current config to the config path
    pub fn save_config(&mut self) {
        let Some(path) = self.config_path.clone() else {
            log::warn!("{}", AppError::NoConfigDir);
            self.status_message = Some("No config path".to_string());
            return;
        };
        match self.config.save_to_file(&path) {
            Ok(()) => {
                log::info!("saved config to {}", path.display());
                self.status_message = Some("Config saved".to_string());
            }
            Err(e) => {
                log::error!("{}", e);
                self.status_message = Some("Save failed".to_string());
            }
        }
    }

    /// Unmount the field before the terminal goes away
    pub fn shutdown(&mut self) {
        self.field.unmount(&mut self.clock, &mut self.resize);
        self.surface.detach();
    }
}
