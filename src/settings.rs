use serde::{Deserialize, Serialize};

/// Parameters of one particle field. Fixed for the lifetime of a mounted
/// simulation; changing any of them means mounting a fresh field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FieldConfig {
    /// Particle count scale per unit area (100 = baseline)
    pub density: f32,
    /// Maximum per-axis velocity before randomization
    pub speed: f32,
    /// Pixel radius beyond which two particles are not linked
    pub max_link_distance: f32,
    /// Multiplier applied to link alpha and to the surface as a whole
    pub global_opacity: f32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            density: 100.0,
            speed: 0.5,
            max_link_distance: 150.0,
            global_opacity: 0.7,
        }
    }
}

impl FieldConfig {
    pub const DENSITY_RANGE: (f32, f32) = (0.0, 1000.0);
    pub const SPEED_RANGE: (f32, f32) = (0.0, 10.0);
    pub const LINK_DISTANCE_RANGE: (f32, f32) = (0.0, 1000.0);
    pub const OPACITY_RANGE: (f32, f32) = (0.0, 1.0);

    /// Clamp every field into its adjustable range
    pub fn clamped(self) -> Self {
        Self {
            density: self.density.clamp(Self::DENSITY_RANGE.0, Self::DENSITY_RANGE.1),
            speed: self.speed.clamp(Self::SPEED_RANGE.0, Self::SPEED_RANGE.1),
            max_link_distance: self
                .max_link_distance
                .clamp(Self::LINK_DISTANCE_RANGE.0, Self::LINK_DISTANCE_RANGE.1),
            global_opacity: self
                .global_opacity
                .clamp(Self::OPACITY_RANGE.0, Self::OPACITY_RANGE.1),
        }
    }

    /// Adjust density within bounds
    pub fn adjust_density(&mut self, delta: f32) {
        self.density = (self.density + delta).clamp(Self::DENSITY_RANGE.0, Self::DENSITY_RANGE.1);
    }

    /// Adjust speed within bounds
    pub fn adjust_speed(&mut self, delta: f32) {
        self.speed = (self.speed + delta).clamp(Self::SPEED_RANGE.0, Self::SPEED_RANGE.1);
    }

    /// Adjust link distance within bounds
    pub fn adjust_max_link_distance(&mut self, delta: f32) {
        self.max_link_distance = (self.max_link_distance + delta)
            .clamp(Self::LINK_DISTANCE_RANGE.0, Self::LINK_DISTANCE_RANGE.1);
    }

    /// Adjust global opacity within bounds
    pub fn adjust_global_opacity(&mut self, delta: f32) {
        self.global_opacity =
            (self.global_opacity + delta).clamp(Self::OPACITY_RANGE.0, Self::OPACITY_RANGE.1);
    }
}
