//! Follow camera.
//!
//! The camera is a top-left offset into the world. It tracks the player
//! with a deadzone around the screen centre and closes the remaining
//! distance by a fixed fraction each tick.

use bastion_common::{Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Camera tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Fraction of the out-of-deadzone distance closed per tick
    pub lerp_speed: f32,
    /// Half-size of the centred box in which the target may move freely
    pub deadzone: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            lerp_speed: 0.1,
            deadzone: 100.0,
        }
    }
}

/// 2D follow camera.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// World position of the top-left corner of the view
    offset: Vec2,
    /// Viewport size in world units
    viewport: Vec2,
    /// Tuning
    config: CameraConfig,
}

impl Camera {
    /// Creates a camera at the world origin.
    #[must_use]
    pub fn new(viewport: Vec2, config: CameraConfig) -> Self {
        Self {
            offset: Vec2::ZERO,
            viewport,
            config,
        }
    }

    /// Moves the camera toward `target` (world space).
    pub fn update(&mut self, target: Vec2) {
        let screen = target - self.offset;
        let delta = screen - (self.viewport / 2.0).floor();
        self.offset.x += self.axis_step(delta.x);
        self.offset.y += self.axis_step(delta.y);
    }

    fn axis_step(&self, delta: f32) -> f32 {
        let zone = self.config.deadzone;
        if delta > zone {
            (delta - zone) * self.config.lerp_speed
        } else if delta < -zone {
            (delta + zone) * self.config.lerp_speed
        } else {
            0.0
        }
    }

    /// Top-left offset.
    #[must_use]
    pub const fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Offset X.
    #[must_use]
    pub fn x(&self) -> f32 {
        self.offset.x
    }

    /// Offset Y.
    #[must_use]
    pub fn y(&self) -> f32 {
        self.offset.y
    }

    /// Viewport size.
    #[must_use]
    pub const fn viewport(&self) -> Vec2 {
        self.viewport
    }

    /// Jumps to an offset.
    pub fn set_offset(&mut self, offset: Vec2) {
        self.offset = offset;
    }

    /// Converts a world position to screen space.
    #[must_use]
    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        world - self.offset
    }

    /// Converts a world rectangle to screen space.
    #[must_use]
    pub fn apply(&self, rect: &Rect) -> Rect {
        rect.translated(-self.offset)
    }

    /// World-space rectangle currently in view.
    #[must_use]
    pub fn view_rect(&self) -> Rect {
        Rect::new(self.offset.x, self.offset.y, self.viewport.x, self.viewport.y)
    }
}
