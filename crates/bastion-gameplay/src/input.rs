//! Input abstraction for player controls.
//!
//! Device polling lives outside the simulation. Each tick the simulation
//! receives one [`InputSnapshot`] from an [`InputSource`]. [`InputMapper`]
//! turns raw keyboard/mouse/stick state into snapshots, with keyboard
//! movement taking priority over the stick and mouse aim over stick aim.

use std::collections::VecDeque;

use bastion_common::Vec2;
use serde::{Deserialize, Serialize};

/// Default stick deadzone per axis.
pub const STICK_DEADZONE: f32 = 0.01;

/// Where an aim vector came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AimDevice {
    /// Pointer position in screen space
    #[default]
    Pointer,
    /// Unit direction from a stick
    Stick,
}

/// Aim input for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AimInput {
    /// Screen position (pointer) or direction (stick)
    pub vector: Vec2,
    /// Source device
    pub device: AimDevice,
}

impl AimInput {
    /// Aim at a screen-space pointer position.
    #[must_use]
    pub const fn pointer(position: Vec2) -> Self {
        Self {
            vector: position,
            device: AimDevice::Pointer,
        }
    }

    /// Aim along a stick direction.
    #[must_use]
    pub const fn stick(direction: Vec2) -> Self {
        Self {
            vector: direction,
            device: AimDevice::Stick,
        }
    }
}

/// Player intent sampled for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct InputSnapshot {
    /// Movement direction, length at most 1
    pub movement: Vec2,
    /// Aim
    pub aim: AimInput,
    /// Fire button held
    pub shooting: bool,
    /// Sprint button held
    pub sprinting: bool,
    /// Menu button went down this tick
    pub menu_pressed: bool,
}

impl InputSnapshot {
    /// Snapshot that only moves.
    #[must_use]
    pub fn moving(movement: Vec2) -> Self {
        Self {
            movement,
            ..Self::default()
        }
    }

    /// Returns this snapshot with sprint held.
    #[must_use]
    pub fn with_sprint(mut self) -> Self {
        self.sprinting = true;
        self
    }

    /// Returns this snapshot firing at `aim`.
    #[must_use]
    pub fn with_shot(mut self, aim: AimInput) -> Self {
        self.shooting = true;
        self.aim = aim;
        self
    }

    /// Movement clamped to unit length.
    #[must_use]
    pub fn clamped_movement(&self) -> Vec2 {
        if self.movement.is_finite() {
            self.movement.clamp_length_max(1.0)
        } else {
            Vec2::ZERO
        }
    }
}

/// Supplier of per-tick input.
pub trait InputSource {
    /// Samples the input for the next tick.
    fn sample(&mut self) -> InputSnapshot;
}

/// Replays a fixed list of snapshots, then idles.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    frames: VecDeque<InputSnapshot>,
    repeat_last: bool,
    last: InputSnapshot,
}

impl ScriptedInput {
    /// Creates a script that idles once the frames run out.
    #[must_use]
    pub fn new(frames: impl IntoIterator<Item = InputSnapshot>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
            repeat_last: false,
            last: InputSnapshot::default(),
        }
    }

    /// Creates a script that keeps repeating its final frame.
    #[must_use]
    pub fn repeating(frames: impl IntoIterator<Item = InputSnapshot>) -> Self {
        Self {
            repeat_last: true,
            ..Self::new(frames)
        }
    }

    /// Appends `count` copies of `frame`.
    pub fn push_repeated(&mut self, frame: InputSnapshot, count: usize) {
        self.frames.extend(std::iter::repeat(frame).take(count));
    }

    /// Frames left before the script idles.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl InputSource for ScriptedInput {
    fn sample(&mut self) -> InputSnapshot {
        match self.frames.pop_front() {
            Some(frame) => {
                self.last = frame;
                frame
            },
            None if self.repeat_last => self.last,
            None => InputSnapshot::default(),
        }
    }
}

/// State of a button (pressed, just pressed, released).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ButtonState {
    /// Whether the button is currently held down
    pub pressed: bool,
    /// Whether the button was just pressed this frame
    pub just_pressed: bool,
    /// Whether the button was just released this frame
    pub just_released: bool,
}

impl ButtonState {
    /// Update the button state based on whether it's currently pressed.
    pub fn update(&mut self, is_pressed: bool) {
        self.just_pressed = is_pressed && !self.pressed;
        self.just_released = !is_pressed && self.pressed;
        self.pressed = is_pressed;
    }
}

/// Directional keys held this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MoveKeys {
    /// Left
    pub left: bool,
    /// Right
    pub right: bool,
    /// Up
    pub up: bool,
    /// Down
    pub down: bool,
}

impl MoveKeys {
    /// Movement vector from the held keys, diagonal-normalised.
    #[must_use]
    pub fn vector(self) -> Vec2 {
        let x = f32::from(i8::from(self.right) - i8::from(self.left));
        let y = f32::from(i8::from(self.down) - i8::from(self.up));
        Vec2::new(x, y).normalize_or_zero()
    }
}

/// Raw device state polled by the platform layer.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RawInput {
    /// Directional keys
    pub keys: MoveKeys,
    /// Left stick
    pub move_stick: Vec2,
    /// Right stick
    pub aim_stick: Vec2,
    /// Pointer position in screen space
    pub pointer: Vec2,
    /// Primary pointer button held
    pub pointer_down: bool,
    /// Fire key or button held
    pub fire_button: bool,
    /// Sprint key or button held
    pub sprint_button: bool,
    /// Menu key or button held
    pub menu_button: bool,
}

/// Zeroes stick axes whose magnitude is below `deadzone`.
#[must_use]
pub fn apply_deadzone(stick: Vec2, deadzone: f32) -> Vec2 {
    Vec2::new(
        if stick.x.abs() < deadzone { 0.0 } else { stick.x },
        if stick.y.abs() < deadzone { 0.0 } else { stick.y },
    )
}

/// Converts raw device state into snapshots.
#[derive(Debug, Clone)]
pub struct InputMapper {
    deadzone: f32,
    last_aim: AimInput,
    menu: ButtonState,
}

impl Default for InputMapper {
    fn default() -> Self {
        Self::new(STICK_DEADZONE)
    }
}

impl InputMapper {
    /// Creates a mapper with the given stick deadzone.
    #[must_use]
    pub fn new(deadzone: f32) -> Self {
        Self {
            deadzone,
            last_aim: AimInput::pointer(Vec2::X),
            menu: ButtonState::default(),
        }
    }

    /// Maps one tick of raw input.
    pub fn map(&mut self, raw: &RawInput) -> InputSnapshot {
        let keys = raw.keys.vector();
        let movement = if keys == Vec2::ZERO {
            apply_deadzone(raw.move_stick, self.deadzone).clamp_length_max(1.0)
        } else {
            keys
        };

        let aim = if raw.pointer_down {
            AimInput::pointer(raw.pointer)
        } else {
            let stick = apply_deadzone(raw.aim_stick, self.deadzone);
            match stick.try_normalize() {
                Some(direction) => AimInput::stick(direction),
                None => self.last_aim,
            }
        };
        self.last_aim = aim;

        self.menu.update(raw.menu_button);

        InputSnapshot {
            movement,
            aim,
            shooting: raw.pointer_down || raw.fire_button,
            sprinting: raw.sprint_button,
            menu_pressed: self.menu.just_pressed,
        }
    }
}
