//! Renderer contract and frame composition.
//!
//! The simulation never draws. [`render_frame`] walks a [`World`] and hands
//! screen-space shapes to whatever [`Renderer`] the host provides, coloured
//! from an explicit [`Theme`].

use bastion_common::{lerp, Rect, Vec2};
use bastion_gameplay::ProjectileKind;

use crate::world::World;

/// Stamina bar width in pixels.
pub const STAMINA_BAR_WIDTH: f32 = 40.0;
/// Stamina bar height in pixels.
pub const STAMINA_BAR_HEIGHT: f32 = 5.0;
/// Gap between the stamina bar and the top of the player.
pub const STAMINA_BAR_OFFSET: f32 = 10.0;

/// RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red
    pub r: u8,
    /// Green
    pub g: u8,
    /// Blue
    pub b: u8,
    /// Alpha
    pub a: u8,
}

impl Color {
    /// Opaque colour from RGB components.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Packs the colour as `0xRRGGBBAA`.
    #[must_use]
    pub const fn to_rgba_u32(self) -> u32 {
        (self.r as u32) << 24 | (self.g as u32) << 16 | (self.b as u32) << 8 | self.a as u32
    }

    /// Blends towards `other`; `t` is clamped to `[0, 1]`.
    #[must_use]
    pub fn interpolate(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let channel = |a: u8, b: u8| lerp(f32::from(a), f32::from(b), t) as u8;
        Self {
            r: channel(self.r, other.r),
            g: channel(self.g, other.g),
            b: channel(self.b, other.b),
            a: channel(self.a, other.a),
        }
    }
}

/// Colour palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    /// Clear colour
    pub background: Color,
    /// Walls
    pub wall: Color,
    /// Player body
    pub player: Color,
    /// Boss before its first phase change
    pub enemy: Color,
    /// Boss once a phase change completes
    pub enemy_enraged: Color,
    /// Player bolts
    pub player_bolt: Color,
    /// Basic enemy bolts
    pub basic_bolt: Color,
    /// Phase two bolts
    pub phase_two_bolt: Color,
    /// Predictive bolts
    pub predictive_bolt: Color,
    /// Stamina pickups
    pub item: Color,
    /// Empty part of the stamina bar
    pub stamina_empty: Color,
    /// Filled stamina bar
    pub stamina: Color,
    /// Filled stamina bar while exhausted
    pub stamina_exhausted: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}

impl Theme {
    /// Black on white.
    #[must_use]
    pub const fn light() -> Self {
        Self {
            background: Color::rgb(255, 255, 255),
            wall: Color::rgb(0, 0, 0),
            player: Color::rgb(0, 0, 255),
            enemy: Color::rgb(255, 0, 0),
            enemy_enraged: Color::rgb(128, 0, 128),
            player_bolt: Color::rgb(0, 0, 0),
            basic_bolt: Color::rgb(255, 0, 0),
            phase_two_bolt: Color::rgb(64, 0, 64),
            predictive_bolt: Color::rgb(128, 0, 128),
            item: Color::rgb(0, 255, 0),
            stamina_empty: Color::rgb(0, 0, 0),
            stamina: Color::rgb(0, 255, 0),
            stamina_exhausted: Color::rgb(255, 0, 0),
        }
    }

    /// Grey walls on black.
    #[must_use]
    pub const fn dark() -> Self {
        Self {
            background: Color::rgb(0, 0, 0),
            wall: Color::rgb(128, 128, 128),
            player_bolt: Color::rgb(128, 128, 128),
            stamina_empty: Color::rgb(128, 128, 128),
            ..Self::light()
        }
    }

    /// Boss colour for the given phase, blending during a transition.
    #[must_use]
    pub fn enemy_color(&self, phase: u8, transition: Option<f32>) -> Color {
        match transition {
            Some(progress) if progress < 1.0 => self.enemy.interpolate(self.enemy_enraged, progress),
            _ if phase > 1 => self.enemy_enraged,
            _ => self.enemy,
        }
    }

    /// Colour for a projectile kind.
    #[must_use]
    pub const fn projectile_color(&self, kind: ProjectileKind) -> Color {
        match kind {
            ProjectileKind::Basic => self.basic_bolt,
            ProjectileKind::PhaseTwo => self.phase_two_bolt,
            ProjectileKind::Predictive => self.predictive_bolt,
            ProjectileKind::PlayerBolt => self.player_bolt,
        }
    }
}

/// Drawing backend. Every coordinate is in screen space.
pub trait Renderer {
    /// Fills the whole frame.
    fn clear(&mut self, color: Color);

    /// Fills an axis-aligned rectangle.
    fn draw_rect(&mut self, rect: Rect, color: Color);

    /// Fills a circle.
    fn draw_circle(&mut self, center: Vec2, radius: f32, color: Color);
}

/// Draws one frame of `world`.
///
/// Back to front: walls, items, projectiles, the boss, the player and its
/// stamina bar.
pub fn render_frame(world: &World, renderer: &mut dyn Renderer, theme: &Theme) {
    let camera = world.camera();
    renderer.clear(theme.background);

    for wall in world.visible_walls() {
        renderer.draw_rect(camera.apply(&wall), theme.wall);
    }

    for item in world.items() {
        renderer.draw_circle(camera.world_to_screen(item.center()), item.visual_radius(), theme.item);
    }

    for projectile in world.projectiles() {
        renderer.draw_circle(
            camera.world_to_screen(projectile.center()),
            projectile.radius(),
            theme.projectile_color(projectile.kind()),
        );
    }

    if let Some(enemy) = world.enemy() {
        let color = theme.enemy_color(enemy.phase(), enemy.transition_progress(world.now_ms()));
        renderer.draw_circle(camera.world_to_screen(enemy.center()), enemy.radius(), color);
    }

    let player = world.player();
    if player.is_alive() {
        let center = camera.world_to_screen(player.center());
        renderer.draw_circle(center, player.radius(), theme.player);

        if player.stamina_bar_ticks() > 0 {
            let x = center.x - (STAMINA_BAR_WIDTH / 2.0).floor();
            let y = center.y - player.radius() - STAMINA_BAR_OFFSET;
            renderer.draw_rect(
                Rect::new(x, y, STAMINA_BAR_WIDTH, STAMINA_BAR_HEIGHT),
                theme.stamina_empty,
            );

            let fill = (player.stamina_fraction() * STAMINA_BAR_WIDTH).floor();
            let color = if player.is_exhausted() {
                theme.stamina_exhausted
            } else {
                theme.stamina
            };
            renderer.draw_rect(Rect::new(x, y, fill, STAMINA_BAR_HEIGHT), color);
        }
    }
}

/// A recorded draw call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCommand {
    /// [`Renderer::clear`]
    Clear(Color),
    /// [`Renderer::draw_rect`]
    Rect(Rect, Color),
    /// [`Renderer::draw_circle`]
    Circle(Vec2, f32, Color),
}

/// Renderer that keeps every call, for headless runs and tests.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    commands: Vec<DrawCommand>,
}

impl RecordingRenderer {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls since the last [`RecordingRenderer::take`].
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Removes and returns the recorded calls.
    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Number of circles drawn in `color`.
    #[must_use]
    pub fn circles_in(&self, color: Color) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Circle(_, _, col) if *col == color))
            .count()
    }
}

impl Renderer for RecordingRenderer {
    fn clear(&mut self, color: Color) {
        self.commands.push(DrawCommand::Clear(color));
    }

    fn draw_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::Rect(rect, color));
    }

    fn draw_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.commands.push(DrawCommand::Circle(center, radius, color));
    }
}
