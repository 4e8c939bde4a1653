//=========================================================================
// Render Collaborator
//=========================================================================
//
// The drawing surface screens render through.
//
// The stack never draws anything itself. It walks screens bottom-to-top
// and hands each one a `RenderFrame`: the host's `Renderer` plus that
// screen's transition progress, from which the screen derives its blend.
//
// Architecture:
//   ScreenManager::render() → RenderFrame { renderer, transition } → Screen
//
//=========================================================================

//=== External Dependencies ===============================================

use std::ops::{Add, Mul, Sub};
use std::time::Duration;

//=== Internal Dependencies ===============================================

use crate::core::flags::SessionFlags;
use crate::core::screen::TransitionState;

//=== Geometry ============================================================

/// 2D vector in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Unit vector in the same direction, or zero for a zero vector.
    pub fn normalized(self) -> Self {
        let len = self.length();
        if len > f32::EPSILON {
            Self::new(self.x / len, self.y / len)
        } else {
            Self::ZERO
        }
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// Size of the drawable area. Also the playable bounds for gameplay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}

//=== Color ===============================================================

/// Straight RGBA color, channels in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const YELLOW: Color = Color::rgb(1.0, 1.0, 0.0);
    pub const TITLE: Color = Color::rgb(0.753, 0.753, 0.753);
    pub const CORNFLOWER_BLUE: Color = Color::rgb(0.392, 0.584, 0.929);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Same color with alpha multiplied by `alpha`.
    pub fn faded(self, alpha: f32) -> Self {
        Self {
            a: self.a * alpha.clamp(0.0, 1.0),
            ..self
        }
    }
}

//=== Renderer ============================================================

/// Host-provided drawing backend.
pub trait Renderer {
    /// Size of the render target.
    fn viewport(&self) -> Viewport;

    fn clear(&mut self, color: Color);

    fn draw_text(&mut self, text: &str, position: Vec2, color: Color, scale: f32);

    fn draw_sprite(&mut self, sprite: &str, rect: Rect, color: Color);

    /// Darkens everything drawn so far by `alpha` (0 = untouched, 1 = black).
    fn fade_to_black(&mut self, alpha: f32);

    /// Size of `text` at scale 1. Default assumes a fixed-width font.
    fn measure_text(&self, text: &str) -> Vec2 {
        Vec2::new(text.chars().count() as f32 * 12.0, 24.0)
    }
}

//=== DrawList ============================================================

/// One recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    Text {
        text: String,
        position: Vec2,
        color: Color,
        scale: f32,
    },
    Sprite {
        sprite: String,
        rect: Rect,
        color: Color,
    },
    FadeToBlack(f32),
}

/// Headless renderer that records every call.
///
/// Used when no graphics backend is attached and throughout the tests.
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    viewport: Viewport,
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Drops recorded commands, keeping capacity.
    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    /// Texts drawn so far, in order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

impl Renderer for DrawList {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn clear(&mut self, color: Color) {
        self.commands.push(DrawCommand::Clear(color));
    }

    fn draw_text(&mut self, text: &str, position: Vec2, color: Color, scale: f32) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            position,
            color,
            scale,
        });
    }

    fn draw_sprite(&mut self, sprite: &str, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::Sprite {
            sprite: sprite.to_string(),
            rect,
            color,
        });
    }

    fn fade_to_black(&mut self, alpha: f32) {
        self.commands.push(DrawCommand::FadeToBlack(alpha));
    }
}

//=== RenderFrame =========================================================

/// What a screen gets when it is asked to draw.
pub struct RenderFrame<'a> {
    /// Backend to draw with.
    pub renderer: &'a mut dyn Renderer,

    /// Time since the previous frame.
    pub elapsed: Duration,

    /// Process-wide flags, read-only while drawing.
    pub flags: &'a SessionFlags,

    pub(crate) state: TransitionState,
    pub(crate) progress: f32,
}

impl<'a> RenderFrame<'a> {
    pub fn state(&self) -> TransitionState {
        self.state
    }

    /// Transition progress: 0 = fully off, 1 = fully on.
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Blend factor for this screen's content.
    pub fn alpha(&self) -> f32 {
        self.progress
    }

    pub fn viewport(&self) -> Viewport {
        self.renderer.viewport()
    }

    /// Slide offset used by menus: 0 when fully on, 1 when fully off.
    pub fn slide_offset(&self) -> f32 {
        let off = 1.0 - self.progress;
        off * off
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
