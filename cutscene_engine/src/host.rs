//! Contracts for the collaborators a scene talks to: audio, video backend,
//! wrapped-text drawing, and the render layers that own spawned entities.

use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b, a: 0xff }
    }

    pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);
    pub const YELLOW: Color = Color::rgb(0xff, 0xff, 0x00);
    pub const RED: Color = Color::rgb(0xff, 0x00, 0x00);
    pub const GREEN: Color = Color::rgb(0x00, 0xff, 0x00);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Font {
    Small,
    Large,
}

/// Render layers composited by the host, bottom to top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderLayer {
    Bottom,
    Middle,
    Top,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RendererKind {
    Software,
    Hardware,
}

impl RendererKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RendererKind::Software => "software",
            RendererKind::Hardware => "hardware",
        }
    }
}

/// Index of an animation in the active scene's background animation table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct AnimationRef(pub u32);

/// Drawable object handed to the render layers.
///
/// A halted entity keeps showing its selected sprite instead of playing the
/// animation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entity {
    position: [i32; 2],
    animation: Option<AnimationRef>,
    sprite: Option<u32>,
    halted: bool,
}

impl Entity {
    pub fn new(position: [i32; 2]) -> Self {
        Entity {
            position,
            animation: None,
            sprite: None,
            halted: false,
        }
    }

    pub fn set_animation(&mut self, animation: AnimationRef) {
        self.animation = Some(animation);
    }

    pub fn select_sprite(&mut self, sprite: u32) {
        self.sprite = Some(sprite);
    }

    pub fn set_halted(&mut self, halted: bool) {
        self.halted = halted;
    }

    pub fn position(&self) -> [i32; 2] {
        self.position
    }

    pub fn animation(&self) -> Option<AnimationRef> {
        self.animation
    }

    pub fn sprite(&self) -> Option<u32> {
        self.sprite
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }
}

/// Routes music requests to the audio subsystem.
pub trait AudioCallback {
    fn music_play(&self, _cue: &str) {}
    fn music_stop(&self) {}
}

impl fmt::Debug for dyn AudioCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AudioCallback")
    }
}

pub trait TextRenderer {
    fn draw_wrapped(
        &mut self,
        font: Font,
        text: &str,
        x: u32,
        y: u32,
        max_width: u32,
        color: Color,
    );
}

/// Owner of every entity added to the scene graph.
pub trait RenderLayers {
    fn add_entity(&mut self, entity: Entity, layer: RenderLayer);
}

pub trait VideoBackend {
    fn select_renderer(&mut self, kind: RendererKind);
}
