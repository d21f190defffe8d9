//! Collaborators that record what the engine asked of them.
//!
//! Each recorder is a cheap handle around shared storage: clone it, give one
//! copy to the director, keep the other to inspect the log afterwards.

use std::{cell::RefCell, rc::Rc};

use serde::Serialize;

use crate::host::{
    AudioCallback, Color, Entity, Font, RenderLayer, RenderLayers, RendererKind, TextRenderer,
    VideoBackend,
};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AudioEvent {
    MusicPlay { cue: String },
    MusicStop,
}

#[derive(Clone, Default)]
pub struct RecordingAudioCallback {
    events: Rc<RefCell<Vec<AudioEvent>>>,
}

impl RecordingAudioCallback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<AudioEvent> {
        self.events.borrow().clone()
    }
}

impl AudioCallback for RecordingAudioCallback {
    fn music_play(&self, cue: &str) {
        self.events.borrow_mut().push(AudioEvent::MusicPlay {
            cue: cue.to_string(),
        });
    }

    fn music_stop(&self) {
        self.events.borrow_mut().push(AudioEvent::MusicStop);
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DrawCall {
    pub font: Font,
    pub text: String,
    pub x: u32,
    pub y: u32,
    pub max_width: u32,
    pub color: Color,
}

#[derive(Clone, Default)]
pub struct RecordingRenderer {
    calls: Rc<RefCell<Vec<DrawCall>>>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<DrawCall> {
        self.calls.borrow().clone()
    }

    pub fn last_text(&self) -> Option<String> {
        self.calls.borrow().last().map(|call| call.text.clone())
    }
}

impl TextRenderer for RecordingRenderer {
    fn draw_wrapped(
        &mut self,
        font: Font,
        text: &str,
        x: u32,
        y: u32,
        max_width: u32,
        color: Color,
    ) {
        self.calls.borrow_mut().push(DrawCall {
            font,
            text: text.to_string(),
            x,
            y,
            max_width,
            color,
        });
    }
}

#[derive(Clone, Default)]
pub struct RecordingVideo {
    selections: Rc<RefCell<Vec<RendererKind>>>,
}

impl RecordingVideo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selections(&self) -> Vec<RendererKind> {
        self.selections.borrow().clone()
    }
}

impl VideoBackend for RecordingVideo {
    fn select_renderer(&mut self, kind: RendererKind) {
        self.selections.borrow_mut().push(kind);
    }
}

/// Render-layer collection that keeps every entity it is given, in order.
#[derive(Clone, Default)]
pub struct LayerStack {
    entities: Rc<RefCell<Vec<(RenderLayer, Entity)>>>,
}

impl LayerStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn layer(&self, layer: RenderLayer) -> Vec<Entity> {
        self.entities
            .borrow()
            .iter()
            .filter(|(entry_layer, _)| *entry_layer == layer)
            .map(|(_, entity)| entity.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entities.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.borrow().is_empty()
    }
}

impl RenderLayers for LayerStack {
    fn add_entity(&mut self, entity: Entity, layer: RenderLayer) {
        self.entities.borrow_mut().push((layer, entity));
    }
}
