use std::fmt;

use cutscene_text::Localization;
use serde::{Deserialize, Serialize};

use crate::error::CutsceneError;
use crate::host::{AudioCallback, RenderLayers, TextRenderer, VideoBackend};

/// Identity of an activatable scene. `None` marks "no transition".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneId {
    End,
    End1,
    End2,
    Menu,
    None,
}

impl SceneId {
    pub fn as_str(self) -> &'static str {
        match self {
            SceneId::End => "END",
            SceneId::End1 => "END1",
            SceneId::End2 => "END2",
            SceneId::Menu => "MENU",
            SceneId::None => "NONE",
        }
    }

    pub fn is_cutscene(self) -> bool {
        matches!(self, SceneId::End | SceneId::End1 | SceneId::End2)
    }
}

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Return,
    Escape,
    Space,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp(Key),
    Quit,
}

impl InputEvent {
    pub const CONFIRM: InputEvent = InputEvent::KeyDown(Key::Return);

    pub fn is_confirm(&self) -> bool {
        *self == InputEvent::CONFIRM
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlayerState {
    /// Selected protagonist variant.
    pub pilot_id: u32,
}

impl PlayerState {
    pub fn with_pilot(pilot_id: u32) -> Self {
        PlayerState { pilot_id }
    }
}

/// Progression state shared by every scene plus the pending scene request.
#[derive(Debug, Default, Clone)]
pub struct GameState {
    players: Vec<PlayerState>,
    next_scene: Option<SceneId>,
}

impl GameState {
    pub fn new(players: Vec<PlayerState>) -> Self {
        GameState {
            players,
            next_scene: None,
        }
    }

    /// Player one, or a default pilot when no player has been registered.
    pub fn primary_player(&self) -> PlayerState {
        match self.players.first() {
            Some(player) => *player,
            None => {
                log::warn!("no player registered; falling back to pilot 0");
                PlayerState::default()
            }
        }
    }

    pub fn schedule_next_scene(&mut self, scene: SceneId) {
        self.next_scene = Some(scene);
    }

    pub fn next_scene(&self) -> Option<SceneId> {
        self.next_scene
    }

    pub fn take_next_scene(&mut self) -> Option<SceneId> {
        self.next_scene.take()
    }
}

/// Borrowed view of the host state a scene callback may touch.
pub struct SceneContext<'a> {
    pub game: &'a mut GameState,
    pub strings: &'a dyn Localization,
    pub audio: &'a dyn AudioCallback,
    pub video: &'a mut dyn VideoBackend,
    pub layers: &'a mut dyn RenderLayers,
    events: &'a mut Vec<String>,
}

impl<'a> SceneContext<'a> {
    pub fn new(
        game: &'a mut GameState,
        strings: &'a dyn Localization,
        audio: &'a dyn AudioCallback,
        video: &'a mut dyn VideoBackend,
        layers: &'a mut dyn RenderLayers,
        events: &'a mut Vec<String>,
    ) -> Self {
        SceneContext {
            game,
            strings,
            audio,
            video,
            layers,
            events,
        }
    }

    pub fn log_event(&mut self, event: impl Into<String>) {
        let event = event.into();
        log::debug!("{event}");
        self.events.push(event);
    }
}

/// Lifecycle callbacks the host invokes on the active scene.
pub trait Scene {
    fn id(&self) -> SceneId;

    fn on_activate(&mut self, ctx: &mut SceneContext<'_>) -> Result<(), CutsceneError>;

    /// Returns whether the event was consumed.
    fn on_input(&mut self, event: &InputEvent, ctx: &mut SceneContext<'_>) -> bool;

    fn render_overlay(&self, _renderer: &mut dyn TextRenderer) {}

    /// Index of the page currently on screen, for scenes that page text.
    fn page_index(&self) -> Option<usize> {
        None
    }

    fn on_deactivate(&mut self, _ctx: &mut SceneContext<'_>) {}
}
