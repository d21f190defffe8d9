//! Per-scene resource selection for the end sequence.
//!
//! Each cutscene is described by a [`CutsceneProfile`] row. Values that depend
//! on the player's pilot are expressed as [`PilotValue::Offset`] so the
//! dispatcher in [`bind`] stays free of per-scene branches.

use cutscene_text::{Localization, LookupError, TextId};
use serde::Serialize;
use thiserror::Error;

use crate::host::{AnimationRef, Color, Entity};
use crate::scene::{PlayerState, SceneId};

/// Music cue for the closing theme.
pub const END_THEME: &str = "END.PSM";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "cue", rename_all = "snake_case")]
pub enum AudioAction {
    /// Leave whatever is playing untouched.
    Continue,
    /// Stop the current track, then start the named cue.
    Restart(&'static str),
}

/// A number that is either fixed or offset by the player's pilot id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PilotValue {
    Fixed(u32),
    Offset(u32),
}

impl PilotValue {
    /// `None` when the offset does not fit in a `u32`.
    pub fn resolve(self, player: &PlayerState) -> Option<u32> {
        match self {
            PilotValue::Fixed(value) => Some(value),
            PilotValue::Offset(base) => base.checked_add(player.pilot_id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnRule {
    pub animation: PilotValue,
    pub sprite: Option<PilotValue>,
    pub halted: bool,
}

impl SpawnRule {
    fn spawn(&self, scene: SceneId, player: &PlayerState) -> Result<Entity, BindError> {
        let mut entity = Entity::new([0, 0]);
        entity.set_animation(AnimationRef(pilot_value(self.animation, scene, player)?));
        if let Some(sprite) = self.sprite {
            entity.select_sprite(pilot_value(sprite, scene, player)?);
        }
        entity.set_halted(self.halted);
        Ok(entity)
    }
}

fn pilot_value(value: PilotValue, scene: SceneId, player: &PlayerState) -> Result<u32, BindError> {
    value.resolve(player).ok_or(BindError::PilotOutOfRange {
        scene,
        pilot: player.pilot_id,
    })
}

#[derive(Debug, Clone, Copy)]
pub struct CutsceneProfile {
    pub scene: SceneId,
    pub audio: AudioAction,
    pub text: PilotValue,
    pub text_x: u32,
    pub text_y: u32,
    pub text_width: u32,
    pub color: Color,
    pub spawns: &'static [SpawnRule],
}

const END1_SPAWNS: &[SpawnRule] = &[
    // Pilot portrait, frozen on the pilot's sprite.
    SpawnRule {
        animation: PilotValue::Fixed(3),
        sprite: Some(PilotValue::Offset(0)),
        halted: true,
    },
    SpawnRule {
        animation: PilotValue::Offset(10),
        sprite: None,
        halted: false,
    },
];

pub const PROFILES: &[CutsceneProfile] = &[
    CutsceneProfile {
        scene: SceneId::End,
        audio: AudioAction::Restart(END_THEME),
        text: PilotValue::Fixed(992),
        text_x: 10,
        text_y: 5,
        text_width: 300,
        color: Color::YELLOW,
        spawns: &[],
    },
    CutsceneProfile {
        scene: SceneId::End1,
        audio: AudioAction::Continue,
        text: PilotValue::Offset(993),
        text_x: 10,
        text_y: 160,
        text_width: 300,
        color: Color::RED,
        spawns: END1_SPAWNS,
    },
    CutsceneProfile {
        scene: SceneId::End2,
        audio: AudioAction::Continue,
        text: PilotValue::Offset(1003),
        text_x: 10,
        text_y: 160,
        text_width: 300,
        color: Color::GREEN,
        spawns: &[],
    },
];

pub fn profile(scene: SceneId) -> Option<&'static CutsceneProfile> {
    PROFILES.iter().find(|profile| profile.scene == scene)
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    #[error("{0} is not a cutscene scene")]
    NotACutscene(SceneId),
    #[error("text for {scene} could not be resolved: {source}")]
    UnknownTextId {
        scene: SceneId,
        #[source]
        source: LookupError,
    },
    #[error("pilot {pilot} is out of range for {scene}")]
    PilotOutOfRange { scene: SceneId, pilot: u32 },
}

/// Everything a cutscene needs for one activation. Entities are handed over
/// by value; whoever receives them owns them.
#[derive(Debug, Clone)]
pub struct CutsceneResources<'s> {
    pub scene: SceneId,
    pub text_id: TextId,
    pub text: &'s str,
    pub audio: AudioAction,
    pub text_x: u32,
    pub text_y: u32,
    pub text_width: u32,
    pub color: Color,
    pub entities: Vec<Entity>,
}

pub fn bind<'s>(
    scene: SceneId,
    player: &PlayerState,
    strings: &'s dyn Localization,
) -> Result<CutsceneResources<'s>, BindError> {
    let profile = profile(scene).ok_or(BindError::NotACutscene(scene))?;
    let text_id = TextId(pilot_value(profile.text, scene, player)?);
    let text = strings
        .resolve(text_id)
        .map_err(|source| BindError::UnknownTextId { scene, source })?;
    let entities = profile
        .spawns
        .iter()
        .map(|rule| rule.spawn(scene, player))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CutsceneResources {
        scene,
        text_id,
        text,
        audio: profile.audio,
        text_x: profile.text_x,
        text_y: profile.text_y,
        text_width: profile.text_width,
        color: profile.color,
        entities,
    })
}
