use serde::Serialize;

use crate::host::AudioCallback;
use crate::scene::SceneId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Transition {
    pub from: SceneId,
    pub next: SceneId,
    /// Stop the music when leaving `from`.
    pub stop_audio: bool,
}

pub const TRANSITIONS: &[Transition] = &[
    Transition {
        from: SceneId::End,
        next: SceneId::End1,
        stop_audio: false,
    },
    Transition {
        from: SceneId::End1,
        next: SceneId::End2,
        stop_audio: false,
    },
    Transition {
        from: SceneId::End2,
        next: SceneId::Menu,
        stop_audio: true,
    },
];

pub fn transition(current: SceneId) -> Option<&'static Transition> {
    TRANSITIONS.iter().find(|entry| entry.from == current)
}

/// Scene that follows `current`, or [`SceneId::None`] when nothing is
/// scheduled after it.
pub fn next_scene(current: SceneId) -> SceneId {
    transition(current)
        .map(|entry| entry.next)
        .unwrap_or(SceneId::None)
}

/// Like [`next_scene`], but also performs the exit side effects.
pub fn apply_transition(current: SceneId, audio: &dyn AudioCallback) -> SceneId {
    match transition(current) {
        Some(entry) => {
            if entry.stop_audio {
                audio.music_stop();
            }
            entry.next
        }
        None => {
            log::debug!("no transition registered after {current}");
            SceneId::None
        }
    }
}
