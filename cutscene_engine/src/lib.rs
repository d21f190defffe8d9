//! Scene lifecycle and paginated-text cutscenes for the end-game sequence.
//!
//! The director hosts one [`Scene`] at a time. Cutscene scenes bind their
//! per-scene resources on activation, page through a localized text block on
//! confirm input, and schedule the next scene from the transition table once
//! the last page has been shown.

pub mod binder;
pub mod cutscene;
pub mod director;
pub mod error;
pub mod host;
pub mod pager;
pub mod recording;
pub mod scene;
pub mod transitions;

pub use cutscene::{CutsceneScene, MenuScene};
pub use director::SceneDirector;
pub use error::CutsceneError;
pub use pager::{Advance, TextPager};
pub use scene::{GameState, InputEvent, Key, PlayerState, Scene, SceneContext, SceneId};
