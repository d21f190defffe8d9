//! Minimal scene host: keeps one scene active, forwards input to it and
//! performs the transitions it schedules.

use std::rc::Rc;

use cutscene_text::Localization;

use crate::cutscene::{CutsceneScene, MenuScene};
use crate::error::CutsceneError;
use crate::host::{AudioCallback, RenderLayers, TextRenderer, VideoBackend};
use crate::scene::{GameState, InputEvent, Scene, SceneContext, SceneId};

/// Builds the scene object registered for `id`.
pub fn create_scene(id: SceneId) -> Option<Box<dyn Scene>> {
    match id {
        SceneId::End | SceneId::End1 | SceneId::End2 => Some(Box::new(CutsceneScene::new(id))),
        SceneId::Menu => Some(Box::new(MenuScene::new())),
        SceneId::None => None,
    }
}

struct Services {
    strings: Rc<dyn Localization>,
    audio: Rc<dyn AudioCallback>,
    video: Box<dyn VideoBackend>,
    layers: Box<dyn RenderLayers>,
}

impl Services {
    fn context<'a>(
        &'a mut self,
        game: &'a mut GameState,
        events: &'a mut Vec<String>,
    ) -> SceneContext<'a> {
        SceneContext::new(
            game,
            self.strings.as_ref(),
            self.audio.as_ref(),
            self.video.as_mut(),
            self.layers.as_mut(),
            events,
        )
    }
}

pub struct SceneDirector {
    game: GameState,
    services: Services,
    events: Vec<String>,
    active: Option<Box<dyn Scene>>,
    history: Vec<SceneId>,
}

impl SceneDirector {
    pub fn new(
        game: GameState,
        strings: Rc<dyn Localization>,
        audio: Rc<dyn AudioCallback>,
        video: Box<dyn VideoBackend>,
        layers: Box<dyn RenderLayers>,
    ) -> Self {
        SceneDirector {
            game,
            services: Services {
                strings,
                audio,
                video,
                layers,
            },
            events: Vec::new(),
            active: None,
            history: Vec::new(),
        }
    }

    pub fn start(&mut self, id: SceneId) -> Result<(), CutsceneError> {
        self.switch_to(id)
    }

    /// Forwards `event` to the active scene, then performs any transition it
    /// scheduled. `Quit` tears the active scene down.
    pub fn dispatch(&mut self, event: InputEvent) -> Result<bool, CutsceneError> {
        if event == InputEvent::Quit {
            self.shutdown();
            return Ok(true);
        }

        let Some(scene) = self.active.as_mut() else {
            return Ok(false);
        };
        let handled = {
            let mut ctx = self.services.context(&mut self.game, &mut self.events);
            scene.on_input(&event, &mut ctx)
        };

        match self.game.take_next_scene() {
            Some(SceneId::None) => {
                let current = self.active_scene().unwrap_or(SceneId::None);
                self.log_event(format!("scene.stay {current}"));
            }
            Some(next) => {
                self.log_event(format!("scene.schedule {next}"));
                self.switch_to(next)?;
            }
            None => {}
        }
        Ok(handled)
    }

    pub fn render(&self, renderer: &mut dyn TextRenderer) {
        if let Some(scene) = self.active.as_ref() {
            scene.render_overlay(renderer);
        }
    }

    /// Deactivates the active scene, if any. Safe to call repeatedly.
    pub fn shutdown(&mut self) {
        if let Some(mut scene) = self.active.take() {
            let mut ctx = self.services.context(&mut self.game, &mut self.events);
            scene.on_deactivate(&mut ctx);
            ctx.log_event(format!("scene.deactivate {}", scene.id()));
        }
    }

    pub fn active_scene(&self) -> Option<SceneId> {
        self.active.as_ref().map(|scene| scene.id())
    }

    pub fn events(&self) -> &[String] {
        &self.events
    }

    /// Every scene that was successfully activated, in order.
    pub fn history(&self) -> &[SceneId] {
        &self.history
    }

    pub fn active_page(&self) -> Option<usize> {
        self.active.as_ref().and_then(|scene| scene.page_index())
    }

    fn switch_to(&mut self, id: SceneId) -> Result<(), CutsceneError> {
        let mut scene = create_scene(id).ok_or(CutsceneError::NoScene(id))?;
        self.shutdown();

        {
            let mut ctx = self.services.context(&mut self.game, &mut self.events);
            ctx.log_event(format!("scene.activate {id}"));
            scene.on_activate(&mut ctx)?;
        }
        log::info!("activated scene {id}");
        self.history.push(id);
        self.active = Some(scene);
        Ok(())
    }

    fn log_event(&mut self, event: impl Into<String>) {
        let event = event.into();
        log::debug!("{event}");
        self.events.push(event);
    }
}

impl Drop for SceneDirector {
    fn drop(&mut self) {
        self.shutdown();
    }
}
