use crate::binder::{self, AudioAction};
use crate::error::CutsceneError;
use crate::host::{Color, Font, RenderLayer, RendererKind, TextRenderer};
use crate::pager::{Advance, TextPager};
use crate::scene::{InputEvent, Scene, SceneContext, SceneId};
use crate::transitions;
use cutscene_text::TextId;

/// Per-activation state; exists only between activate and deactivate.
#[derive(Debug)]
struct CutsceneState {
    pager: TextPager,
    text_id: TextId,
    text_x: u32,
    text_y: u32,
    text_width: u32,
    color: Color,
}

/// Full-screen text panels for one scene of the end sequence.
#[derive(Debug)]
pub struct CutsceneScene {
    id: SceneId,
    state: Option<CutsceneState>,
    scheduled: Option<SceneId>,
}

impl CutsceneScene {
    pub fn new(id: SceneId) -> Self {
        CutsceneScene {
            id,
            state: None,
            scheduled: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.state.is_some()
    }

    pub fn current_page(&self) -> Option<&str> {
        self.state.as_ref().map(|state| state.pager.current_page())
    }

    pub fn pager(&self) -> Option<&TextPager> {
        self.state.as_ref().map(|state| &state.pager)
    }

    pub fn text_id(&self) -> Option<TextId> {
        self.state.as_ref().map(|state| state.text_id)
    }

    /// Scene requested once the last page was confirmed.
    pub fn scheduled(&self) -> Option<SceneId> {
        self.scheduled
    }
}

impl Scene for CutsceneScene {
    fn id(&self) -> SceneId {
        self.id
    }

    fn on_activate(&mut self, ctx: &mut SceneContext<'_>) -> Result<(), CutsceneError> {
        let player = ctx.game.primary_player();
        let resources = binder::bind(self.id, &player, ctx.strings)?;
        // Fail before any side effect is applied.
        let pager = TextPager::new(resources.text)?;

        if let AudioAction::Restart(cue) = resources.audio {
            ctx.audio.music_stop();
            ctx.audio.music_play(cue);
            ctx.log_event(format!("audio.music.restart {cue}"));
        }

        for entity in resources.entities {
            let animation = entity.animation().map(|anim| anim.0);
            ctx.layers.add_entity(entity, RenderLayer::Top);
            if let Some(animation) = animation {
                ctx.log_event(format!("cutscene.spawn {} animation {animation}", self.id));
            }
        }

        let renderer = RendererKind::Hardware;
        ctx.video.select_renderer(renderer);
        ctx.log_event(format!("video.renderer {}", renderer.as_str()));
        ctx.log_event(format!(
            "cutscene.activate {} text {} ({} pages)",
            self.id,
            resources.text_id,
            pager.page_count()
        ));

        self.scheduled = None;
        self.state = Some(CutsceneState {
            pager,
            text_id: resources.text_id,
            text_x: resources.text_x,
            text_y: resources.text_y,
            text_width: resources.text_width,
            color: resources.color,
        });
        Ok(())
    }

    fn on_input(&mut self, event: &InputEvent, ctx: &mut SceneContext<'_>) -> bool {
        if !event.is_confirm() {
            return true;
        }
        let Some(state) = self.state.as_mut() else {
            return true;
        };

        match state.pager.advance() {
            Advance::HasMore => {
                ctx.log_event(format!(
                    "cutscene.page {} {}/{}",
                    self.id,
                    state.pager.page_index() + 1,
                    state.pager.page_count()
                ));
            }
            Advance::Exhausted => {
                let next = match self.scheduled {
                    Some(next) => next,
                    None => {
                        let next = transitions::apply_transition(self.id, ctx.audio);
                        self.scheduled = Some(next);
                        ctx.log_event(format!("cutscene.exhausted {} -> {next}", self.id));
                        next
                    }
                };
                ctx.game.schedule_next_scene(next);
            }
        }
        true
    }

    fn render_overlay(&self, renderer: &mut dyn TextRenderer) {
        if let Some(state) = self.state.as_ref() {
            renderer.draw_wrapped(
                Font::Small,
                state.pager.current_page(),
                state.text_x,
                state.text_y,
                state.text_width,
                state.color,
            );
        }
    }

    fn page_index(&self) -> Option<usize> {
        self.pager().map(TextPager::page_index)
    }

    fn on_deactivate(&mut self, ctx: &mut SceneContext<'_>) {
        if let Some(state) = self.state.take() {
            ctx.log_event(format!(
                "cutscene.release {} ({} bytes)",
                self.id,
                state.pager.text().len()
            ));
        }
    }
}

/// Destination of the end sequence. Menu behaviour lives elsewhere; this
/// scene only marks that the sequence has handed control back.
#[derive(Debug, Default)]
pub struct MenuScene {
    active: bool,
}

impl MenuScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl Scene for MenuScene {
    fn id(&self) -> SceneId {
        SceneId::Menu
    }

    fn on_activate(&mut self, ctx: &mut SceneContext<'_>) -> Result<(), CutsceneError> {
        self.active = true;
        ctx.log_event("menu.enter");
        Ok(())
    }

    fn on_input(&mut self, _event: &InputEvent, _ctx: &mut SceneContext<'_>) -> bool {
        false
    }

    fn on_deactivate(&mut self, ctx: &mut SceneContext<'_>) {
        if self.active {
            self.active = false;
            ctx.log_event("menu.leave");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binder::END_THEME;
    use crate::host::AnimationRef;
    use crate::recording::{
        AudioEvent, LayerStack, RecordingAudioCallback, RecordingRenderer, RecordingVideo,
    };
    use crate::scene::{GameState, Key, PlayerState};
    use cutscene_text::StringTable;

    struct Harness {
        game: GameState,
        strings: StringTable,
        audio: RecordingAudioCallback,
        video: RecordingVideo,
        layers: LayerStack,
        events: Vec<String>,
    }

    impl Harness {
        fn new(pilot: u32) -> Self {
            let mut strings = StringTable::new();
            strings.insert(TextId(992), "Page one\nPage two\nPage three");
            strings.insert(
                TextId(995),
                "Crystal returns home.\nShe never fights again.\n",
            );
            strings.insert(TextId(1005), "Epilogue.");
            Harness {
                game: GameState::new(vec![PlayerState::with_pilot(pilot)]),
                strings,
                audio: RecordingAudioCallback::new(),
                video: RecordingVideo::new(),
                layers: LayerStack::new(),
                events: Vec::new(),
            }
        }

        fn ctx(&mut self) -> SceneContext<'_> {
            SceneContext::new(
                &mut self.game,
                &self.strings,
                &self.audio,
                &mut self.video,
                &mut self.layers,
                &mut self.events,
            )
        }
    }

    fn confirm(scene: &mut CutsceneScene, harness: &mut Harness) -> bool {
        let mut ctx = harness.ctx();
        scene.on_input(&InputEvent::CONFIRM, &mut ctx)
    }

    #[test]
    fn end_scene_pages_through_text_then_schedules_end1() {
        let mut harness = Harness::new(0);
        let mut scene = CutsceneScene::new(SceneId::End);
        scene.on_activate(&mut harness.ctx()).expect("activate");

        assert_eq!(scene.current_page(), Some("Page one"));
        confirm(&mut scene, &mut harness);
        assert_eq!(scene.current_page(), Some("Page two"));
        confirm(&mut scene, &mut harness);
        assert_eq!(scene.current_page(), Some("Page three"));
        assert_eq!(harness.game.next_scene(), None);

        confirm(&mut scene, &mut harness);
        assert_eq!(harness.game.next_scene(), Some(SceneId::End1));
        assert_eq!(scene.current_page(), Some("Page three"));
    }

    #[test]
    fn end_scene_restarts_music_and_selects_hardware_renderer() {
        let mut harness = Harness::new(0);
        let mut scene = CutsceneScene::new(SceneId::End);
        scene.on_activate(&mut harness.ctx()).expect("activate");

        assert_eq!(
            harness.audio.events(),
            vec![
                AudioEvent::MusicStop,
                AudioEvent::MusicPlay {
                    cue: END_THEME.to_string()
                },
            ]
        );
        assert_eq!(harness.video.selections(), vec![RendererKind::Hardware]);
        assert!(harness.layers.is_empty());
    }

    #[test]
    fn end1_spawns_portrait_then_background_before_input() {
        let mut harness = Harness::new(2);
        let mut scene = CutsceneScene::new(SceneId::End1);
        scene.on_activate(&mut harness.ctx()).expect("activate");

        assert_eq!(scene.text_id(), Some(TextId(995)));
        let top = harness.layers.layer(RenderLayer::Top);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].animation(), Some(AnimationRef(3)));
        assert_eq!(top[0].sprite(), Some(2));
        assert!(top[0].is_halted());
        assert_eq!(top[1].animation(), Some(AnimationRef(12)));
        assert!(!top[1].is_halted());
        assert!(harness.audio.events().is_empty());
    }

    #[test]
    fn end2_exit_stops_music_exactly_once() {
        let mut harness = Harness::new(2);
        let mut scene = CutsceneScene::new(SceneId::End2);
        scene.on_activate(&mut harness.ctx()).expect("activate");

        for _ in 0..3 {
            confirm(&mut scene, &mut harness);
            assert_eq!(harness.game.take_next_scene(), Some(SceneId::Menu));
        }
        assert_eq!(harness.audio.events(), vec![AudioEvent::MusicStop]);
        assert_eq!(scene.scheduled(), Some(SceneId::Menu));
    }

    #[test]
    fn overlay_draws_current_page_with_profile_layout() {
        let mut harness = Harness::new(2);
        let mut scene = CutsceneScene::new(SceneId::End1);
        scene.on_activate(&mut harness.ctx()).expect("activate");
        confirm(&mut scene, &mut harness);

        let mut renderer = RecordingRenderer::new();
        scene.render_overlay(&mut renderer);
        let calls = renderer.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].text, "She never fights again.");
        assert_eq!(calls[0].font, Font::Small);
        assert_eq!((calls[0].x, calls[0].y, calls[0].max_width), (10, 160, 300));
        assert_eq!(calls[0].color, Color::RED);
    }

    #[test]
    fn page_index_tracks_confirms_until_release() {
        let mut harness = Harness::new(0);
        let mut scene = CutsceneScene::new(SceneId::End);
        assert_eq!(scene.page_index(), None);

        scene.on_activate(&mut harness.ctx()).expect("activate");
        assert_eq!(scene.page_index(), Some(0));
        scene.on_input(&InputEvent::CONFIRM, &mut harness.ctx());
        assert_eq!(scene.page_index(), Some(1));

        scene.on_deactivate(&mut harness.ctx());
        assert_eq!(scene.page_index(), None);
    }

    #[test]
    fn non_confirm_input_is_consumed_without_advancing() {
        let mut harness = Harness::new(0);
        let mut scene = CutsceneScene::new(SceneId::End);
        scene.on_activate(&mut harness.ctx()).expect("activate");

        for event in [
            InputEvent::KeyDown(Key::Space),
            InputEvent::KeyUp(Key::Return),
        ] {
            assert!(scene.on_input(&event, &mut harness.ctx()));
        }
        assert_eq!(scene.current_page(), Some("Page one"));
    }

    #[test]
    fn missing_text_aborts_activation_without_side_effects() {
        let mut harness = Harness::new(7);
        let mut scene = CutsceneScene::new(SceneId::End1);
        let err = scene.on_activate(&mut harness.ctx()).unwrap_err();

        assert!(matches!(err, CutsceneError::Bind(_)));
        assert!(!scene.is_active());
        assert!(harness.layers.is_empty());
        assert!(harness.video.selections().is_empty());
    }

    #[test]
    fn empty_text_is_reported() {
        let mut harness = Harness::new(0);
        harness.strings.insert(TextId(992), "");
        let mut scene = CutsceneScene::new(SceneId::End);
        let err = scene.on_activate(&mut harness.ctx()).unwrap_err();
        assert!(matches!(err, CutsceneError::Pager(_)));
    }

    #[test]
    fn release_happens_once_and_state_is_never_touched_again() {
        let mut harness = Harness::new(0);
        let mut scene = CutsceneScene::new(SceneId::End);
        scene.on_activate(&mut harness.ctx()).expect("activate");
        confirm(&mut scene, &mut harness);

        scene.on_deactivate(&mut harness.ctx());
        scene.on_deactivate(&mut harness.ctx());
        let releases = harness
            .events
            .iter()
            .filter(|event| event.starts_with("cutscene.release"))
            .count();
        assert_eq!(releases, 1);

        assert!(!scene.is_active());
        assert!(confirm(&mut scene, &mut harness));
        assert_eq!(harness.game.next_scene(), None);
        let mut renderer = RecordingRenderer::new();
        scene.render_overlay(&mut renderer);
        assert!(renderer.calls().is_empty());
    }

    #[test]
    fn menu_scene_ignores_input() {
        let mut harness = Harness::new(0);
        let mut menu = MenuScene::new();
        menu.on_activate(&mut harness.ctx()).expect("activate");
        assert!(menu.is_active());
        assert!(!menu.on_input(&InputEvent::CONFIRM, &mut harness.ctx()));
        menu.on_deactivate(&mut harness.ctx());
        assert_eq!(harness.events, vec!["menu.enter", "menu.leave"]);
    }
}
