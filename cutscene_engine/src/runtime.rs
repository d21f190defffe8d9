use std::{fs, path::Path, rc::Rc};

use anyhow::{Context, Result};
use cutscene_engine::recording::{
    LayerStack, RecordingAudioCallback, RecordingRenderer, RecordingVideo,
};
use cutscene_engine::{GameState, InputEvent, PlayerState, SceneDirector, SceneId};
use cutscene_text::StringTable;
use serde::Serialize;

use crate::cli::RunOptions;

#[derive(Debug, Serialize)]
pub struct EventLogEntry {
    pub sequence: u32,
    pub label: String,
}

#[derive(Debug, Serialize)]
pub struct EventLog {
    pub scenes: Vec<SceneId>,
    pub events: Vec<EventLogEntry>,
}

pub fn execute(options: RunOptions) -> Result<()> {
    let RunOptions {
        strings,
        pilot,
        start_scene,
        max_inputs,
        event_log_json,
        audio_log_json,
        verbose,
    } = options;

    let table = StringTable::from_json_file(&strings)?;
    log::info!("loaded {} texts from {}", table.len(), strings.display());

    let audio = RecordingAudioCallback::new();
    let mut renderer = RecordingRenderer::new();
    let layers = LayerStack::new();
    let mut director = SceneDirector::new(
        GameState::new(vec![PlayerState::with_pilot(pilot)]),
        Rc::new(table),
        Rc::new(audio.clone()),
        Box::new(RecordingVideo::new()),
        Box::new(layers.clone()),
    );

    director
        .start(start_scene)
        .with_context(|| format!("activating {start_scene}"))?;
    let mut shown = None;
    print_page(&director, &mut renderer, &mut shown);

    let mut presses = 0;
    while director.active_scene() != Some(SceneId::Menu) {
        if presses == max_inputs {
            eprintln!(
                "[cutscene_engine] warning: stopped after {max_inputs} inputs in {}",
                director
                    .active_scene()
                    .map(|scene| scene.as_str())
                    .unwrap_or("<no scene>")
            );
            break;
        }
        director
            .dispatch(InputEvent::CONFIRM)
            .context("dispatching confirm input")?;
        presses += 1;
        print_page(&director, &mut renderer, &mut shown);
    }

    println!(
        "Sequence finished after {presses} inputs: {}",
        director
            .history()
            .iter()
            .map(|scene| scene.as_str())
            .collect::<Vec<_>>()
            .join(" -> ")
    );
    println!("Entities handed to render layers: {}", layers.len());

    if verbose {
        for event in director.events() {
            eprintln!("[cutscene_engine] event: {event}");
        }
    }

    if let Some(path) = event_log_json.as_ref() {
        let log = build_event_log(director.history(), director.events());
        write_json(path, &log, "engine event log")?;
        println!("Saved engine event log to {}", path.display());
    }

    if let Some(path) = audio_log_json.as_ref() {
        write_json(path, &audio.events(), "audio event log")?;
        println!("Saved audio event log to {}", path.display());
    }

    director.shutdown();
    Ok(())
}

/// Activation count and page index of the page on screen.
type PagePosition = (usize, usize);

fn print_page(
    director: &SceneDirector,
    renderer: &mut RecordingRenderer,
    shown: &mut Option<PagePosition>,
) {
    if let Some(line) = render_new_page(director, renderer, shown) {
        println!("{line}");
    }
}

/// Renders the active page once per position. Pages with identical text are
/// still distinct positions.
fn render_new_page(
    director: &SceneDirector,
    renderer: &mut RecordingRenderer,
    shown: &mut Option<PagePosition>,
) -> Option<String> {
    let scene = director.active_scene()?;
    let position = (director.history().len(), director.active_page()?);
    if *shown == Some(position) {
        return None;
    }
    *shown = Some(position);
    director.render(renderer);
    let text = renderer.last_text()?;
    Some(format!("[{}] {text}", scene.as_str()))
}

fn build_event_log(scenes: &[SceneId], events: &[String]) -> EventLog {
    EventLog {
        scenes: scenes.to_vec(),
        events: events
            .iter()
            .enumerate()
            .map(|(index, label)| EventLogEntry {
                sequence: index as u32,
                label: label.clone(),
            })
            .collect(),
    }
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T, what: &str) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .with_context(|| format!("serializing {what} to JSON"))?;
    fs::write(path, &json)
        .with_context(|| format!("writing {what} to {}", path.display()))?;
    Ok(())
}
