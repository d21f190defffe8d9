use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, ValueEnum};
use cutscene_engine::SceneId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StartScene {
    End,
    End1,
    End2,
    Menu,
}

impl From<StartScene> for SceneId {
    fn from(value: StartScene) -> Self {
        match value {
            StartScene::End => SceneId::End,
            StartScene::End1 => SceneId::End1,
            StartScene::End2 => SceneId::End2,
            StartScene::Menu => SceneId::Menu,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    about = "Plays the end-game cutscene sequence headlessly, one confirm press per page",
    version
)]
pub struct Args {
    /// JSON string table holding the cutscene texts
    #[arg(long, default_value = "data/end_texts.json")]
    pub strings: PathBuf,

    /// Protagonist variant selected by player one
    #[arg(long, default_value_t = 0)]
    pub pilot: u32,

    /// Scene the sequence starts from
    #[arg(long, value_enum, default_value_t = StartScene::End)]
    pub start_scene: StartScene,

    /// Upper bound on confirm presses fed to the sequence
    #[arg(long, default_value_t = 64)]
    pub max_inputs: usize,

    /// Path to write the engine event log as JSON
    #[arg(long)]
    pub event_log_json: Option<PathBuf>,

    /// Path to write the audio event log as JSON
    #[arg(long)]
    pub audio_log_json: Option<PathBuf>,

    /// Echo every engine event as it is recorded
    #[arg(long)]
    pub verbose: bool,
}

#[derive(Debug)]
pub struct RunOptions {
    pub strings: PathBuf,
    pub pilot: u32,
    pub start_scene: SceneId,
    pub max_inputs: usize,
    pub event_log_json: Option<PathBuf>,
    pub audio_log_json: Option<PathBuf>,
    pub verbose: bool,
}

pub fn parse() -> Result<RunOptions> {
    let args = Args::parse();
    args.into_options()
}

impl Args {
    pub fn into_options(self) -> Result<RunOptions> {
        if self.start_scene == StartScene::Menu {
            bail!("--start-scene menu has no cutscene to play");
        }
        if self.max_inputs == 0 {
            bail!("--max-inputs must be at least 1");
        }

        Ok(RunOptions {
            strings: self.strings,
            pilot: self.pilot,
            start_scene: self.start_scene.into(),
            max_inputs: self.max_inputs,
            event_log_json: self.event_log_json,
            audio_log_json: self.audio_log_json,
            verbose: self.verbose,
        })
    }
}
