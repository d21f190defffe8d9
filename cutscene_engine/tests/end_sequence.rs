use std::fs;
use std::path::PathBuf;
use std::process::Command;

use anyhow::{Context, Result};
use serde::Deserialize;
use tempfile::tempdir;

#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum AudioEvent {
    MusicPlay { cue: String },
    MusicStop,
}

#[derive(Debug, Deserialize)]
struct EventLog {
    scenes: Vec<String>,
    events: Vec<EventLogEntry>,
}

#[derive(Debug, Deserialize)]
struct EventLogEntry {
    sequence: u32,
    label: String,
}

fn strings_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("data")
        .join("end_texts.json")
}

#[test]
fn end_sequence_plays_through_to_menu() -> Result<()> {
    let temp_dir = tempdir().context("creating temporary directory for logs")?;
    let audio_path = temp_dir.path().join("audio_log.json");
    let event_path = temp_dir.path().join("event_log.json");

    let output = Command::new(env!("CARGO_BIN_EXE_cutscene_engine"))
        .arg("--strings")
        .arg(strings_path())
        .args(["--pilot", "2"])
        .arg("--audio-log-json")
        .arg(&audio_path)
        .arg("--event-log-json")
        .arg(&event_path)
        .output()
        .context("executing cutscene_engine")?;

    let transcript = String::from_utf8_lossy(&output.stdout).to_string();
    assert!(
        output.status.success(),
        "cutscene_engine exited with {:?}: {}",
        output.status,
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(
        transcript.contains("[END1] Milano climbs down from the cockpit"),
        "pilot 2 text missing from output: {transcript}"
    );
    assert!(
        transcript.contains("END -> END1 -> END2 -> MENU"),
        "scene chain missing from output: {transcript}"
    );
    assert!(transcript.contains("Entities handed to render layers: 2"));

    let raw = fs::read_to_string(&audio_path).context("audio log")?;
    let audio: Vec<AudioEvent> = serde_json::from_str(&raw).context("parsing audio log")?;
    assert_eq!(
        audio,
        vec![
            AudioEvent::MusicStop,
            AudioEvent::MusicPlay {
                cue: "END.PSM".to_string()
            },
            AudioEvent::MusicStop,
        ]
    );

    let raw = fs::read_to_string(&event_path).context("event log")?;
    let log: EventLog = serde_json::from_str(&raw).context("parsing event log")?;
    assert_eq!(log.scenes, vec!["end", "end1", "end2", "menu"]);
    assert!(log
        .events
        .iter()
        .enumerate()
        .all(|(index, entry)| entry.sequence == index as u32));
    let labels: Vec<&str> = log
        .events
        .iter()
        .map(|entry| entry.label.as_str())
        .collect();
    assert!(labels.contains(&"cutscene.activate END1 text 995 (2 pages)"));
    assert!(labels.contains(&"cutscene.exhausted END2 -> MENU"));
    assert_eq!(
        labels
            .iter()
            .filter(|label| label.starts_with("cutscene.release"))
            .count(),
        3
    );

    Ok(())
}

#[test]
fn missing_pilot_text_is_fatal() -> Result<()> {
    let output = Command::new(env!("CARGO_BIN_EXE_cutscene_engine"))
        .arg("--strings")
        .arg(strings_path())
        .args(["--pilot", "42", "--start-scene", "end1"])
        .output()
        .context("executing cutscene_engine")?;

    assert!(!output.status.success(), "unknown text id should abort");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("1035"),
        "error should name the missing text id: {stderr}"
    );
    Ok(())
}

#[test]
fn oversized_pilot_is_rejected_cleanly() -> Result<()> {
    let output = Command::new(env!("CARGO_BIN_EXE_cutscene_engine"))
        .arg("--strings")
        .arg(strings_path())
        .args(["--pilot", "4294967295", "--start-scene", "end1"])
        .output()
        .context("executing cutscene_engine")?;

    assert!(!output.status.success(), "out-of-range pilot should abort");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("pilot 4294967295 is out of range for END1"),
        "error should name the pilot: {stderr}"
    );
    assert!(!stderr.contains("panicked"), "{stderr}");
    Ok(())
}

#[test]
fn input_cap_stops_with_a_warning() -> Result<()> {
    let output = Command::new(env!("CARGO_BIN_EXE_cutscene_engine"))
        .arg("--strings")
        .arg(strings_path())
        .args(["--max-inputs", "1"])
        .output()
        .context("executing cutscene_engine")?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        output.status.success(),
        "hitting the input cap is not an error: {stderr}"
    );
    assert!(
        stderr.contains("[cutscene_engine] warning: stopped after 1 inputs in END"),
        "missing cap warning: {stderr}"
    );
    assert!(
        stdout.contains("Sequence finished after 1 inputs: END\n"),
        "sequence should stop in END: {stdout}"
    );
    Ok(())
}
