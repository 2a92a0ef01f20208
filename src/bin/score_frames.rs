use dart_detector::config::{load_board, load_config, load_table};
use dart_detector::image::io::write_json_file;
use dart_detector::source::DirectorySource;
use dart_detector::types::DartEvent;
use dart_detector::DartDetector;
use std::env;
use std::path::Path;

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = load_config(Path::new(&config_path))?;

    let board = load_board(&config)?;
    let table = load_table(&config)?;
    let mut source = DirectorySource::open(&config.frames, config.fps)?;

    let mut detector = DartDetector::new(board, table, config.params.clone());
    let mut events: Vec<DartEvent> = Vec::new();

    loop {
        match detector.process_next(&mut source) {
            Ok(Some(report)) => {
                if let Some(event) = report.event {
                    println!(
                        "frame {}: {:?} angle {:.1}° -> {}",
                        event.frame_index, event.region, event.angle_deg, event.score
                    );
                    events.push(event);
                }
            }
            Ok(None) => break,
            Err(err) => return Err(format!("Detection halted: {err}")),
        }
    }

    let scores = detector.scores();
    println!(
        "turn: {} | {} | {}",
        fmt_slot(scores[0]),
        fmt_slot(scores[1]),
        fmt_slot(scores[2])
    );
    write_json_file(&config.output, &events)?;
    println!("{} event(s) written to {}", events.len(), config.output.display());
    Ok(())
}

fn fmt_slot(slot: Option<u16>) -> String {
    slot.map(|v| v.to_string()).unwrap_or_else(|| "-".into())
}

fn usage() -> String {
    "Usage: score_frames <config.json>".to_string()
}
