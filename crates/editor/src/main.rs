use std::io::BufRead;

use treed_editor_lib::command::execute_json;
use treed_editor_lib::state::document::{DocumentStore, FileStore, MemoryStore};
use treed_editor_lib::state::settings::EditorSettings;
use treed_editor_lib::Editor;

struct Args {
    scene: Option<String>,
    autosave: bool,
}

/// The on-disk store is touched only when autosave is on
fn open_store(autosave: bool) -> Box<dyn DocumentStore> {
    if autosave {
        if let Some(store) = FileStore::open_default() {
            return Box::new(store);
        }
    }
    Box::new(MemoryStore::new())
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "treed_editor=info,treed_editor_lib=info".into()),
        )
        .init();

    let args = parse_args();
    let mut settings = EditorSettings::load();
    if !args.autosave {
        settings.autosave.enabled = false;
    }

    let mut editor = Editor::with_store(settings, open_store(args.autosave));

    if let Some(path) = &args.scene {
        match std::fs::read_to_string(path) {
            Ok(json) => {
                if let Err(e) = editor.load_document_json(&json) {
                    tracing::error!("Failed to load scene from {path}: {e}");
                }
            }
            Err(e) => tracing::error!("Failed to read scene file {path}: {e}"),
        }
    }

    // One JSON command per line, one JSON response per line
    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                tracing::error!("Failed to read stdin: {e}");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        let output = match execute_json(&mut editor, &line) {
            Ok(resp) => serde_json::to_string(&resp),
            Err(e) => serde_json::to_string(&serde_json::json!({ "success": false, "error": e })),
        };
        match output {
            Ok(json) => println!("{json}"),
            Err(e) => tracing::error!("Failed to serialize response: {e}"),
        }
    }
}

fn parse_args() -> Args {
    let mut args = Args {
        scene: None,
        autosave: true,
    };
    let argv: Vec<String> = std::env::args().collect();
    let mut i = 1;
    while i < argv.len() {
        match argv[i].as_str() {
            "--scene" if i + 1 < argv.len() => {
                args.scene = Some(argv[i + 1].clone());
                i += 1;
            }
            "--no-autosave" => args.autosave = false,
            other => tracing::warn!("Ignoring unknown argument {other}"),
        }
        i += 1;
    }
    args
}
