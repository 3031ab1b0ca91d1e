/// Play — terminal driver for walking through a chapter.
///
/// Usage: chapter_play [--config <file.ron>] [--root <dir>] [--chapter <id>] [--cache] [--clamp]
///
/// At the prompt, type a choice number or its key. `look` reprints the
/// current scene, `quit` exits. Set `RUST_LOG=debug` to trace resolution.
/// `--clamp` shows stats bounded to 0..=100; the engine values stay raw.

use chapter_engine::{EngineConfig, GameEngine, GameState, PlayerStats};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

const DISPLAY_MIN: i64 = 0;
const DISPLAY_MAX: i64 = 100;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return;
    }

    let mut config = EngineConfig::default();
    let mut root = None;
    let mut chapter = None;
    let mut cache = false;
    let mut clamp = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" if i + 1 < args.len() => {
                i += 1;
                match EngineConfig::load_from_ron(Path::new(&args[i])) {
                    Ok(loaded) => config = loaded,
                    Err(e) => {
                        eprintln!("ERROR loading config {}: {}", args[i], e);
                        process::exit(1);
                    }
                }
            }
            "--root" if i + 1 < args.len() => {
                i += 1;
                root = Some(PathBuf::from(&args[i]));
            }
            "--chapter" if i + 1 < args.len() => {
                i += 1;
                chapter = Some(args[i].clone());
            }
            "--cache" => cache = true,
            "--clamp" => clamp = true,
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    // Flags override the config file.
    if let Some(root) = root {
        config.content_root = root;
    }
    if let Some(chapter) = chapter {
        config.default_chapter = chapter;
    }
    config.cache_scenes |= cache;

    let mut engine = match GameEngine::from_config(&config) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            process::exit(1);
        }
    };

    let mut state = match engine.start() {
        Ok(state) => state,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            process::exit(1);
        }
    };
    render(&state, clamp);

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("> ");
        stdout.flush().ok();

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).is_err() || line.is_empty() {
            break;
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        match input {
            "quit" | "exit" | "q" => break,
            "look" => render(&state, clamp),
            _ => {
                let key = pick_key(&state, input);
                match engine.choose(&key) {
                    Ok(next) => {
                        if next.scene_id == state.scene_id && next.stats == state.stats {
                            println!("(nothing happens)");
                        }
                        state = next;
                        render(&state, clamp);
                    }
                    // Broken content is reported, not fatal.
                    Err(e) => println!("ERROR: {}", e),
                }
            }
        }
    }
}

/// Accept either a 1-based choice number or a raw key.
fn pick_key(state: &GameState, input: &str) -> String {
    input
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|idx| state.choices.get(idx))
        .map(|c| c.key.clone())
        .unwrap_or_else(|| input.to_string())
}

fn render(state: &GameState, clamp: bool) {
    println!();
    println!("[{} / {}]", state.chapter_id, state.scene_id);
    if !state.image_path.is_empty() {
        println!("(image: {})", state.image_path);
    }
    if !state.text.is_empty() {
        println!("{}", state.text.trim_end());
    }
    let s = shown_stats(state.stats, clamp);
    println!(
        "sleep {}  energy {}  focus {}  stress {}",
        s.sleep, s.energy, s.focus, s.stress
    );

    if state.choices.is_empty() {
        println!("-- no choices left; type 'quit' --");
        return;
    }
    for (i, choice) in state.choices.iter().enumerate() {
        if choice.hint.is_empty() {
            println!("  {}. {} [{}]", i + 1, choice.label, choice.key);
        } else {
            println!("  {}. {} [{}] - {}", i + 1, choice.label, choice.key, choice.hint);
        }
    }
}

/// Stats as displayed. Clamping never feeds back into the engine.
fn shown_stats(stats: PlayerStats, clamp: bool) -> PlayerStats {
    if clamp {
        stats.clamped(DISPLAY_MIN, DISPLAY_MAX)
    } else {
        stats
    }
}

fn print_usage() {
    println!("Usage: chapter_play [--config <file.ron>] [--root <dir>] [--chapter <id>] [--cache] [--clamp]");
    println!();
    println!("Commands:");
    println!("  <n> | <key>  take a choice");
    println!("  look         reprint the current scene");
    println!("  quit         exit");
}
