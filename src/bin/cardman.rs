/// Interactive memory card manager console

use cardman::*;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// One console command: name, argument synopsis and help text
struct Command {
    name: &'static str,
    args: &'static str,
    help: &'static str,
}

const fn cmd(name: &'static str, args: &'static str, help: &'static str) -> Command {
    Command { name, args, help }
}

/// Console commands grouped by help section
const SECTIONS: &[(&str, &[Command])] = &[
    (
        "Navigation",
        &[
            cmd("status", "", "Show the current selection"),
            cmd("init", "", "Re-run startup card selection"),
            cmd("next", "", "Next card"),
            cmd("prev", "", "Previous card"),
            cmd("next-chan", "", "Next channel"),
            cmd("prev-chan", "", "Previous channel"),
            cmd("boot", "", "Switch to the boot card (needs autoboot)"),
            cmd("default", "", "Return to the last numbered card"),
            cmd("game", "<id>", "Report a detected game id"),
            cmd("insert", "<id>", "Set the inserted game"),
            cmd("eject", "", "Clear the inserted game"),
        ],
    ),
    (
        "Settings",
        &[
            cmd("autoboot", "on|off", "Toggle the boot card"),
            cmd("track-game", "on|off", "Toggle game id tracking"),
        ],
    ),
    (
        "Image",
        &[
            cmd("open", "", "Open (or create) the selected card image"),
            cmd("flush", "", "Flush pending writes"),
            cmd("close", "", "Close the card image"),
            cmd("read-sector", "<n>", "Hex dump a 128-byte sector"),
            cmd("write-sector", "<n> <byte>", "Fill a sector with a byte"),
        ],
    ),
    (
        "Console",
        &[
            cmd("help", "", "Show this list"),
            cmd("quit", "", "Leave the console"),
            cmd("exit", "", "Leave the console"),
        ],
    ),
];

fn commands() -> impl Iterator<Item = &'static Command> {
    SECTIONS.iter().flat_map(|(_, commands)| commands.iter())
}

/// Completion candidates for the text left of the cursor
///
/// The first word completes to a command name; the argument of the on/off
/// toggles completes to `on` or `off`.
fn candidates(line: &str) -> (usize, Vec<Pair>) {
    let start = line.rfind(' ').map_or(0, |space| space + 1);
    let word = line[start..].to_lowercase();
    let previous: Vec<&str> = line[..start].split_whitespace().collect();

    let pairs = match previous.as_slice() {
        [] => commands()
            .filter(|command| command.name.starts_with(&word))
            .map(|command| Pair {
                display: format!("{} {}", command.name, command.args).trim_end().to_string(),
                replacement: command.name.to_string(),
            })
            .collect(),
        [toggle] if commands().any(|c| c.name == *toggle && c.args == "on|off") => ["on", "off"]
            .iter()
            .filter(|value| value.starts_with(&word))
            .map(|value| Pair {
                display: value.to_string(),
                replacement: value.to_string(),
            })
            .collect(),
        _ => Vec::new(),
    };
    (start, pairs)
}

/// Line editor helper for the console
struct CardmanHelper;

impl Completer for CardmanHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        Ok(candidates(&line[..pos]))
    }
}

impl Hinter for CardmanHelper {
    type Hint = String;
}

impl Highlighter for CardmanHelper {}
impl Validator for CardmanHelper {}
impl Helper for CardmanHelper {}

/// Fatal sink that reports the error and exits
struct ExitSink;

impl FatalSink for ExitSink {
    fn fatal(&mut self, err: &CardError) -> ! {
        tracing::error!("{}", err);
        eprintln!("Fatal: {}", err);
        std::process::exit(1)
    }
}

/// Get the path to the history file
fn history_path() -> Option<PathBuf> {
    dirs::home_dir().map(|mut p| {
        p.push(".cardman_history");
        p
    })
}

/// Get the path to the settings file
fn settings_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("cardman")
        .join("settings.json")
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("CARDMAN_LOG").unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let root = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    println!("=== cardman ===");
    println!("Interactive console for PS1 virtual memory cards.");
    println!("Card root: {}", root.display());
    println!("Type 'help' for available commands\n");

    let settings = match JsonSettings::load(settings_path()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error loading settings: {}", e);
            std::process::exit(1);
        }
    };
    let directory = match FsDirectory::open(&root) {
        Ok(directory) => directory,
        Err(e) => {
            eprintln!("Error loading card config: {}", e);
            std::process::exit(1);
        }
    };
    let game = StaticGame::new();

    let mut cards = match CardManager::builder()
        .storage(FsStorage::new(&root))
        .settings(settings)
        .directory(directory)
        .game(game.clone())
        .notifier(|| tracing::debug!("Card changed"))
        .build()
    {
        Ok(cards) => cards,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let mut rl = Editor::new().expect("Failed to create editor");
    rl.set_helper(Some(CardmanHelper));

    if let Some(history_path) = history_path() {
        let _ = rl.load_history(&history_path);
    }

    print_status(&cards);

    loop {
        let input = match rl.readline("> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        };

        let input = input.trim();
        if input.is_empty() {
            continue;
        }
        let _ = rl.add_history_entry(input);

        let parts: Vec<&str> = input.split_whitespace().collect();
        let command = parts[0].to_lowercase();

        match command.as_str() {
            "help" => print_help(),
            "quit" | "exit" => break,
            "status" => print_status(&cards),
            "init" => {
                cards.init();
                print_status(&cards);
            }
            "next" => {
                cards.next_card();
                print_status(&cards);
            }
            "prev" => {
                cards.prev_card();
                print_status(&cards);
            }
            "next-chan" => {
                cards.next_channel();
                print_status(&cards);
            }
            "prev-chan" => {
                cards.prev_channel();
                print_status(&cards);
            }
            "boot" => {
                cards.switch_to_boot();
                print_status(&cards);
            }
            "default" => {
                cards.switch_to_default();
                print_status(&cards);
            }
            "game" => {
                if parts.len() < 2 {
                    println!("Usage: game <id>");
                    continue;
                }
                cards.set_game_id(parts[1]);
                print_status(&cards);
            }
            "insert" => {
                if parts.len() < 2 {
                    println!("Usage: insert <id>");
                    continue;
                }
                game.insert(parts[1]);
                println!("Inserted game {}", parts[1]);
            }
            "eject" => {
                game.eject();
                println!("Game ejected");
            }
            "autoboot" | "track-game" => {
                let enabled = match parts.get(1).copied() {
                    Some("on") => true,
                    Some("off") => false,
                    _ => {
                        println!("Usage: {} on|off", command);
                        continue;
                    }
                };
                if command == "autoboot" {
                    cards.settings_mut().set_autoboot(enabled);
                } else {
                    cards.settings_mut().set_game_id_tracking(enabled);
                }
                println!("{} {}", command, if enabled { "enabled" } else { "disabled" });
            }
            "open" => match cards.open_or_fatal(&mut ExitSink) {
                Ok(report) => println!(
                    "{} {} ({:.2} s, {:.2} kB/s)",
                    if report.created { "Created" } else { "Opened" },
                    report.path,
                    report.elapsed.as_secs_f64(),
                    report.throughput_kbps()
                ),
                Err(e) => println!("Error: {}", e),
            },
            "flush" => match cards.flush() {
                Ok(()) => println!("Flushed"),
                Err(e) => println!("Error: {}", e),
            },
            "close" => match cards.close() {
                Ok(()) => println!("Closed"),
                Err(e) => println!("Error: {}", e),
            },
            "read-sector" => {
                let Some(sector) = parts.get(1).and_then(|s| parse_number(s)) else {
                    println!("Usage: read-sector <n>");
                    continue;
                };
                let mut buf = [0u8; SECTOR_SIZE];
                match cards.read_sector(sector, &mut buf) {
                    Ok(()) => print_hex_dump(&buf, sector * SECTOR_SIZE),
                    Err(e) => println!("Error: {}", e),
                }
            }
            "write-sector" => {
                let sector = parts.get(1).and_then(|s| parse_number(s));
                let byte = parts
                    .get(2)
                    .and_then(|s| parse_number(s))
                    .and_then(|b| u8::try_from(b).ok());
                let (Some(sector), Some(byte)) = (sector, byte) else {
                    println!("Usage: write-sector <n> <byte>");
                    continue;
                };
                match cards.write_sector(sector, &[byte; SECTOR_SIZE]) {
                    Ok(()) => println!("Filled sector {} with 0x{:02X}", sector, byte),
                    Err(e) => println!("Error: {}", e),
                }
            }
            _ => println!("Unknown command '{}'. Type 'help' for commands.", command),
        }
    }

    if let Some(history_path) = history_path() {
        let _ = rl.save_history(&history_path);
    }
    if let Err(e) = cards.close() {
        println!("Error: {}", e);
    }
    println!("Goodbye!");
}

/// Parse a decimal or 0x-prefixed hex number
fn parse_number(s: &str) -> Option<usize> {
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => usize::from_str_radix(hex, 16).ok(),
        None => s.parse().ok(),
    }
}

fn print_status(cards: &CardManager) {
    println!("Card:     {}", cards.selection());
    println!("Folder:   {}", cards.folder_name());
    println!("Channels: {}", cards.max_channels());
    println!("Path:     {}", cards.resolve_path());
    match cards.current_path() {
        Some(path) => println!("Open:     {}", path),
        None => println!("Open:     (none)"),
    }
    if cards.needs_update() {
        println!("Selection changed; 'open' to switch cards");
    }
}

fn print_hex_dump(data: &[u8], base: usize) {
    for (i, chunk) in data.chunks(16).enumerate() {
        let hex: Vec<String> = chunk.iter().map(|b| format!("{:02X}", b)).collect();
        let ascii: String = chunk
            .iter()
            .map(|&b| if (0x20..0x7F).contains(&b) { b as char } else { '.' })
            .collect();
        println!("{:06X}  {}  {}", base + i * 16, hex.join(" "), ascii);
    }
}

fn print_help() {
    for (title, commands) in SECTIONS {
        println!("{}:", title);
        for command in commands.iter() {
            let usage = format!("{} {}", command.name, command.args);
            println!("  {:<24} {}", usage.trim_end(), command.help);
        }
        println!();
    }
    println!("Set CARDMAN_LOG (e.g. CARDMAN_LOG=debug) to change log output.");
}
