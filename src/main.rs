use anyhow::Result;
use clap::Parser;
use onetile::config::GameConfig;
use onetile::session::{Session, Status};
use onetile::spawn::RngSource;
use onetile::store::{BestScore, JsonFileStore, MemoryStore, ScoreStore};
use onetile::{Direction, Engine, GameState, SIDE};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Play single-tile 2048 in the terminal", long_about = None)]
struct Args {
    /// Seed for tile spawning (random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// JSON config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// File that keeps the best score across runs
    #[arg(long)]
    best_score: Option<PathBuf>,

    /// Keep the player's selection when a new tile spawns
    #[arg(long)]
    no_auto_select: bool,
}

fn print_state(state: &GameState, best: u64, status: Status) {
    println!();
    for row in 0..SIDE {
        let cells: Vec<String> = (0..SIDE)
            .map(|col| {
                let i = row * SIDE + col;
                let v = state.board()[i];
                let text = if v == 0 { String::from(".") } else { v.to_string() };
                if state.selected() == Some(i) { format!("[{:^4}]", text) } else { format!(" {:^4} ", text) }
            })
            .collect();
        println!("{}", cells.join(""));
    }
    println!("score: {}  best: {}", state.score(), best);
    if status != Status::Playing { println!("{}", status); }
}

fn print_help() {
    println!("Commands: <0-15> or 'select N' to pick a tile, up/down/left/right to slide it, 'new', 'quit'");
}

#[derive(Debug, PartialEq)]
enum Command {
    Quit,
    Help,
    New,
    Select(usize),
    Move(Direction),
}

fn parse_command(line: &str) -> std::result::Result<Command, String> {
    match line {
        "quit" | "q" => return Ok(Command::Quit),
        "help" => return Ok(Command::Help),
        "new" => return Ok(Command::New),
        _ => {}
    }
    if let Some(rest) = line.strip_prefix("select") {
        let rest = rest.trim();
        return rest.parse::<usize>().map(Command::Select).map_err(|_| format!("Bad tile index: {:?}", rest));
    }
    if let Ok(index) = line.parse::<usize>() {
        return Ok(Command::Select(index));
    }
    line.parse::<Direction>().map(Command::Move).map_err(|e| e.to_string())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(p) => GameConfig::from_json_file(p)?,
        None => GameConfig::default(),
    };
    if args.no_auto_select { config.auto_select_spawned = false; }
    if args.best_score.is_some() { config.best_score_path = args.best_score.clone(); }

    let source = match args.seed {
        Some(s) => RngSource::seeded(s),
        None => RngSource::from_entropy(),
    };
    let store: Box<dyn ScoreStore> = match &config.best_score_path {
        Some(p) => Box::new(JsonFileStore::new(p)),
        None => Box::new(MemoryStore::default()),
    };
    let mut session = Session::new(Engine::with_config(source, &config), BestScore::load(store));

    print_help();
    print_state(session.state(), session.best_score(), session.status());
    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 { break; }
        let line = line.trim();
        if line.is_empty() { continue; }
        match parse_command(line) {
            Ok(Command::Quit) => break,
            Ok(Command::Help) => { print_help(); continue; }
            Ok(Command::New) => session.restart(),
            Ok(Command::Select(index)) => match session.select(index) {
                Ok(true) => {}
                Ok(false) => println!("Cell {} is empty", index),
                Err(e) => println!("{}", e),
            },
            Ok(Command::Move(dir)) => {
                let r = session.play(dir);
                if !r.moved { println!("Nothing moved"); }
                if let Some(v) = r.merged_value { println!("Merged into {}", v); }
            }
            Err(msg) => { println!("{}", msg); continue; }
        }
        print_state(session.state(), session.best_score(), session.status());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands() {
        assert_eq!(parse_command("q"), Ok(Command::Quit));
        assert_eq!(parse_command("new"), Ok(Command::New));
        assert_eq!(parse_command("7"), Ok(Command::Select(7)));
        assert_eq!(parse_command("select 12"), Ok(Command::Select(12)));
        assert_eq!(parse_command("ArrowLeft"), Ok(Command::Move(Direction::Left)));
    }

    #[test]
    fn bad_select_index_is_reported_as_index() {
        assert_eq!(parse_command("select abc"), Err("Bad tile index: \"abc\"".to_string()));
        assert_eq!(parse_command("select"), Err("Bad tile index: \"\"".to_string()));
        assert!(parse_command("sideways").unwrap_err().contains("unrecognized direction"));
    }
}
