use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use onetile::selfplay::{SelfPlayParams, generate_games_with, summarize, write_jsonl};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "onetile-selfplay", about = "Play random single-tile 2048 games and report statistics")]
struct Args {
    #[arg(long, default_value_t = 100)]
    games: usize,
    #[arg(long, default_value_t = 2_000)]
    max_moves: usize,
    #[arg(long, default_value_t = 1)]
    threads: usize,
    #[arg(long, default_value_t = 42)]
    seed: u64,
    /// Keep the player's selection when a new tile spawns
    #[arg(long)]
    no_auto_select: bool,
    /// Write one JSON record per game here
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let a = Args::parse();
    let params = SelfPlayParams {
        games: a.games,
        max_moves: a.max_moves,
        threads: a.threads,
        seed: a.seed,
        auto_select_spawned: !a.no_auto_select,
    };
    eprintln!("Playing {} games (max_moves={}, threads={}, seed={})", a.games, a.max_moves, a.threads, a.seed);
    let pb = ProgressBar::new(a.games as u64);
    pb.set_style(ProgressStyle::with_template("{bar:40} {pos}/{len} games [{elapsed_precise}]")?);
    let games = generate_games_with(&params, &|_| pb.inc(1));
    pb.finish_and_clear();

    let s = summarize(&games);
    println!(
        "games: {}  mean score: {:.1}  best score: {}  highest tile: {}  wins: {}  ended terminal: {}",
        s.games, s.mean_score, s.best_score, s.highest_tile, s.wins, s.terminal
    );
    if let Some(out) = a.out {
        write_jsonl(&games, &out)?;
        eprintln!("Wrote {} records to {}", games.len(), out.display());
    }
    Ok(())
}
