use criterion::{criterion_group, criterion_main, Criterion, black_box};
use onetile::selfplay::{SelfPlayParams, play_random_game};
use onetile::spawn::RngSource;
use onetile::{Board, Direction, Engine, GameState};

fn bench_slide(c: &mut Criterion) {
    let board = Board::from_cells([2, 0, 0, 0, 0, 4, 0, 0, 0, 0, 8, 0, 0, 0, 0, 16]).unwrap();
    let mut engine = Engine::new(RngSource::seeded(1));
    c.bench_function("slide_across_row", |b| {
        b.iter(|| {
            let mut state = GameState::from_board(board);
            let _ = state.select(0);
            black_box(engine.move_selected(&mut state, black_box(Direction::Right)))
        })
    });
}

fn bench_game_over(c: &mut Criterion) {
    let board = Board::from_cells([2, 4, 2, 4, 4, 2, 4, 2, 2, 4, 2, 4, 4, 2, 4, 2]).unwrap();
    c.bench_function("is_game_over_full", |b| b.iter(|| black_box(black_box(board).is_game_over())));
}

fn bench_random_game(c: &mut Criterion) {
    let params = SelfPlayParams { max_moves: 1_000, ..SelfPlayParams::default() };
    let mut seed = 0u64;
    c.bench_function("random_game_1000_moves", |b| {
        b.iter(|| {
            seed += 1;
            black_box(play_random_game(seed, &params))
        })
    });
}

criterion_group!(benches, bench_slide, bench_game_over, bench_random_game);
criterion_main!(benches);
