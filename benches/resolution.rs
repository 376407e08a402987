use criterion::{black_box, criterion_group, criterion_main, Criterion};
use drop_merge::core::physics::{apply_gravity, resolve_board};
use drop_merge::core::{Board, BoardGeometry, Resolver, Spawner};
use drop_merge::engine::Game;
use drop_merge::types::GameAction;

/// Checkerboard of alternating exponents with a gap row, so everything falls
fn floating_board(visible_height: u8) -> Board {
    let mut board = Board::new(BoardGeometry { visible_height });
    let height = board.height() as i8;
    for y in (2..height - 2).step_by(2) {
        for x in (0..10).step_by(2) {
            let k = 1 + ((x / 2 + y / 2) % 2) as u8;
            let id = board.create_tile(k, x, y);
            board.place_tile(id);
        }
    }
    board
}

fn bench_gravity(c: &mut Criterion) {
    c.bench_function("gravity_sweep_12", |b| {
        b.iter(|| {
            let mut board = floating_board(12);
            apply_gravity(black_box(&mut board))
        })
    });
}

fn bench_resolve_board(c: &mut Criterion) {
    c.bench_function("resolve_board_12", |b| {
        b.iter(|| {
            let mut board = floating_board(12);
            resolve_board(black_box(&mut board))
        })
    });

    c.bench_function("resolve_board_120", |b| {
        b.iter(|| {
            let mut board = floating_board(120);
            resolve_board(black_box(&mut board))
        })
    });
}

fn bench_cascade(c: &mut Criterion) {
    c.bench_function("resolver_cascade_12", |b| {
        b.iter(|| {
            let mut board = floating_board(12);
            Resolver::cascade().run(black_box(&mut board))
        })
    });
}

fn bench_spawner(c: &mut Criterion) {
    let mut spawner = Spawner::new(12345);
    spawner.update_max_tile(12);

    c.bench_function("next_exponent", |b| b.iter(|| spawner.next_exponent()));
}

fn bench_turn(c: &mut Criterion) {
    c.bench_function("hundred_turns", |b| {
        b.iter(|| {
            let mut game = Game::default();
            game.start();
            for turn in 0..100u8 {
                if game.game_over() {
                    break;
                }
                game.apply_action(GameAction::DropToColumn(turn % 5));
                game.resolve_all();
            }
            black_box(game.score())
        })
    });
}

criterion_group!(
    benches,
    bench_gravity,
    bench_resolve_board,
    bench_cascade,
    bench_spawner,
    bench_turn
);
criterion_main!(benches);
