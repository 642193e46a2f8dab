use criterion::{black_box, criterion_group, criterion_main, Criterion};

use starlane::board::{PieceId, Player, Role, Snapshot};
use starlane::nn::encoding::encode_state;
use starlane::nn::policy::{
    canonical_indices, decode_action_from_legal, encode_action, ATTACK_BASE, CONSTRUCT_BASE,
    HEAD_WIDTH, MOVE_FINISH_BASE, PASS_INDEX,
};

/// A busy mid-game position: both homes, three discovered stars, a spread
/// of ships, the rest of the pieces banked.
fn busy_position() -> Snapshot {
    let mut snap = Snapshot::initial();
    snap.set_role(PieceId::new(15), Role::HomeStar(Player::White));
    snap.set_role(PieceId::new(27), Role::HomeStar(Player::White));
    snap.set_role(PieceId::new(24), Role::HomeStar(Player::Black));
    snap.set_role(PieceId::new(28), Role::HomeStar(Player::Black));
    for star in [0u8, 13, 22] {
        snap.set_role(PieceId::new(star), Role::Star);
    }
    let ships = [
        (18u8, Player::White, 15u8),
        (19, Player::White, 0),
        (3, Player::White, 0),
        (4, Player::Black, 0),
        (9, Player::Black, 15),
        (10, Player::Black, 27),
        (33, Player::Black, 24),
        (30, Player::White, 13),
        (31, Player::White, 22),
    ];
    for (piece, owner, system) in ships {
        snap.set_role(
            PieceId::new(piece),
            Role::Ship { owner, system: PieceId::new(system) },
        );
    }
    snap
}

/// A plausible mid-game legal set spanning most families.
fn busy_legal() -> Vec<u16> {
    let mut legal = vec![
        ATTACK_BASE + 4,
        ATTACK_BASE + 9,
        ATTACK_BASE + 10,
        MOVE_FINISH_BASE + 15,
        MOVE_FINISH_BASE + 27,
        MOVE_FINISH_BASE + 13,
        MOVE_FINISH_BASE + 22,
        PASS_INDEX,
        PASS_INDEX + 1,
    ];
    // Every banked piece is a construct candidate and a discovery target.
    let snap = busy_position();
    for piece in snap.bank() {
        legal.push(CONSTRUCT_BASE + piece.raw() as u16);
        legal.push(MOVE_FINISH_BASE + piece.raw() as u16);
    }
    legal
}

fn bench_encode_state(c: &mut Criterion) {
    let snap = busy_position();
    c.bench_function("encode_state_midgame", |b| {
        b.iter(|| encode_state(black_box(&snap)))
    });
}

fn bench_encode_action(c: &mut Criterion) {
    let actions: Vec<_> = (0..HEAD_WIDTH as u16).map(|i| {
        starlane::nn::policy::action_at(i)
    }).collect();
    c.bench_function("encode_action_full_head", |b| {
        b.iter(|| {
            let mut acc = 0u32;
            for action in &actions {
                acc += encode_action(black_box(action)) as u32;
            }
            acc
        })
    });
}

fn bench_canonicalize(c: &mut Criterion) {
    let snap = busy_position();
    let legal = busy_legal();
    c.bench_function("canonical_indices_midgame", |b| {
        b.iter(|| canonical_indices(black_box(&snap), black_box(&legal)))
    });
}

fn bench_decode(c: &mut Criterion) {
    let snap = busy_position();
    let legal = busy_legal();
    let scores: Vec<f32> = (0..HEAD_WIDTH)
        .map(|i| ((i * 37) % 997) as f32 / 997.0)
        .collect();
    c.bench_function("decode_action_midgame", |b| {
        b.iter(|| decode_action_from_legal(black_box(&snap), black_box(&legal), black_box(&scores)))
    });
}

criterion_group!(
    benches,
    bench_encode_state,
    bench_encode_action,
    bench_canonicalize,
    bench_decode
);
criterion_main!(benches);
