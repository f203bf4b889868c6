use gridblast_core::constants::{BOARD_HEIGHT, BOARD_WIDTH, CELL_SIZE};
use gridblast_core::{BonusKind, CellPos, Game, Obstacle, PlayerId};
use uuid::Uuid;

fn pid(n: u128) -> PlayerId {
    PlayerId(Uuid::from_u128(n))
}

/// Independent re-derivation of the four-ray fire shape from a board
/// snapshot, used to cross-check detonation output.
fn expected_fire(obstacles: &[Obstacle], origin: CellPos, radius: u32) -> Vec<CellPos> {
    let mut cells = vec![origin];
    for (dx, dy) in [(0, -1), (0, 1), (-1, 0), (1, 0)] {
        for step in 1..=radius as i32 {
            let cell = CellPos::new(origin.x + dx * CELL_SIZE * step, origin.y + dy * CELL_SIZE * step);
            if !(0..BOARD_WIDTH).contains(&cell.x) || !(0..BOARD_HEIGHT).contains(&cell.y) {
                break;
            }
            match obstacles.iter().find(|o| o.cell() == cell) {
                Some(o) if !o.is_destructible => break,
                Some(_) => {
                    cells.push(cell);
                    break;
                }
                None => cells.push(cell),
            }
        }
    }
    cells.sort_by_key(|c| (c.x, c.y));
    cells
}

fn sorted_cells(cells: impl Iterator<Item = CellPos>) -> Vec<CellPos> {
    let mut cells: Vec<CellPos> = cells.collect();
    cells.sort_by_key(|c| (c.x, c.y));
    cells
}

/// First obstacle-free cell off the board edges, in scan order. Always
/// exists: obstacles cover a few dozen cells of 192.
fn free_cell(game: &Game) -> CellPos {
    for y in (0..BOARD_HEIGHT).step_by(CELL_SIZE as usize) {
        for x in (0..BOARD_WIDTH).step_by(CELL_SIZE as usize) {
            let cell = CellPos::new(x, y);
            if x != 0 && y != 0 && game.obstacle_at(cell).is_none() {
                return cell;
            }
        }
    }
    unreachable!("board has no free cell");
}

/// First obstacle-free cell sharing neither row nor column with `from`,
/// which no blast centred on `from` can reach.
fn retreat_cell(game: &Game, from: CellPos) -> CellPos {
    for y in (0..BOARD_HEIGHT).step_by(CELL_SIZE as usize) {
        for x in (0..BOARD_WIDTH).step_by(CELL_SIZE as usize) {
            let cell = CellPos::new(x, y);
            if x != from.x && y != from.y && game.obstacle_at(cell).is_none() {
                return cell;
            }
        }
    }
    unreachable!("board has no cell off the blast rays");
}

#[test]
fn fire_matches_the_ray_rules_across_seeds() {
    for seed in 1..=50u32 {
        let mut game = Game::new(seed);
        let p = pid(seed as u128);
        let snapshot = game.add_player(p).expect("room is empty");

        let spot = free_cell(&game);
        game.try_move(p, spot).expect("scan picked an open cell");
        let board_before: Vec<Obstacle> = game.obstacles().to_vec();

        let bomb = game.place_bomb(p).expect("fresh player has a free slot");
        let outcome = game.detonate_bomb(bomb.id).expect("bomb was just placed");

        let expected = expected_fire(&board_before, spot, snapshot.blast_radius);
        let got = sorted_cells(outcome.fire.iter().map(|f| f.cell()));
        assert_eq!(got, expected, "seed {seed} fire shape diverged");

        // Destroyed obstacles and fire agree with each other.
        for cell in &outcome.destroyed_obstacles {
            assert!(got.contains(cell), "seed {seed}: destroyed cell has no fire");
            assert!(game.obstacle_at(*cell).is_none());
        }
        for bonus in &outcome.spawned_bonuses {
            assert!(
                outcome.destroyed_obstacles.contains(&bonus.cell()),
                "seed {seed}: bonus off the rubble"
            );
        }
        game.validate_invariants().expect("post-detonation state");
    }
}

#[test]
fn full_exchange_replays_identically_from_the_seed() {
    let script = |game: &mut Game| {
        let a = pid(1);
        let b = pid(2);
        game.add_player(a).expect("first join");
        game.add_player(b).expect("second join");

        let spot = free_cell(game);
        game.try_move(a, spot).expect("open cell");
        let bomb = game.place_bomb(a).expect("free slot");
        let outcome = game.detonate_bomb(bomb.id).expect("placed bomb");
        game.clear_blast(outcome.id).expect("blast exists");
        outcome
    };

    let mut left = Game::new(0xFEED_FACE);
    let mut right = Game::new(0xFEED_FACE);
    assert_eq!(left.obstacles(), right.obstacles());

    let left_outcome = script(&mut left);
    let right_outcome = script(&mut right);
    assert_eq!(left_outcome, right_outcome);
    assert_eq!(left.obstacles(), right.obstacles());
    assert_eq!(left.bonuses(), right.bonuses());
    assert_eq!(left.snapshot_players(), right.snapshot_players());
}

#[test]
fn a_radius_pickup_extends_the_reach() {
    // At least one opening blast across these seeds drops a radius pickup;
    // walking over it must raise the stat and the tally together.
    let mut exercised = false;
    for seed in 1..=40u32 {
        let mut game = Game::new(seed);
        let p = pid(seed as u128);
        let start = game.add_player(p).expect("empty room").blast_radius;

        let spot = free_cell(&game);
        game.try_move(p, spot).expect("open cell");
        let bomb = game.place_bomb(p).expect("free slot");
        let retreat = retreat_cell(&game, spot);
        game.try_move(p, retreat).expect("open cell off the rays");

        let outcome = game.detonate_bomb(bomb.id).expect("placed bomb");
        assert!(
            outcome.hit_players.is_empty(),
            "seed {seed}: bomber stood clear of the rays"
        );
        game.clear_blast(outcome.id).expect("blast exists");

        let Some(bonus) = outcome
            .spawned_bonuses
            .iter()
            .find(|b| b.kind == BonusKind::Radius)
            .copied()
        else {
            continue;
        };
        game.try_move(p, bonus.cell()).expect("rubble cell is open");
        let player = game
            .snapshot_players()
            .into_iter()
            .find(|s| s.id == p)
            .expect("still on the roster");
        assert_eq!(player.blast_radius, start + 1);
        assert_eq!(player.bonuses.radius, 1);
        exercised = true;
    }
    assert!(exercised, "no seed dropped a radius pickup");
}
