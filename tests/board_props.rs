use battleship_server::bot::random_layout;
use battleship_server::{Board, Orientation, Ship, ShotOutcome, STANDARD_FLEET};
use proptest::prelude::*;
use rand::{rngs::SmallRng, SeedableRng};

const SIZE: usize = 10;

fn orientation_of(cells: &[(i32, i32)]) -> Orientation {
    match cells.get(1) {
        Some(&(x, _)) if x == cells[0].0 => Orientation::Vertical,
        _ => Orientation::Horizontal,
    }
}

fn random_board(seed: u64) -> Board {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut board = Board::new(SIZE);
    for cells in random_layout(&mut rng, SIZE, &STANDARD_FLEET) {
        let (x, y) = cells[0];
        board
            .place_ship(Ship::new(cells.len()), x, y, orientation_of(&cells))
            .unwrap();
    }
    board
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn placements_never_share_cells(
        attempts in prop::collection::vec((1usize..6, -2i32..12, -2i32..12, any::<bool>()), 0..20)
    ) {
        let mut board = Board::new(SIZE);
        for (len, x, y, vertical) in attempts {
            let orientation = if vertical { Orientation::Vertical } else { Orientation::Horizontal };
            let _ = board.place_ship(Ship::new(len), x, y, orientation);
        }
        let mut owners = vec![None; SIZE * SIZE];
        for (i, ship) in board.ships().iter().enumerate() {
            prop_assert_eq!(ship.cells().len(), ship.length());
            for &(x, y) in ship.cells() {
                prop_assert!(x < SIZE && y < SIZE);
                prop_assert!(owners[y * SIZE + x].is_none());
                owners[y * SIZE + x] = Some(i);
                let cell = board.cell(x, y).unwrap();
                prop_assert!(cell.has_ship());
                prop_assert_eq!(cell.ship().map(|id| id.0), Some(i));
            }
        }
        for y in 0..SIZE {
            for x in 0..SIZE {
                prop_assert_eq!(board.cell(x, y).unwrap().has_ship(), owners[y * SIZE + x].is_some());
            }
        }
    }

    #[test]
    fn repeated_shot_is_already_hit(seed in any::<u64>(), x in 0..SIZE as i32, y in 0..SIZE as i32) {
        let mut board = random_board(seed);
        let first = board.receive_shot(x, y);
        prop_assert_ne!(first, ShotOutcome::AlreadyHit);
        let after = board.clone();
        prop_assert_eq!(board.receive_shot(x, y), ShotOutcome::AlreadyHit);
        prop_assert!(board == after);
    }

    #[test]
    fn out_of_range_is_invalid(seed in any::<u64>(), x in any::<i32>(), y in any::<i32>()) {
        prop_assume!(x < 0 || y < 0 || x >= SIZE as i32 || y >= SIZE as i32);
        let mut board = random_board(seed);
        let before = board.clone();
        prop_assert_eq!(board.receive_shot(x, y), ShotOutcome::Invalid);
        prop_assert!(board == before);
    }

    #[test]
    fn game_over_only_on_last_sink(seed in any::<u64>(), order in Just((0..SIZE * SIZE).collect::<Vec<_>>()).prop_shuffle()) {
        let mut board = random_board(seed);
        let fleet = board.ships().len();
        let mut sunk = 0;
        let mut game_over_seen = false;
        for i in order {
            let (x, y) = ((i % SIZE) as i32, (i / SIZE) as i32);
            let before = board.ships_sunk();
            let outcome = board.receive_shot(x, y);
            match outcome {
                ShotOutcome::Sunk | ShotOutcome::GameOver => {
                    prop_assert_eq!(board.ships_sunk(), before + 1);
                    sunk += 1;
                }
                _ => prop_assert_eq!(board.ships_sunk(), before),
            }
            if outcome == ShotOutcome::GameOver {
                prop_assert!(!game_over_seen);
                prop_assert_eq!(sunk, fleet);
                game_over_seen = true;
            }
        }
        prop_assert!(game_over_seen);
        prop_assert!(board.all_ships_sunk());
    }
}
