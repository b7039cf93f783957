//! Two-player snake simulation. No rendering, no input devices: the host
//! feeds steering commands and calls [`DuelGame::update`] once per frame.

use std::ops;
use log::debug;
use rand::Rng;
use serde::{Serialize, Deserialize};

#[derive(Copy, Clone, PartialEq, Eq, Serialize, Deserialize, Debug, Default)]
pub struct GridPoint {
    pub x: i16,
    pub y: i16,
}

impl GridPoint {
    pub fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }
}

impl ops::Add<Self> for GridPoint {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        GridPoint { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

/// Grid directions. `y` grows downward, matching the playfield rows.
#[derive(Copy, Clone, PartialEq, Eq, Serialize, Deserialize, Debug)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub fn random() -> Direction {
        Self::from_index(rand::thread_rng().gen_range(0..4))
    }

    pub fn from_index(i: usize) -> Direction {
        match i {
            0 => Direction::Left,
            1 => Direction::Right,
            2 => Direction::Up,
            3 => Direction::Down,
            _ => panic!("Bad i in from_index()"),
        }
    }

    pub fn to_point(self) -> GridPoint {
        match self {
            Direction::Left  => GridPoint { x: -1, y: 0 },
            Direction::Right => GridPoint { x: 1, y: 0 },
            Direction::Up    => GridPoint { x: 0, y: -1 },
            Direction::Down  => GridPoint { x: 0, y: 1 },
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Left  => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::Up    => Direction::Down,
            Direction::Down  => Direction::Up,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Serialize, Deserialize, Debug)]
pub enum Player {
    One,
    Two,
}

impl Player {
    pub const BOTH: [Player; 2] = [Player::One, Player::Two];

    pub fn index(self) -> usize {
        match self {
            Player::One => 0,
            Player::Two => 1,
        }
    }

    pub fn other(self) -> Player {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }
}

/// One snake: segments with the head at index 0, plus the direction it will
/// take on its next scheduled move. `facing == None` means the player has
/// not started yet; such a snake neither moves nor collides.
#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct Snake {
    pub segments: Vec<GridPoint>,
    pub facing: Option<Direction>,
}

impl Snake {
    pub(self) fn spawn(head: GridPoint) -> Snake {
        Snake { segments: vec![head], facing: None }
    }

    pub(self) fn restart(&mut self, head: GridPoint) {
        self.segments.truncate(1);
        self.segments[0] = head;
        self.facing = None;
    }

    pub fn head(&self) -> GridPoint {
        self.segments[0]
    }

    pub fn length(&self) -> usize {
        self.segments.len()
    }

    fn occupies(&self, pt: GridPoint) -> bool {
        self.segments.contains(&pt)
    }

    /// Shift every segment onto its predecessor, tail to head, then advance
    /// the head one cell.
    fn shift_and_advance(&mut self, direction: Direction) {
        for i in (1..self.segments.len()).rev() {
            self.segments[i] = self.segments[i - 1];
        }
        self.segments[0] = self.segments[0] + direction.to_point();
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct DuelGame {
    pub snakes: [Snake; 2],
    pub food: GridPoint,
    pub timer: u64,
    pub move_interval: u64,
    pub score: u32,
    pub best_score: u32,
    pub level: u32,
}

impl DuelGame {
    pub const GRID_WIDTH: i16 = 64;
    pub const GRID_HEIGHT: i16 = 48;
    /// Pixels per grid cell.
    pub const CELL_SIZE: i16 = 10;
    pub const START_INTERVAL: u64 = 4;

    const PLAYER_ONE_START: GridPoint =
        GridPoint { x: Self::GRID_WIDTH / 2, y: Self::GRID_HEIGHT / 2 };
    const PLAYER_TWO_START: GridPoint =
        GridPoint { x: Self::GRID_WIDTH / 3, y: Self::GRID_HEIGHT / 3 };
    const FOOD_START: GridPoint = GridPoint { x: 30, y: 30 };

    #[allow(clippy::new_without_default)]
    pub fn new() -> DuelGame {
        DuelGame {
            snakes: [
                Snake::spawn(Self::PLAYER_ONE_START),
                Snake::spawn(Self::PLAYER_TWO_START),
            ],
            food: Self::FOOD_START,
            timer: 0,
            move_interval: Self::START_INTERVAL,
            score: 0,
            best_score: 0,
            level: 1,
        }
    }

    /// Back to the start configuration. The best score survives; it only
    /// clears with the process.
    pub fn reset(&mut self) {
        self.snakes[0].restart(Self::PLAYER_ONE_START);
        self.snakes[1].restart(Self::PLAYER_TWO_START);
        self.food = Self::FOOD_START;
        self.move_interval = Self::START_INTERVAL;
        self.score = 0;
        self.level = 1;
        debug!("round reset; best score {}", self.best_score);
    }

    /// Apply a freshly pressed direction. An exact reversal of the current
    /// facing is rejected, since it would always drive the head into the
    /// neck segment.
    pub fn steer(&mut self, player: Player, direction: Direction) {
        let snake = &mut self.snakes[player.index()];
        if snake.facing == Some(direction.opposite()) {
            return;
        }
        snake.facing = Some(direction);
    }

    pub fn is_in_bounds(pt: GridPoint) -> bool {
        pt.x >= 0 && pt.y >= 0 && pt.x < Self::GRID_WIDTH && pt.y < Self::GRID_HEIGHT
    }

    /// True once either player has picked a direction. The host shows the
    /// start prompt until then.
    pub fn any_started(&self) -> bool {
        self.snakes.iter().any(|s| s.facing.is_some())
    }

    /// Advance the simulation by one tick. Snakes move only on ticks where
    /// `timer % move_interval == 0`; every other tick just counts.
    ///
    /// For live play `new_food_location` should be `None`, in which case a
    /// random cell is chosen when food is eaten. Tests and playback may pass
    /// the next food cell explicitly.
    pub fn update(&mut self, new_food_location: Option<GridPoint>) {
        if self.timer % self.move_interval == 0 {
            for player in Player::BOTH {
                if !self.move_step(player, new_food_location) {
                    // The round was reset; nobody else moves this tick.
                    break;
                }
            }
        }
        self.timer += 1;
    }

    /// One scheduled move for one snake. Collisions are judged on the
    /// pre-move head, so an out-of-bounds or overlapping head committed by
    /// the previous move is what triggers the reset. Returns false when the
    /// round was reset.
    fn move_step(&mut self, player: Player, new_food_location: Option<GridPoint>) -> bool {
        let i = player.index();
        let Some(facing) = self.snakes[i].facing else {
            return true;
        };
        let head = self.snakes[i].head();

        let hit_wall = !Self::is_in_bounds(head);
        let hit_self = self.snakes[i].segments[1..].contains(&head);
        let hit_other = self.snakes[player.other().index()].occupies(head);
        if hit_wall || hit_self || hit_other {
            debug!(
                "player {player:?} crashed (wall={hit_wall} self={hit_self} other={hit_other})"
            );
            self.reset();
            return false;
        }

        if head == self.food {
            self.eat(player, new_food_location);
        }

        self.snakes[i].shift_and_advance(facing);
        true
    }

    fn eat(&mut self, player: Player, new_food_location: Option<GridPoint>) {
        self.food = match new_food_location {
            None => Self::rand_point(),
            Some(pt) => pt,
        };

        // Grow by duplicating the tail; the coming shift pulls the body
        // apart again.
        let snake = &mut self.snakes[player.index()];
        let tail = *snake.segments.last().unwrap();
        snake.segments.push(tail);

        self.score += 1;
        if self.best_score < self.score {
            self.best_score = self.score;
        }
        let (level, interval) = Self::level_for(snake.length());
        self.level = level;
        self.move_interval = interval;
        debug!(
            "player {player:?} ate; score {} level {} interval {}",
            self.score, self.level, self.move_interval
        );
    }

    fn level_for(length: usize) -> (u32, u64) {
        if length > 20 {
            (3, 2)
        } else if length > 10 {
            (2, 3)
        } else {
            (1, Self::START_INTERVAL)
        }
    }

    fn rand_point() -> GridPoint {
        GridPoint {
            x: rand::thread_rng().gen_range(0..Self::GRID_WIDTH),
            y: rand::thread_rng().gen_range(0..Self::GRID_HEIGHT),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Parking spot for relocated food, far off every path the tests drive.
    const PARKED: GridPoint = GridPoint { x: 1, y: 1 };

    /// Tick until exactly one scheduled move has happened.
    fn run_one_move(g: &mut DuelGame) {
        loop {
            let moved = g.timer % g.move_interval == 0;
            g.update(Some(PARKED));
            if moved {
                break;
            }
        }
    }

    fn run_moves(g: &mut DuelGame, n: usize) {
        for _ in 0..n {
            run_one_move(g);
        }
    }

    /// Force `n` consecutive eats by re-parking the food on the head before
    /// every scheduled move.
    fn eat_n(g: &mut DuelGame, player: Player, n: usize) {
        for _ in 0..n {
            g.food = g.snakes[player.index()].head();
            let before = g.score;
            while g.score == before {
                g.update(Some(PARKED));
            }
        }
    }

    #[test]
    fn moves_one_cell_per_interval() {
        let mut g = DuelGame::new();
        g.steer(Player::One, Direction::Right);
        for _ in 0..g.move_interval {
            g.update(Some(PARKED));
        }
        assert_eq!(g.snakes[0].head(), GridPoint::new(33, 24));
        // Player two has not started and stays put.
        assert_eq!(g.snakes[1].head(), GridPoint::new(21, 16));
    }

    #[test]
    fn idle_snake_never_moves() {
        let mut g = DuelGame::new();
        for _ in 0..40 {
            g.update(Some(PARKED));
        }
        assert_eq!(g.snakes[0].head(), GridPoint::new(32, 24));
        assert_eq!(g.snakes[1].head(), GridPoint::new(21, 16));
        assert_eq!(g.score, 0);
    }

    #[test]
    fn reversal_is_rejected() {
        let mut g = DuelGame::new();
        g.steer(Player::One, Direction::Right);
        g.steer(Player::One, Direction::Left);
        assert_eq!(g.snakes[0].facing, Some(Direction::Right));

        g.steer(Player::One, Direction::Up);
        g.steer(Player::One, Direction::Down);
        assert_eq!(g.snakes[0].facing, Some(Direction::Up));

        // A perpendicular turn is fine.
        g.steer(Player::One, Direction::Left);
        assert_eq!(g.snakes[0].facing, Some(Direction::Left));
    }

    #[test]
    fn first_press_accepts_any_direction() {
        for dir in [Direction::Left, Direction::Right, Direction::Up, Direction::Down] {
            let mut g = DuelGame::new();
            g.steer(Player::Two, dir);
            assert_eq!(g.snakes[1].facing, Some(dir));
        }
    }

    #[test]
    fn wall_collision_resets_round() {
        let mut g = DuelGame::new();
        g.steer(Player::One, Direction::Right);
        // 32 moves put the head at x = 64, one past the last column; the
        // following scheduled move detects the wall hit and resets.
        run_moves(&mut g, 32);
        assert_eq!(g.snakes[0].head(), GridPoint::new(64, 24));
        run_one_move(&mut g);
        assert_eq!(g.snakes[0].length(), 1);
        assert_eq!(g.snakes[0].head(), GridPoint::new(32, 24));
        assert_eq!(g.snakes[0].facing, None);
        assert_eq!(g.snakes[1].head(), GridPoint::new(21, 16));
        assert_eq!(g.score, 0);
        assert_eq!(g.level, 1);
        assert_eq!(g.move_interval, DuelGame::START_INTERVAL);
    }

    #[test]
    fn eating_grows_and_scores() {
        let mut g = DuelGame::new();
        g.steer(Player::One, Direction::Right);
        g.food = g.snakes[0].head();
        run_one_move(&mut g);
        assert_eq!(g.score, 1);
        assert_eq!(g.best_score, 1);
        assert_eq!(g.snakes[0].length(), 2);
        assert_eq!(g.food, PARKED);
        // Head advanced as part of the same move.
        assert_eq!(g.snakes[0].head(), GridPoint::new(33, 24));
    }

    #[test]
    fn random_food_relocation_is_in_bounds() {
        for _ in 0..200 {
            let mut g = DuelGame::new();
            g.steer(Player::One, Direction::Right);
            g.food = g.snakes[0].head();
            let before = g.score;
            while g.score == before {
                g.update(None);
            }
            assert!(DuelGame::is_in_bounds(g.food), "food out of bounds: {:?}", g.food);
        }
    }

    #[test]
    fn length_only_drops_across_reset() {
        let mut g = DuelGame::new();
        g.steer(Player::One, Direction::Right);
        eat_n(&mut g, Player::One, 3);
        assert_eq!(g.snakes[0].length(), 4);
        g.reset();
        assert_eq!(g.snakes[0].length(), 1);
        assert_eq!(g.snakes[1].length(), 1);
    }

    #[test]
    fn self_collision_resets_round() {
        let mut g = DuelGame::new();
        g.steer(Player::One, Direction::Right);
        eat_n(&mut g, Player::One, 4);
        assert_eq!(g.snakes[0].length(), 5);
        // A tight box turn puts the head back onto its own tail cell.
        for dir in [Direction::Down, Direction::Left, Direction::Up] {
            g.steer(Player::One, dir);
            run_one_move(&mut g);
        }
        run_one_move(&mut g);
        assert_eq!(g.snakes[0].length(), 1);
        assert_eq!(g.snakes[0].head(), GridPoint::new(32, 24));
        assert_eq!(g.score, 0);
    }

    #[test]
    fn opponent_collision_resets_both() {
        let mut g = DuelGame::new();
        // Walk player one onto player two's (stationary) cell at (21, 16).
        g.steer(Player::One, Direction::Up);
        run_moves(&mut g, 8);
        assert_eq!(g.snakes[0].head(), GridPoint::new(32, 16));
        g.steer(Player::One, Direction::Left);
        run_moves(&mut g, 11);
        assert_eq!(g.snakes[0].head(), GridPoint::new(21, 16));
        run_one_move(&mut g);
        assert_eq!(g.snakes[0].length(), 1);
        assert_eq!(g.snakes[0].head(), GridPoint::new(32, 24));
        assert_eq!(g.snakes[1].length(), 1);
        assert_eq!(g.snakes[1].head(), GridPoint::new(21, 16));
        assert_eq!(g.snakes[0].facing, None);
        assert_eq!(g.snakes[1].facing, None);
    }

    #[test]
    fn best_score_survives_reset() {
        let mut g = DuelGame::new();
        g.steer(Player::One, Direction::Right);
        eat_n(&mut g, Player::One, 2);
        assert_eq!(g.score, 2);
        assert_eq!(g.best_score, 2);
        g.reset();
        assert_eq!(g.score, 0);
        assert_eq!(g.best_score, 2);
        g.steer(Player::One, Direction::Right);
        eat_n(&mut g, Player::One, 1);
        assert_eq!(g.score, 1);
        assert_eq!(g.best_score, 2);
    }

    #[test]
    fn level_thresholds() {
        assert_eq!(DuelGame::level_for(1), (1, 4));
        assert_eq!(DuelGame::level_for(10), (1, 4));
        assert_eq!(DuelGame::level_for(11), (2, 3));
        assert_eq!(DuelGame::level_for(20), (2, 3));
        assert_eq!(DuelGame::level_for(21), (3, 2));
    }

    #[test]
    fn leveling_follows_length() {
        let mut g = DuelGame::new();
        g.steer(Player::One, Direction::Right);
        eat_n(&mut g, Player::One, 9);
        assert_eq!(g.snakes[0].length(), 10);
        assert_eq!((g.level, g.move_interval), (1, 4));
        eat_n(&mut g, Player::One, 1);
        assert_eq!(g.snakes[0].length(), 11);
        assert_eq!((g.level, g.move_interval), (2, 3));
        eat_n(&mut g, Player::One, 9);
        assert_eq!(g.snakes[0].length(), 20);
        assert_eq!((g.level, g.move_interval), (2, 3));
        eat_n(&mut g, Player::One, 1);
        assert_eq!(g.snakes[0].length(), 21);
        assert_eq!((g.level, g.move_interval), (3, 2));
    }

    #[test]
    fn direction_round_trips_through_index() {
        for i in 0..4 {
            let dir = Direction::from_index(i);
            assert_eq!(dir.opposite().opposite(), dir);
        }
    }
}
