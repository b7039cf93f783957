//! Headless soak runner: drives the simulation with random steering for a
//! fixed number of ticks and prints a JSON summary. Useful for shaking out
//! rule regressions without a window.

use chrono::Local;
use rand::Rng;
use serde::Serialize;

use crate::duel_game::{Direction, DuelGame, Player};

#[derive(Serialize, Debug)]
pub struct SoakReport {
    pub finished_at: String,
    pub ticks: u64,
    pub eats: u32,
    pub resets: u32,
    pub best_score: u32,
}

pub struct SoakRunner {
    game: DuelGame,
    ticks: u64,
}

impl SoakRunner {
    pub fn new(ticks: u64) -> Self {
        Self {
            game: DuelGame::new(),
            ticks,
        }
    }

    pub fn run(&mut self) -> SoakReport {
        let mut rng = rand::thread_rng();
        let mut eats = 0_u32;
        let mut resets = 0_u32;
        for _ in 0..self.ticks {
            for player in Player::BOTH {
                // Random steering, roughly one press a second per player.
                if rng.gen_bool(0.02) {
                    self.game.steer(player, Direction::random());
                }
            }
            let score_before = self.game.score;
            let started_before = self.game.any_started();
            self.game.update(None);
            if self.game.score > score_before {
                eats += self.game.score - score_before;
            }
            // A reset is the only transition that clears every facing.
            if started_before && !self.game.any_started() {
                resets += 1;
            }
        }
        let report = SoakReport {
            finished_at: Local::now().to_rfc3339(),
            ticks: self.ticks,
            eats,
            resets,
            best_score: self.game.best_score,
        };
        println!("{}", serde_json::to_string_pretty(&report).unwrap());
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn soak_keeps_invariants() {
        let mut runner = SoakRunner::new(5_000);
        let report = runner.run();
        assert_eq!(report.ticks, 5_000);
        assert!(runner.game.snakes.iter().all(|s| s.length() >= 1));
        assert!(DuelGame::is_in_bounds(runner.game.food));
        assert!(runner.game.best_score >= runner.game.score);
    }
}
