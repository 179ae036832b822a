use rand::Rng;

use crate::components::{Dir, Pellet, PelletKind, Pos};
use crate::ghost::{self, Ghost, Mood, GHOST_RESPAWN, GHOST_STARTS};
use crate::level::Maze;
use crate::player::{Player, PLAYER_MOVE_INTERVAL};

pub const POWER_TICKS: u32 = 400;
/// Vulnerable ghosts blink during the last stretch of power mode.
pub const POWER_WARN_TICKS: u32 = 100;

const SCORE_PELLET: u32 = 10;
const SCORE_POWER: u32 = 50;
const SCORE_GHOST: u32 = 200;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Ticks between ghost steps: larger is slower.
    pub fn ghost_interval(self) -> u32 {
        match self {
            Difficulty::Easy => 15,
            Difficulty::Medium => 10,
            Difficulty::Hard => 5,
        }
    }

    pub fn starting_lives(self) -> u32 {
        match self {
            Difficulty::Easy => 3,
            Difficulty::Medium => 2,
            Difficulty::Hard => 1,
        }
    }

    pub fn parse(s: &str) -> Option<Difficulty> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Playing,
    LevelComplete,
    GameOver,
}

/// Discrete moments an external layer may react to (sound, HUD flashes).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameEvent {
    PelletEaten,
    PowerPelletEaten,
    GhostEaten,
    LifeLost,
    LevelComplete,
}

/// One game session. Owns all mutable simulation state; the driver calls
/// `update` once per frame and reads everything else as a snapshot.
pub struct Game {
    pub maze: Maze,
    pub pellets: Vec<Pellet>,
    pub player: Player,
    pub ghosts: Vec<Ghost>,
    pub score: u32,
    pub lives: u32,
    pub level: u32,
    pub pellets_eaten: usize,
    pub total_pellets: usize,
    pub power_active: bool,
    pub power_timer: u32,
    pub tick: u32,
    pub phase: Phase,
    pub difficulty: Difficulty,
    events: Vec<GameEvent>,
}

impl Game {
    pub fn new(difficulty: Difficulty, rng: &mut impl Rng) -> Self {
        let maze = Maze::generate(rng);
        let pellets = maze.layout_pellets();
        let total_pellets = pellets.len();
        let player = Player::spawn(&maze);
        Self {
            maze,
            pellets,
            player,
            ghosts: Ghost::spawn_all(),
            score: 0,
            lives: difficulty.starting_lives(),
            level: 1,
            pellets_eaten: 0,
            total_pellets,
            power_active: false,
            power_timer: 0,
            tick: 0,
            phase: Phase::Playing,
            difficulty,
            events: Vec::new(),
        }
    }

    /// Rebuild maze, pellets and positions for the next level; score and
    /// lives carry over.
    pub fn next_level(&mut self, rng: &mut impl Rng) {
        let mut fresh = Game::new(self.difficulty, rng);
        fresh.score = self.score;
        fresh.lives = self.lives;
        fresh.level = self.level + 1;
        *self = fresh;
    }

    /// Buffered turn intent from the input source.
    pub fn queue_direction(&mut self, dir: Dir) {
        self.player.queued = dir;
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// One simulation step. Ticking a terminated session is ignored.
    /// Order is contractual: player resolves before ghosts, both before
    /// collisions, collisions before power decay and the completion check.
    pub fn update(&mut self, rng: &mut impl Rng) {
        if self.phase != Phase::Playing {
            return;
        }
        self.tick = self.tick.wrapping_add(1);

        self.player.commit_queued(&self.maze);
        if self.tick % PLAYER_MOVE_INTERVAL == 0 {
            self.player.step(&self.maze);
        }

        self.move_ghosts(rng);
        self.eat_pellet();
        self.resolve_ghost_contact();
        self.tick_power();

        if self.pellets_eaten >= self.total_pellets {
            self.phase = Phase::LevelComplete;
            self.events.push(GameEvent::LevelComplete);
        }
    }

    fn move_ghosts(&mut self, rng: &mut impl Rng) {
        for ghost in &mut self.ghosts {
            ghost.cadence = ghost.cadence.wrapping_add(1);
            let mut interval = self.difficulty.ghost_interval();
            if ghost.vulnerable {
                interval *= 2;
            }
            if ghost.cadence % interval != 0 {
                continue;
            }
            let mood = if ghost.vulnerable { Mood::Flee } else { Mood::Chase };
            if let Some((dir, pos)) = ghost::choose_move(&self.maze, ghost, mood, self.player.pos, rng)
            {
                ghost.pos = pos;
                ghost.dir = dir;
            }
        }
    }

    fn eat_pellet(&mut self) {
        let Some(idx) = self.pellets.iter().position(|p| p.pos == self.player.pos) else {
            return;
        };
        let pellet = self.pellets.remove(idx);
        self.pellets_eaten += 1;
        match pellet.kind {
            PelletKind::Normal => {
                self.score += SCORE_PELLET;
                self.events.push(GameEvent::PelletEaten);
            }
            PelletKind::Power => {
                self.score += SCORE_POWER;
                self.power_active = true;
                self.power_timer = POWER_TICKS;
                for ghost in &mut self.ghosts {
                    ghost.vulnerable = true;
                }
                self.events.push(GameEvent::PowerPelletEaten);
            }
        }
    }

    fn resolve_ghost_contact(&mut self) {
        for i in 0..self.ghosts.len() {
            if self.ghosts[i].pos != self.player.pos {
                continue;
            }
            if self.power_active && self.ghosts[i].vulnerable {
                self.score += SCORE_GHOST;
                self.ghosts[i].pos = GHOST_RESPAWN;
                self.ghosts[i].vulnerable = false;
                self.events.push(GameEvent::GhostEaten);
            } else {
                self.lives = self.lives.saturating_sub(1);
                self.events.push(GameEvent::LifeLost);
                if self.lives == 0 {
                    self.phase = Phase::GameOver;
                    return;
                }
                self.reset_positions();
            }
        }
    }

    /// Back to level-start placements after a lost life. Maze, pellets
    /// and power state are untouched.
    fn reset_positions(&mut self) {
        self.player.reset(&self.maze);
        for (ghost, start) in self.ghosts.iter_mut().zip(GHOST_STARTS) {
            ghost.pos = start;
        }
    }

    fn tick_power(&mut self) {
        if !self.power_active {
            return;
        }
        self.power_timer = self.power_timer.saturating_sub(1);
        if self.power_timer == 0 {
            self.power_active = false;
            for ghost in &mut self.ghosts {
                ghost.vulnerable = false;
            }
        }
    }

    /// Snapshot helper for the renderer.
    pub fn ghost_at(&self, pos: Pos) -> Option<&Ghost> {
        self.ghosts.iter().find(|g| g.pos == pos)
    }

    pub fn pellet_at(&self, pos: Pos) -> Option<&Pellet> {
        self.pellets.iter().find(|p| p.pos == pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn medium_game(seed: u64) -> (Game, StdRng) {
        let mut rng = StdRng::seed_from_u64(seed);
        let game = Game::new(Difficulty::Medium, &mut rng);
        (game, rng)
    }

    /// Clear any pellet under the player so a tick does not score.
    fn park_player(game: &mut Game) {
        game.pellets.retain(|p| p.pos != game.player.pos);
    }

    #[test]
    fn session_starts_consistent() {
        let (game, _) = medium_game(1);
        assert_eq!(game.phase, Phase::Playing);
        assert_eq!(game.ghosts.len(), 4);
        assert_eq!(game.lives, 2);
        assert_eq!(game.level, 1);
        assert_eq!(game.total_pellets, game.pellets.len());
        assert!(!game.power_active);
    }

    #[test]
    fn normal_pellet_scores_ten() {
        let (mut game, mut rng) = medium_game(2);
        let pellet = *game
            .pellets
            .iter()
            .find(|p| p.kind == PelletKind::Normal)
            .unwrap();
        game.player.pos = pellet.pos;
        game.ghosts.iter_mut().for_each(|g| g.cadence = 1); // hold ghosts
        let before = game.pellets.len();
        game.update(&mut rng);
        assert_eq!(game.score, SCORE_PELLET);
        assert_eq!(game.pellets_eaten, 1);
        assert_eq!(game.pellets.len(), before - 1);
        assert!(game.pellet_at(pellet.pos).is_none());
        assert!(game.drain_events().contains(&GameEvent::PelletEaten));
    }

    #[test]
    fn power_pellet_arms_power_mode() {
        let (mut game, mut rng) = medium_game(3);
        let pellet = *game
            .pellets
            .iter()
            .find(|p| p.kind == PelletKind::Power)
            .expect("seed generates at least one power corner");
        game.player.pos = pellet.pos;
        game.update(&mut rng);
        assert_eq!(game.score, SCORE_POWER);
        assert!(game.power_active);
        // Decay already ran once within the same tick.
        assert_eq!(game.power_timer, POWER_TICKS - 1);
        assert!(game.ghosts.iter().all(|g| g.vulnerable));
        assert!(game.drain_events().contains(&GameEvent::PowerPelletEaten));
    }

    #[test]
    fn second_power_pellet_rearms_mid_power_mode() {
        let (mut game, mut rng) = medium_game(12);
        // Power mode already running, timer partly drained, one ghost
        // already eaten and back to chasing.
        game.power_active = true;
        game.power_timer = 123;
        game.ghosts.iter_mut().for_each(|g| g.vulnerable = true);
        game.ghosts[0].vulnerable = false;
        let pellet = *game
            .pellets
            .iter()
            .find(|p| p.kind == PelletKind::Power)
            .unwrap();
        game.player.pos = pellet.pos;
        let score_before = game.score;
        game.update(&mut rng);
        assert_eq!(game.score, score_before + SCORE_POWER);
        assert!(game.power_active);
        assert_eq!(game.power_timer, POWER_TICKS - 1);
        assert!(game.ghosts.iter().all(|g| g.vulnerable));
    }

    #[test]
    fn vulnerable_ghost_is_eaten_and_respawns() {
        let (mut game, mut rng) = medium_game(4);
        game.power_active = true;
        game.power_timer = POWER_TICKS;
        game.ghosts.iter_mut().for_each(|g| g.vulnerable = true);
        park_player(&mut game);
        game.ghosts[0].pos = game.player.pos;
        game.ghosts[0].cadence = 1; // not its decision tick
        let score_before = game.score;
        game.update(&mut rng);
        assert_eq!(game.score, score_before + SCORE_GHOST);
        assert_eq!(game.ghosts[0].pos, GHOST_RESPAWN);
        assert!(!game.ghosts[0].vulnerable);
        assert!(game.ghosts[1..].iter().all(|g| g.vulnerable));
        assert!(game.drain_events().contains(&GameEvent::GhostEaten));
    }

    #[test]
    fn fatal_contact_at_one_life_ends_the_game() {
        let (mut game, mut rng) = medium_game(5);
        game.lives = 1;
        park_player(&mut game);
        game.ghosts[0].pos = game.player.pos;
        game.ghosts[0].cadence = 1;
        game.update(&mut rng);
        assert_eq!(game.lives, 0);
        assert_eq!(game.phase, Phase::GameOver);
        assert!(game.drain_events().contains(&GameEvent::LifeLost));
    }

    #[test]
    fn nonfatal_contact_resets_positions_only() {
        let (mut game, mut rng) = medium_game(6);
        game.lives = 2;
        park_player(&mut game);
        let pellets_before = game.pellets.len();
        game.ghosts[0].pos = game.player.pos;
        game.ghosts[0].cadence = 1;
        game.update(&mut rng);
        assert_eq!(game.lives, 1);
        assert_eq!(game.phase, Phase::Playing);
        assert_eq!(game.pellets.len(), pellets_before);
        for (ghost, start) in game.ghosts.iter().zip(GHOST_STARTS) {
            assert_eq!(ghost.pos, start);
        }
    }

    #[test]
    fn last_pellet_completes_the_level() {
        let (mut game, mut rng) = medium_game(7);
        let pellet = *game
            .pellets
            .iter()
            .find(|p| p.kind == PelletKind::Normal)
            .unwrap();
        game.pellets = vec![pellet];
        game.pellets_eaten = game.total_pellets - 1;
        game.player.pos = pellet.pos;
        game.ghosts.iter_mut().for_each(|g| g.pos = GHOST_RESPAWN);
        game.update(&mut rng);
        assert_eq!(game.phase, Phase::LevelComplete);
        assert!(game.drain_events().contains(&GameEvent::LevelComplete));
    }

    #[test]
    fn next_level_carries_score_and_lives() {
        let (mut game, mut rng) = medium_game(8);
        game.score = 1230;
        game.lives = 1;
        game.phase = Phase::LevelComplete;
        game.next_level(&mut rng);
        assert_eq!(game.score, 1230);
        assert_eq!(game.lives, 1);
        assert_eq!(game.level, 2);
        assert_eq!(game.phase, Phase::Playing);
        assert_eq!(game.pellets_eaten, 0);
        assert_eq!(game.total_pellets, game.pellets.len());
    }

    #[test]
    fn terminated_session_ignores_ticks() {
        let (mut game, mut rng) = medium_game(9);
        game.phase = Phase::GameOver;
        let tick = game.tick;
        let score = game.score;
        game.update(&mut rng);
        assert_eq!(game.tick, tick);
        assert_eq!(game.score, score);
    }

    #[test]
    fn power_mode_expires_and_clears_vulnerability() {
        let (mut game, mut rng) = medium_game(10);
        game.power_active = true;
        game.power_timer = 3;
        game.ghosts.iter_mut().for_each(|g| g.vulnerable = true);
        park_player(&mut game);
        // Keep ghosts clear of the player while the timer runs out.
        for _ in 0..3 {
            game.ghosts.iter_mut().for_each(|g| g.pos = GHOST_RESPAWN);
            game.update(&mut rng);
        }
        assert!(!game.power_active);
        assert_eq!(game.power_timer, 0);
        assert!(game.ghosts.iter().all(|g| !g.vulnerable));
    }

    #[test]
    fn pellet_count_is_monotone_and_bounded() {
        for seed in 0..5 {
            let (mut game, mut rng) = medium_game(100 + seed);
            let dirs = [Dir::Left, Dir::Up, Dir::Right, Dir::Down];
            let mut last = 0;
            for i in 0..2000 {
                game.queue_direction(dirs[i % 4]);
                game.update(&mut rng);
                assert!(game.pellets_eaten >= last);
                assert!(game.pellets_eaten <= game.total_pellets);
                last = game.pellets_eaten;
                if game.phase != Phase::Playing {
                    break;
                }
            }
        }
    }

    #[test]
    fn ghosts_never_stand_on_walls() {
        use crate::components::Tile;
        let (mut game, mut rng) = medium_game(11);
        for i in 0..1500 {
            game.queue_direction(if i % 2 == 0 { Dir::Left } else { Dir::Up });
            game.update(&mut rng);
            for ghost in &game.ghosts {
                assert_eq!(game.maze.tile(ghost.pos), Tile::Open);
            }
            if game.phase != Phase::Playing {
                break;
            }
        }
    }
}
