use crate::components::{Dir, Pos};
use crate::level::Maze;

/// The player advances one cell only every 12th tick, decoupling the
/// simulation tick rate from perceived speed.
pub const PLAYER_MOVE_INTERVAL: u32 = 12;

pub const PLAYER_HOME: Pos = Pos { x: 10, y: 15 };

pub struct Player {
    pub pos: Pos,
    pub dir: Dir,
    /// Buffered turn intent, committed once the turn becomes legal.
    pub queued: Dir,
}

impl Player {
    pub fn spawn(maze: &Maze) -> Self {
        Self {
            pos: maze.find_open_near(PLAYER_HOME),
            dir: Dir::Right,
            queued: Dir::Right,
        }
    }

    pub fn reset(&mut self, maze: &Maze) {
        self.pos = maze.find_open_near(PLAYER_HOME);
        self.dir = Dir::Right;
        self.queued = Dir::Right;
    }

    /// Commit the queued direction if one step that way is legal.
    pub fn commit_queued(&mut self, maze: &Maze) {
        if maze.can_move(self.pos.offset(self.queued)) {
            self.dir = self.queued;
        }
    }

    /// One cell in the current facing, if legal, wrapping at the tunnel.
    pub fn step(&mut self, maze: &Maze) {
        let next = self.pos.offset(self.dir);
        if maze.can_move(next) {
            self.pos = maze.wrap(next);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::tests::{maze_from_rows, open_box};
    use crate::level::{COLS, ROWS};

    #[test]
    fn queued_turn_commits_only_when_legal() {
        let mut rows = ["####################"; ROWS as usize];
        rows[5] = "#                  #";
        let maze = maze_from_rows(rows);
        let mut player = Player {
            pos: Pos::new(5, 5),
            dir: Dir::Right,
            queued: Dir::Up,
        };
        player.commit_queued(&maze);
        assert_eq!(player.dir, Dir::Right, "blocked turn stays queued");

        player.queued = Dir::Left;
        player.commit_queued(&maze);
        assert_eq!(player.dir, Dir::Left);
    }

    #[test]
    fn step_wraps_through_tunnel() {
        let mut rows = ["####################"; ROWS as usize];
        rows[5] = "                    ";
        let maze = maze_from_rows(rows);
        let mut player = Player {
            pos: Pos::new(0, 5),
            dir: Dir::Left,
            queued: Dir::Left,
        };
        player.step(&maze);
        assert_eq!(player.pos, Pos::new(COLS - 1, 5));
        player.step(&maze);
        assert_eq!(player.pos, Pos::new(COLS - 2, 5));

        player.dir = Dir::Right;
        player.pos = Pos::new(COLS - 1, 5);
        player.step(&maze);
        assert_eq!(player.pos, Pos::new(0, 5));
    }

    #[test]
    fn step_into_wall_stays_put() {
        let maze = open_box();
        let mut player = Player {
            pos: Pos::new(1, 1),
            dir: Dir::Up,
            queued: Dir::Up,
        };
        player.step(&maze);
        assert_eq!(player.pos, Pos::new(1, 1));
    }
}
