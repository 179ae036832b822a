use rand::seq::SliceRandom;
use rand::Rng;

use crate::components::{Dir, Pos};
use crate::level::Maze;

/// Pen cell an eaten ghost respawns on.
pub const GHOST_RESPAWN: Pos = Pos { x: 10, y: 10 };

pub const GHOST_STARTS: [Pos; 4] = [
    Pos { x: 9, y: 9 },
    Pos { x: 10, y: 9 },
    Pos { x: 9, y: 10 },
    Pos { x: 10, y: 10 },
];

const CHASE_CHANCE: f64 = 0.7;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GhostKind {
    Blinky,
    Pinky,
    Inky,
    Clyde,
}

impl GhostKind {
    pub const ALL: [GhostKind; 4] = [
        GhostKind::Blinky,
        GhostKind::Pinky,
        GhostKind::Inky,
        GhostKind::Clyde,
    ];
}

/// Behavior variant a ghost evaluates on its decision tick.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Mood {
    Chase,
    Flee,
}

pub struct Ghost {
    pub kind: GhostKind,
    pub pos: Pos,
    pub dir: Dir,
    pub cadence: u32,
    pub vulnerable: bool,
}

impl Ghost {
    pub fn spawn_all() -> Vec<Ghost> {
        let dirs = [Dir::Left, Dir::Up, Dir::Right, Dir::Left];
        GhostKind::ALL
            .iter()
            .zip(GHOST_STARTS)
            .zip(dirs)
            .map(|((&kind, pos), dir)| Ghost {
                kind,
                pos,
                dir,
                cadence: 0,
                vulnerable: false,
            })
            .collect()
    }
}

/// Pick the ghost's next move among legal options. Two-phase candidate
/// computation: all legal moves first, then the non-reversing subset,
/// falling back to the full set in a dead end. Distances are measured on
/// the pre-wrap coordinates, so a tunnel exit counts as leaving the grid
/// rather than arriving at the far column; only the chosen move is
/// wrapped. Returns `None` only when the ghost is fully enclosed.
pub fn choose_move(
    maze: &Maze,
    ghost: &Ghost,
    mood: Mood,
    player: Pos,
    rng: &mut impl Rng,
) -> Option<(Dir, Pos)> {
    let mut legal: Vec<(Dir, Pos)> = Vec::with_capacity(4);
    for dir in Dir::ALL {
        let next = ghost.pos.offset(dir);
        if maze.can_move(next) {
            legal.push((dir, next));
        }
    }
    if legal.is_empty() {
        return None;
    }

    let reverse = ghost.dir.opposite();
    let forward: Vec<(Dir, Pos)> = legal.iter().copied().filter(|(d, _)| *d != reverse).collect();
    let candidates = if forward.is_empty() { legal } else { forward };

    let chosen = match mood {
        Mood::Flee => candidates
            .iter()
            .copied()
            .max_by_key(|(_, p)| p.manhattan(player))?,
        Mood::Chase => {
            if rng.gen_bool(CHASE_CHANCE) {
                candidates
                    .iter()
                    .copied()
                    .min_by_key(|(_, p)| p.manhattan(player))?
            } else {
                *candidates.choose(rng)?
            }
        }
    };
    let (dir, pos) = chosen;
    Some((dir, maze.wrap(pos)))
}
