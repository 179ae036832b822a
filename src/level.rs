use rand::Rng;

use crate::components::{Dir, Pellet, PelletKind, Pos, Tile};

pub const COLS: i32 = 20;
pub const ROWS: i32 = 20;

// Central ghost pen, bounding box inclusive.
pub const PEN_MIN: i32 = 8;
pub const PEN_MAX: i32 = 11;

const PILLAR_CHANCE: f64 = 0.8;

/// Fixed-size wall layout for one level. Deterministic shape (border,
/// pen, pillar lattice), randomized detail (which pillars exist).
pub struct Maze {
    cells: [[Tile; COLS as usize]; ROWS as usize],
}

impl Maze {
    pub fn generate(rng: &mut impl Rng) -> Self {
        let mut cells = [[Tile::Open; COLS as usize]; ROWS as usize];

        for y in 0..ROWS {
            cells[y as usize][0] = Tile::Wall;
            cells[y as usize][(COLS - 1) as usize] = Tile::Wall;
        }
        for x in 0..COLS {
            cells[0][x as usize] = Tile::Wall;
            cells[(ROWS - 1) as usize][x as usize] = Tile::Wall;
        }

        // Random pillars on the left half, mirrored right for symmetry.
        let mut y = 2;
        while y < ROWS - 2 {
            let mut x = 2;
            while x < COLS / 2 - 1 {
                if rng.gen_bool(PILLAR_CHANCE) {
                    cells[y as usize][x as usize] = Tile::Wall;
                    cells[y as usize][(COLS - 1 - x) as usize] = Tile::Wall;
                }
                x += 2;
            }
            y += 2;
        }

        // Pen: walled perimeter, open interior, two exit cells on top.
        for y in PEN_MIN..=PEN_MAX {
            for x in PEN_MIN..=PEN_MAX {
                let on_edge = y == PEN_MIN || y == PEN_MAX || x == PEN_MIN || x == PEN_MAX;
                cells[y as usize][x as usize] = if on_edge { Tile::Wall } else { Tile::Open };
            }
        }
        cells[PEN_MIN as usize][9] = Tile::Open;
        cells[PEN_MIN as usize][10] = Tile::Open;

        Self { cells }
    }

    /// Tile at an in-bounds position.
    pub fn tile(&self, pos: Pos) -> Tile {
        self.cells[pos.y as usize][pos.x as usize]
    }

    /// Whether an actor may move onto `pos`. Off the horizontal range is
    /// always allowed (tunnel, wrapped afterwards); off the vertical
    /// range never is. Bounds are checked before any indexing.
    pub fn can_move(&self, pos: Pos) -> bool {
        if pos.x < 0 || pos.x >= COLS {
            return true;
        }
        if pos.y < 0 || pos.y >= ROWS {
            return false;
        }
        self.tile(pos) == Tile::Open
    }

    /// Normalize a horizontal tunnel exit back into the grid.
    pub fn wrap(&self, mut pos: Pos) -> Pos {
        if pos.x < 0 {
            pos.x = COLS - 1;
        }
        if pos.x >= COLS {
            pos.x = 0;
        }
        pos
    }

    pub fn in_pen_box(pos: Pos) -> bool {
        pos.x >= PEN_MIN && pos.x <= PEN_MAX && pos.y >= PEN_MIN && pos.y <= PEN_MAX
    }

    /// Every open cell outside the pen box gets a pellet; the four
    /// corner cells upgrade to power pellets when a pellet landed there.
    /// A corner that generated as wall simply yields no power pellet.
    pub fn layout_pellets(&self) -> Vec<Pellet> {
        let mut pellets = Vec::new();
        for y in 0..ROWS {
            for x in 0..COLS {
                let pos = Pos::new(x, y);
                if self.tile(pos) == Tile::Open && !Self::in_pen_box(pos) {
                    pellets.push(Pellet {
                        pos,
                        kind: PelletKind::Normal,
                    });
                }
            }
        }
        let corners = [
            Pos::new(1, 1),
            Pos::new(COLS - 2, 1),
            Pos::new(1, ROWS - 2),
            Pos::new(COLS - 2, ROWS - 2),
        ];
        for corner in corners {
            if let Some(p) = pellets.iter_mut().find(|p| p.pos == corner) {
                p.kind = PelletKind::Power;
            }
        }
        pellets
    }

    /// Open cell at or next to `home`, for placing the player. Falls back
    /// to (1,1) if home and all four neighbors are walled in, which only
    /// happens under degenerate generation parameters.
    pub fn find_open_near(&self, home: Pos) -> Pos {
        if self.tile(home) == Tile::Open {
            return home;
        }
        for dir in [Dir::Down, Dir::Up, Dir::Right, Dir::Left] {
            let next = home.offset(dir);
            if next.x >= 0 && next.x < COLS && next.y >= 0 && next.y < ROWS {
                if self.tile(next) == Tile::Open {
                    return next;
                }
            }
        }
        log::warn!(
            "no open cell at or around ({}, {}); spawning at (1, 1)",
            home.x,
            home.y
        );
        Pos::new(1, 1)
    }
}
