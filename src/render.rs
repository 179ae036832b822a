use std::io::{self, Stdout, Write};

use crossterm::cursor::MoveTo;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::QueueableCommand;
use unicode_width::UnicodeWidthStr;

use crate::components::{PelletKind, Pos, Tile};
use crate::game::{Game, POWER_WARN_TICKS};
use crate::ghost::GhostKind;
use crate::level::{COLS, ROWS};

pub const CELL_W: usize = 2;

#[derive(Clone, Copy, PartialEq)]
enum Glyph {
    Player,
    Ghost,
    Frightened,
    Wall,
    Open,
    Pellet,
    Power,
}

#[derive(Clone, Copy, PartialEq)]
struct Cell {
    glyph: Glyph,
    color: Color,
}

/// Diff renderer: repaints only cells whose glyph or color changed since
/// the previous frame, with a full repaint after resize or recentering.
pub struct Renderer {
    last: Vec<Cell>,
    last_hud: String,
    pub needs_full: bool,
    origin_x: u16,
    origin_y: u16,
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            last: vec![
                Cell {
                    glyph: Glyph::Open,
                    color: Color::Reset,
                };
                (COLS * ROWS) as usize
            ],
            last_hud: String::new(),
            needs_full: true,
            origin_x: 0,
            origin_y: 1,
        }
    }
}

fn ghost_color(kind: GhostKind) -> Color {
    match kind {
        GhostKind::Blinky => Color::Red,
        GhostKind::Pinky => Color::Magenta,
        GhostKind::Inky => Color::Cyan,
        GhostKind::Clyde => Color::DarkYellow,
    }
}

pub fn render(
    stdout: &mut Stdout,
    game: &Game,
    renderer: &mut Renderer,
    paused: bool,
    message: &str,
) -> io::Result<()> {
    let needed_h = (ROWS + 2) as u16;
    let needed_w = (COLS as usize * CELL_W) as u16;

    stdout.queue(MoveTo(0, 0))?;

    let (term_w, term_h) = terminal::size()?;
    if term_w < needed_w || term_h < needed_h {
        stdout.queue(Clear(ClearType::All))?;
        let msg = format!(
            "Terminal too small. Need at least {}x{} (cols x rows). Current: {}x{}.",
            needed_w, needed_h, term_w, term_h
        );
        stdout.queue(Print(msg))?;
        stdout.flush()?;
        renderer.needs_full = true;
        return Ok(());
    }

    let origin_x = (term_w - needed_w) / 2;
    let origin_y = (term_h - needed_h) / 2 + 1;
    if origin_x != renderer.origin_x || origin_y != renderer.origin_y {
        renderer.origin_x = origin_x;
        renderer.origin_y = origin_y;
        renderer.needs_full = true;
    }

    let mut hud = format!(
        "Score: {}  Lives: {}  Level: {}  Pellets: {}  Power: {}",
        game.score,
        game.lives,
        game.level,
        game.total_pellets - game.pellets_eaten,
        game.power_timer
    );
    if paused {
        hud.push_str("  [PAUSED]");
    }
    if !message.is_empty() {
        hud.push_str("  ");
        hud.push_str(message);
    }
    if renderer.needs_full || hud != renderer.last_hud {
        stdout.queue(MoveTo(renderer.origin_x, renderer.origin_y - 1))?;
        stdout.queue(SetForegroundColor(Color::White))?;
        stdout.queue(Clear(ClearType::CurrentLine))?;
        stdout.queue(Print(&hud))?;
        stdout.queue(ResetColor)?;
        renderer.last_hud = hud;
    }

    for y in 0..ROWS {
        for x in 0..COLS {
            let cell = cell_for(game, Pos::new(x, y));
            let idx = (y * COLS + x) as usize;
            if renderer.needs_full || cell != renderer.last[idx] {
                renderer.last[idx] = cell;
                draw_cell(stdout, renderer, x as usize, y as usize, cell)?;
            }
        }
    }
    renderer.needs_full = false;

    stdout.flush()?;
    Ok(())
}

fn cell_for(game: &Game, pos: Pos) -> Cell {
    if pos == game.player.pos {
        return Cell {
            glyph: Glyph::Player,
            color: Color::Yellow,
        };
    }
    if let Some(ghost) = game.ghost_at(pos) {
        if ghost.vulnerable && game.power_active {
            // Blink white as the power window runs out.
            let blinking =
                game.power_timer < POWER_WARN_TICKS && (game.tick / 10) % 2 == 0;
            return Cell {
                glyph: Glyph::Frightened,
                color: if blinking { Color::White } else { Color::Blue },
            };
        }
        return Cell {
            glyph: Glyph::Ghost,
            color: ghost_color(ghost.kind),
        };
    }
    if let Some(pellet) = game.pellet_at(pos) {
        return match pellet.kind {
            PelletKind::Normal => Cell {
                glyph: Glyph::Pellet,
                color: Color::White,
            },
            PelletKind::Power => Cell {
                glyph: Glyph::Power,
                color: Color::Magenta,
            },
        };
    }
    match game.maze.tile(pos) {
        Tile::Wall => Cell {
            glyph: Glyph::Wall,
            color: Color::Blue,
        },
        Tile::Open => Cell {
            glyph: Glyph::Open,
            color: Color::Reset,
        },
    }
}

fn draw_cell(
    stdout: &mut Stdout,
    renderer: &Renderer,
    x: usize,
    y: usize,
    cell: Cell,
) -> io::Result<()> {
    let text = match cell.glyph {
        Glyph::Player => "😃",
        Glyph::Ghost => "👻",
        Glyph::Frightened => "😱",
        Glyph::Wall => "██",
        Glyph::Open => "  ",
        Glyph::Pellet => "· ",
        Glyph::Power => "● ",
    };
    let x_pos = renderer.origin_x + (x * CELL_W) as u16;
    let y_pos = renderer.origin_y + y as u16;
    stdout.queue(MoveTo(x_pos, y_pos))?;
    stdout.queue(SetForegroundColor(cell.color))?;
    stdout.queue(Print(text))?;
    let w = UnicodeWidthStr::width(text);
    if w < CELL_W {
        for _ in 0..(CELL_W - w) {
            stdout.queue(Print(' '))?;
        }
    }
    stdout.queue(ResetColor)?;
    Ok(())
}

/// One-line banner under the playfield, for game-over and level breaks.
pub fn render_banner(stdout: &mut Stdout, text: &str) -> io::Result<()> {
    let needed_h = (ROWS + 2) as u16;
    let needed_w = (COLS as usize * CELL_W) as u16;
    let (term_w, term_h) = terminal::size()?;
    if term_w < needed_w || term_h < needed_h {
        stdout.queue(MoveTo(0, needed_h))?;
    } else {
        let origin_x = (term_w - needed_w) / 2;
        let origin_y = (term_h - needed_h) / 2 + 1;
        stdout.queue(MoveTo(origin_x, origin_y + ROWS as u16))?;
    }
    stdout.queue(Clear(ClearType::CurrentLine))?;
    stdout.queue(Print(text))?;
    stdout.flush()?;
    Ok(())
}
