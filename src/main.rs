use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::{self, Stdout};
use std::thread;
use std::time::{Duration, Instant};

mod components;
mod game;
mod ghost;
mod level;
mod player;
mod render;

use components::Dir;
use game::{Difficulty, Game, GameEvent, Phase};
use render::Renderer;

const DEFAULT_TICK_MS: u64 = 16;
const DEFAULT_RENDER_FPS: u64 = 120;
const MESSAGE_TICKS: u32 = 90;

fn main() -> io::Result<()> {
    env_logger::init();

    let difficulty = match std::env::args().nth(1) {
        None => Difficulty::Medium,
        Some(arg) => match Difficulty::parse(&arg) {
            Some(d) => d,
            None => {
                eprintln!("usage: neon-maze [easy|medium|hard]");
                std::process::exit(2);
            }
        },
    };

    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(Hide)?;

    let result = run(&mut stdout, difficulty);

    stdout.execute(Show)?;
    stdout.execute(LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    result
}

fn run(stdout: &mut Stdout, difficulty: Difficulty) -> io::Result<()> {
    let (tick_ms, render_fps, seed) = read_settings();
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut game = Game::new(difficulty, &mut rng);
    let mut renderer = Renderer::new();
    let mut paused = false;
    let mut message = String::new();
    let mut message_ttl: u32 = 0;
    let mut last_tick = Instant::now();
    let frame_time = Duration::from_micros(1_000_000 / render_fps.max(1));

    loop {
        let frame_start = Instant::now();

        while event::poll(Duration::from_millis(0))? {
            if let Event::Key(key) = event::read()? {
                if !matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
                    continue;
                }
                match key.code {
                    KeyCode::Char('q') => return Ok(()),
                    KeyCode::Char(' ') => paused = !paused,
                    KeyCode::Up | KeyCode::Char('w') => game.queue_direction(Dir::Up),
                    KeyCode::Down | KeyCode::Char('s') => game.queue_direction(Dir::Down),
                    KeyCode::Left | KeyCode::Char('a') => game.queue_direction(Dir::Left),
                    KeyCode::Right | KeyCode::Char('d') => game.queue_direction(Dir::Right),
                    _ => {}
                }
            }
        }

        if !paused && last_tick.elapsed() >= Duration::from_millis(tick_ms) {
            last_tick = Instant::now();
            game.update(&mut rng);
            for ev in game.drain_events() {
                if let Some(text) = event_message(ev) {
                    message = text.to_string();
                    message_ttl = MESSAGE_TICKS;
                }
            }
            if message_ttl > 0 {
                message_ttl -= 1;
                if message_ttl == 0 {
                    message.clear();
                }
            }
        }

        render::render(stdout, &game, &mut renderer, paused, &message)?;

        match game.phase {
            Phase::GameOver => {
                render::render_banner(
                    stdout,
                    &format!("GAME OVER - Final Score: {} (press q to quit)", game.score),
                )?;
                wait_for(KeyCode::Char('q'))?;
                return Ok(());
            }
            Phase::LevelComplete => {
                render::render_banner(
                    stdout,
                    &format!(
                        "Level {} complete! Score: {} (any key for next level, q quits)",
                        game.level, game.score
                    ),
                )?;
                if wait_any()? == KeyCode::Char('q') {
                    return Ok(());
                }
                game.next_level(&mut rng);
                renderer.needs_full = true;
                message.clear();
                message_ttl = 0;
                last_tick = Instant::now();
            }
            Phase::Playing => {}
        }

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }
}

fn event_message(ev: GameEvent) -> Option<&'static str> {
    match ev {
        GameEvent::PowerPelletEaten => Some("Power up!"),
        GameEvent::GhostEaten => Some("Ghost eaten +200"),
        GameEvent::LifeLost => Some("Life lost!"),
        GameEvent::PelletEaten | GameEvent::LevelComplete => None,
    }
}

fn read_settings() -> (u64, u64, Option<u64>) {
    let tick_ms = std::env::var("NEON_MAZE_TICK_MS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(DEFAULT_TICK_MS);
    let render_fps = std::env::var("NEON_MAZE_FPS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(DEFAULT_RENDER_FPS);
    let seed = std::env::var("NEON_MAZE_SEED")
        .ok()
        .and_then(|v| v.parse::<u64>().ok());
    (tick_ms, render_fps, seed)
}

fn wait_for(code: KeyCode) -> io::Result<()> {
    loop {
        if wait_any()? == code {
            return Ok(());
        }
    }
}

fn wait_any() -> io::Result<KeyCode> {
    loop {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(key.code);
                }
            }
        }
    }
}
