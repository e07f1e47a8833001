use std::time::{Duration, Instant};

use anyhow::{bail, Result};
use crossterm::style::Color;

use snake::config::GameConfig;
use snake::engine::{EngineState, SimulationEngine, Snapshot, TickResult};
use snake::food::FoodCategory;
use snake::input::{map_key, InputRequest};
use snake::scores::{ScoreBoard, LEADERBOARD_SIZE};
use snake::{log, Position};

use crate::term::{Coords, TermInt, TermManager};

const SNAKE_BODY_CELL: [char; 2] = ['█', '█'];
const FOOD_CELL: [char; 2] = ['(', ')'];
const DEAD_SNAKE_CELL: [char; 2] = ['X', 'X'];
const EMPTY_CELL: [char; 2] = [' ', ' '];
const MAX_NAME_LEN: usize = 16;

pub enum Flow {
    Restart,
    Quit,
}

pub struct SnakeGame {
    term: TermManager,
    engine: SimulationEngine,
    scores: ScoreBoard,
}

impl SnakeGame {
    pub fn new(config: &GameConfig) -> Result<Self> {
        let engine = SimulationEngine::new(config.engine_settings()?);
        let scores = ScoreBoard::new(config.scores_path.clone());
        Ok(SnakeGame { term: TermManager::new()?, engine, scores })
    }

    pub fn run(&mut self) -> Result<()> {
        self.initialize()?;

        if let Flow::Quit = self.show_intro()? {
            return Ok(());
        }

        // Each round ends either in a restart or a quit
        while let Flow::Restart = self.play()? {}

        log!("Quit");
        Ok(())
    }

    pub fn restore(&mut self) -> Result<()> {
        self.term.restore()
    }

    fn initialize(&mut self) -> Result<()> {
        let (need_w, need_h) = self.frame_size();
        let (w, h) = self.term.get_terminal_size();
        if w < need_w || h < need_h {
            bail!("terminal is {}x{}, the board needs at least {}x{}", w, h, need_w, need_h);
        }

        self.term.setup()
    }

    fn show_intro(&mut self) -> Result<Flow> {
        let lines = &[
            "Arrow keys or WASD to move",
            "P or Esc to pause",
            "Q or CTRL+C to quit",
            "",
            "Green grows, red halves, yellow adds five",
            "",
            "Press any key to begin"
        ];

        self.term.show_message(lines)?;

        let key = self.term.read_key_blocking()?;
        if map_key(&key) == Some(InputRequest::Quit) {
            return Ok(Flow::Quit);
        }

        self.term.hide_message()?;
        Ok(Flow::Restart)
    }

    fn play(&mut self) -> Result<Flow> {
        self.term.clear()?;
        let board = self.board_cells();
        self.term.draw_borders((board.0 as TermInt * 2 + 2, board.1 as TermInt + 2))?;
        self.draw_frame()?;

        let mut last_tick = Instant::now();

        loop {
            let timeout = self.engine.interval()
                .checked_sub(last_tick.elapsed())
                .unwrap_or(Duration::ZERO);

            // Input and ticks share this thread, so a turn never lands mid-tick
            if let Some(key) = self.term.poll_key(timeout)? {
                match map_key(&key) {
                    Some(InputRequest::Quit) => return Ok(Flow::Quit),
                    Some(InputRequest::PauseToggle) => self.toggle_pause()?,
                    Some(InputRequest::Turn(dir)) => self.engine.set_direction(dir),
                    None => {}
                }
            }

            if last_tick.elapsed() < self.engine.interval() {
                continue;
            }
            last_tick = Instant::now();

            match self.engine.tick() {
                TickResult::Unchanged => {}
                TickResult::Continued { .. } => self.draw_frame()?,
                TickResult::GameOver { final_score } => return self.game_over(final_score),
            }
        }
    }

    ///////////////////////////////////////////////////////////////////////////

    fn toggle_pause(&mut self) -> Result<()> {
        self.engine.toggle_pause();

        match self.engine.state() {
            EngineState::Paused => self.term.show_message(&["Paused", "Press P or Esc to resume", "or Q to quit"]),
            _ => self.term.hide_message(),
        }
    }

    fn game_over(&mut self, final_score: usize) -> Result<Flow> {
        log!("Game over with score {}", final_score);

        let body: Vec<Position> = self.engine.snake().body().iter().copied().collect();
        for pos in body {
            self.draw_cell(pos, DEAD_SNAKE_CELL, Color::Red)?;
        }
        self.term.flush()?;

        let score_line = format!("Your score: {}", final_score);
        let name = self.term.read_line(
            &["Game over!", &score_line, "", "Enter your name (Esc to skip):"],
            MAX_NAME_LEN,
        )?;

        let mut lines = Vec::new();
        if let Some(name) = name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            match self.scores.record(name, final_score) {
                Ok(()) => log!("Recorded {}: {} in {}", name, final_score, self.scores.path().display()),
                Err(e) => {
                    log!("No score recorded: {:#}", e);
                    lines.push("No score recorded".to_string());
                    lines.push(String::new());
                }
            }
        }

        lines.extend(self.leaderboard_lines());
        lines.push(String::new());
        lines.push("Press any key to play again,".to_string());
        lines.push("or CTRL+C to quit.".to_string());

        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        self.term.show_message(&refs)?;

        let key = self.term.read_key_blocking()?;
        if map_key(&key) == Some(InputRequest::Quit) {
            return Ok(Flow::Quit);
        }

        self.engine.reset();
        Ok(Flow::Restart)
    }

    fn leaderboard_lines(&self) -> Vec<String> {
        match self.scores.top(LEADERBOARD_SIZE) {
            Ok(entries) if entries.is_empty() => vec!["No scores yet".to_string()],
            Ok(entries) => {
                let mut lines = vec![format!("Top {} Scores:", LEADERBOARD_SIZE)];
                lines.extend(entries.iter().enumerate()
                    .map(|(i, e)| format!("{}. {}: {}", i + 1, e.name, e.score)));
                lines
            }
            Err(e) => {
                log!("Could not read scores: {:#}", e);
                vec!["Score file unreadable".to_string()]
            }
        }
    }

    fn draw_frame(&mut self) -> Result<()> {
        let (w, h) = self.board_cells();
        let mut cells = vec![(EMPTY_CELL, Color::Reset); w as usize * h as usize];

        {
            let Snapshot { body, food, direction, .. } = self.engine.snapshot();
            let index = |p: &Position| p.y as usize * w as usize + p.x as usize;

            for item in food {
                let color = match item.category() {
                    FoodCategory::Growth => Color::Green,
                    FoodCategory::Penalty => Color::Red,
                    FoodCategory::Bonus => Color::Yellow,
                };
                cells[index(&item.position)] = (FOOD_CELL, color);
            }

            for pos in body.iter().skip(1) {
                cells[index(pos)] = (SNAKE_BODY_CELL, Color::DarkGreen);
            }

            if let Some(head) = body.front() {
                let ch = direction.head_char();
                cells[index(head)] = ([ch, ch], Color::Green);
            }
        }

        for (i, (cell, color)) in cells.into_iter().enumerate() {
            let pos = Position::new(i as i32 % w, i as i32 / w);
            self.draw_cell(pos, cell, color)?;
        }

        let status = format!("Score: {:<5} Tick: {:>4}ms", self.engine.score(), self.engine.interval().as_millis());
        self.term.print_str_at((0, h as TermInt + 2), &status, Color::Reset)?;
        self.term.flush()
    }

    fn draw_cell(&mut self, pos: Position, cell: [char; 2], color: Color) -> Result<()> {
        let x = 1 + pos.x as TermInt * 2;
        let y = 1 + pos.y as TermInt;
        self.term.print_at((x, y), cell[0], color)?;
        self.term.print_at((x + 1, y), cell[1], color)
    }

    fn board_cells(&self) -> (i32, i32) {
        let grid = self.engine.grid();
        (grid.width(), grid.height())
    }

    /// Border plus the status line.
    fn frame_size(&self) -> Coords {
        let (w, h) = self.board_cells();
        (w as TermInt * 2 + 2, h as TermInt + 3)
    }
}
