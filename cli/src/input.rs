use pathplay_core::{CellIndex, GridSize, ToCellIndex, cell_count};
use std::io::{self, BufRead};
use std::sync::mpsc::{self, Receiver};
use std::thread;
use thiserror::Error;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Click(CellIndex),
    Retry,
    Next,
    Menu,
    Quit,
    Help,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command {0:?}, type h for help")]
    Unknown(String),
    #[error("Cell {0:?} is not on the grid")]
    OutOfGrid(String),
}

impl Command {
    /// Parses one input line, cells are either a number (`7`) or a row letter and column (`b2`).
    pub fn parse(line: &str, grid_size: GridSize) -> Result<Self, CommandError> {
        let token = line.trim().to_ascii_lowercase();
        Ok(match token.as_str() {
            "r" | "retry" => Self::Retry,
            "n" | "next" => Self::Next,
            "m" | "menu" => Self::Menu,
            "q" | "quit" | "exit" => Self::Quit,
            "h" | "help" | "?" | "" => Self::Help,
            _ => Self::Click(parse_cell(&token, grid_size)?),
        })
    }
}

fn parse_cell(token: &str, grid_size: GridSize) -> Result<CellIndex, CommandError> {
    let out_of_grid = || CommandError::OutOfGrid(token.to_string());

    if let Ok(number) = token.parse::<CellIndex>() {
        return match number {
            0 => Err(out_of_grid()),
            n if n > cell_count(grid_size) => Err(out_of_grid()),
            n => Ok(n - 1),
        };
    }

    let mut chars = token.chars();
    let row = match chars.next() {
        Some(c @ 'a'..='z') => c as u8 - b'a',
        _ => return Err(CommandError::Unknown(token.to_string())),
    };
    let col: GridSize = chars
        .as_str()
        .parse()
        .map_err(|_| CommandError::Unknown(token.to_string()))?;
    let col = col.checked_sub(1).ok_or_else(out_of_grid)?;
    (row, col).to_cell_index(grid_size).ok_or_else(out_of_grid)
}

/// Reads stdin lines on a helper thread, the channel closes at end of input.
pub fn spawn_stdin_reader() -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    log::error!("failed to read input: {}", err);
                    break;
                }
            };
            if tx.send(line).is_err() {
                break;
            }
        }
        log::trace!("input closed");
    });
    rx
}
