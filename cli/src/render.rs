use pathplay_core::{CellIndex, Snapshot, Step, TileMarks};
use std::fmt;

pub const fn status(step: Step) -> &'static str {
    use Step::*;
    match step {
        Revealing => "Memorise the highlighted tiles",
        AwaitingInput => "Click all the correct tiles",
        Won => "Nice! You can proceed to the next level",
        Lost => "Oops! You picked the wrong path!",
    }
}

pub const fn retry_label(step: Step) -> &'static str {
    match step {
        Step::Lost => "Try again",
        _ => "Restart (Level 1)",
    }
}

fn cell(snapshot: &Snapshot, index: CellIndex) -> String {
    let marks = snapshot.cell_marks(index);
    let (open, close) = if marks.contains(TileMarks::WRONG) {
        ('!', '!')
    } else if marks.contains(TileMarks::REVEALED) {
        ('[', ']')
    } else if marks.contains(TileMarks::CORRECT) {
        ('(', ')')
    } else {
        (' ', ' ')
    };
    format!("{open}{:>2}{close}", snapshot.glyph(index))
}

/// Full text frame for one snapshot: status, grid and available controls.
pub struct Frame<'a>(pub &'a Snapshot);

impl fmt::Display for Frame<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let snapshot = self.0;
        let size = usize::from(snapshot.grid_size);

        writeln!(f)?;
        writeln!(
            f,
            "Level {}  ·  Difficulty: {}",
            snapshot.level, snapshot.difficulty
        )?;
        writeln!(f, "{}", status(snapshot.step))?;
        writeln!(f)?;

        write!(f, "   ")?;
        for col in 1..=size {
            write!(f, " {col:>2} ")?;
        }
        writeln!(f)?;

        let cells: Vec<CellIndex> = snapshot.cells().collect();
        for (row, chunk) in cells.chunks(size.max(1)).enumerate() {
            let label = u8::try_from(row)
                .ok()
                .and_then(|row| b'a'.checked_add(row))
                .filter(u8::is_ascii_lowercase)
                .map_or(' ', char::from);
            write!(f, " {label} ")?;
            for &index in chunk {
                write!(f, "{}", cell(snapshot, index))?;
            }
            writeln!(f)?;
        }

        writeln!(f)?;
        write!(f, "r: {}", retry_label(snapshot.step))?;
        if snapshot.step == Step::Won {
            write!(f, "  n: Next Level")?;
        }
        write!(f, "  m: Main Menu  q: Quit")
    }
}

pub fn frame(snapshot: &Snapshot) -> String {
    Frame(snapshot).to_string()
}

pub fn help() -> &'static str {
    "Pick a cell by number (7) or by row and column (b2).\n\
     r: retry  n: next level (after a win)  m: main menu  q: quit"
}
