use pathplay_core::{Difficulty, Theme};
use std::io::{self, Write};
use std::sync::mpsc::Receiver;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    pub difficulty: Difficulty,
    pub theme: Theme,
}

impl Selection {
    pub fn from_names(difficulty: Option<&str>, theme: Option<&str>) -> Self {
        Self {
            difficulty: difficulty.map(Difficulty::from_name).unwrap_or_default(),
            theme: theme.map(Theme::from_name).unwrap_or_default(),
        }
    }
}

fn ask(lines: &Receiver<String>, prompt: &str) -> io::Result<Option<String>> {
    print!("{prompt} ");
    io::stdout().flush()?;
    Ok(lines.recv().ok())
}

fn names<T: Copy>(all: &[T], name: impl Fn(T) -> &'static str) -> String {
    all.iter().map(|&item| name(item)).collect::<Vec<_>>().join("/")
}

/// Asks for difficulty and theme, keeping `current` on empty answers.
///
/// Returns `None` when the player quits or input ends.
pub fn choose(lines: &Receiver<String>, current: Selection) -> io::Result<Option<Selection>> {
    println!();
    println!("PathPlay");
    println!();

    let prompt = format!(
        "Choose your difficulty [{}] ({}):",
        names(&Difficulty::ALL, Difficulty::name),
        current.difficulty
    );
    let Some(answer) = ask(lines, &prompt)? else {
        return Ok(None);
    };
    let difficulty = match answer.trim() {
        "" => current.difficulty,
        "q" | "quit" => return Ok(None),
        name => Difficulty::from_name(name),
    };

    let prompt = format!(
        "Choose your theme [{}] ({}):",
        names(&Theme::SELECTABLE, Theme::name),
        current.theme
    );
    let Some(answer) = ask(lines, &prompt)? else {
        return Ok(None);
    };
    let theme = match answer.trim() {
        "" => current.theme,
        "q" | "quit" => return Ok(None),
        name => Theme::from_name(name),
    };

    let Some(answer) = ask(lines, "Start your challenge, press enter to play (q to quit):")?
    else {
        return Ok(None);
    };
    if matches!(answer.trim(), "q" | "quit") {
        return Ok(None);
    }

    let selection = Selection { difficulty, theme };
    log::debug!("selected {:?}", selection);
    Ok(Some(selection))
}
