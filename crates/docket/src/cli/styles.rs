//! Named styles for terminal output.
//!
//! Render code asks for a style by what it shows (an id, a timestamp, a problem), never
//! by color. `console` drops the escapes when stdout is not a terminal.

use console::Style;

pub fn id() -> Style {
    Style::new().yellow()
}

pub fn title() -> Style {
    Style::new().bold()
}

pub fn author() -> Style {
    Style::new().cyan()
}

pub fn time() -> Style {
    Style::new().color256(246).italic()
}

pub fn muted() -> Style {
    Style::new().dim()
}

pub fn ok() -> Style {
    Style::new().green()
}

pub fn problem() -> Style {
    Style::new().red()
}
