use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const BAR_GLYPH: &str = "█";

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    Success,
    Info,
    Error,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::Success => style(text).green(),
        StyleType::Info => style(text).cyan(),
        StyleType::Error => style(text).red(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// Right aligned cell for a numeric value.
pub fn number_cell(value: f64) -> Cell {
    Cell::new(value.to_string()).set_alignment(CellAlignment::Right)
}

/// Bold green cell used for the headline figure of a table.
pub fn highlight_cell(value: f64) -> Cell {
    number_cell(value)
        .add_attribute(Attribute::Bold)
        .fg(Color::Green)
}

/// Horizontal bar for `value` scaled into `1..=width` glyphs over `[min, max]`.
pub fn trend_bar(value: f64, min: f64, max: f64, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    let span = max - min;
    let ratio = if span > f64::EPSILON {
        ((value - min) / span).clamp(0.0, 1.0)
    } else {
        1.0
    };
    let glyphs = 1 + (ratio * (width - 1) as f64).round() as usize;
    BAR_GLYPH.repeat(glyphs)
}

/// Creates a spinner shown while network requests are in flight.
pub fn new_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}")
    {
        pb.set_style(spinner_style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Prints a separator line matching the terminal width.
pub fn print_separator() {
    let term_width = console::Term::stdout()
        .size_checked()
        .map(|(_, w)| w as usize)
        .unwrap_or(80);
    println!("\n{}", "─".repeat(term_width));
}
