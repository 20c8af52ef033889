//! Console reporting: boxed fatal errors and run stats.

use colored::Colorize;
use gristle::{GristleError, RunStats};

use crate::cli::StatsFormat;

/// Total width of a fatal-error box, borders included.
const BOX_WIDTH: usize = 80;

/// Print a fatal error to stderr as a boxed summary and detail.
pub fn print_fatal(error: &GristleError) {
    let boxed = format_box(error.summary(), &error.to_string());
    eprintln!("{}", boxed.red());
}

/// Render a summary line and a wrapped detail paragraph inside a box.
pub fn format_box(summary: &str, detail: &str) -> String {
    let inner = BOX_WIDTH - 4;
    let border = format!("+{}+", "-".repeat(BOX_WIDTH - 2));

    let mut lines = vec![border.clone()];
    lines.extend(wrap(summary, inner).into_iter().map(|l| boxed_line(&l, inner)));
    lines.push(boxed_line("", inner));
    lines.extend(wrap(detail, inner).into_iter().map(|l| boxed_line(&l, inner)));
    lines.push(border);
    lines.join("\n")
}

fn boxed_line(text: &str, inner: usize) -> String {
    let pad = inner.saturating_sub(text.chars().count());
    format!("| {}{} |", text, " ".repeat(pad))
}

/// Greedy word wrap; words longer than `width` are split.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let rest = word.split_off(width);
            lines.push(word.into_iter().collect());
            word = rest;
        }

        let needed = if current.is_empty() {
            word.len()
        } else {
            current.chars().count() + 1 + word.len()
        };
        if needed > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.extend(word);
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Render run stats in the requested format.
pub fn format_stats(stats: &RunStats, format: StatsFormat) -> Result<String, serde_json::Error> {
    match format {
        StatsFormat::Json => serde_json::to_string_pretty(stats),
        StatsFormat::Text => Ok(format!(
            "input_cnt:   {}\nvalid_cnt:   {}\ninvalid_cnt: {}",
            stats.total, stats.valid, stats.invalid
        )),
    }
}

/// Print run stats to stdout.
pub fn print_stats(stats: &RunStats, format: StatsFormat) {
    match format_stats(stats, format) {
        Ok(text) => println!("{}", text),
        Err(e) => eprintln!("error: failed to render stats: {}", e),
    }
}
