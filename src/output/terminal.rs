//! Terminal table of visible rows.

use crate::models::{format_subnet, ViewState};
use crate::processing::VisibleRow;
use colored::Colorize;
use itertools::Itertools;

/// Pad `value` on the right to `width` characters.
pub fn format_field<T: ToString>(value: T, width: usize) -> String {
    let value_str = value.to_string();
    format!("{value_str:<width$}")
}

/// Tree guide for a row: one segment per ancestor, `┃` where it is locked.
fn depth_guide(row: &VisibleRow, color: bool) -> String {
    row.locked_ancestors
        .iter()
        .map(|&locked| match (locked, color) {
            (true, true) => "┃ ".yellow().to_string(),
            (true, false) => "┃ ".to_string(),
            (false, _) => "│ ".to_string(),
        })
        .join("")
}

/// Action hints the way the row buttons would read.
fn row_actions(row: &VisibleRow, state: &ViewState) -> String {
    let cidr = row.subnet.cidr();
    if state.is_split(cidr) {
        let toggle = if state.is_expanded(cidr) {
            "collapse"
        } else {
            "expand"
        };
        let join = if state.can_join(&row.subnet) {
            "join"
        } else {
            "-"
        };
        format!("{toggle}/{join}")
    } else if state.can_split(&row.subnet) {
        "split".to_string()
    } else {
        "-".to_string()
    }
}

/// Render one line per row: actions, indented CIDR, lock, name, range, hosts.
pub fn render_rows(rows: &[VisibleRow], state: &ViewState, color: bool) -> Vec<String> {
    rows.iter()
        .map(|row| {
            let f = format_subnet(&row.subnet);
            let lock = if row.locked { "[L]" } else { "   " };
            let name = format_field(row.name.as_deref().unwrap_or(""), 16);
            let cidr = format_field(&f.cidr, 18);
            let (cidr, lock, name) = if color {
                (
                    cidr.cyan().bold().to_string(),
                    lock.yellow().to_string(),
                    name.yellow().to_string(),
                )
            } else {
                (cidr, lock.to_string(), name)
            };
            format!(
                "{actions} {guide}{cidr} {lock} {name} {range:<33} {hosts:>10}",
                actions = format_field(row_actions(row, state), 16),
                guide = depth_guide(row, color),
                range = f.range(),
                hosts = f.hosts,
            )
            .trim_end()
            .to_string()
        })
        .collect()
}

/// Print the table with a header line.
pub fn print_rows(rows: &[VisibleRow], state: &ViewState) {
    println!(
        "{}",
        format!(
            "{:<16} {:<18} {:<3} {:<16} {:<33} {:>10}",
            "Actions", "CIDR", "", "Name", "Range (Network – Broadcast)", "Hosts"
        )
        .bold()
    );
    for line in render_rows(rows, state, true) {
        println!("{line}");
    }
    log::info!("Printed {} rows", rows.len());
}
