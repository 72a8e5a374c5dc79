//! Plain terminal presentation of render blocks

use crossterm::style::{Color, Stylize};

use crate::conversation::RenderBlock;
use crate::events::{Role, View};
use crate::tools::{SearchResults, ToolKind};

pub const GREETING: &str = "How can I help you today?";
pub const PROMPT: &str = ">_ ";
pub const THINKING: &str = "thinking...";

fn role_color(role: &Role) -> Color {
    match role {
        Role::Agent => Color::Cyan,
        Role::User => Color::DarkYellow,
        Role::Info => Color::Grey,
        Role::Tool(_) => Color::Magenta,
    }
}

pub fn format_line(role: &Role, text: &str) -> String {
    let label = format!("{}:", role.label()).with(role_color(role)).bold();
    format!("{} {}", label, text)
}

pub fn format_block(block: &RenderBlock) -> String {
    match block {
        RenderBlock::Line { role, text } => format_line(role, text),
        RenderBlock::Table { tool, results } => format_table(*tool, results),
    }
}

/// Column-aligned table with the tool title on top
pub fn format_table(tool: ToolKind, results: &SearchResults) -> String {
    let rows = results.rows();
    let mut widths = SearchResults::COLUMNS.map(|c| c.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.cells()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let render_row = |cells: [&str; 5]| {
        cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = vec![
        format_line(&Role::tool(tool.tag()), tool.title()),
        render_row(SearchResults::COLUMNS).bold().to_string(),
    ];
    out.extend(rows.iter().map(|row| render_row(row.cells())));
    out.join("\n")
}

/// Screen shown when the agent could not be reached
pub fn format_view(view: View) -> String {
    match view {
        View::Terminal => format_line(&Role::Agent, GREETING),
        View::Unavailable => [
            format!("── aipfs-library: {} ──", view.title()).with(Color::Green).to_string(),
            "AGENT UNAVAILABLE".with(Color::DarkYellow).bold().to_string(),
            "maybe the agent is not feeling well".with(Color::DarkGrey).to_string(),
        ]
        .join("\n"),
    }
}
