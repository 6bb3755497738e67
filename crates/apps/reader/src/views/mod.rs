//! Terminal views
//!
//! [`draw`] lays out the interactive screen; [`print_page`] renders the same
//! table once to plain text for the `search` subcommand.

pub mod detail;
pub mod results_table;

use mail::{MailboxApi, ProfileApi, SearchState};
use ratatui::{
    Frame,
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph, Widget},
};
use std::io::{self, Write};
use unicode_width::UnicodeWidthStr;

use crate::app::ReaderApp;
use crate::input::{commands::HELP, keymap::SHORTCUTS};

const DETAIL_HEIGHT: u16 = 8;

pub fn draw<C: MailboxApi + ProfileApi>(frame: &mut Frame, app: &ReaderApp<C>) {
    let [title_area, table_area, detail_area, footer_area, status_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(4),
        Constraint::Length(DETAIL_HEIGHT),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    frame.render_widget(title(app), title_area);

    let state = app.search_state();
    let block = Block::bordered().title(match state.query() {
        "" => " Results ".to_string(),
        query => format!(" Results for \"{}\" ", query),
    });
    results_table::render(state, app.selected(), block, table_area, frame.buffer_mut());

    frame.render_widget(detail::detail(app.selected_row().as_ref()), detail_area);

    if !state.results().is_empty() {
        frame.render_widget(results_table::footer(state), footer_area);
    }

    frame.render_widget(status_line(app), status_area);

    if app.show_help() {
        let area = centered(frame.area(), 72, (SHORTCUTS.len() + HELP.len() + 5) as u16);
        frame.render_widget(Clear, area);
        frame.render_widget(help(), area);
    }
}

fn title<C: MailboxApi + ProfileApi>(app: &ReaderApp<C>) -> Line<'static> {
    let who = match app.reader().user() {
        Some(user) => format!("Signed in as {}", user.display()),
        None => "Not signed in (press L)".to_string(),
    };
    Line::from(vec![
        Span::styled("Gmail Reader", Style::new().add_modifier(Modifier::BOLD)),
        Span::raw("  "),
        Span::styled(who, Style::new().fg(Color::DarkGray)),
    ])
}

/// The command line while typing, else the last status message or key hints
fn status_line<C: MailboxApi + ProfileApi>(app: &ReaderApp<C>) -> Paragraph<'static> {
    if let Some(input) = app.input() {
        return Paragraph::new(format!(":{}_", input));
    }
    match app.status() {
        Some(status) => Paragraph::new(status.to_string()),
        None => Paragraph::new(Line::from(vec![
            Span::styled("/", Style::new().fg(Color::Yellow)),
            Span::raw(" search  "),
            Span::styled("s d n", Style::new().fg(Color::Yellow)),
            Span::raw(" sort  "),
            Span::styled("h l", Style::new().fg(Color::Yellow)),
            Span::raw(" page  "),
            Span::styled("Enter", Style::new().fg(Color::Yellow)),
            Span::raw(" open  "),
            Span::styled("?", Style::new().fg(Color::Yellow)),
            Span::raw(" help  "),
            Span::styled("q", Style::new().fg(Color::Yellow)),
            Span::raw(" quit"),
        ])),
    }
}

fn help() -> Paragraph<'static> {
    let key = Style::new().fg(Color::Yellow);
    let mut lines: Vec<Line> = SHORTCUTS
        .iter()
        .map(|s| Line::from(vec![Span::styled(format!("{:<20}", s.keys), key), Span::raw(s.description)]))
        .collect();
    lines.push(Line::default());
    lines.push(Line::styled("Commands (after :)", Style::new().add_modifier(Modifier::BOLD)));
    lines.extend(HELP.iter().map(|c| {
        Line::from(vec![Span::styled(format!("{:<28}", c.usage), key), Span::raw(c.description)])
    }));
    Paragraph::new(lines).block(Block::bordered().title(" Help "))
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [area] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(area);
    let [area] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    area
}

/// Buffer contents as text, one string per line with trailing blanks removed
///
/// Cells hidden behind a double-width symbol are skipped.
pub fn buffer_lines(buf: &Buffer) -> Vec<String> {
    let area = buf.area;
    (area.top()..area.bottom())
        .map(|y| {
            let mut line = String::new();
            let mut x = area.left();
            while x < area.right() {
                let symbol = buf[(x, y)].symbol();
                line.push_str(symbol);
                x += symbol.width().max(1) as u16;
            }
            line.trim_end().to_string()
        })
        .collect()
}

/// Print the current page as plain text: table, then footer
pub fn print_page(state: &SearchState, width: u16, out: &mut dyn Write) -> io::Result<()> {
    if state.shows_no_results() {
        return writeln!(out, "{}", results_table::NO_RESULTS);
    }
    if state.results().is_empty() {
        return Ok(());
    }

    let area = Rect::new(0, 0, width, results_table::height(state));
    let mut buf = Buffer::empty(area);
    results_table::table(state).render(area, &mut buf);
    for line in buffer_lines(&buf) {
        writeln!(out, "{}", line)?;
    }
    writeln!(out, "{}", results_table::footer_text(state))
}
