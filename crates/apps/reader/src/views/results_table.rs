//! Search result table, header arrow and page footer

use mail::{DisplayRow, SearchState, SortField, SortOrder};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Cell, Paragraph, Row, StatefulWidget, Table, TableState, Widget},
};

pub const NO_RESULTS: &str = "No results found.";

const WIDTHS: [Constraint; 5] = [
    Constraint::Length(3),
    Constraint::Fill(2),
    Constraint::Length(24),
    Constraint::Length(16),
    Constraint::Fill(3),
];

/// Lines the table needs for the current page: header plus one per row
pub fn height(state: &SearchState) -> u16 {
    state.visible().len() as u16 + 1
}

/// Table for the current page; subjects that link to Gmail are underlined
pub fn table(state: &SearchState) -> Table<'static> {
    let order = state.order();
    let header = Row::new(vec![
        Cell::from("#"),
        Cell::from(header_label("Subject", SortField::Subject, order)),
        Cell::from("From"),
        Cell::from(header_label("Date", SortField::Date, order)),
        Cell::from(header_label("Snippet", SortField::Snippet, order)),
    ])
    .style(Style::new().add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = state
        .visible_rows()
        .into_iter()
        .enumerate()
        .map(|(i, row)| result_row(i + 1, row))
        .collect();

    Table::new(rows, WIDTHS)
        .header(header)
        .column_spacing(1)
        .row_highlight_style(Style::new().add_modifier(Modifier::REVERSED))
}

fn result_row(position: usize, row: DisplayRow) -> Row<'static> {
    let subject_style = if row.link.is_some() {
        Style::new().fg(Color::Cyan).add_modifier(Modifier::UNDERLINED)
    } else {
        Style::new()
    };
    Row::new(vec![
        Cell::from(format!("{:>3}", position)),
        Cell::from(row.subject).style(subject_style),
        Cell::from(row.sender),
        Cell::from(row.date),
        Cell::from(row.snippet).style(Style::new().fg(Color::Gray)),
    ])
}

/// Draw the results area: the table, the empty notice, or an empty frame
/// before the first search
pub fn render(
    state: &SearchState,
    selected: Option<usize>,
    block: Block<'static>,
    area: Rect,
    buf: &mut Buffer,
) {
    if state.shows_no_results() {
        Paragraph::new(NO_RESULTS).block(block).render(area, buf);
    } else if state.results().is_empty() {
        block.render(area, buf);
    } else {
        let mut table_state = TableState::default().with_selected(selected);
        StatefulWidget::render(table(state).block(block), area, buf, &mut table_state);
    }
}

fn header_label(label: &str, field: SortField, order: SortOrder) -> String {
    if order.field == field {
        format!("{} {}", label, order.direction.arrow())
    } else {
        label.to_string()
    }
}

/// `Rows per page: 5   6-10 of 12   Page 2/3`
pub fn footer_text(state: &SearchState) -> String {
    let total = state.results().len();
    let pagination = state.pagination();
    let range = pagination.range(total);
    format!(
        "Rows per page: {}   {}-{} of {}   Page {}/{}",
        pagination.page_size(),
        range.start + 1,
        range.end,
        total,
        pagination.page() + 1,
        state.page_count(),
    )
}

pub fn footer(state: &SearchState) -> Paragraph<'static> {
    Paragraph::new(footer_text(state)).style(Style::new().fg(Color::DarkGray))
}
