//! Detail pane: the highlighted row with its full snippet

use mail::DisplayRow;
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph, Wrap},
};

pub fn detail(row: Option<&DisplayRow>) -> Paragraph<'static> {
    let block = Block::bordered().title(" Message ");
    let Some(row) = row else {
        return Paragraph::new("").block(block);
    };

    let label = Style::new().fg(Color::DarkGray);
    let mut lines = vec![
        Line::from(vec![
            Span::styled("Subject: ", label),
            Span::styled(row.subject.clone(), Style::new().add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![Span::styled("From:    ", label), Span::raw(row.sender.clone())]),
        Line::from(vec![Span::styled("Date:    ", label), Span::raw(row.date.clone())]),
    ];
    if let Some(link) = &row.link {
        lines.push(Line::from(vec![Span::styled("Link:    ", label), Span::raw(link.clone())]));
    }
    lines.push(Line::default());
    lines.push(Line::from(row.snippet_full.clone()));

    Paragraph::new(lines).block(block).wrap(Wrap { trim: false })
}
