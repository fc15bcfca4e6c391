use ratatui::{prelude::*, widgets::*};

use crate::models::{Shipment, ShipmentDraft, ShipmentField};

/// Renders a text input field; `masked` hides the content (passwords)
pub fn render_input<'a>(content: &'a str, title: &'a str, is_focused: bool, masked: bool) -> Paragraph<'a> {
    let style = if is_focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(style)
        .title(format!(" {} ", title));

    let text = if masked {
        "*".repeat(content.chars().count())
    } else {
        content.to_string()
    };

    Paragraph::new(text).block(block)
}

/// Terminal column of a byte cursor inside an input box
pub fn cursor_column(content: &str, cursor: usize) -> u16 {
    u16::try_from(content[..cursor.min(content.len())].chars().count()).unwrap_or(u16::MAX)
}

/// Shipments table with one row per record
pub fn render_shipment_table<'a>(shipments: &'a [Shipment], is_focused: bool) -> Table<'a> {
    let header = Row::new(
        ShipmentField::ALL
            .iter()
            .map(|f| Cell::from(f.label()))
            .chain(std::iter::once(Cell::from("Edit"))),
    )
    .style(Style::default().fg(Color::Cyan).bold());

    let rows = shipments.iter().map(|s| {
        Row::new(vec![
            Cell::from(s.fields.tracking_number.as_str()),
            Cell::from(s.fields.customer_name.as_str()),
            Cell::from(s.fields.invoice_number.as_str()),
            Cell::from(s.fields.customer_number.as_str()),
            Cell::from("✎"),
        ])
    });

    let highlight = if is_focused {
        Style::default().fg(Color::Black).bg(Color::Yellow)
    } else {
        Style::default()
    };

    Table::new(
        rows,
        [
            Constraint::Percentage(24),
            Constraint::Percentage(28),
            Constraint::Percentage(22),
            Constraint::Percentage(20),
            Constraint::Length(4),
        ],
    )
    .header(header)
    .row_highlight_style(highlight)
    .highlight_symbol("> ")
}

/// "Label: value" lines for the detail panel
pub fn detail_lines(fields: &ShipmentDraft) -> Vec<Line<'static>> {
    ShipmentField::ALL
        .iter()
        .map(|f| {
            Line::from(vec![
                Span::styled(format!("{}: ", f.label()), Style::default().bold()),
                Span::raw(fields.get(*f).to_string()),
            ])
        })
        .collect()
}

pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
