//! Demo rendering

use crate::app::{display_value, App};
use formstore::{FieldProps, ReadFieldProps};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

const FIELD_HEIGHT: u16 = 4;

/// Draw the whole demo screen
pub fn draw(frame: &mut Frame, app: &App) {
    let mut constraints = vec![Constraint::Length(1)];
    constraints.extend(app.fields.iter().map(|_| Constraint::Length(FIELD_HEIGHT)));
    constraints.extend([
        Constraint::Min(3),
        Constraint::Length(1),
        Constraint::Length(1),
    ]);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(frame.area());

    let title = if app.store.is_dirty() {
        "Sign up (modified)"
    } else {
        "Sign up"
    };
    frame.render_widget(
        Paragraph::new(Span::styled(
            title,
            Style::default().add_modifier(Modifier::BOLD),
        )),
        chunks[0],
    );

    for (index, field) in app.fields.iter().enumerate() {
        let is_active = index == app.active_field_index;
        let renders = app.render_count(field.id());
        field.render(|props| draw_field(frame, chunks[index + 1], props, is_active, renders));
    }

    let rest = &chunks[app.fields.len() + 1..];
    app.summary
        .render(|props| draw_summary(frame, rest[0], props, app.last_submitted.as_deref()));
    draw_status(frame, rest[1], app.status_message.as_deref());
    draw_help_text(frame, rest[2]);
}

/// Draw one field: bordered value with the error message underneath
fn draw_field(frame: &mut Frame, area: Rect, props: &FieldProps, is_active: bool, renders: usize) {
    let border_style = if is_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let cursor = if is_active { "▌" } else { "" };
    let mut lines = vec![Line::from(vec![
        Span::raw(display_value(&props.value)),
        Span::styled(cursor, Style::default().fg(Color::Cyan)),
    ])];
    if !props.error_message().is_empty() {
        lines.push(Line::from(Span::styled(
            props.error_message().to_string(),
            Style::default().fg(Color::Red),
        )));
    }

    let block = Block::default()
        .title(format!(" {} ", props.id()))
        .title_bottom(Line::from(format!(" renders: {renders} ")).right_aligned())
        .borders(Borders::ALL)
        .border_style(border_style);

    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(block),
        area,
    );
}

fn draw_summary(frame: &mut Frame, area: Rect, props: &ReadFieldProps, submitted: Option<&str>) {
    let mut lines = Vec::new();
    if let ReadFieldProps::Many { values, errors } = props {
        let mut ids: Vec<&String> = values.keys().collect();
        ids.sort();
        for id in ids {
            let error = errors.get(id).map(String::as_str).unwrap_or("");
            let marker = if error.is_empty() { "✓" } else { "✗" };
            lines.push(Line::from(format!(
                "{marker} {id} = {}",
                display_value(&values[id])
            )));
        }
    }
    if let Some(payload) = submitted {
        lines.push(Line::from(Span::styled(
            format!("Last submit: {payload}"),
            Style::default().fg(Color::Green),
        )));
    }

    let block = Block::default().title(" Summary ").borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_status(frame: &mut Frame, area: Rect, message: Option<&str>) {
    if let Some(message) = message {
        frame.render_widget(
            Paragraph::new(Span::styled(message, Style::default().fg(Color::Yellow))),
            area,
        );
    }
}

/// Draw help text at the bottom
fn draw_help_text(frame: &mut Frame, area: Rect) {
    let help = "Tab/↑↓: field | Space: toggle | Enter/Ctrl+S: submit | Ctrl+R: reset | Ctrl+L: clear | Esc: quit";
    frame.render_widget(
        Paragraph::new(help).style(Style::default().fg(Color::DarkGray)),
        area,
    );
}
