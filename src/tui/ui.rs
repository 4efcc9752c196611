//! Layout and widgets for the watch view.

use super::app::{project_row, status_color, DashboardState};
use crate::render::{element_id, MemorySurface};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

pub fn draw(
    frame: &mut Frame,
    state: &DashboardState,
    surface: &MemorySurface,
    detail_project: Option<&str>,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(frame.area());

    draw_header(frame, chunks[0], state, surface);
    match detail_project {
        Some(project) => draw_detail(frame, chunks[1], surface, project),
        None => draw_table(frame, chunks[1], state, surface),
    }
    draw_footer(frame, chunks[2], state);
}

fn draw_header(frame: &mut Frame, area: Rect, state: &DashboardState, surface: &MemorySurface) {
    let line = if state.service_down {
        Line::from(Span::styled(
            format!(
                "BUILD SERVICE UNREACHABLE  {}",
                surface.text(element_id::SERVICE_BANNER)
            ),
            Style::default()
                .fg(Color::White)
                .bg(Color::Red)
                .add_modifier(Modifier::BOLD),
        ))
    } else {
        let summary = &state.summary;
        Line::from(vec![
            Span::styled(
                format!(" {} passed ", summary.passed),
                Style::default().fg(Color::Green),
            ),
            Span::styled(
                format!(" {} failed ", summary.failed),
                Style::default().fg(Color::Red),
            ),
            Span::styled(
                format!(" {} building ", summary.building),
                Style::default().fg(Color::Cyan),
            ),
            Span::styled(
                format!(" {} inactive ", summary.inactive),
                Style::default().fg(Color::DarkGray),
            ),
            Span::raw(format!(" {} total ", summary.total)),
            Span::styled(
                format!(" rate {} ", summary.rate()),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ])
    };

    let block = Block::default().borders(Borders::ALL).title(" buildwatch ");
    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn draw_table(frame: &mut Frame, area: Rect, state: &DashboardState, surface: &MemorySurface) {
    let rows: Vec<Row> = state
        .projects
        .iter()
        .map(|project| {
            let row = project_row(surface, project);
            let color = status_color(&row.status_class);
            Row::new(vec![
                Cell::from(row.name),
                Cell::from(row.status_class.clone()).style(Style::default().fg(color)),
                Cell::from(row.build_date),
                Cell::from(row.timer).style(Style::default().fg(Color::Cyan)),
                Cell::from(row.link).style(Style::default().fg(Color::DarkGray)),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Min(16),
            Constraint::Length(20),
            Constraint::Length(26),
            Constraint::Length(40),
            Constraint::Min(20),
        ],
    )
    .header(
        Row::new(vec!["PROJECT", "STATE", "LAST BUILD", "TIMER", "DETAILS"])
            .style(Style::default().add_modifier(Modifier::BOLD)),
    )
    .block(Block::default().borders(Borders::ALL).title(" projects "));

    frame.render_widget(table, area);
}

fn draw_detail(frame: &mut Frame, area: Rect, surface: &MemorySurface, project: &str) {
    let status_class = surface
        .classes(element_id::DETAIL_SUMMARY)
        .into_iter()
        .find(|c| crate::render::is_status_class(c))
        .unwrap_or_else(|| "unknown".to_string());
    let color = status_color(&status_class);

    let lines = vec![
        Line::from(vec![
            Span::styled("Project: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                project.to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled("Status:  ", Style::default().fg(Color::DarkGray)),
            Span::styled(surface.text(element_id::DETAIL_STATUS), Style::default().fg(color)),
        ]),
        Line::from(vec![
            Span::styled("Timer:   ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                surface.text(&element_id::timer(project)),
                Style::default().fg(Color::Cyan),
            ),
        ]),
        Line::from(vec![
            Span::styled("Details: ", Style::default().fg(Color::DarkGray)),
            Span::raw(surface.href(element_id::DETAIL_LINK)),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {project} "))
        .border_style(Style::default().fg(color));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_footer(frame: &mut Frame, area: Rect, state: &DashboardState) {
    let mut spans = vec![Span::styled(
        " q quit · r refresh ",
        Style::default().fg(Color::DarkGray),
    )];
    if let Some(last_poll) = state.last_poll {
        spans.push(Span::styled(
            format!("· updated {} ", last_poll.format("%H:%M:%S")),
            Style::default().fg(Color::DarkGray),
        ));
    }
    if let Some(error) = &state.last_error {
        spans.push(Span::styled(
            format!("· last poll failed: {error} "),
            Style::default().fg(Color::Red),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
