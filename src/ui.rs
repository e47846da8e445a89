use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    widgets::{Block, Borders, BorderType, Clear, List, ListItem, ListState, Paragraph, Wrap},
    style::{Modifier, Style},
    text::{Line, Span},
};
use crate::app::{App, InputMode, LoadState};
use crate::constants::{app::SKELETON_CARDS, messages};
use crate::controller::PaginationView;
use crate::render::{DetailBody, DetailView, GridView, SectionContent};
use crate::theme::ColorScheme;
use crate::types::Endpoint;

// ===============================
// Top-level draw
// ===============================
pub fn draw(f: &mut Frame, app: &App) {
    let colors = app.colors();
    f.render_widget(
        Block::default().style(Style::default().bg(colors.background).fg(colors.text)),
        f.area(),
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Length(3), // search
            Constraint::Length(1), // grid title
            Constraint::Min(0),    // body
            Constraint::Length(1), // pagination
            Constraint::Length(1), // key hints
        ])
        .split(f.area());

    header(f, chunks[0], app);
    search_bar(f, chunks[1], app);
    grid_title(f, chunks[2], app);
    body(f, chunks[3], app);
    pagination_bar(f, chunks[4], app);
    footer(f, chunks[5], app);

    // Overlays render last
    if let Some(detail) = app.detail() {
        draw_detail_overlay(f, detail, app.detail_scroll(), &colors);
    }
    if let Some(msg) = app.toast_message() {
        draw_toast(f, msg, &colors);
    }
}

// ===============================
// Header / Search
// ===============================
fn header(f: &mut Frame, area: Rect, app: &App) {
    let colors = app.colors();
    let mut spans = vec![Span::styled(
        " SHINOBIX ",
        Style::default().fg(colors.accent).add_modifier(Modifier::BOLD),
    )];

    for endpoint in Endpoint::ALL {
        let label = format!(
            " {} {} ({}) ",
            endpoint.index() + 1,
            endpoint.title(),
            app.stat_text(endpoint)
        );
        let style = if endpoint == app.endpoint() {
            Style::default().fg(colors.selection_fg).bg(colors.accent).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(colors.text_dim)
        };
        spans.push(Span::raw("│"));
        spans.push(Span::styled(label, style));
    }
    spans.push(Span::raw("│ "));
    spans.push(Span::raw(app.theme().glyph()));

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn search_bar(f: &mut Frame, area: Rect, app: &App) {
    let colors = app.colors();
    let focused = app.input_mode() == InputMode::Search;
    let text = app.search_input();

    let (content, style) = if text.is_empty() && !focused {
        (app.endpoint().search_placeholder(), Style::default().fg(colors.text_dim))
    } else {
        (text.to_string(), Style::default().fg(colors.text))
    };
    let border = if focused { colors.accent } else { colors.border };

    let paragraph = Paragraph::new(content).style(style).block(
        Block::default()
            .title(" Search ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border)),
    );
    f.render_widget(paragraph, area);

    if focused && area.width > 2 {
        // Cursor inside the input box
        let x = area.x + 1 + (text.chars().count().min(area.width.saturating_sub(2) as usize) as u16);
        f.set_cursor_position((x, area.y + 1));
    }
}

fn grid_title(f: &mut Frame, area: Rect, app: &App) {
    let colors = app.colors();
    let title = Paragraph::new(Line::from(Span::styled(
        format!(" {}", app.title()),
        Style::default().fg(colors.accent).add_modifier(Modifier::BOLD),
    )));
    f.render_widget(title, area);
}

// ===============================
// Body
// ===============================
fn body(f: &mut Frame, area: Rect, app: &App) {
    let colors = app.colors();
    match app.load_state() {
        LoadState::Loading => skeleton(f, area, &colors),
        LoadState::Failed(message) => {
            let rows = Layout::vertical([Constraint::Length(5), Constraint::Min(0)]).split(area);
            error_panel(f, rows[0], message, &colors);
            skeleton(f, rows[1], &colors);
        }
        LoadState::Ready => match app.grid() {
            GridView::Empty => {
                let msg = Paragraph::new(messages::NO_RESULTS)
                    .alignment(Alignment::Center)
                    .style(Style::default().fg(colors.text_dim));
                f.render_widget(msg, area);
            }
            GridView::Cards(cards) => {
                let items: Vec<ListItem> = cards
                    .iter()
                    .map(|card| {
                        ListItem::new(vec![
                            Line::from(Span::styled(
                                card.name.clone(),
                                Style::default().add_modifier(Modifier::BOLD),
                            )),
                            Line::from(Span::raw(format!("  {}", card.summary))),
                            Line::from(Span::styled(
                                format!("  {}", card.image.url()),
                                Style::default().fg(colors.text_dim),
                            )),
                        ])
                    })
                    .collect();

                let list = List::new(items)
                    .block(
                        Block::default()
                            .borders(Borders::ALL)
                            .border_type(BorderType::Rounded)
                            .border_style(Style::default().fg(colors.border)),
                    )
                    .highlight_style(
                        Style::default().bg(colors.selection_bg).fg(colors.selection_fg),
                    )
                    .highlight_symbol("▶ ");

                let mut state = ListState::default();
                state.select(Some(app.selected()));
                f.render_stateful_widget(list, area, &mut state);
            }
        },
    }
}

fn skeleton(f: &mut Frame, area: Rect, colors: &ColorScheme) {
    let width = area.width.saturating_sub(4) as usize;
    let mut lines = Vec::with_capacity(SKELETON_CARDS * 3);
    for _ in 0..SKELETON_CARDS {
        lines.push(Line::from(Span::styled("▆".repeat(width.min(24)), Style::default().fg(colors.skeleton))));
        lines.push(Line::from(Span::styled("▂".repeat(width.min(40)), Style::default().fg(colors.skeleton))));
        lines.push(Line::from(""));
    }
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(colors.border));
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn error_panel(f: &mut Frame, area: Rect, message: &str, colors: &ColorScheme) {
    let text = vec![
        Line::from(Span::styled(message.to_string(), Style::default().add_modifier(Modifier::BOLD))),
        Line::from(messages::OFFLINE_HINT),
    ];
    let panel = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(colors.error))
        .block(
            Block::default()
                .title(" Error ")
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(colors.error)),
        );
    f.render_widget(panel, area);
}

// ===============================
// Footer
// ===============================
fn pagination_bar(f: &mut Frame, area: Rect, app: &App) {
    let view = app.pagination();
    if !view.visible {
        return;
    }
    let colors = app.colors();
    let control = |label: &'static str, disabled: bool| {
        if disabled {
            Span::styled(label, Style::default().fg(colors.text_dim).add_modifier(Modifier::DIM))
        } else {
            Span::styled(label, Style::default().fg(colors.accent).add_modifier(Modifier::BOLD))
        }
    };
    let line = Line::from(vec![
        control("◀ Prev", view.prev_disabled),
        Span::raw(format!("   {}   ", view.label)),
        control("Next ▶", view.next_disabled),
    ]);
    f.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

fn footer(f: &mut Frame, area: Rect, app: &App) {
    let hint = match app.input_mode() {
        InputMode::Search => " type to search · Enter apply · Esc leave",
        InputMode::Detail => " ↑↓ scroll · Esc/Enter close",
        InputMode::Normal => {
            " 1-3/Tab switch · / search · ↑↓ select · Enter open · ←→ page · t theme · r reload · q quit"
        }
    };
    let line = Paragraph::new(hint).style(Style::default().fg(app.colors().text_dim));
    f.render_widget(line, area);
}

// ===============================
// Overlays
// ===============================

/// Lines for the detail overlay body
pub fn detail_lines(detail: &DetailView) -> Vec<String> {
    let mut lines = vec![format!("Image: {}", detail.image), String::new()];
    match &detail.body {
        DetailBody::Character { sections } => {
            for section in sections {
                lines.push(format!("## {}", section.title));
                match &section.content {
                    SectionContent::Rows(rows) => {
                        lines.extend(rows.iter().map(|r| format!("{}: {}", r.label, r.value)));
                    }
                    SectionContent::Items(items) => {
                        lines.extend(items.iter().map(|i| format!("• {i}")));
                    }
                }
                lines.push(String::new());
            }
        }
        DetailBody::Group { about_title, about, members } => {
            lines.push(format!("## {about_title}"));
            lines.push((*about).to_string());
            lines.push(String::new());
            if !members.is_empty() {
                lines.push("## Members".to_string());
                lines.extend(members.iter().map(|m| format!("• {m}")));
            }
        }
    }
    lines
}

fn draw_detail_overlay(f: &mut Frame, detail: &DetailView, scroll: u16, colors: &ColorScheme) {
    let area = centered_rect(80, 80, f.area());
    f.render_widget(Clear, area);

    let lines: Vec<Line> = detail_lines(detail)
        .into_iter()
        .map(|l| match l.strip_prefix("## ") {
            Some(title) => Line::from(Span::styled(
                title.to_string(),
                Style::default().fg(colors.accent).add_modifier(Modifier::BOLD),
            )),
            None => Line::from(l),
        })
        .collect();

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
        .style(Style::default().bg(colors.background).fg(colors.text))
        .block(
            Block::default()
                .title(format!(" {} ", detail.name))
                .title_bottom(" Esc to close ")
                .borders(Borders::ALL)
                .border_type(BorderType::Thick)
                .border_style(Style::default().fg(colors.accent)),
        );
    f.render_widget(paragraph, area);
}

fn draw_toast(f: &mut Frame, msg: &str, colors: &ColorScheme) {
    let full = f.area();
    let width = (msg.chars().count() as u16 + 4).min(full.width);
    let area = Rect {
        x: full.x + full.width.saturating_sub(width) / 2,
        y: full.y + full.height.saturating_sub(4),
        width,
        height: 3.min(full.height),
    };
    f.render_widget(Clear, area);
    let toast = Paragraph::new(msg.to_string())
        .alignment(Alignment::Center)
        .style(Style::default().fg(colors.toast))
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(colors.toast)));
    f.render_widget(toast, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .split(r);
    Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .split(vertical[1])[1]
}

// ===============================
// Plain text (--print)
// ===============================

/// Grid as plain text for non-interactive output
pub fn grid_text(title: &str, grid: &GridView, pagination: &PaginationView) -> String {
    let mut out = format!("{title}\n{}\n", "=".repeat(title.chars().count()));
    match grid {
        GridView::Empty => {
            out.push_str(messages::NO_RESULTS);
            out.push('\n');
        }
        GridView::Cards(cards) => {
            for card in cards {
                out.push_str(&format!("- {}\n    {}\n", card.name, card.summary));
            }
        }
    }
    if pagination.visible {
        out.push_str(&format!("\n{}\n", pagination.label));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{render_detail, render_grid};
    use serde_json::json;

    #[test]
    fn grid_text_lists_cards_and_page() {
        let grid = render_grid(
            &[json!({"name": "Konohagakure", "characters": ["Naruto"]})],
            Endpoint::Village,
        );
        let view = PaginationView {
            visible: true,
            label: "Page 1 of 2".into(),
            prev_disabled: true,
            next_disabled: false,
        };
        let text = grid_text("Villages", &grid, &view);
        assert!(text.starts_with("Villages\n========\n"));
        assert!(text.contains("- Konohagakure\n    Known Members: 1\n"));
        assert!(text.ends_with("Page 1 of 2\n"));
    }

    #[test]
    fn empty_grid_text_says_no_results() {
        let view = PaginationView {
            visible: false,
            label: "Page 1 of 1".into(),
            prev_disabled: true,
            next_disabled: true,
        };
        let text = grid_text("Clans", &GridView::Empty, &view);
        assert!(text.contains("No results found."));
        assert!(!text.contains("Page 1 of 1"));
    }

    #[test]
    fn detail_lines_render_sections() {
        let view = render_detail(
            &json!({"name": "Might Guy", "images": ["https://img/guy.png"], "jutsu": ["Morning Peacock"]}),
            Endpoint::Character,
        );
        let lines = detail_lines(&view);
        assert_eq!(lines[0], "Image: https://img/guy.png");
        assert!(lines.contains(&"## Jutsu".to_string()));
        assert!(lines.contains(&"• Morning Peacock".to_string()));
        assert!(!lines.iter().any(|l| l == "## Personal"));
    }
}
