use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use ratatui::Frame;

use crate::app::{App, InputMode};
use crate::search::SearchPhase;
use crate::types::{format_runtime, Feed};

use super::truncate;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let show_search =
        app.input_mode == InputMode::Search || app.session.search_state().is_active();

    if show_search {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(area);
        render_search_bar(frame, app, chunks[0]);
        render_list(frame, app, chunks[1]);
    } else {
        render_list(frame, app, area);
    }
}

fn render_search_bar(frame: &mut Frame, app: &App, area: Rect) {
    let editing = app.input_mode == InputMode::Search;
    let border = if editing {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let mut spans = vec![Span::raw(app.search_input.as_str())];
    if editing {
        spans.push(Span::styled("_", Style::default().fg(Color::Yellow)));
    }

    let title = match app.session.search_state().phase() {
        SearchPhase::Idle => " Search ",
        SearchPhase::Pending => " Search (typing) ",
        SearchPhase::Fetching => " Search (fetching) ",
    };

    let bar = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(border),
    );
    frame.render_widget(bar, area);
}

fn render_list(frame: &mut Frame, app: &App, area: Rect) {
    let cursor = app.session.active_cursor();
    let movies = cursor.items();
    let mut title = match app.session.active_feed() {
        Feed::Popular => format!(" Popular ({}", cursor.len()),
        Feed::Search => format!(" Results ({}", cursor.len()),
    };
    if let Some(total) = cursor.total_pages() {
        title.push_str(&format!(", {} pages", total));
    }
    title.push_str(") ");
    if !app.favorites.is_empty() {
        title.push_str(&format!("♥ {} ", app.favorites.len()));
    }
    let block = Block::default().borders(Borders::ALL).title(title);

    if cursor.is_empty() {
        let message = if app.session.is_loading() {
            "Loading..."
        } else if app.session.is_searching() {
            "No movies match"
        } else {
            "No movies loaded - press r to refresh"
        };
        let empty = Paragraph::new(message)
            .block(block)
            .style(Style::default().fg(Color::Gray));
        frame.render_widget(empty, area);
        return;
    }

    let w = area.width.saturating_sub(2) as usize;
    let fixed = 22; // fav(2) + space(1) + year(4) + spaces(2) + rating(5) + spaces(2) + runtime(6)
    let flex = w.saturating_sub(fixed).max(10);

    let items: Vec<ListItem> = movies
        .iter()
        .enumerate()
        .map(|(i, movie)| {
            let style = if i == app.selected {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            let favorite = if app.favorites.contains(movie.id) {
                "♥ "
            } else {
                "  "
            };

            let runtime = match app.session.runtime(movie.id) {
                Some(r) => format_runtime(r.minutes()),
                None if app.session.runtime_pending(movie.id) => "…".to_string(),
                None => String::new(),
            };

            let line = Line::from(vec![
                Span::styled(favorite, Style::default().fg(Color::Red)),
                Span::raw(" "),
                Span::styled(format!("{:<flex$}", truncate(&movie.title, flex)), style),
                Span::styled(
                    format!("{:>4}", movie.release_year().unwrap_or_default()),
                    Style::default().fg(Color::Gray),
                ),
                Span::raw("  "),
                Span::styled(
                    format!("★{:>4.1}", movie.rating),
                    Style::default().fg(Color::Yellow),
                ),
                Span::raw("  "),
                Span::styled(format!("{:>6}", runtime), Style::default().fg(Color::Cyan)),
            ]);

            ListItem::new(line)
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray));

    let mut state = ListState::default();
    state.select(Some(app.selected));

    frame.render_stateful_widget(list, area, &mut state);
}
