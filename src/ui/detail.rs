use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::app::App;
use crate::types::{format_runtime, MovieDetail, Video};

/// Draw the detail screen. The scroll offset is clamped to the content here
/// and written back, so scrolling past the end does not accumulate.
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let favorite = app
        .detail
        .as_ref()
        .is_some_and(|view| app.favorites.contains(view.id));

    let Some(view) = app.detail.as_mut() else {
        let block = Block::default().borders(Borders::ALL).title("Movie");
        let empty = Paragraph::new("No movie selected")
            .block(block)
            .style(Style::default().fg(Color::Gray));
        frame.render_widget(empty, area);
        return;
    };

    let Some(detail) = view.detail.as_ref() else {
        let (message, color) = match &view.error {
            Some(e) => (format!("Error: {}", e), Color::Red),
            None => ("Loading...".to_string(), Color::Yellow),
        };
        let status = Paragraph::new(message)
            .block(Block::default().borders(Borders::ALL).title(view.title.as_str()))
            .style(Style::default().fg(color));
        frame.render_widget(status, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(0)])
        .split(area);

    render_header(frame, favorite, view.trailer.as_ref(), detail, chunks[0]);
    render_body(frame, detail, &mut view.scroll_offset, chunks[1]);
}

fn render_header(
    frame: &mut Frame,
    favorite: bool,
    trailer: Option<&Video>,
    detail: &MovieDetail,
    area: Rect,
) {
    let favorite = if favorite {
        Span::styled("♥ favorite", Style::default().fg(Color::Red))
    } else {
        Span::raw("")
    };

    let trailer = match trailer {
        Some(video) => Span::styled(
            format!("▶ {} (t)", video.name),
            Style::default().fg(Color::Green),
        ),
        None => Span::styled("no trailer", Style::default().fg(Color::DarkGray)),
    };

    let lines = vec![
        Line::from(vec![
            Span::styled(&detail.title, Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" "),
            Span::styled(
                detail
                    .release_year()
                    .map(|y| format!("({})", y))
                    .unwrap_or_default(),
                Style::default().fg(Color::Gray),
            ),
            Span::raw("  "),
            favorite,
        ]),
        Line::from(vec![
            Span::styled(
                format!("★ {:.1}", detail.rating),
                Style::default().fg(Color::Yellow),
            ),
            Span::raw(" | "),
            Span::styled(
                format_runtime(detail.runtime.unwrap_or(0)),
                Style::default().fg(Color::Cyan),
            ),
            Span::raw(" | "),
            Span::raw(detail.genres.join(", ")),
        ]),
        Line::from(vec![trailer]),
    ];

    let header =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Details"));

    frame.render_widget(header, area);
}

fn render_body(frame: &mut Frame, detail: &MovieDetail, scroll_offset: &mut usize, area: Rect) {
    let mut lines: Vec<Line> = Vec::new();
    if detail.overview.is_empty() {
        lines.push(Line::styled(
            "No overview available.",
            Style::default().fg(Color::Gray),
        ));
    } else {
        lines.extend(detail.overview.lines().map(Line::raw));
    }

    if !detail.cast.is_empty() {
        lines.push(Line::raw(""));
        lines.push(Line::styled(
            "Cast",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));
        for member in &detail.cast {
            let mut spans = vec![Span::raw(format!("  {}", member.name))];
            if let Some(character) = &member.character {
                spans.push(Span::styled(
                    format!(" as {}", character),
                    Style::default().fg(Color::Gray),
                ));
            }
            lines.push(Line::from(spans));
        }
    }

    let inner_width = area.width.saturating_sub(2) as usize;
    let inner_height = area.height.saturating_sub(2) as usize;
    let max_scroll = wrapped_height(&lines, inner_width).saturating_sub(inner_height);
    *scroll_offset = (*scroll_offset).min(max_scroll);
    let scroll = u16::try_from(*scroll_offset).unwrap_or(u16::MAX);

    frame.render_widget(Clear, area);

    let body = Paragraph::new(Text::from(lines))
        .block(Block::default().borders(Borders::ALL).title("Overview"))
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));

    frame.render_widget(body, area);
}

/// Rows `lines` take up when wrapped at `width` columns
fn wrapped_height(lines: &[Line], width: usize) -> usize {
    let width = width.max(1);
    lines
        .iter()
        .map(|line| line.width().max(1).div_ceil(width))
        .sum()
}
