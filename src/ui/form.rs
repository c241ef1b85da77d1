use crate::app::{App, Focus};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use unicode_width::UnicodeWidthStr;

pub fn render(app: &App, frame: &mut Frame) {
    let area = frame.area();
    let error_height = if app.error.is_some() { 3 } else { 0 };

    // Layout: header(3) + dish(3) + image(3) + error(0/3) + results(min) + status(1)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(error_height),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(area);

    // ── Header ──
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " Recipe & Calorie Generator",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("   [{}]", app.service_url),
            Style::default().fg(Color::DarkGray),
        ),
    ]))
    .alignment(Alignment::Left)
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(header, chunks[0]);

    // ── Inputs ──
    render_field(
        frame,
        chunks[1],
        " Dish Name ",
        &app.dish_name,
        "e.g. masala karela",
        app.focus == Focus::DishName,
    );

    let image_title = match &app.selected_image {
        Some(image) => format!(
            " Dish Image [attached: {} {} {}] ",
            image.file_name,
            image.mime,
            image.size_label()
        ),
        None => " Dish Image (path, Enter to attach) ".to_string(),
    };
    render_field(
        frame,
        chunks[2],
        &image_title,
        &app.image_path,
        "e.g. ~/Pictures/idli.jpg",
        app.focus == Focus::ImagePath,
    );

    // ── Error ──
    if let Some(error) = &app.error {
        let error_widget = Paragraph::new(error.as_str())
            .style(Style::default().fg(Color::Red))
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Red))
                    .title(" Error "),
            );
        frame.render_widget(error_widget, chunks[3]);
    }

    // ── Results ──
    super::results::render(app, frame, chunks[4]);

    // ── Status bar ──
    render_status(app, frame, chunks[5]);
}

fn render_field(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    value: &str,
    placeholder: &str,
    focused: bool,
) {
    let style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let text = if value.is_empty() && !focused {
        Span::styled(placeholder, Style::default().fg(Color::DarkGray))
    } else {
        Span::styled(value, Style::default().fg(Color::White))
    };

    let field = Paragraph::new(Line::from(vec![Span::raw(" "), text])).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(style)
            .title(title.to_string()),
    );
    frame.render_widget(field, area);

    if focused {
        let max_x = area.x + area.width.saturating_sub(2);
        let cursor_x = (area.x + 2 + value.width() as u16).min(max_x);
        frame.set_cursor_position((cursor_x, area.y + 1));
    }
}

fn render_status(app: &App, frame: &mut Frame, area: Rect) {
    let key = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);

    let mut spans = vec![
        Span::styled(" Ctrl+R", key),
        Span::raw(" Get Recipe  "),
        Span::styled("Tab", key),
        Span::raw(" Focus  "),
    ];
    if app.selected_image.is_some() {
        spans.push(Span::styled("Ctrl+X", key));
        spans.push(Span::raw(" Remove Image  "));
    }
    spans.push(Span::styled("F1", key));
    spans.push(Span::raw(" Help  "));
    spans.push(Span::styled("Ctrl+C", key));
    spans.push(Span::raw(" Quit  "));

    let status_style = if app.is_loading() {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    spans.push(Span::styled(app.status_msg.as_str(), status_style));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
