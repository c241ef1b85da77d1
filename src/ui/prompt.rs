use ratatui::{
    Frame,
    layout::Alignment,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

/// Modal notice that blocks the form until a key is pressed.
pub fn render(message: &str, frame: &mut Frame) {
    let area = super::centered_rect(60, 20, frame.area());

    frame.render_widget(Clear, area);

    let notice = Paragraph::new(vec![Line::from(""), Line::from(message)])
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow))
                .title(" Input required ")
                .title_bottom(
                    Line::from(" Press any key ").style(Style::default().fg(Color::DarkGray)),
                ),
        )
        .style(Style::default().fg(Color::White));

    frame.render_widget(notice, area);
}
