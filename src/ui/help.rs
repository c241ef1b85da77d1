use ratatui::{
    Frame,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

fn section(title: &str) -> Line<'_> {
    Line::from(Span::styled(
        title,
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    ))
}

fn binding<'a>(keys: &'a str, action: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::styled(keys, Style::default().fg(Color::Yellow)),
        Span::raw(action),
    ])
}

pub fn render(frame: &mut Frame) {
    let area = super::centered_rect(70, 70, frame.area());

    // Clear the area behind the popup
    frame.render_widget(Clear, area);

    let help_text = vec![
        Line::from(""),
        section("  Global"),
        binding("    F1        ", "Toggle this help"),
        binding("    Ctrl+C    ", "Quit application"),
        Line::from(""),
        section("  Form"),
        binding("    Tab       ", "Next field (dish name, image, results)"),
        binding("    Shift+Tab ", "Previous field"),
        binding("    Enter     ", "Dish name: get recipe / Image: attach file"),
        binding("    Ctrl+R    ", "Get recipe from any field"),
        binding("    Ctrl+X    ", "Remove attached image"),
        Line::from(""),
        section("  Results"),
        binding("    ↑/k ↓/j   ", "Scroll"),
        binding("    PgUp/PgDn ", "Scroll page up/down"),
        binding("    Esc       ", "Back to the dish name"),
        binding("    q         ", "Quit application"),
        Line::from(""),
        Line::from(Span::styled(
            "  An attached image is sent instead of the dish name.",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
    ];

    let help = Paragraph::new(help_text)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Help: Keybindings ")
                .title_bottom(Line::from(" Press any key to close ").style(Style::default().fg(Color::DarkGray))),
        )
        .style(Style::default().fg(Color::White));

    frame.render_widget(help, area);
}
