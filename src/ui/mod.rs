mod form;
mod help;
mod landing;
mod prompt;
pub mod results;

use crate::app::App;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
};

/// Top-level render dispatch.
pub fn render(app: &App, frame: &mut Frame) {
    if app.landing_visible() {
        landing::render(frame);
    } else {
        form::render(app, frame);
    }

    // Overlays on top, input-required notice first
    if let Some(message) = &app.prompt {
        prompt::render(message, frame);
    } else if app.show_help {
        help::render(frame);
    }
}

/// Create a centered rectangle using percentage of parent area.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::INPUT_REQUIRED;
    use ratatui::{Terminal, backend::TestBackend};
    use std::time::Duration;

    fn screen_text(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal.draw(|frame| render(app, frame)).unwrap();
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_landing_then_form() {
        let mut app = App::new("http://127.0.0.1:8000", Duration::ZERO);
        let landing = screen_text(&app);
        assert!(landing.contains("Let's Eat Healthy"));
        assert!(!landing.contains("Dish Name"));

        app.enter_form();
        let form = screen_text(&app);
        assert!(form.contains("Dish Name"));
        assert!(!form.contains("Let's Eat Healthy"));
    }

    #[test]
    fn test_prompt_overlay_shows_notice() {
        let mut app = App::new("http://127.0.0.1:8000", Duration::ZERO);
        app.enter_form();
        app.begin_dispatch();
        assert!(screen_text(&app).contains(INPUT_REQUIRED));
    }

    #[test]
    fn test_error_is_rendered() {
        let mut app = App::new("http://127.0.0.1:8000", Duration::ZERO);
        app.enter_form();
        app.error = Some("no match found".to_string());
        assert!(screen_text(&app).contains("no match found"));
    }

    #[test]
    fn test_centered_rect_is_inside_area() {
        let area = Rect::new(0, 0, 100, 50);
        let inner = centered_rect(60, 40, area);
        assert_eq!(inner.width, 60);
        assert_eq!(inner.height, 20);
        assert!(inner.x >= area.x && inner.y >= area.y);
    }
}
