use crate::app::{App, Focus};
use crate::model::{RecipeDetail, RecipeResult};
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

/// Lay out a result as lines: the predicted label, then one card per recipe
/// in service order.
pub fn result_lines(result: &RecipeResult) -> Vec<Line<'_>> {
    let mut lines = vec![
        Line::from(vec![
            Span::styled(" PREDICTED DISH: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                result.label.as_str(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(""),
    ];

    if result.recipes.is_empty() {
        lines.push(Line::from(Span::styled(
            " No recipes returned",
            Style::default().fg(Color::DarkGray),
        )));
    }

    for (name, detail) in &result.recipes {
        lines.extend(card_lines(name, detail));
        lines.push(Line::from(""));
    }
    lines
}

fn card_lines<'a>(name: &'a str, detail: &'a RecipeDetail) -> Vec<Line<'a>> {
    let heading = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let label = Style::default().fg(Color::DarkGray);

    let mut lines = vec![
        Line::from(Span::styled(
            format!(" ── {} ──", name),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled(" Cuisine: ", label),
            Span::raw(detail.cuisine.as_str()),
            Span::raw("   "),
            Span::styled("Course: ", label),
            Span::raw(detail.course.as_str()),
            Span::raw("   "),
            Span::styled("Diet: ", label),
            Span::raw(detail.diet.as_str()),
        ]),
        Line::from(vec![
            Span::styled(" Estimated Calories: ", label),
            Span::styled(
                format!("{} kcal", detail.estimated_calories),
                Style::default().fg(Color::Green),
            ),
        ]),
        Line::from(Span::styled(" Ingredients:", heading)),
    ];

    lines.extend(
        detail
            .ingredients
            .iter()
            .map(|ingredient| Line::from(format!("   • {}", ingredient))),
    );

    lines.push(Line::from(Span::styled(" Steps:", heading)));
    lines.extend(
        detail
            .steps
            .iter()
            .enumerate()
            .map(|(i, step)| Line::from(format!("   {}. {}", i + 1, step))),
    );
    lines
}

/// Plain-text rendering for the non-interactive `lookup` command.
pub fn plain_text(result: &RecipeResult) -> String {
    result_lines(result)
        .iter()
        .map(|line| {
            line.spans
                .iter()
                .map(|span| span.content.as_ref())
                .collect::<String>()
                .trim_end()
                .to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render(app: &App, frame: &mut Frame, area: Rect) {
    let border = if app.focus == Focus::Results {
        Color::Cyan
    } else if app.results_revealed {
        Color::Green
    } else {
        Color::DarkGray
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(" Results ");

    let Some(result) = &app.result else {
        let hint = if app.is_loading() {
            " Fetching recipes..."
        } else {
            " Results appear here after Get Recipe (Ctrl+R)"
        };
        let empty = Paragraph::new(Span::styled(hint, Style::default().fg(Color::DarkGray)))
            .block(block);
        frame.render_widget(empty, area);
        return;
    };

    let content = Paragraph::new(result_lines(result))
        .wrap(Wrap { trim: false })
        .scroll((app.result_scroll, 0))
        .block(
            block.title_bottom(
                Line::from(format!(" {} recipe(s)  scroll: {} ", result.recipes.len(), app.result_scroll))
                    .alignment(Alignment::Right),
            ),
        );
    frame.render_widget(content, area);
}
