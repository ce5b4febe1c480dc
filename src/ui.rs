use ratatui::{prelude::*, widgets::*};

/// Renders a text input field with cursor
pub fn render_input<'a>(content: &'a str, title: &'a str, is_focused: bool) -> Paragraph<'a> {
    let style = if is_focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(style)
        .title(title);

    Paragraph::new(content).block(block)
}

/// Rating color, on the usual 0-10 vote average scale
pub fn rating_color(vote_average: f64) -> Color {
    if vote_average >= 7.0 {
        Color::Green
    } else if vote_average >= 5.0 {
        Color::Yellow
    } else if vote_average > 0.0 {
        Color::Red
    } else {
        Color::DarkGray
    }
}

/// One-line rating such as "7.8/10", or a dash when there are no votes yet
pub fn rating_label(vote_average: f64) -> String {
    if vote_average > 0.0 {
        format!("{:.1}/10", vote_average)
    } else {
        String::from("-")
    }
}

/// Truncates to `max` characters with a trailing ellipsis
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", cut)
}

/// Footer line for a paged list: load-more spinner, error, or end marker
pub fn list_footer(loading_more: bool, has_more: bool, error: Option<&str>) -> Option<String> {
    if loading_more {
        Some(String::from("Loading more…"))
    } else if let Some(e) = error {
        Some(format!("Error: {}", e))
    } else if !has_more {
        Some(String::from("End of results"))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_color_bands() {
        assert_eq!(rating_color(8.2), Color::Green);
        assert_eq!(rating_color(5.0), Color::Yellow);
        assert_eq!(rating_color(3.1), Color::Red);
        assert_eq!(rating_color(0.0), Color::DarkGray);
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a very long title", 8), "a very …");
        assert_eq!(truncate("Amélie à Paris", 7), "Amélie…");
    }

    #[test]
    fn test_list_footer_precedence() {
        assert_eq!(list_footer(true, true, None).as_deref(), Some("Loading more…"));
        assert_eq!(
            list_footer(false, true, Some("timeout")).as_deref(),
            Some("Error: timeout")
        );
        assert_eq!(list_footer(false, false, None).as_deref(), Some("End of results"));
        assert_eq!(list_footer(false, true, None), None);
    }
}
