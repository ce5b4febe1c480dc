//! Marquee TUI - Actor-based terminal movie browser
//!
//! Architecture:
//! - UI Layer (Ratatui) - synchronous terminal rendering
//! - App Layer - central state machine processing events
//! - Network Layer (Tokio) - async HTTP execution

mod models;
mod storage;
mod ui;
mod fetch;
mod messages;
mod app;
mod network;
mod constants;

use std::io;
use std::time::Duration;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::*,
};
use tokio::sync::mpsc;

use messages::{UiEvent, NetworkCommand, NetworkResponse, RenderState};
use messages::ui_events::{key_to_ui_event, AppTab, AuthField, AuthMode, InputMode};
use app::{AppActor, AppState};
use network::NetworkActor;
use storage::Storage;
use ui::{list_footer, rating_color, rating_label, truncate};

/// Terminal cleanup guard
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging to file
    let file_appender = tracing_appender::rolling::never(".", "marquee.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let _guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create channels
    let (ui_tx, ui_rx) = mpsc::unbounded_channel::<UiEvent>();
    let (net_cmd_tx, net_cmd_rx) = mpsc::unbounded_channel::<NetworkCommand>();
    let (net_resp_tx, net_resp_rx) = mpsc::unbounded_channel::<NetworkResponse>();
    let (render_tx, mut render_rx) = mpsc::unbounded_channel::<RenderState>();

    let storage = Storage::new();

    // Spawn network actor
    let network_actor = NetworkActor::new(net_resp_tx, &storage.config);
    tokio::spawn(network_actor.run(net_cmd_rx));

    // Spawn app actor
    let app_actor = AppActor::new(AppState::new(storage), net_cmd_tx, render_tx);
    tokio::spawn(app_actor.run(ui_rx, net_resp_rx));

    // Run UI loop (synchronous with async polling)
    run_ui_loop(&mut terminal, ui_tx, &mut render_rx).await?;

    Ok(())
}

/// Run the synchronous UI rendering loop
async fn run_ui_loop(
    terminal: &mut Terminal<impl Backend>,
    ui_tx: mpsc::UnboundedSender<UiEvent>,
    render_rx: &mut mpsc::UnboundedReceiver<RenderState>,
) -> anyhow::Result<()> {
    let mut current_state = RenderState::default();

    loop {
        // Draw with current state
        terminal.draw(|f| draw_ui(f, &current_state))?;

        // Poll for events with timeout
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Some(event) = key_to_ui_event(
                    key,
                    current_state.active_tab,
                    current_state.input_mode,
                    current_state.show_help,
                    current_state.show_auth,
                    current_state.details_open,
                ) {
                    if matches!(event, UiEvent::Quit) {
                        let _ = ui_tx.send(event);
                        break;
                    }
                    let _ = ui_tx.send(event);
                }
            }
        }

        // Check for state updates (non-blocking)
        while let Ok(state) = render_rx.try_recv() {
            current_state = state;
        }
    }

    Ok(())
}

// ============================================================================
// UI Drawing Functions
// ============================================================================

fn draw_ui(f: &mut Frame, state: &RenderState) {
    let area = f.area();

    // Main layout with tab bar
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),  // Tab bar
            Constraint::Min(0),     // Content
            Constraint::Length(1),  // Status bar
        ])
        .split(area);

    // Draw tab bar
    draw_tab_bar(f, state, main_chunks[0]);

    // Draw content based on active tab
    match state.active_tab {
        AppTab::Home => draw_home_tab(f, state, main_chunks[1]),
        AppTab::Search => draw_search_tab(f, state, main_chunks[1]),
        AppTab::Saved => draw_saved_tab(f, state, main_chunks[1]),
        AppTab::Profile => draw_profile_tab(f, state, main_chunks[1]),
    }

    // Status bar
    draw_status_bar(f, state, main_chunks[2]);

    // Overlays and popups
    if state.details_open {
        draw_details_overlay(f, state, area);
    }

    if state.show_auth {
        draw_auth_popup(f, state, area);
    }

    if state.show_help {
        draw_help_popup(f, area);
    }
}

fn draw_tab_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let tab = |label: &'static str, this: AppTab, color: Color| {
        Span::styled(
            label,
            if state.active_tab == this {
                Style::default().fg(Color::Black).bg(color).bold()
            } else {
                Style::default().fg(Color::Gray)
            },
        )
    };

    let mut tabs = vec![
        tab(" 1:Home ", AppTab::Home, Color::Cyan),
        Span::raw(" "),
        tab(" 2:Search ", AppTab::Search, Color::Magenta),
        Span::raw(" "),
        tab(" 3:Saved ", AppTab::Saved, Color::Yellow),
        Span::raw(" "),
        tab(" 4:Profile ", AppTab::Profile, Color::Green),
    ];

    if state.refreshing {
        tabs.push(Span::styled(" [~]", Style::default().fg(Color::Yellow)));
    }
    if let Some(user) = &state.user {
        tabs.push(Span::styled(
            format!("  @{}", user.username),
            Style::default().fg(Color::Green),
        ));
    }

    let tab_line = Line::from(tabs);
    f.render_widget(Paragraph::new(tab_line), area);
}

fn draw_home_tab(f: &mut Frame, state: &RenderState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7),  // Trending
            Constraint::Min(5),     // Popular
        ])
        .split(area);

    draw_trending(f, state, chunks[0]);
    draw_popular(f, state, chunks[1]);
}

fn draw_trending(f: &mut Frame, state: &RenderState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Trending (most searched) ");

    let mut lines: Vec<Line> = Vec::new();
    match &state.trending {
        Some(entries) if !entries.is_empty() => {
            for (i, entry) in entries.iter().enumerate() {
                lines.push(Line::from(vec![
                    Span::styled(
                        format!(" {}. ", i + 1),
                        Style::default().fg(Color::Yellow).bold(),
                    ),
                    Span::raw(truncate(&entry.title, 50)),
                    Span::styled(
                        format!("  ({} searches)", entry.count),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]));
            }
        }
        Some(_) => {
            lines.push(Line::from(Span::styled(
                " Nothing trending yet. Searches feed this list.",
                Style::default().fg(Color::DarkGray),
            )));
        }
        None => {
            let text = match &state.trending_error {
                Some(e) => format!(" Error: {}", e),
                None => String::from(" Loading…"),
            };
            lines.push(Line::from(Span::styled(
                text,
                Style::default().fg(Color::DarkGray),
            )));
        }
    }
    // A stale list with a newer error shows both
    if state.trending.is_some() {
        if let Some(e) = &state.trending_error {
            lines.push(Line::from(Span::styled(
                format!(" Error: {}", e),
                Style::default().fg(Color::Red),
            )));
        }
    }

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_popular(f: &mut Frame, state: &RenderState, area: Rect) {
    let title = if state.popular_loading {
        " Popular [...] "
    } else {
        " Popular "
    };

    let mut block = Block::default().borders(Borders::ALL).title(title);
    if let Some(footer) = list_footer(
        state.popular_loading_more,
        state.popular_has_more,
        state.popular_error.as_deref(),
    ) {
        block = block.title_bottom(Line::from(format!(" {} ", footer)).right_aligned());
    }

    draw_movie_list(
        f,
        &state.popular,
        state.popular_selected,
        block,
        area,
        state.popular_loading && state.popular.is_empty(),
    );
}

fn draw_movie_list(
    f: &mut Frame,
    movies: &[models::MovieSummary],
    selected: usize,
    block: Block,
    area: Rect,
    loading_empty: bool,
) {
    if loading_empty {
        let paragraph = Paragraph::new("Loading…")
            .block(block)
            .style(Style::default().fg(Color::DarkGray));
        f.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = movies
        .iter()
        .map(|movie| {
            let year = movie.release_year().unwrap_or("----");
            let rating = Span::styled(
                format!("{:>7}", rating_label(movie.vote_average)),
                Style::default().fg(rating_color(movie.vote_average)),
            );
            ListItem::new(Line::from(vec![
                rating,
                Span::raw("  "),
                Span::styled(format!("{}  ", year), Style::default().fg(Color::DarkGray)),
                Span::raw(truncate(&movie.title, 60)),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().fg(Color::Yellow).bold())
        .highlight_symbol("> ");

    let mut list_state = ListState::default();
    if !movies.is_empty() {
        list_state.select(Some(selected));
    }
    f.render_stateful_widget(list, area, &mut list_state);
}

fn draw_search_tab(f: &mut Frame, state: &RenderState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // Query input
            Constraint::Min(5),     // Results
        ])
        .split(area);

    let editing = state.input_mode == InputMode::Editing;
    let input = ui::render_input(
        &state.search_query,
        " Search (/ or e to edit, Enter to submit) ",
        editing,
    );
    f.render_widget(input, chunks[0]);
    if editing {
        let max_x = chunks[0].x + chunks[0].width.saturating_sub(2);
        let cursor_x = (chunks[0].x + state.search_query.chars().count() as u16 + 1).min(max_x);
        f.set_cursor_position(Position::new(cursor_x, chunks[0].y + 1));
    }

    let title = match (&state.searched_query, state.search_loading) {
        (_, true) => String::from(" Results [...] "),
        (Some(q), false) => format!(" Results for \"{}\" ", truncate(q, 40)),
        (None, false) => String::from(" Results "),
    };

    let mut block = Block::default().borders(Borders::ALL).title(title);
    if let Some(footer) = list_footer(
        state.search_loading_more,
        state.search_has_more,
        state.search_error.as_deref(),
    ) {
        block = block.title_bottom(Line::from(format!(" {} ", footer)).right_aligned());
    }

    if state.searched_query.is_some() && state.search_results.is_empty() && !state.search_loading {
        let paragraph = Paragraph::new("No movies found")
            .block(block)
            .style(Style::default().fg(Color::DarkGray));
        f.render_widget(paragraph, chunks[1]);
        return;
    }

    draw_movie_list(
        f,
        &state.search_results,
        state.search_selected,
        block,
        chunks[1],
        state.search_loading && state.search_results.is_empty(),
    );
}

fn draw_saved_tab(f: &mut Frame, state: &RenderState, area: Rect) {
    let title = if state.saved_loading {
        " Saved [...] "
    } else {
        " Saved "
    };
    let mut block = Block::default().borders(Borders::ALL).title(title);
    if let Some(e) = &state.saved_error {
        block = block.title_bottom(Line::from(format!(" Error: {} ", e)).right_aligned());
    }

    if state.user.is_none() {
        let paragraph = Paragraph::new(
            "Sign in to save movies.\n\nGo to the Profile tab (4) and press 'i' to sign in.",
        )
        .block(block)
        .style(Style::default().fg(Color::DarkGray))
        .wrap(Wrap { trim: false });
        f.render_widget(paragraph, area);
        return;
    }

    if state.saved.is_empty() {
        let text = if state.saved_loading {
            "Loading…"
        } else {
            "No saved movies yet.\n\nOpen a movie and press 's' to save it."
        };
        let paragraph = Paragraph::new(text)
            .block(block)
            .style(Style::default().fg(Color::DarkGray))
            .wrap(Wrap { trim: false });
        f.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = state
        .saved
        .iter()
        .map(|record| {
            let year = record
                .release_date
                .as_deref()
                .and_then(|d| d.split('-').next())
                .unwrap_or("----");
            ListItem::new(Line::from(vec![
                Span::styled(format!("{}  ", year), Style::default().fg(Color::DarkGray)),
                Span::raw(truncate(&record.title, 60)),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().fg(Color::Yellow).bold())
        .highlight_symbol("> ");

    let mut list_state = ListState::default();
    list_state.select(Some(state.saved_selected));
    f.render_stateful_widget(list, area, &mut list_state);
}

fn draw_profile_tab(f: &mut Frame, state: &RenderState, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Profile ");

    let mut lines: Vec<Line> = Vec::new();
    match &state.user {
        Some(user) => {
            lines.push(Line::from(vec![
                Span::styled(" Signed in as ", Style::default().fg(Color::DarkGray)),
                Span::styled(user.username.clone(), Style::default().fg(Color::Green).bold()),
            ]));
            if let Some(email) = &user.email {
                lines.push(Line::from(Span::styled(
                    format!(" {}", email),
                    Style::default().fg(Color::DarkGray),
                )));
            }
            lines.push(Line::default());
            lines.push(Line::from(Span::raw(" o  Sign out")));
        }
        None => {
            let text = if state.session_loading {
                " Checking session…"
            } else {
                " Browsing as guest."
            };
            lines.push(Line::from(Span::styled(
                text,
                Style::default().fg(Color::DarkGray),
            )));
            lines.push(Line::default());
            lines.push(Line::from(Span::raw(" i  Sign in")));
            lines.push(Line::from(Span::raw(" u  Create an account")));
        }
    }

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_details_overlay(f: &mut Frame, state: &RenderState, area: Rect) {
    let popup_area = centered_rect(80, 80, area);

    let saved_indicator = if state.save_pending {
        " [s:saving…]"
    } else if state.is_saved {
        " [saved - s:unsave]"
    } else {
        " [s:save]"
    };
    let title = match &state.details {
        Some(details) => format!(" {}{} ", truncate(&details.title, 50), saved_indicator),
        None => String::from(" Details "),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .title_bottom(Line::from(" Esc:close  j/k:scroll ").right_aligned())
        .style(Style::default().bg(Color::Black));

    let mut lines: Vec<Line> = Vec::new();
    match &state.details {
        Some(details) => {
            let mut meta: Vec<Span> = Vec::new();
            meta.push(Span::styled(
                rating_label(details.vote_average),
                Style::default().fg(rating_color(details.vote_average)).bold(),
            ));
            meta.push(Span::styled(
                format!(" ({} votes)", details.vote_count),
                Style::default().fg(Color::DarkGray),
            ));
            if let Some(date) = &details.release_date {
                meta.push(Span::raw(format!("  {}", date)));
            }
            if let Some(runtime) = details.runtime_display() {
                meta.push(Span::raw(format!("  {}", runtime)));
            }
            lines.push(Line::from(meta));

            if !details.genres.is_empty() {
                let genres: Vec<String> =
                    details.genres.iter().map(|g| g.name.clone()).collect();
                lines.push(Line::from(Span::styled(
                    genres.join(" / "),
                    Style::default().fg(Color::Cyan),
                )));
            }
            if let Some(tagline) = &details.tagline {
                if !tagline.is_empty() {
                    lines.push(Line::from(Span::styled(
                        format!("\"{}\"", tagline),
                        Style::default().fg(Color::DarkGray).italic(),
                    )));
                }
            }

            lines.push(Line::default());
            for overview_line in details.overview.lines() {
                lines.push(Line::from(Span::raw(overview_line.to_string())));
            }

            if details.budget > 0 || details.revenue > 0 {
                lines.push(Line::default());
                lines.push(Line::from(Span::styled(
                    format!(
                        "Budget ${}M   Revenue ${}M",
                        details.budget / 1_000_000,
                        details.revenue / 1_000_000
                    ),
                    Style::default().fg(Color::DarkGray),
                )));
            }
        }
        None => {
            let text = match &state.details_error {
                Some(e) => format!("Error: {}", e),
                None if state.details_loading => String::from("Loading…"),
                None => String::new(),
            };
            lines.push(Line::from(Span::styled(
                text,
                Style::default().fg(Color::DarkGray),
            )));
        }
    }

    if !state.trailers.is_empty() {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            "Trailers",
            Style::default().fg(Color::Yellow).bold(),
        )));
        for trailer in &state.trailers {
            lines.push(Line::from(vec![
                Span::raw(format!("  {} - ", trailer.name)),
                Span::styled(trailer.watch_url(), Style::default().fg(Color::Blue)),
            ]));
        }
    }

    if !state.cast.is_empty() {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            "Cast",
            Style::default().fg(Color::Yellow).bold(),
        )));
        for member in &state.cast {
            let role = member
                .character
                .as_deref()
                .map(|c| format!(" as {}", c))
                .unwrap_or_default();
            lines.push(Line::from(Span::raw(format!("  {}{}", member.name, role))));
        }
    } else if state.cast_loading {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            "Loading cast…",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let details = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((state.details_scroll, 0));

    f.render_widget(Clear, popup_area);
    f.render_widget(details, popup_area);
}

fn draw_auth_popup(f: &mut Frame, state: &RenderState, area: Rect) {
    let popup_area = centered_rect(50, 50, area);

    let title = match state.auth_mode {
        AuthMode::SignIn => " Sign In (Tab:next field, Enter:submit, Esc:cancel) ",
        AuthMode::SignUp => " Sign Up (Tab:next field, Enter:submit, Esc:cancel) ",
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .style(Style::default().bg(Color::Black));

    let field = |label: &str, value: &str, focused: bool| {
        let style = if focused {
            Style::default().fg(Color::Yellow).bold()
        } else {
            Style::default()
        };
        let marker = if focused { ">" } else { " " };
        Line::from(Span::styled(format!(" {} {:9} {}", marker, label, value), style))
    };

    let mut lines = vec![
        Line::default(),
        field(
            "Email:",
            &state.auth_email,
            state.auth_field == AuthField::Email,
        ),
        field(
            "Password:",
            &"*".repeat(state.auth_password.len()),
            state.auth_field == AuthField::Password,
        ),
    ];
    if state.auth_mode == AuthMode::SignUp {
        lines.push(field(
            "Username:",
            &state.auth_username,
            state.auth_field == AuthField::Username,
        ));
    }

    lines.push(Line::default());
    if state.auth_submitting {
        lines.push(Line::from(Span::styled(
            " Submitting…",
            Style::default().fg(Color::Yellow),
        )));
    } else if let Some(e) = &state.auth_error {
        lines.push(Line::from(Span::styled(
            format!(" {}", e),
            Style::default().fg(Color::Red),
        )));
    }

    let popup = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(popup, popup_area);
}

fn draw_status_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let status = if state.show_auth {
        " Tab:next field | Enter:submit | Esc:cancel "
    } else if state.details_open {
        " j/k:scroll | s:save/unsave | Esc:close "
    } else if state.input_mode == InputMode::Editing {
        " Enter:search | Esc:stop editing "
    } else {
        match state.active_tab {
            AppTab::Home => " j/k:move | Enter:details | r:refresh | m:more | ?:help | q:quit ",
            AppTab::Search => " /:edit query | j/k:move | Enter:details | m:more | q:quit ",
            AppTab::Saved => " j/k:move | Enter:details | r:refresh | q:quit ",
            AppTab::Profile => " i:sign in | u:sign up | o:sign out | q:quit ",
        }
    };

    let bar = Paragraph::new(status).style(Style::default().fg(Color::DarkGray));
    f.render_widget(bar, area);
}

fn draw_help_popup(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);

    let help_text = r#"
 MARQUEE TUI - Keyboard Shortcuts

 TABS
   1 / 2 / 3 / 4      Home / Search / Saved / Profile

 LISTS
   ↑ / ↓ or k / j     Move selection
   Enter              Open details
   r                  Refresh (Home, Saved)
   m                  Load more results

 SEARCH
   / or e             Edit query
   Enter              Submit
   Esc                Stop editing

 DETAILS
   j / k              Scroll
   s                  Save / unsave movie
   Esc or b           Close

 ACCOUNT (Profile tab)
   i                  Sign in
   u                  Create an account
   o                  Sign out

 GENERAL
   ?                  Toggle this help
   q / Ctrl+C         Quit

 Press any key to close...
"#;

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .style(Style::default().bg(Color::Black));

    let help = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
