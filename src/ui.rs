use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use interpretations::views::{FormField, FormState, LOADING_RECORDS, NO_RECORDS};
use interpretations::{App, InterpretationApi, ListDisplay, ListView, Route, Screen};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
    Frame, Terminal,
};
use std::io;

pub fn run_ui<A: InterpretationApi>(app: &mut App<A>) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    loop_outcome(res)
}

/// Surface a terminal loop failure to the caller once the screen is restored.
fn loop_outcome(res: io::Result<()>) -> Result<()> {
    res.map_err(|err| {
        tracing::error!(error = %err, "terminal loop failed");
        anyhow::Error::from(err).context("Terminal UI failed")
    })
}

/// Redraw, then either run one queued request or wait for one key.
/// Drawing before each request is what makes the loading and
/// submitting states visible.
fn run_app<B: ratatui::backend::Backend, A: InterpretationApi>(
    terminal: &mut Terminal<B>,
    app: &mut App<A>,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if app.should_quit {
            return Ok(());
        }

        if app.run_pending() {
            continue;
        }

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                handle_key(app, key);
            }
        }
    }
}

fn handle_key<A: InterpretationApi>(app: &mut App<A>, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match app.route() {
        Route::List => match key.code {
            KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
            KeyCode::Down | KeyCode::Char('j') => app.select_next(),
            KeyCode::Up | KeyCode::Char('k') => app.select_previous(),
            KeyCode::Char('n') | KeyCode::Char('a') => app.open_create(),
            KeyCode::Enter | KeyCode::Char('e') => app.edit_selected(),
            KeyCode::Delete | KeyCode::Char('d') => app.delete_selected(),
            KeyCode::Char('r') => app.reload(),
            _ => {}
        },
        Route::Create | Route::Edit(_) => match key.code {
            KeyCode::Esc => app.back_to_list(),
            KeyCode::Tab | KeyCode::BackTab => app.focus_next(),
            KeyCode::Enter => app.submit(),
            KeyCode::Backspace => app.backspace(),
            KeyCode::Char(c) => app.input_char(c),
            _ => {}
        },
    }
}

fn ui<A: InterpretationApi>(f: &mut Frame, app: &App<A>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with navigation
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    match app.screen() {
        Screen::List(view) => render_list(f, chunks[1], view),
        Screen::Create(view) => render_form(
            f,
            chunks[1],
            Route::Create.title(),
            &view.form,
            view.submit_label(),
        ),
        Screen::Edit(view) => render_form(
            f,
            chunks[1],
            &format!("{} ({})", Route::Edit(view.id().to_string()).title(), view.id()),
            &view.form,
            view.submit_label(),
        ),
    }

    render_status_bar(f, chunks[2], app);
}

fn render_header<A: InterpretationApi>(f: &mut Frame, area: Rect, app: &App<A>) {
    let current = app.route();
    let pages = [
        (matches!(current, Route::List), "Interpretations"),
        (matches!(current, Route::Create), "Add"),
        (matches!(current, Route::Edit(_)), "Edit"),
    ];

    let mut tab_spans = vec![];
    for (i, (active, name)) in pages.iter().enumerate() {
        if i > 0 {
            tab_spans.push(Span::raw(" │ "));
        }

        let style = if *active {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        tab_spans.push(Span::styled(*name, style));
    }

    if let Screen::List(view) = app.screen() {
        tab_spans.push(Span::raw("  |  "));
        tab_spans.push(Span::styled(
            format!("Total: {}", view.records().len()),
            Style::default().fg(Color::White),
        ));
    }

    let header = Paragraph::new(vec![Line::from(tab_spans)])
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)));

    f.render_widget(header, area);
}

fn error_line(message: &str) -> Paragraph<'_> {
    Paragraph::new(Line::from(Span::styled(
        format!(" {}", message),
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
    )))
}

fn render_list(f: &mut Frame, area: Rect, view: &ListView) {
    // Errors sit above the list and do not replace it
    let body_area = match view.error() {
        Some(message) => {
            let parts = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(1), Constraint::Min(0)])
                .split(area);
            f.render_widget(error_line(message), parts[0]);
            parts[1]
        }
        None => area,
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White))
        .title(format!(" {} ", Route::List.title()));

    let rows = match view.display() {
        ListDisplay::Loading => {
            f.render_widget(Paragraph::new(LOADING_RECORDS).block(block), body_area);
            return;
        }
        ListDisplay::Empty => {
            f.render_widget(
                Paragraph::new(NO_RECORDS)
                    .style(Style::default().fg(Color::DarkGray))
                    .block(block),
                body_area,
            );
            return;
        }
        ListDisplay::Rows(rows) => rows,
    };

    let header_cells = ["Term", "Interpretation"].iter().map(|h| {
        Cell::from(*h).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    });
    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let term_width = 28;
    let text_width = (body_area.width as usize).saturating_sub(term_width + 8).max(10);

    let table_rows = rows.iter().map(|record| {
        let (term_style, suffix) = if view.is_deleting(&record.id) {
            (Style::default().fg(Color::DarkGray), " (deleting)")
        } else {
            (Style::default().add_modifier(Modifier::BOLD), "")
        };

        Row::new(vec![
            Cell::from(format!("{}{}", truncate(&record.term, term_width - 2), suffix))
                .style(term_style),
            Cell::from(truncate(&record.interpretation, text_width)),
        ])
        .height(1)
    });

    let table = Table::new(
        table_rows,
        [Constraint::Length(term_width as u16), Constraint::Min(10)],
    )
    .header(header)
    .block(block)
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    let mut state = TableState::default();
    state.select(view.selected());
    f.render_stateful_widget(table, body_area, &mut state);
}

fn render_form(f: &mut Frame, area: Rect, title: &str, form: &FormState, submit_label: &str) {
    let outer = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White))
        .title(format!(" {} ", title));
    let inner = outer.inner(area);
    f.render_widget(outer, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Term
            Constraint::Length(6), // Interpretation
            Constraint::Length(3), // Submit
            Constraint::Min(0),    // Error
        ])
        .split(inner);

    for (field, chunk) in [(FormField::Term, chunks[0]), (FormField::Interpretation, chunks[1])] {
        let focused = form.focus() == field;
        let value = form.value(field);

        let (text, text_style) = if value.is_empty() && !focused {
            (field.label().to_string(), Style::default().fg(Color::DarkGray))
        } else if focused {
            (format!("{}▏", value), Style::default().fg(Color::White))
        } else {
            (value.to_string(), Style::default().fg(Color::White))
        };

        let input = Paragraph::new(text)
            .style(text_style)
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(if focused { Color::Yellow } else { Color::DarkGray }))
                    .title(format!(" {} ", field.label())),
            );
        f.render_widget(input, chunk);
    }

    let button_style = if form.is_submitting() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
            .fg(Color::Black)
            .bg(Color::White)
            .add_modifier(Modifier::BOLD)
    };
    let button = Paragraph::new(Line::from(Span::styled(format!("  {}  ", submit_label), button_style)))
        .block(Block::default().borders(Borders::NONE));
    f.render_widget(button, chunks[2]);

    if let Some(message) = form.error() {
        f.render_widget(error_line(message), chunks[3]);
    }
}

fn render_status_bar<A: InterpretationApi>(f: &mut Frame, area: Rect, app: &App<A>) {
    let key = |k: &'static str| Span::styled(k, Style::default().fg(Color::Yellow));

    let mut status_spans = vec![];

    if app.has_pending() {
        status_spans.push(Span::styled(" Working... ", Style::default().fg(Color::Cyan)));
        status_spans.push(Span::raw("| "));
    }

    match app.screen() {
        Screen::List(view) => {
            let selected = view.selected().map(|i| i + 1).unwrap_or(0);
            status_spans.push(Span::styled(
                format!(" Row: {}/{} ", selected, view.records().len()),
                Style::default().fg(Color::Cyan),
            ));
            status_spans.push(Span::raw(" | "));
            status_spans.extend([
                key("n"),
                Span::raw(" New | "),
                key("Enter"),
                Span::raw(" Edit | "),
                key("d"),
                Span::raw(" Delete | "),
                key("r"),
                Span::raw(" Reload | "),
                key("↑/↓"),
                Span::raw(" Nav | "),
                key("q"),
                Span::raw(" Quit"),
            ]);
        }
        Screen::Create(_) | Screen::Edit(_) => {
            status_spans.extend([
                key(" Tab"),
                Span::raw(" Next field | "),
                key("Enter"),
                Span::raw(" Submit | "),
                key("Esc"),
                Span::raw(" Back to list | "),
                key("Ctrl+C"),
                Span::raw(" Quit"),
            ]);
        }
    }

    let status = Paragraph::new(Line::from(status_spans))
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::DarkGray)));

    f.render_widget(status, area);
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loop_failure_is_reported() {
        assert!(loop_outcome(Ok(())).is_ok());

        let err = loop_outcome(Err(io::Error::new(io::ErrorKind::BrokenPipe, "stdout closed")))
            .unwrap_err();
        assert_eq!(err.to_string(), "Terminal UI failed");
        assert!(format!("{:#}", err).contains("stdout closed"));
    }

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 8), "abcde...");
        assert_eq!(truncate("ééééééé", 5), "éé...");
    }
}
