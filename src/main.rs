//! Shiptrack - actor-based shipment tracker
//!
//! Architecture:
//! - UI Layer (Ratatui) - synchronous terminal rendering
//! - App Layer - central state machine processing events
//! - Network Layer (Tokio) - async calls to the hosted backend

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::*, widgets::*};
use tokio::sync::mpsc;

use shiptrack_tui::app::form::{CredentialField, CredentialsForm, ShipmentForm};
use shiptrack_tui::app::state::{ShipmentsView, View};
use shiptrack_tui::app::AppActor;
use shiptrack_tui::config::Config;
use shiptrack_tui::constants::{APP_NAME, APP_VERSION, LOG_FILE_NAME};
use shiptrack_tui::messages::ui_events::{key_to_ui_event, Screen};
use shiptrack_tui::messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};
use shiptrack_tui::models::ShipmentField;
use shiptrack_tui::network::{NetworkActor, SupabaseClient};
use shiptrack_tui::ui::{centered_rect, cursor_column, detail_lines, render_input, render_shipment_table};

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
    let file_appender = tracing_appender::rolling::never(".", LOG_FILE_NAME);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();

    // Fail before touching the terminal so the message stays readable
    let config = Config::load().context("loading backend configuration")?;
    tracing::info!(url = %config.supabase_url, table = %config.table, "Starting {}", APP_NAME);

    // Terminal setup
    enable_raw_mode().context("enabling raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let _terminal_guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create channels
    let (ui_tx, ui_rx) = mpsc::unbounded_channel::<UiEvent>();
    let (net_cmd_tx, net_cmd_rx) = mpsc::unbounded_channel::<NetworkCommand>();
    let (net_resp_tx, net_resp_rx) = mpsc::unbounded_channel::<NetworkResponse>();
    let (render_tx, mut render_rx) = mpsc::unbounded_channel::<RenderState>();

    // Spawn network actor
    let network_actor = NetworkActor::new(Arc::new(SupabaseClient::new(&config)), net_resp_tx);
    tokio::spawn(network_actor.run(net_cmd_rx));

    // Spawn app actor
    let app_actor = AppActor::new(net_cmd_tx, render_tx);
    tokio::spawn(app_actor.run(ui_rx, net_resp_rx));

    // Run UI loop (synchronous with async polling)
    run_ui_loop(&mut terminal, ui_tx, &mut render_rx).await?;

    tracing::info!("Exiting");
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
                if let Some(event) =
                    key_to_ui_event(key, current_state.screen(), current_state.show_help)
                {
                    let quit = matches!(event, UiEvent::Quit);
                    let _ = ui_tx.send(event);
                    if quit {
                        break;
                    }
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

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title bar
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    draw_title_bar(f, state, main_chunks[0]);

    match &state.view {
        View::Home => draw_home(f, main_chunks[1]),
        View::Login(form) => draw_credentials(f, state, form, "Log In", main_chunks[1]),
        View::Signup(form) => draw_credentials(f, state, form, "Sign Up", main_chunks[1]),
        View::Shipments(sv) => draw_shipments(f, state, sv, main_chunks[1]),
        View::AddShipment(form) => draw_add_shipment(f, state, form, main_chunks[1]),
    }

    draw_status_bar(f, state, main_chunks[2]);

    if let View::Shipments(ShipmentsView {
        modal: Some(modal), ..
    }) = &state.view
    {
        draw_edit_modal(f, state, &modal.form, area);
    }

    if state.show_help {
        draw_help_popup(f, area);
    }
}

fn draw_title_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let mut spans = vec![Span::styled(
        format!(" {} ", APP_NAME),
        Style::default().fg(Color::Black).bg(Color::Cyan).bold(),
    )];
    if state.is_loading {
        spans.push(Span::styled(" [...]", Style::default().fg(Color::Yellow)));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_home(f: &mut Frame, area: Rect) {
    let popup = centered_rect(50, 40, area);
    let text = vec![
        Line::from(Span::styled(
            "Welcome to the Shipment App",
            Style::default().bold(),
        )),
        Line::from(""),
        Line::from("l  Log In"),
        Line::from("s  Sign Up"),
        Line::from("q  Quit"),
        Line::from(""),
        Line::from(Span::styled(
            format!("v{}", APP_VERSION),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let home = Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(home, popup);
}

/// Inline error line under the active form
fn error_line(state: &RenderState) -> Paragraph<'_> {
    Paragraph::new(state.error.as_str())
        .style(Style::default().fg(Color::Red))
        .wrap(Wrap { trim: false })
}

fn draw_credentials(f: &mut Frame, state: &RenderState, form: &CredentialsForm, title: &str, area: Rect) {
    let popup = centered_rect(60, 60, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", title))
        .title_bottom(Line::from(" Esc: back to home ").right_aligned());
    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
        ])
        .split(inner);

    let email_focused = form.focus == CredentialField::Email;
    f.render_widget(render_input(&form.email, "Email", email_focused, false), chunks[0]);
    f.render_widget(render_input(&form.password, "Password", !email_focused, true), chunks[1]);
    f.render_widget(error_line(state), chunks[2]);

    let (field_area, content) = if email_focused {
        (chunks[0], form.email.as_str())
    } else {
        (chunks[1], form.password.as_str())
    };
    place_cursor(f, field_area, cursor_column(content, form.cursor));
}

/// Four stacked inputs for a shipment form; returns the area left below them
fn draw_shipment_fields(f: &mut Frame, form: &ShipmentForm, area: Rect) -> Rect {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
        ])
        .split(area);

    for (i, field) in ShipmentField::ALL.iter().enumerate() {
        let focused = form.focus == *field;
        let content = form.draft.get(*field);
        f.render_widget(render_input(content, field.label(), focused, false), chunks[i]);
        if focused {
            place_cursor(f, chunks[i], cursor_column(content, form.cursor));
        }
    }

    chunks[4]
}

fn draw_add_shipment(f: &mut Frame, state: &RenderState, form: &ShipmentForm, area: Rect) {
    let popup = centered_rect(70, 80, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Add Shipment ")
        .title_bottom(Line::from(" Enter: add | Esc: back to shipments ").right_aligned());
    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let rest = draw_shipment_fields(f, form, inner);
    f.render_widget(error_line(state), rest);
}

fn draw_shipments(f: &mut Frame, state: &RenderState, sv: &ShipmentsView, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let fetched = state
        .last_fetched
        .map(|t| format!(" (fetched {}) ", t.with_timezone(&chrono::Local).format("%H:%M:%S")))
        .unwrap_or_default();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" Shipments [{}]{}", state.shipments.len(), fetched));

    if state.shipments.is_empty() {
        let empty = Paragraph::new("No shipments yet. Press 'a' to add one.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(empty, chunks[0]);
    } else {
        let table = render_shipment_table(&state.shipments, sv.modal.is_none()).block(block);
        let mut table_state = TableState::default();
        table_state.select(Some(sv.highlighted));
        f.render_stateful_widget(table, chunks[0], &mut table_state);
    }

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(6), Constraint::Length(4)])
        .split(chunks[1]);

    let details_block = Block::default()
        .borders(Borders::ALL)
        .title(" Shipment Details ");
    let details = match &state.selected {
        Some(shipment) => {
            let mut lines = detail_lines(&shipment.fields);
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "E: edit",
                Style::default().fg(Color::DarkGray),
            )));
            Paragraph::new(lines)
        }
        None => Paragraph::new("Press Enter on a row to see its details.")
            .style(Style::default().fg(Color::DarkGray)),
    };
    f.render_widget(details.block(details_block).wrap(Wrap { trim: false }), right[0]);

    f.render_widget(
        error_line(state).block(Block::default().borders(Borders::ALL).title(" Messages ")),
        right[1],
    );
}

fn draw_edit_modal(f: &mut Frame, state: &RenderState, form: &ShipmentForm, area: Rect) {
    let popup = centered_rect(60, 70, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Edit Shipment ")
        .title_bottom(Line::from(" Enter: save changes | Esc: close ").right_aligned())
        .style(Style::default().bg(Color::Black));
    let inner = block.inner(popup);

    f.render_widget(Clear, popup);
    f.render_widget(block, popup);

    let rest = draw_shipment_fields(f, form, inner);
    f.render_widget(error_line(state), rest);
}

fn place_cursor(f: &mut Frame, field_area: Rect, column: u16) {
    let max_x = field_area.x + field_area.width.saturating_sub(2);
    let cursor_x = (field_area.x + column + 1).min(max_x);
    f.set_cursor_position(Position::new(cursor_x, field_area.y + 1));
}

fn draw_status_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let status = if state.is_loading {
        " Loading... "
    } else {
        match state.screen() {
            Screen::Home => " l:log in | s:sign up | ?:help | q:quit ",
            Screen::Shipments => {
                " ↑/↓:move | Enter:details | e:edit | a:add | r:refresh | o:logout | q:quit "
            }
            _ => " Tab:next field | Enter:submit | Esc:back | Ctrl+C:quit ",
        }
    };

    let bar = Paragraph::new(status).style(Style::default().fg(Color::DarkGray));
    f.render_widget(bar, area);
}

fn draw_help_popup(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);

    let help_text = r#"
 SHIPTRACK - Keyboard Shortcuts

 HOME
   l                  Log in
   s                  Sign up

 FORMS
   Tab / ↓            Next field
   Shift+Tab / ↑      Previous field
   ← / →              Move cursor
   Enter              Submit
   Esc                Back

 SHIPMENTS
   ↑ / ↓              Move highlight
   Enter              Show details
   e                  Edit highlighted row
   E                  Edit shipment in detail panel
   a                  Add shipment
   r                  Refresh list
   o                  Log out

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
