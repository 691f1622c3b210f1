// services/panel-dash/src/main.rs
//
// Terminal control panel for simulated IoT node services: browse the
// vertical/platform catalog, select nodes, edit frequency and parameter
// bounds, start/stop telemetry services, watch the live event stream.
//
// Run with: cargo run --bin panel-dash -- --demo

use std::io::stdout;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{prelude::*, widgets::*};

mod api;
mod events;
mod mock;
mod state;

use api::ApiClient;
use events::{EventStream, StreamEvent};
use mock::MockBackend;
use simkit::config::{load_config, BackendConfig};
use simkit::types::ServiceState;
use simkit::units;
use state::{EditTarget, PanelState, Scope};

#[derive(Parser, Debug)]
#[command(name = "panel-dash")]
#[command(about = "Terminal control panel for simulated IoT node services")]
#[command(version = "0.1.0")]
struct Args {
    /// Run in demo mode with a mock catalog (no backend required)
    #[arg(long, short)]
    demo: bool,

    /// Path to the configuration file
    #[arg(long, default_value = "config/panel-dash")]
    config: String,

    /// Catalog API base URL (overrides config)
    #[arg(long)]
    api_url: Option<String>,

    /// Service control base URL (overrides config)
    #[arg(long)]
    services_url: Option<String>,

    /// Refresh interval in milliseconds
    #[arg(long, default_value = "100")]
    refresh_ms: u64,
}

mod colors {
    use ratatui::style::Color;

    pub const ACCENT: Color = Color::Rgb(38, 139, 210);
    pub const RUNNING: Color = Color::Rgb(133, 153, 0);
    pub const STOPPED: Color = Color::Rgb(203, 75, 22);
    pub const TEXT: Color = Color::Rgb(238, 232, 213);
    pub const DIM: Color = Color::Rgb(131, 148, 150);
    pub const WARN: Color = Color::Rgb(181, 137, 0);
    pub const ERROR: Color = Color::Rgb(220, 50, 47);
    pub const BG: Color = Color::Rgb(0, 43, 54);
    pub const PANEL: Color = Color::Rgb(7, 54, 66);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputMode {
    Normal,
    Range,
}

struct App {
    state: PanelState,
    client: Option<ApiClient>,
    mock: Option<MockBackend>,
    stream: Option<EventStream>,
    stream_generation: u64,
    mode: InputMode,
    services_url: String,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut cfg: BackendConfig = load_config(&args.config)?;
    if let Some(url) = &args.api_url {
        cfg.api_url = url.clone();
    }
    if let Some(url) = &args.services_url {
        cfg.services_url = url.clone();
    }

    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = run_app(&mut terminal, args, cfg);

    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, args: Args, cfg: BackendConfig) -> Result<()> {
    let mut app = App {
        state: PanelState::new(),
        client: (!args.demo).then(|| ApiClient::new(&cfg)),
        mock: args.demo.then(MockBackend::new),
        stream: None,
        stream_generation: 0,
        mode: InputMode::Normal,
        services_url: cfg.services_url.clone(),
    };

    if let Some(mock) = &app.mock {
        mock.seed(&mut app.state);
    } else if let Some(client) = &mut app.client {
        app.state
            .add_log("INFO", &format!("Connecting to {}", cfg.api_url));
        client.refresh_catalog(&mut app.state);
    }

    let tick_rate = Duration::from_millis(args.refresh_ms);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|frame| draw_ui(frame, &app))?;

        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && handle_key(&mut app, key.code) {
                    close_stream(&mut app, "panel closed");
                    return Ok(());
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            drain_stream(&mut app);
            if let Some(mock) = &mut app.mock {
                mock.update(&mut app.state);
            }
            last_tick = Instant::now();
        }
    }
}

/// Returns true when the app should quit.
fn handle_key(app: &mut App, code: KeyCode) -> bool {
    if app.state.editing.is_some() {
        match code {
            // Enter commits; Esc leaves edit mode without discarding the
            // typed value. Both run the same commit path.
            KeyCode::Enter | KeyCode::Esc => app.state.commit_edit(),
            KeyCode::Backspace => app.state.edit_pop(),
            KeyCode::Char(c) => app.state.edit_push(c),
            _ => {}
        }
        return false;
    }

    if app.mode == InputMode::Range {
        match code {
            KeyCode::Esc => app.mode = InputMode::Normal,
            KeyCode::Tab => app.state.range_focus_to = !app.state.range_focus_to,
            KeyCode::Backspace => {
                range_buffer(&mut app.state).pop();
            }
            KeyCode::Enter => {
                match app.state.apply_range() {
                    Ok(count) => {
                        let msg = format!("Range applied: {} node(s) selected", count);
                        app.state.add_log("INFO", &msg);
                    }
                    Err(e) => app.state.add_log("ERROR", &e.to_string()),
                }
                app.mode = InputMode::Normal;
                reconcile_stream(app);
            }
            KeyCode::Char(c) if c.is_ascii_digit() => range_buffer(&mut app.state).push(c),
            _ => {}
        }
        return false;
    }

    match code {
        KeyCode::Char('q') | KeyCode::Esc => return true,
        KeyCode::Char('v') => select_next_vertical(app),
        KeyCode::Char('p') => select_next_platform(app),
        KeyCode::Up | KeyCode::Char('k') => app.state.cursor_up(),
        KeyCode::Down | KeyCode::Char('j') => app.state.cursor_down(),
        KeyCode::Char(' ') => {
            if let Some(node) = app.state.cursor_node() {
                let id = node.node_id.clone();
                app.state.toggle_node(&id);
                reconcile_stream(app);
            }
        }
        KeyCode::Char('a') => {
            app.state.select_all();
            reconcile_stream(app);
        }
        KeyCode::Char('c') => {
            app.state.clear_selection();
            reconcile_stream(app);
        }
        KeyCode::Char('r') => {
            app.state.range_from.clear();
            app.state.range_to.clear();
            app.state.range_focus_to = false;
            app.mode = InputMode::Range;
        }
        KeyCode::Tab => app.state.next_param(),
        KeyCode::Char('f') => app.state.begin_edit(EditTarget::Frequency),
        KeyCode::Char('m') => {
            let i = app.state.param_cursor;
            app.state.begin_edit(EditTarget::ParamMin(i));
        }
        KeyCode::Char('M') => {
            let i = app.state.param_cursor;
            app.state.begin_edit(EditTarget::ParamMax(i));
        }
        KeyCode::Char('s') => dispatch(app, ServiceState::Start),
        KeyCode::Char('x') => dispatch(app, ServiceState::Stop),
        KeyCode::Char('g') => {
            // Nothing retries on its own; this is the operator's retry.
            if let Some(client) = &mut app.client {
                client.refresh_catalog(&mut app.state);
            }
        }
        KeyCode::PageUp => app.state.scroll_events_up(),
        KeyCode::PageDown => app.state.scroll_events_down(),
        _ => {}
    }
    false
}

fn range_buffer(state: &mut PanelState) -> &mut String {
    if state.range_focus_to {
        &mut state.range_to
    } else {
        &mut state.range_from
    }
}

fn select_next_vertical(app: &mut App) {
    if app.state.verticals.is_empty() {
        app.state.add_log("WARN", "No verticals loaded");
        return;
    }
    let next = match &app.state.scope {
        Scope::Vertical(id) => {
            let pos = app.state.verticals.iter().position(|v| v.id == *id);
            (pos.map_or(0, |p| p + 1)) % app.state.verticals.len()
        }
        _ => 0,
    };
    let vertical_id = app.state.verticals[next].id;
    if let Some(client) = &mut app.client {
        client.load_vertical_nodes(&mut app.state, vertical_id);
    } else if let Some(mock) = &app.mock {
        let epoch = app.state.set_scope(Scope::Vertical(vertical_id));
        let nodes = mock.nodes_for_vertical(vertical_id);
        app.state.set_nodes(epoch, nodes);
    }
    reconcile_stream(app);
}

fn select_next_platform(app: &mut App) {
    if app.state.platforms.is_empty() {
        app.state.add_log("WARN", "No platforms loaded");
        return;
    }
    let next = match &app.state.scope {
        Scope::Platform(p) => {
            let pos = app.state.platforms.iter().position(|x| x == p);
            (pos.map_or(0, |p| p + 1)) % app.state.platforms.len()
        }
        _ => 0,
    };
    let platform = app.state.platforms[next].clone();
    if let Some(client) = &mut app.client {
        client.load_platform_nodes(&mut app.state, &platform);
    } else if let Some(mock) = &app.mock {
        let epoch = app.state.set_scope(Scope::Platform(platform.clone()));
        let nodes = mock.nodes_for_platform(&platform);
        app.state.set_nodes(epoch, nodes);
    }
    reconcile_stream(app);
}

fn dispatch(app: &mut App, target: ServiceState) {
    if let Some(client) = &mut app.client {
        match target {
            ServiceState::Start => client.start_services(&mut app.state),
            ServiceState::Stop => client.stop_services(&mut app.state),
        }
    } else {
        // Demo mode: same optimistic flip, no wire.
        let ids = app.state.selected_nodes.clone();
        if ids.is_empty() {
            app.state.add_log("WARN", "No nodes selected");
            return;
        }
        app.state.mark_services(&ids, target);
        app.state
            .add_log("INFO", &format!("{} dispatched for {} node(s)", target, ids.len()));
    }
}

/// Keeps the event subscription aligned with the selection: subscribe once
/// nodes are selected, tear down when the selection empties.
fn reconcile_stream(app: &mut App) {
    if app.mock.is_some() {
        return;
    }
    if app.state.selected_nodes.is_empty() {
        close_stream(app, "selection cleared");
    } else if app.stream.is_none() {
        app.stream_generation += 1;
        app.stream = Some(EventStream::subscribe(
            &app.services_url,
            app.stream_generation,
        ));
        app.state.add_log("INFO", "Subscribed to service event stream");
    }
}

fn close_stream(app: &mut App, reason: &str) {
    if let Some(stream) = app.stream.take() {
        let generation = stream.generation;
        stream.close();
        app.state.add_log(
            "INFO",
            &format!("Event stream #{} closed ({})", generation, reason),
        );
    }
}

fn drain_stream(app: &mut App) {
    let mut closed: Option<String> = None;
    if let Some(stream) = &app.stream {
        while let Some(event) = stream.try_next() {
            match event {
                StreamEvent::Line(line) => app.state.push_event(line),
                StreamEvent::Closed(reason) => {
                    closed = Some(reason);
                    break;
                }
            }
        }
    }
    if let Some(reason) = closed {
        // Torn down on error, not retried; the operator reselects to retry.
        app.state
            .add_log("ERROR", &format!("Event stream error: {}", reason));
        if let Some(stream) = app.stream.take() {
            stream.close();
        }
    }
}

// -- Rendering -----------------------------------------------------------

fn draw_ui(frame: &mut Frame, app: &App) {
    let area = frame.area();
    frame.render_widget(
        Block::default().style(Style::default().bg(colors::BG)),
        area,
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(12),
            Constraint::Length(3),
        ])
        .split(area);

    draw_header(frame, chunks[0], app);
    draw_main(frame, chunks[1], app);
    draw_footer(frame, chunks[2], app);
}

fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let (mode_text, mode_color) = if app.mock.is_some() {
        ("DEMO", colors::WARN)
    } else if let Some(client) = &app.client {
        if client.is_connected() {
            ("LIVE", colors::RUNNING)
        } else {
            ("DISCONNECTED", colors::ERROR)
        }
    } else {
        ("LIVE", colors::DIM)
    };
    let last_error = app
        .client
        .as_ref()
        .filter(|c| !c.is_connected())
        .and_then(|c| c.last_error())
        .unwrap_or("");

    let scope_text = match &app.state.scope {
        Scope::None => "no scope".to_string(),
        Scope::Vertical(id) => app
            .state
            .verticals
            .iter()
            .find(|v| v.id == *id)
            .map(|v| format!("vertical {}", v.name))
            .unwrap_or_else(|| format!("vertical #{}", id)),
        Scope::Platform(p) => format!("platform {}", p),
    };

    let running = app
        .state
        .nodes
        .iter()
        .filter(|n| n.status.is_running())
        .count();

    let title = Line::from(vec![
        Span::styled(
            " NODE SIMULATOR ",
            Style::default().fg(colors::BG).bg(colors::ACCENT).bold(),
        ),
        Span::raw("  "),
        Span::styled("CONTROL PANEL", Style::default().fg(colors::TEXT).bold()),
        Span::raw("  "),
        Span::styled(format!("[{}]", mode_text), Style::default().fg(mode_color).bold()),
        Span::raw("  "),
        Span::styled(scope_text, Style::default().fg(colors::DIM)),
        Span::raw("  "),
        Span::styled(
            format!(
                "selected {}/{}",
                app.state.selected_nodes.len(),
                app.state.nodes.len()
            ),
            Style::default().fg(colors::TEXT),
        ),
        Span::raw("  "),
        Span::styled(
            format!("running {}", running),
            Style::default().fg(if running > 0 {
                colors::RUNNING
            } else {
                colors::DIM
            }),
        ),
        Span::raw("  "),
        Span::styled(last_error.to_string(), Style::default().fg(colors::ERROR)),
    ]);

    let header = Paragraph::new(title).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(colors::ACCENT)),
    );
    frame.render_widget(header, area);
}

fn draw_main(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(22),
            Constraint::Min(46),
            Constraint::Length(44),
        ])
        .split(area);

    draw_catalog(frame, chunks[0], app);

    let center = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(10)])
        .split(chunks[1]);
    draw_nodes(frame, center[0], app);
    draw_detail(frame, center[1], app);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(35),
            Constraint::Min(6),
            Constraint::Length(8),
        ])
        .split(chunks[2]);
    draw_status_table(frame, right[0], app);
    draw_terminal(frame, right[1], app);
    draw_activity(frame, right[2], app);
}

fn panel_block(title: &str) -> Block<'_> {
    Block::default()
        .title(Span::styled(
            format!(" {} ", title),
            Style::default().fg(colors::TEXT).bold(),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::DIM))
        .border_type(BorderType::Rounded)
        .style(Style::default().bg(colors::PANEL))
}

fn draw_catalog(frame: &mut Frame, area: Rect, app: &App) {
    let mut lines: Vec<Line> = vec![Line::from(Span::styled(
        "Verticals [v]",
        Style::default().fg(colors::ACCENT).bold(),
    ))];
    for vertical in &app.state.verticals {
        let active = matches!(&app.state.scope, Scope::Vertical(id) if *id == vertical.id);
        lines.push(catalog_line(&vertical.name, active));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Platforms [p]",
        Style::default().fg(colors::ACCENT).bold(),
    )));
    for platform in &app.state.platforms {
        let active = matches!(&app.state.scope, Scope::Platform(p) if p == platform);
        lines.push(catalog_line(platform, active));
    }

    if app.mode == InputMode::Range {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Range select",
            Style::default().fg(colors::ACCENT).bold(),
        )));
        let from_style = if app.state.range_focus_to {
            Style::default().fg(colors::TEXT)
        } else {
            Style::default().fg(colors::BG).bg(colors::WARN)
        };
        let to_style = if app.state.range_focus_to {
            Style::default().fg(colors::BG).bg(colors::WARN)
        } else {
            Style::default().fg(colors::TEXT)
        };
        lines.push(Line::from(vec![
            Span::raw(" from "),
            Span::styled(format!("[{:<4}]", app.state.range_from), from_style),
            Span::raw(" to "),
            Span::styled(format!("[{:<4}]", app.state.range_to), to_style),
        ]));
    }

    let paragraph = Paragraph::new(lines).block(panel_block("CATALOG"));
    frame.render_widget(paragraph, area);
}

fn catalog_line(name: &str, active: bool) -> Line<'_> {
    if active {
        Line::from(vec![
            Span::styled("» ", Style::default().fg(colors::WARN)),
            Span::styled(name.to_string(), Style::default().fg(colors::TEXT).bold()),
        ])
    } else {
        Line::from(vec![
            Span::raw("  "),
            Span::styled(name.to_string(), Style::default().fg(colors::DIM)),
        ])
    }
}

fn draw_nodes(frame: &mut Frame, area: Rect, app: &App) {
    let rows: Vec<Row> = app
        .state
        .nodes
        .iter()
        .enumerate()
        .map(|(i, node)| {
            let marker = if app.state.is_selected(&node.node_id) {
                "[x]"
            } else {
                "[ ]"
            };
            let status_style = if node.status.is_running() {
                Style::default().fg(colors::RUNNING)
            } else {
                Style::default().fg(colors::STOPPED)
            };
            let base = if i == app.state.cursor {
                Style::default().bg(colors::BG)
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(Span::styled(format!("#{}", i + 1), Style::default().fg(colors::DIM))),
                Cell::from(Span::styled(marker, Style::default().fg(colors::WARN))),
                Cell::from(Span::styled(
                    node.node_id.clone(),
                    Style::default().fg(colors::TEXT),
                )),
                Cell::from(Span::styled(
                    units::seconds_to_hms(node.frequency),
                    Style::default().fg(colors::DIM),
                )),
                Cell::from(Span::styled(
                    node.platform.clone(),
                    Style::default().fg(colors::DIM),
                )),
                Cell::from(Span::styled(
                    node.protocol.clone(),
                    Style::default().fg(colors::DIM),
                )),
                Cell::from(Span::styled(node.status.to_string(), status_style)),
            ])
            .style(base)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Min(10),
            Constraint::Length(9),
            Constraint::Length(8),
            Constraint::Length(6),
            Constraint::Length(6),
        ],
    )
    .header(
        Row::new(vec![
            Cell::from(Span::styled("#", Style::default().fg(colors::ACCENT).bold())),
            Cell::from(Span::styled("SEL", Style::default().fg(colors::ACCENT).bold())),
            Cell::from(Span::styled("NODE ID", Style::default().fg(colors::ACCENT).bold())),
            Cell::from(Span::styled("FREQ", Style::default().fg(colors::ACCENT).bold())),
            Cell::from(Span::styled("PLATFORM", Style::default().fg(colors::ACCENT).bold())),
            Cell::from(Span::styled("PROTO", Style::default().fg(colors::ACCENT).bold())),
            Cell::from(Span::styled("STATE", Style::default().fg(colors::ACCENT).bold())),
        ])
        .bottom_margin(1),
    )
    .block(panel_block("NODES"));

    frame.render_widget(table, area);
}

fn draw_detail(frame: &mut Frame, area: Rect, app: &App) {
    let mut lines: Vec<Line> = Vec::new();

    if let Some(node) = app.state.cursor_node() {
        let freq_editing = matches!(
            &app.state.editing,
            Some(edit) if edit.target == EditTarget::Frequency
        );
        let freq_text = if freq_editing {
            format!("{}_", app.state.editing.as_ref().map(|e| e.buffer.as_str()).unwrap_or(""))
        } else {
            units::seconds_to_hms(node.frequency)
        };
        lines.push(Line::from(vec![
            Span::styled("Frequency [f]: ", Style::default().fg(colors::DIM)),
            Span::styled(
                freq_text,
                if freq_editing {
                    Style::default().fg(colors::BG).bg(colors::WARN)
                } else {
                    Style::default().fg(colors::TEXT)
                },
            ),
            Span::raw("   "),
            Span::styled(
                node.vertical_name.clone().unwrap_or_default(),
                Style::default().fg(colors::DIM),
            ),
        ]));
        lines.push(Line::from(""));

        for (i, param) in node.parameters.iter().enumerate() {
            let focused = i == app.state.param_cursor;
            let editing_min = matches!(
                &app.state.editing,
                Some(edit) if edit.target == EditTarget::ParamMin(i)
            );
            let editing_max = matches!(
                &app.state.editing,
                Some(edit) if edit.target == EditTarget::ParamMax(i)
            );
            let buffer = app
                .state
                .editing
                .as_ref()
                .map(|e| e.buffer.clone())
                .unwrap_or_default();

            let min_text = if editing_min {
                format!("{}_", buffer)
            } else {
                format!("{}", param.min_value)
            };
            let max_text = if editing_max {
                format!("{}_", buffer)
            } else {
                format!("{}", param.max_value)
            };

            lines.push(Line::from(vec![
                Span::styled(
                    if focused { "» " } else { "  " },
                    Style::default().fg(colors::WARN),
                ),
                Span::styled(
                    format!("{:<12}", param.name),
                    Style::default().fg(colors::TEXT),
                ),
                Span::styled("min [m]: ", Style::default().fg(colors::DIM)),
                Span::styled(
                    format!("{:<10}", min_text),
                    if editing_min {
                        Style::default().fg(colors::BG).bg(colors::WARN)
                    } else {
                        Style::default().fg(colors::TEXT)
                    },
                ),
                Span::styled("max [M]: ", Style::default().fg(colors::DIM)),
                Span::styled(
                    format!("{:<10}", max_text),
                    if editing_max {
                        Style::default().fg(colors::BG).bg(colors::WARN)
                    } else {
                        Style::default().fg(colors::TEXT)
                    },
                ),
            ]));
        }
        if node.parameters.is_empty() {
            lines.push(Line::from(Span::styled(
                "No parameters for this node",
                Style::default().fg(colors::DIM),
            )));
        }
    } else {
        lines.push(Line::from(Span::styled(
            "Select a vertical [v] or platform [p] to load nodes",
            Style::default().fg(colors::DIM),
        )));
    }

    let paragraph = Paragraph::new(lines).block(panel_block("NODE DETAIL"));
    frame.render_widget(paragraph, area);
}

fn draw_status_table(frame: &mut Frame, area: Rect, app: &App) {
    let rows: Vec<Row> = app
        .state
        .status_rows
        .iter()
        .map(|node| {
            let (dot, style) = if node.services.is_running() {
                ("●", Style::default().fg(colors::RUNNING))
            } else {
                ("●", Style::default().fg(colors::STOPPED))
            };
            Row::new(vec![
                Cell::from(Span::styled(
                    node.node_id.clone(),
                    Style::default().fg(colors::TEXT),
                )),
                Cell::from(Line::from(vec![
                    Span::styled(dot, style),
                    Span::raw(" "),
                    Span::styled(node.services.to_string(), style),
                ])),
            ])
        })
        .collect();

    let table = Table::new(rows, [Constraint::Min(10), Constraint::Length(9)])
        .header(
            Row::new(vec![
                Cell::from(Span::styled(
                    "NODE ID",
                    Style::default().fg(colors::ACCENT).bold(),
                )),
                Cell::from(Span::styled(
                    "SERVICES",
                    Style::default().fg(colors::ACCENT).bold(),
                )),
            ])
            .bottom_margin(1),
        )
        .block(panel_block("ALL NODES"));

    frame.render_widget(table, area);
}

fn draw_terminal(frame: &mut Frame, area: Rect, app: &App) {
    let visible = area.height.saturating_sub(2) as usize;
    let end = app.state.events.len().saturating_sub(app.state.event_scroll);
    let start = end.saturating_sub(visible);
    let lines: Vec<Line> = app.state.events[start..end]
        .iter()
        .map(|line| Line::from(Span::styled(line.clone(), Style::default().fg(colors::TEXT))))
        .collect();

    let paragraph = Paragraph::new(lines)
        .block(panel_block("TERMINAL"))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn draw_activity(frame: &mut Frame, area: Rect, app: &App) {
    let visible = area.height.saturating_sub(2) as usize;
    let lines: Vec<Line> = app
        .state
        .activity_log
        .iter()
        .rev()
        .take(visible)
        .map(|entry| {
            let (prefix, color) = match entry.level.as_str() {
                "ERROR" => ("[ERR]", colors::ERROR),
                "WARN" => ("[WRN]", colors::WARN),
                _ => ("[INF]", colors::RUNNING),
            };
            Line::from(vec![
                Span::styled(
                    format!("{} ", entry.timestamp.format("%H:%M:%S")),
                    Style::default().fg(colors::DIM),
                ),
                Span::styled(format!("{} ", prefix), Style::default().fg(color)),
                Span::styled(entry.message.clone(), Style::default().fg(colors::TEXT)),
            ])
        })
        .collect();

    let paragraph = Paragraph::new(lines)
        .block(panel_block("ACTIVITY"))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn draw_footer(frame: &mut Frame, area: Rect, app: &App) {
    let help = if app.state.editing.is_some() {
        Line::from(vec![
            key_span(" ENTER/ESC "),
            label_span(" commit "),
            key_span(" BKSP "),
            label_span(" erase "),
        ])
    } else if app.mode == InputMode::Range {
        Line::from(vec![
            key_span(" 0-9 "),
            label_span(" digits "),
            key_span(" TAB "),
            label_span(" from/to "),
            key_span(" ENTER "),
            label_span(" apply "),
            key_span(" ESC "),
            label_span(" cancel "),
        ])
    } else {
        Line::from(vec![
            key_span(" Q "),
            label_span(" quit "),
            key_span(" V/P "),
            label_span(" scope "),
            key_span(" SPC/A/C/R "),
            label_span(" select "),
            key_span(" F/M/TAB "),
            label_span(" edit "),
            key_span(" S/X "),
            label_span(" start/stop "),
            key_span(" G "),
            label_span(" refresh "),
            key_span(" PGUP/PGDN "),
            label_span(" scroll "),
        ])
    };

    let footer = Paragraph::new(help).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(colors::ACCENT)),
    );
    frame.render_widget(footer, area);
}

fn key_span(text: &str) -> Span<'_> {
    Span::styled(text.to_string(), Style::default().fg(colors::BG).bg(colors::DIM))
}

fn label_span(text: &str) -> Span<'_> {
    Span::styled(text.to_string(), Style::default().fg(colors::DIM))
}
