//! Collapsible outline viewer
//!
//! Terminal host for `collapse-core`: loads a stored note, shows the elements that are
//! currently rendered, and turns key presses into the clicks and commands a rich-text editor
//! would send. Every change is written back to the note immediately.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p collapse-tui -- note.json
//! cargo run -p collapse-tui -- note.json --config collapse.yaml --dry-run
//! cargo run -p collapse-tui -- note.json --print-css
//! ```
//!
//! # Keys
//!
//! - Up/Down, k/j: move the selection
//! - PageUp/PageDown, Home/End: jump
//! - Enter/Space: click the toggle of the selected element
//! - c: make the selected heading collapsible (or not)
//! - r: repair orphaned sections
//! - q/Esc: quit

mod host;

use clap::Parser;
use collapse_core::{
    CollapseConfig, CollapseStateManager, Command, CommandResult, DocPosition, ElementKind, Host,
    Marker, NodeId, Point, Rect as PageRect, Stylesheet, ToolbarButton, UnhandledKind,
};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use host::{CELL_HEIGHT, CELL_WIDTH, TuiHost};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use std::{
    io::{self, stdout},
    path::PathBuf,
    time::Duration,
};

/// Terminal columns per indentation level.
const INDENT_COLUMNS: usize = 2;

#[derive(Debug, Parser)]
#[command(name = "collapse-tui", version, about = "Browse and fold a stored note")]
struct Args {
    /// Stored note (JSON).
    document: PathBuf,

    /// YAML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Count saves without writing the note back.
    #[arg(long)]
    dry_run: bool,

    /// Print the host stylesheet for the configuration and exit.
    #[arg(long)]
    print_css: bool,

    /// Selector that scopes the printed stylesheet.
    #[arg(long, default_value = ".note-detail-editable-text")]
    scope: String,
}

/// One displayed element.
struct Row {
    id: NodeId,
    column: usize,
    glyph: &'static str,
    text: String,
    heading: bool,
    orphan: bool,
}

impl Row {
    fn width(&self) -> usize {
        self.glyph.chars().count() + self.text.chars().count()
    }
}

fn shows_as_line(kind: &ElementKind) -> bool {
    matches!(
        kind,
        ElementKind::Heading(_)
            | ElementKind::Paragraph
            | ElementKind::Image
            | ElementKind::Unhandled(_)
    )
}

fn opaque_label(kind: UnhandledKind) -> &'static str {
    match kind {
        UnhandledKind::HorizontalLine => "────────",
        UnhandledKind::IncludeNote => "[included note]",
        UnhandledKind::Mermaid => "[diagram]",
        UnhandledKind::CodeBlock => "[code block]",
        UnhandledKind::Table => "[table]",
        UnhandledKind::PageBreak => "[page break]",
    }
}

/// Application state
struct App {
    manager: CollapseStateManager<TuiHost>,
    file_path: PathBuf,
    rows: Vec<Row>,
    selected: usize,
    scroll_top: usize,
    should_quit: bool,
    status_message: String,
}

impl App {
    fn new(args: &Args, config: CollapseConfig) -> io::Result<Self> {
        let document =
            collapse_core_json::load_from_path(&args.document).map_err(io::Error::other)?;
        let host = TuiHost::new(args.document.clone(), !args.dry_run);
        let mut app = Self {
            manager: CollapseStateManager::new(document, config, host),
            file_path: args.document.clone(),
            rows: Vec::new(),
            selected: 0,
            scroll_top: 0,
            should_quit: false,
            status_message: String::new(),
        };
        app.relayout();
        app.sync_cursor();

        let orphans = app.manager.get_document_state().orphaned_placeholders;
        if orphans > 0 {
            app.status_message = format!("{orphans} orphaned section(s); press r to repair");
        }
        Ok(app)
    }

    /// Rebuild the displayed rows and hand their boxes to the host.
    fn relayout(&mut self) {
        let rows = {
            let executor = self.manager.executor();
            let doc = executor.document();
            let render = executor.render_model();
            let anchors = executor.anchors();
            let codec = executor.config().indent_codec();

            render
                .rendered_nodes()
                .into_iter()
                .filter(|id| shows_as_line(&doc.element(*id).kind))
                .map(|id| {
                    let element = doc.element(id);
                    let list_depth = doc
                        .ancestors(id)
                        .filter(|a| doc.element(*a).kind.is_list())
                        .count();
                    let folded = element.has(Marker::ListCollapsed)
                        || doc
                            .children(id)
                            .any(|c| doc.element(c).has(Marker::ListCollapsed));
                    let opens_item = doc
                        .parent(id)
                        .is_some_and(|p| doc.element(p).kind == ElementKind::ListItem)
                        && doc.parent(id).and_then(|p| doc.first_child(p)) == Some(id);

                    let glyph = if anchors.is_heading_anchor(id) {
                        if render.is_collapsed_heading(id) { "▸ " } else { "▾ " }
                    } else if anchors.is_bullet(id) {
                        if folded { "▸ " } else { "▾ " }
                    } else if opens_item {
                        "• "
                    } else {
                        "  "
                    };
                    let text = match &element.kind {
                        ElementKind::Image => "[image]".to_string(),
                        ElementKind::Unhandled(kind) => opaque_label(*kind).to_string(),
                        _ => doc.text_content(id),
                    };
                    Row {
                        id,
                        column: (codec.effective_level(doc, id) + list_depth) * INDENT_COLUMNS,
                        glyph,
                        text,
                        heading: element.heading_level().is_some(),
                        orphan: render.is_orphaned_placeholder(id),
                    }
                })
                .collect::<Vec<_>>()
        };

        let layout = rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let rect = PageRect::new(
                    row.column as f64 * CELL_WIDTH,
                    i as f64 * CELL_HEIGHT,
                    row.width().max(1) as f64 * CELL_WIDTH,
                    CELL_HEIGHT,
                );
                (row.id, rect)
            })
            .collect();
        self.manager.executor_mut().host_mut().set_layout(layout);
        self.rows = rows;
        self.selected = self.selected.min(self.rows.len().saturating_sub(1));
    }

    /// Put the host cursor at the start of the selected row.
    fn sync_cursor(&mut self) {
        if let Some(row) = self.rows.get(self.selected) {
            let position = DocPosition::new(row.id, 0);
            self.manager.executor_mut().host_mut().set_cursor(position);
        }
    }

    /// Move the selection to the row holding the host cursor, if it is displayed.
    fn follow_cursor(&mut self) {
        let executor = self.manager.executor();
        let Some(block) = executor
            .host()
            .cursor()
            .and_then(|c| executor.anchors().block_at(c))
        else {
            return;
        };
        if let Some(index) = self.rows.iter().position(|r| r.id == block) {
            self.selected = index;
        }
    }

    fn move_selection(&mut self, delta: isize) {
        if self.rows.is_empty() {
            return;
        }
        let last = self.rows.len() - 1;
        self.selected = self.selected.saturating_add_signed(delta).min(last);
        self.sync_cursor();
    }

    fn execute(&mut self, command: Command) {
        match self.manager.execute(command) {
            Ok(result) => self.status_message = describe(&result),
            Err(err) => self.status_message = format!("Command failed: {err}"),
        }
        if let Some(err) = self.manager.executor_mut().host_mut().take_error() {
            self.status_message = format!("Save failed: {err}");
        }
        self.relayout();
        self.follow_cursor();
        self.sync_cursor();
    }

    /// Click where a mouse would hit the selected element's toggle.
    fn click_selected(&mut self) {
        let Some(rect) = self.manager.executor().host().row_rect(self.selected) else {
            return;
        };
        let point = Point::new(rect.left + CELL_WIDTH / 2.0, rect.top + CELL_HEIGHT / 2.0);
        self.execute(Command::Click { point });
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            KeyCode::PageUp => self.move_selection(-10),
            KeyCode::PageDown => self.move_selection(10),
            KeyCode::Home => self.move_selection(isize::MIN),
            KeyCode::End => self.move_selection(isize::MAX),
            KeyCode::Enter | KeyCode::Char(' ') => self.click_selected(),
            KeyCode::Char('c') => self.execute(Command::ToggleCollapsibility),
            KeyCode::Char('r') => self.execute(Command::RepairOrphans),
            _ => {}
        }
    }

    fn adjust_scroll(&mut self, viewport_height: usize) {
        if viewport_height == 0 {
            return;
        }
        if self.selected < self.scroll_top {
            self.scroll_top = self.selected;
        } else if self.selected >= self.scroll_top + viewport_height {
            self.scroll_top = self.selected + 1 - viewport_height;
        }
    }

    /// Render UI
    fn render(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),    // Outline
                Constraint::Length(1), // Status line
                Constraint::Length(1), // Shortcuts
            ])
            .split(frame.area());

        self.adjust_scroll(chunks[0].height.saturating_sub(2) as usize);
        self.render_outline(frame, chunks[0]);
        self.render_status_line(frame, chunks[1]);
        self.render_shortcuts(frame, chunks[2]);
    }

    fn render_outline(&self, frame: &mut Frame, area: Rect) {
        let height = area.height.saturating_sub(2) as usize;
        let lines: Vec<Line> = self
            .rows
            .iter()
            .enumerate()
            .skip(self.scroll_top)
            .take(height)
            .map(|(i, row)| {
                let mut style = Style::default();
                if row.heading {
                    style = style.fg(Color::Cyan).add_modifier(Modifier::BOLD);
                }
                if row.orphan {
                    style = style.fg(Color::LightRed).add_modifier(Modifier::UNDERLINED);
                }
                if i == self.selected {
                    style = style.add_modifier(Modifier::REVERSED);
                }
                Line::from(vec![
                    Span::raw(" ".repeat(row.column)),
                    Span::styled(row.glyph, Style::default().fg(Color::Yellow)),
                    Span::styled(row.text.clone(), style),
                ])
            })
            .collect();

        let title = format!(" {} ", self.file_path.display());
        let outline = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title));
        frame.render_widget(outline, area);
    }

    fn render_status_line(&self, frame: &mut Frame, area: Rect) {
        let status_text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else {
            let state = self.manager.get_document_state();
            format!(
                "elements:{} collapsed:{} hidden:{} orphans:{} | saves:{} | version:{}",
                state.element_count,
                state.collapsed_headings,
                state.hidden_elements,
                state.orphaned_placeholders,
                self.manager.executor().host().save_count(),
                state.version
            )
        };

        let status_line = Paragraph::new(status_text).style(
            Style::default()
                .bg(Color::DarkGray)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );
        frame.render_widget(status_line, area);
    }

    fn render_shortcuts(&self, frame: &mut Frame, area: Rect) {
        let shortcuts = "↑/↓:move  Enter:toggle  c:collapsible  r:repair  q:quit";
        let shortcuts_line =
            Paragraph::new(shortcuts).style(Style::default().bg(Color::Blue).fg(Color::White));
        frame.render_widget(shortcuts_line, area);
    }
}

fn describe(result: &CommandResult) -> String {
    match result {
        CommandResult::Section(outcome) if outcome.collapsed => {
            format!("Collapsed {} element(s)", outcome.members.len())
        }
        CommandResult::Section(outcome) => {
            format!("Expanded {} element(s)", outcome.members.len())
        }
        CommandResult::Bullet(outcome) => format!("Bullet: {:?}", outcome.action),
        CommandResult::Collapsibility { collapsible: true, .. } => {
            "Heading is now collapsible".to_string()
        }
        CommandResult::Collapsibility { .. } => "Heading is no longer collapsible".to_string(),
        CommandResult::Repaired(report) if report.is_empty() => "Nothing to repair".to_string(),
        CommandResult::Repaired(report) => format!(
            "Revealed {} element(s), removed {} placeholder(s)",
            report.revealed.len(),
            report.placeholders_removed.len()
        ),
        CommandResult::Ignored => String::new(),
    }
}

fn load_config(args: &Args) -> io::Result<CollapseConfig> {
    match &args.config {
        Some(path) => CollapseConfig::load_from_path(path).map_err(io::Error::other),
        None => Ok(CollapseConfig::default()),
    }
}

fn main() -> io::Result<()> {
    let args = Args::parse();
    let config = load_config(&args)?;

    if args.print_css {
        print!("{}", Stylesheet::generate(&config, &args.scope));
        if let Some(button) = ToolbarButton::for_config(&config) {
            println!(
                "/* toolbar button #{} \"{}\" at slot {} */",
                button.id, button.tooltip, button.slot
            );
        }
        return Ok(());
    }

    let mut app = App::new(&args, config)?;

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err}");
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| app.render(f))?;

        if app.should_quit {
            break;
        }

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                app.handle_key_event(key);
            }
        }
    }

    Ok(())
}
