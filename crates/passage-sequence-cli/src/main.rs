use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use passage_sequence_config::{Config, FileFavoritesRepository};
use passage_sequence_engine::editing::{CommandMenu, Element, PassageSink, SequenceEditor};
use passage_sequence_engine::io::{self, IoError};
use passage_sequence_engine::models::{CommandKind, Passage};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use std::{env, io::stdout, path::PathBuf, process};

/// Writes every snapshot the editor produces back to the passage file
struct FileSink {
    path: PathBuf,
    last_error: Option<String>,
}

impl FileSink {
    fn new(path: PathBuf) -> Self {
        Self {
            path,
            last_error: None,
        }
    }
}

impl PassageSink for FileSink {
    fn persist(&mut self, passage: &Passage) {
        match io::write_passage(&self.path, passage) {
            Ok(()) => {
                log::debug!("Wrote {}", self.path.display());
                self.last_error = None;
            }
            Err(e) => {
                log::error!("Failed to write {}: {e}", self.path.display());
                self.last_error = Some(e.to_string());
            }
        }
    }
}

struct App {
    editor: SequenceEditor<FileSink>,
    menu: CommandMenu<FileFavoritesRepository>,
    list_state: ListState,
    status: String,
}

impl App {
    fn new(passage_path: PathBuf, config: &Config, favorites: FileFavoritesRepository) -> Result<Self> {
        let passage = match io::read_passage(&passage_path) {
            Ok(passage) => passage,
            Err(IoError::NotFound(_)) => {
                log::info!("Starting a new passage at {}", passage_path.display());
                Passage::default()
            }
            Err(e) => return Err(e.into()),
        };

        let editor = SequenceEditor::new(
            passage,
            config.editor_settings(),
            FileSink::new(passage_path),
        );
        let mut app = Self {
            editor,
            menu: CommandMenu::new(favorites),
            list_state: ListState::default(),
            status: String::new(),
        };

        // Select first element if available
        if !app.editor.tracker().is_empty() {
            app.list_state.select(Some(0));
        }

        Ok(app)
    }

    /// Apply a key press. Returns false when the app should quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        let result = match code {
            KeyCode::Char('q') => return false,
            KeyCode::Down | KeyCode::Char('j') => {
                self.next_element();
                Ok(())
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.previous_element();
                Ok(())
            }
            KeyCode::Char('K') => self.move_selected_up(),
            KeyCode::Char('J') => self.move_selected_down(),
            KeyCode::Char('a') => self.insert_after_selection(),
            KeyCode::Char('c') => self.clone_selected(),
            KeyCode::Char('d') => self.delete_selected(),
            KeyCode::Char('b') => self.add_breakpoint_at_selection(),
            KeyCode::Char('n') => self.append_favorite(),
            KeyCode::Char('f') => self.toggle_selected_favorite(),
            KeyCode::Char('s') => self.save(),
            _ => Ok(()),
        };

        if let Err(e) = result {
            self.status = format!("Error: {e}");
        } else if let Some(e) = &self.editor.sink().last_error {
            self.status = format!("Write failed: {e}");
        }
        true
    }

    fn next_element(&mut self) {
        let len = self.editor.tracker().len();
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => (i + 1) % len,
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    fn previous_element(&mut self) {
        let len = self.editor.tracker().len();
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => {
                if i == 0 {
                    len - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    fn select_clamped(&mut self, pos: usize) {
        let len = self.editor.tracker().len();
        let selected = if len == 0 { None } else { Some(pos.min(len - 1)) };
        self.list_state.select(selected);
    }

    fn selected_command_index(&self) -> Option<usize> {
        let pos = self.list_state.selected()?;
        self.editor
            .tracker()
            .evaluate_command_index_at(pos)
            .map(|location| location.command_index)
    }

    /// Slot in front of the selected command, or the selected breakpoint's own slot
    fn selected_slot(&self) -> usize {
        let tracker = self.editor.tracker();
        self.list_state
            .selected()
            .and_then(|pos| {
                tracker
                    .evaluate_command_index_at(pos)
                    .map(|location| location.command_index)
                    .or_else(|| {
                        tracker
                            .evaluate_breakpoint_slot_at(pos)
                            .map(|location| location.slot)
                    })
            })
            .unwrap_or(tracker.command_count())
    }

    fn move_selected_up(&mut self) -> Result<()> {
        if let Some(pos) = self.list_state.selected() {
            let new_pos = self.editor.move_element_up(pos)?;
            self.list_state.select(Some(new_pos));
        }
        Ok(())
    }

    fn move_selected_down(&mut self) -> Result<()> {
        if let Some(pos) = self.list_state.selected() {
            let new_pos = self.editor.move_element_down(pos)?;
            self.list_state.select(Some(new_pos));
        }
        Ok(())
    }

    fn insert_after_selection(&mut self) -> Result<()> {
        let index = match self.selected_command_index() {
            Some(index) => index + 1,
            None => self.selected_slot(),
        };
        self.editor.add_command_at(index)?;
        self.list_state
            .select(self.editor.tracker().position_of_command(index));
        self.status = "Added new command".to_string();
        Ok(())
    }

    fn clone_selected(&mut self) -> Result<()> {
        let Some(index) = self.selected_command_index() else {
            self.status = "Select a command to clone".to_string();
            return Ok(());
        };
        self.editor.clone_command(index)?;
        self.list_state
            .select(self.editor.tracker().position_of_command(index + 1));
        self.status = "Cloned command".to_string();
        Ok(())
    }

    fn delete_selected(&mut self) -> Result<()> {
        let Some(pos) = self.list_state.selected() else {
            return Ok(());
        };
        if let Some(index) = self.selected_command_index() {
            let removed = self.editor.delete_command(index)?;
            self.status = format!("Deleted {}", removed.kind());
        } else {
            let removed = self.editor.remove_breakpoint(pos)?;
            self.status = format!("Removed breakpoint '{}'", removed.name);
        }
        self.select_clamped(pos);
        Ok(())
    }

    fn add_breakpoint_at_selection(&mut self) -> Result<()> {
        let slot = self.selected_slot();
        let base_name = self.editor.settings().breakpoint_base_name.clone();
        let name = self.editor.add_breakpoint(slot, &base_name)?;

        // New breakpoints go to the end of their slot
        let index_within_slot = self
            .editor
            .passage()
            .breakpoints
            .get_breakpoints(slot)
            .len()
            .saturating_sub(1);
        self.list_state.select(
            self.editor
                .tracker()
                .position_of_breakpoint(slot, index_within_slot),
        );
        self.status = format!("Added breakpoint '{name}'");
        Ok(())
    }

    /// Append a command of the first kind offered by the menu
    fn append_favorite(&mut self) -> Result<()> {
        let kind = self
            .menu
            .entries()
            .first()
            .map(|entry| entry.kind)
            .unwrap_or(CommandKind::Placeholder);
        let pos = self.editor.add_command(kind)?;
        self.list_state.select(Some(pos));
        self.status = format!("Added {kind}");
        Ok(())
    }

    fn toggle_selected_favorite(&mut self) -> Result<()> {
        let Some(pos) = self.list_state.selected() else {
            return Ok(());
        };
        let kind = match self.editor.tracker().get_element_at(pos) {
            Some(Element::Command(command)) => command.kind(),
            Some(Element::Breakpoint(_)) => CommandKind::Breakpoint,
            None => return Ok(()),
        };
        let now_favorite = self.menu.toggle_favorite(kind)?;
        self.status = if now_favorite {
            format!("'{kind}' added to favourites")
        } else {
            format!("'{kind}' removed from favourites")
        };
        Ok(())
    }

    fn save(&mut self) -> Result<()> {
        let path = self.editor.sink().path.clone();
        io::write_passage(&path, self.editor.passage())?;
        self.status = format!("Saved {}", path.display());
        Ok(())
    }

    fn element_lines(&self) -> Vec<ListItem<'static>> {
        self.editor
            .tracker()
            .elements()
            .iter()
            .enumerate()
            .map(|(pos, element)| match element {
                Element::Command(command) => {
                    let summary = command.content.summary();
                    let text = if summary.is_empty() {
                        format!("  {}", command.kind())
                    } else {
                        format!("  {}: {}", command.kind(), summary)
                    };
                    ListItem::new(Line::from(vec![Span::raw(text)]))
                }
                Element::Breakpoint(breakpoint) => {
                    let style = if self.editor.issue_at(pos).is_some() {
                        Style::default().fg(Color::Red)
                    } else {
                        Style::default().fg(Color::Cyan)
                    };
                    ListItem::new(Line::from(vec![Span::styled(
                        format!("◆ {}", breakpoint.name),
                        style.add_modifier(Modifier::BOLD),
                    )]))
                }
            })
            .collect()
    }

    fn detail_lines(&self) -> Vec<String> {
        let Some(pos) = self.list_state.selected() else {
            return vec!["Empty passage. Press n to add a command or b for a breakpoint".to_string()];
        };
        let tracker = self.editor.tracker();

        if let Some(location) = tracker.evaluate_command_index_at(pos) {
            let command = location.command;
            let favorite = if self.menu.is_favorite(command.kind()) {
                " ★"
            } else {
                ""
            };
            let mut lines = vec![
                format!("Command #{}", location.command_index),
                format!("Kind: {}{favorite}", command.kind()),
                format!("Id: {}", command.id),
            ];
            if let Some(text) = command.content.text() {
                lines.push(String::new());
                lines.extend(text.lines().map(str::to_string));
            }
            lines
        } else if let Some(location) = tracker.evaluate_breakpoint_slot_at(pos) {
            let mut lines = vec![
                format!("◆ {}", location.breakpoint.name),
                format!(
                    "Slot {} (#{} in slot)",
                    location.slot, location.index_within_slot
                ),
            ];
            if let Some(issue) = self.editor.issue_at(pos) {
                lines.push(String::new());
                lines.push(format!("⚠ {issue}"));
            }
            lines
        } else {
            Vec::new()
        }
    }

    fn warning_lines(&self) -> Vec<String> {
        self.editor
            .validation()
            .duplicate_names()
            .into_iter()
            .map(|name| format!("⚠ Breakpoint name '{name}' is used more than once"))
            .collect()
    }
}

fn main() -> Result<()> {
    // Stderr shares the terminal with the TUI; stay at the default level unless RUST_LOG is set
    env_logger::Builder::from_default_env().init();

    // Determine passage file from CLI args or config file
    let args: Vec<String> = env::args().collect();
    let config_path = Config::config_path();

    let config = match Config::load() {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            process::exit(1);
        }
    };

    let passage_path = if args.len() == 2 {
        PathBuf::from(&args[1])
    } else if args.len() == 1 {
        match config.default_passage_file() {
            Some(path) => path,
            None => {
                eprintln!("Error: No passage file provided and no passages_path configured");
                eprintln!("Usage: {} <passage.json>", args[0]);
                eprintln!("Or set passages_path in {}", config_path.display());
                process::exit(1);
            }
        }
    } else {
        eprintln!("Usage: {} [passage.json]", args[0]);
        process::exit(1);
    };

    let favorites = FileFavoritesRepository::new(&config_path);
    let mut app = match App::new(passage_path.clone(), &config, favorites) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("Error: Could not open '{}': {e}", passage_path.display());
            process::exit(1);
        }
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()?
            && !app.handle_key(key.code)
        {
            return Ok(());
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Min(0), Constraint::Length(3)].as_ref())
        .split(f.area());

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)].as_ref())
        .split(rows[0]);

    // Element list panel
    let title = format!(
        "Sequence ({} commands, {} breakpoints)",
        app.editor.passage().commands.len(),
        app.editor.passage().breakpoints.len()
    );
    let elements = List::new(app.element_lines())
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().bg(Color::Yellow).fg(Color::Black));

    f.render_stateful_widget(elements, columns[0], &mut app.list_state);

    // Detail and warning panels
    let warnings = app.warning_lines();
    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Min(0),
                Constraint::Length(warning_panel_height(warnings.len())),
            ]
            .as_ref(),
        )
        .split(columns[1]);

    let details: Vec<Line> = app
        .detail_lines()
        .into_iter()
        .map(|line| Line::from(vec![Span::raw(line)]))
        .collect();
    let details = Paragraph::new(details)
        .block(Block::default().borders(Borders::ALL).title("Details"))
        .wrap(Wrap { trim: true });
    f.render_widget(details, side[0]);

    let warnings: Vec<Line> = warnings
        .into_iter()
        .map(|line| Line::from(vec![Span::styled(line, Style::default().fg(Color::Red))]))
        .collect();
    let warnings =
        Paragraph::new(warnings).block(Block::default().borders(Borders::ALL).title("Warnings"));
    f.render_widget(warnings, side[1]);

    // Instructions and status
    let help_text = Line::from(vec![
        Span::raw("q: Quit | ↑/k ↓/j: Select | K/J: Move | "),
        Span::raw("a: Insert | c: Clone | d: Delete | b: Breakpoint | "),
        Span::raw("n: Add favourite | f: Toggle favourite | s: Save"),
    ]);
    let status_text = Line::from(vec![Span::styled(
        app.status.clone(),
        Style::default().fg(Color::Green),
    )]);

    let help = Paragraph::new(vec![help_text, status_text]).block(Block::default());
    f.render_widget(help, rows[1]);
}

/// Rows for the warnings panel: one per warning plus the border
fn warning_panel_height(warning_count: usize) -> u16 {
    u16::try_from(warning_count)
        .unwrap_or(u16::MAX)
        .saturating_add(2)
}
