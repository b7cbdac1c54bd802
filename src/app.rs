use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Direction, Layout},
    style::Color,
};
use tokio::sync::mpsc;
use tracing::{error, info};

use crate::catalog::Catalog;
use crate::config::Config;
use crate::error::Result;
use crate::picker::{Focus, Picker};
use crate::player::MpvPlayer;
use crate::ui::{render_picker_view, widgets};

pub enum AppMessage {
    CatalogLoaded(Arc<Catalog>),
    CatalogFailed(String),
}

/// Interactive picker: choose a show and seasons, open a random episode in a
/// fresh player window.
pub struct App {
    pub running: bool,
    pub accent: Color,
    pub picker: Picker,
    pub player: MpvPlayer,
    pub catalog_path: PathBuf,

    pub msg_tx: mpsc::UnboundedSender<AppMessage>,
    pub msg_rx: mpsc::UnboundedReceiver<AppMessage>,
}

impl App {
    pub fn new(config: &Config, catalog_path: PathBuf) -> Self {
        let accent = widgets::parse_accent_color(&config.ui.accent_color);
        let (msg_tx, msg_rx) = mpsc::unbounded_channel();

        Self {
            running: true,
            accent,
            picker: Picker::new(config.autoplay.max_attempts),
            player: MpvPlayer::new(config.general.player.clone(), config.player.args.clone()),
            catalog_path,
            msg_tx,
            msg_rx,
        }
    }

    fn spawn_catalog_load(&self) {
        let tx = self.msg_tx.clone();
        let path = self.catalog_path.clone();
        tokio::spawn(async move {
            let msg = match Catalog::load(&path).await {
                Ok(catalog) => AppMessage::CatalogLoaded(Arc::new(catalog)),
                Err(e) => {
                    error!(error = %e, "Error loading episode lists");
                    AppMessage::CatalogFailed(e.to_string())
                }
            };
            let _ = tx.send(msg);
        });
    }

    pub async fn run(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        info!("Episode picker initializing");
        self.spawn_catalog_load();

        while self.running {
            terminal.draw(|frame| self.render(frame))?;
            self.handle_events().await?;
            self.process_messages();
        }

        Ok(())
    }

    fn process_messages(&mut self) {
        while let Ok(msg) = self.msg_rx.try_recv() {
            match msg {
                AppMessage::CatalogLoaded(catalog) => {
                    info!(shows = catalog.len(), "Episode data loaded");
                    self.picker.load(catalog);
                }
                AppMessage::CatalogFailed(reason) => {
                    self.picker.load_failed(&reason);
                }
            }
        }
    }

    fn render(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(frame.area());

        render_picker_view(frame, chunks[0], &mut self.picker, self.accent);

        let hints: &[(&str, &str)] = if self.picker.focus == Focus::Seasons {
            &[
                ("space", "toggle"),
                ("a/n", "all/none"),
                ("tab", "shows"),
                ("enter", "pick"),
                ("q", "quit"),
            ]
        } else {
            &[
                ("j/k", "move"),
                ("m", "mode"),
                ("tab", "seasons"),
                ("enter", "pick"),
                ("q", "quit"),
            ]
        };
        frame.render_widget(widgets::help_bar(hints), chunks[1]);
    }

    async fn handle_events(&mut self) -> Result<()> {
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    return Ok(());
                }
                if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                    self.running = false;
                    return Ok(());
                }
                self.handle_key(key.code);
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Char('j') | KeyCode::Down => self.picker.move_down(),
            KeyCode::Char('k') | KeyCode::Up => self.picker.move_up(),
            KeyCode::Tab => self.picker.toggle_focus(),
            KeyCode::Char('m') => self.picker.toggle_mode(),
            KeyCode::Char(' ') => self.picker.toggle_season(),
            KeyCode::Char('a') => self.picker.set_all_seasons(true),
            KeyCode::Char('n') => self.picker.set_all_seasons(false),
            KeyCode::Enter | KeyCode::Char('p') => self.open_random(),
            _ => {}
        }
    }

    fn open_random(&mut self) {
        let Some(url) = self.picker.pick() else {
            return;
        };

        if let Err(e) = self.player.open_detached(&url) {
            error!(error = %e, url = %url, "Failed to open episode");
            self.picker.set_status(format!("Could not open episode: {}", e));
        }
    }
}

pub fn init_terminal() -> io::Result<DefaultTerminal> {
    crossterm::terminal::enable_raw_mode()?;
    crossterm::execute!(io::stdout(), crossterm::terminal::EnterAlternateScreen)?;
    Ok(ratatui::init())
}

pub fn restore_terminal() -> io::Result<()> {
    ratatui::restore();
    Ok(())
}
