//! Application core: event loop, action dispatch, probe worker lifecycle.

use std::sync::Arc;
use std::time::Duration;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use tokio::sync::mpsc;
use tracing::{debug, info};

use wavescan_core::{RenderConfig, ReplayProbe, ScanStore, ScanWorker};

use crate::action::Action;
use crate::component::Component;
use crate::event::{Event, EventReader};
use crate::screens::scan_list::ScanListScreen;
use crate::tui::Tui;

/// Frame redraw interval (~30 FPS).
const RENDER_RATE: Duration = Duration::from_millis(33);

/// Runtime settings resolved from config and command line.
#[derive(Debug, Clone, Copy)]
pub struct AppOptions {
    pub render: RenderConfig,
    pub scan_interval: Duration,
    pub tick_rate: Duration,
}

/// Top-level application state and event loop.
pub struct App {
    options: AppOptions,
    store: Arc<ScanStore>,
    /// Consumed when the worker starts.
    probe: Option<ReplayProbe>,
    worker: Option<ScanWorker>,
    screen: ScanListScreen,
    running: bool,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
}

impl App {
    pub fn new(probe: ReplayProbe, options: AppOptions) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let store = Arc::new(ScanStore::new());
        let screen = ScanListScreen::new(Arc::clone(&store), options.render, (80, 24));

        Self {
            options,
            store,
            probe: Some(probe),
            worker: None,
            screen,
            running: true,
            action_tx,
            action_rx,
        }
    }

    /// Run until the user quits. The terminal is restored on every exit path.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;
        let (w, h) = tui.size().unwrap_or((80, 24));
        self.action_tx.send(Action::Resize(w, h))?;

        if let Some(probe) = self.probe.take() {
            self.worker = Some(ScanWorker::spawn(
                probe,
                Arc::clone(&self.store),
                self.options.scan_interval,
            )?);
        }

        let mut events = EventReader::new(self.options.tick_rate, RENDER_RATE);
        info!(
            tick_rate = ?self.options.tick_rate,
            scan_interval = ?self.options.scan_interval,
            "event loop started"
        );

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => self.action_tx.send(Action::Resize(w, h))?,
                Event::Tick => self.action_tx.send(Action::Tick)?,
                Event::Render => self.action_tx.send(Action::Render)?,
            }

            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        events.stop();
        if let Some(mut worker) = self.worker.take() {
            tokio::task::spawn_blocking(move || worker.shutdown()).await?;
        }
        info!("event loop ended");
        Ok(())
    }

    /// Global keys first, everything else goes to the screen.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c'))
            | (KeyModifiers::NONE, KeyCode::Char('q') | KeyCode::Esc) => Ok(Some(Action::Quit)),
            _ => self.screen.handle_key_event(key),
        }
    }

    fn process_action(&mut self, action: &Action) -> Result<()> {
        if let Action::Quit = action {
            debug!("quit requested");
            self.running = false;
            return Ok(());
        }
        if let Some(follow_up) = self.screen.update(action)? {
            self.action_tx.send(follow_up)?;
        }
        Ok(())
    }

    fn render(&self, frame: &mut Frame) {
        self.screen.render(frame, frame.area());
    }
}
