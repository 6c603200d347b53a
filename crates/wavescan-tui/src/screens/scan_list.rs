//! Scan window: the live, sorted list of nearby networks.
//!
//! ┌ Scan window ───────────────────────────── Sig desc, scan 14:02:07 ┐
//! │                                                                   │
//! │ HomeNet        02:1A:11:00:01:10 40%, -82 dBm, ch   1, 2412 MHz…  │
//! │ <hidden ESSID> 02:1A:11:04:06:10 97%, -44 dBm, ch   6, 2437 MHz…  │
//! │ …                                                                 │
//! │ total: 15 Sig desc, 3 open 5/2GHz: 5/10 top-3: ch#6 (4), …        │
//! └ a/d order  c C e s o O key  q quit ───────────────────────────────┘
//!
//! Each tick runs the core render pipeline into a [`ScreenBuffer`]; drawing
//! a frame only copies that buffer out, so frames never touch the store.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use tracing::{info, trace};

use wavescan_core::{
    RenderConfig, RenderOutcome, RenderStats, ScanStore, SortConfig, SortKey, SortOrder,
    render_scan_list,
};

use crate::action::Action;
use crate::component::Component;
use crate::surface::ScreenBuffer;
use crate::theme;

/// Sort change requested by a key, or `None` for keys this screen ignores.
pub fn sort_for_key(current: SortConfig, key: KeyEvent) -> Option<SortConfig> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return None;
    }
    let KeyCode::Char(c) = key.code else {
        return None;
    };
    let with_key = |k| SortConfig::new(k, current.order);
    let descending = |k| SortConfig::new(k, SortOrder::Descending);
    match c {
        'a' => Some(SortConfig::new(current.key, SortOrder::Ascending)),
        'd' => Some(SortConfig::new(current.key, SortOrder::Descending)),
        'c' => Some(with_key(SortKey::Channel)),
        'C' => Some(with_key(SortKey::ChannelSignal)),
        'e' => Some(with_key(SortKey::Essid)),
        's' => Some(with_key(SortKey::Signal)),
        'o' => Some(descending(SortKey::Open)),
        'O' => Some(descending(SortKey::OpenSignal)),
        _ => None,
    }
}

pub struct ScanListScreen {
    store: Arc<ScanStore>,
    config: RenderConfig,
    buffer: ScreenBuffer,
    last: Option<RenderStats>,
    skipped: u64,
}

impl ScanListScreen {
    pub fn new(store: Arc<ScanStore>, config: RenderConfig, size: (u16, u16)) -> Self {
        Self {
            store,
            config,
            buffer: ScreenBuffer::new(size.0, size.1),
            last: None,
            skipped: 0,
        }
    }

    pub fn sort(&self) -> SortConfig {
        self.config.sort
    }

    /// Ticks skipped because the probe held the store.
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    pub fn last_stats(&self) -> Option<&RenderStats> {
        self.last.as_ref()
    }

    pub fn buffer(&self) -> &ScreenBuffer {
        &self.buffer
    }

    fn render_tick(&mut self) {
        let layout = self.buffer.layout();
        match render_scan_list(&self.store, self.config, layout, &mut self.buffer) {
            RenderOutcome::Skipped => {
                self.skipped += 1;
                trace!(skipped = self.skipped, "render tick skipped");
            }
            RenderOutcome::Rendered(stats) => self.last = Some(stats),
        }
    }

    /// Sort mode, plus the UTC time of the last scan once one arrived.
    fn title_note(&self) -> String {
        let sort = self.config.sort;
        match self.last.as_ref().and_then(|stats| stats.updated_at) {
            Some(at) => format!(" {} {}, scan {} ", sort.key, sort.order, at.format("%H:%M:%S")),
            None => format!(" {} {} ", sort.key, sort.order),
        }
    }

    fn key_hints() -> Line<'static> {
        let pairs = [("a/d", "order"), ("c C e s o O", "key"), ("q", "quit")];
        let mut spans = vec![Span::raw(" ")];
        for (key, label) in pairs {
            spans.push(Span::styled(key, theme::key_hint_key()));
            spans.push(Span::styled(format!(" {label}  "), theme::key_hint()));
        }
        Line::from(spans)
    }
}

impl Component for ScanListScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        Ok(sort_for_key(self.config.sort, key).map(Action::SetSort))
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::Tick => self.render_tick(),
            Action::Resize(w, h) => {
                self.buffer.resize(*w, *h);
                return Ok(Some(Action::Tick));
            }
            Action::SetSort(sort) => {
                if *sort != self.config.sort {
                    info!(key = %sort.key, order = %sort.order, "sort changed");
                    self.config.sort = *sort;
                    return Ok(Some(Action::Tick));
                }
            }
            Action::Quit | Action::Render => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Scan window ")
            .title_style(theme::title_style())
            .title(
                Line::from(Span::styled(self.title_note(), theme::title_note()))
                    .right_aligned(),
            )
            .title_bottom(Self::key_hints())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());

        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Paragraph::new(self.buffer.lines()).scroll((1, 1)), inner);
    }

    fn id(&self) -> &str {
        "scan-list"
    }
}
