//! ratatui front end for Varak.
//!
//! The UI is a thin shell over the viewer logic: keys translate to
//! navigator requests, the event loop ticks the navigator and the autoplay
//! driver, and every frame re-derives the visible scan, page range, and
//! section from the committed slot.

use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context as _;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{event, terminal};
use image::DynamicImage;
use log::warn;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui_image::picker::Picker;
use ratatui_image::protocol::Protocol as ImageProtocol;
use ratatui_image::{Image as ImageWidget, Resize};
use varak_application::{
    Autoplay, BookmarkToggle, FlipDirection, Navigator, ViewerStore, candidates, toggle,
};
use varak_core::{Bookmark, PageAtlas, Progress, SectionIndex, Settings, Theme};
use varak_engine::{AssetSource, PageCache, Preloader, SlotImage};

mod image_protocol;

const TICK_RATE: Duration = Duration::from_millis(50);
const STATUS_TTL: Duration = Duration::from_secs(3);

pub struct Ui {
    atlas: PageAtlas,
    sections: SectionIndex,
    settings: Settings,
    bookmarks: Vec<Bookmark>,
    navigator: Navigator,
    autoplay: Autoplay,
    store: Box<dyn ViewerStore>,
    cache: PageCache,
    preloader: Preloader,
    picker: Picker,
    page_protocol: Option<PageProtocol>,
    section_panel: SectionPanel,
    bookmarks_panel: BookmarksPanel,
    settings_panel: SettingsPanel,
    goto_panel: GotoPanel,
    help_open: bool,
    chrome_hidden: bool,
    status: Option<StatusLine>,
    quit: bool,
}

struct PageProtocol {
    slot: usize,
    zoom_tenths: u16,
    frame_area: Rect,
    protocol: ImageProtocol,
}

struct StatusLine {
    text: String,
    until: Instant,
}

#[derive(Default)]
struct SectionPanel {
    open: bool,
    state: ListState,
}

#[derive(Default)]
struct BookmarksPanel {
    open: bool,
    state: ListState,
}

#[derive(Default)]
struct SettingsPanel {
    open: bool,
    cursor: usize,
}

#[derive(Default)]
struct GotoPanel {
    open: bool,
    input: String,
    error: Option<String>,
}

impl Ui {
    pub fn new(
        atlas: PageAtlas,
        sections: SectionIndex,
        mut settings: Settings,
        bookmarks: Vec<Bookmark>,
        start_slot: usize,
        store: Box<dyn ViewerStore>,
        source: Arc<dyn AssetSource>,
    ) -> Self {
        settings.normalize();
        let mut navigator = Navigator::new(atlas.total_slots());
        navigator.restore(start_slot);
        Self {
            cache: PageCache::new(varak_application::PRELOAD_RADIUS * 2),
            preloader: Preloader::new(source),
            atlas,
            sections,
            settings,
            bookmarks,
            navigator,
            autoplay: Autoplay::new(),
            store,
            picker: Picker::halfblocks(),
            page_protocol: None,
            section_panel: SectionPanel::default(),
            bookmarks_panel: BookmarksPanel::default(),
            settings_panel: SettingsPanel::default(),
            goto_panel: GotoPanel::default(),
            help_open: false,
            chrome_hidden: false,
            status: None,
            quit: false,
        }
    }

    pub fn run(&mut self) -> anyhow::Result<()> {
        let mut terminal = setup_terminal()?;
        image_protocol::ensure_tmux_allow_passthrough();
        self.picker = image_protocol::detect_picker();
        terminal.clear().ok();

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            self.event_loop(&mut terminal)
        }));
        // A deferred flip must not outlive its owner.
        self.navigator.cancel_pending();
        self.autoplay.disarm();
        let restore_result = restore_terminal(&mut terminal);

        match (result, restore_result) {
            (Ok(Ok(())), Ok(())) => Ok(()),
            (Ok(Ok(())), Err(err)) => Err(err),
            (Ok(Err(err)), _) => Err(err),
            (Err(panic), _) => Err(anyhow::anyhow!(panic_to_string(panic))),
        }
    }

    fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    ) -> anyhow::Result<()> {
        self.warm_cache(self.navigator.current_slot());
        let mut needs_redraw = true;

        loop {
            let now = Instant::now();

            if let Some(slot) = self.navigator.tick(now) {
                self.commit_slot(slot);
                needs_redraw = true;
            }
            if self.drive_autoplay(now) {
                needs_redraw = true;
            }
            if self.preloader.drain_into(&mut self.cache) {
                needs_redraw = true;
            }
            if self
                .status
                .as_ref()
                .is_some_and(|status| now >= status.until)
            {
                self.status = None;
                needs_redraw = true;
            }

            if needs_redraw {
                terminal.draw(|frame| {
                    let area = frame.area();
                    self.draw(area, frame);
                })?;
                needs_redraw = false;
            }

            if !event::poll(TICK_RATE)? {
                // Keep ticking: pending flips and autoplay fire on time
                // even when no input arrives.
                needs_redraw = self.navigator.is_flipping() || self.autoplay.is_armed();
                continue;
            }

            match event::read()? {
                Event::Resize(_, _) => {
                    self.page_protocol = None;
                    needs_redraw = true;
                }
                Event::Key(key) => {
                    if key.kind == KeyEventKind::Release {
                        continue;
                    }
                    needs_redraw = true;
                    self.handle_key(key, Instant::now());
                    if self.quit {
                        return Ok(());
                    }
                }
                _ => {}
            }
        }
    }

    // --- input -----------------------------------------------------------

    fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit = true;
            return;
        }

        if self.goto_panel.open {
            self.handle_goto_key(key, now);
        } else if self.settings_panel.open {
            self.handle_settings_key(key);
        } else if self.section_panel.open {
            self.handle_section_key(key, now);
        } else if self.bookmarks_panel.open {
            self.handle_bookmarks_key(key, now);
        } else if self.help_open {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('q' | '?')) {
                self.help_open = false;
            }
        } else {
            self.handle_viewer_key(key, now);
        }
    }

    fn handle_viewer_key(&mut self, key: KeyEvent, now: Instant) {
        let duration = self.settings.flip_speed.duration();
        match key.code {
            KeyCode::Char('q') => self.quit = true,
            KeyCode::Right | KeyCode::PageDown => {
                self.navigator.flip(FlipDirection::Next, now, duration);
            }
            KeyCode::Left | KeyCode::PageUp => {
                self.navigator.flip(FlipDirection::Prev, now, duration);
            }
            KeyCode::Char(' ') => {
                let direction = if key.modifiers.contains(KeyModifiers::SHIFT) {
                    FlipDirection::Prev
                } else {
                    FlipDirection::Next
                };
                self.navigator.flip(direction, now, duration);
            }
            KeyCode::Home => {
                self.navigator.first(now, duration);
            }
            KeyCode::End => {
                self.navigator.last(now, duration);
            }
            KeyCode::Char('b') => self.toggle_bookmark(),
            KeyCode::Char('B') => {
                self.bookmarks_panel.open = true;
                self.bookmarks_panel
                    .state
                    .select(if self.bookmarks.is_empty() { None } else { Some(0) });
            }
            KeyCode::Char('s') => {
                self.section_panel.open = true;
                let current = self.current_section_no().map(|no| no as usize - 1);
                self.section_panel.state.select(current.or(Some(0)));
            }
            KeyCode::Char('g') => {
                self.goto_panel.open = true;
                self.goto_panel.input.clear();
                self.goto_panel.error = None;
            }
            KeyCode::Char('o') => {
                self.settings_panel.open = true;
                self.settings_panel.cursor = 0;
            }
            KeyCode::Char('f') => {
                self.chrome_hidden = !self.chrome_hidden;
                self.page_protocol = None;
            }
            KeyCode::Char('+' | '=') => {
                self.settings.zoom_in();
                self.after_settings_change();
            }
            KeyCode::Char('-') => {
                self.settings.zoom_out();
                self.after_settings_change();
            }
            KeyCode::Char('t') => {
                self.settings.cycle_theme();
                self.after_settings_change();
            }
            KeyCode::Char('a') => {
                self.settings.autoplay_enabled = !self.settings.autoplay_enabled;
                self.after_settings_change();
                self.set_status(if self.settings.autoplay_enabled {
                    "autoplay on"
                } else {
                    "autoplay off"
                });
            }
            KeyCode::Char('?') => self.help_open = true,
            _ => {}
        }
    }

    fn handle_goto_key(&mut self, key: KeyEvent, now: Instant) {
        match key.code {
            KeyCode::Esc => {
                self.goto_panel.open = false;
                self.goto_panel.input.clear();
                self.goto_panel.error = None;
            }
            KeyCode::Enter => {
                let total = self.atlas.total_pages();
                let input = self.goto_panel.input.trim();
                let page = match input.parse::<u32>() {
                    Ok(page) if (1..=total).contains(&page) => page,
                    _ => {
                        self.goto_panel.error = Some(format!("sayfa 1..={total} olmalı"));
                        return;
                    }
                };
                let duration = self.settings.flip_speed.duration();
                self.navigator.go_to_page(page, &self.atlas, now, duration);
                self.goto_panel.open = false;
                self.goto_panel.input.clear();
                self.goto_panel.error = None;
            }
            KeyCode::Backspace => {
                self.goto_panel.input.pop();
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.goto_panel.input.clear();
            }
            KeyCode::Char(ch) if ch.is_ascii_digit() => {
                self.goto_panel.input.push(ch);
            }
            _ => {}
        }
    }

    fn handle_section_key(&mut self, key: KeyEvent, now: Instant) {
        let len = self.sections.sections().len();
        match key.code {
            KeyCode::Esc | KeyCode::Char('s') => self.section_panel.open = false,
            KeyCode::Up | KeyCode::Char('k') => move_selection(&mut self.section_panel.state, len, -1),
            KeyCode::Down | KeyCode::Char('j') => move_selection(&mut self.section_panel.state, len, 1),
            KeyCode::Enter => {
                if let Some(section) = self
                    .section_panel
                    .state
                    .selected()
                    .and_then(|idx| self.sections.sections().get(idx))
                {
                    let duration = self.settings.flip_speed.duration();
                    let start_page = section.start_page;
                    self.navigator
                        .go_to_page(start_page, &self.atlas, now, duration);
                    self.section_panel.open = false;
                }
            }
            _ => {}
        }
    }

    fn handle_bookmarks_key(&mut self, key: KeyEvent, now: Instant) {
        let len = self.bookmarks.len();
        match key.code {
            KeyCode::Esc | KeyCode::Char('B') => self.bookmarks_panel.open = false,
            KeyCode::Up | KeyCode::Char('k') => {
                move_selection(&mut self.bookmarks_panel.state, len, -1)
            }
            KeyCode::Down | KeyCode::Char('j') => {
                move_selection(&mut self.bookmarks_panel.state, len, 1)
            }
            KeyCode::Enter => {
                if let Some(bookmark) = self
                    .bookmarks_panel
                    .state
                    .selected()
                    .and_then(|idx| self.bookmarks.get(idx))
                {
                    let duration = self.settings.flip_speed.duration();
                    let page = bookmark.page_number;
                    self.navigator.go_to_page(page, &self.atlas, now, duration);
                    self.bookmarks_panel.open = false;
                }
            }
            KeyCode::Char('d') => {
                if let Some(idx) = self.bookmarks_panel.state.selected()
                    && idx < self.bookmarks.len()
                {
                    let bookmark = self.bookmarks.remove(idx);
                    if let Err(err) = self.store.remove_bookmark(&bookmark.id) {
                        warn!("persist bookmark removal failed: {err:#}");
                    }
                    let len = self.bookmarks.len();
                    self.bookmarks_panel.state.select(if len == 0 {
                        None
                    } else {
                        Some(idx.min(len - 1))
                    });
                }
            }
            _ => {}
        }
    }

    fn handle_settings_key(&mut self, key: KeyEvent) {
        const ROWS: usize = 5;
        match key.code {
            KeyCode::Esc | KeyCode::Char('o') => self.settings_panel.open = false,
            KeyCode::Up | KeyCode::Char('k') => {
                self.settings_panel.cursor = self.settings_panel.cursor.checked_sub(1).unwrap_or(ROWS - 1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.settings_panel.cursor = (self.settings_panel.cursor + 1) % ROWS;
            }
            KeyCode::Left | KeyCode::Right | KeyCode::Enter | KeyCode::Char(' ') => {
                let forward = !matches!(key.code, KeyCode::Left);
                match self.settings_panel.cursor {
                    0 => self.settings.cycle_theme(),
                    1 => self.settings.cycle_flip_speed(),
                    2 => {
                        if forward {
                            self.settings.zoom_in();
                        } else {
                            self.settings.zoom_out();
                        }
                    }
                    3 => self.settings.autoplay_enabled = !self.settings.autoplay_enabled,
                    _ => {
                        let step = 1_000i64 * if forward { 1 } else { -1 };
                        let interval = self.settings.autoplay_interval_ms as i64 + step;
                        self.settings.autoplay_interval_ms = interval.max(0) as u64;
                    }
                }
                self.after_settings_change();
            }
            _ => {}
        }
    }

    // --- state plumbing --------------------------------------------------

    /// Runs after every committed slot change: persist, trim the cache,
    /// and warm the neighbors.
    fn commit_slot(&mut self, slot: usize) {
        if let Err(err) = self.store.save_slot(slot) {
            warn!("persist slot failed: {err:#}");
        }
        self.cache.retain_near(slot);
        self.page_protocol = None;
        self.warm_cache(slot);
    }

    fn warm_cache(&mut self, slot: usize) {
        self.request_slot(slot);
        for candidate in candidates(slot, self.atlas.total_slots()) {
            self.request_slot(candidate);
        }
    }

    fn request_slot(&mut self, slot: usize) {
        if !self.cache.contains(slot) {
            self.preloader.request(slot, self.atlas.asset_url(slot));
        }
    }

    fn drive_autoplay(&mut self, now: Instant) -> bool {
        let interval = Duration::from_millis(self.settings.autoplay_interval_ms);
        if self.settings.autoplay_enabled {
            self.autoplay.arm(now, interval);
        } else {
            self.autoplay.disarm();
            return false;
        }

        // A fire that lands mid-flip or at the last slot is consumed, not
        // queued; the next interval starts fresh.
        if self.autoplay.due(now, interval)
            && !self.navigator.is_flipping()
            && self.navigator.can_go_next()
        {
            return self
                .navigator
                .flip(FlipDirection::Next, now, self.settings.flip_speed.duration());
        }
        false
    }

    fn after_settings_change(&mut self) {
        self.settings.normalize();
        self.page_protocol = None;
        if let Err(err) = self.store.save_settings(&self.settings) {
            warn!("persist settings failed: {err:#}");
        }
    }

    fn toggle_bookmark(&mut self) {
        let page = self.current_page();
        let section_name = self
            .sections
            .section_for_page(page)
            .map(|section| section.name.clone())
            .unwrap_or_else(|| "Bilinmeyen bölüm".to_string());
        let created_at = chrono::Utc::now().timestamp();

        match toggle(&mut self.bookmarks, page, &section_name, created_at) {
            BookmarkToggle::Added(bookmark) => {
                if let Err(err) = self.store.add_bookmark(&bookmark) {
                    warn!("persist bookmark failed: {err:#}");
                }
                self.set_status("yer imi eklendi");
            }
            BookmarkToggle::Removed(bookmark) => {
                if let Err(err) = self.store.remove_bookmark(&bookmark.id) {
                    warn!("persist bookmark removal failed: {err:#}");
                }
                self.set_status("yer imi kaldırıldı");
            }
        }
    }

    fn set_status(&mut self, text: impl Into<String>) {
        self.status = Some(StatusLine {
            text: text.into(),
            until: Instant::now() + STATUS_TTL,
        });
    }

    fn current_page(&self) -> u32 {
        self.atlas.page_range(self.navigator.current_slot()).start
    }

    fn current_section_no(&self) -> Option<u32> {
        self.sections
            .section_for_page(self.current_page())
            .map(|section| section.no)
    }

    fn accent_color(&self) -> Color {
        match self.settings.theme {
            Theme::Light => Color::Rgb(26, 77, 46),
            Theme::Dark => Color::Yellow,
            Theme::Sepia => Color::Rgb(120, 80, 40),
        }
    }

    fn background_color(&self) -> Color {
        match self.settings.theme {
            Theme::Light => Color::Rgb(245, 241, 232),
            Theme::Dark => Color::Rgb(42, 42, 42),
            Theme::Sepia => Color::Rgb(244, 236, 216),
        }
    }

    fn foreground_color(&self) -> Color {
        match self.settings.theme {
            Theme::Dark => Color::Rgb(220, 220, 210),
            _ => Color::Rgb(30, 30, 30),
        }
    }

    // --- drawing ---------------------------------------------------------

    fn draw(&mut self, area: Rect, frame: &mut ratatui::Frame) {
        let background = Block::default().style(
            Style::default()
                .bg(self.background_color())
                .fg(self.foreground_color()),
        );
        frame.render_widget(background, area);

        let page_area = if self.chrome_hidden {
            area
        } else {
            let layout = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(1),
                    Constraint::Min(1),
                    Constraint::Length(1),
                ])
                .split(area);
            self.draw_header(layout[0], frame);
            self.draw_footer(layout[2], frame);
            layout[1]
        };
        self.draw_page(page_area, frame);

        if self.section_panel.open {
            self.draw_section_panel(area, frame);
        }
        if self.bookmarks_panel.open {
            self.draw_bookmarks_panel(area, frame);
        }
        if self.settings_panel.open {
            self.draw_settings_panel(area, frame);
        }
        if self.goto_panel.open {
            self.draw_goto_panel(area, frame);
        }
        if self.help_open {
            self.draw_help_panel(area, frame);
        }
    }

    fn draw_header(&self, area: Rect, frame: &mut ratatui::Frame) {
        let range = self.atlas.page_range(self.navigator.current_slot());
        let mut spans = vec![
            Span::styled(
                "Şevki Mushafı",
                Style::default()
                    .fg(self.accent_color())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(
                "  {} / {}",
                page_label(range),
                self.atlas.total_pages()
            )),
        ];
        if let Some(section) = self.sections.section_for_page(range.start) {
            spans.push(Span::raw(format!("  ·  {}", section.name)));
        }
        if varak_application::is_bookmarked(&self.bookmarks, range.start) {
            spans.push(Span::styled(
                "  ★",
                Style::default().fg(self.accent_color()),
            ));
        }
        if self.navigator.is_flipping() {
            spans.push(Span::raw("  ·  çevriliyor…"));
        }
        frame.render_widget(
            Paragraph::new(Line::from(spans)).alignment(Alignment::Center),
            area,
        );
    }

    fn draw_footer(&self, area: Rect, frame: &mut ratatui::Frame) {
        let progress = Progress {
            current_page: self.current_page(),
            total_pages: self.atlas.total_pages(),
        };
        let text = match &self.status {
            Some(status) => status.text.clone(),
            None => format!(
                "%{:.0}  ·  zoom {:.1}x  ·  {}  ·  {}  ·  autoplay {}  ·  {}  ·  ? yardım, q çıkış",
                progress.percent(),
                self.settings.zoom,
                self.settings.theme,
                self.settings.flip_speed,
                if self.settings.autoplay_enabled {
                    "on"
                } else {
                    "off"
                },
                image_protocol::protocol_label(&self.picker),
            ),
        };
        frame.render_widget(
            Paragraph::new(Line::from(Span::raw(text))).alignment(Alignment::Center),
            area,
        );
    }

    fn draw_page(&mut self, area: Rect, frame: &mut ratatui::Frame) {
        let slot = self.navigator.current_slot();
        let slot_image = self.cache.get(slot).cloned();
        match slot_image {
            Some(SlotImage::Ready(scan)) => {
                self.ensure_page_protocol(&scan, slot, area);
                if let Some(page) = self.page_protocol.as_ref() {
                    let proto_area = page.protocol.area();
                    let draw_width = proto_area.width.min(area.width);
                    let draw_height = proto_area.height.min(area.height);
                    let draw_area = Rect::new(
                        area.x + area.width.saturating_sub(draw_width) / 2,
                        area.y + area.height.saturating_sub(draw_height) / 2,
                        draw_width,
                        draw_height,
                    );
                    frame.render_widget(ImageWidget::new(&page.protocol), draw_area);
                } else {
                    self.draw_placeholder(area, frame, "görüntü protokolü hatası", true);
                }
            }
            Some(SlotImage::Failed(err)) => {
                let text = format!(
                    "{} yüklenemedi\n\n{err}\n\nbaşka sayfaya geçip geri dönmek yeniden dener",
                    self.atlas.asset_id(slot)
                );
                self.draw_placeholder(area, frame, &text, true);
            }
            None => {
                self.request_slot(slot);
                let text = format!("{} yükleniyor…", self.atlas.asset_id(slot));
                self.draw_placeholder(area, frame, &text, false);
            }
        }
    }

    fn draw_placeholder(&self, area: Rect, frame: &mut ratatui::Frame, text: &str, error: bool) {
        let style = if error {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(self.foreground_color())
        };
        let lines: Vec<Line> = text.lines().map(|line| Line::raw(line.to_string())).collect();
        let vertical_pad = (area.height.saturating_sub(lines.len() as u16)) / 2;
        let paragraph = Paragraph::new(Text::from(lines))
            .style(style)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        let padded = Rect::new(
            area.x,
            area.y + vertical_pad,
            area.width,
            area.height.saturating_sub(vertical_pad),
        );
        frame.render_widget(paragraph, padded);
    }

    fn ensure_page_protocol(&mut self, scan: &Arc<DynamicImage>, slot: usize, area: Rect) {
        let zoom = self.settings.zoom;
        let zoom_tenths = (zoom * 10.0).round() as u16;
        if self.page_protocol.as_ref().is_some_and(|page| {
            page.slot == slot && page.zoom_tenths == zoom_tenths && page.frame_area == area
        }) {
            return;
        }

        let render_area = zoomed_area(area, zoom);
        let source = if zoom > 1.0 {
            magnified_center(scan, zoom)
        } else {
            (**scan).clone()
        };
        match self
            .picker
            .new_protocol(source, render_area, Resize::Fit(None))
        {
            Ok(protocol) => {
                self.page_protocol = Some(PageProtocol {
                    slot,
                    zoom_tenths,
                    frame_area: area,
                    protocol,
                });
            }
            Err(err) => {
                warn!("image protocol for slot {slot} failed: {err}");
                self.page_protocol = None;
            }
        }
    }

    fn draw_section_panel(&mut self, area: Rect, frame: &mut ratatui::Frame) {
        let popup_area = centered_rect(40, 70, area);
        frame.render_widget(Clear, popup_area);
        let block = panel_block("Fihrist", self.accent_color());
        let items: Vec<ListItem> = self
            .sections
            .sections()
            .iter()
            .map(|section| {
                ListItem::new(Line::raw(format!(
                    "{}  —  sayfa {}",
                    section.name, section.start_page
                )))
            })
            .collect();
        let list = List::new(items)
            .block(block)
            .highlight_style(
                Style::default()
                    .fg(self.accent_color())
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▸ ");
        frame.render_stateful_widget(list, popup_area, &mut self.section_panel.state);
    }

    fn draw_bookmarks_panel(&mut self, area: Rect, frame: &mut ratatui::Frame) {
        let popup_area = centered_rect(56, 70, area);
        frame.render_widget(Clear, popup_area);
        let block = panel_block("Yer imleri (Enter git, d sil)", self.accent_color());

        if self.bookmarks.is_empty() {
            let paragraph = Paragraph::new("yer imi yok, görüntüleyicide b ile ekleyin")
                .block(block)
                .alignment(Alignment::Center);
            frame.render_widget(paragraph, popup_area);
            return;
        }

        let items: Vec<ListItem> = self
            .bookmarks
            .iter()
            .map(|bookmark| {
                let when = chrono::DateTime::from_timestamp(bookmark.created_at, 0)
                    .map(|ts| ts.format("%Y-%m-%d").to_string())
                    .unwrap_or_default();
                let mut label = format!(
                    "sayfa {}  —  {}  ({when})",
                    bookmark.page_number, bookmark.section_name
                );
                if let Some(note) = &bookmark.note {
                    label.push_str("  · ");
                    label.push_str(note);
                }
                ListItem::new(Line::raw(label))
            })
            .collect();
        let list = List::new(items)
            .block(block)
            .highlight_style(
                Style::default()
                    .fg(self.accent_color())
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▸ ");
        frame.render_stateful_widget(list, popup_area, &mut self.bookmarks_panel.state);
    }

    fn draw_settings_panel(&self, area: Rect, frame: &mut ratatui::Frame) {
        let popup_area = centered_rect(50, 40, area);
        frame.render_widget(Clear, popup_area);
        let block = panel_block("Ayarlar", self.accent_color());
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let rows = [
            ("Tema", self.settings.theme.to_string()),
            ("Çevirme hızı", self.settings.flip_speed.to_string()),
            ("Zoom", format!("{:.1}x", self.settings.zoom)),
            (
                "Otomatik oynatma",
                if self.settings.autoplay_enabled {
                    "açık".to_string()
                } else {
                    "kapalı".to_string()
                },
            ),
            (
                "Oynatma aralığı",
                format!("{} ms", self.settings.autoplay_interval_ms),
            ),
        ];

        let mut lines = Vec::with_capacity(rows.len() + 2);
        for (idx, (label, value)) in rows.iter().enumerate() {
            let marker = if idx == self.settings_panel.cursor {
                "▸ "
            } else {
                "  "
            };
            let style = if idx == self.settings_panel.cursor {
                Style::default()
                    .fg(self.accent_color())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            lines.push(Line::from(Span::styled(
                format!("{marker}{label}: {value}"),
                style,
            )));
        }
        lines.push(Line::raw(""));
        lines.push(Line::raw("↑/↓ seç, ←/→ değiştir, Esc kapat"));

        frame.render_widget(Paragraph::new(Text::from(lines)), inner);
    }

    fn draw_goto_panel(&self, area: Rect, frame: &mut ratatui::Frame) {
        let popup_area = centered_rect(48, 28, area);
        frame.render_widget(Clear, popup_area);
        let block = panel_block(
            &format!("Sayfaya git (1..={})", self.atlas.total_pages()),
            self.accent_color(),
        );
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = vec![
            Line::from(vec![
                Span::styled("Sayfa: ", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(self.goto_panel.input.clone()),
            ]),
            Line::raw(""),
            Line::raw("Enter gider, Esc vazgeçer, Ctrl+u temizler."),
        ];
        if let Some(err) = &self.goto_panel.error {
            lines.push(Line::raw(""));
            lines.push(Line::from(Span::styled(
                err.clone(),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )));
        }
        frame.render_widget(
            Paragraph::new(Text::from(lines)).wrap(Wrap { trim: true }),
            inner,
        );
    }

    fn draw_help_panel(&self, area: Rect, frame: &mut ratatui::Frame) {
        let popup_area = centered_rect(54, 66, area);
        frame.render_widget(Clear, popup_area);
        let block = panel_block("Kısayollar", self.accent_color());
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines: Vec<Line> = [
            "→ / PageDown / Space   sonraki sayfa",
            "← / PageUp / Shift+Space   önceki sayfa",
            "Home / End   ilk / son sayfa",
            "g   sayfaya git",
            "s   fihrist",
            "b   yer imi ekle/kaldır",
            "B   yer imleri",
            "o   ayarlar",
            "t   tema değiştir",
            "+ / -   yakınlaştır / uzaklaştır",
            "a   otomatik oynatma",
            "f   tam ekran (başlıkları gizle)",
            "Esc   panelleri kapat",
            "q   çıkış",
        ]
        .iter()
        .map(|line| Line::raw(*line))
        .collect();
        frame.render_widget(Paragraph::new(Text::from(lines)), inner);
    }
}

// --- free helpers --------------------------------------------------------

fn page_label(range: varak_core::PageRange) -> String {
    if range.start == range.end {
        format!("Sayfa {}", range.start)
    } else {
        format!("Sayfa {}–{}", range.start, range.end)
    }
}

/// Area the scan is fitted into. Zooming out shrinks the target area
/// (centered); zooming in keeps the full area and is paired with a center
/// crop of the source image.
fn zoomed_area(area: Rect, zoom: f32) -> Rect {
    if zoom >= 1.0 {
        return area;
    }
    let width = ((area.width as f32 * zoom).round() as u16).clamp(1, area.width);
    let height = ((area.height as f32 * zoom).round() as u16).clamp(1, area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

/// Central 1/zoom portion of the scan, for magnification.
fn magnified_center(scan: &DynamicImage, zoom: f32) -> DynamicImage {
    let crop_width = ((scan.width() as f32 / zoom).round() as u32).clamp(1, scan.width());
    let crop_height = ((scan.height() as f32 / zoom).round() as u32).clamp(1, scan.height());
    let x = (scan.width() - crop_width) / 2;
    let y = (scan.height() - crop_height) / 2;
    scan.crop_imm(x, y, crop_width, crop_height)
}

fn move_selection(state: &mut ListState, len: usize, delta: isize) {
    if len == 0 {
        state.select(None);
        return;
    }
    let current = state.selected().unwrap_or(0) as isize;
    let next = (current + delta).rem_euclid(len as isize) as usize;
    state.select(Some(next));
}

fn panel_block(title: &str, accent: Color) -> Block<'static> {
    Block::default().borders(Borders::ALL).title(Span::styled(
        title.to_string(),
        Style::default().fg(accent).add_modifier(Modifier::BOLD),
    ))
}

fn setup_terminal() -> anyhow::Result<Terminal<CrosstermBackend<Stdout>>> {
    terminal::enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen).context("enter alt screen")?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).context("create terminal")
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> anyhow::Result<()> {
    terminal::disable_raw_mode().context("disable raw mode")?;
    crossterm::execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("leave alt screen")?;
    Ok(())
}

fn panic_to_string(panic: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        format!("panic: {s}")
    } else if let Some(s) = panic.downcast_ref::<String>() {
        format!("panic: {s}")
    } else {
        "panic: (unknown payload)".to_string()
    }
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

#[cfg(test)]
mod tests {
    use super::*;
    use varak_core::PageRange;

    #[test]
    fn page_label_formats_spreads_and_singles() {
        assert_eq!(page_label(PageRange { start: 24, end: 25 }), "Sayfa 24–25");
        assert_eq!(page_label(PageRange { start: 7, end: 7 }), "Sayfa 7");
    }

    #[test]
    fn zoomed_area_full_at_or_above_one() {
        let area = Rect::new(0, 0, 100, 40);
        assert_eq!(zoomed_area(area, 1.0), area);
        assert_eq!(zoomed_area(area, 2.5), area);
    }

    #[test]
    fn zoomed_area_shrinks_and_centers_below_one() {
        let area = Rect::new(0, 0, 100, 40);
        let half = zoomed_area(area, 0.5);
        assert_eq!(half.width, 50);
        assert_eq!(half.height, 20);
        assert_eq!(half.x, 25);
        assert_eq!(half.y, 10);
    }

    #[test]
    fn magnified_center_crops_the_middle() {
        let scan = DynamicImage::ImageRgba8(image::RgbaImage::new(100, 60));
        let cropped = magnified_center(&scan, 2.0);
        assert_eq!(cropped.width(), 50);
        assert_eq!(cropped.height(), 30);
    }

    #[test]
    fn magnified_center_never_exceeds_source() {
        let scan = DynamicImage::ImageRgba8(image::RgbaImage::new(3, 3));
        let cropped = magnified_center(&scan, 0.9);
        assert_eq!(cropped.width(), 3);
        assert_eq!(cropped.height(), 3);
    }

    #[test]
    fn move_selection_wraps_both_ways() {
        let mut state = ListState::default();
        move_selection(&mut state, 3, 1);
        assert_eq!(state.selected(), Some(1));
        state.select(Some(2));
        move_selection(&mut state, 3, 1);
        assert_eq!(state.selected(), Some(0));
        move_selection(&mut state, 3, -1);
        assert_eq!(state.selected(), Some(2));
    }

    #[test]
    fn move_selection_empty_list_selects_none() {
        let mut state = ListState::default();
        state.select(Some(0));
        move_selection(&mut state, 0, 1);
        assert_eq!(state.selected(), None);
    }
}
