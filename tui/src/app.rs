//! Main Application
//!
//! The App struct manages the TUI lifecycle as a thin display client:
//! - Event loop (keyboard, resize, backend completions, frame tick)
//! - The embedded [`Conductor`] that owns all chat state
//! - [`DisplayState`] derived from that state for rendering
//!
//! The App converts key presses to [`Action`]s, hands them to the Conductor,
//! and renders every layer from a fresh [`DisplayState`].

use std::time::Duration;

use crossterm::event::{Event as TermEvent, EventStream, KeyEvent, KeyEventKind};
use futures::StreamExt;
use ratatui::backend::Backend;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, StatefulWidget, Widget};
use ratatui::Terminal;

use cabin_core::{AssistantBackend, Conductor};

use crate::compositor::{Compositor, LayerId};
use crate::display::{DisplayState, SurveyView};
use crate::input::{map_key, Action};
use crate::theme;
use crate::widgets::{TextBlock, TextBlockState};

/// Header height (lines)
const HEADER_HEIGHT: u16 = 1;

/// Input box height (lines), separator included
const INPUT_HEIGHT: u16 = 4;

/// Status bar height (lines)
const STATUS_HEIGHT: u16 = 1;

/// Survey card size
const OVERLAY_WIDTH: u16 = 52;
const OVERLAY_HEIGHT: u16 = 11;

/// Redraw interval when nothing else happens
const FRAME_INTERVAL: Duration = Duration::from_millis(100);

/// Main application state
pub struct App<B: AssistantBackend + 'static> {
    // === Core State ===
    /// Is the app still running?
    running: bool,
    /// The embedded Conductor
    conductor: Conductor<B>,

    // === UI Components ===
    /// The layered compositor
    compositor: Compositor,
    /// Layer assignments
    layers: AppLayers,

    // === View State ===
    /// Scroll offset (lines from bottom, 0 = latest)
    scroll_offset: usize,
    /// Total rendered lines (for scroll bounds)
    total_lines: usize,
    /// Terminal size
    size: (u16, u16),
}

/// Layer IDs for UI regions
struct AppLayers {
    header: LayerId,
    conversation: LayerId,
    input: LayerId,
    status: LayerId,
    overlay: LayerId,
}

/// Screen regions for a terminal size
struct Regions {
    header: Rect,
    conversation: Rect,
    input: Rect,
    status: Rect,
    overlay: Rect,
}

impl Regions {
    fn for_size(width: u16, height: u16) -> Self {
        let chrome = HEADER_HEIGHT + INPUT_HEIGHT + STATUS_HEIGHT;
        let conversation_height = height.saturating_sub(chrome);
        let input_y = HEADER_HEIGHT + conversation_height;

        let overlay_width = OVERLAY_WIDTH.min(width);
        let overlay_height = OVERLAY_HEIGHT.min(height);

        Self {
            header: Rect::new(0, 0, width, HEADER_HEIGHT.min(height)),
            conversation: Rect::new(0, HEADER_HEIGHT, width, conversation_height),
            input: Rect::new(0, input_y, width, INPUT_HEIGHT),
            status: Rect::new(0, height.saturating_sub(STATUS_HEIGHT), width, STATUS_HEIGHT),
            overlay: Rect::new(
                (width - overlay_width) / 2,
                (height - overlay_height) / 2,
                overlay_width,
                overlay_height,
            ),
        }
    }
}

impl<B: AssistantBackend + 'static> App<B> {
    /// Create a new App for a terminal of the given size
    pub fn new(conductor: Conductor<B>, width: u16, height: u16) -> Self {
        let mut compositor = Compositor::new(Rect::new(0, 0, width, height));
        let regions = Regions::for_size(width, height);

        let layers = AppLayers {
            conversation: compositor.create_layer(regions.conversation, 0),
            header: compositor.create_layer(regions.header, 10),
            input: compositor.create_layer(regions.input, 10),
            status: compositor.create_layer(regions.status, 10),
            overlay: compositor.create_layer(regions.overlay, 100),
        };
        compositor.set_opaque(layers.overlay, true);
        compositor.set_visible(layers.overlay, false);

        Self {
            running: true,
            conductor,
            compositor,
            layers,
            scroll_offset: 0,
            total_lines: 0,
            size: (width, height),
        }
    }

    /// The embedded Conductor
    pub fn conductor(&self) -> &Conductor<B> {
        &self.conductor
    }

    /// Mutable access to the embedded Conductor
    pub fn conductor_mut(&mut self) -> &mut Conductor<B> {
        &mut self.conductor
    }

    /// Is the app still running?
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Lines scrolled back from the latest message
    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    /// Main event loop
    pub async fn run<T: Backend>(&mut self, terminal: &mut Terminal<T>) -> anyhow::Result<()> {
        let mut event_stream = EventStream::new();
        let mut ticker = tokio::time::interval(FRAME_INTERVAL);

        self.conductor.start();

        // Render initial frame immediately so user sees UI
        self.draw(terminal)?;

        while self.running {
            tokio::select! {
                biased;

                // Terminal events - highest priority
                maybe_event = event_stream.next() => match maybe_event {
                    Some(Ok(TermEvent::Key(key))) if key.kind == KeyEventKind::Press => {
                        self.handle_key(key);
                    }
                    Some(Ok(TermEvent::Resize(w, h))) => self.handle_resize(w, h),
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e.into()),
                    None => self.running = false,
                },

                // Backend replies and timers
                Some(event) = self.conductor.recv_completion() => {
                    self.conductor.handle_event(event);
                    self.scroll_offset = 0;
                }

                _ = ticker.tick() => {}
            }

            self.draw(terminal)?;
        }

        tracing::info!("TUI exiting");
        Ok(())
    }

    /// Handle keyboard input
    pub fn handle_key(&mut self, key: KeyEvent) {
        let Some(action) = map_key(key, self.conductor.state()) else {
            return;
        };

        match action {
            Action::Quit => {
                tracing::debug!("Quit requested");
                self.running = false;
            }
            Action::Edit(text) => self.conductor.set_draft(text),
            Action::Submit(text) => {
                self.conductor.submit(text);
                self.scroll_offset = 0;
            }
            Action::EndChat => self.conductor.end_chat(),
            Action::Rate(satisfied) => self.conductor.rate(satisfied),
            Action::ChooseReason(reason) => self.conductor.choose_reason(reason),
            Action::CloseFeedback => self.conductor.close_feedback(),
            Action::ScrollUp => {
                let max_scroll = self.total_lines.saturating_sub(1);
                self.scroll_offset = (self.scroll_offset + self.page_size()).min(max_scroll);
            }
            Action::ScrollDown => {
                self.scroll_offset = self.scroll_offset.saturating_sub(self.page_size());
            }
        }
    }

    /// Handle terminal resize
    pub fn handle_resize(&mut self, width: u16, height: u16) {
        self.size = (width, height);
        self.compositor.resize(Rect::new(0, 0, width, height));

        let regions = Regions::for_size(width, height);
        self.compositor.place_layer(self.layers.header, regions.header);
        self.compositor
            .place_layer(self.layers.conversation, regions.conversation);
        self.compositor.place_layer(self.layers.input, regions.input);
        self.compositor.place_layer(self.layers.status, regions.status);
        self.compositor.place_layer(self.layers.overlay, regions.overlay);
    }

    fn page_size(&self) -> usize {
        let chrome = HEADER_HEIGHT + INPUT_HEIGHT + STATUS_HEIGHT;
        usize::from((self.size.1.saturating_sub(chrome) / 2).max(1))
    }

    /// Render the UI
    pub fn draw<T: Backend>(&mut self, terminal: &mut Terminal<T>) -> anyhow::Result<()> {
        let display = DisplayState::from_state(self.conductor.state());

        self.render_header(&display);
        self.render_conversation(&display);
        self.render_input(&display);
        self.render_status();
        self.render_overlay(&display);

        terminal.draw(|frame| {
            let output = self.compositor.composite();
            let area = frame.area();
            let buf = frame.buffer_mut();

            for y in 0..area.height.min(output.area.height) {
                for x in 0..area.width.min(output.area.width) {
                    buf[(x, y)] = output[(x, y)].clone();
                }
            }
        })?;

        Ok(())
    }

    /// Render header layer: title left, service status right
    fn render_header(&mut self, display: &DisplayState) {
        let Some(buf) = self.compositor.layer_buffer_mut(self.layers.header) else {
            return;
        };
        buf.reset();
        let area = buf.area;
        if area.width < 4 || area.height == 0 {
            return;
        }
        buf.set_style(area, theme::header_style());
        buf.set_stringn(1, 0, "✈ Airline Assistant", area.width as usize, theme::header_style());

        let status = display.status_label();
        let width = status.chars().count() as u16;
        if area.width > width + 24 {
            buf.set_string(
                area.width - width - 1,
                0,
                &status,
                theme::status_style(display.backend_status),
            );
        }
    }

    /// Render conversation layer
    fn render_conversation(&mut self, display: &DisplayState) {
        let Some(buf) = self.compositor.layer_buffer_mut(self.layers.conversation) else {
            return;
        };
        buf.reset();
        let area = buf.area;
        let width = area.width.saturating_sub(2) as usize;
        let height = area.height as usize;

        if width < 10 || height < 3 {
            return;
        }

        let all_lines = display.conversation_lines(width);
        self.total_lines = all_lines.len();

        // Clamp scroll offset
        let max_scroll = self.total_lines.saturating_sub(height);
        self.scroll_offset = self.scroll_offset.min(max_scroll);

        // Calculate visible range
        let visible_end = self.total_lines.saturating_sub(self.scroll_offset);
        let visible_start = visible_end.saturating_sub(height);

        let has_content_above = visible_start > 0;
        let has_content_below = self.scroll_offset > 0;

        for (i, (line, kind)) in all_lines[visible_start..visible_end].iter().enumerate() {
            // Fade the edge rows when more content is off-screen
            let style = if (has_content_above && i == 0)
                || (has_content_below && i + 1 == height)
            {
                Style::default().fg(Color::Rgb(90, 90, 90))
            } else {
                theme::line_style(*kind)
            };
            buf.set_stringn(1, i as u16, line, width, style);
        }
    }

    /// Render input layer
    fn render_input(&mut self, display: &DisplayState) {
        let Some(buf) = self.compositor.layer_buffer_mut(self.layers.input) else {
            return;
        };
        buf.reset();
        let area = buf.area;
        if area.width == 0 || area.height == 0 {
            return;
        }

        let separator = "─".repeat(area.width as usize);
        buf.set_string(0, 0, &separator, Style::default().fg(theme::DIM_GRAY));

        let text_height = area.height.saturating_sub(1) as usize;
        let text_width = area.width.saturating_sub(2) as usize;
        if text_width < 5 || text_height < 1 {
            return;
        }

        if !display.input_enabled {
            buf.set_string(
                1,
                1,
                "Survey open - answer or press Esc",
                Style::default().fg(theme::DIM_GRAY),
            );
            return;
        }

        let full_input = format!("> {}_", display.draft);
        let wrapped_lines: Vec<String> = textwrap::wrap(&full_input, text_width)
            .iter()
            .map(ToString::to_string)
            .collect();

        // Keep the cursor line visible
        let skip = wrapped_lines.len().saturating_sub(text_height);
        let style = if display.typing {
            Style::default().fg(theme::DIM_GRAY)
        } else {
            Style::default().fg(theme::USER_GREEN)
        };
        for (i, line) in wrapped_lines.iter().skip(skip).enumerate() {
            buf.set_string(1, 1 + i as u16, line, style);
        }

        if skip > 0 {
            buf.set_string(
                area.width.saturating_sub(3),
                0,
                "^",
                Style::default().fg(theme::ACCENT_GOLD),
            );
        }
    }

    /// Render status bar
    fn render_status(&mut self) {
        let scroll_offset = self.scroll_offset;
        let Some(buf) = self.compositor.layer_buffer_mut(self.layers.status) else {
            return;
        };
        buf.reset();
        if buf.area.is_empty() {
            return;
        }

        let scroll_info = if scroll_offset > 0 {
            format!(" [^{scroll_offset} lines - PgDn to scroll]")
        } else {
            String::new()
        };
        let status = format!(
            " Enter send | Ctrl+E end chat | PgUp/PgDn scroll | Esc quit{scroll_info}"
        );

        let width = buf.area.width as usize;
        buf.set_stringn(0, 0, &status, width, Style::default().fg(theme::DIM_GRAY));
    }

    /// Render the survey card
    fn render_overlay(&mut self, display: &DisplayState) {
        let visible = display.survey.is_visible();
        self.compositor.set_visible(self.layers.overlay, visible);
        if !visible {
            return;
        }

        if let Some(buf) = self.compositor.layer_buffer_mut(self.layers.overlay) {
            buf.reset();
            render_survey_card(&display.survey, buf);
        }
    }
}

/// Draw the survey card filling `buf`
fn render_survey_card(survey: &SurveyView, buf: &mut Buffer) {
    let area = buf.area;
    buf.set_style(area, theme::overlay_style());

    let block = Block::bordered()
        .title(format!(" {} ", survey.title()))
        .title_style(theme::overlay_title_style())
        .border_style(theme::overlay_style().fg(theme::ACCENT_GOLD))
        .style(theme::overlay_style());
    let inner = block.inner(area);
    block.render(area, buf);

    if inner.width < 4 || inner.height < 2 {
        return;
    }

    let hint = survey.hint();
    let body_height = if hint.is_empty() {
        inner.height
    } else {
        inner.height.saturating_sub(1)
    };
    let body_area = Rect::new(inner.x + 1, inner.y + 1, inner.width - 2, body_height.saturating_sub(1));

    let body = survey.body().join("\n");
    let mut state = TextBlockState::default();
    TextBlock::new(&body)
        .style(theme::overlay_style())
        .render(body_area, buf, &mut state);

    if !hint.is_empty() {
        buf.set_stringn(
            inner.x + 1,
            inner.y + inner.height - 1,
            hint,
            inner.width.saturating_sub(2) as usize,
            theme::overlay_style().fg(theme::DIM_GRAY),
        );
    }
}
