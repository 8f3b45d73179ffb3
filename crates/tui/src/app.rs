//! Terminal host for a preview session.
//!
//! Executes the session's commands against page-model documents the way the
//! browser host executes them against iframes.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Result;
use screen_review_core::ports::{ListenerRegistration, StaticDocument, SurfaceDocument, TickQueue};
use screen_review_core::preview::SyncOutcome;
use screen_review_core::{CompareSession, Overlay, PreviewSession};
use screen_review_protocol::{
    Findings, LayoutMode, PreviewCommand, SurfaceId, SurfaceRole,
};

use crate::page::PageModel;

/// Vertical scroll step, in CSS pixels.
pub const SCROLL_STEP: f64 = 120.0;

/// A mounted surface as the terminal sees it.
#[derive(Debug)]
pub struct Pane {
    pub id: SurfaceId,
    pub label: String,
    pub width: u32,
    pub scale: f64,
    pub role: SurfaceRole,
    pub document: Rc<RefCell<StaticDocument>>,
    pub findings: Option<Findings>,
    /// False when the page model has no such screen; the pane is a placeholder.
    pub available: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// Typing a custom viewport width.
    CustomWidth(String),
}

pub struct App {
    pub page: PageModel,
    pub session: PreviewSession,
    pub frames: Vec<Pane>,
    pub empty_message: Option<String>,
    pub compare: Overlay<CompareSession>,
    pub input: InputMode,
    /// Last status or error line.
    pub status: Option<String>,
    selected: usize,
    ticks: TickQueue,
}

impl App {
    pub fn new(page: PageModel) -> Result<Self> {
        let host = page.host_context();
        let mut session = PreviewSession::open(&host, page.preview.clone())?;
        let commands = session.rebuild();
        let mut app = Self {
            page,
            session,
            frames: Vec::new(),
            empty_message: None,
            compare: Overlay::new(),
            input: InputMode::Normal,
            status: None,
            selected: 0,
            ticks: TickQueue::new(),
        };
        app.execute(commands);
        Ok(app)
    }

    pub fn layout(&self) -> LayoutMode {
        self.session.viewports().layout()
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Apply session commands: mount documents, attach and load them.
    pub fn execute(&mut self, commands: Vec<PreviewCommand>) {
        for command in commands {
            match command {
                PreviewCommand::ClearSurfaces => {
                    self.frames.clear();
                    self.empty_message = None;
                    self.selected = 0;
                }
                PreviewCommand::SetLayout { .. } => {}
                PreviewCommand::MountSurface {
                    surface,
                    label,
                    width,
                    height,
                    scale,
                    role,
                    ..
                } => self.mount(surface, label, width, height, scale, role),
                PreviewCommand::SetScale { surface, scale } => {
                    if let Some(frame) = self.frames.iter_mut().find(|f| f.id == surface) {
                        frame.scale = scale;
                    }
                }
                PreviewCommand::ShowFindings { surface, findings } => {
                    if let Some(frame) = self.frames.iter_mut().find(|f| f.id == surface) {
                        frame.findings = Some(findings);
                    }
                }
                PreviewCommand::EmptyState { message } => self.empty_message = Some(message),
            }
        }
    }

    fn mount(
        &mut self,
        id: SurfaceId,
        label: String,
        width: u32,
        height: u32,
        scale: f64,
        role: SurfaceRole,
    ) {
        let screen_id = self.session.screen_id().to_string();
        let Some(screen) = self.page.screen(&screen_id) else {
            // Keep panes aligned with the session's surfaces.
            log::warn!("tui: no page model for screen {screen_id:?}");
            self.frames.push(Pane {
                id,
                label,
                width,
                scale,
                role,
                document: StaticDocument::new(f64::from(width), f64::from(height))
                    .inaccessible()
                    .shared(),
                findings: None,
                available: false,
            });
            return;
        };
        let document = screen.render(f64::from(width), f64::from(height)).shared();
        let attached = self.session.attach(
            id,
            Box::new(Rc::clone(&document)),
            ListenerRegistration::none(),
        );
        let findings = if attached {
            self.session.surface_loaded(id)
        } else {
            None
        };
        self.frames.push(Pane {
            id,
            label,
            width,
            scale,
            role,
            document,
            findings,
            available: true,
        });
    }

    /// Run a fallible session mutation, reporting errors on the status line.
    pub fn apply(
        &mut self,
        f: impl FnOnce(&mut PreviewSession) -> screen_review_core::ReviewResult<Vec<PreviewCommand>>,
    ) {
        match f(&mut self.session) {
            Ok(commands) => {
                self.status = None;
                self.execute(commands);
            }
            Err(err) => self.status = Some(err.to_string()),
        }
    }

    pub fn toggle_breakpoint(&mut self, index: usize) {
        self.apply(|s| s.toggle_breakpoint(index));
    }

    pub fn cycle_layout(&mut self) {
        let next = self.layout().next();
        self.apply(|s| Ok(s.set_layout(next)));
    }

    pub fn toggle_zoom(&mut self) {
        let enabled = !self.session.zoom_to_fit();
        self.apply(|s| Ok(s.set_zoom_to_fit(enabled)));
    }

    pub fn toggle_sync(&mut self) {
        let enabled = !self.session.sync_enabled();
        self.session.set_sync_enabled(enabled);
        self.status = Some(format!("scroll sync {}", if enabled { "on" } else { "off" }));
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.apply(|s| Ok(s.set_container(width, height)));
    }

    /// Move the selection to the next frame; in focus layout, promote it.
    pub fn select_next(&mut self) {
        if self.frames.is_empty() {
            return;
        }
        let next = (self.selected + 1) % self.frames.len();
        if self.layout() == LayoutMode::Focus {
            self.apply(|s| s.promote(next));
        }
        self.selected = next.min(self.frames.len().saturating_sub(1));
    }

    pub fn submit_custom_width(&mut self, text: &str) {
        match text.trim().parse::<u32>() {
            Ok(width) => self.apply(|s| s.set_custom_width(width)),
            Err(_) => self.status = Some(format!("not a width: {text:?}")),
        }
    }

    /// Scroll the selected frame by `dy` and let sync follow.
    pub fn scroll_selected(&mut self, dy: f64) -> Option<SyncOutcome> {
        let frame = self.frames.get(self.selected)?;
        let id = frame.id;
        {
            let mut document = frame.document.borrow_mut();
            let (x, y) = (document.scroll_x, document.scroll_y + dy);
            document.scroll_to(x, y).ok()?;
        }
        self.session.surface_scrolled(id, &self.ticks)
    }

    /// Release per-tick state such as the scroll echo guard.
    pub fn tick(&self) {
        self.ticks.run_pending();
    }

    pub fn toggle_compare(&mut self) {
        let host = self.page.host_context();
        let screen = self.session.screen_id().to_string();
        let result = self.compare.toggle_with(|| {
            let mut compare = CompareSession::open(&host)?;
            compare.set_left(&screen)?;
            Ok(compare)
        });
        if let Err(err) = result {
            self.status = Some(err.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use screen_review_protocol::IssueKind;

    use super::*;

    fn app() -> App {
        let page = PageModel::parse(
            br#"{
                "app": "shop",
                "selected": "home",
                "screens": {
                    "cart": { "height": 900 },
                    "home": {
                        "height": 3000,
                        "minWidth": 480,
                        "elements": [{ "left": 16, "width": 200, "textWidth": 260 }]
                    }
                }
            }"#,
        )
        .unwrap();
        App::new(page).unwrap()
    }

    #[test]
    fn opens_one_frame_per_default_breakpoint() {
        let app = app();
        let labels: Vec<&str> = app.frames.iter().map(|f| f.label.as_str()).collect();
        assert_eq!(labels, ["Mobile · 375px", "Tablet · 768px", "Laptop · 1280px"]);
        let mobile = app.frames[0].findings.as_ref().unwrap();
        assert!(mobile.has(IssueKind::Overflow));
        assert!(mobile.has(IssueKind::Truncation));
    }

    #[test]
    fn disabling_everything_shows_empty_state() {
        let mut app = app();
        for index in 0..3 {
            app.toggle_breakpoint(index);
        }
        assert!(app.frames.is_empty());
        assert!(app.empty_message.is_some());
    }

    #[test]
    fn out_of_range_custom_width_reports_status() {
        let mut app = app();
        app.submit_custom_width("90");
        assert!(app.status.as_deref().unwrap().contains("90"));
        assert_eq!(app.frames.len(), 3);

        app.submit_custom_width("1000");
        assert!(app.status.is_none());
        assert_eq!(app.frames.len(), 4);
    }

    #[test]
    fn scrolling_follows_in_other_frames() {
        let mut app = app();
        let outcome = app.scroll_selected(1000.0).unwrap();
        assert!(matches!(outcome, SyncOutcome::Propagated { targets: 2, .. }));
        assert!(app.frames[1].document.borrow().scroll_y > 0.0);
        app.tick();
    }

    #[test]
    fn compare_overlay_starts_on_current_screen() {
        let mut app = app();
        app.toggle_compare();
        let compare = app.compare.get().unwrap();
        assert_eq!(compare.left(), "home");
        assert!(app.compare.handle_key("Escape"));
    }

    #[test]
    fn missing_screen_keeps_panes_aligned_with_surfaces() {
        let page = PageModel::parse(
            br#"{
                "app": "shop",
                "selected": "ghost",
                "screens": { "home": { "height": 900 } }
            }"#,
        )
        .unwrap();
        let mut app = App::new(page).unwrap();
        assert_eq!(app.frames.len(), app.session.surfaces().len());
        assert!(app.frames.iter().all(|pane| !pane.available));

        app.select_next();
        assert_eq!(app.selected(), 1);
        assert!(app.scroll_selected(SCROLL_STEP).is_none());
    }
}
