use std::fmt;

use screen_review_protocol::{
    Breakpoint, Findings, LayoutMode, PreviewCommand, PreviewConfig, SurfaceId, SurfaceRole,
};

use super::detect::detect_issues;
use super::scale::{NOMINAL_DOCUMENT_HEIGHT, ScaleInput, compute_scale};
use super::scroll_sync::{ScrollSync, SyncOutcome};
use super::viewports::ViewportSet;
use crate::error::{ReviewError, ReviewResult};
use crate::host::{HostContext, SURFACE_SANDBOX, screen_path, step_screen};
use crate::ports::{ListenerRegistration, Scheduler, SurfaceDocument};

pub const EMPTY_STATE_MESSAGE: &str = "No viewports selected. Enable a breakpoint or set a custom width.";

/// One rendered breakpoint of the current rebuild.
pub struct Surface {
    id: SurfaceId,
    breakpoint: Breakpoint,
    role: SurfaceRole,
    scale: f64,
    document: Option<Box<dyn SurfaceDocument>>,
    registration: Option<ListenerRegistration>,
    findings: Option<Findings>,
}

impl Surface {
    pub fn id(&self) -> SurfaceId {
        self.id
    }

    pub fn breakpoint(&self) -> &Breakpoint {
        &self.breakpoint
    }

    pub fn role(&self) -> SurfaceRole {
        self.role
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Findings of the last detection pass, if the surface has loaded.
    pub fn findings(&self) -> Option<&Findings> {
        self.findings.as_ref()
    }

    pub fn is_attached(&self) -> bool {
        self.document.is_some()
    }
}

impl fmt::Debug for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Surface")
            .field("id", &self.id)
            .field("breakpoint", &self.breakpoint.name)
            .field("role", &self.role)
            .field("scale", &self.scale)
            .field("attached", &self.document.is_some())
            .field("findings", &self.findings)
            .finish()
    }
}

/// State of one open responsive preview.
///
/// Every change to the active set rebuilds all surfaces from scratch and
/// returns the commands the host must execute. Host callbacks carry a
/// `SurfaceId`; ids from an earlier rebuild are ignored.
pub struct PreviewSession {
    app_id: String,
    screens: Vec<String>,
    screen_id: String,
    viewports: ViewportSet,
    zoom_to_fit: bool,
    sync: ScrollSync,
    container_width: f64,
    container_height: f64,
    generation: u64,
    surfaces: Vec<Surface>,
}

impl PreviewSession {
    /// Start a session for the host's current selection.
    pub fn open(host: &HostContext, config: PreviewConfig) -> ReviewResult<Self> {
        let selection = host.require_selection()?;
        log::debug!(
            "preview: opening {}/{} with {} breakpoints",
            selection.app_id,
            selection.screen_id,
            config.breakpoints.len()
        );
        Ok(Self {
            app_id: selection.app_id,
            screens: selection.screens,
            screen_id: selection.screen_id,
            viewports: ViewportSet::new(config.breakpoints, config.layout),
            zoom_to_fit: config.zoom_to_fit,
            sync: ScrollSync::new(config.sync_enabled),
            container_width: config.container_width,
            container_height: config.container_height,
            generation: 0,
            surfaces: Vec::new(),
        })
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn screen_id(&self) -> &str {
        &self.screen_id
    }

    pub fn viewports(&self) -> &ViewportSet {
        &self.viewports
    }

    pub fn surfaces(&self) -> &[Surface] {
        &self.surfaces
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn zoom_to_fit(&self) -> bool {
        self.zoom_to_fit
    }

    pub fn sync_enabled(&self) -> bool {
        self.sync.is_enabled()
    }

    pub fn container(&self) -> (f64, f64) {
        (self.container_width, self.container_height)
    }

    /// Whether `id` refers to a surface of the current rebuild.
    pub fn is_live(&self, id: SurfaceId) -> bool {
        self.live_index(id).is_some()
    }

    /// Discard every surface and construct one per active breakpoint.
    pub fn rebuild(&mut self) -> Vec<PreviewCommand> {
        self.generation += 1;
        // Dropping the old surfaces releases their listener registrations.
        self.surfaces.clear();

        let mode = self.viewports.layout();
        let mut commands = vec![PreviewCommand::ClearSurfaces, PreviewCommand::SetLayout { mode }];

        let active = self.viewports.active_breakpoints();
        if active.is_empty() {
            log::debug!("preview: rebuild {} has no active breakpoints", self.generation);
            commands.push(PreviewCommand::EmptyState {
                message: EMPTY_STATE_MESSAGE.to_string(),
            });
            return commands;
        }

        let src = screen_path(&self.app_id, &self.screen_id);
        let count = active.len();
        for (index, breakpoint) in active.into_iter().enumerate() {
            let id = SurfaceId::new(self.generation, index);
            let role = self.role_for(index);
            let scale = self.scale_for(&breakpoint, count);
            commands.push(PreviewCommand::MountSurface {
                surface: id,
                label: breakpoint.label(),
                src: src.clone(),
                width: breakpoint.width,
                height: NOMINAL_DOCUMENT_HEIGHT as u32,
                scale,
                role,
                sandbox: SURFACE_SANDBOX.to_string(),
            });
            self.surfaces.push(Surface {
                id,
                breakpoint,
                role,
                scale,
                document: None,
                registration: None,
                findings: None,
            });
        }

        log::debug!(
            "preview: rebuild {} mounted {count} surfaces for {src} ({mode:?})",
            self.generation
        );
        commands
    }

    pub fn set_layout(&mut self, mode: LayoutMode) -> Vec<PreviewCommand> {
        self.viewports.set_layout(mode);
        self.rebuild()
    }

    pub fn toggle_breakpoint(&mut self, index: usize) -> ReviewResult<Vec<PreviewCommand>> {
        self.viewports.toggle_breakpoint(index)?;
        Ok(self.rebuild())
    }

    pub fn set_custom_width(&mut self, width: u32) -> ReviewResult<Vec<PreviewCommand>> {
        self.viewports.set_custom_width(width)?;
        Ok(self.rebuild())
    }

    pub fn clear_custom(&mut self) -> Vec<PreviewCommand> {
        self.viewports.clear_custom();
        self.rebuild()
    }

    /// Promote a thumbnail in focus layout.
    pub fn promote(&mut self, index: usize) -> ReviewResult<Vec<PreviewCommand>> {
        self.viewports.promote(index)?;
        Ok(self.rebuild())
    }

    /// Preview another screen of the current app.
    pub fn set_screen(&mut self, screen_id: &str) -> ReviewResult<Vec<PreviewCommand>> {
        if !self.screens.is_empty() && !self.screens.iter().any(|s| s == screen_id) {
            return Err(ReviewError::UnknownScreen(screen_id.to_string()));
        }
        self.screen_id = screen_id.to_string();
        Ok(self.rebuild())
    }

    pub fn next_screen(&mut self) -> Vec<PreviewCommand> {
        self.step_screen(1)
    }

    pub fn previous_screen(&mut self) -> Vec<PreviewCommand> {
        self.step_screen(-1)
    }

    fn step_screen(&mut self, delta: isize) -> Vec<PreviewCommand> {
        if let Some(next) = step_screen(&self.screens, &self.screen_id, delta) {
            self.screen_id = next.to_string();
        }
        self.rebuild()
    }

    /// Switch zoom-to-fit and rescale the live surfaces in place.
    pub fn set_zoom_to_fit(&mut self, enabled: bool) -> Vec<PreviewCommand> {
        self.zoom_to_fit = enabled;
        self.rescale()
    }

    /// The container was resized; rescale the live surfaces in place.
    pub fn set_container(&mut self, width: f64, height: f64) -> Vec<PreviewCommand> {
        self.container_width = width;
        self.container_height = height;
        self.rescale()
    }

    pub fn set_sync_enabled(&mut self, enabled: bool) {
        self.sync.set_enabled(enabled);
    }

    fn rescale(&mut self) -> Vec<PreviewCommand> {
        let count = self.surfaces.len();
        let scales: Vec<f64> = self
            .surfaces
            .iter()
            .map(|surface| self.scale_for(&surface.breakpoint, count))
            .collect();
        self.surfaces
            .iter_mut()
            .zip(scales)
            .map(|(surface, scale)| {
                surface.scale = scale;
                PreviewCommand::SetScale {
                    surface: surface.id,
                    scale,
                }
            })
            .collect()
    }

    /// Bind a host frame to a surface. Returns false for stale ids, in which
    /// case the document and registration are dropped immediately.
    pub fn attach(
        &mut self,
        id: SurfaceId,
        document: Box<dyn SurfaceDocument>,
        registration: ListenerRegistration,
    ) -> bool {
        let Some(index) = self.live_index(id) else {
            log::debug!("preview: dropping frame for stale surface {id:?}");
            return false;
        };
        let surface = &mut self.surfaces[index];
        surface.document = Some(document);
        surface.registration = Some(registration);
        surface.findings = None;
        true
    }

    /// A surface finished loading: run detection once and keep the result.
    ///
    /// Returns `None` when the surface was discarded by a later rebuild,
    /// never attached, or its document could not be read at all.
    pub fn surface_loaded(&mut self, id: SurfaceId) -> Option<Findings> {
        let index = self.live_index(id)?;
        let surface = &mut self.surfaces[index];
        let document = surface.document.as_deref()?;
        let Some(findings) = detect_issues(document, f64::from(surface.breakpoint.width)) else {
            log::warn!("preview: {} is unreadable, skipping detection", surface.breakpoint.label());
            surface.findings = None;
            return None;
        };
        log::debug!(
            "preview: {} loaded, {} issues",
            surface.breakpoint.label(),
            findings.issues().len()
        );
        surface.findings = Some(findings.clone());
        Some(findings)
    }

    /// A surface scrolled: propagate its relative position to the others.
    ///
    /// Returns `None` for stale or unattached surfaces.
    pub fn surface_scrolled(
        &mut self,
        id: SurfaceId,
        scheduler: &dyn Scheduler,
    ) -> Option<SyncOutcome> {
        let index = self.live_index(id)?;
        let (before, rest) = self.surfaces.split_at_mut(index);
        let (source, after) = rest.split_first_mut()?;
        let source = source.document.as_deref()?;
        let targets = before
            .iter_mut()
            .chain(after.iter_mut())
            .filter_map(|surface| surface.document.as_deref_mut());
        Some(self.sync.propagate(source, targets, scheduler))
    }

    fn live_index(&self, id: SurfaceId) -> Option<usize> {
        (id.generation == self.generation && id.index < self.surfaces.len()).then_some(id.index)
    }

    fn role_for(&self, index: usize) -> SurfaceRole {
        match self.viewports.layout() {
            LayoutMode::Focus if index == self.viewports.focused() => SurfaceRole::Promoted,
            LayoutMode::Focus => SurfaceRole::Thumbnail,
            LayoutMode::ParallelRow | LayoutMode::Stacked => SurfaceRole::Main,
        }
    }

    fn scale_for(&self, breakpoint: &Breakpoint, active_count: usize) -> f64 {
        compute_scale(&ScaleInput {
            viewport_width: f64::from(breakpoint.width),
            mode: self.viewports.layout(),
            container_width: self.container_width,
            container_height: self.container_height,
            active_count,
            zoom_to_fit: self.zoom_to_fit,
        })
    }
}

impl fmt::Debug for PreviewSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreviewSession")
            .field("app_id", &self.app_id)
            .field("screen_id", &self.screen_id)
            .field("generation", &self.generation)
            .field("surfaces", &self.surfaces)
            .finish_non_exhaustive()
    }
}
