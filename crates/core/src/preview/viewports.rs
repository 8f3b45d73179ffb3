use screen_review_protocol::{Breakpoint, LayoutMode, MAX_CUSTOM_WIDTH, MIN_CUSTOM_WIDTH};

use crate::error::{ReviewError, ReviewResult};

/// Built-in breakpoints, the optional custom one, and the layout arrangement.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewportSet {
    breakpoints: Vec<Breakpoint>,
    custom: Option<Breakpoint>,
    layout: LayoutMode,
    /// Index into the active set of the promoted surface in focus layout.
    focused: usize,
}

impl Default for ViewportSet {
    fn default() -> Self {
        Self::new(Breakpoint::defaults(), LayoutMode::default())
    }
}

impl ViewportSet {
    /// Breakpoints with a zero width cannot be rendered and are dropped.
    pub fn new(mut breakpoints: Vec<Breakpoint>, layout: LayoutMode) -> Self {
        breakpoints.retain(|bp| {
            if bp.width == 0 {
                log::warn!("preview: dropping breakpoint {:?} with zero width", bp.name);
            }
            bp.width > 0
        });
        Self {
            breakpoints,
            custom: None,
            layout,
            focused: 0,
        }
    }

    /// Built-in breakpoints in declaration order, enabled or not.
    pub fn breakpoints(&self) -> &[Breakpoint] {
        &self.breakpoints
    }

    pub fn custom(&self) -> Option<&Breakpoint> {
        self.custom.as_ref()
    }

    pub fn layout(&self) -> LayoutMode {
        self.layout
    }

    pub fn set_layout(&mut self, mode: LayoutMode) {
        self.layout = mode;
    }

    /// Flip a built-in breakpoint on or off. Returns its new state.
    pub fn toggle_breakpoint(&mut self, index: usize) -> ReviewResult<bool> {
        let breakpoint = self
            .breakpoints
            .get_mut(index)
            .ok_or(ReviewError::BreakpointIndex(index))?;
        breakpoint.enabled = !breakpoint.enabled;
        let enabled = breakpoint.enabled;
        self.clamp_focus();
        Ok(enabled)
    }

    /// Set (or replace) the custom breakpoint. Widths outside
    /// `[MIN_CUSTOM_WIDTH, MAX_CUSTOM_WIDTH]` leave the set unchanged.
    pub fn set_custom_width(&mut self, width: u32) -> ReviewResult<()> {
        if !(MIN_CUSTOM_WIDTH..=MAX_CUSTOM_WIDTH).contains(&width) {
            return Err(ReviewError::InvalidCustomWidth {
                width,
                min: MIN_CUSTOM_WIDTH,
                max: MAX_CUSTOM_WIDTH,
            });
        }
        self.custom = Some(Breakpoint::custom(width));
        Ok(())
    }

    pub fn clear_custom(&mut self) -> bool {
        let had_custom = self.custom.take().is_some();
        self.clamp_focus();
        had_custom
    }

    /// Enabled built-ins in declaration order, then the custom breakpoint.
    pub fn active_breakpoints(&self) -> Vec<Breakpoint> {
        self.breakpoints
            .iter()
            .filter(|bp| bp.enabled)
            .chain(self.custom.iter())
            .cloned()
            .collect()
    }

    pub fn active_count(&self) -> usize {
        self.breakpoints.iter().filter(|bp| bp.enabled).count() + usize::from(self.custom.is_some())
    }

    pub fn focused(&self) -> usize {
        self.focused
    }

    /// Promote the surface at `index` of the active set.
    pub fn promote(&mut self, index: usize) -> ReviewResult<()> {
        if index >= self.active_count() {
            return Err(ReviewError::FocusIndex(index));
        }
        self.focused = index;
        Ok(())
    }

    fn clamp_focus(&mut self) {
        if self.focused >= self.active_count() {
            self.focused = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_set() -> ViewportSet {
        ViewportSet::new(
            vec![
                Breakpoint::new("Mobile", 430, "📱", true),
                Breakpoint::new("Tablet", 768, "📲", true),
                Breakpoint::new("Laptop", 1280, "💻", false),
                Breakpoint::new("Desktop", 1920, "🖥️", true),
            ],
            LayoutMode::ParallelRow,
        )
    }

    fn widths(set: &ViewportSet) -> Vec<u32> {
        set.active_breakpoints().iter().map(|bp| bp.width).collect()
    }

    #[test]
    fn active_set_skips_disabled() {
        let set = scenario_set();
        assert_eq!(widths(&set), vec![430, 768, 1920]);
        assert_eq!(set.active_count(), 3);
    }

    #[test]
    fn toggle_off_then_on_restores_position() {
        let mut set = scenario_set();
        assert!(!set.toggle_breakpoint(1).unwrap());
        assert_eq!(widths(&set), vec![430, 1920]);
        assert!(set.toggle_breakpoint(1).unwrap());
        assert_eq!(widths(&set), vec![430, 768, 1920]);
    }

    #[test]
    fn toggle_out_of_range_fails() {
        let mut set = scenario_set();
        assert!(matches!(
            set.toggle_breakpoint(9),
            Err(ReviewError::BreakpointIndex(9))
        ));
    }

    #[test]
    fn oversized_custom_width_is_rejected() {
        let mut set = scenario_set();
        let before = set.active_breakpoints();
        assert!(matches!(
            set.set_custom_width(5000),
            Err(ReviewError::InvalidCustomWidth { width: 5000, .. })
        ));
        assert!(set.set_custom_width(199).is_err());
        assert!(set.custom().is_none());
        assert_eq!(set.active_breakpoints(), before);
    }

    #[test]
    fn custom_width_appends_last_and_replaces() {
        let mut set = scenario_set();
        set.set_custom_width(1000).unwrap();
        let active = set.active_breakpoints();
        assert_eq!(active.len(), 4);
        assert_eq!(active[3].name, "Custom");
        assert_eq!(active[3].width, 1000);

        set.set_custom_width(200).unwrap();
        assert_eq!(widths(&set), vec![430, 768, 1920, 200]);
        set.set_custom_width(3840).unwrap();
        assert_eq!(set.active_count(), 4);
    }

    #[test]
    fn focus_resets_when_active_set_shrinks() {
        let mut set = scenario_set();
        set.promote(2).unwrap();
        assert_eq!(set.focused(), 2);
        set.toggle_breakpoint(3).unwrap();
        assert_eq!(set.focused(), 0);
        assert!(matches!(set.promote(2), Err(ReviewError::FocusIndex(2))));
    }

    #[test]
    fn zero_width_breakpoints_are_dropped() {
        let set = ViewportSet::new(
            vec![
                Breakpoint::new("Zero", 0, "", true),
                Breakpoint::new("Mobile", 375, "📱", true),
            ],
            LayoutMode::ParallelRow,
        );
        assert_eq!(set.breakpoints().len(), 1);
        assert_eq!(widths(&set), vec![375]);
    }
}
