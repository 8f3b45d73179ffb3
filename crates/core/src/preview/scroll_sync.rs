use std::cell::Cell;
use std::rc::Rc;

use crate::ports::{Scheduler, SurfaceDocument};

/// What happened to one scroll event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Synchronization is switched off; the event was ignored.
    Disabled,
    /// A propagation cycle is still in flight; the event is its echo.
    Suppressed,
    /// The scrolled surface could not be read.
    SourceUnavailable,
    Propagated { targets: usize, skipped: usize },
}

/// Proportional scroll synchronizer for one preview session.
///
/// A scroll on one surface moves every other surface to the same fraction
/// of its own scroll travel. The re-entrancy flag stays set until the next
/// scheduler tick, so the scroll events caused by a propagation (and any
/// burst within the same tick) are ignored.
#[derive(Debug, Clone)]
pub struct ScrollSync {
    enabled: bool,
    propagating: Rc<Cell<bool>>,
}

impl Default for ScrollSync {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ScrollSync {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            propagating: Rc::new(Cell::new(false)),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Toggling does not touch listeners; disabled events are observed and dropped.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_propagating(&self) -> bool {
        self.propagating.get()
    }

    /// Handle a scroll event on `source`, moving every document in `targets`.
    pub fn propagate<'a, S, D, I>(
        &self,
        source: &S,
        targets: I,
        scheduler: &dyn Scheduler,
    ) -> SyncOutcome
    where
        S: SurfaceDocument + ?Sized,
        D: SurfaceDocument + ?Sized + 'a,
        I: IntoIterator<Item = &'a mut D>,
    {
        if !self.enabled {
            return SyncOutcome::Disabled;
        }
        if self.propagating.get() {
            return SyncOutcome::Suppressed;
        }

        let metrics = match source.scroll_metrics() {
            Ok(metrics) => metrics,
            Err(err) => {
                log::warn!("scroll sync: source unreadable: {err}");
                return SyncOutcome::SourceUnavailable;
            }
        };
        let (ratio_x, ratio_y) = metrics.scroll_ratio();

        self.propagating.set(true);
        let flag = Rc::clone(&self.propagating);
        scheduler.next_tick(Box::new(move || flag.set(false)));

        let mut moved = 0;
        let mut skipped = 0;
        for target in targets {
            let result = target
                .scroll_metrics()
                .and_then(|m| target.scroll_to(ratio_x * m.max_scroll_x(), ratio_y * m.max_scroll_y()));
            match result {
                Ok(()) => moved += 1,
                Err(err) => {
                    log::warn!("scroll sync: skipping surface: {err}");
                    skipped += 1;
                }
            }
        }

        log::debug!(
            "scroll sync: ratio ({ratio_x:.3}, {ratio_y:.3}) -> {moved} surfaces, {skipped} skipped"
        );
        SyncOutcome::Propagated {
            targets: moved,
            skipped,
        }
    }
}
