//! Zoom-to-fit scale factors.
//!
//! Scale shrinks the picture of a surface, never its layout width: the
//! surface still lays out at its breakpoint width and is transformed from
//! its top-left corner.

use screen_review_protocol::LayoutMode;

/// Horizontal gap between adjacent surfaces.
pub const SURFACE_GAP: f64 = 16.0;
/// Outer padding of the preview container.
pub const CONTAINER_PADDING: f64 = 32.0;
/// Height a surface is rendered at.
pub const NOMINAL_DOCUMENT_HEIGHT: f64 = 940.0;
/// Share of the available width given to the promoted surface in focus layout.
pub const FOCUS_SHARE: f64 = 0.70;

pub const MIN_SCALE: f64 = 0.1;
pub const MAX_SCALE: f64 = 1.0;

/// Space the preview container offers to surfaces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleInput {
    pub viewport_width: f64,
    pub mode: LayoutMode,
    pub container_width: f64,
    pub container_height: f64,
    pub active_count: usize,
    pub zoom_to_fit: bool,
}

/// Scale factor in `[MIN_SCALE, MAX_SCALE]` for one surface.
///
/// Returns exactly 1.0 when zoom-to-fit is off; the container scrolls instead.
pub fn compute_scale(input: &ScaleInput) -> f64 {
    if !input.zoom_to_fit {
        return MAX_SCALE;
    }
    if input.viewport_width.is_nan() || input.viewport_width <= 0.0 {
        return MAX_SCALE;
    }

    let raw = match input.mode {
        LayoutMode::ParallelRow => {
            let count = input.active_count.max(1) as f64;
            let available = input.container_width - SURFACE_GAP * (count - 1.0) - CONTAINER_PADDING;
            let width_fit = available / count / input.viewport_width;
            let height_fit = input.container_height / NOMINAL_DOCUMENT_HEIGHT;
            width_fit.min(height_fit)
        }
        LayoutMode::Stacked => (input.container_width - CONTAINER_PADDING) / input.viewport_width,
        LayoutMode::Focus => {
            (input.container_width - CONTAINER_PADDING) * FOCUS_SHARE / input.viewport_width
        }
    };

    clamp_scale(raw)
}

fn clamp_scale(raw: f64) -> f64 {
    if raw.is_nan() {
        MIN_SCALE
    } else {
        raw.clamp(MIN_SCALE, MAX_SCALE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(width: f64, mode: LayoutMode, count: usize) -> ScaleInput {
        ScaleInput {
            viewport_width: width,
            mode,
            container_width: 1200.0,
            container_height: 800.0,
            active_count: count,
            zoom_to_fit: true,
        }
    }

    #[test]
    fn parallel_row_respects_width_and_height_fit() {
        for width in [430.0, 768.0, 1920.0] {
            let scale = compute_scale(&input(width, LayoutMode::ParallelRow, 3));
            assert!(scale <= (1200.0 - (2.0 * 16.0 + 32.0)) / width);
            assert!(scale <= 800.0 / 940.0);
            assert!((MIN_SCALE..=MAX_SCALE).contains(&scale));
        }
        let expected = (1200.0 - 64.0) / 3.0 / 768.0;
        let scale = compute_scale(&input(768.0, LayoutMode::ParallelRow, 3));
        assert!((scale - expected).abs() < 1e-9);
    }

    #[test]
    fn height_fit_caps_narrow_surfaces() {
        let scale = compute_scale(&input(200.0, LayoutMode::ParallelRow, 1));
        assert!((scale - 800.0 / 940.0).abs() < 1e-9);
    }

    #[test]
    fn stacked_uses_full_width_without_height_term() {
        let scale = compute_scale(&input(1920.0, LayoutMode::Stacked, 4));
        assert!((scale - 1168.0 / 1920.0).abs() < 1e-9);
        assert_eq!(compute_scale(&input(375.0, LayoutMode::Stacked, 4)), 1.0);
    }

    #[test]
    fn focus_gets_seventy_percent() {
        let scale = compute_scale(&input(1920.0, LayoutMode::Focus, 2));
        assert!((scale - 1168.0 * 0.7 / 1920.0).abs() < 1e-9);
    }

    #[test]
    fn disabled_zoom_is_actual_size() {
        for mode in LayoutMode::ALL {
            let mut i = input(3840.0, mode, 5);
            i.zoom_to_fit = false;
            assert_eq!(compute_scale(&i), 1.0);
        }
    }

    #[test]
    fn always_within_bounds() {
        for mode in LayoutMode::ALL {
            for count in 1..8 {
                for width in [200.0, 375.0, 1280.0, 3840.0] {
                    for container in [0.0, 50.0, 600.0, 5000.0] {
                        let scale = compute_scale(&ScaleInput {
                            viewport_width: width,
                            mode,
                            container_width: container,
                            container_height: container,
                            active_count: count,
                            zoom_to_fit: true,
                        });
                        assert!((MIN_SCALE..=MAX_SCALE).contains(&scale), "{scale}");
                    }
                }
            }
        }
    }

    #[test]
    fn zero_active_count_does_not_divide_by_zero() {
        let scale = compute_scale(&input(768.0, LayoutMode::ParallelRow, 0));
        assert!(scale.is_finite());
    }
}
