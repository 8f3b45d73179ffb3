use screen_review_protocol::{Findings, Issue, IssueKind, TextOverflow};

use crate::ports::SurfaceDocument;

/// Body wider than the viewport by more than this is an overflow.
pub const OVERFLOW_TOLERANCE: f64 = 2.0;
/// Ellipsis elements clipping more than this count as truncated.
pub const TRUNCATION_TOLERANCE: f64 = 1.0;
/// Elements whose right edge passes the breakpoint by more than this are off-screen.
pub const OFFSCREEN_TOLERANCE: f64 = 5.0;

/// Inspect a loaded document for responsive layout defects.
///
/// Read-only. Per-element failures are skipped; a document that cannot be
/// enumerated still gets the overflow check and vice versa. Returns `None`
/// when neither check could read the document.
pub fn detect_issues<D>(document: &D, breakpoint_width: f64) -> Option<Findings>
where
    D: SurfaceDocument + ?Sized,
{
    let mut issues = Vec::new();

    let layout = document.layout_probe();
    let mut inspected = layout.is_ok();
    match layout {
        Ok(probe) if probe.body_scroll_width > probe.client_width + OVERFLOW_TOLERANCE => {
            issues.push(Issue::new(
                IssueKind::Overflow,
                format!(
                    "Horizontal overflow: content is {}px wide in a {}px viewport",
                    probe.body_scroll_width.round(),
                    probe.client_width.round()
                ),
            ));
        }
        Ok(_) => {}
        Err(err) => log::warn!("detect: layout probe failed: {err}"),
    }

    match document.elements() {
        Ok(elements) => {
            inspected = true;
            let mut truncated = 0usize;
            let mut offscreen = 0usize;
            let mut unreadable = 0usize;
            for element in elements {
                let Ok(probe) = element else {
                    unreadable += 1;
                    continue;
                };
                if probe.text_overflow == TextOverflow::Ellipsis
                    && probe.scroll_width - probe.client_width > TRUNCATION_TOLERANCE
                {
                    truncated += 1;
                }
                if probe.rect_width > 0.0 && probe.rect_right > breakpoint_width + OFFSCREEN_TOLERANCE {
                    offscreen += 1;
                }
            }
            if unreadable > 0 {
                log::debug!("detect: skipped {unreadable} unreadable elements");
            }
            if truncated > 0 {
                issues.push(Issue::new(
                    IssueKind::Truncation,
                    format!("{truncated} {} truncated with an ellipsis", elements_word(truncated)),
                ));
            }
            if offscreen > 0 {
                issues.push(Issue::new(
                    IssueKind::Offscreen,
                    format!(
                        "{offscreen} {} past {breakpoint_width}px",
                        if offscreen == 1 { "element extends" } else { "elements extend" }
                    ),
                ));
            }
        }
        Err(err) => log::warn!("detect: element enumeration failed: {err}"),
    }

    if !inspected {
        return None;
    }
    Some(Findings::from_issues(issues))
}

fn elements_word(count: usize) -> &'static str {
    if count == 1 { "element" } else { "elements" }
}
