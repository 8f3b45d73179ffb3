//! Integration test: open a responsive preview through the overlay, mount
//! four breakpoints against in-memory documents, and drive loads,
//! scrolling, custom widths and rebuilds the way a host would.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use screen_review_core::overlay::CLOSE_KEY;
use screen_review_core::ports::{ListenerRegistration, StaticDocument, StaticElement, TickQueue};
use screen_review_core::preview::SyncOutcome;
use screen_review_core::{HostContext, Overlay, PreviewSession, ReviewError};
use screen_review_protocol::{
    Breakpoint, Findings, IssueKind, LayoutMode, PreviewCommand, PreviewConfig, SurfaceId,
};

fn config() -> PreviewConfig {
    PreviewConfig {
        breakpoints: vec![
            Breakpoint::new("Mobile", 430, "📱", true),
            Breakpoint::new("Tablet", 768, "📲", true),
            Breakpoint::new("Laptop", 1280, "💻", false),
            Breakpoint::new("Desktop", 1920, "🖥️", true),
        ],
        layout: LayoutMode::ParallelRow,
        zoom_to_fit: true,
        sync_enabled: true,
        container_width: 1200.0,
        container_height: 800.0,
    }
}

fn host() -> HostContext {
    HostContext::new("shop", vec!["home".into(), "checkout".into()], "home")
}

/// A page that is taller at narrow widths, the way reflowed content is.
fn page_at(width: u32) -> StaticDocument {
    let width = f64::from(width);
    let height = 940.0 + 2_000_000.0 / width;
    let mut elements = vec![StaticElement::block(0.0, width)];
    // A fixed 500px banner overflows anything narrower.
    elements.push(StaticElement::block(0.0, 500.0));
    StaticDocument::new(width, 940.0)
        .with_content(width.max(500.0), height)
        .with_elements(elements)
}

fn mounted(commands: &[PreviewCommand]) -> Vec<(SurfaceId, u32, f64)> {
    commands
        .iter()
        .filter_map(|cmd| match cmd {
            PreviewCommand::MountSurface {
                surface,
                width,
                scale,
                ..
            } => Some((*surface, *width, *scale)),
            _ => None,
        })
        .collect()
}

#[test]
fn responsive_preview_round_trip() {
    let mut overlay: Overlay<PreviewSession> = Overlay::new();

    // No screen selected: the overlay refuses to open.
    let unselected = HostContext {
        selected_screen: None,
        ..host()
    };
    let refused = overlay
        .open_with(|| PreviewSession::open(&unselected, config()))
        .map(|_| ());
    assert!(matches!(refused, Err(ReviewError::MissingSelection)));
    assert!(!overlay.is_open());

    let session = overlay
        .open_with(|| PreviewSession::open(&host(), config()))
        .expect("selection is complete");
    let commands = session.rebuild();
    let surfaces = mounted(&commands);

    // Three active surfaces, each scaled to fit width and height.
    assert_eq!(
        surfaces.iter().map(|s| s.1).collect::<Vec<_>>(),
        vec![430, 768, 1920]
    );
    for (_, width, scale) in &surfaces {
        assert!(*scale <= (1200.0 - (2.0 * 16.0 + 32.0)) / f64::from(*width));
        assert!(*scale <= 800.0 / 940.0);
        assert!((0.1..=1.0).contains(scale));
    }

    // Every surface is constructed before any load is handled.
    assert_eq!(session.surfaces().len(), 3);
    let released = Rc::new(Cell::new(0));
    let mut documents = Vec::new();
    for (id, width, _) in &surfaces {
        let doc = Rc::new(RefCell::new(page_at(*width)));
        let counter = Rc::clone(&released);
        assert!(session.attach(
            *id,
            Box::new(Rc::clone(&doc)),
            ListenerRegistration::new(move || counter.set(counter.get() + 1)),
        ));
        documents.push(doc);
    }

    // Loads complete out of order.
    let desktop = session.surface_loaded(surfaces[2].0).expect("live surface");
    let mobile = session.surface_loaded(surfaces[0].0).expect("live surface");
    let tablet = session.surface_loaded(surfaces[1].0).expect("live surface");
    assert_eq!(desktop, Findings::Clean);
    assert_eq!(tablet, Findings::Clean);
    assert!(mobile.has(IssueKind::Overflow));
    assert!(mobile.has(IssueKind::Offscreen));
    assert!(mobile.issues()[0].message.contains("500px"));

    // Scroll the mobile surface halfway; the others follow proportionally.
    let queue = TickQueue::new();
    {
        let mut mobile_doc = documents[0].borrow_mut();
        let travel = mobile_doc.content_height - mobile_doc.viewport_height;
        mobile_doc.scroll_y = travel / 2.0;
    }
    let outcome = session.surface_scrolled(surfaces[0].0, &queue);
    assert_eq!(
        outcome,
        Some(SyncOutcome::Propagated {
            targets: 2,
            skipped: 0
        })
    );
    for doc in &documents[1..] {
        let doc = doc.borrow();
        let travel = doc.content_height - doc.viewport_height;
        assert!((doc.scroll_y - travel / 2.0).abs() < 1.0);
    }

    // The echo from a target is ignored until the next tick.
    assert_eq!(
        session.surface_scrolled(surfaces[1].0, &queue),
        Some(SyncOutcome::Suppressed)
    );
    queue.run_pending();

    // Custom widths: out of range is rejected, in range adds a fourth surface.
    assert!(matches!(
        session.set_custom_width(5000),
        Err(ReviewError::InvalidCustomWidth { .. })
    ));
    assert_eq!(released.get(), 0);
    let rebuilt = mounted(&session.set_custom_width(1000).expect("valid width"));
    assert_eq!(rebuilt.len(), 4);
    assert_eq!(rebuilt[3].1, 1000);
    assert_eq!(released.get(), 3);

    // Callbacks for the discarded surfaces no longer do anything.
    assert_eq!(session.surface_loaded(surfaces[0].0), None);
    assert_eq!(session.surface_scrolled(surfaces[0].0, &queue), None);

    assert!(overlay.handle_key(CLOSE_KEY));
    assert!(!overlay.is_open());
}
