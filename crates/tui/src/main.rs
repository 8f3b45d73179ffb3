mod app;
mod page;
mod renderer;

use std::io::{Write, stdout};
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::app::App;
use crate::page::PageModel;

/// Print findings for every screen at every active breakpoint.
/// Returns the number of surfaces with issues.
fn report(app: &mut App, out: &mut impl Write) -> Result<usize> {
    let screens: Vec<String> = app.page.screens.keys().cloned().collect();
    let mut failing = 0;
    for screen in &screens {
        app.apply(|s| s.set_screen(screen));
        writeln!(out, "{}/{}", app.session.app_id(), screen)?;
        if let Some(message) = &app.empty_message {
            writeln!(out, "  {message}")?;
            continue;
        }
        for pane in &app.frames {
            let Some(findings) = &pane.findings else {
                continue;
            };
            if !findings.is_clean() {
                failing += 1;
            }
            for line in findings.summary_lines() {
                writeln!(out, "  {}: {line}", pane.label)?;
            }
        }
    }
    Ok(failing)
}

fn main() -> Result<()> {
    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let report_mode = args.first().is_some_and(|a| a == "--report");
    if report_mode {
        args.remove(0);
    }
    let Some(path) = args.first().map(PathBuf::from) else {
        eprintln!("Usage: screen-review [--report] <page-model.json>");
        std::process::exit(1);
    };

    if report_mode {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let data = std::fs::read(&path).with_context(|| format!("reading {}", path.display()))?;
    let page = PageModel::parse(&data)?;
    let mut app = App::new(page)?;

    if report_mode {
        let failing = report(&mut app, &mut stdout().lock())?;
        if failing > 0 {
            std::process::exit(2);
        }
        return Ok(());
    }

    renderer::run_tui(&mut app)
}
