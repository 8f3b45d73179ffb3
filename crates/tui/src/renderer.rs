use std::io::stdout;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};
use screen_review_core::CompareSession;
use screen_review_core::ports::SurfaceDocument;
use screen_review_core::overlay::CLOSE_KEY;
use screen_review_protocol::{
    CompareCommand, Findings, LayoutMode, PaneSide, SurfaceRole, ThemeToken,
};

use crate::app::{App, InputMode, Pane, SCROLL_STEP};

/// CSS pixels represented by one terminal cell.
const CELL_WIDTH_PX: f64 = 8.0;
const CELL_HEIGHT_PX: f64 = 16.0;

const OPACITY_STEP: f64 = 0.1;

fn theme_to_color(token: ThemeToken) -> Color {
    match token {
        ThemeToken::Background => Color::Black,
        ThemeToken::Border => Color::DarkGray,
        ThemeToken::TextPrimary => Color::White,
        ThemeToken::TextMuted => Color::DarkGray,
        ThemeToken::ToolbarBackground => Color::DarkGray,
        ThemeToken::ToolbarText => Color::White,
        ThemeToken::ToolbarActive => Color::Green,
        ThemeToken::SurfaceFrame => Color::Gray,
        ThemeToken::SurfacePromoted => Color::LightBlue,
        ThemeToken::SurfaceThumbnail => Color::DarkGray,
        ThemeToken::SurfaceContent => Color::Rgb(80, 120, 160),
        ThemeToken::IssueOverflow => Color::Red,
        ThemeToken::IssueTruncation => Color::Yellow,
        ThemeToken::IssueOffscreen => Color::LightRed,
        ThemeToken::IssueClean => Color::Green,
        ThemeToken::EmptyState => Color::Gray,
    }
}

fn fg(token: ThemeToken) -> Style {
    Style::default().fg(theme_to_color(token))
}

fn role_token(role: SurfaceRole) -> ThemeToken {
    match role {
        SurfaceRole::Main => ThemeToken::SurfaceFrame,
        SurfaceRole::Promoted => ThemeToken::SurfacePromoted,
        SurfaceRole::Thumbnail => ThemeToken::SurfaceThumbnail,
    }
}

/// Screen areas for `count` panes in `layout`.
fn pane_areas(layout: LayoutMode, area: Rect, roles: &[SurfaceRole]) -> Vec<Rect> {
    let count = roles.len();
    if count == 0 {
        return Vec::new();
    }
    let even = |direction: Direction, area: Rect, n: usize| {
        let n = u32::try_from(n).unwrap_or(u32::MAX);
        Layout::default()
            .direction(direction)
            .constraints((0..n).map(|_| Constraint::Ratio(1, n)))
            .split(area)
            .to_vec()
    };
    match layout {
        LayoutMode::ParallelRow => even(Direction::Horizontal, area, count),
        LayoutMode::Stacked => even(Direction::Vertical, area, count),
        LayoutMode::Focus => {
            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
                .split(area);
            let thumbs = roles.iter().filter(|r| **r != SurfaceRole::Promoted).count();
            let mut thumb_areas = even(Direction::Vertical, columns[1], thumbs).into_iter();
            roles
                .iter()
                .map(|role| match role {
                    SurfaceRole::Promoted => columns[0],
                    _ => thumb_areas.next().unwrap_or(columns[1]),
                })
                .collect()
        }
    }
}

fn draw_toolbar(frame: &mut Frame, area: Rect, app: &App) {
    let session = &app.session;
    let mut spans = vec![Span::raw(format!(
        " screen-review · {}/{} | {} | ",
        session.app_id(),
        session.screen_id(),
        app.layout().label()
    ))];
    for (index, breakpoint) in session.viewports().breakpoints().iter().enumerate() {
        let style = if breakpoint.enabled {
            fg(ThemeToken::ToolbarActive).add_modifier(Modifier::BOLD)
        } else {
            fg(ThemeToken::TextMuted)
        };
        spans.push(Span::styled(format!("[{}] {} ", index + 1, breakpoint.name), style));
    }
    if let Some(custom) = session.viewports().custom() {
        spans.push(Span::styled(custom.label(), fg(ThemeToken::ToolbarActive)));
        spans.push(Span::raw(" "));
    }
    spans.push(Span::raw(format!(
        "| zoom {} | sync {} ",
        if session.zoom_to_fit() { "fit" } else { "1:1" },
        if session.sync_enabled() { "on" } else { "off" },
    )));
    let toolbar = Paragraph::new(Line::from(spans)).style(
        Style::default()
            .fg(theme_to_color(ThemeToken::ToolbarText))
            .bg(theme_to_color(ThemeToken::ToolbarBackground)),
    );
    frame.render_widget(toolbar, area);
}

fn draw_status(frame: &mut Frame, area: Rect, app: &App) {
    let line = match (&app.input, &app.status) {
        (InputMode::CustomWidth(text), _) => Line::from(format!(" custom width: {text}_ ")),
        (InputMode::Normal, Some(status)) => {
            Line::styled(format!(" {status} "), fg(ThemeToken::IssueOverflow))
        }
        (InputMode::Normal, None) => Line::styled(
            " 1-9 breakpoints | c custom | 0 clear custom | l layout | z zoom | s sync | tab next | ↑↓ scroll | n/p screen | v compare | q quit ",
            fg(ThemeToken::TextMuted),
        ),
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn findings_lines(findings: Option<&Findings>) -> Vec<Line<'static>> {
    let Some(findings) = findings else {
        return vec![Line::styled("loading…", fg(ThemeToken::TextMuted))];
    };
    match findings {
        Findings::Clean => vec![Line::styled(
            Findings::CLEAN_MESSAGE,
            fg(ThemeToken::IssueClean),
        )],
        Findings::Issues(issues) => issues
            .iter()
            .map(|issue| Line::styled(format!("⚠ {}", issue.message), fg(issue.kind.token())))
            .collect(),
    }
}

/// Wireframe of the pane's elements, one row each, with the viewport edge marked.
fn wireframe_lines(pane: &Pane, names: &[Option<String>], columns: u16) -> Vec<Line<'static>> {
    let document = pane.document.borrow();
    let viewport = document.viewport_width;
    let content = document.content_width.max(viewport);
    let cells = f64::from(columns.max(1));
    let per_px = cells / content;
    let edge = ((viewport * per_px) as usize).min(columns as usize);

    let (_, ratio_y) = document
        .scroll_metrics()
        .map(|m| m.scroll_ratio())
        .unwrap_or_default();
    let mut lines = vec![Line::styled(
        format!(
            "{}px wide · scrolled {:.0}% · {:.0}% scale",
            pane.width,
            ratio_y * 100.0,
            pane.scale * 100.0
        ),
        fg(ThemeToken::TextMuted),
    )];

    for (element, name) in document.elements.iter().zip(names) {
        let probe = element.probe;
        let left = probe.rect_right - probe.rect_width;
        let start = ((left * per_px) as usize).min(columns as usize);
        let len = ((probe.rect_width * per_px).ceil() as usize).max(1);
        let mut spans = vec![Span::raw(" ".repeat(start))];
        let label = name.as_deref().unwrap_or("");
        let mut bar: Vec<char> = label.chars().chain(std::iter::repeat('█')).take(len).collect();
        if start + bar.len() > columns as usize {
            bar.truncate((columns as usize).saturating_sub(start));
        }
        let inside = edge.saturating_sub(start).min(bar.len());
        let (visible, past): (String, String) = (
            bar[..inside].iter().collect(),
            bar[inside..].iter().collect(),
        );
        spans.push(Span::styled(visible, fg(ThemeToken::SurfaceContent)));
        spans.push(Span::styled(past, fg(ThemeToken::IssueOffscreen)));
        lines.push(Line::from(spans));
    }
    lines
}

fn draw_pane(frame: &mut Frame, area: Rect, app: &App, pane: &Pane, selected: bool) {
    let mut border = fg(role_token(pane.role));
    if selected {
        border = border.add_modifier(Modifier::BOLD);
    }
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(format!(" {} ", pane.label));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let names: Vec<Option<String>> = app
        .page
        .screen(app.session.screen_id())
        .map(|screen| screen.elements.iter().map(|e| e.name.clone()).collect())
        .unwrap_or_default();
    let mut lines = wireframe_lines(pane, &names, inner.width);
    lines.push(Line::raw(""));
    if pane.available {
        lines.extend(findings_lines(pane.findings.as_ref()));
    } else {
        lines.push(Line::styled("no page model for this screen", fg(ThemeToken::TextMuted)));
    }
    frame.render_widget(Paragraph::new(lines), inner);
}

fn draw_compare(frame: &mut Frame, area: Rect, compare: &CompareSession) {
    let popup = Rect {
        x: area.x + area.width / 8,
        y: area.y + area.height / 6,
        width: area.width - area.width / 4,
        height: area.height - area.height / 3,
    };
    frame.render_widget(Clear, popup);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(fg(ThemeToken::SurfacePromoted))
        .title(format!(
            " compare · {:?} · opacity {:.0}% (m mode, [ ] opacity, x swap, n/p right, Esc close) ",
            compare.mode(),
            compare.opacity() * 100.0
        ));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(inner);
    for command in compare.commands() {
        if let CompareCommand::MountPane {
            side,
            screen,
            src,
            opacity,
            blend,
            stacked,
        } = command
        {
            let target = match (side, stacked) {
                (_, true) => inner,
                (PaneSide::Left, false) => halves[0],
                (PaneSide::Right, false) => halves[1],
            };
            let text = vec![
                Line::styled(format!("{side:?}: {screen}"), fg(ThemeToken::TextPrimary)),
                Line::styled(src, fg(ThemeToken::TextMuted)),
                Line::styled(
                    format!("opacity {:.0}% · blend {}", opacity * 100.0, blend.css()),
                    fg(ThemeToken::TextMuted),
                ),
            ];
            let offset = if stacked && side == PaneSide::Right { 4 } else { 0 };
            let area = Rect {
                y: target.y + offset,
                height: target.height.saturating_sub(offset),
                ..target
            };
            frame.render_widget(Paragraph::new(text), area);
        }
    }
}

fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0), Constraint::Length(1)])
        .split(area);
    draw_toolbar(frame, rows[0], app);
    draw_status(frame, rows[2], app);

    if let Some(message) = &app.empty_message {
        let empty = Paragraph::new(message.as_str())
            .style(fg(ThemeToken::EmptyState))
            .block(Block::default().borders(Borders::ALL).border_style(fg(ThemeToken::Border)));
        frame.render_widget(empty, rows[1]);
    } else {
        let roles: Vec<SurfaceRole> = app.frames.iter().map(|p| p.role).collect();
        let areas = pane_areas(app.layout(), rows[1], &roles);
        for (index, (pane, pane_area)) in app.frames.iter().zip(areas).enumerate() {
            draw_pane(frame, pane_area, app, pane, index == app.selected());
        }
    }

    if let Some(compare) = app.compare.get() {
        draw_compare(frame, rows[1], compare);
    }
}

fn container_px(width: u16, height: u16) -> (f64, f64) {
    (
        f64::from(width) * CELL_WIDTH_PX,
        f64::from(height.saturating_sub(2)) * CELL_HEIGHT_PX,
    )
}

/// Handle a key while the compare overlay is open.
fn compare_key(app: &mut App, code: KeyCode) {
    if code == KeyCode::Esc {
        app.compare.handle_key(CLOSE_KEY);
        return;
    }
    let Some(compare) = app.compare.get_mut() else {
        return;
    };
    match code {
        KeyCode::Char('m') => {
            compare.cycle_mode();
        }
        KeyCode::Char('[') => compare.set_opacity(compare.opacity() - OPACITY_STEP),
        KeyCode::Char(']') => compare.set_opacity(compare.opacity() + OPACITY_STEP),
        KeyCode::Char('x') => compare.swap(),
        KeyCode::Char('n') => {
            compare.step_right(1);
        }
        KeyCode::Char('p') => {
            compare.step_right(-1);
        }
        KeyCode::Char('v') => {
            app.compare.close();
        }
        _ => {}
    }
}

/// Handle a key in the preview. Returns false to quit.
fn preview_key(app: &mut App, code: KeyCode) -> bool {
    if let InputMode::CustomWidth(text) = &mut app.input {
        match code {
            KeyCode::Char(c) if c.is_ascii_digit() => text.push(c),
            KeyCode::Backspace => {
                text.pop();
            }
            KeyCode::Enter => {
                let text = std::mem::take(text);
                app.input = InputMode::Normal;
                app.submit_custom_width(&text);
            }
            KeyCode::Esc => app.input = InputMode::Normal,
            _ => {}
        }
        return true;
    }

    match code {
        KeyCode::Char('q') | KeyCode::Esc => return false,
        KeyCode::Char('0') => app.apply(|s| Ok(s.clear_custom())),
        KeyCode::Char(c @ '1'..='9') => {
            let index = c as usize - '1' as usize;
            app.toggle_breakpoint(index);
        }
        KeyCode::Char('c') => app.input = InputMode::CustomWidth(String::new()),
        KeyCode::Char('l') => app.cycle_layout(),
        KeyCode::Char('z') => app.toggle_zoom(),
        KeyCode::Char('s') => app.toggle_sync(),
        KeyCode::Char('n') => app.apply(|s| Ok(s.next_screen())),
        KeyCode::Char('p') => app.apply(|s| Ok(s.previous_screen())),
        KeyCode::Char('v') => app.toggle_compare(),
        KeyCode::Tab => app.select_next(),
        KeyCode::Down => {
            app.scroll_selected(SCROLL_STEP);
        }
        KeyCode::Up => {
            app.scroll_selected(-SCROLL_STEP);
        }
        _ => {}
    }
    true
}

pub fn run_tui(app: &mut App) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let size = terminal.size()?;
    let (width, height) = container_px(size.width, size.height);
    app.resize(width, height);

    loop {
        terminal.draw(|frame| draw(frame, app))?;
        app.tick();

        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if app.compare.is_open() {
                        compare_key(app, key.code);
                    } else if !preview_key(app, key.code) {
                        break;
                    }
                }
                Event::Mouse(mouse) => match mouse.kind {
                    MouseEventKind::ScrollDown => {
                        app.scroll_selected(SCROLL_STEP);
                    }
                    MouseEventKind::ScrollUp => {
                        app.scroll_selected(-SCROLL_STEP);
                    }
                    _ => {}
                },
                Event::Resize(columns, rows) => {
                    let (width, height) = container_px(columns, rows);
                    app.resize(width, height);
                }
                _ => {}
            }
        }
    }

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn focus_layout_gives_promoted_pane_the_wide_column() {
        let area = Rect::new(0, 0, 100, 30);
        let roles = [SurfaceRole::Thumbnail, SurfaceRole::Promoted, SurfaceRole::Thumbnail];
        let areas = pane_areas(LayoutMode::Focus, area, &roles);
        assert_eq!(areas[1].width, 70);
        assert_eq!(areas[0].x, 70);
        assert_eq!(areas[2].x, 70);
        assert!(areas[2].y > areas[0].y);
    }

    #[test]
    fn parallel_row_splits_evenly() {
        let areas = pane_areas(LayoutMode::ParallelRow, Rect::new(0, 0, 90, 20), &[SurfaceRole::Main; 3]);
        assert_eq!(areas.iter().map(|a| a.width).collect::<Vec<_>>(), [30, 30, 30]);
    }
}
