use std::io::{self, Write};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use crossterm::terminal::ClearType;
use crossterm::{cursor, execute, queue, terminal};

use jsonpane::JsonViewer;
use jsonpane::ui::paint::paint_lines;
use jsonpane::ui::span::Span;
use jsonpane::ui::style::{Color, Style};

const SAMPLE: &str = r#"{
  "title": "JSON viewer",
  "count": 3,
  "active": true,
  "items": [
    {"id": 1, "name": "alpha"},
    {"id": 2, "name": "beta"},
    {"id": 3, "name": "gamma", "tags": ["x", "y", "z"]}
  ],
  "meta": {"owner": null}
}"#;

const HINTS: &str = "↑↓ move · → expand · ← collapse · enter edit · space toggle · \
x/c all · m mode · y copy · ctrl+f search · ctrl+c quit";

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
    }
}

fn run() -> io::Result<()> {
    terminal::enable_raw_mode()?;
    let mut out = io::stdout();
    execute!(out, terminal::EnterAlternateScreen, cursor::Hide)?;

    let result = event_loop(&mut out);

    execute!(out, cursor::Show, terminal::LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    result
}

fn event_loop(out: &mut impl Write) -> io::Result<()> {
    let mut viewer = JsonViewer::new(SAMPLE).with_max_visible(20);
    let mut redraw = true;

    loop {
        if redraw {
            draw(out, &viewer)?;
            redraw = false;
        }

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }
        match event::read()? {
            Event::Key(key) => {
                if key.modifiers.contains(KeyModifiers::CONTROL)
                    && key.code == KeyCode::Char('c')
                {
                    break;
                }
                if viewer.on_key(key) {
                    redraw = true;
                }
            }
            Event::Resize(..) => redraw = true,
            _ => {}
        }
    }

    Ok(())
}

fn draw(out: &mut impl Write, viewer: &JsonViewer) -> io::Result<()> {
    queue!(
        out,
        cursor::Hide,
        terminal::Clear(ClearType::All),
        cursor::MoveTo(0, 0)
    )?;

    let mut lines = viewer.render_lines();
    lines.push(Vec::new());
    lines.push(vec![Span::styled(HINTS, Style::new().color(Color::DarkGrey))]);
    paint_lines(out, &lines)?;

    if let Some(pos) = viewer.cursor_pos() {
        queue!(out, cursor::MoveTo(pos.col, pos.row), cursor::Show)?;
    }
    out.flush()
}
