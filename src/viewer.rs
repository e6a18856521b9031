use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use unicode_width::UnicodeWidthStr;

use crate::core::path::NodePath;
use crate::core::value::{JsonValue, ValueKind};
use crate::ui::scroll::ScrollState;
use crate::ui::span::{Span, SpanLine};
use crate::ui::style::{Color, Style};
use crate::view::build;
use crate::view::edit::{EditSession, parse_edited};
use crate::view::node::{DisplayMode, RenderNode};
use crate::view::search;
use crate::view::state;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorPos {
    pub col: u16,
    pub row: u16,
}

/// Collapsible JSON tree viewer with inline leaf editing.
///
/// The viewer owns all of its state explicitly: the raw source text, the
/// parsed document (the single source of truth, replaced wholesale on
/// commit, never mutated in place), the display mode, the transient render
/// rows, and the optional in-flight edit. Every operation runs to completion
/// synchronously inside one key-event call.
pub struct JsonViewer {
    source: String,
    document: Option<JsonValue>,
    parse_error: Option<String>,
    mode: DisplayMode,
    nodes: Vec<RenderNode>,
    visible: Vec<usize>,
    active: usize,
    scroll: ScrollState,
    query: String,
    search_visible: bool,
    search_focus: bool,
    edit: Option<EditSession>,
}

impl JsonViewer {
    pub fn new(source: impl Into<String>) -> Self {
        let mut this = Self {
            source: source.into(),
            document: None,
            parse_error: None,
            mode: DisplayMode::Compact,
            nodes: Vec::new(),
            visible: Vec::new(),
            active: 0,
            scroll: ScrollState::new(None),
            query: String::new(),
            search_visible: false,
            search_focus: false,
            edit: None,
        };
        this.apply();
        this
    }

    pub fn with_max_visible(mut self, max_visible: usize) -> Self {
        self.scroll.max_visible = if max_visible == 0 {
            None
        } else {
            Some(max_visible)
        };
        self.scroll.ensure_visible(self.active, self.visible.len());
        self
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn document(&self) -> Option<&JsonValue> {
        self.document.as_ref()
    }

    pub fn parse_error(&self) -> Option<&str> {
        self.parse_error.as_deref()
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn nodes(&self) -> &[RenderNode] {
        &self.nodes
    }

    pub fn editing(&self) -> Option<&EditSession> {
        self.edit.as_ref()
    }

    pub fn active_node(&self) -> Option<&RenderNode> {
        self.visible.get(self.active).map(|&row| &self.nodes[row])
    }

    /// Replaces the source text and re-parses it. A malformed source records
    /// the parser's message and renders no tree; the previously parsed
    /// document stays intact until a later apply succeeds.
    pub fn apply_source(&mut self, source: &str) {
        self.source = source.to_string();
        self.apply();
    }

    fn apply(&mut self) {
        match JsonValue::parse(&self.source) {
            Ok(document) => {
                self.document = Some(document);
                self.parse_error = None;
                self.rebuild();
            }
            Err(err) => {
                self.parse_error = Some(err.to_string());
            }
        }
    }

    /// Tears the row list down and rebuilds it from the document, carrying
    /// over the expansion set of mounted rows, the search markers, the
    /// active row (by path), and the scroll offset.
    fn rebuild(&mut self) {
        let Some(document) = &self.document else {
            self.nodes.clear();
            self.visible.clear();
            self.active = 0;
            return;
        };

        let preserved = state::capture(&self.nodes);
        let active_path = self
            .visible
            .get(self.active)
            .map(|&row| self.nodes[row].path.clone());
        let offset = self.scroll.offset;

        let mut nodes = build::build_nodes(document, self.mode);
        state::restore(&mut nodes, &preserved);
        search::apply_search(&mut nodes, &self.query);
        self.nodes = nodes;
        self.refresh_visible();

        if let Some(path) = active_path
            && let Some(pos) = self
                .visible
                .iter()
                .position(|&row| self.nodes[row].path == path)
        {
            self.active = pos;
        }
        ScrollState::clamp_active(&mut self.active, self.visible.len());
        self.scroll.offset = offset;
        self.scroll.clamp_offset(self.visible.len());
        self.scroll.ensure_visible(self.active, self.visible.len());
    }

    fn refresh_visible(&mut self) {
        self.visible = build::visible_rows(&self.nodes);
        ScrollState::clamp_active(&mut self.active, self.visible.len());
    }

    pub fn move_active(&mut self, delta: isize) -> bool {
        let len = self.visible.len();
        if len == 0 {
            return false;
        }
        let next = ((self.active as isize + delta).rem_euclid(len as isize)) as usize;
        if next == self.active {
            return false;
        }
        self.active = next;
        self.scroll.ensure_visible(self.active, len);
        true
    }

    /// Puts the active row on the given path, if it is mounted.
    pub fn select_path(&mut self, path: &NodePath) -> bool {
        let Some(pos) = self
            .visible
            .iter()
            .position(|&row| &self.nodes[row].path == path)
        else {
            return false;
        };
        self.active = pos;
        self.scroll.ensure_visible(self.active, self.visible.len());
        true
    }

    pub fn toggle_active(&mut self) -> bool {
        let Some(&row) = self.visible.get(self.active) else {
            return false;
        };
        if !self.nodes[row].is_container() {
            return false;
        }
        self.nodes[row].expanded = !self.nodes[row].expanded;
        self.refresh_visible();
        self.scroll.ensure_visible(self.active, self.visible.len());
        true
    }

    pub fn expand_active(&mut self) -> bool {
        let Some(&row) = self.visible.get(self.active) else {
            return false;
        };
        if !self.nodes[row].is_container() || self.nodes[row].expanded {
            return false;
        }
        self.nodes[row].expanded = true;
        self.refresh_visible();
        true
    }

    /// Collapses the active container, or jumps to the parent row when the
    /// active row is a leaf or already collapsed.
    pub fn collapse_active(&mut self) -> bool {
        let Some(&row) = self.visible.get(self.active) else {
            return false;
        };
        if self.nodes[row].is_container() && self.nodes[row].expanded {
            self.nodes[row].expanded = false;
            self.refresh_visible();
            self.scroll.ensure_visible(self.active, self.visible.len());
            return true;
        }
        let parents = build::parent_rows(&self.nodes);
        let Some(parent) = parents[row] else {
            return false;
        };
        if let Some(pos) = self.visible.iter().position(|&r| r == parent) {
            self.active = pos;
            self.scroll.ensure_visible(self.active, self.visible.len());
            return true;
        }
        false
    }

    pub fn expand_all(&mut self) {
        state::expand_all(&mut self.nodes);
        self.refresh_visible();
        self.scroll.ensure_visible(self.active, self.visible.len());
    }

    /// The one operation that resets the expansion state outright: after
    /// this, only the root-expanded default survives the next rebuild.
    pub fn collapse_all(&mut self) {
        state::collapse_all(&mut self.nodes);
        self.refresh_visible();
        self.scroll.ensure_visible(self.active, self.visible.len());
    }

    pub fn set_mode(&mut self, mode: DisplayMode) {
        if self.mode == mode {
            return;
        }
        self.mode = mode;
        self.rebuild();
    }

    pub fn toggle_mode(&mut self) {
        self.mode = self.mode.toggled();
        self.rebuild();
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
        search::apply_search(&mut self.nodes, &self.query);
        self.refresh_visible();
        self.scroll.ensure_visible(self.active, self.visible.len());
    }

    /// Switches the active leaf into the editing state, seeding the field
    /// with the leaf's current text, fully selected. Re-activating the leaf
    /// already being edited is a no-op, and a second session cannot start
    /// while one is in flight.
    pub fn begin_edit(&mut self) -> bool {
        let Some(&row) = self.visible.get(self.active) else {
            return false;
        };
        let node = &self.nodes[row];
        if node.is_container() || self.edit.is_some() {
            return false;
        }
        let Some(document) = &self.document else {
            return false;
        };
        let Some(value) = node.path.get(document) else {
            return false;
        };
        let Some(seed) = value.edit_seed() else {
            return false;
        };
        self.edit = Some(EditSession::new(node.path.clone(), node.kind, seed));
        true
    }

    /// Commits the in-flight edit. On valid input the new value is set on a
    /// fresh copy of the document, the copy is reserialized, and the text is
    /// fed back through the apply path, so the rebuild preserves expansion
    /// and scroll. On invalid input the session stays open, flagged, with
    /// the document untouched.
    pub fn commit_edit(&mut self) -> bool {
        let Some(session) = &mut self.edit else {
            return false;
        };
        match parse_edited(session.kind, session.field.value()) {
            Ok(new_value) => {
                let Some(document) = &self.document else {
                    self.edit = None;
                    return false;
                };
                let updated = session.path.set(document.clone(), new_value);
                self.source = updated.to_pretty();
                self.edit = None;
                self.apply();
                true
            }
            Err(_) => {
                session.invalid = true;
                false
            }
        }
    }

    /// Discards the field's text unconditionally; the document is untouched
    /// and the leaf goes back to its display state.
    pub fn cancel_edit(&mut self) {
        self.edit = None;
    }

    /// Puts the current source text on the system clipboard. Best effort:
    /// a missing or denied clipboard is not surfaced to the user.
    pub fn copy_source(&self) {
        if let Ok(mut clipboard) = arboard::Clipboard::new() {
            let _ = clipboard.set_text(self.source.clone());
        }
    }

    fn toggle_search(&mut self) {
        self.search_visible = !self.search_visible;
        if self.search_visible {
            self.search_focus = true;
            return;
        }
        self.search_focus = false;
        self.set_query("");
    }

    pub fn on_key(&mut self, key: KeyEvent) -> bool {
        if key.kind != KeyEventKind::Press {
            return false;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('f') {
            self.toggle_search();
            return true;
        }
        if self.search_focus {
            return self.handle_search_key(key);
        }
        if self.edit.is_some() {
            return self.handle_edit_key(key);
        }
        self.handle_normal_key(key)
    }

    fn handle_search_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Down => {
                self.search_focus = false;
                true
            }
            KeyCode::Backspace => {
                let mut query = self.query.clone();
                if query.pop().is_some() {
                    self.set_query(&query);
                }
                true
            }
            KeyCode::Char(ch)
                if key.modifiers == KeyModifiers::NONE
                    || key.modifiers == KeyModifiers::SHIFT =>
            {
                let mut query = self.query.clone();
                query.push(ch);
                self.set_query(&query);
                true
            }
            _ => false,
        }
    }

    fn handle_edit_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Enter => {
                self.commit_edit();
                true
            }
            KeyCode::Esc => {
                self.cancel_edit();
                true
            }
            _ => {
                let Some(session) = &mut self.edit else {
                    return false;
                };
                match key.code {
                    KeyCode::Left => session.field.move_left(),
                    KeyCode::Right => session.field.move_right(),
                    KeyCode::Home => session.field.move_home(),
                    KeyCode::End => session.field.move_end(),
                    KeyCode::Backspace => {
                        session.field.backspace();
                        session.invalid = false;
                    }
                    KeyCode::Char(ch)
                        if key.modifiers == KeyModifiers::NONE
                            || key.modifiers == KeyModifiers::SHIFT =>
                    {
                        session.field.insert_char(ch);
                        session.invalid = false;
                    }
                    _ => return false,
                }
                true
            }
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers != KeyModifiers::NONE {
            return false;
        }
        match key.code {
            KeyCode::Up => self.move_active(-1),
            KeyCode::Down => self.move_active(1),
            KeyCode::Right => self.expand_active(),
            KeyCode::Left => self.collapse_active(),
            KeyCode::Char(' ') => self.toggle_active(),
            KeyCode::Enter => {
                if self.active_node().map(|n| n.is_leaf()).unwrap_or(false) {
                    self.begin_edit()
                } else {
                    self.toggle_active()
                }
            }
            KeyCode::Char('x') => {
                self.expand_all();
                true
            }
            KeyCode::Char('c') => {
                self.collapse_all();
                true
            }
            KeyCode::Char('m') => {
                self.toggle_mode();
                true
            }
            KeyCode::Char('y') => {
                self.copy_source();
                true
            }
            _ => false,
        }
    }

    fn value_style(kind: ValueKind) -> Style {
        match kind {
            ValueKind::String => Style::new().color(Color::Green),
            ValueKind::Number => Style::new().color(Color::Magenta),
            ValueKind::Bool => Style::new().color(Color::Cyan),
            ValueKind::Null => Style::new().color(Color::DarkGrey),
            ValueKind::Array | ValueKind::Object => Style::new().color(Color::DarkGrey),
        }
    }

    fn header_rows(&self) -> u16 {
        if self.search_visible { 1 } else { 0 }
    }

    pub fn render_lines(&self) -> Vec<SpanLine> {
        let mut lines = Vec::new();

        if let Some(error) = &self.parse_error {
            lines.push(vec![
                Span::styled("parse error: ", Style::new().color(Color::Red).bold()),
                Span::styled(error.clone(), Style::new().color(Color::Red)),
            ]);
            return lines;
        }

        if self.search_visible {
            lines.push(vec![
                Span::styled("search: ", Style::new().color(Color::DarkGrey)),
                Span::new(self.query.clone()),
            ]);
        }

        let total = self.visible.len();
        let (start, end) = self.scroll.visible_range(total);
        for pos in start..end {
            let row = self.visible[pos];
            lines.push(self.render_row(row, pos == self.active));
        }

        if let Some(footer) = self.scroll.footer(total) {
            lines.push(vec![Span::styled(
                footer,
                Style::new().color(Color::DarkGrey),
            )]);
        }

        if let Some(node) = self.active_node() {
            lines.push(vec![Span::styled(
                format!("{} · {}", node.path, node.kind.name()),
                Style::new().color(Color::DarkGrey),
            )]);
        }

        lines
    }

    fn render_row(&self, row: usize, active: bool) -> SpanLine {
        let node = &self.nodes[row];
        let dim = Style::new().color(Color::DarkGrey);

        let cursor = if active {
            Span::styled("❯ ", Style::new().color(Color::Yellow))
        } else {
            Span::new("  ")
        };
        let mut line = vec![cursor, Span::new("  ".repeat(node.depth))];

        let icon = if node.is_container() {
            if node.expanded { "▼ " } else { "▶ " }
        } else {
            "  "
        };
        line.push(Span::styled(icon, dim));

        let matched_style = Style::new().color(Color::Yellow).bold();
        let label_style = if node.matched {
            matched_style
        } else if node.is_container() {
            Style::new().color(Color::Blue).bold()
        } else {
            Style::new().color(Color::Blue)
        };

        match &node.label {
            Some(label) => {
                line.push(Span::styled(label.clone(), label_style));
                line.push(Span::styled(": ", dim));
            }
            None if node.depth > 0 => {
                // Positional marker for annotated-mode array items.
                line.push(Span::styled("- ", dim));
            }
            None => {}
        }

        if let Some(session) = &self.edit
            && session.path == node.path
        {
            let field_style = if session.invalid {
                Style::new().color(Color::White).background(Color::Red)
            } else {
                Style::new().color(Color::White).background(Color::Blue)
            };
            line.push(Span::styled(session.field.value().to_string(), field_style));
            if session.invalid {
                line.push(Span::styled(" invalid", Style::new().color(Color::Red)));
            }
            return line;
        }

        let value_style = if node.matched {
            matched_style
        } else {
            Self::value_style(node.kind)
        };
        line.push(Span::styled(node.value_text.clone(), value_style));
        line
    }

    /// Terminal cursor position for the host, when a text field is active.
    pub fn cursor_pos(&self) -> Option<CursorPos> {
        if self.search_focus {
            let col = "search: ".width() + self.query.width();
            return Some(CursorPos {
                col: col as u16,
                row: 0,
            });
        }

        let session = self.edit.as_ref()?;
        let pos = self
            .visible
            .iter()
            .position(|&row| self.nodes[row].path == session.path)?;
        let (start, end) = self.scroll.visible_range(self.visible.len());
        if pos < start || pos >= end {
            return None;
        }

        let node = &self.nodes[self.visible[pos]];
        let mut col = "❯ ".width() + node.depth * 2 + 2;
        match &node.label {
            Some(label) => col += label.width() + 2,
            None if node.depth > 0 => col += 2,
            None => {}
        }
        let prefix: String = session
            .field
            .value()
            .chars()
            .take(session.field.cursor())
            .collect();
        col += prefix.width();

        Some(CursorPos {
            col: col as u16,
            row: self.header_rows() + (pos - start) as u16,
        })
    }
}
