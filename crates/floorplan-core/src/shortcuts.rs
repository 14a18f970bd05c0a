//! Keyboard shortcut table and router.
//!
//! Shortcuts are plain data: a key combination, a guard saying when the
//! binding is live, and the action it triggers. [`route`] walks the table
//! and returns the first live binding matching a key press.

use crate::input::{Direction, Key, KeyPress};

/// Something the editor can be asked to do from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Save,
    Undo,
    Redo,
    ZoomIn,
    ZoomOut,
    ZoomReset,
    Nudge(Direction),
    Resize(Direction),
    Deselect,
}

/// When a binding is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    Always,
    Editing,
    EditingWithSelection,
}

/// Editor state consulted by guards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GuardContext {
    pub editing: bool,
    pub has_selection: bool,
}

impl Guard {
    pub fn allows(self, cx: GuardContext) -> bool {
        match self {
            Guard::Always => true,
            Guard::Editing => cx.editing,
            Guard::EditingWithSelection => cx.editing && cx.has_selection,
        }
    }
}

/// A key plus required modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyCombo {
    pub key: Key,
    /// Ctrl or Cmd held.
    pub command: bool,
    /// `None` accepts either state (e.g. `+` usually needs Shift).
    pub shift: Option<bool>,
}

impl KeyCombo {
    pub const fn new(key: Key, command: bool, shift: Option<bool>) -> Self {
        Self { key, command, shift }
    }

    pub fn matches(&self, press: &KeyPress) -> bool {
        self.key == press.key
            && self.command == press.modifiers.command()
            && self.shift.is_none_or(|shift| shift == press.modifiers.shift)
    }
}

/// A keyboard shortcut definition.
#[derive(Debug, Clone, Copy)]
pub struct Shortcut {
    pub combo: KeyCombo,
    pub guard: Guard,
    pub action: Action,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(combo: KeyCombo, guard: Guard, action: Action, description: &'static str) -> Self {
        Self {
            combo,
            guard,
            action,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+Shift+Z").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.combo.command {
            parts.push("Ctrl".to_string());
        }
        if self.combo.shift == Some(true) {
            parts.push("Shift".to_string());
        }
        parts.push(self.combo.key.name());
        parts.join("+")
    }
}

const fn char_key(c: char, command: bool) -> KeyCombo {
    KeyCombo::new(Key::Char(c), command, None)
}

const fn arrow(direction: Direction, shift: bool) -> KeyCombo {
    KeyCombo::new(Key::Arrow(direction), false, Some(shift))
}

/// All bindings, checked in order.
pub static SHORTCUTS: &[Shortcut] = &[
    Shortcut::new(KeyCombo::new(Key::Char('s'), true, Some(false)), Guard::Editing, Action::Save, "Save floor plans"),
    Shortcut::new(KeyCombo::new(Key::Char('z'), true, Some(false)), Guard::Editing, Action::Undo, "Undo"),
    Shortcut::new(KeyCombo::new(Key::Char('z'), true, Some(true)), Guard::Editing, Action::Redo, "Redo"),
    Shortcut::new(char_key('+', false), Guard::Always, Action::ZoomIn, "Zoom in"),
    Shortcut::new(char_key('=', false), Guard::Always, Action::ZoomIn, "Zoom in"),
    Shortcut::new(char_key('=', true), Guard::Always, Action::ZoomIn, "Zoom in"),
    Shortcut::new(char_key('-', false), Guard::Always, Action::ZoomOut, "Zoom out"),
    Shortcut::new(char_key('-', true), Guard::Always, Action::ZoomOut, "Zoom out"),
    Shortcut::new(char_key('0', false), Guard::Always, Action::ZoomReset, "Reset zoom"),
    Shortcut::new(char_key('0', true), Guard::Always, Action::ZoomReset, "Reset zoom"),
    Shortcut::new(arrow(Direction::Left, false), Guard::EditingWithSelection, Action::Nudge(Direction::Left), "Move selection left"),
    Shortcut::new(arrow(Direction::Right, false), Guard::EditingWithSelection, Action::Nudge(Direction::Right), "Move selection right"),
    Shortcut::new(arrow(Direction::Up, false), Guard::EditingWithSelection, Action::Nudge(Direction::Up), "Move selection up"),
    Shortcut::new(arrow(Direction::Down, false), Guard::EditingWithSelection, Action::Nudge(Direction::Down), "Move selection down"),
    Shortcut::new(arrow(Direction::Left, true), Guard::EditingWithSelection, Action::Resize(Direction::Left), "Shrink zone width"),
    Shortcut::new(arrow(Direction::Right, true), Guard::EditingWithSelection, Action::Resize(Direction::Right), "Grow zone width"),
    Shortcut::new(arrow(Direction::Up, true), Guard::EditingWithSelection, Action::Resize(Direction::Up), "Shrink zone height"),
    Shortcut::new(arrow(Direction::Down, true), Guard::EditingWithSelection, Action::Resize(Direction::Down), "Grow zone height"),
    Shortcut::new(KeyCombo::new(Key::Escape, false, None), Guard::Always, Action::Deselect, "Clear selection"),
];

/// Find the action bound to a key press in the current context.
pub fn route(press: &KeyPress, cx: GuardContext) -> Option<Action> {
    SHORTCUTS
        .iter()
        .find(|shortcut| shortcut.combo.matches(press) && shortcut.guard.allows(cx))
        .map(|shortcut| shortcut.action)
}

/// Log every shortcut, for `--help`-style output.
pub fn log_all() {
    log::info!("Keyboard shortcuts:");
    for shortcut in SHORTCUTS {
        log::info!("  {:20} {}", shortcut.format(), shortcut.description);
    }
}
