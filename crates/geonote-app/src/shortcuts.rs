//! Keyboard shortcut registry and documentation.

use geonote_core::ToolKind;

/// What a shortcut does to the notebook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    Tool(ToolKind),
    ToggleAngles,
    AddPage,
    RemovePage,
    Cancel,
}

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub ctrl: bool,
    pub shift: bool,
    pub description: &'static str,
    pub action: ShortcutAction,
}

impl Shortcut {
    pub const fn new(
        key: &'static str,
        ctrl: bool,
        shift: bool,
        description: &'static str,
        action: ShortcutAction,
    ) -> Self {
        Self {
            key,
            ctrl,
            shift,
            description,
            action,
        }
    }

    const fn plain(key: &'static str, description: &'static str, action: ShortcutAction) -> Self {
        Self::new(key, false, false, description, action)
    }

    /// Format the shortcut for display (e.g., "Ctrl+S").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.key);
        parts.join("+")
    }

    /// Whether a key name reported by the window matches this shortcut.
    fn matches(&self, key: &str, ctrl: bool) -> bool {
        self.ctrl == ctrl && self.key.eq_ignore_ascii_case(key)
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        use ShortcutAction::*;
        vec![
            Shortcut::plain("V", "Select tool", Tool(ToolKind::Select)),
            Shortcut::plain("P", "Pen tool", Tool(ToolKind::Pen)),
            Shortcut::plain("E", "Eraser tool", Tool(ToolKind::Eraser)),
            Shortcut::plain("L", "Line tool", Tool(ToolKind::Line)),
            Shortcut::plain("O", "Point tool", Tool(ToolKind::Point)),
            Shortcut::plain("T", "Label tool", Tool(ToolKind::Label)),
            Shortcut::plain("C", "Curve tool", Tool(ToolKind::Curve)),
            Shortcut::plain("A", "Toggle angles on selected points", ToggleAngles),
            Shortcut::plain("+", "Add page", AddPage),
            Shortcut::plain("-", "Remove last page", RemovePage),
            Shortcut::plain("Escape", "Cancel current action", Cancel),
        ]
    }

    /// Look up the action bound to a key.
    pub fn action_for(key: &str, ctrl: bool) -> Option<ShortcutAction> {
        let key = if key == "=" { "+" } else { key };
        Self::all()
            .into_iter()
            .find(|s| s.matches(key, ctrl))
            .map(|s| s.action)
    }

    /// Print all shortcuts to console.
    pub fn print_all() {
        println!("\n=== Keyboard Shortcuts ===");
        for shortcut in Self::all() {
            println!("  {:20} {}", shortcut.format(), shortcut.description);
        }
        println!();
    }
}
