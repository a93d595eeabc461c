//! Keyboard shortcuts, editor commands and context menu state.

use crate::canvas::Canvas;
use crate::input::Modifiers;

/// Editing commands reachable from the keyboard and the context menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditorCommand {
    Delete,
    Copy,
    Cut,
    Paste,
    Undo,
    Redo,
    /// Abort the current gesture.
    Cancel,
}

/// Map a key press to a command. `key` uses DOM-style names ("Delete",
/// "Escape", "c"); letters are matched case-insensitively.
pub fn command_for_key(key: &str, modifiers: Modifiers) -> Option<EditorCommand> {
    match key {
        "Delete" | "Backspace" => return Some(EditorCommand::Delete),
        "Escape" => return Some(EditorCommand::Cancel),
        _ => {}
    }
    if !modifiers.command() {
        return None;
    }
    match key.to_ascii_lowercase().as_str() {
        "c" => Some(EditorCommand::Copy),
        "x" => Some(EditorCommand::Cut),
        "v" => Some(EditorCommand::Paste),
        "z" if modifiers.shift => Some(EditorCommand::Redo),
        "z" => Some(EditorCommand::Undo),
        "y" => Some(EditorCommand::Redo),
        _ => None,
    }
}

impl Canvas {
    /// Run an edit command. Returns true if the scene or clipboard changed.
    ///
    /// `Cancel` is a no-op here; gestures belong to the event handler.
    pub fn execute(&mut self, command: EditorCommand) -> bool {
        log::debug!("execute {command:?}");
        match command {
            EditorCommand::Delete => self.delete_selected(),
            EditorCommand::Copy => self.copy(),
            EditorCommand::Cut => self.cut(),
            EditorCommand::Paste => self.paste().is_some(),
            EditorCommand::Undo => self.undo(),
            EditorCommand::Redo => self.redo(),
            EditorCommand::Cancel => false,
        }
    }
}

/// Which context menu entries are enabled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContextMenuState {
    pub cut: bool,
    pub copy: bool,
    pub paste: bool,
    pub delete: bool,
}

impl ContextMenuState {
    pub fn for_canvas(canvas: &Canvas) -> Self {
        let has_selection = canvas.document.selected().is_some();
        let deletable = canvas.can_delete();
        Self {
            cut: deletable,
            copy: has_selection,
            paste: !canvas.clipboard.is_empty(),
            delete: deletable,
        }
    }

    /// Whether `command` may run from the menu.
    pub fn allows(&self, command: EditorCommand) -> bool {
        match command {
            EditorCommand::Cut => self.cut,
            EditorCommand::Copy => self.copy,
            EditorCommand::Paste => self.paste,
            EditorCommand::Delete => self.delete,
            EditorCommand::Undo | EditorCommand::Redo | EditorCommand::Cancel => false,
        }
    }
}

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub ctrl: bool,
    pub shift: bool,
    pub command: EditorCommand,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(
        key: &'static str,
        ctrl: bool,
        shift: bool,
        command: EditorCommand,
        description: &'static str,
    ) -> Self {
        Self {
            key,
            ctrl,
            shift,
            command,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+Shift+Z").
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
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new("Delete", false, false, EditorCommand::Delete, "Delete selection"),
            Shortcut::new("Backspace", false, false, EditorCommand::Delete, "Delete selection"),
            Shortcut::new("C", true, false, EditorCommand::Copy, "Copy selection"),
            Shortcut::new("X", true, false, EditorCommand::Cut, "Cut selection"),
            Shortcut::new("V", true, false, EditorCommand::Paste, "Paste"),
            Shortcut::new("Z", true, false, EditorCommand::Undo, "Undo"),
            Shortcut::new("Z", true, true, EditorCommand::Redo, "Redo"),
            Shortcut::new("Y", true, false, EditorCommand::Redo, "Redo"),
            Shortcut::new("Escape", false, false, EditorCommand::Cancel, "Cancel gesture"),
        ]
    }

    /// Help text, one shortcut per line.
    pub fn help_text() -> String {
        Self::all()
            .iter()
            .map(|s| format!("{:<14} {}", s.format(), s.description))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Frame, Rectangle, Shape};

    fn ctrl() -> Modifiers {
        Modifiers {
            ctrl: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(command_for_key("Delete", Modifiers::default()), Some(EditorCommand::Delete));
        assert_eq!(command_for_key("Backspace", Modifiers::default()), Some(EditorCommand::Delete));
        assert_eq!(command_for_key("Escape", Modifiers::default()), Some(EditorCommand::Cancel));
        assert_eq!(command_for_key("c", ctrl()), Some(EditorCommand::Copy));
        assert_eq!(command_for_key("C", ctrl()), Some(EditorCommand::Copy));
        assert_eq!(command_for_key("c", Modifiers::default()), None);
        assert_eq!(command_for_key("z", ctrl()), Some(EditorCommand::Undo));
        let redo = Modifiers {
            shift: true,
            meta: true,
            ..Default::default()
        };
        assert_eq!(command_for_key("Z", redo), Some(EditorCommand::Redo));
        assert_eq!(command_for_key("q", ctrl()), None);
    }

    #[test]
    fn test_registry_matches_key_mapping() {
        for shortcut in ShortcutRegistry::all() {
            let modifiers = Modifiers {
                ctrl: shortcut.ctrl,
                shift: shortcut.shift,
                ..Default::default()
            };
            assert_eq!(command_for_key(shortcut.key, modifiers), Some(shortcut.command));
        }
        assert!(ShortcutRegistry::help_text().contains("Ctrl+Shift+Z"));
    }

    #[test]
    fn test_execute_commands() {
        let mut canvas = Canvas::new();
        let shape = Shape::Rect(Rectangle::new(Frame::new(0.0, 0.0, 10.0, 10.0)));
        let id = shape.id();
        canvas.document.add_shape(shape);
        canvas.select(id);

        assert!(canvas.execute(EditorCommand::Copy));
        assert!(canvas.execute(EditorCommand::Paste));
        assert_eq!(canvas.document.len(), 2);
        assert!(canvas.execute(EditorCommand::Undo));
        assert_eq!(canvas.document.len(), 1);
        assert!(canvas.execute(EditorCommand::Redo));
        assert_eq!(canvas.document.len(), 2);
        assert!(canvas.execute(EditorCommand::Delete));
        assert_eq!(canvas.document.len(), 1);
        assert!(!canvas.execute(EditorCommand::Cancel));
    }

    #[test]
    fn test_context_menu_state() {
        let mut canvas = Canvas::new();
        assert_eq!(ContextMenuState::for_canvas(&canvas), ContextMenuState::default());

        let shape = Shape::Rect(Rectangle::new(Frame::new(0.0, 0.0, 10.0, 10.0)));
        let id = shape.id();
        canvas.document.add_shape(shape);
        canvas.select(id);
        let menu = ContextMenuState::for_canvas(&canvas);
        assert!(menu.cut && menu.copy && menu.delete);
        assert!(!menu.paste);

        canvas.copy();
        canvas.document.mutate(id, |s| s.set_locked(true));
        let menu = ContextMenuState::for_canvas(&canvas);
        assert!(menu.copy && menu.paste);
        assert!(!menu.cut && !menu.delete);
        assert!(!menu.allows(EditorCommand::Undo));
    }
}
