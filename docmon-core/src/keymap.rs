//! Key decoding and the help legend derived from it.
//!
//! Cursor bindings are inverted from vim: `j` moves up and `k` moves down.

use crate::command::{CommandSet, LifecycleAction};

/// Terminal-independent key, decoded by the shell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    PageUp,
    PageDown,
    Char(char),
    Other,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    CursorUp,
    CursorDown,
    PrevPage,
    NextPage,
    ToggleHelp,
    Lifecycle(LifecycleAction),
}

/// Map a key to the action it triggers for a list exposing `commands`.
pub fn resolve(key: Key, commands: &CommandSet) -> Option<Action> {
    match key {
        Key::Up | Key::Char('j') => Some(Action::CursorUp),
        Key::Down | Key::Char('k') => Some(Action::CursorDown),
        Key::Left | Key::PageUp | Key::Char('h') => Some(Action::PrevPage),
        Key::Right | Key::PageDown | Key::Char('l') => Some(Action::NextPage),
        Key::Char('?') => Some(Action::ToggleHelp),
        Key::Char(c) => LifecycleAction::from_key(c)
            .filter(|a| commands.contains(*a))
            .map(Action::Lifecycle),
        Key::Other => None,
    }
}

/// One-line footer.
pub fn short_help(commands: &CommandSet) -> String {
    let mut parts = vec!["↑/↓ navigate".to_string(), "←/→ page".to_string()];
    parts.extend(
        commands
            .actions()
            .map(|a| format!("{} {}", a.key(), a.label())),
    );
    parts.push("? help".into());
    parts.push("q quit".into());
    parts.join(" · ")
}

/// Multi-line legend shown when help is expanded. Never more than nine lines.
pub fn extended_help(commands: &CommandSet) -> Vec<String> {
    let mut lines = vec![
        format!("{:<6}{:<20}{:<6}{}", "↑/j", "move up", "↓/k", "move down"),
        format!("{:<6}{:<20}{:<6}{}", "←/h", "previous page", "→/l", "next page"),
    ];
    lines.extend(
        commands
            .actions()
            .map(|a| format!("{:<6}{}", a.key(), a.describe())),
    );
    lines.push(format!("{:<6}{:<20}{:<6}{}", "?", "hide help", "q", "quit"));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_bindings() {
        let set = CommandSet::none();
        assert_eq!(resolve(Key::Up, &set), Some(Action::CursorUp));
        assert_eq!(resolve(Key::Char('j'), &set), Some(Action::CursorUp));
        assert_eq!(resolve(Key::Down, &set), Some(Action::CursorDown));
        assert_eq!(resolve(Key::Char('k'), &set), Some(Action::CursorDown));
    }

    #[test]
    fn test_lifecycle_keys_need_capability() {
        let none = CommandSet::none();
        let all = CommandSet::lifecycle("SIGKILL");
        for action in LifecycleAction::ALL {
            assert_eq!(resolve(Key::Char(action.key()), &none), None);
            assert_eq!(
                resolve(Key::Char(action.key()), &all),
                Some(Action::Lifecycle(action))
            );
        }
    }

    #[test]
    fn test_page_and_help_bindings() {
        let set = CommandSet::none();
        assert_eq!(resolve(Key::Left, &set), Some(Action::PrevPage));
        assert_eq!(resolve(Key::PageDown, &set), Some(Action::NextPage));
        assert_eq!(resolve(Key::Char('?'), &set), Some(Action::ToggleHelp));
        assert_eq!(resolve(Key::Char('z'), &set), None);
        assert_eq!(resolve(Key::Other, &set), None);
    }

    #[test]
    fn test_help_lists_only_bound_actions() {
        let none = CommandSet::none();
        assert!(!short_help(&none).contains("restart"));
        assert!(short_help(&CommandSet::lifecycle("SIGKILL")).contains("x kill"));

        assert_eq!(extended_help(&none).len(), 3);
        let full = extended_help(&CommandSet::lifecycle("SIGKILL"));
        assert_eq!(full.len(), 8);
        assert!(full.len() <= 9);
    }
}
