use std::collections::BTreeSet;
use std::fmt;

use crate::model::ResourceId;

/// Signal sent by the kill key unless configured otherwise.
pub const DEFAULT_KILL_SIGNAL: &str = "SIGKILL";

/// A lifecycle operation a list may bind to a key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LifecycleAction {
    Restart,
    Start,
    Stop,
    Kill,
    Remove,
}

impl LifecycleAction {
    pub const ALL: [LifecycleAction; 5] = [
        LifecycleAction::Restart,
        LifecycleAction::Start,
        LifecycleAction::Stop,
        LifecycleAction::Kill,
        LifecycleAction::Remove,
    ];

    pub fn key(self) -> char {
        match self {
            Self::Restart => 'r',
            Self::Start => 's',
            Self::Stop => 'p',
            Self::Kill => 'x',
            Self::Remove => 'd',
        }
    }

    pub fn from_key(c: char) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.key() == c)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Restart => "restart",
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Kill => "kill",
            Self::Remove => "remove",
        }
    }

    /// Longer wording for the expanded help legend.
    pub fn describe(self) -> &'static str {
        match self {
            Self::Restart => "restart container",
            Self::Start => "start container",
            Self::Stop => "stop container",
            Self::Kill => "force kill container",
            Self::Remove => "remove container and its volumes (forced)",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct RemoveOptions {
    pub remove_volumes: bool,
    pub force: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LifecycleOp {
    Start,
    Stop,
    Restart,
    Kill { signal: String },
    Remove(RemoveOptions),
}

impl LifecycleOp {
    pub fn action(&self) -> LifecycleAction {
        match self {
            Self::Start => LifecycleAction::Start,
            Self::Stop => LifecycleAction::Stop,
            Self::Restart => LifecycleAction::Restart,
            Self::Kill { .. } => LifecycleAction::Kill,
            Self::Remove(_) => LifecycleAction::Remove,
        }
    }
}

/// A lifecycle operation aimed at one resource.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LifecycleCommand {
    pub target: ResourceId,
    pub op: LifecycleOp,
}

impl fmt::Display for LifecycleCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let short = crate::model::truncate_chars(&self.target, 12);
        write!(f, "{} {}", self.op.action().label(), short)
    }
}

/// The lifecycle actions a list exposes. Empty for read-only lists.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandSet {
    actions: BTreeSet<LifecycleAction>,
    kill_signal: String,
}

impl Default for CommandSet {
    fn default() -> Self {
        Self::none()
    }
}

impl CommandSet {
    pub fn none() -> Self {
        Self {
            actions: BTreeSet::new(),
            kill_signal: DEFAULT_KILL_SIGNAL.to_string(),
        }
    }

    /// Every lifecycle action; kill sends `kill_signal`.
    pub fn lifecycle(kill_signal: impl Into<String>) -> Self {
        Self {
            actions: LifecycleAction::ALL.into_iter().collect(),
            kill_signal: kill_signal.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn contains(&self, action: LifecycleAction) -> bool {
        self.actions.contains(&action)
    }

    /// Bound actions in key-legend order.
    pub fn actions(&self) -> impl Iterator<Item = LifecycleAction> + '_ {
        LifecycleAction::ALL
            .into_iter()
            .filter(|a| self.actions.contains(a))
    }

    pub fn kill_signal(&self) -> &str {
        &self.kill_signal
    }

    /// Build the command for `action` against `target`, or `None` if the action is not bound.
    pub fn command_for(&self, action: LifecycleAction, target: &str) -> Option<LifecycleCommand> {
        if !self.contains(action) {
            return None;
        }
        let op = match action {
            LifecycleAction::Start => LifecycleOp::Start,
            LifecycleAction::Stop => LifecycleOp::Stop,
            LifecycleAction::Restart => LifecycleOp::Restart,
            LifecycleAction::Kill => LifecycleOp::Kill {
                signal: self.kill_signal.clone(),
            },
            LifecycleAction::Remove => LifecycleOp::Remove(RemoveOptions {
                remove_volumes: true,
                force: true,
            }),
        };
        Some(LifecycleCommand {
            target: target.to_string(),
            op,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_set_builds_nothing() {
        let set = CommandSet::none();
        assert!(set.is_empty());
        for action in LifecycleAction::ALL {
            assert!(set.command_for(action, "abc").is_none());
        }
    }

    #[test]
    fn test_kill_carries_configured_signal() {
        let set = CommandSet::lifecycle("SIGTERM");
        let cmd = set.command_for(LifecycleAction::Kill, "abc").unwrap();
        assert_eq!(
            cmd.op,
            LifecycleOp::Kill {
                signal: "SIGTERM".into()
            }
        );
        assert_eq!(cmd.target, "abc");
    }

    #[test]
    fn test_remove_is_forced_and_drops_volumes() {
        let set = CommandSet::lifecycle(DEFAULT_KILL_SIGNAL);
        let cmd = set.command_for(LifecycleAction::Remove, "abc").unwrap();
        assert_eq!(
            cmd.op,
            LifecycleOp::Remove(RemoveOptions {
                remove_volumes: true,
                force: true
            })
        );
    }

    #[test]
    fn test_keys_round_trip() {
        for action in LifecycleAction::ALL {
            assert_eq!(LifecycleAction::from_key(action.key()), Some(action));
        }
        assert_eq!(LifecycleAction::from_key('z'), None);
    }

    #[test]
    fn test_display_shortens_target() {
        let cmd = LifecycleCommand {
            target: "0123456789abcdef0123".into(),
            op: LifecycleOp::Restart,
        };
        assert_eq!(cmd.to_string(), "restart 0123456789ab");
    }
}
