use std::time::Duration;

use crate::command::{CommandSet, LifecycleCommand};
use crate::engine::EngineError;
use crate::model::ListEntry;
use crate::pagination::Paginator;

/// Rows one rendered entry occupies: two content lines plus top and bottom border.
pub const ROWS_PER_ITEM: u16 = 4;
/// Rows under the list with the short help line: page indicator + help.
pub const FOOTER_ROWS_COLLAPSED: u16 = 2;
/// Rows under the list with the expanded legend.
pub const FOOTER_ROWS_EXPANDED: u16 = 10;

pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

/// The most recent lifecycle command the engine rejected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandFailure {
    pub command: LifecycleCommand,
    pub error: EngineError,
}

/// State of one paginated resource list.
///
/// Mutated only through [`crate::reducer::reduce`]; everything here is read-only to the
/// renderer.
#[derive(Debug)]
pub struct ListSession<E> {
    pub(crate) entries: Vec<E>,
    pub(crate) cursor: usize,
    pub(crate) paginator: Paginator,
    pub(crate) viewport: Viewport,
    pub(crate) help_expanded: bool,
    pub(crate) commands: CommandSet,
    pub(crate) refresh_interval: Duration,
    pub(crate) refresh: RefreshTracker,
    pub(crate) loaded: bool,
    pub(crate) last_refresh_error: Option<EngineError>,
    pub(crate) last_command_failure: Option<CommandFailure>,
}

/// Sequence numbers for in-flight refreshes; completions older than the last applied
/// one are dropped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct RefreshTracker {
    pub(crate) issued: u64,
    pub(crate) applied: u64,
}

impl RefreshTracker {
    pub(crate) fn issue(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    /// Returns false if `seq` is not newer than what is already applied.
    pub(crate) fn accept(&mut self, seq: u64) -> bool {
        if seq <= self.applied {
            return false;
        }
        self.applied = seq;
        true
    }
}

impl<E: ListEntry> ListSession<E> {
    pub fn new(commands: CommandSet) -> Self {
        Self {
            entries: Vec::new(),
            cursor: 0,
            paginator: Paginator::new(),
            viewport: Viewport::default(),
            help_expanded: false,
            commands,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            refresh: RefreshTracker::default(),
            loaded: false,
            last_refresh_error: None,
            last_command_failure: None,
        }
    }

    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }

    pub fn entries(&self) -> &[E] {
        &self.entries
    }

    /// Page-relative cursor.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn paginator(&self) -> &Paginator {
        &self.paginator
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn help_expanded(&self) -> bool {
        self.help_expanded
    }

    pub fn commands(&self) -> &CommandSet {
        &self.commands
    }

    pub fn refresh_interval(&self) -> Duration {
        self.refresh_interval
    }

    /// False until the first refresh completes, successfully or not.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn last_refresh_error(&self) -> Option<&EngineError> {
        self.last_refresh_error.as_ref()
    }

    pub fn last_command_failure(&self) -> Option<&CommandFailure> {
        self.last_command_failure.as_ref()
    }

    /// Entries on the current page.
    pub fn visible(&self) -> &[E] {
        let (start, end) = self.paginator.slice_bounds();
        &self.entries[start..end]
    }

    /// Entry under the cursor, if the current page has one.
    pub fn selected(&self) -> Option<&E> {
        let (start, _) = self.paginator.slice_bounds();
        self.entries.get(start + self.cursor)
    }

    pub fn footer_rows(&self) -> u16 {
        if self.help_expanded {
            FOOTER_ROWS_EXPANDED
        } else {
            FOOTER_ROWS_COLLAPSED
        }
    }

    /// Height of the scrollable list area.
    pub fn list_height(&self) -> u16 {
        self.viewport.height.saturating_sub(self.footer_rows())
    }

    pub(crate) fn relayout(&mut self) {
        let per_page = (self.list_height() / ROWS_PER_ITEM).max(1);
        self.paginator.set_per_page(per_page as usize);
        self.clamp_cursor();
    }

    pub(crate) fn replace_entries(&mut self, entries: Vec<E>) {
        self.entries = entries;
        self.paginator.set_total(self.entries.len());
        self.clamp_cursor();
    }

    /// Page first, then cursor: the cursor bound depends on the clamped page.
    pub(crate) fn clamp_cursor(&mut self) {
        let items = self.paginator.items_on_page();
        self.cursor = if items == 0 {
            0
        } else {
            self.cursor.min(items - 1)
        };
    }
}
