pub type ResourceId = String;

/// How many characters of an identifier (or timestamp) a card shows.
pub const ID_DISPLAY_WIDTH: usize = 24;

/// Coarse container state as reported by the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ContainerState {
    Created,
    Running,
    Paused,
    Restarting,
    Removing,
    Exited,
    Dead,
    #[default]
    Unknown,
}

impl ContainerState {
    pub fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "created" => Self::Created,
            "running" => Self::Running,
            "paused" => Self::Paused,
            "restarting" => Self::Restarting,
            "removing" => Self::Removing,
            "exited" => Self::Exited,
            "dead" => Self::Dead,
            _ => Self::Unknown,
        }
    }

    pub fn tone(self) -> Tone {
        match self {
            Self::Running => Tone::Up,
            Self::Restarting | Self::Removing | Self::Created => Tone::Transitioning,
            Self::Exited | Self::Dead | Self::Paused => Tone::Down,
            Self::Unknown => Tone::Neutral,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Container {
    pub id: ResourceId,
    pub name: String,
    pub image: String,
    /// Free-form engine status, e.g. "Up 3 minutes".
    pub status: String,
    pub state: ContainerState,
}

impl Container {
    pub fn new(id: impl Into<String>, name: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            image: image.into(),
            status: String::new(),
            state: ContainerState::Unknown,
        }
    }

    pub fn with_status(mut self, state: ContainerState, status: impl Into<String>) -> Self {
        self.state = state;
        self.status = status.into();
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Volume {
    pub name: String,
    pub created_at: String,
    pub scope: String,
    pub status: String,
}

/// Status colouring hint carried by a card; the theme decides the actual colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tone {
    Neutral,
    Up,
    Transitioning,
    Down,
}

/// The four fields a list block shows, already truncated for display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Card<'a> {
    pub title: &'a str,
    pub detail: &'a str,
    pub tag: &'a str,
    pub status: &'a str,
    pub tone: Tone,
}

/// A row in a paginated list.
///
/// `key` is what lifecycle commands address; `card` is the rendering strategy.
pub trait ListEntry {
    fn key(&self) -> &str;
    fn card(&self) -> Card<'_>;
}

impl ListEntry for Container {
    fn key(&self) -> &str {
        &self.id
    }

    fn card(&self) -> Card<'_> {
        Card {
            title: self.name.strip_prefix('/').unwrap_or(&self.name),
            detail: truncate_chars(&self.id, ID_DISPLAY_WIDTH),
            tag: &self.image,
            status: &self.status,
            tone: self.state.tone(),
        }
    }
}

impl ListEntry for Volume {
    fn key(&self) -> &str {
        &self.name
    }

    fn card(&self) -> Card<'_> {
        Card {
            title: &self.name,
            detail: truncate_chars(&self.created_at, ID_DISPLAY_WIDTH),
            tag: &self.scope,
            status: &self.status,
            tone: Tone::Neutral,
        }
    }
}

/// Borrow at most `max` characters of `s`, cutting on a char boundary.
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
