use serde::{Deserialize, Serialize};
use std::fmt;

/// What triggered a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// A review was published
    Review,
    /// A game was added to the library
    Game,
    /// Friend activity
    Friend,
    /// Anything else
    #[default]
    System,
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl NotificationKind {
    /// Convert from database string representation
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "review" => Some(Self::Review),
            "game" => Some(Self::Game),
            "friend" => Some(Self::Friend),
            "system" => Some(Self::System),
            _ => None,
        }
    }

    /// Convert to database string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Review => "review",
            Self::Game => "game",
            Self::Friend => "friend",
            Self::System => "system",
        }
    }
}
