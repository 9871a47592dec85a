//! Character records.

use serde::Deserialize;

/// Presence status as the network defines it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharacterStatus {
    /// Not connected.
    #[default]
    Offline,
    /// Connected, no particular state.
    Online,
    /// Marked away.
    Away,
    /// Marked busy.
    Busy,
    /// Actively looking for conversation.
    Looking,
    /// Idle timeout reached.
    Idle,
    /// Do not disturb.
    Dnd,
    /// Rewarded status set by an admin.
    Crown,
}

impl CharacterStatus {
    /// Parse the wire string form. Unknown values read as `Online` — the
    /// server occasionally grows new states and an unknown one must not
    /// poison the record.
    pub fn from_wire(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "offline" => Self::Offline,
            "online" => Self::Online,
            "away" => Self::Away,
            "busy" => Self::Busy,
            "looking" => Self::Looking,
            "idle" => Self::Idle,
            "dnd" => Self::Dnd,
            "crown" => Self::Crown,
            _ => Self::Online,
        }
    }

    /// The wire string form.
    pub fn as_wire(&self) -> &'static str {
        match self {
            Self::Offline => "offline",
            Self::Online => "online",
            Self::Away => "away",
            Self::Busy => "busy",
            Self::Looking => "looking",
            Self::Idle => "idle",
            Self::Dnd => "dnd",
            Self::Crown => "crown",
        }
    }

    /// Whether this status counts as actively present for ranking.
    /// Away-flavored statuses sort below plain online ones.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Online | Self::Looking | Self::Crown)
    }
}

/// Character gender as the network defines it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    /// Unspecified.
    #[default]
    None,
    /// Male.
    Male,
    /// Female.
    Female,
    /// Transgender.
    Transgender,
    /// Herm.
    Herm,
    /// Shemale.
    Shemale,
    /// Male-herm.
    MaleHerm,
    /// Cuntboy.
    Cuntboy,
}

impl Gender {
    /// Parse the wire string form; unknown values read as `None`.
    pub fn from_wire(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "male" => Self::Male,
            "female" => Self::Female,
            "transgender" => Self::Transgender,
            "herm" => Self::Herm,
            "shemale" => Self::Shemale,
            "male-herm" => Self::MaleHerm,
            "cunt-boy" | "cuntboy" => Self::Cuntboy,
            _ => Self::None,
        }
    }
}

/// A known character.
///
/// Records are created on first sighting (roster page, sign-on broadcast)
/// or as offline "ghosts" when a list operation references a name never
/// seen online. The folded name is the unique key; the display casing kept
/// here is whatever the server sent first.
#[derive(Debug, Clone)]
pub struct Character {
    /// Display name (original casing).
    pub name: String,
    /// Gender.
    pub gender: Gender,
    /// Presence status.
    pub status: CharacterStatus,
    /// Free-text status message.
    pub status_message: String,
    /// Most recent ad text, kept for duplicate suppression.
    pub last_ad: Option<String>,
    /// Most recent staff report raised by this character, kept for replay.
    pub last_report: Option<String>,
}

impl Character {
    /// Create an offline placeholder record.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            gender: Gender::None,
            status: CharacterStatus::Offline,
            status_message: String::new(),
            last_ad: None,
            last_report: None,
        }
    }

    /// Create a record from a sign-on announcement.
    pub fn online(name: impl Into<String>, gender: Gender, status: CharacterStatus) -> Self {
        Self { gender, status, ..Self::new(name) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_wire() {
        assert_eq!(CharacterStatus::from_wire("online"), CharacterStatus::Online);
        assert_eq!(CharacterStatus::from_wire("DND"), CharacterStatus::Dnd);
        assert_eq!(CharacterStatus::from_wire("crown"), CharacterStatus::Crown);
        // Unknown states fall back to Online rather than failing.
        assert_eq!(CharacterStatus::from_wire("meditating"), CharacterStatus::Online);
    }

    #[test]
    fn test_status_round_trip() {
        for s in [
            CharacterStatus::Offline,
            CharacterStatus::Online,
            CharacterStatus::Away,
            CharacterStatus::Busy,
            CharacterStatus::Looking,
            CharacterStatus::Idle,
            CharacterStatus::Dnd,
            CharacterStatus::Crown,
        ] {
            assert_eq!(CharacterStatus::from_wire(s.as_wire()), s);
        }
    }

    #[test]
    fn test_active_tiers() {
        assert!(CharacterStatus::Looking.is_active());
        assert!(!CharacterStatus::Away.is_active());
        assert!(!CharacterStatus::Offline.is_active());
    }

    #[test]
    fn test_ghost_is_offline() {
        let c = Character::new("Mara");
        assert_eq!(c.status, CharacterStatus::Offline);
        assert!(c.last_ad.is_none());
    }
}
