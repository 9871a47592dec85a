//! Relationship ranking.
//!
//! Pure tier computation used to order character listings. Nothing here
//! touches shared state; the Roster assembles the inputs and UI code sorts
//! by the resulting key.

use crate::state::CharacterStatus;
use fennec_wire::fold_name;

/// Classification tier for sorting. Lower sorts first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RelationTier {
    /// On an important list: friend, bookmark, interested, global moderator,
    /// or present channel staff.
    Favored = 0,
    /// Plain online (online, looking, crown).
    Standard = 1,
    /// Present but away-flavored: busy, away, idle, dnd — or offline.
    Distracted = 2,
    /// Ignored or marked not-interesting. Always last.
    Dismissed = 3,
}

/// List-membership inputs to the tier computation.
#[derive(Debug, Clone, Copy, Default)]
pub struct RankFlags {
    /// On the friend list.
    pub friend: bool,
    /// On the bookmark list.
    pub bookmark: bool,
    /// Marked interesting.
    pub interested: bool,
    /// On the global moderator list.
    pub global_mod: bool,
    /// Owner or moderator of the channel being sorted, and present in it.
    pub channel_staff: bool,
    /// On the ignore list (server or client side).
    pub ignored: bool,
    /// Marked not-interesting.
    pub not_interested: bool,
}

/// Compute the tier for one character. Dismissal wins over everything;
/// list membership wins over presence status.
pub fn tier(status: CharacterStatus, flags: RankFlags) -> RelationTier {
    if flags.ignored || flags.not_interested {
        return RelationTier::Dismissed;
    }
    if flags.friend || flags.bookmark || flags.interested || flags.global_mod || flags.channel_staff {
        return RelationTier::Favored;
    }
    if status.is_active() {
        RelationTier::Standard
    } else {
        RelationTier::Distracted
    }
}

/// Total-order sort key: tier first, then name, case-insensitive.
pub fn sort_key(name: &str, tier: RelationTier) -> (u8, String) {
    (tier as u8, fold_name(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_ordering() {
        assert!(RelationTier::Favored < RelationTier::Standard);
        assert!(RelationTier::Standard < RelationTier::Distracted);
        assert!(RelationTier::Distracted < RelationTier::Dismissed);
    }

    #[test]
    fn test_friend_outranks_plain_online() {
        let friend = tier(CharacterStatus::Away, RankFlags { friend: true, ..Default::default() });
        let plain = tier(CharacterStatus::Online, RankFlags::default());
        assert!(friend < plain);
    }

    #[test]
    fn test_dismissed_beats_friendship() {
        let t = tier(
            CharacterStatus::Online,
            RankFlags { friend: true, ignored: true, ..Default::default() },
        );
        assert_eq!(t, RelationTier::Dismissed);
    }

    #[test]
    fn test_away_tier() {
        for status in [
            CharacterStatus::Busy,
            CharacterStatus::Away,
            CharacterStatus::Idle,
            CharacterStatus::Dnd,
        ] {
            assert_eq!(tier(status, RankFlags::default()), RelationTier::Distracted);
        }
        assert_eq!(tier(CharacterStatus::Looking, RankFlags::default()), RelationTier::Standard);
    }

    #[test]
    fn test_sort_key_ties_break_by_folded_name() {
        let mut names = vec![
            sort_key("zeta", RelationTier::Standard),
            sort_key("Alpha", RelationTier::Standard),
            sort_key("beta", RelationTier::Favored),
        ];
        names.sort();
        assert_eq!(names[0].1, "beta");
        assert_eq!(names[1].1, "alpha");
    }
}
