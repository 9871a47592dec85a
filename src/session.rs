//! Local session identity.
//!
//! Tracks who the local user is logged in as, set by login-state events
//! from the connection layer. Handshake mechanics live outside the core;
//! this is only the already-established result.

use fennec_wire::name_eq;

/// The local user's identity for this connection.
#[derive(Debug, Default)]
pub struct Session {
    /// Character the user is logged in as, once known.
    pub character: Option<String>,
    /// Whether the account holds server admin rights.
    pub is_admin: bool,
}

impl Session {
    /// Record the logged-in character.
    pub fn set_identity(&mut self, character: impl Into<String>, is_admin: bool) {
        self.character = Some(character.into());
        self.is_admin = is_admin;
    }

    /// Whether `name` is the local user.
    pub fn is_self(&self, name: &str) -> bool {
        self.character.as_deref().is_some_and(|own| name_eq(own, name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_matching_is_case_insensitive() {
        let mut session = Session::default();
        assert!(!session.is_self("Mara"));
        session.set_identity("Mara", false);
        assert!(session.is_self("MARA"));
        assert!(!session.is_self("Marla"));
    }
}
