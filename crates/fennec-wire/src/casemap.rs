//! Name case-folding.
//!
//! Character and channel names are case-insensitive ASCII on the wire:
//! `Mara` and `mara` identify the same character. All keyed storage in the
//! engine uses the folded form; display code keeps the original casing.

/// Fold a character or channel name to its canonical lowercase form.
///
/// Only ASCII letters fold; anything else passes through unchanged, so a
/// name that arrives with non-ASCII bytes still round-trips losslessly.
pub fn fold_name(name: &str) -> String {
    name.to_ascii_lowercase()
}

/// Compare two names using the wire's case-insensitive equality.
pub fn name_eq(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}
