//! String similarity and phonetic primitives.
//!
//! These back [`NearMatchResolver`](crate::engine::NearMatchResolver):
//! longest-common-substring similarity, the classic Metaphone code, and
//! American Soundex. Edit distance comes from the `strsim` crate. All
//! comparisons here are case-sensitive; callers fold case first with
//! [`fold`].

mod metaphone;
mod similar_text;
mod soundex;

pub use metaphone::metaphone;
pub use similar_text::similar_text_percent;
pub use soundex::soundex;

/// Case-fold a value for comparison. Full Unicode lowercasing, so "É" and
/// "é" compare equal.
pub fn fold(value: &str) -> String {
    value.to_lowercase()
}
