use chrono::{DateTime, SecondsFormat, Utc};
use rand::Rng;
use sha2::{Digest, Sha256};

/// Hex characters kept from the digest.
pub const MESSAGE_ID_LEN: usize = 8;

/// Vocabulary for readable slugs. Words are drawn with replacement.
pub const SLUG_WORDS: [&str; 8] = [
    "glowing", "space", "rotary", "phone", "cosmic", "digital", "cyber", "quantum",
];

pub const SLUG_WORD_COUNT: usize = 3;

/// Content-addressed id: first 8 hex chars of SHA-256(`{content}-{timestamp}`).
/// Same inputs always give the same id; nothing checks for collisions.
pub fn generate_message_id(content: &str, timestamp: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hasher.update(b"-");
    hasher.update(timestamp.as_bytes());
    let mut id = hex::encode(hasher.finalize());
    id.truncate(MESSAGE_ID_LEN);
    id
}

/// Three random words joined by `-`. Not unique.
pub fn generate_slug() -> String {
    generate_slug_with(&mut rand::rng())
}

pub fn generate_slug_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..SLUG_WORD_COUNT)
        .map(|_| SLUG_WORDS[rng.random_range(0..SLUG_WORDS.len())])
        .collect::<Vec<_>>()
        .join("-")
}

/// ISO-8601 with milliseconds and a `Z` suffix, e.g. `2025-01-01T00:00:00.000Z`.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.with_timezone(&Utc))
}
