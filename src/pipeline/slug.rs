//! Post identity derived from the subject line.

use sha2::{Digest, Sha256};

use crate::model::post::Slug;

/// Number of digest bytes kept; the slug is twice as many hex characters.
pub const SLUG_BYTES: usize = 20;

/// Derive the slug for a subject: the first [`SLUG_BYTES`] bytes of its
/// SHA-256 digest, lowercase hex.
///
/// Equal subjects always map to the same slug, so re-sending a mail
/// overwrites the same post and asset names.
pub fn derive_slug(subject: &str) -> Slug {
    let digest = Sha256::digest(subject.as_bytes());
    Slug(hex::encode(&digest[..SLUG_BYTES]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_is_deterministic() {
        assert_eq!(derive_slug("Hello World"), derive_slug("Hello World"));
    }

    #[test]
    fn test_slug_shape() {
        for subject in ["", "Hello World", "日本語の件名", "x".repeat(10_000).as_str()] {
            let slug = derive_slug(subject);
            assert_eq!(slug.as_str().len(), 40);
            assert!(slug
                .as_str()
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
        }
    }

    #[test]
    fn test_slug_known_value() {
        // sha256("") = e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855
        assert_eq!(
            derive_slug("").as_str(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4"
        );
    }

    #[test]
    fn test_different_subjects_differ() {
        assert_ne!(derive_slug("a"), derive_slug("b"));
    }
}
