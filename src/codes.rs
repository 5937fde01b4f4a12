//! Code generation
//!
//! Membership and pickup codes are short identifiers customers read aloud or
//! type at the counter, so they use uppercase characters only and exclude the
//! ambiguous `I`, `L`, `O`, `0` and `1`. Generation does not pre-check
//! uniqueness; the store's unique constraints reject collisions and callers
//! retry with a fresh code.

use rand::Rng;

/// Characters safe to read aloud or type from a printed slip.
pub const CODE_ALPHABET: &str = "ABCDEFGHJKMNPQRSTUVWXYZ23456789";

/// Prefix on all membership codes.
pub const MEMBERSHIP_CODE_PREFIX: &str = "MEM";

/// Length of a pickup code.
pub const PICKUP_CODE_LEN: usize = 8;

/// Generates a membership code of the form `MEM-NNNNNN`.
pub fn membership_code<R: Rng + ?Sized>(rng: &mut R) -> String {
    let digits = rng.gen_range(100_000..=999_999);

    format!("{MEMBERSHIP_CODE_PREFIX}-{digits}")
}

/// Generates a pickup code from the unambiguous alphabet.
pub fn pickup_code<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..PICKUP_CODE_LEN).map(|_| pick(rng)).collect()
}

/// Normalises a typed code before lookup: trimmed and uppercased, so matches
/// are case-insensitive and whitespace-tolerant.
pub fn normalize(input: &str) -> String {
    input.trim().to_uppercase()
}

fn pick<R: Rng + ?Sized>(rng: &mut R) -> char {
    let index = rng.gen_range(0..CODE_ALPHABET.len());

    CODE_ALPHABET
        .as_bytes()
        .get(index)
        .map_or('X', |byte| char::from(*byte))
}

#[cfg(test)]
mod tests {
    use rand::thread_rng;

    use super::*;

    #[test]
    fn membership_code_has_prefix_and_six_digits() {
        let code = membership_code(&mut thread_rng());

        assert!(code.starts_with("MEM-"), "code {code} should start with MEM-");

        let suffix = code.strip_prefix("MEM-").unwrap_or_default();

        assert_eq!(suffix.len(), 6, "suffix of {code} should be six digits");
        assert!(
            suffix.chars().all(|c| c.is_ascii_digit()),
            "suffix of {code} should be numeric"
        );
    }

    #[test]
    fn pickup_code_uses_only_the_unambiguous_alphabet() {
        let code = pickup_code(&mut thread_rng());

        assert_eq!(code.len(), PICKUP_CODE_LEN);
        assert!(
            code.chars().all(|c| CODE_ALPHABET.contains(c)),
            "{code} should only use the code alphabet"
        );
    }

    #[test]
    fn alphabet_excludes_ambiguous_characters() {
        for ambiguous in ['I', 'L', 'O', '0', '1'] {
            assert!(
                !CODE_ALPHABET.contains(ambiguous),
                "{ambiguous} is ambiguous when read aloud"
            );
        }
    }

    #[test]
    fn normalize_trims_and_uppercases() {
        assert_eq!(normalize("  abc123 \n"), "ABC123");
        assert_eq!(normalize("MEM-482913"), "MEM-482913");
    }
}
