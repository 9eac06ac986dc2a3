use std::fmt;

use rand::rngs::OsRng;
use rand::Rng;

/// A one-time numeric code in plaintext, as delivered to the user.
///
/// Always exactly [`OneTimeCode::LENGTH`] ASCII digits, zero-padded.
#[derive(Clone, PartialEq, Eq)]
pub struct OneTimeCode(String);

impl OneTimeCode {
    pub const LENGTH: usize = 6;
    const SPACE: u32 = 1_000_000;

    /// Draw a fresh code uniformly from `000000..=999999`.
    pub fn generate() -> Self {
        let value = OsRng.gen_range(0..Self::SPACE);
        Self(format!("{:0width$}", value, width = Self::LENGTH))
    }

    /// Whether a candidate string has the shape of a code.
    ///
    /// Lets callers skip the hash comparison for input that can never match.
    pub fn is_well_formed(candidate: &str) -> bool {
        candidate.len() == Self::LENGTH && candidate.bytes().all(|b| b.is_ascii_digit())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Keep codes out of logs.
impl fmt::Debug for OneTimeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("OneTimeCode(******)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_is_six_digits() {
        for _ in 0..1_000 {
            let code = OneTimeCode::generate();
            assert!(OneTimeCode::is_well_formed(code.as_str()), "{}", code.as_str());
        }
    }

    #[test]
    fn test_generate_covers_leading_zero_codes() {
        // P(no code below 100000 in 2000 draws) = 0.9^2000, effectively zero.
        let saw_leading_zero = (0..2_000)
            .map(|_| OneTimeCode::generate())
            .any(|code| code.as_str().starts_with('0'));
        assert!(saw_leading_zero);
    }

    #[test]
    fn test_is_well_formed() {
        assert!(OneTimeCode::is_well_formed("004521"));
        assert!(OneTimeCode::is_well_formed("000000"));
        assert!(!OneTimeCode::is_well_formed("4521"));
        assert!(!OneTimeCode::is_well_formed("0045210"));
        assert!(!OneTimeCode::is_well_formed("00452a"));
        assert!(!OneTimeCode::is_well_formed("٠٠٤٥٢١"));
    }

    #[test]
    fn test_debug_masks_code() {
        let code = OneTimeCode::generate();
        assert!(!format!("{:?}", code).contains(code.as_str()));
    }
}
