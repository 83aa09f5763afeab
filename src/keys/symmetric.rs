// SPDX-License-Identifier: PMPL-1.0-or-later
//! Symmetric keys — known only by their bit length, nothing to decode.

use super::{Algorithm, KeyLengthEvaluator};

const BASE_BITS: u32 = 128;
const BASE_YEAR: i32 = 2025;

/// Recommended symmetric key length: 128 bits, plus 0.67 bits per year after 2025 (floored).
pub fn recommended_length(year: i32) -> u32 {
    let years = i64::from(year) - i64::from(BASE_YEAR);
    if years <= 0 {
        return BASE_BITS;
    }
    // floor(0.67 * years) in integer arithmetic.
    let bits = i64::from(BASE_BITS) + years * 67 / 100;
    u32::try_from(bits).unwrap_or(u32::MAX)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymmetricKey {
    bits: u32,
}

impl SymmetricKey {
    pub fn new(bits: u32) -> Self {
        Self { bits }
    }
}

impl KeyLengthEvaluator for SymmetricKey {
    fn length(&self) -> u32 {
        self.bits
    }

    fn algorithm(&self) -> Algorithm {
        Algorithm::Symmetric
    }

    fn adjust_for_year(&self, year: i32) -> u32 {
        recommended_length(year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length() {
        assert_eq!(SymmetricKey::new(256).length(), 256);
        assert_eq!(SymmetricKey::new(0).length(), 0);
    }

    #[test]
    fn test_is_secure() {
        let key = SymmetricKey::new(128);
        assert!(key.is_secure(128));
        assert!(key.is_secure(112));
        assert!(!key.is_secure(192));
    }

    #[test]
    fn test_adjust_for_year() {
        let key = SymmetricKey::new(128);
        assert_eq!(key.adjust_for_year(2000), 128);
        assert_eq!(key.adjust_for_year(2025), 128);
        assert_eq!(key.adjust_for_year(2026), 128);
        assert_eq!(key.adjust_for_year(2027), 129);
        assert_eq!(key.adjust_for_year(2030), 131);
        assert_eq!(key.adjust_for_year(2035), 134);
        assert_eq!(key.adjust_for_year(100_000_000), 66_998_771);
        assert_eq!(key.adjust_for_year(i32::MIN), 128);
        assert_eq!(key.adjust_for_year(i32::MAX), 1_438_812_814);
        assert_eq!(key.adjust_for_year(2125), 195);
    }
}
