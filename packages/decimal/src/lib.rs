// The shape of this type follows the cosmwasm-std `Decimal`, which is licensed under the Apache
// License 2.0 - https://github.com/CosmWasm/cosmwasm.

#![no_std]

/// Unsigned fixed-point number with 18 decimal places.
///
/// Reward rates are stored on chain as the raw atomics of a `Decimal`: a rate of
/// `Decimal::raw(50_000_000_000_000_000)` means 0.05 reward units per staked unit
/// per second.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Ord, PartialOrd)]
pub struct Decimal(u128);

impl Decimal {
    const DECIMAL_FRACTIONAL: u128 = 1_000_000_000_000_000_000u128; // 1*10**18

    pub const fn raw(atomics: u128) -> Self {
        Self(atomics)
    }

    /// Create a 1.0 Decimal
    #[inline]
    pub const fn one() -> Self {
        Self(Self::DECIMAL_FRACTIONAL)
    }

    /// A decimal is an integer of atomic units plus a number that specifies the
    /// position of the decimal dot.
    #[must_use]
    #[inline]
    pub const fn atomics(&self) -> u128 {
        self.0
    }

    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0u128
    }

    /// Multiplies an integer by this decimal.
    ///
    /// Returns the product rounded down together with the dropped fraction, in
    /// atomics (always below `Decimal::one().atomics()`).
    ///
    /// The integer is split into its whole and fractional parts relative to
    /// 10^18 before multiplying, so the intermediate product only overflows when
    /// the final result would not fit either (or the rate itself is above ~340).
    pub fn checked_mul_int_with_remainder(self, value: u128) -> Option<(u128, u128)> {
        // 0*a and b*0 is always 0
        if value == 0 || self.is_zero() {
            return Some((0, 0));
        }
        let whole = value / Self::DECIMAL_FRACTIONAL;
        let fraction = value % Self::DECIMAL_FRACTIONAL;

        let whole_part = whole.checked_mul(self.0)?;
        let fraction_atomics = fraction.checked_mul(self.0)?;

        let product = whole_part.checked_add(fraction_atomics / Self::DECIMAL_FRACTIONAL)?;
        Some((product, fraction_atomics % Self::DECIMAL_FRACTIONAL))
    }
}
