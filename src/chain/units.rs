//! Conversion between the ledger's base unit (wei) and the decimal ether
//! strings shown in the UI. Monetary values cross this boundary exactly once
//! per read or submission; the view never stores base units.

use crate::chain::error::ChainError;

/// Smallest indivisible currency denomination.
pub type Wei = u128;

const DECIMALS: usize = 18;

/// Parses a decimal ether string ("1.5", "0.02", "12") into wei.
///
/// More than 18 fractional digits is not representable and is rejected
/// rather than silently truncated.
pub fn to_base_units(decimal: &str) -> Result<Wei, ChainError> {
    let s = decimal.trim();
    if s.is_empty() {
        return Err(ChainError::Amount(decimal.to_string()));
    }

    let (int_part, frac_part) = match s.split_once('.') {
        Some((i, f)) => (i, f),
        None => (s, ""),
    };

    if frac_part.len() > DECIMALS || (int_part.is_empty() && frac_part.is_empty()) {
        return Err(ChainError::Amount(decimal.to_string()));
    }

    let int: Wei = if int_part.is_empty() {
        0
    } else {
        int_part
            .parse()
            .map_err(|_| ChainError::Amount(decimal.to_string()))?
    };

    let mut frac: Wei = 0;
    if !frac_part.is_empty() {
        frac = frac_part
            .parse()
            .map_err(|_| ChainError::Amount(decimal.to_string()))?;
        for _ in 0..DECIMALS - frac_part.len() {
            frac *= 10;
        }
    }

    int.checked_mul(10u128.pow(DECIMALS as u32))
        .and_then(|i| i.checked_add(frac))
        .ok_or_else(|| ChainError::Amount(decimal.to_string()))
}

/// Formats wei as a decimal ether string with trailing zeros trimmed.
pub fn from_base_units(wei: Wei) -> String {
    let int = wei / 10u128.pow(DECIMALS as u32);
    let frac = wei % 10u128.pow(DECIMALS as u32);

    if frac == 0 {
        return int.to_string();
    }

    let frac = format!("{:0>width$}", frac, width = DECIMALS);
    format!("{}.{}", int, frac.trim_end_matches('0'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_ether() {
        assert_eq!(to_base_units("1").unwrap(), 1_000_000_000_000_000_000);
        assert_eq!(from_base_units(2_000_000_000_000_000_000), "2");
    }

    #[test]
    fn fractional_ether() {
        assert_eq!(to_base_units("0.02").unwrap(), 20_000_000_000_000_000);
        assert_eq!(to_base_units("1.5").unwrap(), 1_500_000_000_000_000_000);
        assert_eq!(from_base_units(20_000_000_000_000_000), "0.02");
    }

    #[test]
    fn zero() {
        assert_eq!(to_base_units("0").unwrap(), 0);
        assert_eq!(from_base_units(0), "0");
    }

    #[test]
    fn single_wei() {
        assert_eq!(from_base_units(1), "0.000000000000000001");
        assert_eq!(to_base_units("0.000000000000000001").unwrap(), 1);
    }

    #[test]
    fn round_trip() {
        for s in ["0", "1", "0.02", "1.5", "123.456", "0.000000000000000001"] {
            assert_eq!(from_base_units(to_base_units(s).unwrap()), s, "{}", s);
        }
    }

    #[test]
    fn rejects_garbage() {
        assert!(to_base_units("").is_err());
        assert!(to_base_units("abc").is_err());
        assert!(to_base_units("1.2.3").is_err());
        assert!(to_base_units("-1").is_err());
        // 19 fractional digits is below one wei
        assert!(to_base_units("0.0000000000000000001").is_err());
    }

    #[test]
    fn accepts_surrounding_whitespace() {
        assert_eq!(to_base_units(" 1.5 ").unwrap(), 1_500_000_000_000_000_000);
    }
}
