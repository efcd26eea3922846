//! Conversions between on-chain integers and decimal amounts.

use alloy_primitives::{Address, B256, U256};
use rust_decimal::Decimal;

use crate::error::{ConfigError, Error, Result};

/// Decimals of USDC's ERC-20 interface.
pub const USDC_DECIMALS: u32 = 6;

/// Collateral values above this many units are read as 18-decimal.
const EIGHTEEN_DECIMAL_CUTOFF: u64 = 10_000_000_000;

/// Convert USDC to 6-decimal base units, truncating extra precision.
pub fn to_usdc_units(amount: Decimal) -> Result<U256> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(ConfigError::InvalidValue {
            field: "amount",
            reason: format!("cannot transfer a negative amount ({amount})"),
        }
        .into());
    }
    let scaled = (amount * Decimal::from(10u64.pow(USDC_DECIMALS))).trunc();
    let units: u128 = scaled
        .mantissa()
        .try_into()
        .map_err(|_| Error::Chain(format!("amount {amount} out of range")))?;
    Ok(U256::from(units))
}

/// Convert base units with `decimals` decimals to a decimal amount.
pub fn from_units(units: U256, decimals: u32) -> Result<Decimal> {
    let base = U256::from(10u64).pow(U256::from(decimals));
    let (whole, fraction) = units.div_rem(base);

    let whole: u128 = whole
        .try_into()
        .map_err(|_| Error::Chain(format!("value {units} out of range")))?;
    let whole = Decimal::try_from_i128_with_scale(whole as i128, 0)
        .map_err(|_| Error::Chain(format!("value {units} out of range")))?;

    // fraction < 10^decimals <= 10^28, always representable
    let fraction: u128 = fraction
        .try_into()
        .map_err(|_| Error::Chain(format!("value {units} out of range")))?;
    let fraction = Decimal::try_from_i128_with_scale(fraction as i128, decimals)
        .map_err(|_| Error::Chain(format!("value {units} out of range")))?;

    Ok((whole + fraction).normalize())
}

/// USDC amount from 6-decimal base units.
pub fn from_usdc_units(units: U256) -> Result<Decimal> {
    from_units(units, USDC_DECIMALS)
}

/// Event collateral as USDC.
///
/// With `decimals` unset, values above 10^10 units are taken as 18-decimal
/// and everything else as 6-decimal.
pub fn collateral_from_units(units: U256, decimals: Option<u32>) -> Result<Decimal> {
    let decimals = decimals.unwrap_or(if units > U256::from(EIGHTEEN_DECIMAL_CUTOFF) {
        18
    } else {
        USDC_DECIMALS
    });
    from_units(units, decimals)
}

/// CCTP mint recipient: the address left-padded to 32 bytes.
#[must_use]
pub fn address_to_bytes32(address: Address) -> B256 {
    address.into_word()
}
