//! SOL amount parsing.
//!
//! The campaign form takes the target in SOL; the program stores lamports. Parsing is exact
//! decimal arithmetic: digits past the ninth fractional place are truncated toward zero, and
//! signs, exponents, zero and values above `u64::MAX` lamports are rejected.

use lib_core::{AppError, Result};

/// 1 SOL = 1,000,000,000 lamports.
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// Decimal places of a lamport.
pub const SOL_DECIMALS: usize = 9;

/// Parse a SOL decimal string into lamports.
///
/// ```
/// use lib_solana::amount::parse_sol_amount;
///
/// assert_eq!(parse_sol_amount("1.5").unwrap(), 1_500_000_000);
/// assert_eq!(parse_sol_amount(" .25 ").unwrap(), 250_000_000);
/// assert!(parse_sol_amount("-1").is_err());
/// ```
pub fn parse_sol_amount(input: &str) -> Result<u64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidInput("Target amount is required".to_string()));
    }
    if trimmed.starts_with('-') {
        return Err(AppError::InvalidInput("Target amount must not be negative".to_string()));
    }

    let (whole, fraction) = match trimmed.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (trimmed, ""),
    };

    let is_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if (whole.is_empty() && fraction.is_empty()) || !is_digits(whole) || !is_digits(fraction) {
        return Err(AppError::InvalidInput(format!(
            "Target amount is not a decimal number: {}",
            trimmed
        )));
    }

    let overflow = || AppError::InvalidInput(format!("Target amount is too large: {}", trimmed));

    let whole_lamports = if whole.is_empty() {
        0
    } else {
        whole
            .parse::<u64>()
            .map_err(|_| overflow())?
            .checked_mul(LAMPORTS_PER_SOL)
            .ok_or_else(overflow)?
    };

    // Truncate sub-lamport digits, then right-pad to nine places.
    let kept = &fraction[..fraction.len().min(SOL_DECIMALS)];
    let fraction_lamports = if kept.is_empty() {
        0
    } else {
        let padded = format!("{:0<width$}", kept, width = SOL_DECIMALS);
        padded.parse::<u64>().map_err(|_| overflow())?
    };

    let lamports = whole_lamports
        .checked_add(fraction_lamports)
        .ok_or_else(overflow)?;

    if lamports == 0 {
        return Err(AppError::InvalidInput(
            "Target amount must be greater than zero".to_string(),
        ));
    }

    Ok(lamports)
}

/// Render lamports as a SOL decimal string without trailing zeros.
pub fn format_lamports(lamports: u64) -> String {
    let whole = lamports / LAMPORTS_PER_SOL;
    let fraction = lamports % LAMPORTS_PER_SOL;
    if fraction == 0 {
        return whole.to_string();
    }
    let digits = format!("{:09}", fraction);
    format!("{}.{}", whole, digits.trim_end_matches('0'))
}
