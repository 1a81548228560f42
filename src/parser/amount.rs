//! Best-effort numeric cell decoding
//!
//! Blank numeric cells are normal for optional legs, so anything that does
//! not parse decodes to zero instead of failing the row.

use rust_decimal::Decimal;
use std::str::FromStr;

pub fn parse_amount(cell: &str) -> Decimal {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return Decimal::ZERO;
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .unwrap_or(Decimal::ZERO)
}
