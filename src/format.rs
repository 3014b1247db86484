use rust_decimal::Decimal;

/// Formats a monetary amount with a dollar sign and two decimals, e.g. `-$15.99`.
pub fn format_money(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-${:.2}", rounded.abs())
    } else {
        format!("${:.2}", rounded.abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn formats_positive_negative_and_zero() {
        assert_eq!(format_money(dec!(500)), "$500.00");
        assert_eq!(format_money(dec!(-250)), "-$250.00");
        assert_eq!(format_money(dec!(15.994)), "$15.99");
        assert_eq!(format_money(dec!(-0.001)), "$0.00");
    }
}
