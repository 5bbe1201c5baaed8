//! Number formatting shared by log lines and the front-end.

/// `1234567` → `"¥1,234,567"`, `-5000` → `"-¥5,000"`.
pub fn format_money(amount: i64) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    format!("{}¥{}", sign, format_with_commas(amount.unsigned_abs()))
}

/// Like [`format_money`] but always carries a sign.
pub fn format_money_signed(amount: i64) -> String {
    if amount >= 0 {
        format!("+{}", format_money(amount))
    } else {
        format_money(amount)
    }
}

/// Short form for narrow displays: `¥12.3M`, `¥45K`, `¥900`.
pub fn format_money_short(amount: i64) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    let n = amount.unsigned_abs();
    if n >= 1_000_000 {
        format!("{}¥{:.1}M", sign, n as f64 / 1_000_000.0)
    } else if n >= 10_000 {
        format!("{}¥{}K", sign, n / 1_000)
    } else {
        format!("{}¥{}", sign, n)
    }
}

fn format_with_commas(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commas() {
        assert_eq!(format_money(0), "¥0");
        assert_eq!(format_money(999), "¥999");
        assert_eq!(format_money(1_000), "¥1,000");
        assert_eq!(format_money(50_000_000), "¥50,000,000");
        assert_eq!(format_money(-5_000_001), "-¥5,000,001");
    }

    #[test]
    fn signed() {
        assert_eq!(format_money_signed(30_000), "+¥30,000");
        assert_eq!(format_money_signed(-144_000), "-¥144,000");
    }

    #[test]
    fn short() {
        assert_eq!(format_money_short(900), "¥900");
        assert_eq!(format_money_short(45_000), "¥45K");
        assert_eq!(format_money_short(12_345_678), "¥12.3M");
        assert_eq!(format_money_short(-2_500_000), "-¥2.5M");
    }
}
