//! Brazilian Real display formatting: `R$ 1.234,56`, sign ahead of the
//! symbol. Rounds to cents; grouping is hand-rolled because nothing else in
//! the stack needs locale data.

/// Format an amount for display.
pub fn format_brl(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as i64;
    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}R$ {},{:02}", group_thousands(cents / 100), cents % 100)
}

fn group_thousands(n: i64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, d) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(d);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero() {
        assert_eq!(format_brl(0.0), "R$ 0,00");
    }

    #[test]
    fn cents_are_two_digits() {
        assert_eq!(format_brl(5.5), "R$ 5,50");
        assert_eq!(format_brl(0.07), "R$ 0,07");
    }

    #[test]
    fn thousands_group_with_dots() {
        assert_eq!(format_brl(1234.56), "R$ 1.234,56");
        assert_eq!(format_brl(1_000_000.0), "R$ 1.000.000,00");
        assert_eq!(format_brl(987654321.09), "R$ 987.654.321,09");
    }

    #[test]
    fn negative_sign_precedes_symbol() {
        assert_eq!(format_brl(-50.5), "-R$ 50,50");
        assert_eq!(format_brl(-1234.56), "-R$ 1.234,56");
    }

    #[test]
    fn rounds_to_cents() {
        assert_eq!(format_brl(19.999), "R$ 20,00");
        assert_eq!(format_brl(19.99), "R$ 19,99");
    }

    #[test]
    fn tiny_negatives_that_round_to_zero_lose_the_sign() {
        assert_eq!(format_brl(-0.001), "R$ 0,00");
    }
}
