//! Number formatting shared by recommendation messages and chart labels

/// Group the integer digits of an already formatted number with commas
fn group_thousands(formatted: &str) -> String {
    let (sign, digits) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted),
    };
    let (int, frac) = match digits.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (digits, None),
    };

    let mut grouped = String::with_capacity(int.len() + int.len() / 3);
    for (i, ch) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac {
        Some(frac) => format!("{}{}.{}", sign, grouped, frac),
        None => format!("{}{}", sign, grouped),
    }
}

/// `$1,234.56`
pub fn money(amount: f64) -> String {
    format!("${}", group_thousands(&format!("{:.2}", amount)))
}

/// `$1,235`
pub fn money_whole(amount: f64) -> String {
    format!("${}", group_thousands(&format!("{:.0}", amount)))
}

/// A user-entered percent: whole values keep one decimal (`10.0`),
/// others print in shortest form (`7.5`)
pub fn percent_value(percent: f64) -> String {
    if percent.fract() == 0.0 {
        format!("{:.1}", percent)
    } else {
        format!("{}", percent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money() {
        assert_eq!(money(0.0), "$0.00");
        assert_eq!(money(312.5), "$312.50");
        assert_eq!(money(10380.0), "$10,380.00");
        assert_eq!(money(1234567.891), "$1,234,567.89");
        assert_eq!(money(-1730.0), "$-1,730.00");
    }

    #[test]
    fn test_money_whole() {
        assert_eq!(money_whole(39240.0), "$39,240");
        assert_eq!(money_whole(999.4), "$999");
    }

    #[test]
    fn test_percent_value() {
        assert_eq!(percent_value(10.0), "10.0");
        assert_eq!(percent_value(7.5), "7.5");
        assert_eq!(percent_value(0.0), "0.0");
    }
}
