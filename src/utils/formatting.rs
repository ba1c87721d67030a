use crate::outreach::Language;

/// Format a whole-dollar amount the way each audience reads it:
/// `$2.000 USD` in Spanish copy, `$2,000 USD` in English copy.
pub fn format_usd(amount: i64, language: Language) -> String {
    let separator = match language {
        Language::Es => '.',
        Language::En => ',',
    };
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(ch);
    }
    let sign = if amount < 0 { "-" } else { "" };
    format!("{}${} USD", sign, grouped)
}

pub fn format_duration(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.1}s", ms as f64 / 1000.0)
    } else {
        let mins = ms / 60_000;
        let secs = (ms % 60_000) / 1000;
        format!("{}m {}s", mins, secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_usd_spanish_separator() {
        assert_eq!(format_usd(2000, Language::Es), "$2.000 USD");
        assert_eq!(format_usd(1500000, Language::Es), "$1.500.000 USD");
        assert_eq!(format_usd(800, Language::Es), "$800 USD");
    }

    #[test]
    fn test_format_usd_english_separator() {
        assert_eq!(format_usd(5000, Language::En), "$5,000 USD");
        assert_eq!(format_usd(0, Language::En), "$0 USD");
        assert_eq!(format_usd(-1200, Language::En), "-$1,200 USD");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(250), "250ms");
        assert_eq!(format_duration(1500), "1.5s");
        assert_eq!(format_duration(125_000), "2m 5s");
    }
}
