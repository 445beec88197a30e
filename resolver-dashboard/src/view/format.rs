/// Two-decimal percentage, spelling non-finite values the way a browser
/// prints them. Exact halves round away from zero, as `toFixed` does.
pub fn format_percent(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value.is_sign_positive() {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        }
    } else {
        format!("{:.2}", (value * 100.0).round() / 100.0)
    }
}

pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (len - index) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn format_count(value: Option<u64>) -> String {
    value.map(group_thousands).unwrap_or_else(|| "-".to_string())
}

pub fn pad_start(value: &str, width: usize) -> String {
    let len = value.chars().count();
    if len >= width {
        return value.to_string();
    }
    let mut out = " ".repeat(width - len);
    out.push_str(value);
    out
}
