//! Display formatting of table cells.

/// Round half away from zero to `decimals` places.
pub fn round_to(val: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    let rounded = (val * scale).round() / scale;
    // Collapse -0.0 so it never prints with a sign.
    if rounded == 0.0 { 0.0 } else { rounded }
}

/// Format with fixed decimals, optionally grouping thousands with commas.
pub fn fmt_fixed(val: f64, decimals: u32, grouped: bool) -> String {
    let val = round_to(val, decimals);
    let digits = format!("{:.*}", decimals as usize, val.abs());
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (digits.as_str(), None),
    };

    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if val < 0.0 {
        out.push('-');
    }
    if grouped {
        out.push_str(&group_thousands(int_part));
    } else {
        out.push_str(int_part);
    }
    if let Some(frac_part) = frac_part {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

/// Format with an explicit sign; a value that rounds to zero has none.
pub fn fmt_signed(val: f64, decimals: u32, grouped: bool) -> String {
    let val = round_to(val, decimals);
    let body = fmt_fixed(val, decimals, grouped);
    if val > 0.0 { format!("+{body}") } else { body }
}

fn group_thousands(int_part: &str) -> String {
    let n_digits = int_part.len();
    let mut out = String::with_capacity(n_digits + n_digits / 3);
    for (idx, ch) in int_part.chars().enumerate() {
        if idx > 0 && (n_digits - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
