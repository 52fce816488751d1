use std::fmt::{Debug, Display, Formatter};

/// US dollars with thousands separators, rounded to whole dollars.
pub struct FormattedUsd(pub f64);

impl Display for FormattedUsd {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.0.is_sign_negative() {
            write!(f, "-${}", group_thousands(-self.0))
        } else {
            write!(f, "${}", group_thousands(self.0))
        }
    }
}

impl Debug for FormattedUsd {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

/// Megawatt-hours with thousands separators.
pub struct FormattedMwh(pub f64);

impl Display for FormattedMwh {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} MWh", group_thousands(self.0))
    }
}

/// A 0..1 fraction as a percentage, or a dash when absent.
pub struct FormattedShare(pub Option<f64>);

impl Display for FormattedShare {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Some(share) => write!(f, "{:.1}%", share * 100.0),
            None => f.write_str("-"),
        }
    }
}

fn group_thousands(value: f64) -> String {
    if value.is_sign_negative() {
        return format!("-{}", group_thousands(-value));
    }
    let rounded = format!("{value:.0}");
    let mut grouped = String::with_capacity(rounded.len() + rounded.len() / 3);
    for (index, digit) in rounded.chars().enumerate() {
        if index > 0 && (rounded.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}
