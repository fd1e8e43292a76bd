//! Null-aware numeric helpers. A missing or unreadable value is `None` and
//! stays `None` through every derived computation.

/// Parses a cell as a decimal number, accepting `,` as the decimal separator.
pub fn parse_decimal(text: &str) -> Option<f64> {
    let normalized = text.trim().replace(',', ".");
    if normalized.is_empty() {
        return None;
    }
    normalized.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Arithmetic mean of the present values; `None` when nothing is present.
pub fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let (sum, count) = values
        .into_iter()
        .flatten()
        .fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

pub fn subtract(minuend: Option<f64>, subtrahend: Option<f64>) -> Option<f64> {
    Some(minuend? - subtrahend?)
}

/// Division that yields `None` for a missing operand or a zero denominator.
pub fn divide(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    let denominator = denominator?;
    if denominator == 0.0 {
        return None;
    }
    Some(numerator? / denominator)
}

/// `(current - baseline) / baseline * 100`.
pub fn percent_change(baseline: Option<f64>, current: Option<f64>) -> Option<f64> {
    divide(subtract(current, baseline), baseline).map(|ratio| ratio * 100.0)
}
