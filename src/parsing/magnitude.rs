use crate::error::MagnitudeError;

/// Decode shorthand like "5.6K", "$3.2M" or "1,250" into a plain number.
/// Only a trailing K/M/B suffix scales the value.
pub fn try_decode_magnitude(text: &str) -> Result<f64, MagnitudeError> {
    let cleaned = text
        .trim()
        .trim_start_matches('$')
        .replace(',', "")
        .to_uppercase();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return Err(MagnitudeError::Empty);
    }

    let (number, scale) = if let Some(n) = cleaned.strip_suffix('K') {
        (n, 1_000.0)
    } else if let Some(n) = cleaned.strip_suffix('M') {
        (n, 1_000_000.0)
    } else if let Some(n) = cleaned.strip_suffix('B') {
        (n, 1_000_000_000.0)
    } else {
        (cleaned, 1.0)
    };

    let value: f64 = number
        .trim()
        .parse()
        .map_err(|_| MagnitudeError::Invalid(text.trim().to_string()))?;

    // "inf"/"nan" parse as floats and negatives are not prices
    if !value.is_finite() || value < 0.0 {
        return Err(MagnitudeError::Invalid(text.trim().to_string()));
    }

    Ok(value * scale)
}

/// Lossy variant: anything undecodable becomes 0.0.
pub fn decode_magnitude(text: &str) -> f64 {
    try_decode_magnitude(text).unwrap_or(0.0)
}
