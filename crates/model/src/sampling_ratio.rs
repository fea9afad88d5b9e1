//! Sampling ratio text, as typed by operators: `25%` or `1/4`.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplingRatioFormat {
    /// `%`
    Percent,
    /// `1/w`
    OneOver,
}

impl SamplingRatioFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Percent => "%",
            Self::OneOver => "1/w",
        }
    }
}

pub fn sampling_ratio_format(text: &str) -> Option<SamplingRatioFormat> {
    let text = text.trim();
    if text.ends_with('%') {
        Some(SamplingRatioFormat::Percent)
    } else if text.starts_with("1/") {
        Some(SamplingRatioFormat::OneOver)
    } else {
        None
    }
}

/// Ratio in `0..=1` from `25%` or `1/4` text.
pub fn parse_sampling_ratio(text: &str) -> Option<f64> {
    let text = text.trim();
    let ratio = match sampling_ratio_format(text)? {
        SamplingRatioFormat::Percent => {
            text.trim_end_matches('%').trim().parse::<f64>().ok()? / 100.0
        }
        SamplingRatioFormat::OneOver => 1.0 / text["1/".len()..].trim().parse::<f64>().ok()?,
    };
    (ratio.is_finite() && ratio > 0.0 && ratio <= 1.0).then_some(ratio)
}

/// True when the text does not look operator-entered in `format`
/// (detected from the text when not given), i.e. it was derived from weights.
pub fn is_sampling_ratio_computed(text: &str, format: Option<SamplingRatioFormat>) -> bool {
    let text = text.trim();
    if text.is_empty() {
        return false;
    }
    match format.or_else(|| sampling_ratio_format(text)) {
        Some(SamplingRatioFormat::Percent) => !text.ends_with('%') || text.contains('/'),
        Some(SamplingRatioFormat::OneOver) => !text.starts_with("1/"),
        None => false,
    }
}
