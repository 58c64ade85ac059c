use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::FieldError;
use crate::settings::PreferenceKey;

const EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NumberFormat {
    Integer,
    /// Stored as a ratio, shown and typed as a percentage.
    Percent,
}

/// Validation domain shared by the text entry and the stepper of one field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericDomain {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub format: NumberFormat,
}

pub const IMAGE_MAX_HEIGHT: NumericDomain = NumericDomain {
    min: 1.0,
    max: 200.0,
    step: 1.0,
    format: NumberFormat::Integer,
};

pub const PREVIEW_IMAGE_SCALE: NumericDomain = NumericDomain {
    min: 0.1,
    max: 1.0,
    step: 0.05,
    format: NumberFormat::Percent,
};

pub const PREVIEW_DELAY: NumericDomain = NumericDomain {
    min: 200.0,
    max: 100_000.0,
    step: 1.0,
    format: NumberFormat::Integer,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StepDirection {
    Up,
    Down,
}

impl NumericDomain {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min - EPSILON && value <= self.max + EPSILON
    }

    /// Clamps into `[min, max]` and snaps to the precision the field stores.
    pub fn normalize(&self, value: f64) -> f64 {
        if value.is_nan() {
            return self.min;
        }
        let clamped = value.clamp(self.min, self.max);
        match self.format {
            NumberFormat::Integer => clamped.round(),
            NumberFormat::Percent => (clamped * 100.0).round() / 100.0,
        }
    }

    /// Parses typed text. Out-of-range input is rejected, never clamped.
    pub fn validate(&self, raw: &str) -> Result<f64, FieldError> {
        let value = self.parse(raw)?;
        if !self.contains(value) {
            return Err(FieldError::OutOfRange {
                value,
                min: self.min,
                max: self.max,
            });
        }
        Ok(self.normalize(value))
    }

    fn parse(&self, raw: &str) -> Result<f64, FieldError> {
        let not_a_number = || FieldError::NotANumber {
            input: raw.to_string(),
        };

        let trimmed = raw.trim();
        let (digits, divisor) = match (self.format, trimmed.strip_suffix('%')) {
            (NumberFormat::Percent, Some(rest)) => (rest.trim_end(), 100.0),
            _ => (trimmed, 1.0),
        };
        let digits: String = digits
            .chars()
            .filter(|c| !matches!(c, ',' | '_') && !c.is_whitespace())
            .collect();
        if digits.is_empty() {
            return Err(not_a_number());
        }

        let value = digits.parse::<f64>().map_err(|_| not_a_number())?;
        if !value.is_finite() {
            return Err(not_a_number());
        }
        Ok(value / divisor)
    }

    /// Moves to the next point of the `min + k * step` grid in `direction`,
    /// stopping at the bounds. Off-grid values land on the nearest grid point
    /// on that side.
    pub fn step(&self, current: f64, direction: StepDirection) -> f64 {
        let position = (current - self.min) / self.step;
        let next = match direction {
            StepDirection::Up => (position + EPSILON).floor() + 1.0,
            StepDirection::Down => (position - EPSILON).ceil() - 1.0,
        };
        self.normalize(self.min + next * self.step)
    }

    pub fn can_step(&self, current: f64, direction: StepDirection) -> bool {
        match direction {
            StepDirection::Up => current < self.max - EPSILON,
            StepDirection::Down => current > self.min + EPSILON,
        }
    }

    pub fn format(&self, value: f64) -> String {
        match self.format {
            NumberFormat::Integer => format!("{}", value.round() as i64),
            NumberFormat::Percent => format!("{}%", (value * 100.0).round() as i64),
        }
    }

    pub fn to_json(&self, value: f64) -> Value {
        match self.format {
            NumberFormat::Integer => json!(value.round() as u64),
            NumberFormat::Percent => json!(value),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NumericField {
    ImageMaxHeight,
    PreviewImageScale,
    PreviewDelay,
}

impl NumericField {
    pub const ALL: [NumericField; 3] = [
        NumericField::ImageMaxHeight,
        NumericField::PreviewImageScale,
        NumericField::PreviewDelay,
    ];

    pub fn key(self) -> PreferenceKey {
        match self {
            NumericField::ImageMaxHeight => PreferenceKey::ImageMaxHeight,
            NumericField::PreviewImageScale => PreferenceKey::PreviewImageScale,
            NumericField::PreviewDelay => PreferenceKey::PreviewDelay,
        }
    }

    pub fn from_key(key: PreferenceKey) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.key() == key)
    }

    pub fn domain(self) -> &'static NumericDomain {
        match self {
            NumericField::ImageMaxHeight => &IMAGE_MAX_HEIGHT,
            NumericField::PreviewImageScale => &PREVIEW_IMAGE_SCALE,
            NumericField::PreviewDelay => &PREVIEW_DELAY,
        }
    }
}

impl fmt::Display for NumericField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.key(), f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_fields_accept_grouped_digits() {
        assert_eq!(PREVIEW_DELAY.validate("1,500"), Ok(1500.0));
        assert_eq!(PREVIEW_DELAY.validate(" 100000 "), Ok(100_000.0));
        assert_eq!(IMAGE_MAX_HEIGHT.validate("12.4"), Ok(12.0));
    }

    #[test]
    fn out_of_range_text_is_rejected() {
        assert_eq!(
            IMAGE_MAX_HEIGHT.validate("0"),
            Err(FieldError::OutOfRange {
                value: 0.0,
                min: 1.0,
                max: 200.0
            })
        );
        assert!(PREVIEW_DELAY.validate("199").is_err());
        assert!(PREVIEW_DELAY.validate("100001").is_err());
    }

    #[test]
    fn non_numeric_text_is_rejected() {
        for raw in ["", "  ", "abc", "12px", "%", "NaN", "inf"] {
            assert!(
                matches!(
                    IMAGE_MAX_HEIGHT.validate(raw),
                    Err(FieldError::NotANumber { .. })
                ),
                "{raw:?} should not parse"
            );
        }
    }

    #[test]
    fn percent_field_reads_percent_and_ratio() {
        assert_eq!(PREVIEW_IMAGE_SCALE.validate("40%"), Ok(0.4));
        assert_eq!(PREVIEW_IMAGE_SCALE.validate("40 %"), Ok(0.4));
        assert_eq!(PREVIEW_IMAGE_SCALE.validate("0.4"), Ok(0.4));
        assert_eq!(PREVIEW_IMAGE_SCALE.validate("10%"), Ok(0.1));
        assert!(PREVIEW_IMAGE_SCALE.validate("150%").is_err());
        assert!(PREVIEW_IMAGE_SCALE.validate("5%").is_err());
    }

    #[test]
    fn stepping_stays_on_grid_and_in_bounds() {
        let mut value = PREVIEW_IMAGE_SCALE.min;
        for _ in 0..40 {
            value = PREVIEW_IMAGE_SCALE.step(value, StepDirection::Up);
            assert!(PREVIEW_IMAGE_SCALE.contains(value));
        }
        assert_eq!(value, 1.0);
        assert!(!PREVIEW_IMAGE_SCALE.can_step(value, StepDirection::Up));

        assert_eq!(PREVIEW_IMAGE_SCALE.step(0.4, StepDirection::Up), 0.45);
        assert_eq!(PREVIEW_IMAGE_SCALE.step(0.4, StepDirection::Down), 0.35);
        assert_eq!(IMAGE_MAX_HEIGHT.step(1.0, StepDirection::Down), 1.0);
        assert_eq!(PREVIEW_DELAY.step(1500.0, StepDirection::Up), 1501.0);
    }

    #[test]
    fn stepping_from_off_grid_lands_on_the_adjacent_grid_point() {
        assert_eq!(PREVIEW_IMAGE_SCALE.step(0.42, StepDirection::Down), 0.4);
        assert_eq!(PREVIEW_IMAGE_SCALE.step(0.42, StepDirection::Up), 0.45);
        assert_eq!(PREVIEW_IMAGE_SCALE.step(0.43, StepDirection::Up), 0.45);
        assert_eq!(PREVIEW_IMAGE_SCALE.step(0.43, StepDirection::Down), 0.4);
        assert_eq!(PREVIEW_IMAGE_SCALE.step(0.99, StepDirection::Up), 1.0);
        assert_eq!(PREVIEW_IMAGE_SCALE.step(0.11, StepDirection::Down), 0.1);
    }

    #[test]
    fn percent_input_is_kept_to_whole_percents() {
        assert_eq!(PREVIEW_IMAGE_SCALE.validate("42.5%"), Ok(0.43));
        assert_eq!(PREVIEW_IMAGE_SCALE.validate("0.421"), Ok(0.42));
        let stored = PREVIEW_IMAGE_SCALE.normalize(0.425);
        assert_eq!(PREVIEW_IMAGE_SCALE.format(stored), "43%");
        assert_eq!(PREVIEW_IMAGE_SCALE.normalize(0.1 + 7.0 * 0.05), 0.45);
    }

    #[test]
    fn format_matches_field_kind() {
        assert_eq!(PREVIEW_IMAGE_SCALE.format(0.45), "45%");
        assert_eq!(PREVIEW_DELAY.format(1500.0), "1500");
        assert_eq!(PREVIEW_DELAY.to_json(1500.0), json!(1500));
    }

    #[test]
    fn every_field_maps_back_from_its_key() {
        for field in NumericField::ALL {
            assert_eq!(NumericField::from_key(field.key()), Some(field));
        }
        assert_eq!(NumericField::from_key(PreferenceKey::ShowTitle), None);
    }
}
