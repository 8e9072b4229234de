//! Ordered rule list mapping a class code or label text to a [`HealthClass`].
//!
//! Rules are evaluated top to bottom and the first rule that produces a class
//! wins:
//!
//! 1. [`Rule::NumericCode`]: anything parsing as a number is a class code.
//! 2. [`Rule::CompoundText`]: multi-word labels ("very low", "medio alto").
//! 3. [`Rule::SimpleText`]: single-word labels ("low", "medio", "alto").
//! 4. [`Rule::Fallback`]: `NoData`.
//!
//! Compound labels must be tested before simple ones, otherwise "Medium-High"
//! would be caught by the "medium" or "high" word rules.

use crate::core::classes::{ClassScheme, HealthClass};

/// One step of the classification precedence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rule {
    NumericCode,
    CompoundText {
        phrases: &'static [&'static str],
        class: HealthClass,
    },
    SimpleText {
        words: &'static [&'static str],
        class: HealthClass,
    },
    Fallback,
}

/// The full precedence, in evaluation order.
pub const RULES: &[Rule] = &[
    Rule::NumericCode,
    Rule::CompoundText {
        phrases: &["very low", "muy bajo", "muy baja"],
        class: HealthClass::VeryLow,
    },
    Rule::CompoundText {
        phrases: &["very high", "muy alto", "muy alta"],
        class: HealthClass::VeryHigh,
    },
    Rule::CompoundText {
        phrases: &["medium low", "medio bajo", "media baja"],
        class: HealthClass::MediumLow,
    },
    Rule::CompoundText {
        phrases: &["medium high", "medio alto", "media alta"],
        class: HealthClass::MediumHigh,
    },
    Rule::SimpleText {
        words: &["low", "bajo", "baja"],
        class: HealthClass::Low,
    },
    Rule::SimpleText {
        words: &["medium", "medio", "media"],
        class: HealthClass::Medium,
    },
    Rule::SimpleText {
        words: &["high", "alto", "alta"],
        class: HealthClass::High,
    },
    Rule::Fallback,
];

/// Lower-cases and turns punctuation into spaces, collapsing runs of whitespace.
///
/// The result is padded with one space on each side so phrases can be matched
/// as whole words with a plain substring search.
pub fn normalize_label(text: &str) -> String {
    let lowered: String = text
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    let joined = lowered.split_whitespace().collect::<Vec<_>>().join(" ");
    format!(" {} ", joined)
}

fn contains_phrase(normalized: &str, phrase: &str) -> bool {
    normalized.contains(&format!(" {} ", phrase))
}

/// Parse a class code. Integral numbers (`3`, `3.0`) are codes; any other
/// number is an invalid code and yields `Some(None)`.
fn parse_code(text: &str) -> Option<Option<i64>> {
    let number: f64 = text.trim().parse().ok()?;
    if number.is_finite() && number.fract() == 0.0 {
        Some(Some(number as i64))
    } else {
        Some(None)
    }
}

impl Rule {
    /// Apply this rule to a trimmed, non-empty input.
    ///
    /// Returns `None` when the rule does not match so evaluation continues.
    pub fn apply(&self, raw: &str, normalized: &str, scheme: ClassScheme) -> Option<HealthClass> {
        match self {
            Rule::NumericCode => parse_code(raw).map(|code| match code {
                Some(code) => scheme.from_code(code),
                None => HealthClass::NoData,
            }),
            Rule::CompoundText { phrases, class } => phrases
                .iter()
                .any(|p| contains_phrase(normalized, p))
                .then(|| restrict(*class, scheme)),
            Rule::SimpleText { words, class } => words
                .iter()
                .any(|w| contains_phrase(normalized, w))
                .then(|| restrict(*class, scheme)),
            Rule::Fallback => Some(HealthClass::NoData),
        }
    }
}

/// Labels outside the active scheme have no canonical counterpart.
fn restrict(class: HealthClass, scheme: ClassScheme) -> HealthClass {
    if scheme.contains(class) {
        class
    } else {
        HealthClass::NoData
    }
}

/// Classify a code or label. Missing or blank input is `NoData`.
pub fn classify(input: Option<&str>, scheme: ClassScheme) -> HealthClass {
    let raw = match input.map(str::trim) {
        Some(raw) if !raw.is_empty() => raw,
        _ => return HealthClass::NoData,
    };
    let normalized = normalize_label(raw);
    RULES
        .iter()
        .find_map(|rule| rule.apply(raw, &normalized, scheme))
        .unwrap_or(HealthClass::NoData)
}

/// Classify a numeric class code directly.
pub fn classify_code(code: f64, scheme: ClassScheme) -> HealthClass {
    if code.is_finite() && code.fract() == 0.0 {
        scheme.from_code(code as i64)
    } else {
        HealthClass::NoData
    }
}
