//! Animal type classification.
//!
//! Maps free-text complaint fields to the canonical [`AnimalType`]
//! taxonomy. The source systems have no structured species field, so we
//! use keyword detection with a fixed priority order.

use critter_map_complaint_models::AnimalType;

/// Classifies a single free-text field into an [`AnimalType`].
///
/// Keywords are tested case-insensitively as substrings, in a fixed
/// priority order; the first match wins. The order is load-bearing and
/// must not be rearranged: historical outputs depend on it (a title
/// mentioning both a dog and a cat classifies as [`AnimalType::Dog`]).
/// Returns [`AnimalType::Unknown`] when no keyword matches.
#[must_use]
pub fn classify(text: &str) -> AnimalType {
    let lower = text.to_lowercase();

    if contains_any(&lower, &["rat", "rodent"]) {
        return AnimalType::RatRodent;
    }
    if lower.contains("dog") {
        return AnimalType::Dog;
    }
    if lower.contains("cat") {
        return AnimalType::Cat;
    }
    if lower.contains("raccoon") {
        return AnimalType::Raccoon;
    }
    if contains_any(&lower, &["bird", "pigeon"]) {
        return AnimalType::Bird;
    }
    if lower.contains("squirrel") {
        return AnimalType::Squirrel;
    }
    if lower.contains("coyote") {
        return AnimalType::Coyote;
    }
    if contains_any(&lower, &["animal", "wildlife"]) {
        return AnimalType::OtherAnimal;
    }

    AnimalType::Unknown
}

/// Classifies a complaint from its title, falling back to the subject
/// field when the title gives no signal.
///
/// Missing text is [`AnimalType::Unknown`] immediately; no keyword test
/// is attempted against an absent field.
#[must_use]
pub fn classify_complaint(case_title: Option<&str>, subject: Option<&str>) -> AnimalType {
    let from_title = case_title.map_or(AnimalType::Unknown, classify);
    if from_title != AnimalType::Unknown {
        return from_title;
    }
    subject.map_or(AnimalType::Unknown, classify)
}

/// Checks if `haystack` contains any of the given `needles`.
fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}
