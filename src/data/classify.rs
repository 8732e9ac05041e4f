use std::fmt;

// ---------------------------------------------------------------------------
// Ordered substring rules
// ---------------------------------------------------------------------------

/// One bucketing rule: a normalized input containing `needle` maps to `label`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule<L> {
    pub needle: &'static str,
    pub label: L,
}

const fn rule<L>(needle: &'static str, label: L) -> Rule<L> {
    Rule { needle, label }
}

/// Lower-cased text. Separators are left alone, so "inline-4" does not
/// contain the "inline 4" needle.
pub fn normalize(raw: &str) -> String {
    raw.to_lowercase()
}

/// First rule (in list order) whose needle occurs in the normalized text,
/// otherwise `fallback`.
pub fn classify<L: Copy>(rules: &[Rule<L>], raw: &str, fallback: L) -> L {
    let text = normalize(raw);
    rules
        .iter()
        .find(|r| text.contains(r.needle))
        .map_or(fallback, |r| r.label)
}

// ---------------------------------------------------------------------------
// Engine layout
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EngineLabel {
    Inline3,
    Inline4,
    Inline5,
    Inline6,
    V6,
    V8,
    V10,
    V12,
    Flat4,
    Other,
}

/// Inline layouts are checked before V layouts; the first hit wins.
pub const ENGINE_RULES: [Rule<EngineLabel>; 9] = [
    rule("inline 3", EngineLabel::Inline3),
    rule("inline 4", EngineLabel::Inline4),
    rule("inline 5", EngineLabel::Inline5),
    rule("inline 6", EngineLabel::Inline6),
    rule("v6", EngineLabel::V6),
    rule("v8", EngineLabel::V8),
    rule("v10", EngineLabel::V10),
    rule("v12", EngineLabel::V12),
    rule("flat 4", EngineLabel::Flat4),
];

impl EngineLabel {
    pub const ALL: [EngineLabel; 10] = [
        EngineLabel::Inline3,
        EngineLabel::Inline4,
        EngineLabel::Inline5,
        EngineLabel::Inline6,
        EngineLabel::V6,
        EngineLabel::V8,
        EngineLabel::V10,
        EngineLabel::V12,
        EngineLabel::Flat4,
        EngineLabel::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EngineLabel::Inline3 => "Inline 3",
            EngineLabel::Inline4 => "Inline 4",
            EngineLabel::Inline5 => "Inline 5",
            EngineLabel::Inline6 => "Inline 6",
            EngineLabel::V6 => "V6",
            EngineLabel::V8 => "V8",
            EngineLabel::V10 => "V10",
            EngineLabel::V12 => "V12",
            EngineLabel::Flat4 => "Flat 4",
            EngineLabel::Other => "Other",
        }
    }
}

impl fmt::Display for EngineLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bucket a free-text engine description. Total: unknown text is `Other`.
pub fn classify_engine(raw: &str) -> EngineLabel {
    classify(&ENGINE_RULES, raw, EngineLabel::Other)
}

// ---------------------------------------------------------------------------
// Transmission kind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TransmissionLabel {
    Automatic,
    Manual,
    Other,
}

/// "auto" is checked before "manual".
pub const TRANSMISSION_RULES: [Rule<TransmissionLabel>; 2] = [
    rule("auto", TransmissionLabel::Automatic),
    rule("manual", TransmissionLabel::Manual),
];

impl TransmissionLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            TransmissionLabel::Automatic => "Automatic",
            TransmissionLabel::Manual => "Manual",
            TransmissionLabel::Other => "Other",
        }
    }
}

impl fmt::Display for TransmissionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bucket a free-text transmission description. Total: unknown text is `Other`.
pub fn classify_transmission(raw: &str) -> TransmissionLabel {
    classify(&TRANSMISSION_RULES, raw, TransmissionLabel::Other)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_rules_cover_every_label_but_other_once() {
        for label in EngineLabel::ALL {
            let hits = ENGINE_RULES.iter().filter(|r| r.label == label).count();
            let expected = if label == EngineLabel::Other { 0 } else { 1 };
            assert_eq!(hits, expected, "{label}");
        }
    }

    #[test]
    fn engine_examples() {
        assert_eq!(classify_engine("V8"), EngineLabel::V8);
        assert_eq!(classify_engine("Inline 4 Turbo"), EngineLabel::Inline4);
        assert_eq!(classify_engine("3.0L INLINE 6"), EngineLabel::Inline6);
        assert_eq!(classify_engine("twin-turbo v12"), EngineLabel::V12);
        assert_eq!(classify_engine("Flat 4 Boxer"), EngineLabel::Flat4);
        assert_eq!(classify_engine("Electric"), EngineLabel::Other);
        assert_eq!(classify_engine(""), EngineLabel::Other);
        assert_eq!(classify_engine("nan"), EngineLabel::Other);
    }

    #[test]
    fn engine_priority_prefers_inline_over_v() {
        assert_eq!(classify_engine("V8 Inline 4"), EngineLabel::Inline4);
        assert_eq!(classify_engine("V8 and V6"), EngineLabel::V6);
    }

    #[test]
    fn engine_label_is_one_of_all_for_arbitrary_text() {
        for raw in ["", " ", "V", "v 8", "💥", "inline", "FLAT  4", "w16"] {
            assert!(EngineLabel::ALL.contains(&classify_engine(raw)));
        }
        assert_eq!(classify_engine("FLAT 4"), EngineLabel::Flat4);
    }

    #[test]
    fn transmission_examples() {
        assert_eq!(classify_transmission("6-speed automatic"), TransmissionLabel::Automatic);
        assert_eq!(classify_transmission("6-Speed Manual"), TransmissionLabel::Manual);
        assert_eq!(classify_transmission("CVT"), TransmissionLabel::Other);
        assert_eq!(classify_transmission("Auto Manual Hybrid"), TransmissionLabel::Automatic);
    }

    #[test]
    fn separators_are_not_spaces() {
        assert_eq!(normalize("Inline-4 Turbo"), "inline-4 turbo");
        assert_eq!(classify_engine("Inline-4 Turbo"), EngineLabel::Other);
        assert_eq!(classify_engine("Flat_4"), EngineLabel::Other);
        assert_eq!(classify_engine("FLAT  4"), EngineLabel::Other);
        assert_eq!(classify_engine("twin-turbo v12"), EngineLabel::V12);
    }
}
