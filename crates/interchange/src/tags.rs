//! Closed display-metadata tables for POS tags, sentence templates,
//! feedback modes, and failure categories.
//!
//! Every lookup is total: unknown keys take a documented fallback
//! instead of erroring, so vocabulary added upstream degrades to
//! neutral styling rather than breaking consumers.

/// The sentinel tag for words the lexicon does not know.
pub const UNKNOWN_TAG: &str = "UNKNOWN";

/// The feedback mode of single-shot baselines (no retries possible).
pub const SINGLE_SHOT_MODE: &str = "none";

/// Display hue for a tag or category chip. Renderers map hues onto
/// their own medium (terminal, CSS); this layer only picks the hue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hue {
    Blue,
    Green,
    Red,
    Purple,
    Orange,
    Yellow,
    Teal,
    Indigo,
    Amber,
    Gray,
}

impl Hue {
    pub fn as_str(&self) -> &'static str {
        match self {
            Hue::Blue => "blue",
            Hue::Green => "green",
            Hue::Red => "red",
            Hue::Purple => "purple",
            Hue::Orange => "orange",
            Hue::Yellow => "yellow",
            Hue::Teal => "teal",
            Hue::Indigo => "indigo",
            Hue::Amber => "amber",
            Hue::Gray => "gray",
        }
    }
}

/// Display label for a POS tag. Unlisted tags label as themselves.
pub fn tag_label(tag: &str) -> &str {
    match tag {
        "DET" => "Determiner",
        "N" => "Noun",
        "V" => "Verb",
        "V_COP" => "Copular Verb",
        "V_EX" => "Existential Verb",
        "A" => "Adjective",
        "ADV" => "Adverb",
        "NEG" => "Negation",
        "PREP" => "Preposition",
        "CONJ" => "Conjunction",
        "PRON" => "Pronoun",
        "UNKNOWN" => "Unknown",
        other => other,
    }
}

/// Display hue for a POS tag. Unlisted tags take the `UNKNOWN` gray.
pub fn tag_hue(tag: &str) -> Hue {
    match tag {
        "DET" => Hue::Blue,
        "N" => Hue::Green,
        "V" | "V_COP" | "V_EX" => Hue::Red,
        "A" => Hue::Purple,
        "ADV" => Hue::Orange,
        "PREP" => Hue::Yellow,
        "CONJ" => Hue::Teal,
        "PRON" => Hue::Indigo,
        _ => Hue::Gray,
    }
}

/// Prose description of a POS tag with examples, for failure
/// explanations. None for unlisted tags; callers choose the fallback
/// phrasing (the lowercased tag, or "tagged as X").
pub fn describe_tag(tag: &str) -> Option<&'static str> {
    match tag {
        "DET" => Some("a determiner (e.g. el, la, un, una)"),
        "N" => Some("a noun"),
        "V" => Some("a verb"),
        "V_COP" => Some("a copular verb (e.g. es, está)"),
        "V_EX" => Some("an existential verb (e.g. hay)"),
        "A" => Some("an adjective"),
        "ADV" => Some("an adverb"),
        "NEG" => Some("a negation (no)"),
        "PREP" => Some("a preposition"),
        "CONJ" => Some("a conjunction"),
        "PRON" => Some("a pronoun"),
        _ => None,
    }
}

/// Display label for a sentence template id. Unlisted ids label as
/// themselves.
pub fn template_label(template_id: &str) -> &str {
    match template_id {
        "copular" => "Copular",
        "transitive" => "Transitive",
        "existential" => "Existential",
        "pp" => "Prepositional",
        "negation" => "Negation",
        "conjunction" => "Conjunction",
        other => other,
    }
}

/// Display label for a feedback mode. Unlisted modes label as
/// themselves.
pub fn mode_label(mode: &str) -> &str {
    match mode {
        "structural" => "Structural Feedback",
        "generic" => "Generic Feedback",
        "none" => "Single-shot (No Feedback)",
        other => other,
    }
}

pub fn mode_hue(mode: &str) -> Hue {
    match mode {
        "structural" => Hue::Green,
        "generic" => Hue::Amber,
        _ => Hue::Gray,
    }
}

/// Display label for a failure category. Unlisted categories label as
/// themselves.
pub fn failure_label(category: &str) -> &str {
    match category {
        "oov_word" => "Out-of-Vocabulary Word",
        "missing_det" => "Missing Determiner",
        "wrong_pos" => "Wrong Part of Speech",
        "unsupported_construction" => "Unsupported Construction",
        "error" => "Parser Error",
        other => other,
    }
}

pub fn failure_hue(category: &str) -> Hue {
    match category {
        "oov_word" => Hue::Purple,
        "missing_det" => Hue::Blue,
        "wrong_pos" => Hue::Orange,
        "unsupported_construction" => Hue::Red,
        _ => Hue::Gray,
    }
}
