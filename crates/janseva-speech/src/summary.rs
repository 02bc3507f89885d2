//! Flattening a scheme's details into one string for narration.

use janseva_core::{Language, LocalizedText};

const ELIGIBILITY: LocalizedText = LocalizedText::new("Eligibility", "पात्रता", "पात्रता");
const BENEFITS: LocalizedText = LocalizedText::new("Benefits", "लाभ", "फायदे");

/// The parts of a scheme card that are read aloud, already in one language.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemeSummary {
    pub name: String,
    pub description: String,
    pub eligibility: Vec<String>,
    pub benefits: Vec<String>,
}

impl SchemeSummary {
    /// `"{name}. {description}. {Eligibility}: {..}. {Benefits}: {..}."`
    /// with headings in `language`.
    pub fn narration(&self, language: Language) -> String {
        format!(
            "{}. {}. {}: {}. {}: {}.",
            self.name,
            self.description,
            ELIGIBILITY.get(language),
            self.eligibility.join(". "),
            BENEFITS.get(language),
            self.benefits.join(". ")
        )
    }
}
