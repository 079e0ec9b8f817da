// The structured reflection produced for each entry.
//
// Entries keep the payload as opaque text; it is only parsed when a view
// needs its fields.

use serde::{Deserialize, Serialize};

/// The five-part reflection generated from an entry's text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReflectionPayload {
    /// A short, welcoming sentence.
    pub empathy: String,
    /// A few sentences relating the entry to biblical principles.
    pub reflection: String,
    /// The verse chosen for the entry.
    pub verse: Verse,
    /// A small practical invitation.
    pub suggestion: String,
    /// A short prayer.
    pub prayer: String,
}

/// A biblical verse and its citation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verse {
    /// The citation, e.g. `Filipenses 4:6-7`.
    #[serde(rename = "ref")]
    pub reference: String,
    /// The verse text.
    pub text: String,
}

impl ReflectionPayload {
    /// Parse a stored payload.
    ///
    /// # Errors
    ///
    /// Returns [`PayloadError`] if `raw` is not a well-formed payload.
    pub fn parse(raw: &str) -> Result<Self, PayloadError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Serialise the payload to the text stored on an entry.
    #[must_use]
    pub fn to_json(&self) -> String {
        // A struct of plain strings always serialises.
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Every string-valued field, including the nested verse.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        [
            self.empathy.as_str(),
            self.reflection.as_str(),
            self.verse.reference.as_str(),
            self.verse.text.as_str(),
            self.suggestion.as_str(),
            self.prayer.as_str(),
        ]
        .into_iter()
    }
}

/// A stored reflection payload could not be parsed.
#[derive(Debug, thiserror::Error)]
#[error("reflection payload is not well-formed")]
pub struct PayloadError(#[from] serde_json::Error);

#[cfg(test)]
pub(crate) fn sample_payload() -> ReflectionPayload {
    ReflectionPayload {
        empathy: "Que bom que você compartilhou isso.".to_string(),
        reflection: "A gratidão transforma o coração.".to_string(),
        verse: Verse {
            reference: "Salmos 46:1".to_string(),
            text: "Deus é o nosso refúgio e fortaleza.".to_string(),
        },
        suggestion: "Escreva três motivos de gratidão.".to_string(),
        prayer: "Senhor, obrigado por este dia.".to_string(),
    }
}
