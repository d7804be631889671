//! # Parties
//!
//! A party is a sub-entity of an activity record — filer, subject,
//! transmitter, account owner — classified by a numeric type code. Every
//! family carries parties; the aggregate party counts on the envelope are
//! computed by filtering on these codes with per-family classifier sets.

use serde::{Deserialize, Serialize};

use efile_core::{FieldValidate, FieldViolation, SeqNumber, XmlElement};

use crate::error::{FormError, FormResult};

/// A party-type classifier code as carried on the wire.
///
/// Decode keeps whatever string arrived; the digit-string format rule is
/// enforced by field validation, not at parse time, so a malformed code
/// is reported by the validator rather than aborting the decode.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartyTypeCode(String);

impl PartyTypeCode {
    /// Wrap a wire code.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// The wire code.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this code is in `codes`.
    pub fn is_any_of(&self, codes: &[&str]) -> bool {
        codes.iter().any(|c| *c == self.0)
    }

    /// Whether the code satisfies the wire format rule (1+ ASCII digits).
    pub fn is_well_formed(&self) -> bool {
        !self.0.is_empty() && self.0.bytes().all(|b| b.is_ascii_digit())
    }
}

impl std::fmt::Display for PartyTypeCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One party entry within an activity record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Party {
    /// Tree sequence number.
    #[serde(rename = "SeqNum", default)]
    pub seq_num: SeqNumber,
    /// Party-type classifier.
    #[serde(rename = "ActivityPartyTypeCode")]
    pub type_code: PartyTypeCode,
}

impl Party {
    /// A party with the given classifier code and no sequence number.
    pub fn with_code(code: impl Into<String>) -> Self {
        Self {
            seq_num: SeqNumber::UNASSIGNED,
            type_code: PartyTypeCode::new(code),
        }
    }

    /// Decode a `Party` element.
    pub fn from_xml(element: &XmlElement) -> FormResult<Self> {
        let seq_num = element
            .attr_u64("SeqNum")?
            .map(SeqNumber)
            .unwrap_or_default();
        let type_code = element
            .child_text("ActivityPartyTypeCode")
            .ok_or(FormError::MissingElement {
                element: "ActivityPartyTypeCode",
            })?;
        Ok(Self {
            seq_num,
            type_code: PartyTypeCode::new(type_code),
        })
    }

    /// Render as a `Party` element.
    pub fn to_xml(&self) -> XmlElement {
        XmlElement::new("Party")
            .with_attr("SeqNum", self.seq_num.to_string())
            .with_child(
                XmlElement::new("ActivityPartyTypeCode").with_text(self.type_code.as_str()),
            )
    }
}

impl FieldValidate for Party {
    fn validate_fields(&self) -> Result<(), FieldViolation> {
        if !self.type_code.is_well_formed() {
            return Err(FieldViolation::new(
                "ActivityPartyTypeCode",
                format!("{:?} is not a numeric classifier code", self.type_code.as_str()),
            ));
        }
        Ok(())
    }
}

/// Decode every `Party` child of an activity element, in document order.
pub fn parties_from_xml(activity: &XmlElement) -> FormResult<Vec<Party>> {
    activity.children_named("Party").map(Party::from_xml).collect()
}

/// The filtered party count rule shared by every family: an empty
/// classifier set counts all parties, otherwise only matching ones.
pub fn count_matching(parties: &[Party], codes: &[&str]) -> i64 {
    if codes.is_empty() {
        parties.len() as i64
    } else {
        parties.iter().filter(|p| p.type_code.is_any_of(codes)).count() as i64
    }
}
