use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sections 4 to 10 of Chapter II of the Digital Personal Data Protection Act, 2023.
///
/// Variant order is the registry order used for every report.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SectionId {
    #[serde(rename = "Section 4")]
    Section4,
    #[serde(rename = "Section 5")]
    Section5,
    #[serde(rename = "Section 6")]
    Section6,
    #[serde(rename = "Section 7")]
    Section7,
    #[serde(rename = "Section 8")]
    Section8,
    #[serde(rename = "Section 9")]
    Section9,
    #[serde(rename = "Section 10")]
    Section10,
}

impl SectionId {
    pub const ALL: [SectionId; 7] = [
        SectionId::Section4,
        SectionId::Section5,
        SectionId::Section6,
        SectionId::Section7,
        SectionId::Section8,
        SectionId::Section9,
        SectionId::Section10,
    ];

    pub fn number(self) -> u8 {
        match self {
            SectionId::Section4 => 4,
            SectionId::Section5 => 5,
            SectionId::Section6 => 6,
            SectionId::Section7 => 7,
            SectionId::Section8 => 8,
            SectionId::Section9 => 9,
            SectionId::Section10 => 10,
        }
    }

    pub fn from_number(number: u8) -> Option<SectionId> {
        SectionId::ALL.into_iter().find(|s| s.number() == number)
    }

    pub fn title(self) -> &'static str {
        match self {
            SectionId::Section4 => "Grounds for Processing Personal Data",
            SectionId::Section5 => "Notice",
            SectionId::Section6 => "Consent",
            SectionId::Section7 => "Certain Legitimate Uses",
            SectionId::Section8 => "General Obligations of Data Fiduciary",
            SectionId::Section9 => "Processing of Personal Data of Children",
            SectionId::Section10 => "Additional Obligations of Significant Data Fiduciaries",
        }
    }

    /// "Section 6 - Consent"
    pub fn label(self) -> String {
        format!("{} - {}", self, self.title())
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Section {}", self.number())
    }
}

impl FromStr for SectionId {
    type Err = CoreError;

    /// Accepts "6", "S6", "Section 6", "section6" and labels such as
    /// "Section 6 - Consent" or "Section 6: Consent" whatever separator follows the number.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let unknown = || CoreError::UnknownSection(raw.to_string());
        let lowered = raw.trim().to_ascii_lowercase();
        let rest = lowered
            .strip_prefix("section")
            .or_else(|| lowered.strip_prefix('s'))
            .unwrap_or(&lowered)
            .trim_start();
        let digits_end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        let (digits, tail) = rest.split_at(digits_end);
        if digits.is_empty() || tail.starts_with(|c: char| c.is_alphanumeric()) {
            return Err(unknown());
        }
        digits
            .parse::<u8>()
            .ok()
            .and_then(SectionId::from_number)
            .ok_or_else(unknown)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChecklistItem {
    pub text: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub critical: bool,
}

impl ChecklistItem {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            critical: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SectionChecklist {
    pub section_id: SectionId,
    pub items: Vec<ChecklistItem>,
}

impl SectionChecklist {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
