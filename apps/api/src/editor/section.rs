use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The fixed set of resume sections this editor knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionId {
    Summary,
    Experience,
    Education,
    Skills,
    Projects,
}

impl SectionId {
    /// All sections in display order.
    pub const ALL: [SectionId; 5] = [
        SectionId::Summary,
        SectionId::Experience,
        SectionId::Education,
        SectionId::Skills,
        SectionId::Projects,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionId::Summary => "summary",
            SectionId::Experience => "experience",
            SectionId::Education => "education",
            SectionId::Skills => "skills",
            SectionId::Projects => "projects",
        }
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A total mapping from section id to committed text.
///
/// Every `SectionId` is always present; construction fills missing keys
/// with empty strings and there is no way to remove one. This is the
/// "no section is ever absent once the document is initialized" rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Sections {
    map: BTreeMap<SectionId, String>,
}

impl Sections {
    pub fn get(&self, id: SectionId) -> &str {
        // Safe by construction: every id is inserted at creation.
        self.map.get(&id).map(String::as_str).unwrap_or_default()
    }

    pub fn set(&mut self, id: SectionId, text: String) {
        self.map.insert(id, text);
    }

    pub fn iter(&self) -> impl Iterator<Item = (SectionId, &str)> {
        self.map.iter().map(|(id, text)| (*id, text.as_str()))
    }
}

impl Default for Sections {
    fn default() -> Self {
        Sections::from(BTreeMap::new())
    }
}

impl From<BTreeMap<SectionId, String>> for Sections {
    fn from(mut map: BTreeMap<SectionId, String>) -> Self {
        for id in SectionId::ALL {
            map.entry(id).or_default();
        }
        Sections { map }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_map_is_filled_with_empty_strings() {
        let mut map = BTreeMap::new();
        map.insert(SectionId::Experience, "Worked at A".to_string());
        let sections = Sections::from(map);

        assert_eq!(sections.get(SectionId::Experience), "Worked at A");
        assert_eq!(sections.get(SectionId::Summary), "");
        assert_eq!(sections.iter().count(), SectionId::ALL.len());
    }

    #[test]
    fn test_serializes_as_plain_object_with_snake_case_keys() {
        let mut sections = Sections::default();
        sections.set(SectionId::Skills, "Rust".to_string());
        let json = serde_json::to_value(&sections).unwrap();

        assert_eq!(json["skills"], "Rust");
        assert_eq!(json["summary"], "");
    }

    #[test]
    fn test_display_matches_serde_names() {
        assert_eq!(SectionId::Summary.to_string(), "summary");
        assert_eq!(SectionId::Projects.to_string(), "projects");
    }
}
