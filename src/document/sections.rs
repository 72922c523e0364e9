//! Section item records: one struct per repeatable CV section

use serde::{Deserialize, Serialize};

/// Behavior shared by every repeatable section entry.
pub trait SectionEntry {
    /// Stable identifier, unique within the owning collection.
    fn id(&self) -> &str;

    fn visible_flag(&self) -> Option<bool>;

    /// An absent flag means visible (older stored documents predate it).
    fn is_visible(&self) -> bool {
        self.visible_flag() != Some(false)
    }
}

/// Personal information block shown in the page header.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PersonalInfo {
    pub first_name: String,
    pub last_name: String,
    pub nationality: String,
    pub birth_date: String,
    pub job_title: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub summary: String,
    /// Profile photo as a data URL; empty when unset.
    pub photo: String,
}

impl PersonalInfo {
    pub fn full_name(&self) -> String {
        [self.first_name.as_str(), self.last_name.as_str()]
            .iter()
            .filter(|part| !part.trim().is_empty())
            .map(|part| part.trim())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WorkExperience {
    pub id: String,
    pub company: String,
    pub role: String,
    pub start_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    pub currently_working: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub achievements: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Education {
    pub id: String,
    pub institution: String,
    pub degree: String,
    pub start_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    pub in_progress: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gpa: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub institution: Option<String>,
    /// Free-text date (e.g. "2025", "Jan 2025", "2023-2024").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
}

/// Proficiency scale for skills.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillLevel {
    Basic,
    Advanced,
    Expert,
    // The catch-all must be the last variant.
    #[default]
    #[serde(other)]
    Intermediate,
}

impl SkillLevel {
    pub fn label(&self) -> &'static str {
        match self {
            SkillLevel::Basic => "Basic",
            SkillLevel::Intermediate => "Intermediate",
            SkillLevel::Advanced => "Advanced",
            SkillLevel::Expert => "Expert",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillCategory {
    Soft,
    #[default]
    #[serde(other)]
    Technical,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Skill {
    pub id: String,
    pub name: String,
    pub level: SkillLevel,
    pub category: SkillCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
}

/// Proficiency scale for spoken languages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageLevel {
    Basic,
    Advanced,
    Native,
    #[default]
    #[serde(other)]
    Intermediate,
}

impl LanguageLevel {
    pub fn label(&self) -> &'static str {
        match self {
            LanguageLevel::Basic => "Basic",
            LanguageLevel::Intermediate => "Intermediate",
            LanguageLevel::Advanced => "Advanced",
            LanguageLevel::Native => "Native",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Language {
    pub id: String,
    pub language: String,
    pub level: LanguageLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub technologies: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Reference {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationship: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
}

macro_rules! section_entry {
    ($ty:ty) => {
        impl SectionEntry for $ty {
            fn id(&self) -> &str {
                &self.id
            }

            fn visible_flag(&self) -> Option<bool> {
                self.visible
            }
        }
    };
}

section_entry!(WorkExperience);
section_entry!(Education);
section_entry!(Course);
section_entry!(Skill);
section_entry!(Language);
section_entry!(Project);
section_entry!(Reference);

/// Age in whole years for an ISO `YYYY-MM-DD` birth date, evaluated against
/// `today` as (year, month, day). `None` for unparsable dates or results
/// outside 0..=120.
pub fn age_on(birth_date: &str, today: (i32, u32, u32)) -> Option<i32> {
    let (year, month, day) = parse_iso_date(birth_date)?;
    let (ty, tm, td) = today;

    let mut age = ty - year;
    if (tm, td) < (month, day) {
        age -= 1;
    }
    (0..=120).contains(&age).then_some(age)
}

fn parse_iso_date(raw: &str) -> Option<(i32, u32, u32)> {
    let mut parts = raw.trim().splitn(3, '-');
    let year: i32 = parts.next()?.parse().ok()?;
    let month: u32 = parts.next()?.parse().ok()?;
    let day: u32 = parts.next()?.parse().ok()?;
    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return None;
    }
    Some((year, month, day))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_flag_absent_means_visible() {
        let item = WorkExperience::default();
        assert!(item.is_visible());

        let hidden = WorkExperience {
            visible: Some(false),
            ..Default::default()
        };
        assert!(!hidden.is_visible());

        let shown = WorkExperience {
            visible: Some(true),
            ..Default::default()
        };
        assert!(shown.is_visible());
    }

    #[test]
    fn test_full_name_skips_empty_parts() {
        let info = PersonalInfo {
            first_name: "Ada".to_string(),
            last_name: String::new(),
            ..Default::default()
        };
        assert_eq!(info.full_name(), "Ada");

        let both = PersonalInfo {
            first_name: " Ada ".to_string(),
            last_name: "Lovelace".to_string(),
            ..Default::default()
        };
        assert_eq!(both.full_name(), "Ada Lovelace");
    }

    #[test]
    fn test_age_on() {
        assert_eq!(age_on("1990-06-15", (2026, 8, 25)), Some(36));
        assert_eq!(age_on("1990-12-31", (2026, 8, 25)), Some(35));
        assert_eq!(age_on("not-a-date", (2026, 8, 25)), None);
        assert_eq!(age_on("1850-01-01", (2026, 8, 25)), None);
        assert_eq!(age_on("2030-01-01", (2026, 8, 25)), None);
    }

    #[test]
    fn test_item_deserializes_with_missing_fields() {
        let item: WorkExperience = serde_json::from_str(r#"{"id":"w1"}"#).unwrap();
        assert_eq!(item.id, "w1");
        assert!(item.achievements.is_empty());
        assert!(item.is_visible());
    }

    #[test]
    fn test_unknown_level_coerces_to_intermediate() {
        let skill: Skill = serde_json::from_str(
            r#"{"id":"s1","name":"Rust","level":"wizard","category":"mystic"}"#,
        )
        .unwrap();
        assert_eq!(skill.level, SkillLevel::Intermediate);
        assert_eq!(skill.category, SkillCategory::Technical);

        let lang: Language =
            serde_json::from_str(r#"{"id":"l1","language":"Elvish","level":"fluent"}"#).unwrap();
        assert_eq!(lang.level, LanguageLevel::Intermediate);
    }
}
