//! Per-section icon choices with normalization of stale persisted values

use serde::{Deserialize, Serialize};

use crate::document::SectionId;

/// The icon vocabulary offered by the customize screen.
pub const KNOWN_ICONS: [&str; 18] = [
    "person",
    "account_circle",
    "work",
    "work_outline",
    "school",
    "menu_book",
    "library_books",
    "translate",
    "language",
    "psychology",
    "build",
    "code",
    "folder",
    "folder_open",
    "groups",
    "contact_page",
    "verified",
    "star",
];

// Legacy icon names from older stored documents mapped to the closest
// current equivalent.
const ALIASES: [(&str, &str); 10] = [
    ("briefcase", "work"),
    ("job", "work"),
    ("university", "school"),
    ("graduation", "school"),
    ("book", "menu_book"),
    ("globe", "language"),
    ("team", "groups"),
    ("people", "groups"),
    ("tools", "build"),
    ("user", "person"),
];

/// Map a persisted icon name to a known one; unknown values fall back to
/// the section default.
pub fn normalize_icon(raw: &str, section: SectionId) -> String {
    let trimmed = raw.trim();
    if KNOWN_ICONS.contains(&trimmed) {
        return trimmed.to_string();
    }
    if let Some((_, known)) = ALIASES.iter().find(|(alias, _)| *alias == trimmed) {
        return (*known).to_string();
    }
    section.default_icon().to_string()
}

/// One icon name per section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CvIcons {
    pub profile: String,
    pub work_experience: String,
    pub education: String,
    pub references: String,
    pub languages: String,
    pub skills: String,
    pub courses: String,
    pub projects: String,
}

impl Default for CvIcons {
    fn default() -> Self {
        Self {
            profile: SectionId::Profile.default_icon().into(),
            work_experience: SectionId::WorkExperience.default_icon().into(),
            education: SectionId::Education.default_icon().into(),
            references: SectionId::References.default_icon().into(),
            languages: SectionId::Languages.default_icon().into(),
            skills: SectionId::Skills.default_icon().into(),
            courses: SectionId::Courses.default_icon().into(),
            projects: SectionId::Projects.default_icon().into(),
        }
    }
}

impl CvIcons {
    /// Replace every unknown value with its nearest known equivalent.
    pub fn normalized(&self) -> Self {
        Self {
            profile: normalize_icon(&self.profile, SectionId::Profile),
            work_experience: normalize_icon(&self.work_experience, SectionId::WorkExperience),
            education: normalize_icon(&self.education, SectionId::Education),
            references: normalize_icon(&self.references, SectionId::References),
            languages: normalize_icon(&self.languages, SectionId::Languages),
            skills: normalize_icon(&self.skills, SectionId::Skills),
            courses: normalize_icon(&self.courses, SectionId::Courses),
            projects: normalize_icon(&self.projects, SectionId::Projects),
        }
    }

    pub fn icon_for(&self, section: SectionId) -> &str {
        match section {
            SectionId::Profile => &self.profile,
            SectionId::WorkExperience => &self.work_experience,
            SectionId::Education => &self.education,
            SectionId::References => &self.references,
            SectionId::Languages => &self.languages,
            SectionId::Skills => &self.skills,
            SectionId::Courses => &self.courses,
            SectionId::Projects => &self.projects,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_icon_kept() {
        assert_eq!(normalize_icon("star", SectionId::Skills), "star");
    }

    #[test]
    fn test_alias_mapped() {
        assert_eq!(normalize_icon("briefcase", SectionId::WorkExperience), "work");
        assert_eq!(normalize_icon("globe", SectionId::Languages), "language");
    }

    #[test]
    fn test_unknown_falls_back_to_section_default() {
        assert_eq!(normalize_icon("sparkles", SectionId::Education), "school");
    }

    #[test]
    fn test_normalized_icons() {
        let icons = CvIcons {
            work_experience: "job".into(),
            skills: "???".into(),
            ..Default::default()
        };
        let fixed = icons.normalized();
        assert_eq!(fixed.work_experience, "work");
        assert_eq!(fixed.skills, "psychology");
        assert_eq!(fixed.profile, "person");
    }
}
