//! Display labels and the auto/custom labels mode

use serde::{Deserialize, Serialize};

/// Application language for auto-mode labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppLang {
    En,
    #[default]
    #[serde(other)]
    Es,
}

impl AppLang {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppLang::Es => "es",
            AppLang::En => "en",
        }
    }

    pub fn parse(raw: &str) -> AppLang {
        if raw.trim().eq_ignore_ascii_case("en") {
            AppLang::En
        } else {
            AppLang::Es
        }
    }
}

/// `Auto`: labels follow the app language. `Custom`: the user edited them
/// and they survive language switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelsMode {
    Custom,
    #[default]
    #[serde(other)]
    Auto,
}

/// User-visible section titles and contact field labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CvLabels {
    // Section titles (main column)
    pub section_profile: String,
    pub section_work_experience: String,
    pub section_education: String,
    pub section_references: String,

    // Sidebar titles
    pub section_languages: String,
    pub section_skills: String,
    pub section_courses: String,
    pub section_projects: String,

    // Contact labels
    pub label_email: String,
    pub label_phone: String,
    pub label_address: String,
    pub label_nationality: String,
    pub label_birth_date: String,
    pub label_age: String,
}

impl Default for CvLabels {
    fn default() -> Self {
        CvLabels::defaults(AppLang::Es)
    }
}

impl CvLabels {
    pub fn defaults(lang: AppLang) -> Self {
        match lang {
            AppLang::En => Self {
                section_profile: "Profile".into(),
                section_work_experience: "Work experience".into(),
                section_education: "Education".into(),
                section_references: "References".into(),
                section_languages: "Languages".into(),
                section_skills: "Skills".into(),
                section_courses: "Courses".into(),
                section_projects: "Projects".into(),
                label_email: "Email".into(),
                label_phone: "Phone".into(),
                label_address: "Address".into(),
                label_nationality: "Nationality".into(),
                label_birth_date: "Birth date".into(),
                label_age: "Age".into(),
            },
            AppLang::Es => Self {
                section_profile: "Perfil".into(),
                section_work_experience: "Experiencia profesional".into(),
                section_education: "Educación".into(),
                section_references: "Referencias".into(),
                section_languages: "Idiomas".into(),
                section_skills: "Habilidades".into(),
                section_courses: "Cursos".into(),
                section_projects: "Proyectos".into(),
                label_email: "Email".into(),
                label_phone: "Número de teléfono".into(),
                label_address: "Dirección".into(),
                label_nationality: "Nacionalidad".into(),
                label_birth_date: "Fecha de nacimiento".into(),
                label_age: "Edad".into(),
            },
        }
    }

    /// Title for a section, as currently configured.
    pub fn section_title(&self, section: crate::document::SectionId) -> &str {
        use crate::document::SectionId;
        match section {
            SectionId::Profile => &self.section_profile,
            SectionId::WorkExperience => &self.section_work_experience,
            SectionId::Education => &self.section_education,
            SectionId::References => &self.section_references,
            SectionId::Languages => &self.section_languages,
            SectionId::Skills => &self.section_skills,
            SectionId::Courses => &self.section_courses,
            SectionId::Projects => &self.section_projects,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lang_parse() {
        assert_eq!(AppLang::parse("EN"), AppLang::En);
        assert_eq!(AppLang::parse("es"), AppLang::Es);
        assert_eq!(AppLang::parse("fr"), AppLang::Es);
    }

    #[test]
    fn test_default_labels_follow_language() {
        assert_eq!(CvLabels::defaults(AppLang::En).section_education, "Education");
        assert_eq!(CvLabels::defaults(AppLang::Es).section_education, "Educación");
    }

    #[test]
    fn test_labels_mode_unknown_is_auto() {
        let mode: LabelsMode = serde_json::from_str("\"whatever\"").unwrap();
        assert_eq!(mode, LabelsMode::Auto);
    }

    #[test]
    fn test_unknown_lang_deserializes_to_es() {
        let lang: AppLang = serde_json::from_str("\"de\"").unwrap();
        assert_eq!(lang, AppLang::Es);
    }
}
