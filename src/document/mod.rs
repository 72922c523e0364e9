//! Canonical CV document: section collections, labels, icons, layout

mod icons;
mod labels;
mod section_layout;
mod sections;

pub use icons::{normalize_icon, CvIcons, KNOWN_ICONS};
pub use labels::{AppLang, CvLabels, LabelsMode};
pub use section_layout::{SectionId, SectionLayout, Zone};
pub use sections::{
    age_on, Course, Education, Language, LanguageLevel, PersonalInfo, Project, Reference,
    SectionEntry, Skill, SkillCategory, SkillLevel, WorkExperience,
};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// The whole CV document. Single source of truth for content; the layout
/// engine only ever reads from it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CvDocument {
    pub personal_info: PersonalInfo,
    pub work_experience: Vec<WorkExperience>,
    pub education: Vec<Education>,
    pub courses: Vec<Course>,
    pub skills: Vec<Skill>,
    pub languages: Vec<Language>,
    pub projects: Vec<Project>,
    pub references: Vec<Reference>,
    pub labels: CvLabels,
    pub labels_mode: LabelsMode,
    pub icons: CvIcons,
    pub section_layout: SectionLayout,
    /// Monotonic version counter, bumped on every mutation.
    #[serde(skip)]
    version: u64,
    #[serde(skip)]
    next_item_id: u64,
}

impl Default for CvDocument {
    fn default() -> Self {
        Self::new(AppLang::default())
    }
}

macro_rules! collection_ops {
    ($field:ident, $ty:ty, $add:ident, $set:ident, $update:ident, $remove:ident) => {
        /// Add an entry; the store assigns the id and returns it.
        pub fn $add(&mut self, mut item: $ty) -> String {
            let id = self.generate_id();
            item.id = id.clone();
            self.$field.push(item);
            self.touch();
            id
        }

        /// Replace the whole collection (drag-reorder output path).
        pub fn $set(&mut self, items: Vec<$ty>) {
            self.$field = items;
            self.touch();
        }

        /// Edit the entry with the given id in place.
        pub fn $update(&mut self, id: &str, edit: impl FnOnce(&mut $ty)) -> bool {
            match self.$field.iter_mut().find(|item| item.id == id) {
                Some(item) => {
                    edit(item);
                    self.touch();
                    true
                }
                None => false,
            }
        }

        pub fn $remove(&mut self, id: &str) -> bool {
            let before = self.$field.len();
            self.$field.retain(|item| item.id != id);
            let removed = self.$field.len() != before;
            if removed {
                self.touch();
            }
            removed
        }
    };
}

impl CvDocument {
    pub fn new(lang: AppLang) -> Self {
        Self {
            personal_info: PersonalInfo::default(),
            work_experience: Vec::new(),
            education: Vec::new(),
            courses: Vec::new(),
            skills: Vec::new(),
            languages: Vec::new(),
            projects: Vec::new(),
            references: Vec::new(),
            labels: CvLabels::defaults(lang),
            labels_mode: LabelsMode::Auto,
            icons: CvIcons::default(),
            section_layout: SectionLayout::default(),
            version: 0,
            next_item_id: 1,
        }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// True when the preview has anything to show. Courses and references
    /// alone do not count.
    pub fn has_data(&self) -> bool {
        !self.personal_info.first_name.trim().is_empty()
            || !self.personal_info.last_name.trim().is_empty()
            || !self.work_experience.is_empty()
            || !self.education.is_empty()
            || !self.skills.is_empty()
            || !self.languages.is_empty()
            || !self.projects.is_empty()
    }

    pub fn update_personal_info(&mut self, edit: impl FnOnce(&mut PersonalInfo)) {
        edit(&mut self.personal_info);
        self.touch();
    }

    collection_ops!(
        work_experience,
        WorkExperience,
        add_work_experience,
        set_work_experience,
        update_work_experience,
        remove_work_experience
    );
    collection_ops!(
        education,
        Education,
        add_education,
        set_education,
        update_education,
        remove_education
    );
    collection_ops!(courses, Course, add_course, set_courses, update_course, remove_course);
    collection_ops!(skills, Skill, add_skill, set_skills, update_skill, remove_skill);
    collection_ops!(
        languages,
        Language,
        add_language,
        set_languages,
        update_language,
        remove_language
    );
    collection_ops!(projects, Project, add_project, set_projects, update_project, remove_project);
    collection_ops!(
        references,
        Reference,
        add_reference,
        set_references,
        update_reference,
        remove_reference
    );

    /// Saving custom labels pins them against language switches.
    pub fn set_labels(&mut self, labels: CvLabels) {
        self.labels = labels;
        self.labels_mode = LabelsMode::Custom;
        self.touch();
    }

    pub fn reset_labels(&mut self, lang: AppLang) {
        self.labels = CvLabels::defaults(lang);
        self.labels_mode = LabelsMode::Auto;
        self.touch();
    }

    /// Auto-mode labels follow the app language; custom labels are kept.
    pub fn apply_language(&mut self, lang: AppLang) {
        if self.labels_mode == LabelsMode::Auto {
            self.labels = CvLabels::defaults(lang);
            self.touch();
        }
    }

    pub fn set_icons(&mut self, icons: CvIcons) {
        self.icons = icons.normalized();
        self.touch();
    }

    pub fn reset_icons(&mut self) {
        self.icons = CvIcons::default();
        self.touch();
    }

    pub fn set_section_layout(&mut self, layout: SectionLayout) {
        self.section_layout = layout.sanitized();
        self.touch();
    }

    pub fn reset_section_layout(&mut self) {
        self.section_layout = SectionLayout::default();
        self.touch();
    }

    pub fn clear(&mut self, lang: AppLang) {
        let version = self.version;
        *self = Self::new(lang);
        self.version = version + 1;
    }

    /// Rebuild a document from persisted JSON, tolerating partial, missing,
    /// or malformed fields from older stored versions. Never fails: anything
    /// unusable is replaced by its default.
    pub fn from_json_value(value: Value, lang: AppLang) -> Self {
        let mut doc = CvDocument::new(lang);
        let Value::Object(mut obj) = value else {
            return doc;
        };

        fn field<T: DeserializeOwned>(
            obj: &mut serde_json::Map<String, Value>,
            key: &str,
        ) -> Option<T> {
            obj.remove(key).and_then(|v| serde_json::from_value(v).ok())
        }

        if let Some(info) = field::<PersonalInfo>(&mut obj, "personalInfo") {
            doc.personal_info = info;
        }
        doc.work_experience = field(&mut obj, "workExperience").unwrap_or_default();
        doc.education = field(&mut obj, "education").unwrap_or_default();
        doc.courses = field(&mut obj, "courses").unwrap_or_default();
        doc.skills = field(&mut obj, "skills").unwrap_or_default();
        doc.languages = field(&mut obj, "languages").unwrap_or_default();
        doc.projects = field(&mut obj, "projects").unwrap_or_default();
        doc.references = field(&mut obj, "references").unwrap_or_default();
        if let Some(labels) = field::<CvLabels>(&mut obj, "labels") {
            doc.labels = labels;
        }
        doc.labels_mode = field(&mut obj, "labelsMode").unwrap_or_default();
        if let Some(icons) = field::<CvIcons>(&mut obj, "icons") {
            doc.icons = icons.normalized();
        }
        if let Some(layout) = field::<SectionLayout>(&mut obj, "sectionLayout") {
            // Deserialize already repairs the partition.
            doc.section_layout = layout;
        }

        // Auto mode never trusts stored labels verbatim.
        if doc.labels_mode == LabelsMode::Auto {
            doc.labels = CvLabels::defaults(lang);
        }

        doc.ensure_ids();
        doc
    }

    pub fn to_json_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    fn touch(&mut self) {
        self.version += 1;
    }

    fn generate_id(&mut self) -> String {
        loop {
            let id = format!("item-{}", self.next_item_id);
            self.next_item_id += 1;
            if !self.id_taken(&id) {
                return id;
            }
        }
    }

    fn id_taken(&self, id: &str) -> bool {
        fn has<T: SectionEntry>(items: &[T], id: &str) -> bool {
            items.iter().any(|item| item.id() == id)
        }
        has(&self.work_experience, id)
            || has(&self.education, id)
            || has(&self.courses, id)
            || has(&self.skills, id)
            || has(&self.languages, id)
            || has(&self.projects, id)
            || has(&self.references, id)
    }

    /// Assign fresh ids to any loaded entry that lacks one.
    fn ensure_ids(&mut self) {
        macro_rules! fill {
            ($field:ident) => {
                for idx in 0..self.$field.len() {
                    if self.$field[idx].id.is_empty() {
                        let id = self.generate_id();
                        self.$field[idx].id = id;
                    }
                }
            };
        }
        fill!(work_experience);
        fill!(education);
        fill!(courses);
        fill!(skills);
        fill!(languages);
        fill!(projects);
        fill!(references);
    }
}
