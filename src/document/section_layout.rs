//! Section identifiers and the main/sidebar layout partition

use serde::{Deserialize, Serialize};

/// Closed set of CV sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionId {
    Profile,
    WorkExperience,
    Education,
    References,
    Languages,
    Skills,
    Courses,
    Projects,
}

impl SectionId {
    /// Every section, in default presentation order (main first).
    pub const ALL: [SectionId; 8] = [
        SectionId::Profile,
        SectionId::WorkExperience,
        SectionId::Education,
        SectionId::References,
        SectionId::Languages,
        SectionId::Skills,
        SectionId::Courses,
        SectionId::Projects,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionId::Profile => "profile",
            SectionId::WorkExperience => "workExperience",
            SectionId::Education => "education",
            SectionId::References => "references",
            SectionId::Languages => "languages",
            SectionId::Skills => "skills",
            SectionId::Courses => "courses",
            SectionId::Projects => "projects",
        }
    }

    pub fn parse(raw: &str) -> Option<SectionId> {
        SectionId::ALL.iter().copied().find(|id| id.as_str() == raw)
    }

    /// Sections paginated per entry with a separate leading title node.
    /// Only these are subject to the title-carry-forward rule.
    pub fn keeps_title_with_items(&self) -> bool {
        matches!(
            self,
            SectionId::WorkExperience | SectionId::Education | SectionId::References
        )
    }

    pub fn default_icon(&self) -> &'static str {
        match self {
            SectionId::Profile => "person",
            SectionId::WorkExperience => "work",
            SectionId::Education => "school",
            SectionId::References => "groups",
            SectionId::Languages => "translate",
            SectionId::Skills => "psychology",
            SectionId::Courses => "menu_book",
            SectionId::Projects => "folder",
        }
    }
}

/// Ordered partition of the section set into the two page zones.
///
/// Invariant (after `sanitize`): every `SectionId` appears exactly once
/// across `main` and `sidebar`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionLayout {
    pub main: Vec<SectionId>,
    pub sidebar: Vec<SectionId>,
}

impl Default for SectionLayout {
    fn default() -> Self {
        Self {
            main: vec![
                SectionId::Profile,
                SectionId::WorkExperience,
                SectionId::Education,
                SectionId::References,
            ],
            sidebar: vec![
                SectionId::Languages,
                SectionId::Skills,
                SectionId::Courses,
                SectionId::Projects,
            ],
        }
    }
}

impl SectionLayout {
    /// Rebuild a valid partition from possibly stale persisted id lists.
    /// Unknown ids are dropped, duplicates keep their first occurrence
    /// (main scanned before sidebar), and missing ids are appended in the
    /// default order: default-main gaps first, then default-sidebar, and
    /// any residue goes to the sidebar.
    pub fn from_raw(main: &[String], sidebar: &[String]) -> Self {
        let defaults = SectionLayout::default();
        let mut seen: Vec<SectionId> = Vec::with_capacity(SectionId::ALL.len());
        let mut clean_main = Vec::new();
        let mut clean_sidebar = Vec::new();

        let take = |raw: &str, out: &mut Vec<SectionId>, seen: &mut Vec<SectionId>| {
            if let Some(id) = SectionId::parse(raw) {
                if !seen.contains(&id) {
                    seen.push(id);
                    out.push(id);
                }
            }
        };

        for raw in main {
            take(raw, &mut clean_main, &mut seen);
        }
        for raw in sidebar {
            take(raw, &mut clean_sidebar, &mut seen);
        }

        for id in &defaults.main {
            if !seen.contains(id) {
                seen.push(*id);
                clean_main.push(*id);
            }
        }
        for id in &defaults.sidebar {
            if !seen.contains(id) {
                seen.push(*id);
                clean_sidebar.push(*id);
            }
        }
        for id in SectionId::ALL {
            if !seen.contains(&id) {
                seen.push(id);
                clean_sidebar.push(id);
            }
        }

        Self {
            main: clean_main,
            sidebar: clean_sidebar,
        }
    }

    /// Re-run the repair on an in-memory layout (drag-and-drop output path).
    pub fn sanitized(&self) -> Self {
        let to_raw = |ids: &[SectionId]| {
            ids.iter()
                .map(|id| id.as_str().to_string())
                .collect::<Vec<_>>()
        };
        Self::from_raw(&to_raw(&self.main), &to_raw(&self.sidebar))
    }

    /// Zone and position of a section, if assigned.
    pub fn position_of(&self, section: SectionId) -> Option<(Zone, usize)> {
        if let Some(idx) = self.main.iter().position(|id| *id == section) {
            return Some((Zone::Main, idx));
        }
        self.sidebar
            .iter()
            .position(|id| *id == section)
            .map(|idx| (Zone::Sidebar, idx))
    }
}

impl<'de> Deserialize<'de> for SectionLayout {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Default, Deserialize)]
        #[serde(default)]
        struct Raw {
            main: Vec<String>,
            sidebar: Vec<String>,
        }

        let raw = Raw::deserialize(deserializer)?;
        Ok(SectionLayout::from_raw(&raw.main, &raw.sidebar))
    }
}

/// The two page zones a section can be assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    Main,
    Sidebar,
}
