//! WASM bindings for the studio

use js_sys::Function;
use wasm_bindgen::prelude::*;

use crate::document::{
    AppLang, Course, CvIcons, CvLabels, Education, Language, PersonalInfo, Project, Reference,
    SectionLayout, Skill, WorkExperience,
};
use crate::export::prepare_capture_pages;
use crate::CvStudio;

/// Initialize panic hook for better error messages
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

fn to_js<T: serde::Serialize>(value: &T) -> JsValue {
    serde_wasm_bindgen::to_value(value).unwrap_or(JsValue::NULL)
}

/// WASM-exposed studio wrapper. One instance per preview component.
#[wasm_bindgen]
pub struct WasmCvStudio {
    studio: CvStudio,
    on_pages_changed: Option<Function>,
}

#[wasm_bindgen]
impl WasmCvStudio {
    #[wasm_bindgen(constructor)]
    pub fn new(lang: Option<String>) -> Self {
        let lang = lang.as_deref().map(AppLang::parse).unwrap_or_default();
        Self {
            studio: CvStudio::new(lang),
            on_pages_changed: None,
        }
    }

    /// The preview viewport exists; layout passes may run.
    #[wasm_bindgen(js_name = attachView)]
    pub fn attach_view(&mut self) {
        self.studio.attach_view();
    }

    /// Advance one animation frame; fires the pages-changed callback when
    /// the layout actually ran.
    pub fn tick(&mut self) -> bool {
        let changed = self.studio.tick();
        if changed {
            if let Some(callback) = &self.on_pages_changed {
                let count = self.studio.page_count() as u32;
                let _ = callback.call1(&JsValue::NULL, &JsValue::from(count));
            }
        }
        changed
    }

    #[wasm_bindgen(js_name = requestPaginate)]
    pub fn request_paginate(&mut self) {
        self.studio.request_paginate();
    }

    /// Component teardown: drop any pending layout work.
    #[wasm_bindgen(js_name = cancelPending)]
    pub fn cancel_pending(&mut self) {
        self.studio.cancel_pending();
    }

    #[wasm_bindgen(js_name = onPagesChanged)]
    pub fn on_pages_changed(&mut self, callback: Option<Function>) {
        self.on_pages_changed = callback;
    }

    // --- document ---

    /// Replace the document from persisted JSON; malformed input degrades
    /// to defaults field by field.
    #[wasm_bindgen(js_name = loadDocumentJson)]
    pub fn load_document_json(&mut self, json: &str) {
        let lang = self.studio.lang();
        self.studio.edit(|doc| {
            *doc = match serde_json::from_str(json) {
                Ok(value) => crate::CvDocument::from_json_value(value, lang),
                Err(err) => {
                    log::warn!("stored document is not valid JSON, starting fresh: {err}");
                    crate::CvDocument::new(lang)
                }
            };
        });
    }

    #[wasm_bindgen(js_name = documentJson)]
    pub fn document_json(&self) -> String {
        serde_json::to_string(&self.studio.document).unwrap_or_else(|_| "{}".to_string())
    }

    #[wasm_bindgen(js_name = setLanguage)]
    pub fn set_language(&mut self, lang: &str) {
        self.studio.set_lang(AppLang::parse(lang));
    }

    #[wasm_bindgen(js_name = hasData)]
    pub fn has_data(&self) -> bool {
        self.studio.has_data()
    }

    #[wasm_bindgen(js_name = setPersonalInfo)]
    pub fn set_personal_info(&mut self, value: JsValue) -> bool {
        match serde_wasm_bindgen::from_value::<PersonalInfo>(value) {
            Ok(info) => {
                self.studio.edit(|doc| doc.update_personal_info(|slot| *slot = info));
                true
            }
            Err(_) => false,
        }
    }

    #[wasm_bindgen(js_name = setLabels)]
    pub fn set_labels(&mut self, value: JsValue) -> bool {
        match serde_wasm_bindgen::from_value::<CvLabels>(value) {
            Ok(labels) => {
                self.studio.edit(|doc| doc.set_labels(labels));
                true
            }
            Err(_) => false,
        }
    }

    #[wasm_bindgen(js_name = resetLabels)]
    pub fn reset_labels(&mut self) {
        let lang = self.studio.lang();
        self.studio.edit(|doc| doc.reset_labels(lang));
    }

    #[wasm_bindgen(js_name = setIcons)]
    pub fn set_icons(&mut self, value: JsValue) -> bool {
        match serde_wasm_bindgen::from_value::<CvIcons>(value) {
            Ok(icons) => {
                self.studio.edit(|doc| doc.set_icons(icons));
                true
            }
            Err(_) => false,
        }
    }

    #[wasm_bindgen(js_name = resetIcons)]
    pub fn reset_icons(&mut self) {
        self.studio.edit(|doc| doc.reset_icons());
    }

    #[wasm_bindgen(js_name = setSectionLayout)]
    pub fn set_section_layout(&mut self, value: JsValue) -> bool {
        match serde_wasm_bindgen::from_value::<SectionLayout>(value) {
            Ok(layout) => {
                self.studio.edit(|doc| doc.set_section_layout(layout));
                true
            }
            Err(_) => false,
        }
    }

    #[wasm_bindgen(js_name = resetSectionLayout)]
    pub fn reset_section_layout(&mut self) {
        self.studio.edit(|doc| doc.reset_section_layout());
    }

    #[wasm_bindgen(js_name = clearDocument)]
    pub fn clear_document(&mut self) {
        let lang = self.studio.lang();
        self.studio.edit(|doc| doc.clear(lang));
    }

    // --- style ---

    #[wasm_bindgen(js_name = setTemplate)]
    pub fn set_template(&mut self, id: &str) -> bool {
        self.studio.restyle(|style| style.set_template(id))
    }

    #[wasm_bindgen(js_name = setPrimaryColor)]
    pub fn set_primary_color(&mut self, color: &str) -> bool {
        self.studio.restyle(|style| style.set_primary_color(color))
    }

    #[wasm_bindgen(js_name = setPaperColor)]
    pub fn set_paper_color(&mut self, color: &str) -> bool {
        self.studio.restyle(|style| style.set_paper_color(color))
    }

    #[wasm_bindgen(js_name = setFontFamily)]
    pub fn set_font_family(&mut self, stack: &str) -> bool {
        self.studio.restyle(|style| style.set_font_family(stack))
    }

    #[wasm_bindgen(js_name = setFontSize)]
    pub fn set_font_size(&mut self, raw: &str) {
        self.studio.restyle(|style| style.set_font_size_raw(raw));
    }

    /// The built-in template gallery, serialized for the picker UI.
    pub fn templates(&self) -> JsValue {
        to_js(&crate::style::builtin_templates())
    }

    #[wasm_bindgen(js_name = templateId)]
    pub fn template_id(&self) -> String {
        self.studio.style.template_id().to_string()
    }

    #[wasm_bindgen(js_name = primaryColor)]
    pub fn primary_color(&self) -> String {
        self.studio.style.primary_color().to_string()
    }

    #[wasm_bindgen(js_name = paperColor)]
    pub fn paper_color(&self) -> String {
        self.studio.style.paper_color().to_string()
    }

    #[wasm_bindgen(js_name = fontFamily)]
    pub fn font_family(&self) -> String {
        self.studio.style.font_family().to_string()
    }

    #[wasm_bindgen(js_name = fontSize)]
    pub fn font_size(&self) -> String {
        self.studio.style.font_size().as_str().to_string()
    }

    /// Age in whole years for an ISO birth date; the host supplies today's
    /// date. Returns undefined for unparsable or out-of-range input.
    #[wasm_bindgen(js_name = ageFromBirthDate)]
    pub fn age_from_birth_date(birth_date: &str, year: i32, month: u32, day: u32) -> Option<i32> {
        crate::document::age_on(birth_date, (year, month, day))
    }

    // --- layout output ---

    #[wasm_bindgen(js_name = pageCount)]
    pub fn page_count(&self) -> usize {
        self.studio.page_count()
    }

    #[wasm_bindgen(js_name = pageViews)]
    pub fn page_views(&self) -> JsValue {
        to_js(&self.studio.page_views())
    }

    // --- export ---

    /// Claim the export guard, force a synchronous layout pass, and return
    /// the page snapshots to capture (with the photo substituted when
    /// provided). Throws when an export is already running.
    #[wasm_bindgen(js_name = beginExportCapture)]
    pub fn begin_export_capture(&mut self, capture_photo: Option<String>) -> Result<JsValue, JsValue> {
        self.studio
            .exporter()
            .begin_capture()
            .map_err(|err| JsValue::from_str(&err.to_string()))?;
        self.studio.update_layout();
        let pages = prepare_capture_pages(&self.studio.page_views(), capture_photo.as_deref());
        Ok(to_js(&pages))
    }

    /// Release the export guard once the host finished (or abandoned) the
    /// capture.
    #[wasm_bindgen(js_name = finishExportCapture)]
    pub fn finish_export_capture(&mut self) {
        self.studio.exporter().finish_capture();
    }

    #[wasm_bindgen(js_name = exportFileName)]
    pub fn export_file_name(&self) -> String {
        self.studio.export_file_name()
    }
}

impl Default for WasmCvStudio {
    fn default() -> Self {
        Self::new(None)
    }
}

macro_rules! collection_bindings {
    ($ty:ty, $add_js:literal, $add:ident, $set_js:literal, $set:ident,
     $update_js:literal, $update:ident, $remove_js:literal, $remove:ident) => {
        #[wasm_bindgen]
        impl WasmCvStudio {
            #[wasm_bindgen(js_name = $add_js)]
            pub fn $add(&mut self, value: JsValue) -> Option<String> {
                let item: $ty = serde_wasm_bindgen::from_value(value).ok()?;
                Some(self.studio.edit(|doc| doc.$add(item)))
            }

            #[wasm_bindgen(js_name = $set_js)]
            pub fn $set(&mut self, value: JsValue) -> bool {
                match serde_wasm_bindgen::from_value::<Vec<$ty>>(value) {
                    Ok(items) => {
                        self.studio.edit(|doc| doc.$set(items));
                        true
                    }
                    Err(_) => false,
                }
            }

            /// Whole-record replacement; the stored id is kept.
            #[wasm_bindgen(js_name = $update_js)]
            pub fn $update(&mut self, id: &str, value: JsValue) -> bool {
                let Ok(item) = serde_wasm_bindgen::from_value::<$ty>(value) else {
                    return false;
                };
                self.studio.edit(|doc| {
                    doc.$update(id, |slot| {
                        let kept = std::mem::take(&mut slot.id);
                        *slot = item;
                        slot.id = kept;
                    })
                })
            }

            #[wasm_bindgen(js_name = $remove_js)]
            pub fn $remove(&mut self, id: &str) -> bool {
                self.studio.edit(|doc| doc.$remove(id))
            }
        }
    };
}

collection_bindings!(
    WorkExperience,
    "addWorkExperience",
    add_work_experience,
    "setWorkExperience",
    set_work_experience,
    "updateWorkExperience",
    update_work_experience,
    "removeWorkExperience",
    remove_work_experience
);
collection_bindings!(
    Education,
    "addEducation",
    add_education,
    "setEducation",
    set_education,
    "updateEducation",
    update_education,
    "removeEducation",
    remove_education
);
collection_bindings!(
    Course,
    "addCourse",
    add_course,
    "setCourses",
    set_courses,
    "updateCourse",
    update_course,
    "removeCourse",
    remove_course
);
collection_bindings!(
    Skill,
    "addSkill",
    add_skill,
    "setSkills",
    set_skills,
    "updateSkill",
    update_skill,
    "removeSkill",
    remove_skill
);
collection_bindings!(
    Language,
    "addLanguage",
    add_language,
    "setLanguages",
    set_languages,
    "updateLanguage",
    update_language,
    "removeLanguage",
    remove_language
);
collection_bindings!(
    Project,
    "addProject",
    add_project,
    "setProjects",
    set_projects,
    "updateProject",
    update_project,
    "removeProject",
    remove_project
);
collection_bindings!(
    Reference,
    "addReference",
    add_reference,
    "setReferences",
    set_references,
    "updateReference",
    update_reference,
    "removeReference",
    remove_reference
);
