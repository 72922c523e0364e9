//! papercv: the compiled core of an in-browser CV builder
//!
//! The crate owns the document, the style settings, and the paginated
//! layout; the JS shell renders page snapshots and drives the scheduler
//! with one `tick` per animation frame. Pagination is a pure function of
//! document + style + page geometry — pages are output artifacts, never
//! edited state.

pub mod document;
pub mod export;
pub mod flow;
pub mod layout;
pub mod render;
pub mod schedule;
pub mod storage;
pub mod style;
pub mod wasm;

pub use document::{AppLang, CvDocument, SectionId, SectionLayout};
pub use export::{ExportError, ExportOutput, Exporter, PageImage, PageRasterizer};
pub use flow::{Column, ColumnFlows, FlowBuilder, FlowNode, NodeRole, TextBlock, TextKind};
pub use layout::{FrameMetrics, LayoutState, PageConstraints, PageFrame, TextMetrics};
pub use render::{build_page_views, PageView, PlacedNode};
pub use schedule::{FrameAction, FrameScheduler};
pub use storage::{MemoryStorage, StorageBackend, StorageError};
pub use style::{FontSizeKey, RenderStyle, StyleSettings, Template};
pub use wasm::WasmCvStudio;

use export::export_file_name;

/// The whole studio: document, style, layout, scheduler. Every mutation
/// marks the layout dirty and schedules a rebuild; the host's frame ticks
/// turn that into actual layout passes.
pub struct CvStudio {
    pub document: CvDocument,
    pub style: StyleSettings,
    pub layout: LayoutState,
    scheduler: FrameScheduler,
    exporter: Exporter,
    lang: AppLang,
    layout_dirty: bool,
}

impl Default for CvStudio {
    fn default() -> Self {
        Self::new(AppLang::default())
    }
}

impl CvStudio {
    pub fn new(lang: AppLang) -> Self {
        Self {
            document: CvDocument::new(lang),
            style: StyleSettings::default(),
            layout: LayoutState::default(),
            scheduler: FrameScheduler::new(),
            exporter: Exporter::new(),
            lang,
            layout_dirty: true,
        }
    }

    /// Restore document, style, and language from a storage backend.
    pub fn load(backend: &dyn StorageBackend) -> Self {
        let lang = storage::load_lang(backend);
        let mut studio = Self::new(lang);
        studio.document = storage::load_document(backend, lang);
        studio.style = storage::load_style(backend);
        studio
    }

    pub fn save(&self, backend: &mut dyn StorageBackend) -> Result<(), StorageError> {
        storage::save_document(backend, &self.document)?;
        storage::save_style(backend, &self.style)?;
        storage::save_lang(backend, self.lang)
    }

    pub fn lang(&self) -> AppLang {
        self.lang
    }

    pub fn set_lang(&mut self, lang: AppLang) {
        self.lang = lang;
        self.document.apply_language(lang);
        self.mark_dirty();
    }

    /// Run a closure against the document, then schedule a rebuild.
    pub fn edit<R>(&mut self, edit: impl FnOnce(&mut CvDocument) -> R) -> R {
        let result = edit(&mut self.document);
        self.mark_dirty();
        result
    }

    /// Run a closure against the style settings, then schedule a rebuild.
    pub fn restyle<R>(&mut self, restyle: impl FnOnce(&mut StyleSettings) -> R) -> R {
        let result = restyle(&mut self.style);
        self.mark_dirty();
        result
    }

    fn mark_dirty(&mut self) {
        self.layout_dirty = true;
        self.scheduler.request_rebuild();
    }

    /// The host viewport exists; layout passes may run from now on.
    pub fn attach_view(&mut self) {
        self.layout.attach_view();
        self.mark_dirty();
    }

    pub fn request_paginate(&mut self) {
        self.scheduler.request_paginate();
    }

    pub fn cancel_pending(&mut self) {
        self.scheduler.cancel();
    }

    /// Advance one display frame. A rebuild reads the document; a plain
    /// pagination redistributes the already-placed flows. Returns true when
    /// a layout pass ran.
    pub fn tick(&mut self) -> bool {
        match self.scheduler.tick() {
            Some(FrameAction::Rebuild) => self.relayout_now(),
            Some(FrameAction::Paginate) => {
                if self.layout_dirty {
                    self.relayout_now()
                } else {
                    self.layout.repaginate_in_place(&self.style.resolve())
                }
            }
            None => false,
        }
    }

    fn relayout_now(&mut self) -> bool {
        let style = self.style.resolve();
        if self.layout.relayout(&self.document, &style) {
            self.layout_dirty = false;
            true
        } else {
            false
        }
    }

    /// Force a synchronous layout pass, skipping the frame deferral.
    pub fn update_layout(&mut self) -> bool {
        if self.relayout_now() {
            self.scheduler.cancel();
            true
        } else {
            false
        }
    }

    pub fn page_count(&self) -> usize {
        self.layout.page_count()
    }

    pub fn page_views(&self) -> Vec<PageView> {
        build_page_views(&self.layout)
    }

    pub fn has_data(&self) -> bool {
        self.document.has_data()
    }

    pub fn export_file_name(&self) -> String {
        export_file_name(&self.document.personal_info)
    }

    pub fn exporter(&self) -> &Exporter {
        &self.exporter
    }

    /// Synchronous export against a host rasterizer: forces a layout pass,
    /// then captures every page in order.
    pub fn export<R: PageRasterizer>(
        &mut self,
        capture_photo: Option<&str>,
        rasterizer: &mut R,
    ) -> Result<ExportOutput, ExportError> {
        self.update_layout();
        let pages = self.page_views();
        self.exporter.export(
            &self.document.personal_info,
            &pages,
            capture_photo,
            rasterizer,
        )
    }
}
