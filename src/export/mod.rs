//! Export orchestration: sequential page capture behind a guard flag

use std::cell::Cell;

use thiserror::Error;

use crate::document::PersonalInfo;
use crate::flow::TextKind;
use crate::render::PageView;

#[derive(Debug, Error, PartialEq)]
pub enum ExportError {
    #[error("an export is already in progress")]
    AlreadyInProgress,
    #[error("page {page_index} failed to rasterize: {reason}")]
    Rasterize { page_index: usize, reason: String },
}

/// One captured page. A4 target, 210x297 mm.
#[derive(Debug, Clone, PartialEq)]
pub struct PageImage {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

/// The host-provided capture engine. How a page becomes pixels is entirely
/// its business.
pub trait PageRasterizer {
    fn rasterize(&mut self, page: &PageView) -> Result<PageImage, String>;
}

#[derive(Debug)]
pub struct ExportOutput {
    pub file_name: String,
    pub pages: Vec<PageImage>,
}

/// Export file name from the document's name parts.
pub fn export_file_name(info: &PersonalInfo) -> String {
    let name = info.full_name();
    if name.is_empty() {
        "CV.pdf".to_string()
    } else {
        format!("CV - {name}.pdf")
    }
}

struct InProgressGuard<'a>(&'a Cell<bool>);

impl Drop for InProgressGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// Runs exports one at a time. The flag is cleared on every exit path,
/// success or failure.
#[derive(Debug, Default)]
pub struct Exporter {
    in_progress: Cell<bool>,
}

impl Exporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_in_progress(&self) -> bool {
        self.in_progress.get()
    }

    /// Claim the guard for a host-driven capture where the rasterizer lives
    /// on the other side of the boundary. `finish_capture` releases it.
    pub fn begin_capture(&self) -> Result<(), ExportError> {
        if self.in_progress.get() {
            return Err(ExportError::AlreadyInProgress);
        }
        self.in_progress.set(true);
        Ok(())
    }

    pub fn finish_capture(&self) {
        self.in_progress.set(false);
    }

    /// Capture every page in order. `capture_photo` optionally replaces the
    /// photo block for the capture only; the substitution happens on cloned
    /// snapshots, the layout itself is never touched. Any rasterizer error
    /// aborts the run with no partial output.
    pub fn export<R: PageRasterizer>(
        &self,
        info: &PersonalInfo,
        pages: &[PageView],
        capture_photo: Option<&str>,
        rasterizer: &mut R,
    ) -> Result<ExportOutput, ExportError> {
        if self.in_progress.get() {
            return Err(ExportError::AlreadyInProgress);
        }
        self.in_progress.set(true);
        let _guard = InProgressGuard(&self.in_progress);

        log::info!("export started: {} page(s)", pages.len());

        let mut images = Vec::with_capacity(pages.len());
        for page in pages {
            let prepared = match capture_photo {
                Some(photo) => substitute_photo(page, photo),
                None => page.clone(),
            };
            match rasterizer.rasterize(&prepared) {
                Ok(image) => images.push(image),
                Err(reason) => {
                    log::warn!("export aborted on page {}: {}", page.page_index, reason);
                    return Err(ExportError::Rasterize {
                        page_index: page.page_index,
                        reason,
                    });
                }
            }
        }

        Ok(ExportOutput {
            file_name: export_file_name(info),
            pages: images,
        })
    }
}

/// Clone the snapshots with the capture photo applied, for hosts that
/// rasterize on their side of the boundary.
pub fn prepare_capture_pages(pages: &[PageView], capture_photo: Option<&str>) -> Vec<PageView> {
    match capture_photo {
        Some(photo) => pages.iter().map(|page| substitute_photo(page, photo)).collect(),
        None => pages.to_vec(),
    }
}

fn substitute_photo(page: &PageView, photo: &str) -> PageView {
    let mut page = page.clone();
    for node in page
        .top
        .iter_mut()
        .chain(page.main.iter_mut())
        .chain(page.sidebar.iter_mut())
    {
        for block in &mut node.blocks {
            if block.kind == TextKind::Photo {
                block.text = photo.to_string();
            }
        }
    }
    page
}
