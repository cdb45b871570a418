mod cache;
mod canvas;
mod container;
mod controller;
mod debug;
mod distance;
mod elements;
mod error;
mod frame;
mod geometry;
mod metrics;
mod page;
mod pdf;
mod perf;
mod state;
mod strategy;
mod text_block;
mod types;
mod vector_art;

use std::path::PathBuf;

pub use cache::ContentCache;
pub use canvas::{Canvas, Command, Document, RenderedPage, Stroke, Surface, VectorForm};
pub use container::{Container, ReservedArea};
pub use controller::{
    DEFAULT_LAYOUT, FrameUpdate, PageController, PageLayout, PaginatedReport, SingleLayout,
};
pub use debug::DebugLogger;
pub use distance::{Distance, DistanceUnit, Measure, distance_list};
pub use elements::{EmptySpace, HorizontalRule};
pub use error::FolioError;
pub use frame::{FrameCore, RenderingFrame, SharedFrame};
pub use geometry::{AnchorPoint, Contains, Extent, Pos, Region, Stretch};
pub use metrics::{DocumentMetrics, PageMetrics};
pub use page::{Margins, Orientation, Page, PageFactory, PageSettings, PaperSize};
pub use pdf::{document_to_pdf, write_pdf};
pub use perf::PerfLogger;
pub use state::{Decorations, FrameState, Phase};
pub use strategy::{FitIndices, LayoutStrategy, StackDirection, StackLayoutStrategy};
pub use text_block::TextBlock;
pub use types::{Color, Pt, Rect, Size, Transform};
pub use vector_art::VectorArt;

const DEBUG_LOG_ENV: &str = "FOLIO_DEBUG_LOG";

/// Configured pagination run: page settings plus optional tracing.
pub struct Report {
    settings: PageSettings,
    max_pages: usize,
    debug: Option<DebugLogger>,
    perf: Option<PerfLogger>,
}

pub struct ReportBuilder {
    settings: PageSettings,
    max_pages: usize,
    debug_path: Option<PathBuf>,
    perf_path: Option<PathBuf>,
}

impl Default for ReportBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportBuilder {
    pub fn new() -> Self {
        Self {
            settings: PageSettings::default(),
            max_pages: 10_000,
            debug_path: None,
            perf_path: None,
        }
    }

    pub fn page_settings(mut self, settings: PageSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn paper(mut self, paper: PaperSize) -> Self {
        self.settings = self.settings.with_paper(paper);
        self
    }

    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.settings = self.settings.with_orientation(orientation);
        self
    }

    pub fn margins(mut self, margins: Margins) -> Self {
        self.settings = self.settings.with_margins(margins);
        self
    }

    /// JSONL trace of page events. Falls back to `FOLIO_DEBUG_LOG`.
    pub fn debug_log(mut self, path: impl Into<PathBuf>) -> Self {
        self.debug_path = Some(path.into());
        self
    }

    pub fn perf_log(mut self, path: impl Into<PathBuf>) -> Self {
        self.perf_path = Some(path.into());
        self
    }

    /// Stop with [`FolioError::PageLimitExceeded`] rather than print more
    /// than `max_pages` pages.
    pub fn max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn build(self) -> Result<Report, FolioError> {
        if self.max_pages == 0 {
            return Err(FolioError::InvalidConfiguration(
                "max_pages must be at least 1".to_string(),
            ));
        }
        let printable = self.settings.printable_region()?;
        if printable.extent.width <= 0i64 || printable.extent.height <= 0i64 {
            return Err(FolioError::InvalidConfiguration(format!(
                "margins leave no printable area: {}",
                printable.extent
            )));
        }

        let debug_path = self.debug_path.or_else(|| {
            std::env::var_os(DEBUG_LOG_ENV)
                .filter(|value| !value.is_empty())
                .map(PathBuf::from)
        });
        let debug = match debug_path {
            Some(path) => Some(DebugLogger::new(path)?),
            None => None,
        };
        let perf = match self.perf_path {
            Some(path) => Some(PerfLogger::new(path)?),
            None => None,
        };
        Ok(Report {
            settings: self.settings,
            max_pages: self.max_pages,
            debug,
            perf,
        })
    }
}

impl Report {
    pub fn builder() -> ReportBuilder {
        ReportBuilder::new()
    }

    pub fn settings(&self) -> &PageSettings {
        &self.settings
    }

    /// Print every page `controller` produces onto `surface`.
    pub fn paginate<C: PageController>(
        &self,
        controller: C,
        surface: &mut dyn Surface,
    ) -> Result<DocumentMetrics, FolioError> {
        let mut report = PaginatedReport::new(controller, PageFactory::new(self.settings))
            .with_max_pages(self.max_pages)
            .with_debug(self.debug.clone())
            .with_perf(self.perf.clone());
        report.run(surface)
    }

    pub fn render<C: PageController>(
        &self,
        controller: C,
    ) -> Result<(Document, DocumentMetrics), FolioError> {
        let mut canvas = Canvas::new(self.settings.page_size_pt()?);
        let metrics = self.paginate(controller, &mut canvas)?;
        Ok((canvas.finish(), metrics))
    }

    pub fn render_pdf<C: PageController>(&self, controller: C) -> Result<Vec<u8>, FolioError> {
        let (document, _) = self.render(controller)?;
        document_to_pdf(&document)
    }
}
