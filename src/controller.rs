use std::time::Instant;

use indexmap::IndexMap;
use serde_json::json;

use crate::canvas::Surface;
use crate::debug::DebugLogger;
use crate::error::FolioError;
use crate::frame::RenderingFrame;
use crate::metrics::{DocumentMetrics, PageMetrics};
use crate::page::{Page, PageFactory};
use crate::perf::PerfLogger;
use crate::strategy::LayoutStrategy;

pub const DEFAULT_LAYOUT: &str = "default";

/// Add (`Some`) or remove (`None`) a named frame on a page.
pub type FrameUpdate = (String, Option<Box<dyn RenderingFrame>>);

pub struct PageLayout {
    pub children: Vec<(String, Box<dyn RenderingFrame>)>,
    pub strategy: Box<dyn LayoutStrategy>,
}

impl PageLayout {
    pub fn new(strategy: Box<dyn LayoutStrategy>) -> Self {
        Self {
            children: Vec::new(),
            strategy,
        }
    }

    pub fn with_child(mut self, name: impl Into<String>, frame: Box<dyn RenderingFrame>) -> Self {
        self.children.push((name.into(), frame));
        self
    }
}

/// Decides which layout each page uses and what changes between pages.
pub trait PageController {
    fn layout_name(&self, _page_number: usize) -> &str {
        DEFAULT_LAYOUT
    }

    /// Called once per layout name, the first time a page needs it.
    fn page_layout(&mut self, name: &str) -> Result<PageLayout, FolioError>;

    fn frame_updates(&mut self, _page_number: usize, _layout_name: &str) -> Vec<FrameUpdate> {
        Vec::new()
    }
}

pub struct SingleLayout {
    layout: Option<PageLayout>,
}

impl SingleLayout {
    pub fn new(layout: PageLayout) -> Self {
        Self {
            layout: Some(layout),
        }
    }
}

impl PageController for SingleLayout {
    fn page_layout(&mut self, name: &str) -> Result<PageLayout, FolioError> {
        match (name, self.layout.take()) {
            (DEFAULT_LAYOUT, Some(layout)) => Ok(layout),
            _ => Err(FolioError::MissingPageLayout(name.to_string())),
        }
    }
}

pub struct PaginatedReport<C> {
    controller: C,
    factory: PageFactory,
    pages: IndexMap<String, Page>,
    current: Option<String>,
    max_pages: usize,
    debug: Option<DebugLogger>,
    perf: Option<PerfLogger>,
}

impl<C: PageController> PaginatedReport<C> {
    pub fn new(controller: C, factory: PageFactory) -> Self {
        Self {
            controller,
            factory,
            pages: IndexMap::new(),
            current: None,
            max_pages: 10_000,
            debug: None,
            perf: None,
        }
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub(crate) fn with_debug(mut self, debug: Option<DebugLogger>) -> Self {
        self.debug = debug;
        self
    }

    pub(crate) fn with_perf(mut self, perf: Option<PerfLogger>) -> Self {
        self.perf = perf;
        self
    }

    pub fn controller(&self) -> &C {
        &self.controller
    }

    pub fn page(&self, layout_name: &str) -> Option<&Page> {
        self.pages.get(layout_name)
    }

    fn current_page(&mut self) -> Option<&mut Page> {
        let name = self.current.as_deref()?;
        self.pages.get_mut(name)
    }

    pub fn have_more_data(&self) -> bool {
        match self.current.as_deref().and_then(|name| self.pages.get(name)) {
            Some(page) => page.state().has_more_data(),
            None => true,
        }
    }

    /// Prepare page `page_number`: pick its layout, apply frame updates,
    /// then measure and lay it out against the printable area.
    ///
    /// Returns `false` when there is nothing left to print.
    pub fn begin_page(&mut self, page_number: usize) -> Result<bool, FolioError> {
        if !self.have_more_data() {
            return Ok(false);
        }
        let name = self.controller.layout_name(page_number).to_string();
        if !self.pages.contains_key(&name) {
            let layout = self.controller.page_layout(&name)?;
            let page = self
                .factory
                .create_page(name.clone(), layout.children, layout.strategy)?
                .with_debug(self.debug.clone());
            self.pages.insert(name.clone(), page);
        }
        let updates = self.controller.frame_updates(page_number, &name);
        let Some(page) = self.pages.get_mut(&name) else {
            return Err(FolioError::MissingPageLayout(name));
        };
        if !updates.is_empty() {
            page.update(updates)?;
        }
        if !page.begin_page(page_number) {
            return Ok(false);
        }
        if let Some(debug) = &self.debug {
            debug.log_event("page.begin", json!({ "page": page_number, "layout": name }));
            debug.increment("page.begin", 1);
        }

        let printable = page.printable_region();
        let start = Instant::now();
        let consumed = page.measure(printable.extent)?;
        self.span("measure", page_number, start);

        let start = Instant::now();
        let page = self
            .pages
            .get_mut(&name)
            .ok_or_else(|| FolioError::MissingPageLayout(name.clone()))?;
        page.do_layout(printable.extent)?;
        self.span("layout", page_number, start);

        if let Some(debug) = &self.debug {
            debug.log_event(
                "page.layout",
                json!({
                    "page": page_number,
                    "layout": name,
                    "printable": printable.to_string(),
                    "consumed": consumed.to_string(),
                }),
            );
        }
        self.current = Some(name);
        Ok(true)
    }

    pub fn draw_page(&mut self, surface: &mut dyn Surface, page_number: usize) -> Result<(), FolioError> {
        let start = Instant::now();
        let Some(page) = self.current_page() else {
            return Ok(());
        };
        let region = page.printable_region();
        page.draw(surface, region)?;
        self.span("draw", page_number, start);
        Ok(())
    }

    pub fn eject_page(&mut self, surface: &mut dyn Surface, page_number: usize) {
        surface.show_page();
        if let Some(debug) = &self.debug {
            debug.log_event(
                "page.eject",
                json!({
                    "page": page_number,
                    "layout": self.current,
                    "more": self.have_more_data(),
                }),
            );
            debug.increment("page.eject", 1);
        }
    }

    pub fn run(&mut self, surface: &mut dyn Surface) -> Result<DocumentMetrics, FolioError> {
        let mut metrics = DocumentMetrics::default();
        let mut page_number = 1;
        while self.begin_page(page_number)? {
            let start = Instant::now();
            self.draw_page(surface, page_number)?;
            let command_count = surface.current_command_count();
            self.eject_page(surface, page_number);
            let render_ms = start.elapsed().as_secs_f64() * 1000.0;

            let layout_name = self.current.clone().unwrap_or_default();
            let frame_count = self.pages.get(&layout_name).map_or(0, |page| page.body().len());
            metrics.total_render_ms += render_ms;
            metrics.pages.push(PageMetrics {
                page_number,
                layout_name,
                render_ms,
                command_count,
                frame_count,
            });

            if !self.have_more_data() {
                break;
            }
            if page_number >= self.max_pages {
                log::error!("pagination stopped after {} pages with content left", self.max_pages);
                return Err(FolioError::PageLimitExceeded(self.max_pages));
            }
            page_number += 1;
        }

        if let Some(debug) = &self.debug {
            debug.log_event(
                "report.finish",
                json!({
                    "pages": metrics.page_count(),
                    "total_render_ms": metrics.total_render_ms,
                }),
            );
            debug.emit_summary("report");
            debug.flush();
        }
        if let Some(perf) = &self.perf {
            perf.flush();
        }
        Ok(metrics)
    }

    fn span(&self, name: &str, page_number: usize, start: Instant) {
        if let Some(perf) = &self.perf {
            perf.log_span_ms(name, Some(page_number), start.elapsed().as_secs_f64() * 1000.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{Canvas, Command};
    use crate::distance::Distance;
    use crate::elements::{EmptySpace, HorizontalRule};
    use crate::frame::SharedFrame;
    use crate::geometry::Extent;
    use crate::page::{Margins, PageSettings, PaperSize};
    use crate::strategy::StackLayoutStrategy;
    use crate::text_block::TextBlock;

    fn settings() -> PageSettings {
        // 200 x 100pt sheet with 10pt margins: 180 x 80 printable.
        PageSettings::default()
            .with_paper(PaperSize::Custom(Extent::pt(100, 200)))
            .with_orientation("landscape".parse().unwrap())
            .with_margins(Margins::uniform(Distance::pt(10)))
    }

    fn text(lines: usize) -> Box<dyn RenderingFrame> {
        Box::new(TextBlock::new(
            "body",
            Extent::FIT_TO,
            (1..=lines).map(|n| format!("line {n}")).collect(),
            Distance::pt(8),
            Distance::pt(10),
        ))
    }

    fn canvas() -> Canvas {
        Canvas::new(settings().page_size_pt().unwrap())
    }

    fn strings(page: &crate::canvas::RenderedPage) -> Vec<String> {
        page.commands
            .iter()
            .filter_map(|cmd| match cmd {
                Command::DrawString { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn text_flows_over_as_many_pages_as_it_needs() {
        let layout = PageLayout::new(Box::new(StackLayoutStrategy::vertical()))
            .with_child(
                "rule",
                Box::new(HorizontalRule::new("rule", Distance::pt(20), Default::default())),
            )
            .with_child("body", text(15));
        let mut report = PaginatedReport::new(SingleLayout::new(layout), PageFactory::new(settings()));
        let mut surface = canvas();
        let metrics = report.run(&mut surface).unwrap();
        let doc = surface.finish();

        // 60pt left under the rule: six lines per page.
        assert_eq!(metrics.page_count(), 3);
        assert_eq!(doc.pages.len(), 3);
        assert_eq!(strings(&doc.pages[0]).len(), 6);
        assert_eq!(strings(&doc.pages[2]), ["line 13", "line 14", "line 15"]);
        assert!(metrics.pages.iter().all(|page| page.layout_name == DEFAULT_LAYOUT));
        assert_eq!(metrics.pages[0].frame_count, 2);
        assert!(!report.have_more_data());
        assert!(!report.begin_page(4).unwrap());
    }

    #[test]
    fn reusable_content_prints_once() {
        let layout = PageLayout::new(Box::new(StackLayoutStrategy::vertical()))
            .with_child("gap", Box::new(EmptySpace::filler("gap")));
        let mut report = PaginatedReport::new(SingleLayout::new(layout), PageFactory::new(settings()));
        let mut surface = canvas();
        let metrics = report.run(&mut surface).unwrap();
        assert_eq!(metrics.page_count(), 1);
    }

    struct TitleThenBody {
        body: SharedFrame,
        requested: Vec<String>,
    }

    impl PageController for TitleThenBody {
        fn layout_name(&self, page_number: usize) -> &str {
            if page_number == 1 { "title" } else { "body" }
        }

        fn page_layout(&mut self, name: &str) -> Result<PageLayout, FolioError> {
            self.requested.push(name.to_string());
            let mut layout = PageLayout::new(Box::new(StackLayoutStrategy::vertical()));
            if name == "title" {
                layout = layout.with_child(
                    "banner",
                    Box::new(EmptySpace::new("banner", Extent::new(Distance::FIT_TO, Distance::pt(40)))),
                );
            }
            Ok(layout.with_child("body", Box::new(self.body.clone())))
        }
    }

    #[test]
    fn layouts_switch_after_the_first_page() {
        let controller = TitleThenBody {
            body: SharedFrame::new(text(20)),
            requested: Vec::new(),
        };
        let mut report = PaginatedReport::new(controller, PageFactory::new(settings()));
        let mut surface = canvas();
        let metrics = report.run(&mut surface).unwrap();
        let doc = surface.finish();

        // Title page holds 4 lines under the banner, body pages hold 8.
        let names: Vec<&str> = metrics.pages.iter().map(|p| p.layout_name.as_str()).collect();
        assert_eq!(names, ["title", "body", "body"]);
        assert_eq!(strings(&doc.pages[0]).len(), 4);
        assert_eq!(strings(&doc.pages[1]).first().map(String::as_str), Some("line 5"));
        assert_eq!(strings(&doc.pages[2]).last().map(String::as_str), Some("line 20"));
        assert_eq!(report.controller().requested, ["title", "body"]);
    }

    #[test]
    fn runaway_reports_hit_the_page_limit() {
        // Under one line of space is left for the text, so it never drains.
        let layout = PageLayout::new(Box::new(StackLayoutStrategy::vertical()))
            .with_child("gap", Box::new(EmptySpace::new("gap", Extent::new(Distance::FIT_TO, Distance::pt(75)))))
            .with_child("body", text(3));
        let mut report = PaginatedReport::new(SingleLayout::new(layout), PageFactory::new(settings()))
            .with_max_pages(5);
        let mut surface = canvas();
        assert!(matches!(
            report.run(&mut surface),
            Err(FolioError::PageLimitExceeded(5))
        ));
        assert_eq!(surface.page_count(), 5);
    }

    #[test]
    fn unknown_layouts_are_errors() {
        struct Wrong;
        impl PageController for Wrong {
            fn layout_name(&self, _page_number: usize) -> &str {
                "missing"
            }

            fn page_layout(&mut self, name: &str) -> Result<PageLayout, FolioError> {
                Err(FolioError::MissingPageLayout(name.to_string()))
            }
        }
        let mut report = PaginatedReport::new(Wrong, PageFactory::new(settings()));
        assert!(matches!(
            report.begin_page(1),
            Err(FolioError::MissingPageLayout(name)) if name == "missing"
        ));
    }

    struct DropRule {
        layout: SingleLayout,
    }

    impl PageController for DropRule {
        fn page_layout(&mut self, name: &str) -> Result<PageLayout, FolioError> {
            self.layout.page_layout(name)
        }

        fn frame_updates(&mut self, page_number: usize, _layout_name: &str) -> Vec<FrameUpdate> {
            if page_number == 2 {
                vec![("rule".to_string(), None)]
            } else {
                Vec::new()
            }
        }
    }

    #[test]
    fn frame_updates_apply_between_pages() {
        let layout = PageLayout::new(Box::new(StackLayoutStrategy::vertical()))
            .with_child(
                "rule",
                Box::new(HorizontalRule::new("rule", Distance::pt(20), Default::default())),
            )
            .with_child("body", text(14));
        let controller = DropRule {
            layout: SingleLayout::new(layout),
        };
        let mut report = PaginatedReport::new(controller, PageFactory::new(settings()));
        let mut surface = canvas();
        let metrics = report.run(&mut surface).unwrap();
        let doc = surface.finish();
        assert_eq!(metrics.page_count(), 2);
        assert_eq!(metrics.pages[1].frame_count, 1);
        assert_eq!(strings(&doc.pages[1]).len(), 8);
    }
}
