use std::fmt;
use std::str::FromStr;

use crate::canvas::Surface;
use crate::container::Container;
use crate::debug::DebugLogger;
use crate::distance::{Distance, DistanceUnit};
use crate::error::FolioError;
use crate::frame::RenderingFrame;
use crate::geometry::{Extent, Pos, Region};
use crate::state::FrameState;
use crate::strategy::LayoutStrategy;
use crate::types::Size;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PaperSize {
    A0,
    A1,
    A2,
    A3,
    A4,
    A5,
    A6,
    A7,
    A8,
    A9,
    A10,
    B0,
    B1,
    B2,
    B3,
    B4,
    B5,
    B6,
    Letter,
    Legal,
    Tabloid,
    Ledger,
    JuniorLegal,
    HalfLetter,
    Custom(Extent),
}

impl PaperSize {
    /// Sheet size as published, before orientation is applied.
    pub fn extent(&self) -> Extent {
        let mm = |w: i64, h: i64| Extent::new(Distance::mm(w), Distance::mm(h));
        let inch = |w: Distance, h: Distance| Extent::new(w, h);
        match self {
            PaperSize::A0 => mm(841, 1189),
            PaperSize::A1 => mm(594, 841),
            PaperSize::A2 => mm(420, 594),
            PaperSize::A3 => mm(297, 420),
            PaperSize::A4 => mm(210, 297),
            PaperSize::A5 => mm(148, 210),
            PaperSize::A6 => mm(105, 148),
            PaperSize::A7 => mm(74, 105),
            PaperSize::A8 => mm(52, 74),
            PaperSize::A9 => mm(37, 52),
            PaperSize::A10 => mm(26, 37),
            PaperSize::B0 => mm(1000, 1414),
            PaperSize::B1 => mm(707, 1000),
            PaperSize::B2 => mm(500, 707),
            PaperSize::B3 => mm(353, 500),
            PaperSize::B4 => mm(250, 353),
            PaperSize::B5 => mm(176, 250),
            PaperSize::B6 => mm(125, 176),
            PaperSize::Letter => inch(Distance::inch((17, 2)), Distance::inch(11)),
            PaperSize::Legal => inch(Distance::inch((17, 2)), Distance::inch(14)),
            PaperSize::Tabloid => inch(Distance::inch(11), Distance::inch(17)),
            PaperSize::Ledger => inch(Distance::inch(17), Distance::inch(11)),
            PaperSize::JuniorLegal => inch(Distance::inch(5), Distance::inch(8)),
            PaperSize::HalfLetter => inch(Distance::inch((11, 2)), Distance::inch((17, 2))),
            PaperSize::Custom(extent) => *extent,
        }
    }
}

impl FromStr for PaperSize {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect::<String>()
            .to_ascii_lowercase();
        let paper = match key.as_str() {
            "a0" => PaperSize::A0,
            "a1" => PaperSize::A1,
            "a2" => PaperSize::A2,
            "a3" => PaperSize::A3,
            "a4" => PaperSize::A4,
            "a5" => PaperSize::A5,
            "a6" => PaperSize::A6,
            "a7" => PaperSize::A7,
            "a8" => PaperSize::A8,
            "a9" => PaperSize::A9,
            "a10" => PaperSize::A10,
            "b0" => PaperSize::B0,
            "b1" => PaperSize::B1,
            "b2" => PaperSize::B2,
            "b3" => PaperSize::B3,
            "b4" => PaperSize::B4,
            "b5" => PaperSize::B5,
            "b6" => PaperSize::B6,
            "letter" => PaperSize::Letter,
            "legal" => PaperSize::Legal,
            "tabloid" => PaperSize::Tabloid,
            "ledger" => PaperSize::Ledger,
            "juniorlegal" => PaperSize::JuniorLegal,
            "halfletter" => PaperSize::HalfLetter,
            _ => return Err(FolioError::UnknownPaper(s.to_string())),
        };
        Ok(paper)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl FromStr for Orientation {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "portrait" => Ok(Orientation::Portrait),
            "landscape" => Ok(Orientation::Landscape),
            _ => Err(FolioError::InvalidConfiguration(format!(
                "unknown orientation '{s}'"
            ))),
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Orientation::Portrait => f.write_str("portrait"),
            Orientation::Landscape => f.write_str("landscape"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub top: Distance,
    pub right: Distance,
    pub bottom: Distance,
    pub left: Distance,
}

impl Margins {
    pub fn uniform(margin: Distance) -> Self {
        Self {
            top: margin,
            right: margin,
            bottom: margin,
            left: margin,
        }
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self::uniform(Distance::inch((1, 2)))
    }
}

/// Paper, orientation and margins of one page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSettings {
    pub paper: PaperSize,
    pub orientation: Orientation,
    pub margins: Margins,
}

impl Default for PageSettings {
    fn default() -> Self {
        Self {
            paper: PaperSize::Letter,
            orientation: Orientation::Portrait,
            margins: Margins::default(),
        }
    }
}

impl PageSettings {
    pub fn with_paper(mut self, paper: PaperSize) -> Self {
        self.paper = paper;
        self
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.margins = margins;
        self
    }

    /// Oriented sheet size in points.
    pub fn page_size(&self) -> Result<Extent, FolioError> {
        let sheet = self.paper.extent().to(DistanceUnit::Point)?;
        let (short, long) = if sheet.width <= sheet.height {
            (sheet.width, sheet.height)
        } else {
            (sheet.height, sheet.width)
        };
        Ok(match self.orientation {
            Orientation::Portrait => Extent::new(short, long),
            Orientation::Landscape => Extent::new(long, short),
        })
    }

    /// Area inside the margins, anchored at the lower-left margin corner.
    pub fn printable_region(&self) -> Result<Region, FolioError> {
        let page = self.page_size()?;
        let m = &self.margins;
        let width = page
            .width
            .checked_sub(&m.left.checked_add(&m.right)?)?
            .to(DistanceUnit::Point)?;
        let height = page
            .height
            .checked_sub(&m.top.checked_add(&m.bottom)?)?
            .to(DistanceUnit::Point)?;
        Ok(Region::new(
            Pos::new(m.left, m.bottom),
            Extent::new(width, height),
        ))
    }

    pub(crate) fn page_size_pt(&self) -> Result<Size, FolioError> {
        let page = self.page_size()?;
        Ok(Size {
            width: page.width.to_pt()?,
            height: page.height.to_pt()?,
        })
    }
}

/// Builds pages that share one frozen copy of the settings.
#[derive(Debug, Clone)]
pub struct PageFactory {
    settings: PageSettings,
}

impl PageFactory {
    pub fn new(settings: PageSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &PageSettings {
        &self.settings
    }

    pub fn create_page<I>(
        &self,
        name: impl Into<String>,
        children: I,
        strategy: Box<dyn LayoutStrategy>,
    ) -> Result<Page, FolioError>
    where
        I: IntoIterator<Item = (String, Box<dyn RenderingFrame>)>,
    {
        Page::new(name, self.settings, children, strategy)
    }
}

/// Top-level container sized to the printable area of a sheet.
pub struct Page {
    settings: PageSettings,
    printable: Region,
    body: Container,
}

impl Page {
    pub fn new<I>(
        name: impl Into<String>,
        settings: PageSettings,
        children: I,
        strategy: Box<dyn LayoutStrategy>,
    ) -> Result<Self, FolioError>
    where
        I: IntoIterator<Item = (String, Box<dyn RenderingFrame>)>,
    {
        let printable = settings.printable_region()?;
        let body = Container::new(name, printable.extent, strategy).with_children(children);
        Ok(Self {
            settings,
            printable,
            body,
        })
    }

    pub(crate) fn with_debug(mut self, debug: Option<DebugLogger>) -> Self {
        self.body = self.body.with_debug(debug);
        self
    }

    pub fn settings(&self) -> &PageSettings {
        &self.settings
    }

    pub fn printable_region(&self) -> Region {
        self.printable
    }

    pub fn body(&self) -> &Container {
        &self.body
    }

    pub fn update<I>(&mut self, changes: I) -> Result<(), FolioError>
    where
        I: IntoIterator<Item = (String, Option<Box<dyn RenderingFrame>>)>,
    {
        self.body.update(changes)
    }
}

impl RenderingFrame for Page {
    fn name(&self) -> &str {
        self.body.name()
    }

    fn state(&self) -> FrameState {
        self.body.state()
    }

    fn requested_size(&self) -> Extent {
        self.body.requested_size()
    }

    fn begin_page(&mut self, page_number: usize) -> bool {
        self.body.begin_page(page_number)
    }

    fn measure(&mut self, extent: Extent) -> Result<Extent, FolioError> {
        self.body.measure(extent)
    }

    fn do_layout(&mut self, target: Extent) -> Result<Region, FolioError> {
        self.body.do_layout(target)
    }

    fn draw(&mut self, surface: &mut dyn Surface, region: Region) -> Result<(), FolioError> {
        self.body.draw(surface, region)
    }
}
