//! Backend-agnostic render plan: the declarative output of the engine.
//!
//! Element geometry is expressed in the owning panel's content frame (origin top-left, y
//! down, width/height swapped for rotated panels). A backend maps it onto the card with
//! [`PanelRegion::content_transform`].

use kurbo::Size;

use crate::foundation::core::{Affine, Rect, Rgb};
use crate::foundation::error::AssetFallbackWarning;
use crate::foundation::units::{Dpi, Orientation, PageSize};
use crate::layout::geometry::{PanelFrame, PanelKind};
use crate::model::album::ArtId;
use crate::model::card::CardKind;
use crate::text::fit::TextRun;

/// Panel background.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Fill {
    /// Single color.
    Solid {
        /// Fill color.
        color: Rgb,
    },
    /// Vertical linear gradient.
    LinearGradient {
        /// Top color.
        start: Rgb,
        /// Bottom color.
        end: Rgb,
    },
}

/// Cassette side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum TapeSide {
    /// First side, played first.
    A,
    /// Second side.
    B,
}

impl TapeSide {
    /// Header text printed above the side's tracks.
    pub fn label(self) -> &'static str {
        match self {
            Self::A => "Side A",
            Self::B => "Side B",
        }
    }
}

/// What a text run represents. Lets backends style runs and lets callers read back order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum TextRole {
    /// Album title on the front panel.
    Title,
    /// Artist name on the front panel.
    Artist,
    /// Artist/title/year line on the spine.
    SpineText,
    /// Back panel metadata row.
    Metadata,
    /// Heading such as "Tracklist" or "Genres".
    PanelHeading,
    /// "Side A" / "Side B" header.
    SideHeader {
        /// Side the header introduces.
        side: TapeSide,
    },
    /// Right-aligned track number.
    TrackNumber,
    /// Track title line; wrapped titles produce one run per line.
    TrackTitle {
        /// Album index within the card.
        album: usize,
        /// 1-based track number within the album.
        number: u32,
    },
    /// Right-aligned track length.
    TrackDuration,
    /// One genre on the genre panel.
    Genre,
    /// Descriptor blurb.
    Descriptor,
}

/// A fitted run with its role.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PlacedText {
    /// What the run represents.
    pub role: TextRole,
    /// Fitted run in panel content coordinates.
    pub run: TextRun,
}

/// Artwork drawn into a destination rectangle.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ImagePlacement {
    /// Content hash of the artwork bytes.
    pub art: ArtId,
    /// Album index within the card.
    pub album: usize,
    /// Destination in content coordinates (points).
    pub dest: Rect,
    /// Region of the source image to draw, in source pixels.
    pub source_crop: Rect,
    /// Destination size in device pixels at the plan DPI.
    pub pixel_size: (u32, u32),
}

/// Fixed logos the engine knows about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogoKind {
    /// Dolby noise reduction mark.
    DolbyNr,
}

/// A logo drawn into a destination rectangle.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LogoPlacement {
    /// Which logo to draw.
    pub logo: LogoKind,
    /// Destination in content coordinates (points).
    pub dest: Rect,
    /// Destination size in device pixels at the plan DPI.
    pub pixel_size: (u32, u32),
}

/// One track's share of a side, as fractions of the side capacity.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MinimapSegment {
    /// Album index within the card.
    pub album: usize,
    /// Track number within the album.
    pub track: u32,
    /// Start as a fraction of the capacity.
    pub start: f64,
    /// End as a fraction of the capacity, at most 1.
    pub end: f64,
}

/// Bar visualizing how a side's tracks fill the tape. Space outside the segments is unused
/// tape.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Minimap {
    /// Side the bar describes.
    pub side: TapeSide,
    /// Bar rectangle in content coordinates.
    pub dest: Rect,
    /// Tape time available on one side.
    pub capacity_secs: u64,
    /// Leading unused time (Side B starts where Side A's unused tape ends).
    pub offset_secs: u64,
    /// Track segments in play order.
    pub segments: Vec<MinimapSegment>,
}

/// Content element of a panel.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Element {
    /// Fitted text.
    Text(PlacedText),
    /// Cover art.
    Image(ImagePlacement),
    /// Fixed logo.
    Logo(LogoPlacement),
    /// Tape usage bar.
    Minimap(Minimap),
}

/// A positioned panel with its background and content.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PanelRegion {
    /// Panel geometry.
    #[serde(flatten)]
    pub frame: PanelFrame,
    /// Background fill.
    pub background: Fill,
    /// Content in drawing order.
    pub elements: Vec<Element>,
}

impl PanelRegion {
    /// Panel name, e.g. `front` or `back_2`.
    pub fn name(&self) -> &str {
        &self.frame.name
    }

    /// Panel kind.
    pub fn kind(&self) -> PanelKind {
        self.frame.kind
    }

    /// Card-local rectangle in points.
    pub fn rect(&self) -> Rect {
        self.frame.rect
    }

    /// Size of the content frame elements are positioned in.
    pub fn content_size(&self) -> Size {
        self.frame.content_size()
    }

    /// Content-frame to card transform.
    pub fn content_transform(&self) -> Affine {
        self.frame.content_transform()
    }

    /// Text elements in order.
    pub fn texts(&self) -> impl Iterator<Item = &PlacedText> {
        self.elements.iter().filter_map(|e| match e {
            Element::Text(t) => Some(t),
            _ => None,
        })
    }
}

/// Entry of the combined tracklist as read back from a plan.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TracklistEntry {
    /// A track title.
    Track {
        /// Album index within the card.
        album: usize,
        /// Track number within the album.
        number: u32,
    },
    /// Side B header; separates album 1 from album 2 on double cards.
    Separator,
}

/// Fully resolved layout of one card at one DPI. Built once, never mutated.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RenderPlan {
    pub(crate) card_kind: CardKind,
    pub(crate) dpi: Dpi,
    pub(crate) page_size: PageSize,
    pub(crate) orientation: Orientation,
    pub(crate) crop_marks: bool,
    pub(crate) size: Size,
    pub(crate) panels: Vec<PanelRegion>,
    pub(crate) fold_lines: Vec<f64>,
    pub(crate) warnings: Vec<AssetFallbackWarning>,
}

impl RenderPlan {
    /// Layout variant.
    pub fn card_kind(&self) -> CardKind {
        self.card_kind
    }

    /// Density the plan was built at.
    pub fn dpi(&self) -> Dpi {
        self.dpi
    }

    /// Page size the card is meant to be printed on.
    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    /// Page orientation the card needs on [`Self::page_size`].
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Whether pages for this plan carry crop and fold guides.
    pub fn crop_marks(&self) -> bool {
        self.crop_marks
    }

    /// Card size in points.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Panels in left-to-right, top-to-bottom order.
    pub fn panels(&self) -> &[PanelRegion] {
        &self.panels
    }

    /// Panel by name.
    pub fn panel(&self, name: &str) -> Option<&PanelRegion> {
        self.panels.iter().find(|p| p.name() == name)
    }

    /// Card-local fold positions in points.
    pub fn fold_lines(&self) -> &[f64] {
        &self.fold_lines
    }

    /// Non-fatal fallbacks taken while building.
    pub fn warnings(&self) -> &[AssetFallbackWarning] {
        &self.warnings
    }

    /// Width of the spine panel in device pixels.
    pub fn spine_width_px(&self) -> Option<f64> {
        self.panels
            .iter()
            .find(|p| p.kind() == PanelKind::Spine)
            .map(|p| self.dpi.pixels(p.rect().width()))
    }

    /// Tracklist as rendered: tracks in drawing order with the Side B header as separator.
    pub fn tracklist_sequence(&self) -> Vec<TracklistEntry> {
        let mut out: Vec<TracklistEntry> = Vec::new();
        for panel in self.panels.iter().filter(|p| p.kind() == PanelKind::Inside) {
            for text in panel.texts() {
                let entry = match text.role {
                    TextRole::SideHeader { side: TapeSide::B } => TracklistEntry::Separator,
                    TextRole::TrackTitle { album, number } => {
                        TracklistEntry::Track { album, number }
                    }
                    _ => continue,
                };
                // Wrapped titles produce one run per line.
                if matches!(entry, TracklistEntry::Track { .. }) && out.last() == Some(&entry) {
                    continue;
                }
                out.push(entry);
            }
        }
        out
    }

    /// `(album, track number)` pairs in drawing order.
    pub fn track_order(&self) -> Vec<(usize, u32)> {
        self.tracklist_sequence()
            .into_iter()
            .filter_map(|e| match e {
                TracklistEntry::Track { album, number } => Some((album, number)),
                TracklistEntry::Separator => None,
            })
            .collect()
    }
}
