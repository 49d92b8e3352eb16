//! cardgen is the layout and typography engine behind printable cassette j-cards.
//!
//! It turns album metadata, cover artwork and a layered theme into a deterministic,
//! backend-agnostic [`RenderPlan`]: positioned panels, fitted text runs, image placements and
//! fold lines. Drawing the plan (PDF, raster) is left to a backend.
//!
//! # Pipeline overview
//!
//! 1. **Resolve**: built-in theme < global config < per-card overrides -> [`ResolvedTheme`]
//!    (fonts fetched once per run through a [`FontCache`])
//! 2. **Geometry**: [`CardKind`] -> panel columns, rotations and fold lines in points
//! 3. **Compile**: [`Card`] + DPI -> [`RenderPlan`] (text fitting, palette, tape sides)
//! 4. **Compose**: plans -> [`Page`]s with crop marks and fold guides
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic**: identical inputs produce identical plans, down to the text runs.
//! - **Fallbacks are values**: missing fonts or artwork become [`AssetFallbackWarning`]s; only
//!   invalid configuration and content that cannot fit are errors.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod compile;
mod compose;
mod config;
mod foundation;
mod layout;
mod model;
mod palette;
mod session;
mod text;
mod theme;

pub use compile::builder::{PlanOptions, build_render_plan};
pub use compile::plan::{
    Element, Fill, ImagePlacement, LogoKind, LogoPlacement, Minimap, MinimapSegment, PanelRegion,
    PlacedText, RenderPlan, TapeSide, TextRole, TracklistEntry,
};
pub use compose::pages::{
    CARD_GAP_PT, Guide, GuideKind, Page, PlacedCard, TICK_PT, bleed_box, cards_per_page,
    compose_pages,
};
pub use config::app::{
    AppConfig, DEFAULT_CONFIG_FILE, NavidromeConfig, OutputConfig, format_output_name,
};
pub use foundation::core::{Affine, Align, Point, Rect, Rgb, Rotation, Vec2};
pub use foundation::error::{AssetFallbackWarning, CardgenError, CardgenResult, FallbackKind};
pub use foundation::units::{
    BACK_PANEL_WIDTH_IN, BLEED_IN, CARD_HEIGHT_IN, Dpi, MAX_DPI, MIN_DPI, Orientation,
    PANEL_WIDTH_IN, POINTS_PER_INCH, PageSize, SAFE_MARGIN_IN, SPINE_WIDTH_IN, points_to_inches,
    to_pixels, to_points,
};
pub use layout::geometry::{
    CardGeometry, PanelFrame, PanelKind, build_geometry, card_size, validate_partition,
};
pub use layout::spine::{
    DOLBY_LOGO_PT, SPINE_ART_PT, SPINE_MIN_GAP_PT, SpineComponent, SpineComponents, SpineSlot,
    pack_spine, text_budget,
};
pub use model::album::{Album, AlbumArt, AlbumBuilder, ArtId, Track};
pub use model::card::{Card, CardKind};
pub use model::source::{AlbumSource, SourceTrack};
pub use model::theme::{CoverArtMode, Setting, ThemeOverrides};
pub use palette::extract::{THUMBNAIL_MAX, decode_artwork, extract_palette};
pub use palette::gradient::{GradientPick, MIN_GRADIENT_DISTANCE, gradient_colors, shades};
pub use session::engine::{BatchOpts, CardSession};
pub use text::fit::{
    DEFAULT_LINE_HEIGHT, ELLIPSIS, FitRequest, OverflowPolicy, SIZE_STEP, SPACING_STEP, TextRun,
    fit_text,
};
pub use text::metrics::{ApproxMetrics, FontMetrics, FontRef, ParleyMetrics};
pub use theme::fonts::{DirFontProvider, FontAsset, FontCache, FontKey, FontProvider, OfflineFontProvider};
pub use theme::resolver::{FontSizes, ResolvedFonts, ResolvedTheme, ThemeResolver};
