use std::sync::Arc;

use crate::foundation::error::{CardgenError, CardgenResult};
use crate::model::album::Album;
use crate::theme::resolver::ResolvedTheme;

/// Closed set of card variants. Each has its own geometry builder.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum CardKind {
    /// Back, spine, front, inside.
    #[serde(rename = "jcard_4panel")]
    FourPanel,
    /// Four-panel plus a genre/descriptor panel.
    #[default]
    #[serde(rename = "jcard_5panel")]
    FivePanel,
    /// Five-panel layout shared by two albums.
    #[serde(rename = "double_jcard_5panel")]
    DoubleFivePanel,
}

impl CardKind {
    /// Number of albums a card of this kind holds.
    pub fn album_count(self) -> usize {
        match self {
            Self::FourPanel | Self::FivePanel => 1,
            Self::DoubleFivePanel => 2,
        }
    }

    /// Config name of this kind.
    pub fn name(self) -> &'static str {
        match self {
            Self::FourPanel => "jcard_4panel",
            Self::FivePanel => "jcard_5panel",
            Self::DoubleFivePanel => "double_jcard_5panel",
        }
    }
}

impl std::str::FromStr for CardKind {
    type Err = CardgenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "jcard_4panel" => Ok(Self::FourPanel),
            "jcard_5panel" => Ok(Self::FivePanel),
            "double_jcard_5panel" => Ok(Self::DoubleFivePanel),
            other => Err(CardgenError::config(format!(
                "unknown card type '{other}' (expected jcard_4panel or jcard_5panel)"
            ))),
        }
    }
}

/// One card: a variant, its album(s) and a resolved theme. Immutable after construction.
#[derive(Clone, Debug)]
pub struct Card {
    kind: CardKind,
    albums: Vec<Album>,
    theme: Arc<ResolvedTheme>,
}

impl Card {
    /// Single-album card. Fails for the double variant.
    pub fn single(kind: CardKind, album: Album, theme: Arc<ResolvedTheme>) -> CardgenResult<Self> {
        if kind.album_count() != 1 {
            return Err(CardgenError::config(format!(
                "card type '{}' needs two albums",
                kind.name()
            )));
        }
        Ok(Self {
            kind,
            albums: vec![album],
            theme,
        })
    }

    /// Double-album five-panel card; `first` is album 1.
    pub fn double(first: Album, second: Album, theme: Arc<ResolvedTheme>) -> Self {
        Self {
            kind: CardKind::DoubleFivePanel,
            albums: vec![first, second],
            theme,
        }
    }

    /// Layout variant.
    pub fn kind(&self) -> CardKind {
        self.kind
    }

    /// Albums in card order.
    pub fn albums(&self) -> &[Album] {
        &self.albums
    }

    /// Theme every panel is styled with.
    pub fn theme(&self) -> &ResolvedTheme {
        &self.theme
    }
}
