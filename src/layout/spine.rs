//! One-dimensional packing of the spine's components along its length.

use crate::foundation::error::{CardgenError, CardgenResult};

/// Length of a spine artwork thumbnail (it is square, as thick as the spine).
pub const SPINE_ART_PT: f64 = 36.0;
/// Length reserved for the Dolby NR logo.
pub const DOLBY_LOGO_PT: f64 = 36.0;
/// Smallest gap kept around every component.
pub const SPINE_MIN_GAP_PT: f64 = 4.5;

/// Spine components in their fixed left-to-right order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpineComponent {
    /// Cover thumbnail of the first album.
    ArtLeft,
    /// Artist/title text block.
    Text,
    /// Dolby NR logo.
    DolbyLogo,
    /// Cover thumbnail of the second album.
    ArtRight,
}

/// Which optional components are present.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SpineComponents {
    /// First album's art is shown.
    pub art_left: bool,
    /// Dolby logo is shown.
    pub dolby_logo: bool,
    /// Second album's art is shown.
    pub art_right: bool,
}

impl SpineComponents {
    fn fixed(self) -> impl Iterator<Item = (SpineComponent, f64)> {
        [
            (SpineComponent::ArtLeft, self.art_left, SPINE_ART_PT),
            (SpineComponent::DolbyLogo, self.dolby_logo, DOLBY_LOGO_PT),
            (SpineComponent::ArtRight, self.art_right, SPINE_ART_PT),
        ]
        .into_iter()
        .filter(|(_, present, _)| *present)
        .map(|(c, _, len)| (c, len))
    }
}

/// A component's position along the spine.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SpineSlot {
    /// What sits in the slot.
    pub component: SpineComponent,
    /// Offset from the spine's leading end, in points.
    pub start: f64,
    /// Extent along the spine, in points.
    pub length: f64,
}

impl SpineSlot {
    /// Offset just past the slot.
    pub fn end(&self) -> f64 {
        self.start + self.length
    }
}

/// Length available to the text block when every gap is at its minimum.
pub fn text_budget(spine_len: f64, components: SpineComponents) -> CardgenResult<f64> {
    let fixed: Vec<(SpineComponent, f64)> = components.fixed().collect();
    let fixed_len: f64 = fixed.iter().map(|(_, l)| l).sum();
    let gaps = (fixed.len() + 2) as f64;
    let budget = spine_len - fixed_len - gaps * SPINE_MIN_GAP_PT;
    if budget <= 0.0 {
        return Err(CardgenError::render(
            "spine",
            format!(
                "no room for spine text: {fixed_len:.1}pt of fixed components \
                 on a {spine_len:.1}pt spine"
            ),
        ));
    }
    Ok(budget)
}

/// Place present components in order with equal gaps before, between and after them.
///
/// A zero `text_len` leaves the text out of the packing.
pub fn pack_spine(
    spine_len: f64,
    components: SpineComponents,
    text_len: f64,
) -> CardgenResult<Vec<SpineSlot>> {
    let mut order: Vec<(SpineComponent, f64)> = Vec::with_capacity(4);
    if components.art_left {
        order.push((SpineComponent::ArtLeft, SPINE_ART_PT));
    }
    if text_len > 0.0 {
        order.push((SpineComponent::Text, text_len));
    }
    if components.dolby_logo {
        order.push((SpineComponent::DolbyLogo, DOLBY_LOGO_PT));
    }
    if components.art_right {
        order.push((SpineComponent::ArtRight, SPINE_ART_PT));
    }

    let used: f64 = order.iter().map(|(_, l)| l).sum();
    let gap = (spine_len - used) / ((order.len() + 1) as f64);
    if gap < -1e-6 {
        return Err(CardgenError::render(
            "spine",
            format!("spine components need {used:.1}pt but the spine is {spine_len:.1}pt"),
        ));
    }
    let gap = gap.max(0.0);

    let mut pos = gap;
    Ok(order
        .into_iter()
        .map(|(component, length)| {
            let slot = SpineSlot {
                component,
                start: pos,
                length,
            };
            pos += length + gap;
            slot
        })
        .collect())
}

#[cfg(test)]
#[path = "../../tests/unit/layout/spine.rs"]
mod tests;
