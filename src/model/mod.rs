pub(crate) mod album;
pub(crate) mod card;
pub(crate) mod source;
pub(crate) mod theme;
