pub(crate) mod builder;
pub(crate) mod cover;
pub(crate) mod genre;
pub(crate) mod metadata;
pub(crate) mod plan;
pub(crate) mod spine;
pub(crate) mod tracklist;
