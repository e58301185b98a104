pub(crate) mod canvas;
pub(crate) mod icons;
pub(crate) mod mercator;
pub(crate) mod modal;
pub(crate) mod tiles;
pub(crate) mod viewport;
