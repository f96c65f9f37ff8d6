pub(crate) mod edge;
pub(crate) mod geometry;
pub(crate) mod instance;
pub(crate) mod midpoint;
