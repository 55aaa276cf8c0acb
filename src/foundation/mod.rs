pub(crate) mod colormap;
pub(crate) mod core;
pub(crate) mod error;
pub(crate) mod math;
