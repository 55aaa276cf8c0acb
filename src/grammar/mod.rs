pub(crate) mod attribute;
pub(crate) mod channel;
pub(crate) mod layer;
pub(crate) mod material;
pub(crate) mod scale;
pub(crate) mod texture;
pub(crate) mod transform;
