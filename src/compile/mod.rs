pub(crate) mod attribute;
pub(crate) mod defaults;
pub(crate) mod fingerprint;
pub(crate) mod material;
pub(crate) mod resolve;
pub(crate) mod scene;
pub(crate) mod texture;
pub(crate) mod transform;
