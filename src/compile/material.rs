use std::collections::BTreeMap;

use crate::{
    compile::texture::evaluate_texture,
    data::frame::DataFrame,
    foundation::error::Gg3dResult,
    grammar::material::{Bsdf, ChannelKind, Material},
    scene::model::{BsdfDesc, BsdfParam, BumpMapDesc},
};

/// Evaluate every data channel of `material` on `frame`.
///
/// Constant channels become [`crate::TextureField::Uniform`]; other textures become
/// per-element fields. Non-data parameters are copied as-is.
pub fn bind_material(material: &Material, frame: &DataFrame) -> Gg3dResult<BsdfDesc> {
    let mut params = BTreeMap::new();
    for (name, kind, texture) in material.channels() {
        let field = evaluate_texture(texture, frame, kind)?;
        params.insert(name.to_string(), BsdfParam::Texture(field));
    }

    let mut put = |name: &str, p: BsdfParam| {
        params.insert(name.to_string(), p);
    };
    match &material.bsdf {
        Bsdf::Diffuse { .. } | Bsdf::Plastic { .. } | Bsdf::Principled { .. } => {}
        Bsdf::Conductor { material } => put("material", BsdfParam::Text(material.clone())),
        Bsdf::RoughConductor {
            material,
            distribution,
            ..
        } => {
            put("material", BsdfParam::Text(material.clone()));
            put("distribution", BsdfParam::Text(distribution.to_string()));
        }
        Bsdf::RoughPlastic {
            distribution,
            alpha,
            ..
        } => {
            put("distribution", BsdfParam::Text(distribution.to_string()));
            put("alpha", BsdfParam::Float(*alpha));
        }
        Bsdf::ThinPrincipled { eta, .. } => put("eta", BsdfParam::Float(*eta)),
        Bsdf::Dielectric { int_ior, ext_ior } | Bsdf::ThinDielectric { int_ior, ext_ior } => {
            put("int_ior", BsdfParam::Float(*int_ior));
            put("ext_ior", BsdfParam::Float(*ext_ior));
        }
        Bsdf::RoughDielectric {
            int_ior,
            ext_ior,
            distribution,
            alpha,
        } => {
            put("int_ior", BsdfParam::Float(*int_ior));
            put("ext_ior", BsdfParam::Float(*ext_ior));
            put("distribution", BsdfParam::Text(distribution.to_string()));
            put("alpha", BsdfParam::Float(*alpha));
        }
        Bsdf::Hair {
            eumelanin,
            pheomelanin,
        } => {
            put("eumelanin", BsdfParam::Float(*eumelanin));
            put("pheomelanin", BsdfParam::Float(*pheomelanin));
        }
    }

    let bump_map = match &material.bump_map {
        Some(bump) => Some(BumpMapDesc {
            texture: evaluate_texture(&bump.texture, frame, ChannelKind::Scalar)?,
            scale: bump.scale,
        }),
        None => None,
    };

    Ok(BsdfDesc {
        kind: material.bsdf.kind().to_string(),
        two_sided: material.two_sided,
        params,
        bump_map,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/compile/material.rs"]
mod tests;
