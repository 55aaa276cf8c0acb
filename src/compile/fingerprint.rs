use serde::Serialize;
use xxhash_rust::xxh3::Xxh3;

use crate::{
    foundation::error::{Gg3dError, Gg3dResult},
    scene::model::{
        BsdfDesc, BsdfParam, CurveDesc, FieldDesc, SceneDescription, ShapeDesc, TextureField,
    },
};

const XXH3_SEED: u64 = 0x6a09e667f3bcc908;

/// Stable 128-bit digest of a compiled scene.
///
/// Two compilations of the same layer tree and config produce the same fingerprint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SceneFingerprint {
    /// High 64 bits.
    pub hi: u64,
    /// Low 64 bits.
    pub lo: u64,
}

/// Fingerprint `scene`. Shapes are hashed field by field; global settings through their JSON form.
pub fn fingerprint_scene(scene: &SceneDescription) -> Gg3dResult<SceneFingerprint> {
    let mut h = StableHasher::new();
    h.write_json(&scene.sensor)?;
    h.write_json(&scene.film)?;
    h.write_json(&scene.sampler)?;
    h.write_json(&scene.emitters)?;
    h.write_json(&scene.integrator)?;
    for col in &scene.to_world {
        for v in col {
            h.write_f64(*v);
        }
    }
    h.write_u64(scene.shapes.len() as u64);
    for shape in &scene.shapes {
        write_shape(&mut h, shape);
    }
    Ok(h.finish())
}

struct StableHasher {
    inner: Xxh3,
}

impl StableHasher {
    fn new() -> Self {
        Self {
            inner: Xxh3::with_seed(XXH3_SEED),
        }
    }

    fn write_bytes(&mut self, b: &[u8]) {
        self.inner.update(b);
    }

    fn write_u8(&mut self, v: u8) {
        self.write_bytes(&[v]);
    }

    fn write_u64(&mut self, v: u64) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn write_f64(&mut self, v: f64) {
        self.write_u64(v.to_bits());
    }

    fn write_str(&mut self, s: &str) {
        self.write_u64(s.len() as u64);
        self.write_bytes(s.as_bytes());
    }

    fn write_f64s(&mut self, values: &[f64]) {
        self.write_u64(values.len() as u64);
        for v in values {
            self.write_f64(*v);
        }
    }

    fn write_points(&mut self, points: &[[f64; 3]]) {
        self.write_u64(points.len() as u64);
        for p in points {
            p.iter().for_each(|v| self.write_f64(*v));
        }
    }

    fn write_json<T: Serialize>(&mut self, value: &T) -> Gg3dResult<()> {
        let bytes = serde_json::to_vec(value).map_err(|e| Gg3dError::serde(e.to_string()))?;
        self.write_u64(bytes.len() as u64);
        self.write_bytes(&bytes);
        Ok(())
    }

    fn finish(self) -> SceneFingerprint {
        let v = self.inner.digest128();
        SceneFingerprint {
            hi: (v >> 64) as u64,
            lo: v as u64,
        }
    }
}

fn write_shape(h: &mut StableHasher, shape: &ShapeDesc) {
    match shape {
        ShapeDesc::Mesh {
            layer,
            vertices,
            facets,
            normals,
            bsdf,
        } => {
            h.write_u8(0);
            h.write_str(layer);
            h.write_points(vertices);
            h.write_u64(facets.len() as u64);
            for f in facets {
                h.write_u64(f.len() as u64);
                f.iter().for_each(|v| h.write_u64(u64::from(*v)));
            }
            match normals {
                Some(n) => {
                    h.write_u8(1);
                    write_field(h, n);
                }
                None => h.write_u8(0),
            }
            write_bsdf(h, bsdf);
        }
        ShapeDesc::Spheres {
            layer,
            centers,
            radii,
            bsdf,
        } => {
            h.write_u8(1);
            h.write_str(layer);
            h.write_points(centers);
            h.write_f64s(radii);
            write_bsdf(h, bsdf);
        }
        ShapeDesc::Curves {
            layer,
            curves,
            bsdf,
        } => {
            h.write_u8(2);
            h.write_str(layer);
            h.write_u64(curves.len() as u64);
            for CurveDesc { points, radii } in curves {
                h.write_points(points);
                h.write_f64s(radii);
            }
            write_bsdf(h, bsdf);
        }
    }
}

fn write_field(h: &mut StableHasher, f: &FieldDesc) {
    h.write_str(&format!("{:?}", f.element));
    h.write_u64(f.channels as u64);
    h.write_f64s(&f.values);
}

fn write_texture(h: &mut StableHasher, t: &TextureField) {
    match t {
        TextureField::Uniform { value } => {
            h.write_u8(0);
            h.write_f64s(value);
        }
        TextureField::PerElement(f) => {
            h.write_u8(1);
            write_field(h, f);
        }
    }
}

fn write_bsdf(h: &mut StableHasher, bsdf: &BsdfDesc) {
    h.write_str(&bsdf.kind);
    h.write_u8(u8::from(bsdf.two_sided));
    h.write_u64(bsdf.params.len() as u64);
    for (name, param) in &bsdf.params {
        h.write_str(name);
        match param {
            BsdfParam::Texture(t) => {
                h.write_u8(0);
                write_texture(h, t);
            }
            BsdfParam::Float(v) => {
                h.write_u8(1);
                h.write_f64(*v);
            }
            BsdfParam::Text(s) => {
                h.write_u8(2);
                h.write_str(s);
            }
        }
    }
    match &bsdf.bump_map {
        Some(b) => {
            h.write_u8(1);
            write_texture(h, &b.texture);
            h.write_f64(b.scale);
        }
        None => h.write_u8(0),
    }
}
