use crate::foundation::core::DVec3;

/// Axis-aligned bounding box; starts empty.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Bbox {
    pub(crate) min: DVec3,
    pub(crate) max: DVec3,
}

impl Bbox {
    pub(crate) fn empty() -> Self {
        Self {
            min: DVec3::splat(f64::INFINITY),
            max: DVec3::splat(f64::NEG_INFINITY),
        }
    }

    pub(crate) fn from_points<'a>(points: impl IntoIterator<Item = &'a DVec3>) -> Self {
        let mut bbox = Self::empty();
        for p in points {
            bbox.extend(*p);
        }
        bbox
    }

    pub(crate) fn extend(&mut self, p: DVec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.min.x > self.max.x
    }

    pub(crate) fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    pub(crate) fn extent(&self) -> DVec3 {
        self.max - self.min
    }
}

/// Row-wise p-norm. `order` must be >= 1.
pub(crate) fn p_norm(row: &[f64], order: u32) -> f64 {
    match order {
        1 => row.iter().map(|v| v.abs()).sum(),
        2 => row.iter().map(|v| v * v).sum::<f64>().sqrt(),
        p => {
            let p = f64::from(p);
            row.iter().map(|v| v.abs().powf(p)).sum::<f64>().powf(1.0 / p)
        }
    }
}

pub(crate) fn row_to_vec3(row: &[f64]) -> DVec3 {
    DVec3::new(
        row.first().copied().unwrap_or(0.0),
        row.get(1).copied().unwrap_or(0.0),
        row.get(2).copied().unwrap_or(0.0),
    )
}
