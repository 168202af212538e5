//! Uniform point sampling on triangle mesh surfaces, and the per-particle
//! attributes built from those samples.

use glam::Vec3;
use rand::Rng;

/// Floats per particle position record.
pub const POSITION_STRIDE: usize = 3;
/// Floats per particle distortion record.
pub const DISTORTION_STRIDE: usize = 4;

/// Area-weighted triangle distribution over a mesh.
#[derive(Debug, Clone)]
pub struct SurfaceSampler {
    triangles: Vec<[Vec3; 3]>,
    /// Running area totals; `cumulative[i]` covers triangles `0..=i`.
    cumulative: Vec<f32>,
}

impl SurfaceSampler {
    /// Build a sampler over an indexed triangle list.
    ///
    /// Degenerate triangles and indices past `positions` are skipped.
    /// Returns `None` when no triangle has positive area.
    pub fn new(positions: &[[f32; 3]], indices: &[u32]) -> Option<Self> {
        let mut triangles = Vec::with_capacity(indices.len() / 3);
        let mut cumulative = Vec::with_capacity(indices.len() / 3);
        let mut total = 0.0_f32;

        for tri in indices.chunks_exact(3) {
            let Some(corners) = corners(positions, tri) else {
                continue;
            };
            let area = 0.5 * (corners[1] - corners[0]).cross(corners[2] - corners[0]).length();
            if !(area > 0.0 && area.is_finite()) {
                continue;
            }
            total += area;
            triangles.push(corners);
            cumulative.push(total);
        }

        if triangles.is_empty() {
            return None;
        }
        Some(Self {
            triangles,
            cumulative,
        })
    }

    /// Number of triangles with positive area.
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Total surface area.
    pub fn total_area(&self) -> f32 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    /// A point uniformly distributed over the surface.
    pub fn sample(&self, rng: &mut impl Rng) -> Vec3 {
        let target = rng.random::<f32>() * self.total_area();
        let index = self
            .cumulative
            .partition_point(|&c| c <= target)
            .min(self.triangles.len() - 1);
        let [a, b, c] = self.triangles[index];

        let r1 = rng.random::<f32>().sqrt();
        let r2 = rng.random::<f32>();
        a * (1.0 - r1) + b * (r1 * (1.0 - r2)) + c * (r1 * r2)
    }
}

fn corners(positions: &[[f32; 3]], tri: &[u32]) -> Option<[Vec3; 3]> {
    let get = |i: u32| positions.get(i as usize).copied().map(Vec3::from);
    Some([get(tri[0])?, get(tri[1])?, get(tri[2])?])
}

/// Instanced particle attributes.
#[derive(Debug, Clone, Default)]
pub struct ParticleField {
    /// `POSITION_STRIDE` floats per particle.
    pub positions: Vec<f32>,
    /// `DISTORTION_STRIDE` floats per particle: three in `[-1, 1)`, one in
    /// `[0, 1)`.
    pub distortions: Vec<f32>,
}

impl ParticleField {
    /// Particles in the field.
    pub fn instance_count(&self) -> u32 {
        (self.positions.len() / POSITION_STRIDE) as u32
    }
}

/// Sample `count` particles on the sampler's surface.
pub fn generate_particle_field(
    sampler: &SurfaceSampler,
    count: u32,
    rng: &mut impl Rng,
) -> ParticleField {
    let n = count as usize;
    let mut field = ParticleField {
        positions: Vec::with_capacity(n * POSITION_STRIDE),
        distortions: Vec::with_capacity(n * DISTORTION_STRIDE),
    };
    for _ in 0..n {
        field
            .positions
            .extend_from_slice(&sampler.sample(rng).to_array());
        for _ in 0..3 {
            field.distortions.push(rng.random::<f32>() * 2.0 - 1.0);
        }
        field.distortions.push(rng.random::<f32>());
    }
    log::debug!("sampled {count} surface particles");
    field
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    /// Unit square in the XY plane plus a large square at z = 5.
    fn two_squares() -> (Vec<[f32; 3]>, Vec<u32>) {
        let positions = vec![
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 5.0],
            [3.0, 0.0, 5.0],
            [3.0, 3.0, 5.0],
            [0.0, 3.0, 5.0],
        ];
        let indices = vec![0, 1, 2, 0, 2, 3, 4, 5, 6, 4, 6, 7];
        (positions, indices)
    }

    fn on_triangle(p: Vec3, [a, b, c]: [Vec3; 3]) -> bool {
        let n = (b - a).cross(c - a);
        if ((p - a).dot(n) / n.length()).abs() > 1e-4 {
            return false;
        }
        // every edge sees the point on the inner side
        [(a, b), (b, c), (c, a)]
            .iter()
            .all(|&(u, v)| (v - u).cross(p - u).dot(n) >= -1e-4)
    }

    #[test]
    fn samples_lie_on_source_triangles() {
        let (positions, indices) = two_squares();
        let sampler = SurfaceSampler::new(&positions, &indices).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..2000 {
            let p = sampler.sample(&mut rng);
            assert!(
                sampler.triangles.iter().any(|&t| on_triangle(p, t)),
                "{p:?} is off the surface"
            );
        }
    }

    #[test]
    fn samples_are_area_weighted() {
        let (positions, indices) = two_squares();
        let sampler = SurfaceSampler::new(&positions, &indices).unwrap();
        assert!((sampler.total_area() - 10.0).abs() < 1e-5);

        let mut rng = StdRng::seed_from_u64(11);
        let draws = 20_000;
        let far = (0..draws)
            .filter(|_| sampler.sample(&mut rng).z > 2.5)
            .count();
        // the far square holds 90% of the area
        let share = far as f32 / draws as f32;
        assert!((share - 0.9).abs() < 0.02, "{share}");
    }

    #[test]
    fn degenerate_and_out_of_range_triangles_are_skipped() {
        let positions = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]];
        assert!(SurfaceSampler::new(&positions, &[0, 1, 2]).is_none());
        assert!(SurfaceSampler::new(&positions, &[0, 1, 9]).is_none());
        assert!(SurfaceSampler::new(&[], &[]).is_none());
    }

    #[test]
    fn particle_distortions_stay_in_range() {
        let (positions, indices) = two_squares();
        let sampler = SurfaceSampler::new(&positions, &indices).unwrap();
        let field = generate_particle_field(&sampler, 500, &mut StdRng::seed_from_u64(3));

        assert_eq!(field.instance_count(), 500);
        assert_eq!(field.positions.len(), 500 * POSITION_STRIDE);
        assert_eq!(field.distortions.len(), 500 * DISTORTION_STRIDE);
        for d in field.distortions.chunks_exact(DISTORTION_STRIDE) {
            assert!(d[..3].iter().all(|v| (-1.0..1.0).contains(v)), "{d:?}");
            assert!((0.0..1.0).contains(&d[3]), "{d:?}");
        }
    }

    #[test]
    fn zero_particles_is_empty() {
        let (positions, indices) = two_squares();
        let sampler = SurfaceSampler::new(&positions, &indices).unwrap();
        let field = generate_particle_field(&sampler, 0, &mut StdRng::seed_from_u64(0));
        assert_eq!(field.instance_count(), 0);
        assert!(field.distortions.is_empty());
    }
}
