//! Procedural geometry used for the default planet.

use std::f32::consts::PI;

/// Flat geometry streams, the layout [`Mesh::from_geometry`] consumes.
///
/// [`Mesh::from_geometry`]: crate::gfx::scene::Mesh::from_geometry
#[derive(Clone, Debug, Default)]
pub struct GeometryData {
    pub vertices: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub tex_coords: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
}

impl GeometryData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Generates a Y-up UV sphere centered at the origin.
///
/// Longitude wraps with a duplicated seam column so texture coordinates run
/// a full 0 to 1 without interpolation artifacts.
pub fn generate_sphere(radius: f32, longitude_segments: u32, latitude_segments: u32) -> GeometryData {
    let mut data = GeometryData::new();

    let long_segs = longitude_segments.max(3);
    let lat_segs = latitude_segments.max(2);

    for lat in 0..=lat_segs {
        let theta = lat as f32 * PI / lat_segs as f32;
        let sin_theta = theta.sin();
        let cos_theta = theta.cos();

        for long in 0..=long_segs {
            let phi = long as f32 * 2.0 * PI / long_segs as f32;

            let x = sin_theta * phi.cos();
            let y = cos_theta;
            let z = sin_theta * phi.sin();

            data.vertices.push([x * radius, y * radius, z * radius]);
            data.normals.push([x, y, z]);
            data.tex_coords.push([
                long as f32 / long_segs as f32,
                lat as f32 / lat_segs as f32,
            ]);
        }
    }

    // Counter-clockwise when viewed from outside the sphere
    let stride = long_segs + 1;
    for lat in 0..lat_segs {
        for long in 0..long_segs {
            let first = lat * stride + long;
            let second = first + stride;

            data.indices.push(first);
            data.indices.push(first + 1);
            data.indices.push(second);

            data.indices.push(second);
            data.indices.push(first + 1);
            data.indices.push(second + 1);
        }
    }

    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sphere_streams_are_consistent() {
        let sphere = generate_sphere(1.0, 16, 12);
        assert_eq!(sphere.vertices.len(), sphere.normals.len());
        assert_eq!(sphere.vertices.len(), sphere.tex_coords.len());
        assert_eq!(sphere.vertex_count(), (16 + 1) * (12 + 1));
        assert_eq!(sphere.triangle_count(), (16 * 12 * 2) as usize);
    }

    #[test]
    fn sphere_vertices_sit_on_the_radius() {
        let sphere = generate_sphere(2.5, 8, 6);
        for v in &sphere.vertices {
            let length = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
            assert!((length - 2.5).abs() < 1e-4);
        }
        for n in &sphere.normals {
            let length = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
            assert!((length - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn sphere_triangles_wind_counter_clockwise_from_outside() {
        let sphere = generate_sphere(1.0, 16, 12);
        for triangle in sphere.indices.chunks(3) {
            let p = |i: usize| sphere.vertices[triangle[i] as usize];
            let (v0, v1, v2) = (p(0), p(1), p(2));

            let e1 = [v1[0] - v0[0], v1[1] - v0[1], v1[2] - v0[2]];
            let e2 = [v2[0] - v0[0], v2[1] - v0[1], v2[2] - v0[2]];
            let normal = [
                e1[1] * e2[2] - e1[2] * e2[1],
                e1[2] * e2[0] - e1[0] * e2[2],
                e1[0] * e2[1] - e1[1] * e2[0],
            ];
            let area_sq = normal[0] * normal[0] + normal[1] * normal[1] + normal[2] * normal[2];
            if area_sq < 1e-12 {
                continue; // pole triangles collapse to a line
            }

            let centroid = [
                (v0[0] + v1[0] + v2[0]) / 3.0,
                (v0[1] + v1[1] + v2[1]) / 3.0,
                (v0[2] + v1[2] + v2[2]) / 3.0,
            ];
            let outward = normal[0] * centroid[0] + normal[1] * centroid[1] + normal[2] * centroid[2];
            assert!(outward > 0.0, "triangle {triangle:?} faces inward");
        }
    }

    #[test]
    fn sphere_indices_stay_in_range() {
        let sphere = generate_sphere(1.0, 5, 4);
        let count = sphere.vertex_count() as u32;
        assert!(sphere.indices.iter().all(|&i| i < count));
    }
}
