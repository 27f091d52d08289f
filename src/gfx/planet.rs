//! The default content: a procedurally textured planet with a translucent,
//! independently spinning cloud layer.

use std::f32::consts::PI;

use rand::Rng;

use crate::gesture::motion::CLOUD_SPIN;
use crate::gfx::geometry::generate_sphere;
use crate::gfx::scene::{Mesh, Object};
use crate::gfx::texture::TextureImage;

const TEXTURE_WIDTH: u32 = 512;
const TEXTURE_HEIGHT: u32 = 256;

const OCEAN_DEEP: [f32; 3] = [11.0, 28.0, 58.0];
const OCEAN_SHALLOW: [f32; 3] = [20.0, 93.0, 168.0];
const LAND_DARK: [u8; 3] = [43, 143, 82];
const LAND_LIGHT: [u8; 3] = [63, 166, 93];

/// Builds the planet group: an opaque textured surface and the cloud shell
/// slightly above it.
pub fn create_earth() -> Vec<Object> {
    let mut surface = Object::new(
        "earth_surface",
        vec![Mesh::from_geometry(&generate_sphere(1.0, 64, 64))],
    )
    .with_image(create_earth_texture());
    surface.material.roughness = 0.9;
    surface.material.metalness = 0.05;

    let mut clouds = Object::new(
        "earth_clouds",
        vec![Mesh::from_geometry(&generate_sphere(1.02, 64, 64))],
    )
    .with_image(create_cloud_texture());
    clouds.material.base_color = [1.0, 1.0, 1.0, 0.55];
    clouds.transparent = true;
    clouds.spin_rate = CLOUD_SPIN;

    vec![surface, clouds]
}

/// Opaque surface texture: ocean gradient, scattered landmass blobs and
/// polar caps.
pub fn create_earth_texture() -> TextureImage {
    let mut image = TextureImage::solid(TEXTURE_WIDTH, TEXTURE_HEIGHT, [0, 0, 0, 255]);
    let mut rng = rand::rng();

    // Ocean: vertical gradient, deep at the poles, lighter at the equator
    for y in 0..TEXTURE_HEIGHT {
        let t = y as f32 / (TEXTURE_HEIGHT - 1) as f32;
        let blend = 1.0 - (t * 2.0 - 1.0).abs();
        let color = [
            mix(OCEAN_DEEP[0], OCEAN_SHALLOW[0], blend) as u8,
            mix(OCEAN_DEEP[1], OCEAN_SHALLOW[1], blend) as u8,
            mix(OCEAN_DEEP[2], OCEAN_SHALLOW[2], blend) as u8,
            255,
        ];
        for x in 0..TEXTURE_WIDTH {
            put_pixel(&mut image, x, y, color);
        }
    }

    // Landmasses
    for i in 0..90 {
        let cx = rng.random_range(0.0..TEXTURE_WIDTH as f32);
        let cy = rng.random_range(0.0..TEXTURE_HEIGHT as f32);
        let rx = rng.random_range(18.0..78.0) * 0.5;
        let ry = rng.random_range(10.0..50.0) * 0.5;
        let angle = rng.random_range(0.0..PI);
        let rgb = if i % 3 == 0 { LAND_DARK } else { LAND_LIGHT };
        fill_ellipse(&mut image, cx, cy, rx, ry, angle, [rgb[0], rgb[1], rgb[2], 255]);
    }

    // Polar caps
    let cap = [240, 244, 255, 217];
    for y in (0..16).chain(TEXTURE_HEIGHT - 16..TEXTURE_HEIGHT) {
        for x in 0..TEXTURE_WIDTH {
            blend_pixel(&mut image, x, y, cap);
        }
    }

    image
}

/// Cloud shell texture: translucent white wisps on a fully transparent
/// background.
pub fn create_cloud_texture() -> TextureImage {
    let mut image = TextureImage::solid(TEXTURE_WIDTH, TEXTURE_HEIGHT, [0, 0, 0, 0]);
    let mut rng = rand::rng();

    for _ in 0..160 {
        let cx = rng.random_range(0.0..TEXTURE_WIDTH as f32);
        let cy = rng.random_range(0.0..TEXTURE_HEIGHT as f32);
        let rx = rng.random_range(12.0..52.0) * 0.5;
        let ry = rng.random_range(8.0..36.0) * 0.5;
        let angle = rng.random_range(0.0..PI);
        let alpha = rng.random_range(0.1..0.4);
        blend_ellipse(&mut image, cx, cy, rx, ry, angle, [255, 255, 255, (alpha * 255.0) as u8]);
    }

    image
}

fn mix(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

fn put_pixel(image: &mut TextureImage, x: u32, y: u32, rgba: [u8; 4]) {
    let i = ((y * image.width + x) * 4) as usize;
    image.pixels[i..i + 4].copy_from_slice(&rgba);
}

/// Source-over blend of one pixel.
fn blend_pixel(image: &mut TextureImage, x: u32, y: u32, rgba: [u8; 4]) {
    let i = ((y * image.width + x) * 4) as usize;
    let sa = rgba[3] as f32 / 255.0;
    for c in 0..3 {
        let dst = image.pixels[i + c] as f32;
        image.pixels[i + c] = (rgba[c] as f32 * sa + dst * (1.0 - sa)) as u8;
    }
    let da = image.pixels[i + 3] as f32 / 255.0;
    image.pixels[i + 3] = ((sa + da * (1.0 - sa)) * 255.0) as u8;
}

fn for_ellipse(
    image: &mut TextureImage,
    cx: f32,
    cy: f32,
    rx: f32,
    ry: f32,
    angle: f32,
    mut plot: impl FnMut(&mut TextureImage, u32, u32),
) {
    let radius = rx.max(ry).ceil();
    let x0 = (cx - radius).floor().max(0.0) as u32;
    let x1 = ((cx + radius).ceil() as u32).min(image.width.saturating_sub(1));
    let y0 = (cy - radius).floor().max(0.0) as u32;
    let y1 = ((cy + radius).ceil() as u32).min(image.height.saturating_sub(1));
    let (sin, cos) = angle.sin_cos();

    for y in y0..=y1 {
        for x in x0..=x1 {
            // Rotate into the ellipse frame
            let dx = x as f32 - cx;
            let dy = y as f32 - cy;
            let ex = dx * cos + dy * sin;
            let ey = -dx * sin + dy * cos;
            if (ex / rx).powi(2) + (ey / ry).powi(2) <= 1.0 {
                plot(image, x, y);
            }
        }
    }
}

fn fill_ellipse(image: &mut TextureImage, cx: f32, cy: f32, rx: f32, ry: f32, angle: f32, rgba: [u8; 4]) {
    for_ellipse(image, cx, cy, rx, ry, angle, |img, x, y| {
        put_pixel(img, x, y, rgba)
    });
}

fn blend_ellipse(image: &mut TextureImage, cx: f32, cy: f32, rx: f32, ry: f32, angle: f32, rgba: [u8; 4]) {
    for_ellipse(image, cx, cy, rx, ry, angle, |img, x, y| {
        blend_pixel(img, x, y, rgba)
    });
}
