//! Terrain chunk generation
//!
//! A chunk is a fixed-width slice of the world: columns of randomly stacked
//! platforms plus one floor strip spanning the whole chunk.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::random::{jitter, rand_int};
use crate::config::PlatformConfig;
use crate::consts::{FLOOR_HEIGHT, PLATFORM_HEIGHT};

/// Column spacing as a multiple of platform width
const COLUMN_SPACING: f32 = 1.1;
/// Horizontal jitter as a fraction of platform width
const JITTER_FRACTION: f32 = 0.1;

/// Floor appearance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FloorTexture {
    #[default]
    Platform,
    Lava,
}

impl FloorTexture {
    pub fn for_hazard(lava: bool) -> Self {
        if lava {
            FloorTexture::Lava
        } else {
            FloorTexture::Platform
        }
    }

    /// Asset key of the texture
    pub fn asset_key(&self) -> &'static str {
        match self {
            FloorTexture::Platform => "platform",
            FloorTexture::Lava => "lava",
        }
    }
}

/// A static platform (centre position)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub pos: Vec2,
    pub width: f32,
}

impl Platform {
    pub fn aabb(&self) -> Aabb {
        Aabb::from_center(self.pos, Vec2::new(self.width, PLATFORM_HEIGHT))
    }
}

/// The floor strip under one chunk
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FloorSegment {
    /// Left edge
    pub start: f32,
    pub width: f32,
    /// Bottom edge (the viewport bottom)
    pub bottom: f32,
    pub texture: FloorTexture,
}

impl FloorSegment {
    pub fn aabb(&self) -> Aabb {
        Aabb {
            min: Vec2::new(self.start, self.bottom - FLOOR_HEIGHT),
            max: Vec2::new(self.start + self.width, self.bottom),
        }
    }
}

/// One generated slice of terrain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Left edge of the chunk
    pub start: f32,
    pub width: f32,
    pub platforms: Vec<Platform>,
    pub floor: FloorSegment,
}

/// Generate the chunk covering `[position, position + chunk_size)`.
///
/// Columns start half a platform in and step `1.1 × width`. Each column
/// stacks `min_amount..=max_amount` platforms at heights drawn from
/// `[min_y, max_y]`, each nudged by up to ±10% of the platform width.
pub fn generate_chunk<R: Rng>(
    position: f32,
    chunk_size: f32,
    config: &PlatformConfig,
    floor_bottom: f32,
    texture: FloorTexture,
    rng: &mut R,
) -> Chunk {
    let plat_width = config.size;
    let step = COLUMN_SPACING * plat_width;
    let end = position + chunk_size;

    let mut platforms = Vec::new();
    let mut x = position + plat_width / 2.0;
    while x < end {
        let amount = rand_int(rng, config.min_amount as i32, config.max_amount as i32);
        for _ in 0..amount {
            let y = rand_int(rng, config.min_y, config.max_y) as f32;
            let dx = jitter(rng, JITTER_FRACTION, plat_width);
            platforms.push(Platform {
                pos: Vec2::new(x + dx, y),
                width: plat_width,
            });
        }
        x += step;
    }

    Chunk {
        start: position,
        width: chunk_size,
        platforms,
        floor: FloorSegment {
            start: position,
            width: chunk_size,
            bottom: floor_bottom,
            texture,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::random::seeded;
    use proptest::prelude::*;

    fn config() -> PlatformConfig {
        PlatformConfig::for_viewport(768.0)
    }

    #[test]
    fn test_column_count_and_floor() {
        let mut rng = seeded(9);
        let chunk = generate_chunk(0.0, 2048.0, &config(), 768.0, FloorTexture::Platform, &mut rng);
        // Columns at 128, 409.6, ..., 1817.6: 7 columns of 1-2 platforms
        assert!(chunk.platforms.len() >= 7 && chunk.platforms.len() <= 14);
        assert_eq!(chunk.floor.aabb().max.x, 2048.0);
        assert_eq!(chunk.floor.aabb().top(), 736.0);
        assert_eq!(chunk.floor.texture, FloorTexture::Platform);
    }

    #[test]
    fn test_fixed_amount_config() {
        let mut rng = seeded(2);
        let cfg = PlatformConfig {
            min_amount: 3,
            max_amount: 3,
            ..config()
        };
        let chunk = generate_chunk(-2048.0, 2048.0, &cfg, 768.0, FloorTexture::Lava, &mut rng);
        assert_eq!(chunk.platforms.len(), 7 * 3);
        assert_eq!(chunk.floor.texture, FloorTexture::Lava);
        assert_eq!(chunk.floor.start, -2048.0);
    }

    #[test]
    fn test_same_seed_same_chunk() {
        let a = generate_chunk(0.0, 2048.0, &config(), 768.0, FloorTexture::Platform, &mut seeded(5));
        let b = generate_chunk(0.0, 2048.0, &config(), 768.0, FloorTexture::Platform, &mut seeded(5));
        assert_eq!(a, b);
    }

    proptest! {
        #[test]
        fn prop_platforms_within_band(seed in any::<u64>(), position in -100_000i32..100_000) {
            let cfg = config();
            let position = position as f32;
            let chunk = generate_chunk(position, 2048.0, &cfg, 768.0, FloorTexture::Platform, &mut seeded(seed));
            for p in &chunk.platforms {
                prop_assert!(p.pos.y >= cfg.min_y as f32 && p.pos.y <= cfg.max_y as f32);
                // Column centres stay inside the chunk; jitter adds at most 10% of a width
                prop_assert!(p.pos.x >= position + cfg.size / 2.0 - 0.1 * cfg.size - 0.1);
                prop_assert!(p.pos.x < position + 2048.0 + 0.1 * cfg.size);
            }
        }
    }
}
