//! World bounds and on-demand terrain
//!
//! The world only ever grows: when the player gets within half a viewport of
//! either generated edge, one new chunk is appended on that side.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::chunk::{Chunk, FloorSegment, FloorTexture, Platform, generate_chunk};
use super::state::{GameEvent, GameState};

/// Extents of the generated terrain
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldBounds {
    pub left: f32,
    pub right: f32,
}

impl WorldBounds {
    pub fn new(chunk_size: f32) -> Self {
        Self {
            left: 0.0,
            right: chunk_size,
        }
    }

    /// Player is within `half_view` of the right edge
    pub fn needs_right(&self, player_x: f32, half_view: f32) -> bool {
        player_x > self.right - half_view
    }

    /// Player is within `half_view` of the left edge
    pub fn needs_left(&self, player_x: f32, half_view: f32) -> bool {
        player_x < self.left + half_view
    }
}

/// Chunk starts generated by one `extend` call
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Extension {
    pub right: Option<f32>,
    pub left: Option<f32>,
}

impl Extension {
    pub fn is_empty(&self) -> bool {
        self.right.is_none() && self.left.is_none()
    }
}

/// All generated chunks, keyed by integer chunk index.
///
/// Generated indices always form the contiguous range
/// `left_index..right_index`; chunk `i` starts at `i * chunk_size`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Terrain {
    pub bounds: WorldBounds,
    chunk_size: f32,
    left_index: i64,
    right_index: i64,
    chunks: BTreeMap<i64, Chunk>,
}

impl Terrain {
    /// Empty terrain with bounds covering chunk 0.
    /// The caller inserts that chunk.
    pub fn new(chunk_size: f32) -> Self {
        Self {
            bounds: WorldBounds::new(chunk_size),
            chunk_size,
            left_index: 0,
            right_index: 1,
            chunks: BTreeMap::new(),
        }
    }

    pub fn chunk_size(&self) -> f32 {
        self.chunk_size
    }

    /// Left edge of chunk `index`
    pub fn chunk_start(&self, index: i64) -> f32 {
        index as f32 * self.chunk_size
    }

    fn index_of(&self, x: f32) -> i64 {
        (x / self.chunk_size).floor() as i64
    }

    /// Store the chunk generated for slot `index`. Each slot is filled at
    /// most once.
    pub fn insert(&mut self, index: i64, chunk: Chunk) {
        let previous = self.chunks.insert(index, chunk);
        debug_assert!(previous.is_none(), "chunk {index} generated twice");
    }

    /// Grow the world toward the player, at most one chunk per side.
    ///
    /// `generate` is called with the new chunk's start; the bound moves in
    /// the same step the chunk is stored.
    pub fn extend<F>(&mut self, player_x: f32, half_view: f32, mut generate: F) -> Extension
    where
        F: FnMut(f32) -> Chunk,
    {
        let mut extension = Extension::default();

        if self.bounds.needs_right(player_x, half_view) {
            let index = self.right_index;
            let start = self.chunk_start(index);
            self.insert(index, generate(start));
            self.right_index += 1;
            extension.right = Some(start);
        }

        if self.bounds.needs_left(player_x, half_view) {
            let index = self.left_index - 1;
            let start = self.chunk_start(index);
            self.insert(index, generate(start));
            self.left_index = index;
            extension.left = Some(start);
        }

        self.bounds = WorldBounds {
            left: self.chunk_start(self.left_index),
            right: self.chunk_start(self.right_index),
        };
        extension
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.values()
    }

    /// Chunks overlapping `[x - reach, x + reach]`
    pub fn chunks_near(&self, x: f32, reach: f32) -> impl Iterator<Item = &Chunk> {
        let lo = self.index_of(x - reach);
        let hi = self.index_of(x + reach);
        self.chunks.range(lo..=hi).map(|(_, chunk)| chunk)
    }

    pub fn platforms_near(&self, x: f32, reach: f32) -> impl Iterator<Item = &Platform> {
        self.chunks_near(x, reach).flat_map(|c| c.platforms.iter())
    }

    pub fn floors_near(&self, x: f32, reach: f32) -> impl Iterator<Item = &FloorSegment> {
        self.chunks_near(x, reach).map(|c| &c.floor)
    }

    /// Retexture every floor strip
    pub fn set_floor_texture(&mut self, texture: FloorTexture) {
        for chunk in self.chunks.values_mut() {
            chunk.floor.texture = texture;
        }
    }
}

/// Per-tick map extension around the player. New floor strips take the
/// current hazard texture.
pub fn extend_map(state: &mut GameState) -> Extension {
    let player_x = state.player.body.pos.x;
    let texture = state.floor_collider.texture();
    let GameState {
        terrain,
        rng,
        config,
        events,
        ..
    } = state;

    let extension = terrain.extend(player_x, config.half_view(), |start| {
        generate_chunk(
            start,
            config.chunk_size,
            &config.platform,
            config.viewport_height,
            texture,
            rng,
        )
    });

    for start in [extension.right, extension.left].into_iter().flatten() {
        log::debug!("Generated chunk at x={start}");
        events.push(GameEvent::ChunkGenerated { start });
    }
    extension
}
