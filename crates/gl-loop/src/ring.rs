//! The fixed cycle of tiles a spin pointer walks

use serde::Serialize;

use crate::config::BoardConfig;
use crate::layout::{BoardLayout, Edge, Viewport};

/// Gem catalog, assigned to tiles by `index % GEM_CATALOG.len()`
pub const GEM_CATALOG: [(&str, &str); 16] = [
    ("Ruby", "#ff5f6d"),
    ("Sapphire", "#3b82f6"),
    ("Emerald", "#34d399"),
    ("Diamond", "#cbd5f5"),
    ("Amethyst", "#a78bfa"),
    ("Topaz", "#f6c16d"),
    ("Onyx", "#475569"),
    ("Opal", "#f4f1ff"),
    ("Spinel", "#fb7185"),
    ("Citrine", "#fbbf24"),
    ("Aquamarine", "#7dd3fc"),
    ("Peridot", "#bef264"),
    ("Garnet", "#dc2626"),
    ("Morganite", "#fda4af"),
    ("Tourmaline", "#a78bfa"),
    ("Zircon", "#fcd34d"),
];

/// Axis-aligned tile bounds (top-left origin)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    /// Inclusive point test
    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x && px <= self.x + self.w && py >= self.y && py <= self.y + self.h
    }

    /// Interiors intersect (touching edges do not count)
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && other.x < self.x + self.w
            && self.y < other.y + other.h
            && other.y < self.y + self.h
    }
}

/// A betting/landing tile. Immutable once the ring is built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tile {
    pub index: usize,
    pub gem: &'static str,
    pub color: &'static str,
    pub edge: Edge,
    /// Centre x
    pub x: f64,
    /// Centre y
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Corner tile, drawn as a jackpot gem
    pub is_corner: bool,
    /// Cosmetic multiplier. Not consumed by payout.
    pub multiplier: f64,
}

impl Tile {
    pub fn bounds(&self) -> Rect {
        Rect {
            x: self.x - self.width / 2.0,
            y: self.y - self.height / 2.0,
            w: self.width,
            h: self.height,
        }
    }
}

/// Ordered ring of tiles for one layout
#[derive(Debug, Clone, Serialize)]
pub struct Ring {
    layout: BoardLayout,
    tiles: Vec<Tile>,
}

impl Ring {
    /// Build the ring for a viewport
    pub fn build(viewport: &Viewport, board: &BoardConfig) -> Self {
        Self::from_layout(BoardLayout::for_viewport(viewport, board), board)
    }

    /// Build the ring for an already resolved layout
    pub fn from_layout(layout: BoardLayout, board: &BoardConfig) -> Self {
        let corners = layout.corner_indices();
        let tiles = layout
            .tile_centers()
            .into_iter()
            .enumerate()
            .map(|(index, (edge, x, y))| {
                let (gem, color) = GEM_CATALOG[index % GEM_CATALOG.len()];
                Tile {
                    index,
                    gem,
                    color,
                    edge,
                    x,
                    y,
                    width: layout.tile_size,
                    height: layout.tile_size,
                    is_corner: corners.contains(&index),
                    multiplier: if board.bonus_indices.contains(&index) {
                        board.bonus_multiplier
                    } else {
                        1.0
                    },
                }
            })
            .collect();
        Self { layout, tiles }
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Tile> {
        self.tiles.get(index)
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn layout(&self) -> &BoardLayout {
        &self.layout
    }

    pub fn contains_index(&self, index: usize) -> bool {
        index < self.tiles.len()
    }

    /// Index following `index` in traversal order
    pub fn next_index(&self, index: usize) -> usize {
        if self.tiles.is_empty() {
            0
        } else {
            (index + 1) % self.tiles.len()
        }
    }

    /// Tile under a board-space point
    pub fn tile_at(&self, x: f64, y: f64) -> Option<&Tile> {
        self.tiles.iter().find(|tile| tile.bounds().contains(x, y))
    }
}
