//! Board Layout
//!
//! Ring geometry from viewport and device class.
//!
//! The board is a rectangle of tiles: a top row, a right column, a bottom row
//! and a left column. Edge counts depend on orientation; tile size is the
//! largest size that fits every edge without overlap.

use serde::{Deserialize, Serialize};

use crate::config::{BoardConfig, EdgeCounts};

/// Viewport as reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    /// Primary input is coarse (touch)
    pub coarse_pointer: bool,
}

impl Viewport {
    /// Mouse-driven viewport
    pub fn desktop(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            coarse_pointer: false,
        }
    }

    /// Touch-driven viewport
    pub fn touch(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            coarse_pointer: true,
        }
    }

    /// Coarse pointer on a narrow screen
    pub fn is_handheld(&self, board: &BoardConfig) -> bool {
        self.coarse_pointer && self.width <= board.handheld_max_width
    }

    pub fn is_portrait(&self) -> bool {
        self.height > self.width
    }

    /// Handheld held upright: the only case that switches to portrait layout
    pub fn wants_portrait(&self, board: &BoardConfig) -> bool {
        self.is_handheld(board) && self.is_portrait()
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::desktop(1280.0, 800.0)
    }
}

/// Board (canvas) size in board units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoardSize {
    pub width: f64,
    pub height: f64,
}

impl BoardSize {
    /// Board size for a viewport.
    ///
    /// Portrait boards keep a fixed width and follow the viewport aspect,
    /// clamped to the configured height range.
    pub fn for_viewport(viewport: &Viewport, board: &BoardConfig) -> Self {
        if viewport.wants_portrait(board) {
            let vw = viewport.width.max(board.min_viewport.0);
            let vh = viewport.height.max(board.min_viewport.1);
            let dynamic = (board.portrait_base_width * vh / vw).round();
            let (min_h, max_h) = board.portrait_height_range;
            Self {
                width: board.portrait_base_width,
                height: dynamic.min(max_h).max(min_h),
            }
        } else {
            Self {
                width: board.landscape_size.0,
                height: board.landscape_size.1,
            }
        }
    }
}

/// Which side of the board a tile sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

/// Resolved layout parameters for one ring build
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardLayout {
    pub size: BoardSize,
    pub counts: EdgeCounts,
    pub padding_x: f64,
    pub padding_y: f64,
    pub top_spacing: f64,
    pub bottom_spacing: f64,
    pub tile_size: f64,
    pub side_inset: f64,
    pub row_inset: f64,
    pub side_gap: f64,
    /// Side tiles are stretched to fill the column instead of centred
    pub packed_sides: bool,
}

impl BoardLayout {
    /// Compute the layout for a viewport
    pub fn for_viewport(viewport: &Viewport, board: &BoardConfig) -> Self {
        let portrait = viewport.wants_portrait(board);
        let counts = if portrait {
            board.portrait_counts
        } else {
            board.landscape_counts
        };
        let size = BoardSize::for_viewport(viewport, board);
        Self::with_counts(size, counts, portrait, board)
    }

    /// Compute the layout for explicit size and counts
    pub fn with_counts(
        size: BoardSize,
        counts: EdgeCounts,
        packed_sides: bool,
        board: &BoardConfig,
    ) -> Self {
        let usable_x = size.width - board.padding_x * 2.0;
        let usable_y = size.height - board.padding_y * 2.0;

        let top_spacing = row_spacing(usable_x, counts.top);
        let bottom_spacing = row_spacing(usable_x, counts.bottom);
        let horizontal_limit = top_spacing.min(bottom_spacing) * board.horizontal_fill;

        let side_max = |count: usize| {
            let count = count as f64;
            let numerator = usable_y
                - 2.0 * (1.0 + board.side_inset)
                - (count - 1.0) * board.side_tile_gap;
            numerator / (count + 2.0)
        };
        let vertical_limit = side_max(counts.right).min(side_max(counts.left));

        let tile_size = horizontal_limit
            .min(vertical_limit)
            .min(board.max_tile_size)
            .max(0.0);

        Self {
            size,
            counts,
            padding_x: board.padding_x,
            padding_y: board.padding_y,
            top_spacing,
            bottom_spacing,
            tile_size,
            side_inset: board.side_inset,
            row_inset: tile_size / 2.0 + 1.0,
            side_gap: board.side_tile_gap,
            packed_sides,
        }
    }

    pub fn usable_x(&self) -> f64 {
        self.size.width - self.padding_x * 2.0
    }

    pub fn usable_y(&self) -> f64 {
        self.size.height - self.padding_y * 2.0
    }

    /// Same board size and edge counts (geometry would be identical)
    pub fn same_shape(&self, other: &Self) -> bool {
        self.size == other.size && self.counts == other.counts
    }

    /// Tile centres in clockwise ring order
    pub fn tile_centers(&self) -> Vec<(Edge, f64, f64)> {
        let tile = self.tile_size;
        let usable_x = self.usable_x();
        let usable_y = self.usable_y();

        let side_top_edge = self.padding_y + self.row_inset + tile / 2.0 + self.side_inset;
        let side_bottom_edge =
            self.padding_y + usable_y - self.row_inset - tile / 2.0 - self.side_inset;
        let edge_inset = if self.packed_sides {
            (tile * 0.46).round().max(32.0)
        } else {
            0.0
        };
        let inner_top = side_top_edge + edge_inset;
        let inner_bottom = side_bottom_edge - edge_inset;
        let available = inner_bottom - inner_top;

        let side_step = |count: usize| {
            if count <= 1 {
                return tile + self.side_gap;
            }
            if self.packed_sides {
                let fit_gap = (available - count as f64 * tile) / (count as f64 - 1.0);
                tile + fit_gap.max(2.0)
            } else {
                tile + self.side_gap
            }
        };
        let side_start = |count: usize, step: f64| {
            if self.packed_sides {
                inner_top + tile / 2.0
            } else {
                let stack = count as f64 * tile + (count as f64 - 1.0) * (step - tile);
                side_top_edge + ((available - stack) / 2.0).max(0.0) + tile / 2.0
            }
        };

        let right_step = side_step(self.counts.right);
        let left_step = side_step(self.counts.left);
        let right_start = side_start(self.counts.right, right_step);
        let left_start = side_start(self.counts.left, left_step);

        let top_y = self.padding_y + self.row_inset;
        let bottom_y = self.padding_y + usable_y - self.row_inset;
        let right_x = self.padding_x + usable_x;
        let left_x = self.padding_x;

        let mut centers = Vec::with_capacity(self.counts.total());
        for i in 0..self.counts.top {
            centers.push((Edge::Top, self.padding_x + i as f64 * self.top_spacing, top_y));
        }
        for i in 0..self.counts.right {
            centers.push((Edge::Right, right_x, right_start + i as f64 * right_step));
        }
        for i in (0..self.counts.bottom).rev() {
            centers.push((
                Edge::Bottom,
                self.padding_x + i as f64 * self.bottom_spacing,
                bottom_y,
            ));
        }
        for i in (0..self.counts.left).rev() {
            centers.push((Edge::Left, left_x, left_start + i as f64 * left_step));
        }
        centers
    }

    /// Ring indices of the four corner tiles. Empty edges collapse onto index 0.
    pub fn corner_indices(&self) -> [usize; 4] {
        let c = &self.counts;
        [
            0,
            c.top.saturating_sub(1),
            c.top + c.right,
            (c.top + c.right + c.bottom).saturating_sub(1),
        ]
    }
}

fn row_spacing(usable_x: f64, count: usize) -> f64 {
    if count <= 1 {
        usable_x
    } else {
        usable_x / (count - 1) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_desktop_is_landscape() {
        let board = BoardConfig::default();
        let layout = BoardLayout::for_viewport(&Viewport::desktop(1280.0, 800.0), &board);
        assert_eq!(layout.size, BoardSize { width: 960.0, height: 680.0 });
        assert_eq!(layout.counts, EdgeCounts::landscape());
        assert!(!layout.packed_sides);
        assert_relative_eq!(layout.tile_size, 96.0);
    }

    #[test]
    fn test_tall_desktop_stays_landscape() {
        let board = BoardConfig::default();
        let layout = BoardLayout::for_viewport(&Viewport::desktop(600.0, 900.0), &board);
        assert_eq!(layout.counts, EdgeCounts::landscape());
    }

    #[test]
    fn test_handheld_portrait() {
        let board = BoardConfig::default();
        let viewport = Viewport::touch(390.0, 844.0);
        assert!(viewport.wants_portrait(&board));

        let layout = BoardLayout::for_viewport(&viewport, &board);
        assert_eq!(layout.counts, EdgeCounts::portrait());
        assert_eq!(layout.size.width, 680.0);
        assert_eq!(layout.size.height, 1472.0);
        assert!(layout.packed_sides);
    }

    #[test]
    fn test_portrait_height_clamped() {
        let board = BoardConfig::default();
        let very_tall = BoardSize::for_viewport(&Viewport::touch(320.0, 2000.0), &board);
        assert_eq!(very_tall.height, 1600.0);

        let nearly_square = BoardSize::for_viewport(&Viewport::touch(700.0, 720.0), &board);
        assert_eq!(nearly_square.height, 900.0);
    }

    #[test]
    fn test_wide_touch_screen_is_not_handheld() {
        let board = BoardConfig::default();
        let viewport = Viewport::touch(1200.0, 1600.0);
        assert!(!viewport.is_handheld(&board));
        let layout = BoardLayout::for_viewport(&viewport, &board);
        assert_eq!(layout.counts, EdgeCounts::landscape());
    }

    #[test]
    fn test_tile_size_limited_by_dense_edges() {
        let board = BoardConfig::default();
        let counts = EdgeCounts {
            top: 12,
            right: 7,
            bottom: 12,
            left: 7,
        };
        let layout = BoardLayout::with_counts(
            BoardSize { width: 960.0, height: 680.0 },
            counts,
            false,
            &board,
        );
        assert!(layout.tile_size < 96.0);
        assert!(layout.tile_size <= layout.top_spacing * 0.95 + 1e-9);
    }

    #[test]
    fn test_corner_indices() {
        let board = BoardConfig::default();
        let layout = BoardLayout::for_viewport(&Viewport::default(), &board);
        assert_eq!(layout.corner_indices(), [0, 7, 12, 19]);
    }

    #[test]
    fn test_centers_follow_clockwise_edges() {
        let board = BoardConfig::default();
        let layout = BoardLayout::for_viewport(&Viewport::default(), &board);
        let centers = layout.tile_centers();
        assert_eq!(centers.len(), 24);
        assert_eq!(centers[0].0, Edge::Top);
        assert_eq!(centers[8].0, Edge::Right);
        assert_eq!(centers[12].0, Edge::Bottom);
        assert_eq!(centers[20].0, Edge::Left);
        // Bottom row runs right to left, left column bottom to top
        assert!(centers[12].1 > centers[19].1);
        assert!(centers[20].2 > centers[23].2);
    }

    #[test]
    fn test_empty_edges_do_not_underflow() {
        let board = BoardConfig::default();
        let counts = EdgeCounts {
            top: 0,
            right: 4,
            bottom: 0,
            left: 4,
        };
        let size = BoardSize { width: 960.0, height: 680.0 };
        let layout = BoardLayout::with_counts(size, counts, false, &board);
        assert_eq!(layout.corner_indices(), [0, 0, 4, 3]);
        assert_eq!(layout.tile_centers().len(), 8);
    }
}
