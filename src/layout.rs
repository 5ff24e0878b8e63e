// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Grid geometry shared by the raster and vector renderers.
//!
//! Both renderers derive every position from [`compute_layout`], which is what
//! keeps the PNG and SVG outputs positionally identical. The calculator is a
//! pure function of the contributor count and the avatar diameter.

use serde::Serialize;

/// Default avatar diameter in pixels.
pub const DEFAULT_AVATAR_DIAMETER: u32 = 60;
/// Gap between neighbouring avatar cells.
pub const CELL_MARGIN: u32 = 15;
/// Padding around the whole grid, including the header band.
pub const OUTER_PADDING: u32 = 30;
/// Height reserved above the grid for the title.
pub const HEADER_HEIGHT: u32 = 60;
/// Maximum number of avatars placed on a single row.
pub const MAX_COLUMNS: u32 = 12;

/// Computed pixel geometry for a given contributor count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LayoutGeometry {
    /// Total canvas width in pixels.
    pub canvas_width:    u32,
    /// Total canvas height in pixels.
    pub canvas_height:   u32,
    /// Number of avatars per row, `min(count, 12)`.
    pub columns_per_row: u32,
    /// Number of avatar rows.
    pub row_count:       u32,
    /// Diameter of each avatar circle.
    pub avatar_diameter: u32,
    /// Gap between neighbouring cells.
    pub cell_margin:     u32,
    /// Padding around the content.
    pub outer_padding:   u32,
    /// Height of the title band.
    pub header_height:   u32
}

/// Grid coordinates of a single contributor cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellPosition {
    /// Zero-based row index.
    pub row:    u32,
    /// Zero-based column index.
    pub column: u32
}

/// Computes the grid geometry for `count` contributors.
///
/// A count of zero takes an explicit header-only branch: no rows, no columns,
/// and a canvas as wide as a single-column grid so the title band stays
/// visible.
///
/// # Examples
///
/// ```
/// use contributor_mosaic::{DEFAULT_AVATAR_DIAMETER, compute_layout};
///
/// let layout = compute_layout(30, DEFAULT_AVATAR_DIAMETER);
/// assert_eq!(layout.columns_per_row, 12);
/// assert_eq!(layout.row_count, 3);
/// assert_eq!(layout.canvas_width, 945);
/// ```
pub fn compute_layout(count: usize, avatar_diameter: u32) -> LayoutGeometry {
    let stride = avatar_diameter.saturating_add(CELL_MARGIN);

    if count == 0 {
        return LayoutGeometry {
            canvas_width: avatar_diameter.saturating_add(2 * OUTER_PADDING),
            canvas_height: HEADER_HEIGHT + 2 * OUTER_PADDING,
            columns_per_row: 0,
            row_count: 0,
            avatar_diameter,
            cell_margin: CELL_MARGIN,
            outer_padding: OUTER_PADDING,
            header_height: HEADER_HEIGHT
        };
    }

    let count = u32::try_from(count).unwrap_or(u32::MAX);
    let columns_per_row = count.min(MAX_COLUMNS);
    let row_count = count.div_ceil(columns_per_row);

    LayoutGeometry {
        canvas_width: extent(columns_per_row, stride).saturating_add(2 * OUTER_PADDING),
        canvas_height: extent(row_count, stride)
            .saturating_add(HEADER_HEIGHT + 2 * OUTER_PADDING),
        columns_per_row,
        row_count,
        avatar_diameter,
        cell_margin: CELL_MARGIN,
        outer_padding: OUTER_PADDING,
        header_height: HEADER_HEIGHT
    }
}

/// Span of `cells` cells separated by margins, saturating on overflow.
fn extent(cells: u32, stride: u32) -> u32 {
    cells.saturating_mul(stride).saturating_sub(CELL_MARGIN)
}

impl LayoutGeometry {
    /// Returns the grid cell for the contributor at `index`.
    ///
    /// On the header-only geometry every index maps to the origin cell.
    pub fn cell(&self, index: usize) -> CellPosition {
        if self.columns_per_row == 0 {
            return CellPosition {
                row:    0,
                column: 0
            };
        }
        let columns = self.columns_per_row as usize;
        CellPosition {
            row:    (index / columns) as u32,
            column: (index % columns) as u32
        }
    }

    /// Returns the top-left pixel of the avatar square at `index`.
    pub fn cell_origin(&self, index: usize) -> (u32, u32) {
        let cell = self.cell(index);
        let stride = self.avatar_diameter + self.cell_margin;
        (
            self.outer_padding + cell.column * stride,
            self.outer_padding + self.header_height + cell.row * stride
        )
    }

    /// Horizontal centre of the canvas, used to anchor the title.
    pub fn center_x(&self) -> f32 {
        self.canvas_width as f32 / 2.0
    }

    /// Avatar radius in pixels.
    pub fn radius(&self) -> f32 {
        self.avatar_diameter as f32 / 2.0
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    proptest! {
        #[test]
        fn columns_and_rows_follow_count(count in 1usize..=200) {
            let layout = compute_layout(count, DEFAULT_AVATAR_DIAMETER);
            let expected_columns = count.min(12) as u32;
            prop_assert_eq!(layout.columns_per_row, expected_columns);
            prop_assert_eq!(layout.row_count, (count as u32).div_ceil(expected_columns));
        }

        #[test]
        fn layout_is_idempotent(count in 0usize..=200, diameter in 8u32..=128) {
            prop_assert_eq!(compute_layout(count, diameter), compute_layout(count, diameter));
        }

        #[test]
        fn cells_stay_within_grid_and_canvas(count in 1usize..=120) {
            let layout = compute_layout(count, DEFAULT_AVATAR_DIAMETER);
            for index in 0..count {
                let cell = layout.cell(index);
                prop_assert!(cell.column < layout.columns_per_row);
                prop_assert!(cell.row < layout.row_count);

                let (x, y) = layout.cell_origin(index);
                prop_assert!(x + layout.avatar_diameter + layout.outer_padding <= layout.canvas_width);
                prop_assert!(y + layout.avatar_diameter + layout.outer_padding <= layout.canvas_height);
            }
        }
    }

    #[test]
    fn thirty_contributors_fill_three_rows() {
        let layout = compute_layout(30, DEFAULT_AVATAR_DIAMETER);
        assert_eq!(layout.columns_per_row, 12);
        assert_eq!(layout.row_count, 3);
        assert_eq!(layout.canvas_width, 12 * 75 - 15 + 60);
        assert_eq!(layout.canvas_height, 60 + 3 * 75 - 15 + 60);
    }

    #[test]
    fn small_counts_use_a_single_row() {
        let layout = compute_layout(2, DEFAULT_AVATAR_DIAMETER);
        assert_eq!(layout.columns_per_row, 2);
        assert_eq!(layout.row_count, 1);
        assert_eq!(layout.canvas_width, 195);
        assert_eq!(layout.canvas_height, 180);
    }

    #[test]
    fn zero_contributors_yield_header_only_geometry() {
        let layout = compute_layout(0, DEFAULT_AVATAR_DIAMETER);
        assert_eq!(layout.columns_per_row, 0);
        assert_eq!(layout.row_count, 0);
        assert_eq!(layout.canvas_height, HEADER_HEIGHT + 2 * OUTER_PADDING);
        assert_eq!(layout.canvas_width, 120);
        assert_eq!(layout.cell(5), CellPosition {
            row: 0, column: 0
        });
    }

    #[test]
    fn header_only_geometry_maps_every_index_to_origin() {
        let layout = compute_layout(0, DEFAULT_AVATAR_DIAMETER);
        for index in [0, 1, 12, 29] {
            assert_eq!(layout.cell(index), CellPosition {
                row: 0, column: 0
            });
            assert_eq!(layout.cell_origin(index), (30, 90));
        }
    }

    #[test]
    fn cell_origin_matches_grid_formula() {
        let layout = compute_layout(14, DEFAULT_AVATAR_DIAMETER);
        assert_eq!(layout.cell(13), CellPosition {
            row: 1, column: 1
        });
        assert_eq!(layout.cell_origin(0), (30, 90));
        assert_eq!(layout.cell_origin(13), (30 + 75, 90 + 75));
    }

    #[test]
    fn oversized_inputs_saturate_instead_of_overflowing() {
        let layout = compute_layout(usize::MAX, u32::MAX);
        assert_eq!(layout.canvas_width, u32::MAX);
        assert_eq!(layout.canvas_height, u32::MAX);
        assert_eq!(layout.columns_per_row, MAX_COLUMNS);
    }

    #[test]
    fn custom_diameter_scales_canvas() {
        let layout = compute_layout(3, 40);
        assert_eq!(layout.avatar_diameter, 40);
        assert_eq!(layout.canvas_width, 3 * 55 - 15 + 60);
        assert_eq!(layout.radius(), 20.0);
    }
}
