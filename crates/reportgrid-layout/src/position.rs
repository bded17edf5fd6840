use bitvec::vec::BitVec;
use reportgrid_core::CellRange;
use std::collections::BTreeMap;

/// Tracks which grid coordinates a layout pass has already consumed.
///
/// Each row keeps a bit per column. A set bit means a cell is anchored there
/// or a span from an earlier cell reaches it. Marks are never cleared.
#[derive(Debug, Clone, Default)]
pub struct PositionMap {
    rows: BTreeMap<u32, BitVec>,
}

impl PositionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether (row, col) is taken
    pub fn is_occupied(&self, row: u32, col: u32) -> bool {
        self.rows
            .get(&row)
            .and_then(|bits| bits.get(col as usize).map(|bit| *bit))
            .unwrap_or(false)
    }

    /// Mark (row, col) as taken. Marking twice is a no-op.
    pub fn mark(&mut self, row: u32, col: u32) {
        let bits = self.rows.entry(row).or_default();
        let idx = col as usize;
        if bits.len() <= idx {
            bits.resize(idx + 1, false);
        }
        bits.set(idx, true);
    }

    /// Mark every coordinate of `range`
    pub fn mark_range(&mut self, range: CellRange) {
        for coord in range {
            self.mark(coord.row, coord.col);
        }
    }

    /// First column of `row` that is not taken.
    ///
    /// Columns are unbounded, so past the last mark there is always a free one.
    pub fn first_free(&self, row: u32) -> u32 {
        match self.rows.get(&row) {
            Some(bits) => bits.first_zero().unwrap_or(bits.len()) as u32,
            None => 0,
        }
    }

    /// Highest column taken in `row`
    pub fn max_column(&self, row: u32) -> Option<u32> {
        self.rows
            .get(&row)
            .and_then(|bits| bits.last_one())
            .map(|col| col as u32)
    }

    /// Columns taken in `row`, ascending
    pub fn columns(&self, row: u32) -> Vec<u32> {
        self.rows
            .get(&row)
            .map(|bits| bits.iter_ones().map(|col| col as u32).collect())
            .unwrap_or_default()
    }

    /// First row below every mark
    pub fn next_free_row(&self) -> u32 {
        self.rows().last().map_or(0, |row| row.saturating_add(1))
    }

    /// Rows with at least one mark
    pub fn rows(&self) -> impl Iterator<Item = u32> + '_ {
        self.rows
            .iter()
            .filter(|(_, bits)| bits.any())
            .map(|(&row, _)| row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reportgrid_core::CellCoord;

    #[test]
    fn test_empty_row_is_free() {
        let map = PositionMap::new();
        assert!(!map.is_occupied(0, 0));
        assert_eq!(map.first_free(7), 0);
        assert_eq!(map.max_column(7), None);
    }

    #[test]
    fn test_mark_is_idempotent() {
        let mut map = PositionMap::new();
        map.mark(0, 2);
        map.mark(0, 0);
        map.mark(0, 2);

        assert!(map.is_occupied(0, 0));
        assert!(!map.is_occupied(0, 1));
        assert!(map.is_occupied(0, 2));
        assert_eq!(map.columns(0), vec![0, 2]);
    }

    #[test]
    fn test_first_free_skips_marked_columns() {
        let mut map = PositionMap::new();
        map.mark(1, 0);
        map.mark(1, 1);
        map.mark(1, 3);
        assert_eq!(map.first_free(1), 2);

        map.mark(1, 2);
        assert_eq!(map.first_free(1), 4);
    }

    #[test]
    fn test_first_free_past_full_row() {
        let mut map = PositionMap::new();
        for col in 0..64 {
            map.mark(0, col);
        }
        assert_eq!(map.first_free(0), 64);
    }

    #[test]
    fn test_mark_range_covers_rectangle() {
        let mut map = PositionMap::new();
        map.mark_range(CellRange::from_extent(CellCoord::new(2, 1), 2, 3));

        for row in 2..4 {
            for col in 1..4 {
                assert!(map.is_occupied(row, col), "({row}, {col}) not marked");
            }
        }
        assert!(!map.is_occupied(2, 0));
        assert!(!map.is_occupied(4, 1));
        assert_eq!(map.max_column(3), Some(3));
        assert_eq!(map.rows().collect::<Vec<_>>(), vec![2, 3]);
    }

    #[test]
    fn test_next_free_row_follows_spans() {
        let mut map = PositionMap::new();
        assert_eq!(map.next_free_row(), 0);

        map.mark(0, 3);
        map.mark_range(CellRange::from_extent(CellCoord::new(2, 0), 3, 1));
        assert_eq!(map.next_free_row(), 5);
    }
}
