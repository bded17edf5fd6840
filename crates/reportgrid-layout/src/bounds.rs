use crate::position::PositionMap;

/// Highest column occupied in `row`, the sheet's bounding column
pub fn bounding_column(positions: &PositionMap, row: u32) -> Option<u32> {
    positions.max_column(row)
}

/// Columns a full-width merge (title, comments) should cover.
///
/// A flat header's length is authoritative. Otherwise the derived bounding
/// column decides, and a sheet one column wide needs no merge at all.
pub fn full_width(flat_header_len: Option<usize>, max_column: u32) -> Option<u32> {
    match flat_header_len {
        Some(len) => Some(len as u32),
        None if max_column > 0 => Some(max_column + 1),
        None => None,
    }
}
