//! Fixed-grid bucketing for index entries.
//!
//! The index partitions the globe into 1-degree-by-1-degree cells and stores
//! each entry under a key whose prefix is the cell, so a radius search only
//! scans the cells its bounding window touches.
//!
//! # Key Format
//!
//! An index entry key is:
//! - 2 bytes latitude row (big-endian u16)
//! - 2 bytes longitude column (big-endian u16)
//! - The raw parcel id bytes
//!
//! Big-endian rows and columns keep cells contiguous in key order, so one
//! range scan per cell reaches exactly that cell's entries.

use parceldb_core::{GeoPoint, ParcelId};

use crate::geodesic::RadiusBounds;

/// Number of 1-degree latitude rows.
pub const LAT_ROWS: u16 = 180;

/// Number of 1-degree longitude columns.
pub const LON_COLS: u16 = 360;

/// Size of the cell prefix in an entry key, in bytes.
pub const CELL_PREFIX_LEN: usize = 4;

/// A 1-degree-by-1-degree bucket of the spatial grid.
///
/// Rows count north from 90 degrees south; columns count east from 180
/// degrees west. The north pole and the +180 meridian fold into the last
/// row and column, so every valid coordinate maps to exactly one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridCell {
    /// Latitude row, `0..LAT_ROWS`.
    pub lat_row: u16,
    /// Longitude column, `0..LON_COLS`.
    pub lon_col: u16,
}

impl GridCell {
    /// The cell containing the given point.
    #[must_use]
    pub fn of(point: &GeoPoint) -> Self {
        Self::at(point.latitude(), point.longitude())
    }

    /// The cell containing the given coordinates.
    #[must_use]
    pub fn at(latitude: f64, longitude: f64) -> Self {
        let row = (latitude + 90.0).floor() as i64;
        let col = (longitude + 180.0).floor() as i64;
        Self {
            lat_row: row.clamp(0, i64::from(LAT_ROWS - 1)) as u16,
            lon_col: col.clamp(0, i64::from(LON_COLS - 1)) as u16,
        }
    }

    /// Big-endian `[lat_row, lon_col]` byte prefix for entry keys.
    #[must_use]
    pub const fn key_prefix(&self) -> [u8; 4] {
        let lat = self.lat_row.to_be_bytes();
        let lon = self.lon_col.to_be_bytes();
        [lat[0], lat[1], lon[0], lon[1]]
    }

    /// The first prefix that sorts after every key in this cell.
    #[must_use]
    pub const fn next_prefix(&self) -> [u8; 4] {
        (u32::from_be_bytes(self.key_prefix()) + 1).to_be_bytes()
    }
}

/// Encode an index entry key: cell prefix followed by the raw id bytes.
#[must_use]
pub fn encode_entry_key(cell: GridCell, id: &ParcelId) -> Vec<u8> {
    let prefix = cell.key_prefix();
    let id_bytes = id.as_bytes();
    let mut key = Vec::with_capacity(CELL_PREFIX_LEN + id_bytes.len());
    key.extend_from_slice(&prefix);
    key.extend_from_slice(id_bytes);
    key
}

/// Decode an index entry key into its cell and id portion.
///
/// Returns `None` if the key is shorter than a cell prefix or the id bytes
/// are not valid UTF-8.
#[must_use]
pub fn decode_entry_key(key: &[u8]) -> Option<(GridCell, &str)> {
    if key.len() < CELL_PREFIX_LEN {
        return None;
    }
    let lat_row = u16::from_be_bytes([key[0], key[1]]);
    let lon_col = u16::from_be_bytes([key[2], key[3]]);
    let id = std::str::from_utf8(&key[CELL_PREFIX_LEN..]).ok()?;
    Some((GridCell { lat_row, lon_col }, id))
}

/// All cells that intersect the given search window.
///
/// The cover is padded by one cell on each side so that points sitting
/// exactly on the window edge stay covered under floating-point rounding.
/// Latitude padding clamps at the poles; longitude padding wraps around
/// the antimeridian.
#[must_use]
pub fn covering_cells(bounds: &RadiusBounds) -> Vec<GridCell> {
    let south = GridCell::at(bounds.min_latitude, 0.0).lat_row.saturating_sub(1);
    let north = (GridCell::at(bounds.max_latitude, 0.0).lat_row + 1).min(LAT_ROWS - 1);

    let west = GridCell::at(0.0, bounds.min_longitude).lon_col;
    let east = GridCell::at(0.0, bounds.max_longitude).lon_col;
    let columns = padded_columns(west, east, bounds.wraps_antimeridian());

    let rows = usize::from(north - south + 1);
    let mut cells = Vec::with_capacity(rows * columns.len());
    for lat_row in south..=north {
        for &lon_col in &columns {
            cells.push(GridCell { lat_row, lon_col });
        }
    }
    cells
}

/// Longitude columns for a window, padded one column on each side with
/// wraparound. Returns the full ring when padding would cover it anyway.
fn padded_columns(west: u16, east: u16, wraps: bool) -> Vec<u16> {
    let span = if wraps {
        usize::from(LON_COLS - west + east + 1)
    } else {
        usize::from(east - west + 1)
    };

    let padded = span + 2;
    if padded >= usize::from(LON_COLS) {
        return (0..LON_COLS).collect();
    }

    let start = if west == 0 { LON_COLS - 1 } else { west - 1 };
    (0..padded).map(|i| (start + i as u16) % LON_COLS).collect()
}
