//! Spatial index storage operations.
//!
//! This module provides the grid-backed geometry index. Entries are keyed by
//! grid cell plus parcel id and carry the parcel's point as the value, so
//! radius searches touch only the cells inside the search window while
//! nearest-neighbor searches stream the whole index once.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::ops::Bound;

use parceldb_core::{GeoPoint, ParcelId, ScoredId};
use parceldb_storage::{Cursor, StorageError, Transaction};

use crate::bounds::{BoundingBox, GeoSummary};
use crate::error::{SpatialError, SpatialResult};
use crate::geodesic::{haversine_meters, radius_bounds};
use crate::grid::{covering_cells, decode_entry_key, encode_entry_key, GridCell};

/// Table name for spatial index entries.
pub const TABLE_GEO_INDEX: &str = "geo_index";

/// Serialize a point for storage as an entry value.
fn encode_point(point: &GeoPoint) -> SpatialResult<Vec<u8>> {
    bincode::serde::encode_to_vec(point, bincode::config::standard())
        .map_err(|e| SpatialError::Encoding(format!("failed to serialize point: {e}")))
}

/// Deserialize a stored entry value back into a point.
fn decode_point(bytes: &[u8]) -> SpatialResult<GeoPoint> {
    bincode::serde::decode_from_slice(bytes, bincode::config::standard())
        .map(|(point, _)| point)
        .map_err(|e| SpatialError::Encoding(format!("failed to deserialize point: {e}")))
}

/// Rebuild a validated id from the tail of an entry key.
fn decode_id(raw: &str) -> SpatialResult<ParcelId> {
    ParcelId::new(raw).map_err(|e| SpatialError::Encoding(format!("corrupt index key: {e}")))
}

/// Wrapper for max-heap comparison (we want smallest distances first).
///
/// Ties on distance break toward the smaller id, so the heap keeps the same
/// k entries regardless of scan order.
#[derive(Debug)]
struct MaxHeapEntry {
    id: ParcelId,
    distance: f64,
}

impl PartialEq for MaxHeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.distance == other.distance && self.id == other.id
    }
}

impl Eq for MaxHeapEntry {}

impl PartialOrd for MaxHeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MaxHeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Max-heap: larger distances should come first (to be popped).
        // NaN values are treated as equal to maintain a total ordering for
        // the heap; valid haversine distances never produce NaN.
        self.distance
            .partial_cmp(&other.distance)
            .unwrap_or(Ordering::Equal)
            .then_with(|| self.id.cmp(&other.id))
    }
}

/// Spatial index operations.
///
/// `GeoIndex` provides transactional maintenance and search over the grid
/// index. All operations work within a transaction context, so callers can
/// update a parcel record and its index entry atomically.
///
/// # Example
///
/// ```ignore
/// use parceldb_spatial::GeoIndex;
///
/// // Maintain the index alongside the record write
/// GeoIndex::upsert(&mut tx, &id, None, &point)?;
///
/// // Search around a center point
/// let hits = GeoIndex::within(&tx, &center, 10_000.0)?;
/// let closest = GeoIndex::nearest(&tx, &center, 5)?;
/// ```
pub struct GeoIndex;

impl GeoIndex {
    /// Insert or move the entry for a parcel.
    ///
    /// `previous` is the point currently indexed for this id, if any. When
    /// the parcel moves to a different grid cell the stale entry is removed
    /// first, so each id occupies exactly one entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry cannot be stored.
    pub fn upsert<T: Transaction>(
        tx: &mut T,
        id: &ParcelId,
        previous: Option<&GeoPoint>,
        point: &GeoPoint,
    ) -> SpatialResult<()> {
        let cell = GridCell::of(point);

        if let Some(old_point) = previous {
            let old_cell = GridCell::of(old_point);
            if old_cell != cell {
                tx.delete(TABLE_GEO_INDEX, &encode_entry_key(old_cell, id))?;
            }
        }

        let value = encode_point(point)?;
        tx.put(TABLE_GEO_INDEX, &encode_entry_key(cell, id), &value)?;
        Ok(())
    }

    /// Remove the entry for a parcel located at the given point.
    ///
    /// # Returns
    ///
    /// `true` if an entry was removed, `false` if none existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn remove<T: Transaction>(
        tx: &mut T,
        id: &ParcelId,
        point: &GeoPoint,
    ) -> SpatialResult<bool> {
        let cell = GridCell::of(point);
        Ok(tx.delete(TABLE_GEO_INDEX, &encode_entry_key(cell, id))?)
    }

    /// Look up the indexed point for a parcel known to be at `point`'s cell.
    ///
    /// # Returns
    ///
    /// The stored point, or `None` if the parcel has no entry in that cell.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails or the entry cannot be decoded.
    pub fn entry<T: Transaction>(
        tx: &T,
        id: &ParcelId,
        point: &GeoPoint,
    ) -> SpatialResult<Option<GeoPoint>> {
        let cell = GridCell::of(point);
        match tx.get(TABLE_GEO_INDEX, &encode_entry_key(cell, id)) {
            Ok(Some(value)) => Ok(Some(decode_point(&value)?)),
            Ok(None) => Ok(None),
            Err(StorageError::TableNotFound(_)) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Whether the index holds an entry for a parcel at the given point.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails.
    pub fn contains<T: Transaction>(
        tx: &T,
        id: &ParcelId,
        point: &GeoPoint,
    ) -> SpatialResult<bool> {
        Ok(Self::entry(tx, id, point)?.is_some())
    }

    /// Count all entries in the index.
    ///
    /// # Errors
    ///
    /// Returns an error if iteration fails.
    pub fn len<T: Transaction>(tx: &T) -> SpatialResult<u64> {
        let mut cursor = match tx.cursor(TABLE_GEO_INDEX) {
            Ok(c) => c,
            Err(StorageError::TableNotFound(_)) => return Ok(0),
            Err(e) => return Err(e.into()),
        };

        let mut count = 0;
        while cursor.next()?.is_some() {
            count += 1;
        }

        Ok(count)
    }

    /// Whether the index has no entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails.
    pub fn is_empty<T: Transaction>(tx: &T) -> SpatialResult<bool> {
        let mut cursor = match tx.cursor(TABLE_GEO_INDEX) {
            Ok(c) => c,
            Err(StorageError::TableNotFound(_)) => return Ok(true),
            Err(e) => return Err(e.into()),
        };

        Ok(cursor.next()?.is_none())
    }

    /// Iterate over all entries in key order.
    ///
    /// # Arguments
    ///
    /// * `tx` - The transaction to use
    /// * `f` - A function called for each entry. Return `false` to stop.
    ///
    /// # Errors
    ///
    /// Returns an error if iteration fails or an entry cannot be decoded.
    pub fn for_each<T: Transaction, F>(tx: &T, mut f: F) -> SpatialResult<()>
    where
        F: FnMut(&ParcelId, &GeoPoint) -> bool,
    {
        let mut cursor = match tx.cursor(TABLE_GEO_INDEX) {
            Ok(c) => c,
            Err(StorageError::TableNotFound(_)) => return Ok(()),
            Err(e) => return Err(e.into()),
        };

        while let Some((key, value)) = cursor.next()? {
            let Some((_, raw_id)) = decode_entry_key(&key) else {
                return Err(SpatialError::encoding("corrupt index key"));
            };
            let id = decode_id(raw_id)?;
            let point = decode_point(&value)?;
            if !f(&id, &point) {
                break;
            }
        }

        Ok(())
    }

    /// Find all entries within `radius_meters` of `center` (inclusive).
    ///
    /// Only the grid cells inside the radius window are scanned. The hits
    /// carry their geodesic distance from the center and come back in no
    /// particular order.
    ///
    /// # Errors
    ///
    /// Returns an error if a scan fails or an entry cannot be decoded.
    pub fn within<T: Transaction>(
        tx: &T,
        center: &GeoPoint,
        radius_meters: f64,
    ) -> SpatialResult<Vec<ScoredId>> {
        let bounds = radius_bounds(center, radius_meters);
        let mut hits = Vec::new();

        for cell in covering_cells(&bounds) {
            let start = cell.key_prefix();
            let end = cell.next_prefix();

            let cursor_result = tx.range(
                TABLE_GEO_INDEX,
                Bound::Included(start.as_slice()),
                Bound::Excluded(end.as_slice()),
            );

            // Handle table not existing (empty index)
            let mut cursor = match cursor_result {
                Ok(c) => c,
                Err(StorageError::TableNotFound(_)) => return Ok(hits),
                Err(e) => return Err(e.into()),
            };

            while let Some((key, value)) = cursor.next()? {
                let Some((_, raw_id)) = decode_entry_key(&key) else {
                    return Err(SpatialError::encoding("corrupt index key"));
                };
                let point = decode_point(&value)?;

                let distance = haversine_meters(center, &point);
                if distance <= radius_meters {
                    hits.push(ScoredId::new(decode_id(raw_id)?, distance));
                }
            }
        }

        Ok(hits)
    }

    /// Find the `k` entries nearest to `center`.
    ///
    /// Streams the whole index once, keeping a bounded heap of the best
    /// candidates. Results are sorted by ascending distance; entries at the
    /// same distance are ordered by ascending id.
    ///
    /// # Errors
    ///
    /// Returns an error if iteration fails or an entry cannot be decoded.
    pub fn nearest<T: Transaction>(
        tx: &T,
        center: &GeoPoint,
        k: usize,
    ) -> SpatialResult<Vec<ScoredId>> {
        if k == 0 {
            return Ok(Vec::new());
        }

        let mut cursor = match tx.cursor(TABLE_GEO_INDEX) {
            Ok(c) => c,
            Err(StorageError::TableNotFound(_)) => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        // Use a max-heap to keep track of the k smallest distances.
        // Use saturating_add to avoid overflow when k is usize::MAX.
        let mut heap: BinaryHeap<MaxHeapEntry> =
            BinaryHeap::with_capacity(k.saturating_add(1).min(1024));

        while let Some((key, value)) = cursor.next()? {
            let Some((_, raw_id)) = decode_entry_key(&key) else {
                return Err(SpatialError::encoding("corrupt index key"));
            };
            let point = decode_point(&value)?;

            let candidate =
                MaxHeapEntry { id: decode_id(raw_id)?, distance: haversine_meters(center, &point) };

            if heap.len() < k {
                heap.push(candidate);
            } else if let Some(worst) = heap.peek() {
                if candidate.cmp(worst) == Ordering::Less {
                    heap.pop();
                    heap.push(candidate);
                }
            }
        }

        // Convert heap to sorted vec: ascending distance, ties by id
        let results = heap.into_sorted_vec();
        Ok(results.into_iter().map(|e| ScoredId::new(e.id, e.distance)).collect())
    }

    /// Compute the bounding box and centroid over all entries.
    ///
    /// The centroid is the arithmetic mean of the stored coordinates.
    ///
    /// # Returns
    ///
    /// The summary, or `None` if the index is empty.
    ///
    /// # Errors
    ///
    /// Returns an error if iteration fails or an entry cannot be decoded.
    pub fn summary<T: Transaction>(tx: &T) -> SpatialResult<Option<GeoSummary>> {
        let mut bounds: Option<BoundingBox> = None;
        let mut longitude_sum = 0.0;
        let mut latitude_sum = 0.0;
        let mut count: u64 = 0;

        Self::for_each(tx, |_, point| {
            bounds.get_or_insert_with(|| BoundingBox::from_point(point)).expand(point);
            longitude_sum += point.longitude();
            latitude_sum += point.latitude();
            count += 1;
            true
        })?;

        Ok(bounds.map(|bounds| GeoSummary {
            bounds,
            centroid_longitude: longitude_sum / count as f64,
            centroid_latitude: latitude_sum / count as f64,
            count,
        }))
    }

    /// Remove every entry from the index.
    ///
    /// # Returns
    ///
    /// The number of entries removed.
    ///
    /// # Errors
    ///
    /// Returns an error if iteration or a delete fails.
    pub fn clear<T: Transaction>(tx: &mut T) -> SpatialResult<u64> {
        let mut keys = Vec::new();
        {
            let mut cursor = match tx.cursor(TABLE_GEO_INDEX) {
                Ok(c) => c,
                Err(StorageError::TableNotFound(_)) => return Ok(0),
                Err(e) => return Err(e.into()),
            };

            while let Some((key, _)) = cursor.next()? {
                keys.push(key);
            }
        }

        let mut removed = 0;
        for key in keys {
            if tx.delete(TABLE_GEO_INDEX, &key)? {
                removed += 1;
            }
        }

        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Note: Integration tests with actual storage backend are in the tests/ directory

    #[test]
    fn heap_orders_by_distance_then_id() {
        let a = MaxHeapEntry { id: ParcelId::new("a").expect("id"), distance: 10.0 };
        let b = MaxHeapEntry { id: ParcelId::new("b").expect("id"), distance: 10.0 };
        let c = MaxHeapEntry { id: ParcelId::new("c").expect("id"), distance: 5.0 };

        assert_eq!(a.cmp(&b), Ordering::Less);
        assert_eq!(b.cmp(&a), Ordering::Greater);
        assert_eq!(c.cmp(&a), Ordering::Less);

        let mut heap = BinaryHeap::new();
        heap.push(a);
        heap.push(b);
        heap.push(c);

        // The worst entry pops first: same distance as "a" but larger id
        let worst = heap.pop().expect("heap entry");
        assert_eq!(worst.id.as_str(), "b");
    }

    #[test]
    fn point_value_round_trip() {
        let point = GeoPoint::new(34.0522, -118.2437).expect("point");
        let bytes = encode_point(&point).expect("encode");
        let decoded = decode_point(&bytes).expect("decode");
        assert_eq!(decoded, point);
    }

    #[test]
    fn table_name_is_valid() {
        assert!(!TABLE_GEO_INDEX.is_empty());
    }
}
