//! Key encoding for logical tables over a single redb table.
//!
//! Redb wants table names known up front, but the parcel store names its
//! tables at runtime ("parcels", "geo_index", ...). So everything goes
//! into one physical table and the logical table name is prefixed onto
//! each key. The prefix ends with a 0x00 separator, which table names
//! never contain, so keys from one logical table form a contiguous run
//! in sort order.

use redb::TableDefinition;

/// The single physical table holding all parcel-store data.
pub const DATA_TABLE: TableDefinition<'static, &[u8], &[u8]> = TableDefinition::new("parcel_data");

/// Byte separating the table-name prefix from the logical key.
pub const KEY_SEPARATOR: u8 = 0x00;

/// Build the physical key for `key` in logical table `table`:
/// `<table><0x00><key>`.
pub fn encode_key(table: &str, key: &[u8]) -> Vec<u8> {
    let mut encoded = Vec::with_capacity(table.len() + 1 + key.len());
    encoded.extend_from_slice(table.as_bytes());
    encoded.push(KEY_SEPARATOR);
    encoded.extend_from_slice(key);
    encoded
}

/// Split a physical key back into `(table, key)`.
///
/// Returns `None` if the key is malformed (missing separator).
pub fn decode_key(encoded: &[u8]) -> Option<(&str, &[u8])> {
    let sep_pos = encoded.iter().position(|&b| b == KEY_SEPARATOR)?;
    let table = std::str::from_utf8(&encoded[..sep_pos]).ok()?;
    let key = &encoded[sep_pos + 1..];
    Some((table, key))
}

/// Smallest physical key belonging to `table`.
pub fn table_start_key(table: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(table.len() + 1);
    key.extend_from_slice(table.as_bytes());
    key.push(KEY_SEPARATOR);
    key
}

/// First physical key past the end of `table`.
///
/// Bumping the separator byte works because 0x00 is the lowest byte value,
/// so `<table><0x01>` sorts after every `<table><0x00>...` key.
pub fn table_end_key(table: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(table.len() + 1);
    key.extend_from_slice(table.as_bytes());
    key.push(KEY_SEPARATOR + 1);
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoded_key_round_trips() {
        let table = "parcels";
        let key = b"apn-5843-021";

        let encoded = encode_key(table, key);

        let (decoded_table, decoded_key) = decode_key(&encoded).unwrap();
        assert_eq!(decoded_table, table);
        assert_eq!(decoded_key, key);
    }

    #[test]
    fn empty_logical_key_round_trips() {
        let encoded = encode_key("meta", b"");

        let (decoded_table, decoded_key) = decode_key(&encoded).unwrap();
        assert_eq!(decoded_table, "meta");
        assert_eq!(decoded_key, b"");
    }

    #[test]
    fn same_table_keys_sort_adjacently() {
        let key_a = encode_key("parcels", b"a");
        let key_b = encode_key("parcels", b"b");
        let key_other = encode_key("zones", b"a");

        assert!(key_a < key_b);
        assert!(key_b < key_other);
    }

    #[test]
    fn table_bounds_bracket_exactly_that_table() {
        let start = table_start_key("parcels");
        let end = table_end_key("parcels");

        let parcel_key = encode_key("parcels", b"apn-0001-001");
        assert!(parcel_key.as_slice() >= start.as_slice());
        assert!(parcel_key.as_slice() < end.as_slice());

        let other_key = encode_key("zones", b"apn-0001-001");
        assert!(other_key.as_slice() >= end.as_slice());
    }
}
