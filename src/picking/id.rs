//! Pick id packing between instance indices and RGBA8 pixels.
//!
//! Ids are 1-based and packed little-endian into RGB:
//! - `0` → no hit (cleared background)
//! - `1..=MAX_PICK_ID` → instance `id - 1`
//!
//! The alpha channel is written as 255 and ignored on decode.

/// Largest id representable in three 8-bit channels.
pub const MAX_PICK_ID: u32 = 0x00FF_FFFF;

/// Number of instances addressable by a pick pass.
pub const MAX_PICKABLE_INSTANCES: usize = MAX_PICK_ID as usize;

/// A pick result resolved from an id-buffer pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PickResult {
    /// Background, or nothing under the pointer.
    #[default]
    None,
    /// An instance, identified by its zero-based index.
    Instance(u32),
}

impl PickResult {
    /// Convert to the `i32` convention of the selection uniform: the
    /// instance index, or `-1` for no hit.
    pub fn as_i32(&self) -> i32 {
        match *self {
            Self::Instance(idx) => idx as i32,
            Self::None => -1,
        }
    }

    /// Returns `true` if nothing was hit.
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// Pack the id of instance `index` into an RGBA8 pixel.
///
/// Returns `None` when `index + 1` does not fit in 24 bits.
pub fn encode_pick_id(index: u32) -> Option<[u8; 4]> {
    let id = index.checked_add(1).filter(|&id| id <= MAX_PICK_ID)?;
    Some([
        (id & 0xFF) as u8,
        ((id >> 8) & 0xFF) as u8,
        ((id >> 16) & 0xFF) as u8,
        0xFF,
    ])
}

/// Raw 24-bit id stored in an RGBA8 pixel.
pub fn raw_pick_id(pixel: [u8; 4]) -> u32 {
    u32::from(pixel[0]) | (u32::from(pixel[1]) << 8) | (u32::from(pixel[2]) << 16)
}

/// Resolve an id-buffer pixel into a [`PickResult`].
pub fn decode_pick_id(pixel: [u8; 4]) -> PickResult {
    match raw_pick_id(pixel) {
        0 => PickResult::None,
        id => PickResult::Instance(id - 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_instance_encodes_as_red_one() {
        assert_eq!(encode_pick_id(0), Some([1, 0, 0, 255]));
    }

    #[test]
    fn id_bytes_are_little_endian() {
        // index 0x0302FF -> id 0x030300
        assert_eq!(encode_pick_id(0x03_02FF), Some([0x00, 0x03, 0x03, 255]));
    }

    #[test]
    fn decode_inverts_encode_across_byte_boundaries() {
        for index in [0, 1, 254, 255, 256, 65_535, 65_536, 123_456] {
            let pixel = encode_pick_id(index).unwrap();
            assert_eq!(decode_pick_id(pixel), PickResult::Instance(index));
        }
    }

    #[test]
    fn largest_index_fits_and_next_does_not() {
        let last = MAX_PICK_ID - 1;
        assert_eq!(encode_pick_id(last), Some([255, 255, 255, 255]));
        assert_eq!(encode_pick_id(MAX_PICK_ID), None);
        assert_eq!(encode_pick_id(u32::MAX), None);
    }

    #[test]
    fn zero_pixel_decodes_to_none() {
        assert_eq!(decode_pick_id([0, 0, 0, 0]), PickResult::None);
        assert_eq!(decode_pick_id([0, 0, 0, 255]), PickResult::None);
        assert_eq!(PickResult::None.as_i32(), -1);
    }

    #[test]
    fn alpha_is_ignored() {
        assert_eq!(decode_pick_id([5, 0, 0, 0]), PickResult::Instance(4));
        assert_eq!(decode_pick_id([5, 0, 0, 17]), PickResult::Instance(4));
    }

    #[test]
    fn instance_as_i32() {
        assert_eq!(PickResult::Instance(41).as_i32(), 41);
        assert!(!PickResult::Instance(0).is_none());
        assert!(PickResult::default().is_none());
    }
}
