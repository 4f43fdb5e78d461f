use crate::storage::error::{StorageError, StorageResult};
use crate::storage::PAGE_SIZE;
use byteorder::{ByteOrder, LittleEndian};

// Header structure (8 bytes)
pub const HEADER_SIZE: usize = 8;
const NUM_SLOTS_OFFSET: usize = 0;
const END_FREE_SPACE_OFFSET: usize = 4;

// Slot size (8 bytes: 4 for offset, 4 for size)
pub const SLOT_SIZE: usize = 8;

/// Location of one payload inside a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub offset: u32,
    pub size: u32,
}

/// An owned page in slotted layout.
///
/// ```text
/// | num_slots | end_free_space | slot[0] | slot[1] | ... -> free <- ... | data[1] | data[0] |
/// ```
///
/// The slot directory grows up from the header and payloads grow down from
/// the end of the page. Slots are never moved, resized or freed.
#[derive(Clone)]
pub struct SlottedPage {
    data: Box<[u8; PAGE_SIZE]>,
    num_slots: u32,
    end_free_space: u32,
}

impl SlottedPage {
    pub fn new() -> Self {
        let mut page = Self {
            data: Box::new([0u8; PAGE_SIZE]),
            num_slots: 0,
            end_free_space: PAGE_SIZE as u32,
        };
        page.write_header();
        page
    }

    /// Parse a page from its on-disk bytes.
    ///
    /// An all-zero header is a page that was allocated but never written and
    /// is treated as empty. Anything else must describe a directory and slots
    /// that lie inside the page.
    pub fn from_bytes(bytes: &[u8]) -> StorageResult<Self> {
        if bytes.len() != PAGE_SIZE {
            return Err(StorageError::InvalidPageSize {
                expected: PAGE_SIZE,
                actual: bytes.len(),
            });
        }

        let mut data = Box::new([0u8; PAGE_SIZE]);
        data.copy_from_slice(bytes);

        let num_slots = LittleEndian::read_u32(&data[NUM_SLOTS_OFFSET..]);
        let end_free_space = LittleEndian::read_u32(&data[END_FREE_SPACE_OFFSET..]);
        if num_slots == 0 && end_free_space == 0 {
            return Ok(Self::new());
        }

        let directory_end = HEADER_SIZE as u64 + num_slots as u64 * SLOT_SIZE as u64;
        if end_free_space as usize > PAGE_SIZE || directory_end > end_free_space as u64 {
            return Err(StorageError::CorruptedPage(format!(
                "{} slots with free space ending at {}",
                num_slots, end_free_space
            )));
        }

        let page = Self {
            data,
            num_slots,
            end_free_space,
        };

        for slot_id in 0..num_slots {
            let slot = page.slot_at(slot_id);
            let end = slot.offset as u64 + slot.size as u64;
            if slot.offset < end_free_space || end > PAGE_SIZE as u64 {
                return Err(StorageError::CorruptedPage(format!(
                    "slot {} at {}..{} lies outside the data region",
                    slot_id, slot.offset, end
                )));
            }
        }

        Ok(page)
    }

    /// Largest payload an empty page can hold.
    pub const fn max_payload_size() -> usize {
        PAGE_SIZE - HEADER_SIZE - SLOT_SIZE
    }

    /// Bytes left between the slot directory and the data region.
    pub fn free_space(&self) -> usize {
        self.end_free_space as usize - HEADER_SIZE - self.num_slots as usize * SLOT_SIZE
    }

    /// Reserve `size` bytes and a directory entry for them.
    ///
    /// Returns `None` and leaves the page untouched when the payload plus its
    /// slot entry does not fit.
    pub fn allocate(&mut self, size: usize) -> Option<u32> {
        if size.checked_add(SLOT_SIZE)? > self.free_space() {
            return None;
        }

        let slot_id = self.num_slots;
        let slot = Slot {
            offset: self.end_free_space - size as u32,
            size: size as u32,
        };

        let slot_offset = Self::slot_offset(slot_id);
        LittleEndian::write_u32(&mut self.data[slot_offset..], slot.offset);
        LittleEndian::write_u32(&mut self.data[slot_offset + 4..], slot.size);

        self.num_slots += 1;
        self.end_free_space = slot.offset;
        self.write_header();

        Some(slot_id)
    }

    pub fn read_slot(&self, slot_id: u32) -> Option<Slot> {
        if slot_id >= self.num_slots {
            return None;
        }
        Some(self.slot_at(slot_id))
    }

    pub fn read_data(&self, slot_id: u32) -> Option<&[u8]> {
        let slot = self.read_slot(slot_id)?;
        let start = slot.offset as usize;
        Some(&self.data[start..start + slot.size as usize])
    }

    /// Overwrite the start of a slot's payload in place.
    ///
    /// Returns `false` without writing if the slot does not exist or `bytes`
    /// is longer than the slot.
    #[must_use]
    pub fn write_data(&mut self, slot_id: u32, bytes: &[u8]) -> bool {
        let Some(slot) = self.read_slot(slot_id) else {
            return false;
        };
        if bytes.len() > slot.size as usize {
            return false;
        }

        let start = slot.offset as usize;
        self.data[start..start + bytes.len()].copy_from_slice(bytes);
        true
    }

    pub fn num_slots(&self) -> u32 {
        self.num_slots
    }

    pub fn as_bytes(&self) -> &[u8; PAGE_SIZE] {
        &self.data
    }

    fn slot_at(&self, slot_id: u32) -> Slot {
        let slot_offset = Self::slot_offset(slot_id);
        Slot {
            offset: LittleEndian::read_u32(&self.data[slot_offset..]),
            size: LittleEndian::read_u32(&self.data[slot_offset + 4..]),
        }
    }

    fn slot_offset(slot_id: u32) -> usize {
        HEADER_SIZE + slot_id as usize * SLOT_SIZE
    }

    fn write_header(&mut self) {
        LittleEndian::write_u32(&mut self.data[NUM_SLOTS_OFFSET..], self.num_slots);
        LittleEndian::write_u32(&mut self.data[END_FREE_SPACE_OFFSET..], self.end_free_space);
    }
}

impl Default for SlottedPage {
    fn default() -> Self {
        Self::new()
    }
}
