//! Byte buffer with an editing cursor.
//!
//! The cursor is a byte offset in `0..=len`. Every operation clamps instead of
//! failing, so there is no way to observe an out-of-range cursor.

/// Capacity hint for freshly created buffers. Not a limit.
pub const DEFAULT_CAPACITY: usize = 1024;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CursorBuffer {
    buffer: Vec<u8>,
    cursor: usize,
}

impl CursorBuffer {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
            cursor: 0,
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    pub fn before_cursor(&self) -> &[u8] {
        &self.buffer[..self.cursor]
    }

    pub fn after_cursor(&self) -> &[u8] {
        &self.buffer[self.cursor..]
    }

    /// Lossy UTF-8 view of the whole buffer.
    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(&self.buffer).into_owned()
    }

    /// Moves the cursor, clamping to the buffer length.
    pub fn set_cursor(&mut self, pos: usize) {
        self.cursor = pos.min(self.buffer.len());
    }

    /// Inserts a byte at the cursor and advances past it.
    pub fn insert(&mut self, byte: u8) {
        self.buffer.insert(self.cursor, byte);
        self.cursor += 1;
    }

    /// Inserts a slice at the cursor and advances past it.
    pub fn insert_slice(&mut self, bytes: &[u8]) {
        let tail = self.buffer.split_off(self.cursor);
        self.buffer.extend_from_slice(bytes);
        self.buffer.extend_from_slice(&tail);
        self.cursor += bytes.len();
    }

    /// Removes the byte before the cursor. Returns false at the start of the buffer.
    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        self.buffer.remove(self.cursor);
        true
    }

    /// Removes the byte under the cursor. Returns false at the end of the buffer.
    pub fn delete(&mut self) -> bool {
        if self.cursor >= self.buffer.len() {
            return false;
        }
        self.buffer.remove(self.cursor);
        true
    }

    /// Returns true if the cursor moved.
    pub fn move_left(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    /// Returns true if the cursor moved.
    pub fn move_right(&mut self) -> bool {
        if self.cursor >= self.buffer.len() {
            return false;
        }
        self.cursor += 1;
        true
    }

    /// Moves to the start and returns how many positions the cursor travelled.
    pub fn move_home(&mut self) -> usize {
        std::mem::take(&mut self.cursor)
    }

    /// Moves to the end and returns how many positions the cursor travelled.
    pub fn move_end(&mut self) -> usize {
        let travelled = self.buffer.len() - self.cursor;
        self.cursor = self.buffer.len();
        travelled
    }

    /// Replaces the contents and leaves the cursor at the end.
    pub fn replace(&mut self, bytes: &[u8]) {
        self.buffer.clear();
        self.buffer.extend_from_slice(bytes);
        self.cursor = self.buffer.len();
    }

    /// Appends at the end without touching the cursor unless it was already there.
    pub fn append(&mut self, bytes: &[u8]) {
        let at_end = self.cursor == self.buffer.len();
        self.buffer.extend_from_slice(bytes);
        if at_end {
            self.cursor = self.buffer.len();
        }
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
    }

    /// Empties the buffer and returns its previous contents.
    pub fn take(&mut self) -> Vec<u8> {
        self.cursor = 0;
        std::mem::take(&mut self.buffer)
    }

    /// Bytes in `start..end`, with both bounds clamped and ordered.
    pub fn range(&self, start: usize, end: usize) -> &[u8] {
        let (start, end) = self.clamp_range(start, end);
        &self.buffer[start..end]
    }

    /// Removes `start..end` (clamped) and parks the cursor at the start of the hole.
    pub fn remove_range(&mut self, start: usize, end: usize) -> Vec<u8> {
        let (start, end) = self.clamp_range(start, end);
        let removed = self.buffer.drain(start..end).collect();
        self.cursor = start;
        removed
    }

    fn clamp_range(&self, start: usize, end: usize) -> (usize, usize) {
        let len = self.buffer.len();
        let (start, end) = if start <= end { (start, end) } else { (end, start) };
        (start.min(len), end.min(len))
    }
}
