use heapless::Deque;

/// Maximum number of row writes that can wait for `poll_pending`, eight characters worth
pub const QUEUE_DEPTH: usize = 64;

/// A row write waiting for its turn
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RowWrite {
    pub addr: usize,
    pub row: u8,
    pub value: u8,
}

/// FIFO of deferred row writes, drained one entry per poll
pub(crate) struct RowQueue {
    writes: Deque<RowWrite, QUEUE_DEPTH>,
}

impl RowQueue {
    pub const fn new() -> Self {
        RowQueue {
            writes: Deque::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn free(&self) -> usize {
        QUEUE_DEPTH - self.writes.len()
    }

    /// Queues all eight rows of a glyph, or nothing if they don't fit
    pub fn push_rows(&mut self, addr: usize, rows: &[u8; 8]) -> bool {
        if self.free() < rows.len() {
            return false;
        }
        for (row, value) in rows.iter().enumerate() {
            // capacity checked above
            let _ = self.writes.push_back(RowWrite {
                addr,
                row: row as u8,
                value: *value,
            });
        }
        true
    }

    pub fn pop(&mut self) -> Option<RowWrite> {
        self.writes.pop_front()
    }

    /// Puts a write back at the head after it failed to go out
    pub fn retry(&mut self, write: RowWrite) {
        let _ = self.writes.push_front(write);
    }
}
