use crate::bus::ShiftBus;

/// One chip select pulse worth of data for a chain of `DEVICES` chips.
///
/// Offset `device * 2` holds the data byte and `device * 2 + 1` the opcode for that
/// chip. Untargeted chips get a no-op pair of zeros.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Frame<const DEVICES: usize> {
    pairs: [[u8; 2]; DEVICES],
}

impl<const DEVICES: usize> Frame<DEVICES> {
    /// Frame addressing a single chip. `device` is expected to be in range; the
    /// controller checks it before building a frame.
    pub fn new(device: usize, opcode: u8, data: u8) -> Self {
        debug_assert!(device < DEVICES);
        let mut pairs = [[0u8; 2]; DEVICES];
        if let Some(pair) = pairs.get_mut(device) {
            *pair = [data, opcode];
        }
        Frame { pairs }
    }

    /// Frame writing the same register on every chip
    pub fn broadcast(opcode: u8, data: u8) -> Self {
        Frame {
            pairs: [[data, opcode]; DEVICES],
        }
    }

    pub fn len(&self) -> usize {
        DEVICES * 2
    }

    pub fn is_empty(&self) -> bool {
        DEVICES == 0
    }

    pub fn byte(&self, offset: usize) -> Option<u8> {
        self.pairs.get(offset / 2).map(|pair| pair[offset % 2])
    }

    /// Bytes in ascending offset order
    pub fn bytes(&self) -> impl DoubleEndedIterator<Item = u8> + '_ {
        self.pairs.iter().flat_map(|pair| pair.iter().copied())
    }

    /// Bytes in the order they go out on the wire. Data ripples through every
    /// downstream chip, so the last chip in the chain is shifted first.
    pub fn wire_order(&self) -> impl Iterator<Item = u8> + '_ {
        self.bytes().rev()
    }

    pub fn transmit<B: ShiftBus>(&self, bus: &mut B) -> Result<(), B::Error> {
        bus.select()?;
        for byte in self.wire_order() {
            bus.shift_out(byte)?;
        }
        bus.latch()
    }
}
