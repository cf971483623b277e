#![cfg_attr(not(test), no_std)]

// This is a driver for one or more daisy-chained MAX7219/MAX7221 chips driven over a bit-banged
// data/clock/chip-select bus. Each chip can drive an 8x8 LED dot matrix or up to eight 7 segment digits.
// The driver keeps a copy of every row register so single LEDs and columns can be changed
// without reading the chip back (it can't be read).
// see http://www.gammon.com.au/forum/?id=11516 a description of this chip and uses
// see also https://github.com/wayoda/LedControl

extern crate embedded_hal;

macro_rules! trace {
    ($($arg:tt)*) => {
        #[cfg(feature = "defmt")]
        defmt::trace!($($arg)*);
    };
}

macro_rules! debug {
    ($($arg:tt)*) => {
        #[cfg(feature = "defmt")]
        defmt::debug!($($arg)*);
    };
}

pub mod bus;
mod font;
pub mod frame;
mod queue;
pub mod segments;
mod setup;

pub use bus::{PinBus, ShiftBus};
pub use font::{glyph, MATRIX_FONT};
pub use frame::Frame;
pub use queue::{RowWrite, QUEUE_DEPTH};
pub use setup::Setup;

use queue::RowQueue;

/// Rows per chip, and digits per chip in 7 segment mode
pub const ROWS: usize = 8;

pub const MAX_INTENSITY: u8 = 15;

pub const MAX_SCAN_LIMIT: u8 = 7;

/// Register addresses on the chip
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    Noop = 0x00,
    Digit0 = 0x01,
    Digit1 = 0x02,
    Digit2 = 0x03,
    Digit3 = 0x04,
    Digit4 = 0x05,
    Digit5 = 0x06,
    Digit6 = 0x07,
    Digit7 = 0x08,
    DecodeMode = 0x09,
    Intensity = 0x0A,
    ScanLimit = 0x0B,
    /// 0 shuts the chip down, 1 is normal operation
    Shutdown = 0x0C,
    DisplayTest = 0x0F,
}

impl Command {
    /// Digit/row register for a zero based row
    pub fn row(index: u8) -> Option<Command> {
        let command = match index {
            0 => Command::Digit0,
            1 => Command::Digit1,
            2 => Command::Digit2,
            3 => Command::Digit3,
            4 => Command::Digit4,
            5 => Command::Digit5,
            6 => Command::Digit6,
            7 => Command::Digit7,
            _ => return None,
        };
        Some(command)
    }

    /// Zero based row for the digit registers
    pub fn row_index(self) -> Option<u8> {
        match self {
            Command::Digit0
            | Command::Digit1
            | Command::Digit2
            | Command::Digit3
            | Command::Digit4
            | Command::Digit5
            | Command::Digit6
            | Command::Digit7 => Some(self as u8 - 1),
            _ => None,
        }
    }
}

impl From<Command> for u8 {
    fn from(command: Command) -> u8 {
        command as u8
    }
}

/// What the chain is wired to
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    #[default]
    SevenSegment,
    Matrix,
}

/// Argument to [`LedControl::char`], one variant per mode
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Glyph {
    /// Character drawn over all eight rows of a matrix
    Matrix(char),
    /// Segment pattern for `value` on a single digit
    SevenSegment {
        digit: u8,
        value: u8,
        decimal_point: bool,
    },
}

impl Glyph {
    /// Picks the variant matching `mode`. `digit` and `decimal_point` are ignored for a matrix,
    /// chars outside 0-255 become a blank digit.
    pub fn for_mode(mode: Mode, digit: u8, value: char, decimal_point: bool) -> Glyph {
        match mode {
            Mode::Matrix => Glyph::Matrix(value),
            Mode::SevenSegment => Glyph::SevenSegment {
                digit,
                value: u8::try_from(value as u32).unwrap_or(u8::MAX),
                decimal_point,
            },
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<BusError> {
    /// Pin or bus failure, the chip state is unknown after this
    Bus(BusError),
    /// Device index not in the chain
    InvalidDeviceAddress(usize),
    /// Row, column or digit outside 0-7
    InvalidIndex(u8),
    /// Brightness above 15 or scan limit above 7
    InvalidValue(u8),
    /// No glyph for this character in the matrix font
    UnsupportedGlyph(char),
    /// Glyph variant does not match the chain mode
    ModeMismatch,
    /// Not enough room for eight more deferred row writes
    QueueFull,
    /// Chain declared with zero devices
    EmptyChain,
}

impl<E> From<E> for Error<E> {
    fn from(error: E) -> Self {
        Error::Bus(error)
    }
}

pub struct LedControl<BUS, const DEVICES: usize = 1> {
    bus: BUS,
    mode: Mode,
    status: [[u8; ROWS]; DEVICES],
    pending: RowQueue,
}

impl<BUS, E, const DEVICES: usize> LedControl<BUS, DEVICES>
where
    BUS: ShiftBus<Error = E>,
{
    /// Sets up every chip with the default register values and leaves them cleared and powered off
    pub fn new(bus: BUS, mode: Mode) -> Result<Self, Error<E>> {
        Self::with_setup(bus, mode, Setup::default())
    }

    pub fn with_setup(bus: BUS, mode: Mode, setup: Setup) -> Result<Self, Error<E>> {
        if DEVICES == 0 {
            return Err(Error::EmptyChain);
        }
        setup.validate::<E>()?;

        let mut control = LedControl {
            bus,
            mode,
            status: [[0; ROWS]; DEVICES],
            pending: RowQueue::new(),
        };

        debug!("ledcontrol: init {} devices, {}", DEVICES, mode);
        for device in 0..DEVICES {
            control.send(device, Command::DecodeMode, setup.decode_mode)?;
            control.send(device, Command::Intensity, setup.brightness)?;
            control.send(device, Command::ScanLimit, setup.scan_limit)?;
            control.send(device, Command::Shutdown, setup.shutdown)?;
            control.send(device, Command::DisplayTest, setup.display_test)?;

            control.clear(device)?;
            control.off(device)?;
        }

        Ok(control)
    }

    pub fn destroy(self) -> BUS {
        self.bus
    }

    pub const fn devices(&self) -> usize {
        DEVICES
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_matrix(&self) -> bool {
        self.mode == Mode::Matrix
    }

    /// Row bytes last written to the chip at `addr`
    pub fn status(&self, addr: usize) -> Option<&[u8; ROWS]> {
        self.status.get(addr)
    }

    /// Buffer byte at the flat index `device * 8 + row`
    pub fn status_byte(&self, index: usize) -> Option<u8> {
        self.status.get(index / ROWS).map(|rows| rows[index % ROWS])
    }

    pub fn on(&mut self, addr: usize) -> Result<(), Error<E>> {
        self.shutdown(addr, false)
    }

    pub fn off(&mut self, addr: usize) -> Result<(), Error<E>> {
        self.shutdown(addr, true)
    }

    /// `true` shuts the chip down. The register itself is inverted: 1 runs, 0 shuts down.
    pub fn shutdown(&mut self, addr: usize, status: bool) -> Result<(), Error<E>> {
        self.check_addr(addr)?;
        self.send(addr, Command::Shutdown, (!status) as u8)
    }

    /// Number of digits/rows scanned, minus one
    pub fn scan_limit(&mut self, addr: usize, limit: u8) -> Result<(), Error<E>> {
        self.check_addr(addr)?;
        if limit > MAX_SCAN_LIMIT {
            return Err(Error::InvalidValue(limit));
        }
        self.send(addr, Command::ScanLimit, limit)
    }

    pub fn brightness(&mut self, addr: usize, level: u8) -> Result<(), Error<E>> {
        self.check_addr(addr)?;
        if level > MAX_INTENSITY {
            return Err(Error::InvalidValue(level));
        }
        self.send(addr, Command::Intensity, level)
    }

    pub fn display_test(&mut self, addr: usize, on: bool) -> Result<(), Error<E>> {
        self.check_addr(addr)?;
        self.send(addr, Command::DisplayTest, on as u8)
    }

    /// One bit per digit selects BCD decoding for it. This driver renders segments itself,
    /// so anything but 0x00 is only useful for raw `row` writes.
    pub fn decode_mode(&mut self, addr: usize, mode: u8) -> Result<(), Error<E>> {
        self.check_addr(addr)?;
        self.send(addr, Command::DecodeMode, mode)
    }

    /// Blanks all eight rows, writing each one regardless of what the buffer holds
    pub fn clear(&mut self, addr: usize) -> Result<(), Error<E>> {
        self.check_addr(addr)?;
        for row in 0..ROWS as u8 {
            self.write_row(addr, row, 0)?;
        }
        Ok(())
    }

    pub fn led(&mut self, addr: usize, row: u8, col: u8, state: bool) -> Result<(), Error<E>> {
        self.check_addr(addr)?;
        Self::check_index(row)?;
        Self::check_index(col)?;

        let mask: u8 = 0x80 >> col;
        let current = self.status[addr][row as usize];
        let value = if state {
            current | mask
        } else {
            current & !mask
        };
        self.write_row(addr, row, value)
    }

    pub fn row(&mut self, addr: usize, row: u8, value: u8) -> Result<(), Error<E>> {
        self.check_addr(addr)?;
        Self::check_index(row)?;
        self.write_row(addr, row, value)
    }

    /// Sets column `col` from `value`, msb at row 0. Each row goes out as its own write.
    pub fn column(&mut self, addr: usize, col: u8, value: u8) -> Result<(), Error<E>> {
        self.check_addr(addr)?;
        Self::check_index(col)?;
        for row in 0..ROWS as u8 {
            let bit = (value >> (7 - row)) & 0x01;
            self.led(addr, row, col, bit == 1)?;
        }
        Ok(())
    }

    /// Shows `value` on a 7 segment digit. Values above 127 show a blank digit.
    pub fn digit(
        &mut self,
        addr: usize,
        digit: u8,
        value: u8,
        decimal_point: bool,
    ) -> Result<(), Error<E>> {
        self.check_addr(addr)?;
        Self::check_index(digit)?;

        let mut pattern = segments::lookup(value);
        if decimal_point {
            pattern |= segments::DECIMAL_POINT;
        }
        self.write_row(addr, digit, pattern)
    }

    /// Draws a character. A matrix glyph is written row by row before this returns.
    pub fn char(&mut self, addr: usize, glyph: Glyph) -> Result<(), Error<E>> {
        match (self.mode, glyph) {
            (Mode::Matrix, Glyph::Matrix(c)) => {
                self.check_addr(addr)?;
                let rows = Self::matrix_glyph(c)?;
                for (row, value) in rows.iter().enumerate() {
                    self.write_row(addr, row as u8, *value)?;
                }
                Ok(())
            }
            (
                Mode::SevenSegment,
                Glyph::SevenSegment {
                    digit,
                    value,
                    decimal_point,
                },
            ) => self.digit(addr, digit, value, decimal_point),
            _ => Err(Error::ModeMismatch),
        }
    }

    /// Queues the eight rows of a matrix glyph instead of writing them now. They go out one
    /// per call to `poll_pending`, so other writes made in between land on the wire first.
    pub fn queue_char(&mut self, addr: usize, c: char) -> Result<(), Error<E>> {
        if self.mode != Mode::Matrix {
            return Err(Error::ModeMismatch);
        }
        self.check_addr(addr)?;
        let rows = Self::matrix_glyph(c)?;
        if !self.pending.push_rows(addr, rows) {
            return Err(Error::QueueFull);
        }
        Ok(())
    }

    /// Runs the oldest queued row write. Returns false when nothing was queued.
    pub fn poll_pending(&mut self) -> Result<bool, Error<E>> {
        let write = match self.pending.pop() {
            Some(write) => write,
            None => return Ok(false),
        };
        trace!("ledcontrol: deferred {}", write);
        if let Err(e) = self.write_row(write.addr, write.row, write.value) {
            self.pending.retry(write);
            return Err(e);
        }
        Ok(true)
    }

    pub fn flush_pending(&mut self) -> Result<(), Error<E>> {
        while self.poll_pending()? {}
        Ok(())
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Writes the same register on every chip in one frame
    pub fn write_command_all(&mut self, command: Command, data: u8) -> Result<(), Error<E>> {
        trace!("ledcontrol: all {} <- {=u8:#x}", command, data);
        Frame::<DEVICES>::broadcast(command.into(), data).transmit(&mut self.bus)?;
        if let Some(row) = command.row_index() {
            for rows in self.status.iter_mut() {
                rows[row as usize] = data;
            }
        }
        Ok(())
    }

    fn check_addr(&self, addr: usize) -> Result<(), Error<E>> {
        if addr >= DEVICES {
            return Err(Error::InvalidDeviceAddress(addr));
        }
        Ok(())
    }

    fn matrix_glyph(c: char) -> Result<&'static [u8; ROWS], Error<E>> {
        font::glyph(c).ok_or(Error::UnsupportedGlyph(c))
    }

    fn check_index(index: u8) -> Result<(), Error<E>> {
        if index as usize >= ROWS {
            return Err(Error::InvalidIndex(index));
        }
        Ok(())
    }

    // The buffer only changes once the frame is out
    fn write_row(&mut self, addr: usize, row: u8, value: u8) -> Result<(), Error<E>> {
        self.send(addr, row + 1, value)?;
        self.status[addr][row as usize] = value;
        Ok(())
    }

    fn send(&mut self, addr: usize, opcode: impl Into<u8>, data: u8) -> Result<(), Error<E>> {
        let opcode = opcode.into();
        trace!("ledcontrol: device {} op {=u8:#x} <- {=u8:#x}", addr, opcode, data);
        Frame::<DEVICES>::new(addr, opcode, data).transmit(&mut self.bus)?;
        Ok(())
    }
}
