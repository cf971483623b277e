// Segment patterns for 7 segment displays wired to the max7219 in no-decode mode.
// Bit layout is DP A B C D E F G from msb to lsb, so the decimal point is 0x80.

/// Index used for any value that falls outside the table
pub const BLANK: u8 = b' ';

/// Decimal point segment
pub const DECIMAL_POINT: u8 = 0b1000_0000;

/// One pattern per 7 bit ascii code. Hex digits live at 0-15 as well as at their ascii positions.
pub const CHAR_TABLE: [u8; 128] = [
    0b0111_1110, 0b0011_0000, 0b0110_1101, 0b0111_1001, 0b0011_0011, 0b0101_1011, 0b0101_1111, 0b0111_0000,
    0b0111_1111, 0b0111_1011, 0b0111_0111, 0b0001_1111, 0b0000_1101, 0b0011_1101, 0b0100_1111, 0b0100_0111,
    0b0000_0000, 0b0000_0000, 0b0000_0000, 0b0000_0000, 0b0000_0000, 0b0000_0000, 0b0000_0000, 0b0000_0000,
    0b0000_0000, 0b0000_0000, 0b0000_0000, 0b0000_0000, 0b0000_0000, 0b0000_0000, 0b0000_0000, 0b0000_0000,
    0b0000_0000, 0b0000_0000, 0b0000_0000, 0b0000_0000, 0b0000_0000, 0b0000_0000, 0b0000_0000, 0b0000_0000,
    0b0000_0000, 0b0000_0000, 0b0000_0000, 0b0000_0000, 0b1000_0000, 0b0000_0001, 0b1000_0000, 0b0000_0000,
    0b0111_1110, 0b0011_0000, 0b0110_1101, 0b0111_1001, 0b0011_0011, 0b0101_1011, 0b0101_1111, 0b0111_0000,
    0b0111_1111, 0b0111_1011, 0b0000_0000, 0b0000_0000, 0b0000_0000, 0b0000_0000, 0b0000_0000, 0b0000_0000,
    0b0000_0000, 0b0111_0111, 0b0001_1111, 0b0000_1101, 0b0011_1101, 0b0100_1111, 0b0100_0111, 0b0000_0000,
    0b0011_0111, 0b0000_0000, 0b0000_0000, 0b0000_0000, 0b0000_1110, 0b0000_0000, 0b0000_0000, 0b0000_0000,
    0b0110_0111, 0b0000_0000, 0b0000_0000, 0b0000_0000, 0b0000_0000, 0b0000_0000, 0b0000_0000, 0b0000_0000,
    0b0000_0000, 0b0000_0000, 0b0000_0000, 0b0000_0000, 0b0000_0000, 0b0000_0000, 0b0000_0000, 0b0000_1000,
    0b0000_0000, 0b0111_0111, 0b0001_1111, 0b0000_1101, 0b0011_1101, 0b0100_1111, 0b0100_0111, 0b0000_0000,
    0b0011_0111, 0b0000_0000, 0b0000_0000, 0b0000_0000, 0b0000_1110, 0b0000_0000, 0b0000_0000, 0b0000_0000,
    0b0110_0111, 0b0000_0000, 0b0000_0000, 0b0000_0000, 0b0000_0000, 0b0000_0000, 0b0000_0000, 0b0000_0000,
    0b0000_0000, 0b0000_0000, 0b0000_0000, 0b0000_0000, 0b0000_0000, 0b0000_0000, 0b0000_0000, 0b0000_0000,
];

/// Looks up the segment pattern for `value`, falling back to a blank digit above 127
pub fn lookup(value: u8) -> u8 {
    let index = if value > 127 { BLANK } else { value };
    CHAR_TABLE[index as usize]
}
