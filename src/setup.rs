use crate::{Error, MAX_INTENSITY, MAX_SCAN_LIMIT};

/// Register values written to every chip when the controller is created
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Setup {
    /// 0x00 means no BCD decoding, segments are driven raw
    pub decode_mode: u8,
    /// Intensity 0-15
    pub brightness: u8,
    /// Highest scanned digit/row, 0-7
    pub scan_limit: u8,
    /// Shutdown register value, 1 is normal operation
    pub shutdown: u8,
    pub display_test: u8,
}

impl Default for Setup {
    fn default() -> Self {
        Setup {
            decode_mode: 0x00,
            brightness: 0x03,
            scan_limit: 0x07,
            shutdown: 0x01,
            display_test: 0x00,
        }
    }
}

impl Setup {
    pub fn validate<E>(&self) -> Result<(), Error<E>> {
        if self.brightness > MAX_INTENSITY {
            return Err(Error::InvalidValue(self.brightness));
        }
        if self.scan_limit > MAX_SCAN_LIMIT {
            return Err(Error::InvalidValue(self.scan_limit));
        }
        Ok(())
    }
}
