use embedded_hal::digital::v2::OutputPin;

/// The three wire serial bus shared by every chip in the chain.
///
/// Chips shift in whatever is clocked while chip select is low and latch the last
/// 16 bits they hold when it goes high again.
pub trait ShiftBus {
    type Error;

    /// Pull chip select low to start a frame
    fn select(&mut self) -> Result<(), Self::Error>;

    /// Pull chip select high, latching every chip at once
    fn latch(&mut self) -> Result<(), Self::Error>;

    /// Clock one byte onto the data line, most significant bit first
    fn shift_out(&mut self, value: u8) -> Result<(), Self::Error>;
}

/// Bit-banged bus over plain output pins.
///
/// The pins must already be configured as push-pull outputs. Bit timing is whatever the
/// pin writes give us, which the max7219 tolerates up to 10MHz.
pub struct PinBus<DATA, CS, CLK> {
    data: DATA,
    cs: CS,
    clk: CLK,
}

impl<DATA, CS, CLK, PinError> PinBus<DATA, CS, CLK>
where
    DATA: OutputPin<Error = PinError>,
    CS: OutputPin<Error = PinError>,
    CLK: OutputPin<Error = PinError>,
{
    pub fn new(data: DATA, cs: CS, clk: CLK) -> Self {
        PinBus { data, cs, clk }
    }

    /// Gives the pins back as (data, cs, clk)
    pub fn release(self) -> (DATA, CS, CLK) {
        (self.data, self.cs, self.clk)
    }
}

impl<DATA, CS, CLK, PinError> ShiftBus for PinBus<DATA, CS, CLK>
where
    DATA: OutputPin<Error = PinError>,
    CS: OutputPin<Error = PinError>,
    CLK: OutputPin<Error = PinError>,
{
    type Error = PinError;

    fn select(&mut self) -> Result<(), PinError> {
        self.cs.set_low()
    }

    fn latch(&mut self) -> Result<(), PinError> {
        self.cs.set_high()
    }

    fn shift_out(&mut self, value: u8) -> Result<(), PinError> {
        for i in 0..8 {
            if value & (1 << (7 - i)) > 0 {
                self.data.set_high()?;
            } else {
                self.data.set_low()?;
            }

            self.clk.set_high()?;
            self.clk.set_low()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::RefCell;
    use core::convert::Infallible;

    #[derive(Clone, Copy, Debug, PartialEq)]
    enum Event {
        Data(bool),
        Clk(bool),
        Cs(bool),
    }

    struct Log {
        events: RefCell<[Option<Event>; 64]>,
        len: RefCell<usize>,
    }

    impl Log {
        fn new() -> Self {
            Log {
                events: RefCell::new([None; 64]),
                len: RefCell::new(0),
            }
        }

        fn push(&self, event: Event) {
            let mut len = self.len.borrow_mut();
            self.events.borrow_mut()[*len] = Some(event);
            *len += 1;
        }

        fn data_on_rising_clock(&self) -> u8 {
            let events = self.events.borrow();
            let mut data = false;
            let mut byte = 0u8;
            for event in events.iter().flatten() {
                match event {
                    Event::Data(level) => data = *level,
                    Event::Clk(true) => byte = (byte << 1) | data as u8,
                    _ => {}
                }
            }
            byte
        }
    }

    struct Pin<'a> {
        log: &'a Log,
        wrap: fn(bool) -> Event,
    }

    impl OutputPin for Pin<'_> {
        type Error = Infallible;

        fn set_low(&mut self) -> Result<(), Infallible> {
            self.log.push((self.wrap)(false));
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            self.log.push((self.wrap)(true));
            Ok(())
        }
    }

    fn bus(log: &Log) -> PinBus<Pin<'_>, Pin<'_>, Pin<'_>> {
        PinBus::new(
            Pin { log, wrap: Event::Data },
            Pin { log, wrap: Event::Cs },
            Pin { log, wrap: Event::Clk },
        )
    }

    #[test]
    fn shift_out_is_msb_first() {
        let log = Log::new();
        bus(&log).shift_out(0b1010_0011).unwrap();

        assert_eq!(*log.len.borrow(), 24);
        assert_eq!(log.events.borrow()[0], Some(Event::Data(true)));
        assert_eq!(log.events.borrow()[3], Some(Event::Data(false)));
        assert_eq!(log.data_on_rising_clock(), 0b1010_0011);
    }

    #[test]
    fn select_and_latch_drive_cs() {
        let log = Log::new();
        let mut bus = bus(&log);
        bus.select().unwrap();
        bus.latch().unwrap();

        assert_eq!(log.events.borrow()[0], Some(Event::Cs(false)));
        assert_eq!(log.events.borrow()[1], Some(Event::Cs(true)));
    }
}
