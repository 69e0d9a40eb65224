//! Volume envelope shared by channels 1, 2, and 4.

#[derive(Debug, Clone, Copy, Default, serde::Serialize, serde::Deserialize)]
pub struct Envelope {
    pub initial_volume: u8,
    pub add_mode: bool,
    pub period: u8,
    volume: u8,
    timer: u8,
}

impl Envelope {
    pub fn write_nrx2(&mut self, value: u8) {
        self.initial_volume = value >> 4;
        self.add_mode = value & 0x08 != 0;
        self.period = value & 0x07;
    }

    pub fn read_nrx2(&self) -> u8 {
        (self.initial_volume << 4) | ((self.add_mode as u8) << 3) | self.period
    }

    /// DAC is derived from the upper 5 bits of NRx2: on unless both the
    /// initial volume and add_mode direction indicate "down from zero".
    pub fn dac_enabled(&self) -> bool {
        self.initial_volume != 0 || self.add_mode
    }

    pub fn trigger(&mut self) {
        self.volume = self.initial_volume;
        self.timer = if self.period == 0 { 8 } else { self.period };
    }

    pub fn volume(&self) -> u8 {
        self.volume
    }

    /// Clocked at 64 Hz (frame sequencer step 7).
    pub fn step(&mut self) {
        if self.period == 0 {
            return;
        }
        if self.timer > 0 {
            self.timer -= 1;
        }
        if self.timer == 0 {
            self.timer = self.period;
            if self.add_mode && self.volume < 15 {
                self.volume += 1;
            } else if !self.add_mode && self.volume > 0 {
                self.volume -= 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dac_off_when_volume_zero_and_decreasing() {
        let mut e = Envelope::default();
        e.write_nrx2(0x00);
        assert!(!e.dac_enabled());
        e.write_nrx2(0x08); // add_mode set, volume 0
        assert!(e.dac_enabled());
    }

    #[test]
    fn envelope_steps_volume_with_period() {
        let mut e = Envelope::default();
        e.write_nrx2(0xF1); // volume 15, subtract, period 1
        e.trigger();
        assert_eq!(e.volume(), 15);
        e.step();
        assert_eq!(e.volume(), 14);
    }

    #[test]
    fn period_zero_disables_envelope_stepping() {
        let mut e = Envelope::default();
        e.write_nrx2(0xF0); // period 0
        e.trigger();
        e.step();
        e.step();
        assert_eq!(e.volume(), 15);
    }
}
