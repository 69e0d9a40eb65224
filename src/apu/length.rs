//! Length counter shared by all four channels. `MAX` differs per channel:
//! 64 for pulse/noise, 256 for wave (the wave channel's NR31 is 8 bits wide).

#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct LengthCounter<const MAX: u16> {
    pub enabled: bool,
    counter: u16,
}

impl<const MAX: u16> Default for LengthCounter<MAX> {
    fn default() -> Self {
        LengthCounter {
            enabled: false,
            counter: 0,
        }
    }
}

impl<const MAX: u16> LengthCounter<MAX> {
    pub fn load(&mut self, value: u16) {
        self.counter = MAX - (value % MAX);
    }

    pub fn trigger_reload_if_zero(&mut self) {
        if self.counter == 0 {
            self.counter = MAX;
        }
    }

    /// Clocked at 256 Hz; returns true if the channel should turn off.
    pub fn step(&mut self) -> bool {
        if !self.enabled || self.counter == 0 {
            return false;
        }
        self.counter -= 1;
        self.counter == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_computes_remaining_length() {
        let mut l: LengthCounter<64> = LengthCounter::default();
        l.load(60);
        l.enabled = true;
        for _ in 0..3 {
            assert!(!l.step());
        }
        assert!(l.step());
    }

    #[test]
    fn disabled_counter_never_expires() {
        let mut l: LengthCounter<64> = LengthCounter::default();
        l.load(63);
        l.enabled = false;
        for _ in 0..10 {
            assert!(!l.step());
        }
    }
}
