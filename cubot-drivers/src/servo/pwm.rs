//! Servo bank over PWM channels
//!
//! Calibration values are raw 12-bit counts: the number of ticks out of
//! 4096 per PWM period that the pulse stays high. Each count is handed to
//! the channel as a duty fraction, so any `SetDutyCycle` implementation
//! running at the calibrated frequency reproduces the same pulse width.

use cubot_core::traits::ServoOutput;
use embedded_hal::pwm::SetDutyCycle;

/// Ticks per PWM period for a raw servo value
pub const COUNTS_PER_PERIOD: u16 = 4096;

/// Servo outputs indexed by channel number
pub struct PwmServoBank<C, const N: usize> {
    channels: [C; N],
    /// Writes rejected by a channel or aimed at a missing one
    faults: u32,
}

impl<C: SetDutyCycle, const N: usize> PwmServoBank<C, N> {
    /// Create a bank; `channels[i]` drives calibration channel `i`
    pub fn new(channels: [C; N]) -> Self {
        Self {
            channels,
            faults: 0,
        }
    }

    /// Number of writes that could not be applied
    pub fn fault_count(&self) -> u32 {
        self.faults
    }
}

impl<C: SetDutyCycle, const N: usize> ServoOutput for PwmServoBank<C, N> {
    fn drive(&mut self, channel: u8, raw: u16) {
        let Some(pwm) = self.channels.get_mut(channel as usize) else {
            self.faults += 1;
            return;
        };
        let counts = raw.min(COUNTS_PER_PERIOD);
        if pwm.set_duty_cycle_fraction(counts, COUNTS_PER_PERIOD).is_err() {
            self.faults += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;
    use core::convert::Infallible;
    use embedded_hal::pwm::{ErrorKind, ErrorType};

    /// Channel with a 16-bit duty range writing through to a shared cell
    struct MockChannel<'a> {
        duty: &'a Cell<u16>,
    }

    impl ErrorType for MockChannel<'_> {
        type Error = Infallible;
    }

    impl SetDutyCycle for MockChannel<'_> {
        fn max_duty_cycle(&self) -> u16 {
            u16::MAX
        }

        fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
            self.duty.set(duty);
            Ok(())
        }
    }

    /// Channel that rejects every write
    struct BrokenChannel;

    impl ErrorType for BrokenChannel {
        type Error = ErrorKind;
    }

    impl SetDutyCycle for BrokenChannel {
        fn max_duty_cycle(&self) -> u16 {
            4095
        }

        fn set_duty_cycle(&mut self, _duty: u16) -> Result<(), Self::Error> {
            Err(ErrorKind::Other)
        }
    }

    fn bank(duties: &[Cell<u16>; 4]) -> PwmServoBank<MockChannel<'_>, 4> {
        PwmServoBank::new(duties.each_ref().map(|duty| MockChannel { duty }))
    }

    #[test]
    fn test_raw_counts_scale_to_duty_range() {
        let duties: [Cell<u16>; 4] = Default::default();
        let mut servos = bank(&duties);

        servos.drive(2, 2048);
        assert_eq!(duties[2].get(), 32767);

        servos.drive(0, 0);
        assert_eq!(duties[0].get(), 0);

        servos.drive(1, 4096);
        assert_eq!(duties[1].get(), u16::MAX);
        assert_eq!(servos.fault_count(), 0);
    }

    #[test]
    fn test_values_above_period_are_clamped() {
        let duties: [Cell<u16>; 4] = Default::default();
        let mut servos = bank(&duties);
        servos.drive(3, 9000);
        assert_eq!(duties[3].get(), u16::MAX);
    }

    #[test]
    fn test_only_addressed_channel_changes() {
        let duties: [Cell<u16>; 4] = Default::default();
        let mut servos = bank(&duties);
        servos.drive(1, 1024);

        assert_eq!(duties.each_ref().map(Cell::get), [0, 16383, 0, 0]);
    }

    #[test]
    fn test_missing_channel_counts_fault() {
        let duties: [Cell<u16>; 4] = Default::default();
        let mut servos = bank(&duties);
        servos.drive(7, 300);
        assert_eq!(servos.fault_count(), 1);
    }

    #[test]
    fn test_rejected_write_counts_fault() {
        let mut servos = PwmServoBank::new([BrokenChannel, BrokenChannel]);
        servos.drive(0, 300);
        servos.drive(1, 400);
        assert_eq!(servos.fault_count(), 2);
    }
}
