//! Servo output trait

/// Raw PWM output for the servo channels
///
/// Implementations forward a calibrated raw value to the PWM hardware.
/// The write must take effect before the caller's settle delay elapses;
/// nothing is acknowledged back.
pub trait ServoOutput {
    /// Drive one channel to a raw calibrated value
    fn drive(&mut self, channel: u8, raw: u16);
}

impl<T: ServoOutput + ?Sized> ServoOutput for &mut T {
    fn drive(&mut self, channel: u8, raw: u16) {
        (**self).drive(channel, raw)
    }
}
