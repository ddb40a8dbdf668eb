//! Button input and cooperative cancellation

/// Button press events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonEvent {
    /// Up button (increase / previous)
    Up,
    /// Down button (decrease / next)
    Down,
    /// Enter button (confirm)
    Enter,
}

/// Non-blocking abort poll
///
/// Checked before every raw servo write. Any pending event counts as an
/// abort request.
pub trait AbortSource {
    /// Check whether an abort event is waiting
    fn has_pending_abort(&mut self) -> bool;

    /// Discard the pending abort event
    fn consume_abort(&mut self);
}

/// Blocking button source
pub trait ButtonInput: AbortSource {
    /// Block until the next button press
    ///
    /// Returns `None` when the source is closed and no more events
    /// will arrive.
    fn wait_for_button(&mut self) -> Option<ButtonEvent>;
}

/// An abort source that never fires
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverAbort;

impl AbortSource for NeverAbort {
    fn has_pending_abort(&mut self) -> bool {
        false
    }

    fn consume_abort(&mut self) {}
}

impl<T: AbortSource + ?Sized> AbortSource for &mut T {
    fn has_pending_abort(&mut self) -> bool {
        (**self).has_pending_abort()
    }

    fn consume_abort(&mut self) {
        (**self).consume_abort()
    }
}

impl<T: ButtonInput + ?Sized> ButtonInput for &mut T {
    fn wait_for_button(&mut self) -> Option<ButtonEvent> {
        (**self).wait_for_button()
    }
}
