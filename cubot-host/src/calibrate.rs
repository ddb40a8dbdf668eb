//! Interactive servo calibration

use cubot_core::config::{CalibrationTable, ServoTuner};
use cubot_core::traits::{ButtonInput, ServoOutput};
use tracing::info;

/// Tune every calibrated position
///
/// Returns the tuned table, or `None` if the button source closed before
/// the last position was accepted.
pub fn tune<S, B>(
    table: CalibrationTable,
    servos: &mut S,
    buttons: &mut B,
) -> Option<CalibrationTable>
where
    S: ServoOutput,
    B: ButtonInput,
{
    let mut tuner = ServoTuner::new(table);
    if let Some(command) = tuner.start() {
        servos.drive(command.channel, command.raw);
    }

    while let Some(slot) = tuner.current() {
        info!(
            slot = slot.label,
            value = tuner.value(),
            "u/d to adjust, Enter to accept"
        );
        let event = buttons.wait_for_button()?;
        for command in tuner.handle(event) {
            servos.drive(command.channel, command.raw);
        }
    }

    Some(tuner.finish())
}
