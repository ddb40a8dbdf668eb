//! Servo sinks
//!
//! Real servos are driven through the Linux PWM sysfs interface, one
//! `pwmN` channel per calibration channel. Without a PWM chip configured
//! every move is only logged.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use cubot_core::config::PwmSettings;
use cubot_core::traits::ServoOutput;
use cubot_drivers::servo::PwmServoBank;
use embedded_hal::pwm::{self, ErrorType, SetDutyCycle};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::ServoConfig;

/// Channels on the servo board
pub const CHANNELS: usize = 16;

/// Failed sysfs write
#[derive(Debug, Error)]
#[error("{}: {kind}", path.display())]
pub struct SysfsPwmError {
    pub path: PathBuf,
    pub kind: io::ErrorKind,
}

impl pwm::Error for SysfsPwmError {
    fn kind(&self) -> pwm::ErrorKind {
        pwm::ErrorKind::Other
    }
}

/// One channel of a Linux PWM chip
///
/// The channel is exported and enabled on its first write.
pub struct SysfsPwmChannel {
    chip: PathBuf,
    index: u8,
    period_ns: u32,
    enabled: bool,
}

impl SysfsPwmChannel {
    pub fn new(chip: &Path, index: u8, period_ns: u32) -> Self {
        Self {
            chip: chip.to_path_buf(),
            index,
            period_ns,
            enabled: false,
        }
    }

    fn channel_dir(&self) -> PathBuf {
        self.chip.join(format!("pwm{}", self.index))
    }

    fn write(path: PathBuf, value: impl fmt::Display) -> Result<(), SysfsPwmError> {
        fs::write(&path, value.to_string()).map_err(|e| SysfsPwmError {
            path,
            kind: e.kind(),
        })
    }

    fn enable(&mut self) -> Result<(), SysfsPwmError> {
        let dir = self.channel_dir();
        if !dir.exists() {
            Self::write(self.chip.join("export"), self.index)?;
        }
        Self::write(dir.join("period"), self.period_ns)?;
        Self::write(dir.join("duty_cycle"), 0)?;
        Self::write(dir.join("enable"), 1)?;
        self.enabled = true;
        Ok(())
    }
}

impl ErrorType for SysfsPwmChannel {
    type Error = SysfsPwmError;
}

impl SetDutyCycle for SysfsPwmChannel {
    fn max_duty_cycle(&self) -> u16 {
        u16::MAX
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        if !self.enabled {
            self.enable()?;
        }
        let duty_ns = u64::from(duty) * u64::from(self.period_ns) / u64::from(u16::MAX);
        Self::write(self.channel_dir().join("duty_cycle"), duty_ns)
    }
}

/// Servo output selected by the configuration
pub enum HostServos {
    Pwm(PwmServoBank<SysfsPwmChannel, CHANNELS>),
    DryRun,
}

impl HostServos {
    pub fn from_config(config: &ServoConfig, pwm: &PwmSettings) -> Self {
        match &config.pwm_chip {
            Some(chip) => {
                let period_ns = 1_000_000_000 / pwm.frequency.max(1);
                debug!(chip = %chip.display(), period_ns, "using sysfs PWM");
                let channels =
                    std::array::from_fn(|i| SysfsPwmChannel::new(chip, i as u8, period_ns));
                HostServos::Pwm(PwmServoBank::new(channels))
            }
            None => {
                warn!("no PWM chip configured, servo moves are only logged");
                HostServos::DryRun
            }
        }
    }
}

impl ServoOutput for HostServos {
    fn drive(&mut self, channel: u8, raw: u16) {
        debug!(channel, raw, "drive");
        if let HostServos::Pwm(bank) = self {
            let faults = bank.fault_count();
            bank.drive(channel, raw);
            if bank.fault_count() > faults {
                warn!(channel, raw, "servo write failed");
            }
        }
    }
}
