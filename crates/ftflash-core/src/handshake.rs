//! Bootloader handshake
//!
//! Soft-resets the controller and catches it in its bootloader. Cold entry
//! is unreliable on this family, so the whole reset/enter/identify sequence
//! is retried up to [`HandshakeConfig::max_attempts`] times. An identity
//! that never matches the profile means the device is absent or is not the
//! chip we think it is.
//!
//! ```text
//! Idle ──► Resetting ──► AwaitingUpgradeAck ──► IdentityCheck ──► Ready
//!  ▲                             │                    │
//!  └────────── Failed ◄──────────┴────────────────────┘
//! ```

use alloc::vec::Vec;

use crate::bus::I2cMaster;
use crate::chip::{ChipProfile, Quirks};
use crate::error::{Error, Result, Warning};
use crate::protocol::{registers, write_register};
use crate::update::UpdateProgress;

/// Attempts made by the reference tool before giving up
pub const DEFAULT_MAX_ATTEMPTS: u32 = 30;

/// Settle time after the HID to I2C switch
const MODE_SWITCH_DELAY_MS: u32 = 10;

/// Handshake tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandshakeConfig {
    /// Maximum number of reset cycles (at least 1)
    pub max_attempts: u32,
}

impl Default for HandshakeConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl HandshakeConfig {
    /// Set the maximum number of reset cycles
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }
}

/// Handshake state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeState {
    /// Ready to start a new attempt
    Idle,
    /// Soft reset sequence in progress
    Resetting,
    /// Waiting to send the upgrade-entry sequence
    AwaitingUpgradeAck,
    /// Upgrade entry sent, bootloader identity not yet checked
    IdentityCheck,
    /// Bootloader identified; flash commands may be sent
    Ready,
    /// The current attempt failed
    Failed,
}

/// Result of a successful handshake
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandshakeOutcome {
    /// Attempts used, including the successful one
    pub attempts: u32,
    /// Tolerated problems seen along the way
    pub warnings: Vec<Warning>,
}

/// Handshake state machine for one controller
pub struct Handshake {
    chip: &'static ChipProfile,
    addr: u8,
    config: HandshakeConfig,
    state: HandshakeState,
    attempts: u32,
    warnings: Vec<Warning>,
}

impl Handshake {
    /// Create a handshake in the `Idle` state
    pub fn new(chip: &'static ChipProfile, addr: u8, config: HandshakeConfig) -> Self {
        Self {
            chip,
            addr,
            config,
            state: HandshakeState::Idle,
            attempts: 0,
            warnings: Vec::new(),
        }
    }

    /// Current state
    pub fn state(&self) -> HandshakeState {
        self.state
    }

    /// Attempts started so far
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Perform the action of the current state and move to the next one
    ///
    /// Only running out of attempts is an error; a failed attempt moves to
    /// [`HandshakeState::Failed`] and the next step starts over.
    pub fn step<M: I2cMaster + ?Sized>(&mut self, master: &mut M) -> Result<HandshakeState> {
        self.state = match self.state {
            HandshakeState::Idle | HandshakeState::Failed => {
                if self.attempts >= self.config.max_attempts {
                    return Err(Error::HandshakeExhausted {
                        attempts: self.attempts,
                    });
                }
                self.attempts += 1;
                HandshakeState::Resetting
            }
            HandshakeState::Resetting => {
                self.reset(master);
                HandshakeState::AwaitingUpgradeAck
            }
            HandshakeState::AwaitingUpgradeAck => {
                if self.chip.has_quirk(Quirks::HID_TO_I2C) {
                    self.hid_to_i2c(master);
                }
                log::info!("Enter upgrade mode");
                match master.transact(self.addr, &registers::UPGRADE_ENTRY, &mut []) {
                    Ok(()) => HandshakeState::IdentityCheck,
                    Err(e) => {
                        log::warn!("Failed to enter upgrade mode: {}", e);
                        HandshakeState::Failed
                    }
                }
            }
            HandshakeState::IdentityCheck => {
                if self.check_identity(master) {
                    HandshakeState::Ready
                } else {
                    HandshakeState::Failed
                }
            }
            HandshakeState::Ready => HandshakeState::Ready,
        };
        Ok(self.state)
    }

    /// Step until the bootloader is identified or attempts run out
    pub fn run<M, P>(mut self, master: &mut M, progress: &mut P) -> Result<HandshakeOutcome>
    where
        M: I2cMaster + ?Sized,
        P: UpdateProgress + ?Sized,
    {
        loop {
            let previous = self.state;
            match self.step(master) {
                Ok(HandshakeState::Ready) => break,
                Ok(HandshakeState::Resetting) => {
                    progress.handshake(self.attempts, self.config.max_attempts)
                }
                Ok(_) => {}
                Err(e) => {
                    log::debug!("Bootloader handshake stopped after {:?}: {}", previous, e);
                    return Err(e);
                }
            }
        }

        log::debug!("Bootloader ready after {} attempt(s)", self.attempts);
        Ok(HandshakeOutcome {
            attempts: self.attempts,
            warnings: self.warnings,
        })
    }

    /// Soft reset: 0xAA then 0x55 to the reset register
    ///
    /// The controller drops off the bus while it reboots, so a NACK here
    /// is expected and ignored. The identity check decides.
    fn reset<M: I2cMaster + ?Sized>(&mut self, master: &mut M) {
        log::info!("Reset CTPM");
        for (value, delay) in [
            (registers::UPGRADE_AA, self.chip.delay_aa_ms),
            (registers::UPGRADE_55, self.chip.delay_55_ms),
        ] {
            if let Err(e) = write_register(master, self.addr, registers::RST_CMD, value) {
                log::debug!("Reset write 0x{:02x} not acknowledged: {}", value, e);
            }
            master.delay_ms(delay);
        }
    }

    /// Switch a HID-mode bootloader to plain I2C
    ///
    /// The controller keeps going when the acknowledgement is wrong, so this
    /// only records a warning. Whether a bad acknowledgement ever hides a
    /// real fault is unknown.
    fn hid_to_i2c<M: I2cMaster + ?Sized>(&mut self, master: &mut M) {
        let mut response = [0u8; 3];
        let result = master
            .transact(self.addr, &registers::HID_TO_I2C_REQUEST, &mut [])
            .and_then(|()| master.transact(self.addr, &[], &mut response));

        let warning = match result {
            Err(_) => Some(Warning::ModeSwitchBusError),
            Ok(()) if response != registers::HID_TO_I2C_ACK => {
                Some(Warning::ModeSwitchMismatch { response })
            }
            Ok(()) => None,
        };
        if let Some(warning) = warning {
            log::warn!("{}", warning);
            self.warnings.push(warning);
        }

        master.delay_ms(MODE_SWITCH_DELAY_MS);
    }

    fn check_identity<M: I2cMaster + ?Sized>(&mut self, master: &mut M) -> bool {
        log::info!("Check READ-ID");
        master.delay_ms(self.chip.delay_read_id_ms);

        let mut id = [0u8; 2];
        let cmd = [registers::READ_ID, 0x00, 0x00, 0x00];
        if let Err(e) = master.transact(self.addr, &cmd, &mut id) {
            log::warn!("READ-ID failed: {}", e);
            return false;
        }

        if id != self.chip.boot_id {
            log::warn!(
                "READ-ID not ok: {:02x} {:02x} (expected {:02x} {:02x})",
                id[0],
                id[1],
                self.chip.boot_id[0],
                self.chip.boot_id[1]
            );
            return false;
        }
        true
    }
}

/// Run the handshake against the controller of `chip` at `addr`
pub fn enter_bootloader<M, P>(
    master: &mut M,
    addr: u8,
    chip: &'static ChipProfile,
    config: &HandshakeConfig,
    progress: &mut P,
) -> Result<HandshakeOutcome>
where
    M: I2cMaster + ?Sized,
    P: UpdateProgress + ?Sized,
{
    Handshake::new(chip, addr, *config).run(master, progress)
}
