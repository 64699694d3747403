//! CLI command implementations
//!
//! Each command works on an open [`ftflash_core::DeviceSession`], so the
//! same code drives real hardware and the emulator.

mod dump;
mod flash;
mod list;
mod progress;

pub use dump::run_dump;
pub use flash::run_flash;
pub use list::{list_chips, list_programmers};
pub use progress::IndicatifProgress;
