//! Bus transport abstraction
//!
//! This module defines the trait a bus adapter implements so the protocol
//! code can reach the controller.

mod traits;

pub use traits::*;
