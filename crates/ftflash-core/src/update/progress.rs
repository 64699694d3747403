//! Progress reporting for long-running operations

/// Progress callback trait for firmware update and readback
///
/// An update takes seconds to minutes (erase alone may be 3 s), so the CLI
/// shows a progress bar. Library users that don't care pass [`NoProgress`].
pub trait UpdateProgress {
    /// Called when a handshake attempt starts
    fn handshake(&mut self, attempt: u32, max_attempts: u32);

    /// Called before the erase commands, with the settle time that follows
    fn erasing(&mut self, delay_ms: u32);

    /// Called when starting to send packets
    fn writing(&mut self, total_bytes: usize);

    /// Called after each write packet
    fn write_progress(&mut self, bytes_written: usize);

    /// Called before the checksum is read back
    fn verifying(&mut self);

    /// Called when starting to read packets
    fn reading(&mut self, total_bytes: usize);

    /// Called after each read packet
    fn read_progress(&mut self, bytes_read: usize);

    /// Called once the controller has been reset into its application
    fn complete(&mut self);
}

/// A no-op progress reporter
pub struct NoProgress;

impl UpdateProgress for NoProgress {
    fn handshake(&mut self, _attempt: u32, _max_attempts: u32) {}
    fn erasing(&mut self, _delay_ms: u32) {}
    fn writing(&mut self, _total_bytes: usize) {}
    fn write_progress(&mut self, _bytes_written: usize) {}
    fn verifying(&mut self) {}
    fn reading(&mut self, _total_bytes: usize) {}
    fn read_progress(&mut self, _bytes_read: usize) {}
    fn complete(&mut self) {}
}
