//! Firmware image container
//!
//! The controller takes raw binaries with no header. The only checks we can
//! make are on the size.

use alloc::vec::Vec;

use crate::error::{Error, Result};
use crate::transfer::Checksum;

/// Smallest image the bootloader accepts
pub const MIN_IMAGE_SIZE: usize = 8;
/// Largest image the bootloader accepts (and the size of a readback dump)
pub const MAX_IMAGE_SIZE: usize = 64 * 1024;

/// Immutable firmware image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirmwareImage {
    data: Vec<u8>,
}

impl FirmwareImage {
    /// Wrap an image for flashing, checking its size
    pub fn new(data: Vec<u8>) -> Result<Self> {
        if !(MIN_IMAGE_SIZE..=MAX_IMAGE_SIZE).contains(&data.len()) {
            return Err(Error::ImageSize { len: data.len() });
        }
        Ok(Self { data })
    }

    /// Copy a slice into a new image, checking its size
    pub fn from_slice(data: &[u8]) -> Result<Self> {
        Self::new(data.to_vec())
    }

    /// Wrap bytes read back from a controller
    ///
    /// Dumps always cover the full flash window, so no size check applies.
    pub fn from_readback(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Image contents
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Image length in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True if the image holds no data
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// XOR checksum the bootloader should report after receiving this image
    pub fn checksum(&self) -> u8 {
        let mut ecc = Checksum::new();
        ecc.update(&self.data);
        ecc.value()
    }

    /// Take the bytes out of the image
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}

impl AsRef<[u8]> for FirmwareImage {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn test_size_limits() {
        assert_eq!(
            FirmwareImage::new(vec![0; 7]),
            Err(Error::ImageSize { len: 7 })
        );
        assert!(FirmwareImage::new(vec![0; 8]).is_ok());
        assert!(FirmwareImage::new(vec![0; MAX_IMAGE_SIZE]).is_ok());
        assert_eq!(
            FirmwareImage::new(vec![0; MAX_IMAGE_SIZE + 1]),
            Err(Error::ImageSize {
                len: MAX_IMAGE_SIZE + 1
            })
        );
    }

    #[test]
    fn test_readback_skips_size_check() {
        let image = FirmwareImage::from_readback(vec![0xff; 4]);
        assert_eq!(image.len(), 4);
    }

    #[test]
    fn test_checksum() {
        let image = FirmwareImage::from_slice(&[0x01, 0x02, 0x04, 0x08, 0x10, 0x20, 0x40, 0x80]).unwrap();
        assert_eq!(image.checksum(), 0xff);

        let image = FirmwareImage::from_slice(&[0xa5; 8]).unwrap();
        assert_eq!(image.checksum(), 0x00);
    }
}
