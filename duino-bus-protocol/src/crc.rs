//! CRC-8 trailer
//!
//! Polynomial 0x07, zero init, no reflection, no final XOR. This is the
//! profile `crcmod` calls "crc-8" and the `crc` crate calls SMBus.

use ::crc::{Crc, CRC_8_SMBUS};

const CRC8: Crc<u8> = Crc::<u8>::new(&CRC_8_SMBUS);

/// Compute the CRC-8 of `data`
pub fn crc8(data: &[u8]) -> u8 {
    CRC8.checksum(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_vectors() {
        assert_eq!(crc8(&[]), 0x00);
        assert_eq!(crc8(&[0x01]), 0x07);
        assert_eq!(crc8(&[0x01, 0x02]), 0x1B);
        assert_eq!(crc8(&[0x01, 0x02, 0x03]), 0x48);
        assert_eq!(crc8(&[0xC0, 0x02, 0x03]), 0xAE);
        assert_eq!(crc8(&[0xDB, 0x02, 0x03]), 0xE0);
    }

    #[test]
    fn test_check_value() {
        // Catalog check value for CRC-8/SMBUS
        assert_eq!(crc8(b"123456789"), 0xF4);
    }
}
