//! 8-bit additive checksum.
//!
//! The same function is used when building outbound frames and when
//! verifying inbound ones.

use crate::constants::DATA_LEN;

/// Compute the checksum over the nine semantic fields of a frame.
///
/// All values are summed without bound and the result is truncated to the
/// low 8 bits. Wraparound is the defined behaviour.
pub fn checksum(
    start_byte: u8,
    dev_id: u8,
    cmd_id: u8,
    prm_id: u8,
    error_byte: u8,
    data: [u8; DATA_LEN],
) -> u8 {
    let header = [start_byte, dev_id, cmd_id, prm_id, error_byte];
    checksum_bytes(header.iter().chain(data.iter()).copied())
}

/// Compute the checksum over an arbitrary run of bytes.
pub fn checksum_bytes<I>(bytes: I) -> u8
where
    I: IntoIterator<Item = u8>,
{
    bytes
        .into_iter()
        .fold(0u8, |acc, byte| acc.wrapping_add(byte))
}
