//! SLIP framing bytes
//!
//! Payload bytes equal to [`END`] or [`ESC`] never appear literally inside
//! a frame; they are sent as `ESC` followed by [`ESC_END`] or [`ESC_ESC`].

/// Start/end of frame
pub const END: u8 = 0xC0;

/// Next byte is escaped
pub const ESC: u8 = 0xDB;

/// Escaped form of `END`
pub const ESC_END: u8 = 0xDC;

/// Escaped form of `ESC`
pub const ESC_ESC: u8 = 0xDD;

/// Returns the byte to send after `ESC` if `byte` must be escaped
pub const fn escape(byte: u8) -> Option<u8> {
    match byte {
        END => Some(ESC_END),
        ESC => Some(ESC_ESC),
        _ => None,
    }
}

/// Decode the byte following an `ESC`
///
/// Decoding is lenient: anything other than `ESC_END` or `ESC_ESC` is
/// taken literally instead of being rejected.
pub const fn unescape(byte: u8) -> u8 {
    match byte {
        ESC_END => END,
        ESC_ESC => ESC,
        other => other,
    }
}
