//! Network address formatting.
//!
//! IPv4 addresses are carried as `std::net::Ipv4Addr`, whose `Display`
//! already renders dotted-decimal. MAC addresses have no std type, so
//! their rendering lives here.

/// Format 6 bytes as a MAC address string in colon-separated hex format.
///
/// # Example
///
/// ```
/// use snifflet::format::format_mac;
///
/// let bytes = [0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff];
/// assert_eq!(format_mac(&bytes), "aa:bb:cc:dd:ee:ff");
/// ```
pub fn format_mac(bytes: &[u8; 6]) -> String {
    format!(
        "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
        bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5]
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_mac_common() {
        let bytes = [0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff];
        assert_eq!(format_mac(&bytes), "aa:bb:cc:dd:ee:ff");
    }

    #[test]
    fn test_format_mac_broadcast() {
        assert_eq!(format_mac(&[0xff; 6]), "ff:ff:ff:ff:ff:ff");
    }

    #[test]
    fn test_format_mac_zeros() {
        assert_eq!(format_mac(&[0x00; 6]), "00:00:00:00:00:00");
    }
}
