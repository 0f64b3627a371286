//! Frame dissection: Ethernet, then IPv4, then one transport header.

use std::fmt;
use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{DissectError, MalformedFrame};
use crate::pcap::RawFrame;

use super::ethernet::EthernetView;
use super::ipv4::Ipv4View;
use super::tcp::{TcpView, IP_PROTO_TCP};
use super::udp::{UdpView, IP_PROTO_UDP};

/// IP protocol number for ICMP.
pub const IP_PROTO_ICMP: u8 = 1;

/// Protocol number zero, reported as a raw IP packet.
pub const IP_PROTO_RAW: u8 = 0;

/// Transport-layer outcome of dissecting one frame.
///
/// `Icmp`, `RawIp` and `Other` are recognized terminal states: the
/// frame is fine, dissection just has nothing further to descend into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport<'a> {
    Tcp(TcpSegment<'a>),
    Udp(UdpDatagram),
    Icmp,
    RawIp,
    Other(u8),
}

impl Transport<'_> {
    /// Protocol name as reported in output.
    pub fn protocol_name(&self) -> &'static str {
        match self {
            Transport::Tcp(_) => "TCP",
            Transport::Udp(_) => "UDP",
            Transport::Icmp => "ICMP",
            Transport::RawIp => "IP",
            Transport::Other(_) => "unknown",
        }
    }
}

/// Parsed TCP header fields plus the frame's payload region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TcpSegment<'a> {
    pub src_port: u16,
    pub dst_port: u16,
    pub sequence: u32,
    pub acknowledgment: u32,
    /// Header length in bytes, from the data-offset nibble.
    pub header_len: usize,
    /// The eight flag bits.
    pub flags: u8,
    pub window: u16,
    pub checksum: u16,
    pub urgent_pointer: u16,
    /// Application bytes: start after the TCP header, end at the
    /// shorter of the declared length and the capture.
    pub payload: &'a [u8],
}

/// Parsed UDP header fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UdpDatagram {
    pub src_port: u16,
    pub dst_port: u16,
    /// Datagram length in bytes, as stored in the header.
    pub length: u16,
    pub checksum: u16,
}

/// Oddities worth reporting that do not stop dissection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anomaly {
    /// The declared lengths place the payload at a negative size; it
    /// was clamped to zero.
    NegativePayloadLength { declared: i64 },

    /// The capture ends before the declared payload does.
    PayloadTruncated { declared: usize, available: usize },
}

impl fmt::Display for Anomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Anomaly::NegativePayloadLength { declared } => {
                write!(f, "declared payload length {declared} clamped to 0")
            }
            Anomaly::PayloadTruncated {
                declared,
                available,
            } => {
                write!(
                    f,
                    "payload cut short by capture ({available} of {declared} bytes)"
                )
            }
        }
    }
}

/// Everything learned from one successfully dissected frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dissection<'a> {
    /// 1-based ordinal assigned by the dissector.
    pub frame: u64,
    pub dst_mac: [u8; 6],
    pub src_mac: [u8; 6],
    /// EtherType as captured; recorded, never branched on.
    pub ethertype: u16,
    pub src_ip: Ipv4Addr,
    pub dst_ip: Ipv4Addr,
    /// IPv4 header length in bytes.
    pub ip_header_len: usize,
    /// IPv4 total length as stored.
    pub total_length: u16,
    pub ttl: u8,
    pub transport: Transport<'a>,
    /// Non-fatal oddities found along the way.
    pub anomalies: Vec<Anomaly>,
}

/// Walks captured frames through the link, network and transport
/// headers.
///
/// Owns the packet counter: ordinals start at 1 and every call to
/// [`dissect`](Self::dissect) consumes exactly one, malformed frames
/// included. A shared `Dissector` hands out distinct ordinals from
/// concurrent calls.
#[derive(Debug, Default)]
pub struct Dissector {
    counter: AtomicU64,
}

impl Dissector {
    /// Create a dissector with its counter at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of frames dissected so far, any outcome.
    pub fn packets_seen(&self) -> u64 {
        self.counter.load(Ordering::Relaxed)
    }

    /// Dissect one captured frame.
    ///
    /// The returned value borrows the frame's bytes; the dissector
    /// itself retains nothing. Failure is per-frame: the ordinal is
    /// still consumed and the caller continues with the next frame.
    pub fn dissect<'a>(&self, frame: &'a RawFrame) -> Result<Dissection<'a>, DissectError> {
        let ordinal = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        dissect_frame(ordinal, &frame.data).map_err(|kind| DissectError {
            frame: ordinal,
            kind,
        })
    }
}

fn dissect_frame(ordinal: u64, data: &[u8]) -> Result<Dissection<'_>, MalformedFrame> {
    let eth = EthernetView::from_slice(data)?;
    // The ethertype is recorded but not dispatched on: upstream capture
    // filtering decides what reaches us, and we read it as IPv4.
    let ip = Ipv4View::from_slice(eth.payload())?;

    let mut anomalies = Vec::new();
    let transport = match ip.protocol() {
        IP_PROTO_TCP => {
            let tcp = TcpView::from_slice(ip.payload())?;
            let payload = tcp_payload(&ip, &tcp, &mut anomalies);
            Transport::Tcp(TcpSegment {
                src_port: tcp.source_port(),
                dst_port: tcp.destination_port(),
                sequence: tcp.sequence_number(),
                acknowledgment: tcp.acknowledgment_number(),
                header_len: tcp.header_len(),
                flags: tcp.flags(),
                window: tcp.window(),
                checksum: tcp.checksum(),
                urgent_pointer: tcp.urgent_pointer(),
                payload,
            })
        }
        IP_PROTO_UDP => {
            let udp = UdpView::from_slice(ip.payload())?;
            Transport::Udp(UdpDatagram {
                src_port: udp.source_port(),
                dst_port: udp.destination_port(),
                length: udp.length(),
                checksum: udp.checksum(),
            })
        }
        IP_PROTO_ICMP => Transport::Icmp,
        IP_PROTO_RAW => Transport::RawIp,
        other => Transport::Other(other),
    };

    Ok(Dissection {
        frame: ordinal,
        dst_mac: eth.destination(),
        src_mac: eth.source(),
        ethertype: eth.ethertype(),
        src_ip: ip.source(),
        dst_ip: ip.destination(),
        ip_header_len: ip.header_len(),
        total_length: ip.total_length(),
        ttl: ip.ttl(),
        transport,
        anomalies,
    })
}

/// Trim the capture remainder after the TCP header to the payload
/// length the network layer declares.
fn tcp_payload<'a>(
    ip: &Ipv4View<'_>,
    tcp: &TcpView<'a>,
    anomalies: &mut Vec<Anomaly>,
) -> &'a [u8] {
    let headers = (ip.header_len() + tcp.header_len()) as i64;
    let declared = i64::from(ip.total_length()) - headers;
    let declared = if declared < 0 {
        anomalies.push(Anomaly::NegativePayloadLength { declared });
        0
    } else {
        declared as usize
    };

    let available = tcp.payload();
    if declared <= available.len() {
        &available[..declared]
    } else {
        anomalies.push(Anomaly::PayloadTruncated {
            declared,
            available: available.len(),
        });
        available
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(data: Vec<u8>) -> RawFrame {
        let len = data.len() as u32;
        RawFrame::new(1, 0, len, len, 1, data)
    }

    fn ethernet_ipv4() -> Vec<u8> {
        vec![
            0x00, 0x11, 0x22, 0x33, 0x44, 0x55, // dst
            0x66, 0x77, 0x88, 0x99, 0xaa, 0xbb, // src
            0x08, 0x00, // ethertype: IPv4
        ]
    }

    fn ipv4_header(protocol: u8, total_length: u16) -> Vec<u8> {
        let len = total_length.to_be_bytes();
        vec![
            0x45, 0x00, // Version 4, IHL 5, TOS
            len[0], len[1], // Total length
            0x00, 0x01, // Identification
            0x00, 0x00, // Flags + Fragment offset
            0x40, protocol, // TTL 64, Protocol
            0x00, 0x00, // Checksum
            0xc0, 0xa8, 0x01, 0x01, // Src: 192.168.1.1
            0xc0, 0xa8, 0x01, 0x02, // Dst: 192.168.1.2
        ]
    }

    fn tcp_header(payload: &[u8]) -> Vec<u8> {
        let mut segment = vec![
            0x00, 0x50, // Src port: 80
            0x1f, 0x90, // Dst port: 8080
            0x00, 0x00, 0x00, 0x01, // Seq: 1
            0x00, 0x00, 0x00, 0x00, // Ack: 0
            0x50, 0x18, // Offset 5, PSH + ACK
            0x72, 0x10, // Window: 29200
            0x00, 0x00, // Checksum
            0x00, 0x00, // Urgent pointer
        ];
        segment.extend_from_slice(payload);
        segment
    }

    fn tcp_frame(payload: &[u8]) -> RawFrame {
        let total = 20 + 20 + payload.len() as u16;
        let mut data = ethernet_ipv4();
        data.extend(ipv4_header(6, total));
        data.extend(tcp_header(payload));
        frame(data)
    }

    #[test]
    fn test_dissect_tcp_with_payload() {
        let raw = tcp_frame(b"GET / HTTP/1.1\r\n");
        let dissector = Dissector::new();
        let d = dissector.dissect(&raw).unwrap();

        assert_eq!(d.frame, 1);
        assert_eq!(d.src_ip, "192.168.1.1".parse::<Ipv4Addr>().unwrap());
        assert_eq!(d.dst_ip, "192.168.1.2".parse::<Ipv4Addr>().unwrap());
        assert_eq!(d.ethertype, 0x0800);
        assert_eq!(d.total_length, 56);
        assert!(d.anomalies.is_empty());

        match d.transport {
            Transport::Tcp(seg) => {
                assert_eq!(seg.src_port, 80);
                assert_eq!(seg.dst_port, 8080);
                assert_eq!(seg.sequence, 1);
                assert_eq!(seg.payload, b"GET / HTTP/1.1\r\n");
            }
            other => panic!("expected TCP, got {other:?}"),
        }
    }

    #[test]
    fn test_minimal_tcp_frame_empty_payload() {
        // 14 + 20 + 20 bytes, total length 40: headers only
        let raw = tcp_frame(b"");
        let d = Dissector::new().dissect(&raw).unwrap();

        assert!(d.anomalies.is_empty());
        match d.transport {
            Transport::Tcp(seg) => assert!(seg.payload.is_empty()),
            other => panic!("expected TCP, got {other:?}"),
        }
    }

    #[test]
    fn test_icmp_is_terminal() {
        // Same layout as the minimal TCP frame, protocol byte flipped
        // to ICMP: the bytes after the network header are not touched.
        let mut data = ethernet_ipv4();
        data.extend(ipv4_header(1, 40));
        data.extend(tcp_header(b""));
        let raw = frame(data);
        let d = Dissector::new().dissect(&raw).unwrap();

        assert_eq!(d.transport, Transport::Icmp);
        assert_eq!(d.transport.protocol_name(), "ICMP");
        assert!(d.anomalies.is_empty());
    }

    #[test]
    fn test_udp_reports_header_fields() {
        let mut data = ethernet_ipv4();
        data.extend(ipv4_header(17, 28));
        data.extend([
            0x00, 0x35, // Src port: 53
            0xc3, 0x50, // Dst port: 50000
            0x01, 0x00, // Length: 256
            0xab, 0xcd, // Checksum
        ]);
        let raw = frame(data);
        let d = Dissector::new().dissect(&raw).unwrap();

        match d.transport {
            Transport::Udp(dg) => {
                assert_eq!(dg.src_port, 53);
                assert_eq!(dg.dst_port, 50000);
                assert_eq!(dg.length, 256);
                assert_eq!(dg.checksum, 0xabcd);
            }
            other => panic!("expected UDP, got {other:?}"),
        }
    }

    #[test]
    fn test_raw_ip_and_unknown_protocols() {
        let mut data = ethernet_ipv4();
        data.extend(ipv4_header(0, 20));
        let raw = frame(data);
        let d = Dissector::new().dissect(&raw).unwrap();
        assert_eq!(d.transport, Transport::RawIp);
        assert_eq!(d.transport.protocol_name(), "IP");

        let mut data = ethernet_ipv4();
        data.extend(ipv4_header(47, 20));
        let raw = frame(data);
        let d = Dissector::new().dissect(&raw).unwrap();
        assert_eq!(d.transport, Transport::Other(47));
        assert_eq!(d.transport.protocol_name(), "unknown");
    }

    #[test]
    fn test_short_frame_is_malformed() {
        let raw = frame(vec![0u8; 10]);
        let err = Dissector::new().dissect(&raw).unwrap_err();

        assert_eq!(err.frame, 1);
        assert_eq!(
            err.kind,
            MalformedFrame::Truncated {
                layer: "Ethernet",
                needed: 14,
                have: 10,
            }
        );
    }

    #[test]
    fn test_bad_ihl_is_malformed() {
        let mut data = ethernet_ipv4();
        let mut ip = ipv4_header(6, 40);
        ip[0] = 0x44; // IHL 4 = 16 bytes, below the fixed part
        data.extend(ip);
        data.extend(tcp_header(b""));

        let err = Dissector::new().dissect(&frame(data)).unwrap_err();
        assert_eq!(
            err.kind,
            MalformedFrame::InvalidHeaderLength {
                layer: "IPv4",
                length: 16,
            }
        );
    }

    #[test]
    fn test_truncated_tcp_header_is_malformed() {
        let mut data = ethernet_ipv4();
        data.extend(ipv4_header(6, 40));
        data.extend([0x00, 0x50, 0x1f, 0x90]); // 4 of 20 TCP bytes

        let err = Dissector::new().dissect(&frame(data)).unwrap_err();
        assert_eq!(
            err.kind,
            MalformedFrame::Truncated {
                layer: "TCP",
                needed: 20,
                have: 4,
            }
        );
    }

    #[test]
    fn test_ordinals_increase_across_outcomes() {
        let dissector = Dissector::new();

        let good = tcp_frame(b"abc");
        let bad = frame(vec![0u8; 3]);

        assert_eq!(dissector.dissect(&good).unwrap().frame, 1);
        assert_eq!(dissector.dissect(&bad).unwrap_err().frame, 2);
        assert_eq!(dissector.dissect(&good).unwrap().frame, 3);
        assert_eq!(dissector.dissect(&bad).unwrap_err().frame, 4);
        assert_eq!(dissector.packets_seen(), 4);
    }

    #[test]
    fn test_negative_payload_clamped_to_zero() {
        // Total length 30 cannot cover 40 bytes of headers.
        let mut data = ethernet_ipv4();
        data.extend(ipv4_header(6, 30));
        data.extend(tcp_header(b""));

        let raw = frame(data);
        let d = Dissector::new().dissect(&raw).unwrap();
        assert_eq!(
            d.anomalies,
            vec![Anomaly::NegativePayloadLength { declared: -10 }]
        );
        match d.transport {
            Transport::Tcp(seg) => assert!(seg.payload.is_empty()),
            other => panic!("expected TCP, got {other:?}"),
        }
    }

    #[test]
    fn test_link_padding_not_in_payload() {
        // Declared payload is 5 bytes; the capture carries 6 more
        // bytes of link-layer padding that must not leak through.
        let mut data = ethernet_ipv4();
        data.extend(ipv4_header(6, 45));
        data.extend(tcp_header(b"hello"));
        data.extend([0u8; 6]);

        let raw = frame(data);
        let d = Dissector::new().dissect(&raw).unwrap();
        assert!(d.anomalies.is_empty());
        match d.transport {
            Transport::Tcp(seg) => assert_eq!(seg.payload, b"hello"),
            other => panic!("expected TCP, got {other:?}"),
        }
    }

    #[test]
    fn test_capture_shorter_than_declared_payload() {
        // Total length promises 20 payload bytes; capture holds 10.
        let mut data = ethernet_ipv4();
        data.extend(ipv4_header(6, 60));
        data.extend(tcp_header(b"0123456789"));

        let raw = frame(data);
        let d = Dissector::new().dissect(&raw).unwrap();
        assert_eq!(
            d.anomalies,
            vec![Anomaly::PayloadTruncated {
                declared: 20,
                available: 10,
            }]
        );
        match d.transport {
            Transport::Tcp(seg) => assert_eq!(seg.payload, b"0123456789"),
            other => panic!("expected TCP, got {other:?}"),
        }
    }

    #[test]
    fn test_ethertype_recorded_without_dispatch() {
        // A non-IPv4 ethertype does not stop the network-layer read.
        let mut data = ethernet_ipv4();
        data[12] = 0x08;
        data[13] = 0x06; // ARP
        data.extend(ipv4_header(0, 20));

        let raw = frame(data);
        let d = Dissector::new().dissect(&raw).unwrap();
        assert_eq!(d.ethertype, 0x0806);
        assert_eq!(d.transport, Transport::RawIp);
    }
}
