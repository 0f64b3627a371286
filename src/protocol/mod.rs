//! Protocol header views and the frame dissector.
//!
//! This module provides:
//! - Zero-copy views over the link, network and transport headers
//! - The `Dissector` that walks one captured frame through them and
//!   assigns packet ordinals

mod dissector;
mod ethernet;
mod ipv4;
mod tcp;
mod udp;

pub use dissector::{
    Anomaly, Dissection, Dissector, TcpSegment, Transport, UdpDatagram, IP_PROTO_ICMP,
    IP_PROTO_RAW,
};
pub use ethernet::{ethertype, EthernetView, LINKTYPE_ETHERNET};
pub use ipv4::Ipv4View;
pub use tcp::{flags as tcp_flags, TcpView, IP_PROTO_TCP};
pub use udp::{UdpView, IP_PROTO_UDP};
