// SPDX-License-Identifier: CC0-1.0

//! Bitcoin network addresses.
//!
//! This module defines the structures and functions needed to encode
//! network addresses in Bitcoin messages.

use core::{fmt, iter};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, SocketAddrV4, SocketAddrV6, ToSocketAddrs};

use io::{BufRead, Read, Write};

use crate::consensus;
use crate::consensus::encode::{self, Decodable, Encodable, ReadExt, WriteExt};
use crate::p2p::ServiceFlags;

/// A message which can be sent on the Bitcoin network
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Address {
    /// Services provided by the peer whose address this is
    pub services: ServiceFlags,
    /// Network byte-order ipv6 address, or ipv4-mapped ipv6 address
    pub address: [u16; 8],
    /// Network port
    pub port: u16,
}

const ONION: [u16; 3] = [0xFD87, 0xD87E, 0xEB43];

impl Address {
    /// Construct a new address message for a socket
    pub fn new(socket: &SocketAddr, services: ServiceFlags) -> Address {
        let (address, port) = match *socket {
            SocketAddr::V4(addr) => (addr.ip().to_ipv6_mapped().segments(), addr.port()),
            SocketAddr::V6(addr) => (addr.ip().segments(), addr.port()),
        };
        Address { address, port, services }
    }

    /// Extract socket address from an [Address] message.
    /// This will return [io::Error] [io::ErrorKind::AddrNotAvailable]
    /// if the message contains a Tor address.
    pub fn socket_addr(&self) -> Result<SocketAddr, io::Error> {
        let addr = &self.address;
        if addr[0..3] == ONION {
            return Err(io::Error::from(io::ErrorKind::AddrNotAvailable));
        }
        let ipv6 =
            Ipv6Addr::new(addr[0], addr[1], addr[2], addr[3], addr[4], addr[5], addr[6], addr[7]);
        if let Some(ipv4) = ipv6.to_ipv4() {
            Ok(SocketAddr::V4(SocketAddrV4::new(ipv4, self.port)))
        } else {
            Ok(SocketAddr::V6(SocketAddrV6::new(ipv6, self.port, 0, 0)))
        }
    }
}

impl Encodable for Address {
    #[inline]
    fn consensus_encode<W: Write + ?Sized>(&self, w: &mut W) -> Result<usize, io::Error> {
        let mut len = self.services.consensus_encode(w)?;

        for word in &self.address {
            w.write_all(&word.to_be_bytes())?;
            len += 2;
        }

        w.write_all(&self.port.to_be_bytes())?;
        len += 2;

        Ok(len)
    }
}

impl Decodable for Address {
    #[inline]
    fn consensus_decode<R: BufRead + ?Sized>(r: &mut R) -> Result<Self, encode::Error> {
        Ok(Address {
            services: Decodable::consensus_decode(r)?,
            address: read_be_address(r)?,
            port: u16::swap_bytes(Decodable::consensus_decode(r)?),
        })
    }
}

/// Read a big-endian address from reader.
fn read_be_address<R: Read + ?Sized>(r: &mut R) -> Result<[u16; 8], encode::Error> {
    let mut address = [0u16; 8];
    let mut buf = [0u8; 2];

    for word in &mut address {
        Read::read_exact(r, &mut buf)?;
        *word = u16::from_be_bytes(buf)
    }
    Ok(address)
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let ipv6 = Ipv6Addr::from(self.address);

        match ipv6.to_ipv4() {
            Some(addr) => write!(
                f,
                "Address {{services: {}, address: {}, port: {}}}",
                self.services, addr, self.port
            ),
            None => write!(
                f,
                "Address {{services: {}, address: {}, port: {}}}",
                self.services, ipv6, self.port
            ),
        }
    }
}

impl ToSocketAddrs for Address {
    type Iter = iter::Once<SocketAddr>;
    fn to_socket_addrs(&self) -> Result<Self::Iter, std::io::Error> {
        Ok(iter::once(self.socket_addr()?))
    }
}

/// Supported networks for use in BIP155 addrv2 message
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum AddrV2 {
    /// IPV4
    Ipv4(Ipv4Addr),
    /// IPV6
    Ipv6(Ipv6Addr),
    /// TORV3
    TorV3([u8; 32]),
    /// I2P
    I2p([u8; 32]),
    /// CJDNS
    Cjdns(Ipv6Addr),
    /// Unknown
    Unknown(u8, Vec<u8>),
}

/// Error types for [`AddrV2`] to [`SocketAddr`] conversion.
#[derive(Debug, PartialEq, Eq)]
pub enum AddrV2ToSocketAddrError {
    /// A [`AddrV2::TorV3`] address cannot be converted to a [`SocketAddr`].
    TorV3NotSupported,
    /// A [`AddrV2::I2p`] address cannot be converted to a [`SocketAddr`].
    I2pNotSupported,
    /// A [`AddrV2::Cjdns`] address can be converted to a [`SocketAddr`],
    /// but it won't work with a tradicional socket API.
    CjdnsNotRecommended,
    /// A [`AddrV2::Unknown`] address cannot be converted to a [`SocketAddr`].
    UnknownNotSupported,
}

impl fmt::Display for AddrV2ToSocketAddrError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TorV3NotSupported => write!(f, "TorV3 addresses cannot be converted to SocketAddr"),
            Self::I2pNotSupported => write!(f, "I2P addresses cannot be converted to SocketAddr"),
            Self::CjdnsNotRecommended => write!(f, "CJDNS addresses can be converted to SocketAddr, but won't work with a traditional socket API"),
            Self::UnknownNotSupported => write!(f, "Unknown address type cannot be converted to SocketAddr"),
        }
    }
}

impl std::error::Error for AddrV2ToSocketAddrError {}

impl From<SocketAddr> for AddrV2 {
    fn from(addr: SocketAddr) -> Self {
        match addr {
            SocketAddr::V4(sock) => AddrV2::Ipv4(*sock.ip()),
            SocketAddr::V6(sock) => {
                // CJDNS uses the IPv6 network `fc00::/8`
                // All CJDNS addresses must have `0xfc00` as the first and second octets
                let ip = *sock.ip();
                if ip.octets()[0] == 0xfc && ip.octets()[1] == 0x00 {
                    AddrV2::Cjdns(ip)
                } else {
                    AddrV2::Ipv6(ip)
                }
            }
        }
    }
}

impl TryFrom<AddrV2> for SocketAddr {
    type Error = AddrV2ToSocketAddrError;

    fn try_from(addr: AddrV2) -> Result<SocketAddr, Self::Error> {
        match addr {
            AddrV2::Ipv4(ip) => Ok(SocketAddr::V4(SocketAddrV4::new(ip, 0))),
            AddrV2::Ipv6(ip) => Ok(SocketAddr::V6(SocketAddrV6::new(ip, 0, 0, 0))),
            AddrV2::Cjdns(_) => Err(AddrV2ToSocketAddrError::CjdnsNotRecommended),
            AddrV2::TorV3(_) => Err(AddrV2ToSocketAddrError::TorV3NotSupported),
            AddrV2::I2p(_) => Err(AddrV2ToSocketAddrError::I2pNotSupported),
            AddrV2::Unknown(_, _) => Err(AddrV2ToSocketAddrError::UnknownNotSupported),
        }
    }
}

impl TryFrom<AddrV2> for IpAddr {
    type Error = AddrV2ToIpAddrError;

    fn try_from(addr: AddrV2) -> Result<IpAddr, Self::Error> {
        match addr {
            AddrV2::Ipv4(ip) => Ok(IpAddr::V4(ip)),
            AddrV2::Ipv6(ip) => Ok(IpAddr::V6(ip)),
            AddrV2::Cjdns(_) => Err(AddrV2ToIpAddrError::Cjdns),
            AddrV2::TorV3(_) => Err(AddrV2ToIpAddrError::TorV3),
            AddrV2::I2p(_) => Err(AddrV2ToIpAddrError::I2p),
            AddrV2::Unknown(_, _) => Err(AddrV2ToIpAddrError::Unknown),
        }
    }
}

impl TryFrom<AddrV2> for Ipv4Addr {
    type Error = AddrV2ToIpv4AddrError;

    fn try_from(addr: AddrV2) -> Result<Ipv4Addr, Self::Error> {
        match addr {
            AddrV2::Ipv4(ip) => Ok(ip),
            AddrV2::Ipv6(_) => Err(AddrV2ToIpv4AddrError::Ipv6),
            AddrV2::Cjdns(_) => Err(AddrV2ToIpv4AddrError::Cjdns),
            AddrV2::TorV3(_) => Err(AddrV2ToIpv4AddrError::TorV3),
            AddrV2::I2p(_) => Err(AddrV2ToIpv4AddrError::I2p),
            AddrV2::Unknown(_, _) => Err(AddrV2ToIpv4AddrError::Unknown),
        }
    }
}

impl TryFrom<AddrV2> for Ipv6Addr {
    type Error = AddrV2ToIpv6AddrError;

    fn try_from(addr: AddrV2) -> Result<Ipv6Addr, Self::Error> {
        match addr {
            AddrV2::Ipv6(ip) => Ok(ip),
            AddrV2::Cjdns(_) => Err(AddrV2ToIpv6AddrError::Cjdns),
            AddrV2::Ipv4(_) => Err(AddrV2ToIpv6AddrError::Ipv4),
            AddrV2::TorV3(_) => Err(AddrV2ToIpv6AddrError::TorV3),
            AddrV2::I2p(_) => Err(AddrV2ToIpv6AddrError::I2p),
            AddrV2::Unknown(_, _) => Err(AddrV2ToIpv6AddrError::Unknown),
        }
    }
}

impl From<IpAddr> for AddrV2 {
    fn from(addr: IpAddr) -> Self {
        match addr {
            IpAddr::V4(ip) => AddrV2::Ipv4(ip),
            IpAddr::V6(ip) => AddrV2::Ipv6(ip),
        }
    }
}

impl From<Ipv4Addr> for AddrV2 {
    fn from(addr: Ipv4Addr) -> Self { AddrV2::Ipv4(addr) }
}

impl From<Ipv6Addr> for AddrV2 {
    fn from(addr: Ipv6Addr) -> Self { AddrV2::Ipv6(addr) }
}

impl Encodable for AddrV2 {
    fn consensus_encode<W: Write + ?Sized>(&self, w: &mut W) -> Result<usize, io::Error> {
        fn encode_addr<W: Write + ?Sized>(
            w: &mut W,
            network: u8,
            bytes: &[u8],
        ) -> Result<usize, io::Error> {
            Ok(network.consensus_encode(w)? + encode::consensus_encode_with_size(bytes, w)?)
        }
        Ok(match *self {
            AddrV2::Ipv4(ref addr) => encode_addr(w, 1, &addr.octets())?,
            AddrV2::Ipv6(ref addr) => encode_addr(w, 2, &addr.octets())?,
            AddrV2::TorV3(ref bytes) => encode_addr(w, 4, bytes)?,
            AddrV2::I2p(ref bytes) => encode_addr(w, 5, bytes)?,
            AddrV2::Cjdns(ref addr) => encode_addr(w, 6, &addr.octets())?,
            AddrV2::Unknown(network, ref bytes) => encode_addr(w, network, bytes)?,
        })
    }
}

impl Decodable for AddrV2 {
    fn consensus_decode<R: BufRead + ?Sized>(r: &mut R) -> Result<Self, encode::Error> {
        let network_id = u8::consensus_decode(r)?;
        let len = r.read_compact_size()?;
        if len > 512 {
            return Err(consensus::parse_failed_error("IP must be <= 512 bytes"));
        }
        Ok(match network_id {
            1 => {
                if len != 4 {
                    return Err(consensus::parse_failed_error("invalid IPv4 address"));
                }
                let addr: [u8; 4] = Decodable::consensus_decode(r)?;
                AddrV2::Ipv4(Ipv4Addr::new(addr[0], addr[1], addr[2], addr[3]))
            }
            2 => {
                if len != 16 {
                    return Err(consensus::parse_failed_error("invalid IPv6 address"));
                }
                let addr: [u16; 8] = read_be_address(r)?;
                if addr[0..3] == ONION {
                    return Err(consensus::parse_failed_error(
                        "OnionCat address sent with IPv6 network id",
                    ));
                }
                if addr[0..6] == [0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0xFFFF] {
                    return Err(consensus::parse_failed_error(
                        "IPV4 wrapped address sent with IPv6 network id",
                    ));
                }
                AddrV2::Ipv6(Ipv6Addr::new(
                    addr[0], addr[1], addr[2], addr[3], addr[4], addr[5], addr[6], addr[7],
                ))
            }

            4 => {
                if len != 32 {
                    return Err(consensus::parse_failed_error("invalid TorV3 address"));
                }
                let pubkey = Decodable::consensus_decode(r)?;
                AddrV2::TorV3(pubkey)
            }
            5 => {
                if len != 32 {
                    return Err(consensus::parse_failed_error("invalid I2P address"));
                }
                let hash = Decodable::consensus_decode(r)?;
                AddrV2::I2p(hash)
            }
            6 => {
                if len != 16 {
                    return Err(consensus::parse_failed_error("invalid CJDNS address"));
                }
                let addr: [u16; 8] = read_be_address(r)?;
                // check the first byte for the CJDNS marker
                if addr[0] >> 8 != 0xFC {
                    return Err(consensus::parse_failed_error("invalid CJDNS address"));
                }
                AddrV2::Cjdns(Ipv6Addr::new(
                    addr[0], addr[1], addr[2], addr[3], addr[4], addr[5], addr[6], addr[7],
                ))
            }
            _ => {
                // len already checked above to be <= 512
                let mut addr = vec![0u8; len as usize];
                r.read_slice(&mut addr)?;
                AddrV2::Unknown(network_id, addr)
            }
        })
    }
}

/// Address received from BIP155 addrv2 message
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct AddrV2Message {
    /// Time that this node was last seen as connected to the network
    pub time: u32,
    /// Service bits
    pub services: ServiceFlags,
    /// Network ID + Network Address
    pub addr: AddrV2,
    /// Network port, 0 if not applicable
    pub port: u16,
}

impl AddrV2Message {
    /// Extract socket address from an [AddrV2Message] message.
    /// This will return [io::Error] [io::ErrorKind::AddrNotAvailable]
    /// if the address type can't be converted into a [SocketAddr].
    pub fn socket_addr(&self) -> Result<SocketAddr, io::Error> {
        match self.addr {
            AddrV2::Ipv4(addr) => Ok(SocketAddr::V4(SocketAddrV4::new(addr, self.port))),
            AddrV2::Ipv6(addr) => Ok(SocketAddr::V6(SocketAddrV6::new(addr, self.port, 0, 0))),
            _ => Err(io::Error::from(io::ErrorKind::AddrNotAvailable)),
        }
    }
}

impl Encodable for AddrV2Message {
    fn consensus_encode<W: Write + ?Sized>(&self, w: &mut W) -> Result<usize, io::Error> {
        let mut len = 0;
        len += self.time.consensus_encode(w)?;
        len += w.emit_compact_size(self.services.to_u64())?;
        len += self.addr.consensus_encode(w)?;

        w.write_all(&self.port.to_be_bytes())?;
        len += 2; // port u16 is two bytes.

        Ok(len)
    }
}

impl Decodable for AddrV2Message {
    fn consensus_decode<R: BufRead + ?Sized>(r: &mut R) -> Result<Self, encode::Error> {
        Ok(AddrV2Message {
            time: Decodable::consensus_decode(r)?,
            services: ServiceFlags::from(r.read_compact_size()?),
            addr: Decodable::consensus_decode(r)?,
            port: u16::swap_bytes(Decodable::consensus_decode(r)?),
        })
    }
}

impl ToSocketAddrs for AddrV2Message {
    type Iter = iter::Once<SocketAddr>;
    fn to_socket_addrs(&self) -> Result<Self::Iter, std::io::Error> {
        Ok(iter::once(self.socket_addr()?))
    }
}

/// Error types for [`AddrV2`] to [`IpAddr`] conversion.
#[derive(Debug, PartialEq, Eq)]
pub enum AddrV2ToIpAddrError {
    /// A [`AddrV2::TorV3`] address cannot be converted to a [`IpAddr`].
    TorV3,
    /// A [`AddrV2::I2p`] address cannot be converted to a [`IpAddr`].
    I2p,
    /// A [`AddrV2::Cjdns`] address cannot be converted to a [`IpAddr`],
    Cjdns,
    /// A [`AddrV2::Unknown`] address cannot be converted to a [`IpAddr`].
    Unknown,
}

impl fmt::Display for AddrV2ToIpAddrError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TorV3 => write!(f, "TorV3 addresses cannot be converted to IpAddr"),
            Self::I2p => write!(f, "I2P addresses cannot be converted to IpAddr"),
            Self::Cjdns => write!(f, "Cjdns addresses cannot be converted to IpAddr"),
            Self::Unknown => write!(f, "Unknown address type cannot be converted to IpAddr"),
        }
    }
}

impl std::error::Error for AddrV2ToIpAddrError {}

/// Error types for [`AddrV2`] to [`Ipv4Addr`] conversion.
#[derive(Debug, PartialEq, Eq)]
pub enum AddrV2ToIpv4AddrError {
    /// A [`AddrV2::Ipv6`] address cannot be converted to a [`Ipv4Addr`].
    Ipv6,
    /// A [`AddrV2::TorV3`] address cannot be converted to a [`Ipv4Addr`].
    TorV3,
    /// A [`AddrV2::I2p`] address cannot be converted to a [`Ipv4Addr`].
    I2p,
    /// A [`AddrV2::Cjdns`] address cannot be converted to a [`Ipv4Addr`],
    Cjdns,
    /// A [`AddrV2::Unknown`] address cannot be converted to a [`Ipv4Addr`].
    Unknown,
}

impl fmt::Display for AddrV2ToIpv4AddrError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ipv6 => write!(f, "Ipv6 addresses cannot be converted to Ipv4Addr"),
            Self::TorV3 => write!(f, "TorV3 addresses cannot be converted to Ipv4Addr"),
            Self::I2p => write!(f, "I2P addresses cannot be converted to Ipv4Addr"),
            Self::Cjdns => write!(f, "Cjdns addresses cannot be converted to Ipv4Addr"),
            Self::Unknown => write!(f, "Unknown address type cannot be converted to Ipv4Addr"),
        }
    }
}

impl std::error::Error for AddrV2ToIpv4AddrError {}

/// Error types for [`AddrV2`] to [`Ipv6Addr`] conversion.
#[derive(Debug, PartialEq, Eq)]
pub enum AddrV2ToIpv6AddrError {
    /// A [`AddrV2::Ipv4`] address cannot be converted to a [`Ipv6Addr`].
    Ipv4,
    /// A [`AddrV2::TorV3`] address cannot be converted to a [`Ipv6Addr`].
    TorV3,
    /// A [`AddrV2::I2p`] address cannot be converted to a [`Ipv6Addr`].
    I2p,
    /// A [`AddrV2::Cjdns`] address cannot be converted to a [`Ipv6Addr`],
    Cjdns,
    /// A [`AddrV2::Unknown`] address cannot be converted to a [`Ipv6Addr`].
    Unknown,
}

impl fmt::Display for AddrV2ToIpv6AddrError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ipv4 => write!(f, "Ipv addresses cannot be converted to Ipv6Addr"),
            Self::TorV3 => write!(f, "TorV3 addresses cannot be converted to Ipv6Addr"),
            Self::I2p => write!(f, "I2P addresses cannot be converted to Ipv6Addr"),
            Self::Cjdns => write!(f, "Cjdns addresses cannot be converted to Ipv6Addr"),
            Self::Unknown => write!(f, "Unknown address type cannot be converted to Ipv6Addr"),
        }
    }
}

impl std::error::Error for AddrV2ToIpv6AddrError {}
