//! Reverse-lookup names for IPv4 and IPv6 addresses and prefixes.

use crate::error::{Result, ZoneError};
use cidr::{Ipv4Inet, Ipv6Inet};
use std::net::Ipv6Addr;
use std::str::FromStr;

const IN_ADDR_ARPA: &str = "in-addr.arpa.";
const IP6_ARPA: &str = "ip6.arpa.";

/// Reverse name of an IPv4 address or prefix.
///
/// Accepts a full dotted quad, a dotted partial prefix (`192.168.1`) or a
/// CIDR (`192.168.1.0/24`). A CIDR keeps `length / 8` octets.
pub fn ipv4_to_arpa(address: &str) -> Result<String> {
    let octets: Vec<u8> = match address.split_once('/') {
        Some(_) => {
            let inet = Ipv4Inet::from_str(address)
                .map_err(|_| ZoneError::InvalidAddress(address.to_string()))?;
            let count = inet.network_length() as usize / 8;
            inet.address().octets()[..count].to_vec()
        }
        None => {
            let octets = address
                .split('.')
                .map(|octet| octet.parse::<u8>())
                .collect::<std::result::Result<Vec<u8>, _>>()
                .map_err(|_| ZoneError::InvalidAddress(address.to_string()))?;
            if octets.is_empty() || octets.len() > 4 {
                return Err(ZoneError::InvalidAddress(address.to_string()));
            }
            octets
        }
    };
    let mut labels: Vec<String> = octets.iter().rev().map(|o| o.to_string()).collect();
    labels.push(IN_ADDR_ARPA.to_string());
    Ok(labels.join("."))
}

/// Reverse name of an IPv6 address, or of a prefix given as `address/length`.
///
/// The address is expanded to its 32 nibbles (filling the `::` elision with
/// zeros), truncated to `length / 4` nibbles, reversed and dot-joined. A
/// length that is not a multiple of 4 rounds down to the nibble boundary.
pub fn ipv6_to_arpa(address: &str) -> Result<String> {
    let (addr, length) = match address.split_once('/') {
        Some(_) => {
            let inet = Ipv6Inet::from_str(address)
                .map_err(|_| ZoneError::InvalidAddress(address.to_string()))?;
            (inet.address(), inet.network_length())
        }
        None => {
            let addr = Ipv6Addr::from_str(address)
                .map_err(|_| ZoneError::InvalidAddress(address.to_string()))?;
            (addr, 128)
        }
    };
    let bits = u128::from(addr);
    let count = length as usize / 4;
    let mut labels: Vec<String> = (0..count)
        .rev()
        .map(|i| format!("{:x}", (bits >> (124 - 4 * i)) & 0xf))
        .collect();
    labels.push(IP6_ARPA.to_string());
    Ok(labels.join("."))
}

/// True if `name` equals `origin` or lies below it.
pub fn in_zone(name: &str, origin: &str) -> bool {
    name == origin
        || name
            .strip_suffix(origin)
            .is_some_and(|head| head.ends_with('.'))
}
