use crate::error::{Result, ZoneError};
use crate::util::arpa::{ipv4_to_arpa, ipv6_to_arpa};
use crate::zone::attribute::Attribute;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

#[derive(Clone, Debug, PartialEq)]
pub struct Mx {
    pub priority: u16,
    pub target: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Srv {
    pub service: String,
    pub proto: String,
    pub priority: u16,
    pub weight: u16,
    pub port: u16,
    pub target: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Txt {
    pub name: String,
    pub text: String,
}

/// One declared value of an attribute.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// soa, ns and host names
    Name(String),
    /// ip and ip6
    Address(String),
    /// prefix and prefix6
    Prefix(String),
    Mx(Mx),
    Srv(Srv),
    Txt(Txt),
}

impl Value {
    /// Checks the value has the shape `attribute` stores and that addresses
    /// and prefixes parse for the attribute's family.
    pub fn check(&self, attribute: Attribute) -> Result<()> {
        match (attribute, self) {
            (Attribute::Soa | Attribute::Ns | Attribute::Name, Value::Name(name)) => {
                if name.is_empty() {
                    return Err(invalid(attribute, "empty name"));
                }
                Ok(())
            }
            (Attribute::Ip, Value::Address(address)) => Ipv4Addr::from_str(address)
                .map(|_| ())
                .map_err(|_| ZoneError::InvalidAddress(address.clone())),
            (Attribute::Ip6, Value::Address(address)) => Ipv6Addr::from_str(address)
                .map(|_| ())
                .map_err(|_| ZoneError::InvalidAddress(address.clone())),
            (Attribute::Prefix, Value::Prefix(prefix)) => ipv4_to_arpa(prefix).map(|_| ()),
            (Attribute::Prefix6, Value::Prefix(prefix)) => ipv6_to_arpa(prefix).map(|_| ()),
            (Attribute::Mx, Value::Mx(_)) | (Attribute::Srv, Value::Srv(_)) => Ok(()),
            (Attribute::Txt, Value::Txt(txt)) => {
                if txt.name.is_empty() {
                    return Err(invalid(attribute, "empty owner name"));
                }
                Ok(())
            }
            _ => Err(invalid(attribute, &format!("unexpected value {:?}", self))),
        }
    }

    /// Text of a name, address or prefix value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Name(s) | Value::Address(s) | Value::Prefix(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

fn invalid(attribute: Attribute, reason: &str) -> ZoneError {
    ZoneError::InvalidValue {
        attribute: attribute.to_string(),
        reason: reason.to_string(),
    }
}
