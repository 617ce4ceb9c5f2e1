use crate::error::Result;
use crate::util::arpa::{in_zone, ipv4_to_arpa, ipv6_to_arpa};
use crate::zone::{Attribute, Domain, Value};
use crate::zonefile::write_header;
use log::debug;
use std::collections::HashSet;
use std::io::Write;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Family {
    V4,
    V6,
}

impl Family {
    pub fn address_attribute(&self) -> Attribute {
        match self {
            Family::V4 => Attribute::Ip,
            Family::V6 => Attribute::Ip6,
        }
    }

    pub fn prefix_attribute(&self) -> Attribute {
        match self {
            Family::V4 => Attribute::Prefix,
            Family::V6 => Attribute::Prefix6,
        }
    }

    pub fn to_arpa(&self, address: &str) -> Result<String> {
        match self {
            Family::V4 => ipv4_to_arpa(address),
            Family::V6 => ipv6_to_arpa(address),
        }
    }
}

/// PTR records of `view` as (reverse name, target) pairs.
///
/// Hosts come first in declaration order, then the apex. The first entity to
/// claim an address keeps it. Addresses outside `origin` are dropped.
pub fn ptr_records(
    domain: &Domain,
    view: &str,
    family: Family,
    origin: &str,
) -> Result<Vec<(String, String)>> {
    let attribute = family.address_attribute();
    let mut candidates: Vec<(&Value, String)> = Vec::new();
    for host in domain.hosts() {
        let target = domain.qualify(host.host.id());
        for address in host.resolve(attribute, Some(view))? {
            candidates.push((address, target.clone()));
        }
    }
    for address in domain.resolve(attribute, Some(view))? {
        candidates.push((address, domain.fqdn().to_string()));
    }

    let mut seen = HashSet::new();
    let mut records = Vec::new();
    for (address, target) in candidates {
        let Some(address) = address.as_str() else {
            continue;
        };
        let name = family.to_arpa(address)?;
        if !in_zone(&name, origin) {
            debug!("{} is outside {}, no PTR for {}", address, origin, target);
            continue;
        }
        if seen.insert(name.clone()) {
            records.push((name, target));
        }
    }
    Ok(records)
}

/// Reverse zone of `view` for `family`. Returns `false` without writing
/// anything when neither the view nor the default view declares a prefix.
pub fn write_reverse<W: Write>(
    out: &mut W,
    domain: &Domain,
    serial: u32,
    view: &str,
    family: Family,
) -> Result<bool> {
    let Some(prefix) = domain.prefix(family.prefix_attribute(), Some(view))? else {
        return Ok(false);
    };
    let origin = family.to_arpa(prefix)?;
    write_header(out, domain, serial, view, &origin)?;
    for (name, target) in ptr_records(domain, view, family, &origin)? {
        writeln!(out, "{} PTR {}", name, target)?;
    }
    Ok(true)
}
