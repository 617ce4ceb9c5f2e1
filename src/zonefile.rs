//! Zone file rendering: one forward zone and up to two reverse zones per view.

use crate::error::Result;
use crate::zone::{Attribute, Domain};
use log::debug;
use reverse::Family;
use std::io::Write;

pub mod forward;
pub mod reverse;

const TTL: &str = "20m";

// slave refresh, retry, expire, negative cache
const REFRESH: u32 = 1200;
const RETRY: u32 = 180;
const EXPIRE: u32 = 604800;
const NEGATIVE_TTL: u32 = 1200;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZoneKind {
    Forward,
    Reverse(Family),
}

impl ZoneKind {
    pub const ALL: [ZoneKind; 3] = [
        ZoneKind::Forward,
        ZoneKind::Reverse(Family::V4),
        ZoneKind::Reverse(Family::V6),
    ];

    fn suffix(&self) -> &'static str {
        match self {
            ZoneKind::Forward => "",
            ZoneKind::Reverse(Family::V4) => ".rev",
            ZoneKind::Reverse(Family::V6) => ".rev6",
        }
    }
}

/// A rendered zone, named `db.<domain>@<view>[.rev|.rev6]`.
#[derive(Clone, Debug, PartialEq)]
pub struct ZoneFile {
    pub name: String,
    pub contents: Vec<u8>,
}

pub fn file_name(domain: &Domain, view: &str, kind: ZoneKind) -> String {
    format!("db.{}@{}{}", domain.filename(), view, kind.suffix())
}

/// `$TTL`, `$ORIGIN`, the SOA record and the NS records of `view`.
fn write_header<W: Write>(
    out: &mut W,
    domain: &Domain,
    serial: u32,
    view: &str,
    origin: &str,
) -> Result<()> {
    writeln!(out, "$TTL {}", TTL)?;
    writeln!(out, "$ORIGIN {}", origin)?;
    writeln!(
        out,
        "@ SOA {} {} ({} {} {} {} {})",
        domain.soa(Some(view))?,
        domain.hostmaster(),
        serial,
        REFRESH,
        RETRY,
        EXPIRE,
        NEGATIVE_TTL
    )?;
    for ns in domain.resolve(Attribute::Ns, Some(view))? {
        if let Some(ns) = ns.as_str() {
            writeln!(out, "@ NS {}", ns)?;
        }
    }
    Ok(())
}

/// Renders one zone of `view`. Reverse zones without a prefix for the view
/// render to `None`.
pub fn render(domain: &Domain, serial: u32, view: &str, kind: ZoneKind) -> Result<Option<ZoneFile>> {
    let mut contents = Vec::new();
    match kind {
        ZoneKind::Forward => forward::write_forward(&mut contents, domain, serial, view)?,
        ZoneKind::Reverse(family) => {
            if !reverse::write_reverse(&mut contents, domain, serial, view, family)? {
                debug!(
                    "No {} declared for {} in view {}, skipping {}",
                    family.prefix_attribute(),
                    domain.fqdn(),
                    view,
                    file_name(domain, view, kind)
                );
                return Ok(None);
            }
        }
    }
    Ok(Some(ZoneFile {
        name: file_name(domain, view, kind),
        contents,
    }))
}

/// Every zone file of `view`.
pub fn render_view(domain: &Domain, serial: u32, view: &str) -> Result<Vec<ZoneFile>> {
    let mut files = Vec::new();
    for kind in ZoneKind::ALL {
        if let Some(file) = render(domain, serial, view, kind)? {
            files.push(file);
        }
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zone::DomainBuilder;

    fn domain() -> Domain {
        let mut builder = DomainBuilder::new("example.com");
        builder.soa("ns1").unwrap();
        builder
            .view("internal", |b| {
                b.prefix("192.168.1")?;
                Ok(())
            })
            .unwrap();
        builder.register_view("external").unwrap();
        builder.build()
    }

    #[test]
    fn test_file_names() {
        let domain = domain();
        assert_eq!(
            file_name(&domain, "internal", ZoneKind::Forward),
            "db.example.com@internal"
        );
        assert_eq!(
            file_name(&domain, "internal", ZoneKind::Reverse(Family::V4)),
            "db.example.com@internal.rev"
        );
        assert_eq!(
            file_name(&domain, "external", ZoneKind::Reverse(Family::V6)),
            "db.example.com@external.rev6"
        );
    }

    #[test]
    fn test_reverse_skipped_without_prefix() {
        let domain = domain();
        let internal: Vec<String> = render_view(&domain, 1, "internal")
            .unwrap()
            .into_iter()
            .map(|f| f.name)
            .collect();
        assert_eq!(
            internal,
            vec!["db.example.com@internal", "db.example.com@internal.rev"]
        );
        let external = render_view(&domain, 1, "external").unwrap();
        assert_eq!(external.len(), 1);
        assert!(render(&domain, 1, "external", ZoneKind::Reverse(Family::V4))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_header() {
        let domain = domain();
        let mut out = Vec::new();
        write_header(&mut out, &domain, 42, "internal", domain.fqdn()).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "$TTL 20m\n\
             $ORIGIN example.com.\n\
             @ SOA ns1.example.com. hostmaster.example.com. (42 1200 180 604800 1200)\n\
             @ NS ns1.example.com.\n"
        );
    }
}
