use crate::error::{Result, ZoneError};
use std::fmt::{Display, Formatter};

/// Record types an entity can declare.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Attribute {
    Soa,
    Ip,
    Ip6,
    Mx,
    Ns,
    Prefix,
    Prefix6,
    Srv,
    Txt,
    Name,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityKind {
    Domain,
    Host,
}

const DOMAIN_ATTRIBUTES: &[Attribute] = &[
    Attribute::Soa,
    Attribute::Ip,
    Attribute::Ip6,
    Attribute::Mx,
    Attribute::Ns,
    Attribute::Prefix,
    Attribute::Prefix6,
    Attribute::Srv,
    Attribute::Txt,
];

const HOST_ATTRIBUTES: &[Attribute] = &[Attribute::Ip, Attribute::Ip6, Attribute::Name];

impl Attribute {
    /// Parses a declared attribute name, accepting the `net`/`net6` and
    /// `alias`/`cname` spellings. `entity` names the declaring entity in errors.
    pub fn parse(name: &str, entity: &str) -> Result<Self> {
        let attribute = match name {
            "soa" => Attribute::Soa,
            "ip" => Attribute::Ip,
            "ip6" => Attribute::Ip6,
            "mx" => Attribute::Mx,
            "ns" => Attribute::Ns,
            "prefix" | "net" => Attribute::Prefix,
            "prefix6" | "net6" => Attribute::Prefix6,
            "srv" => Attribute::Srv,
            "txt" => Attribute::Txt,
            "name" | "alias" | "cname" => Attribute::Name,
            _ => {
                return Err(ZoneError::UnsupportedRecordType {
                    entity: entity.to_string(),
                    attribute: name.to_string(),
                })
            }
        };
        Ok(attribute)
    }
}

impl EntityKind {
    pub fn attributes(&self) -> &'static [Attribute] {
        match self {
            EntityKind::Domain => DOMAIN_ATTRIBUTES,
            EntityKind::Host => HOST_ATTRIBUTES,
        }
    }

    pub fn check(&self, attribute: Attribute, entity: &str) -> Result<()> {
        if self.attributes().contains(&attribute) {
            Ok(())
        } else {
            Err(ZoneError::UnsupportedRecordType {
                entity: entity.to_string(),
                attribute: attribute.to_string(),
            })
        }
    }
}

impl Display for Attribute {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Attribute::Soa => "soa",
            Attribute::Ip => "ip",
            Attribute::Ip6 => "ip6",
            Attribute::Mx => "mx",
            Attribute::Ns => "ns",
            Attribute::Prefix => "prefix",
            Attribute::Prefix6 => "prefix6",
            Attribute::Srv => "srv",
            Attribute::Txt => "txt",
            Attribute::Name => "name",
        };
        f.write_str(name)
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Domain => f.write_str("domain"),
            EntityKind::Host => f.write_str("host"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases() {
        assert_eq!(Attribute::parse("net6", "domain").unwrap(), Attribute::Prefix6);
        assert_eq!(Attribute::parse("net", "domain").unwrap(), Attribute::Prefix);
        assert_eq!(Attribute::parse("cname", "host").unwrap(), Attribute::Name);
        assert_eq!(Attribute::parse("alias", "host").unwrap(), Attribute::Name);
    }

    #[test]
    fn test_unknown_name() {
        let err = Attribute::parse("caa", "domain example.com.").unwrap_err();
        assert_eq!(
            err.to_string(),
            "unsupported record type caa for domain example.com."
        );
    }

    #[test]
    fn test_legal_sets() {
        assert!(EntityKind::Host.check(Attribute::Ip6, "host www").is_ok());
        assert!(EntityKind::Domain.check(Attribute::Txt, "domain").is_ok());
        let err = EntityKind::Host.check(Attribute::Mx, "host www").unwrap_err();
        assert_eq!(err.to_string(), "unsupported record type mx for host www");
        assert!(matches!(
            EntityKind::Domain.check(Attribute::Name, "domain"),
            Err(ZoneError::UnsupportedRecordType { .. })
        ));
    }
}
