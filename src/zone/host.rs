use crate::error::{Result, ZoneError};
use crate::zone::attribute::{Attribute, EntityKind};
use crate::zone::node::Node;
use crate::zone::value::Value;

pub const DEFAULT_HOST: &str = "*";

/// A named host. Its identifier is the canonical name; `name` values add
/// aliases that answer with the same addresses.
#[derive(Clone, Debug)]
pub struct Host {
    id: String,
    node: Node,
}

impl Host {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            node: Node::new(EntityKind::Host, id),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn declare(&mut self, attribute: Attribute, value: Value, view: Option<&str>) -> Result<()> {
        if let (Attribute::Name, Some(view)) = (attribute, view) {
            return Err(ZoneError::ViewScopedName(view.to_string()));
        }
        self.node.add(attribute, value, view)
    }

    /// Canonical name followed by every alias, in declaration order.
    pub fn names(&self) -> Vec<&str> {
        let mut names = vec![self.id.as_str()];
        names.extend(
            self.node
                .declared(Attribute::Name, None)
                .iter()
                .filter_map(Value::as_str),
        );
        names
    }

    pub fn lookup(&self, attribute: Attribute, view: Option<&str>) -> Result<Vec<&Value>> {
        self.node.lookup(attribute, view)
    }
}

/// A host together with the default host it falls back to.
#[derive(Clone, Copy)]
pub struct HostRef<'a> {
    pub host: &'a Host,
    fallback: Option<&'a Host>,
}

impl<'a> HostRef<'a> {
    pub fn new(host: &'a Host, fallback: Option<&'a Host>) -> Self {
        Self { host, fallback }
    }

    /// The host's values for `view`; when it has none, the fallback's.
    pub fn resolve(&self, attribute: Attribute, view: Option<&str>) -> Result<Vec<&'a Value>> {
        let own = self.host.lookup(attribute, view)?;
        match self.fallback {
            Some(fallback) if own.is_empty() => fallback.lookup(attribute, view),
            _ => Ok(own),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address(s: &str) -> Value {
        Value::Address(s.to_string())
    }

    #[test]
    fn test_names() {
        let mut host = Host::new("host2");
        for alias in ["mail", "mx1", "www"] {
            host.declare(Attribute::Name, Value::Name(alias.to_string()), None)
                .unwrap();
        }
        assert_eq!(host.names(), vec!["host2", "mail", "mx1", "www"]);
    }

    #[test]
    fn test_view_scoped_name() {
        let mut host = Host::new("host1");
        let err = host
            .declare(
                Attribute::Name,
                Value::Name("vpn".to_string()),
                Some("internal"),
            )
            .unwrap_err();
        assert!(matches!(err, ZoneError::ViewScopedName(_)));
    }

    #[test]
    fn test_fallback_only_when_empty() {
        let mut default = Host::new(DEFAULT_HOST);
        default
            .declare(Attribute::Ip, address("1.1.1.1"), Some("external"))
            .unwrap();
        let mut host = Host::new("host1");
        host.declare(Attribute::Ip, address("192.168.1.1"), Some("internal"))
            .unwrap();
        host.declare(Attribute::Ip6, address("2001::1"), None).unwrap();

        let scoped = HostRef::new(&host, Some(&default));
        assert_eq!(
            scoped.resolve(Attribute::Ip, Some("internal")).unwrap(),
            vec![&address("192.168.1.1")]
        );
        assert_eq!(
            scoped.resolve(Attribute::Ip, Some("external")).unwrap(),
            vec![&address("1.1.1.1")]
        );
        // own ip6 wins, default host has none anyway
        assert_eq!(
            scoped.resolve(Attribute::Ip6, Some("external")).unwrap(),
            vec![&address("2001::1")]
        );

        let alone = HostRef::new(&host, None);
        assert!(alone.resolve(Attribute::Ip, Some("external")).unwrap().is_empty());
    }
}
