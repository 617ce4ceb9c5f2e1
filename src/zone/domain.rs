use crate::error::{Result, ZoneError};
use crate::zone::attribute::{Attribute, EntityKind};
use crate::zone::host::{Host, HostRef, DEFAULT_HOST};
use crate::zone::node::Node;
use crate::zone::value::Value;

const HOSTMASTER: &str = "hostmaster";

/// View labels become part of file names and must match `[A-Za-z0-9_-]+`.
pub fn check_view(view: &str) -> Result<()> {
    let valid = !view.is_empty()
        && view
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(ZoneError::InvalidView(view.to_string()))
    }
}

/// A domain with its apex records, hosts and views.
#[derive(Clone, Debug)]
pub struct Domain {
    fqdn: String,
    filename: String,
    hostmaster: String,
    node: Node,
    pub(super) hosts: Vec<Host>,
    pub(super) default_host: Host,
    pub(super) views: Vec<String>,
}

impl Domain {
    pub fn new(name: &str) -> Self {
        let mut fqdn = name.to_string();
        if !fqdn.ends_with('.') {
            fqdn.push('.');
        }
        let filename = fqdn.trim_end_matches('.').to_string();
        let hostmaster = format!("{}.{}", HOSTMASTER, fqdn);
        Self {
            node: Node::new(EntityKind::Domain, &fqdn),
            fqdn,
            filename,
            hostmaster,
            hosts: Vec::new(),
            default_host: Host::new(DEFAULT_HOST),
            views: Vec::new(),
        }
    }

    pub fn fqdn(&self) -> &str {
        &self.fqdn
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn hostmaster(&self) -> &str {
        &self.hostmaster
    }

    /// Declared view labels, in order of first appearance.
    pub fn views(&self) -> &[String] {
        &self.views
    }

    pub(super) fn register_view(&mut self, view: &str) -> Result<()> {
        check_view(view)?;
        if !self.views.iter().any(|v| v == view) {
            self.views.push(view.to_string());
        }
        Ok(())
    }

    /// Qualifies `name` against the domain unless it is already absolute.
    pub fn qualify(&self, name: &str) -> String {
        if name.ends_with('.') {
            name.to_string()
        } else {
            format!("{}.{}", name, self.fqdn)
        }
    }

    /// Stores an apex value. Names and record targets are qualified, and a
    /// second prefix for the same view is rejected.
    pub fn declare(&mut self, attribute: Attribute, value: Value, view: Option<&str>) -> Result<()> {
        self.node.check(attribute)?;
        if let Some(view) = view {
            check_view(view)?;
        }
        let value = match value {
            Value::Name(name) if matches!(attribute, Attribute::Soa | Attribute::Ns) => {
                Value::Name(self.qualify(&name))
            }
            Value::Mx(mut mx) => {
                mx.target = self.qualify(&mx.target);
                Value::Mx(mx)
            }
            Value::Srv(mut srv) => {
                srv.target = self.qualify(&srv.target);
                Value::Srv(srv)
            }
            other => other,
        };
        if let Attribute::Prefix | Attribute::Prefix6 = attribute {
            if !self.node.declared(attribute, view).is_empty() {
                return Err(ZoneError::DuplicatePrefix {
                    family: if attribute == Attribute::Prefix { "prefix" } else { "prefix6" },
                    view: view.unwrap_or("the default view").to_string(),
                });
            }
        }
        self.node.add(attribute, value, view)?;
        if let Some(view) = view {
            self.register_view(view)?;
        }
        Ok(())
    }

    /// Apex values of `attribute` visible from `view`.
    pub fn resolve(&self, attribute: Attribute, view: Option<&str>) -> Result<Vec<&Value>> {
        self.node.lookup(attribute, view)
    }

    /// Primary name server for `view`.
    pub fn soa(&self, view: Option<&str>) -> Result<&str> {
        self.resolve(Attribute::Soa, view)?
            .into_iter()
            .find_map(Value::as_str)
            .ok_or_else(|| ZoneError::MissingSoa {
                domain: self.fqdn.clone(),
                view: view.unwrap_or_default().to_string(),
            })
    }

    /// Reverse prefix of the family `attribute` names, the view's own before
    /// the default one.
    pub fn prefix(&self, attribute: Attribute, view: Option<&str>) -> Result<Option<&str>> {
        Ok(self
            .resolve(attribute, view)?
            .into_iter()
            .find_map(Value::as_str))
    }

    /// Named hosts in declaration order, each with the default host as fallback.
    pub fn hosts(&self) -> impl Iterator<Item = HostRef<'_>> {
        self.hosts
            .iter()
            .map(move |host| HostRef::new(host, Some(&self.default_host)))
    }
}
