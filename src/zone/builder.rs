use crate::error::{Result, ZoneError};
use crate::zone::attribute::Attribute;
use crate::zone::domain::{check_view, Domain};
use crate::zone::host::{Host, DEFAULT_HOST};
use crate::zone::value::{Mx, Srv, Txt, Value};

/// Resolves the view a declaration lands in: an explicit view inside an
/// open view scope is a nested view.
fn scope<'v>(current: Option<&'v str>, explicit: Option<&'v str>) -> Result<Option<&'v str>> {
    if let Some(view) = explicit {
        check_view(view)?;
    }
    match (current, explicit) {
        (Some(outer), Some(inner)) => Err(ZoneError::NestedView {
            outer: outer.to_string(),
            inner: inner.to_string(),
        }),
        (current, explicit) => Ok(explicit.or(current)),
    }
}

/// Populates a [`Domain`].
///
/// ```ignore
/// let mut builder = DomainBuilder::new("example.com");
/// builder.soa("ns1")?.ip6("2001::1")?;
/// builder.view("internal", |b| {
///     b.ip("192.168.1.1")?.prefix("192.168.1")?;
///     Ok(())
/// })?;
/// builder.host("www", |h| {
///     h.ip("192.168.1.2")?.name("web")?;
///     Ok(())
/// })?;
/// let domain = builder.build();
/// ```
pub struct DomainBuilder {
    domain: Domain,
    current_view: Option<String>,
}

impl DomainBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            domain: Domain::new(name),
            current_view: None,
        }
    }

    pub fn build(self) -> Domain {
        self.domain
    }

    /// Registers a view without declaring anything in it.
    pub fn register_view(&mut self, view: &str) -> Result<&mut Self> {
        self.domain.register_view(view)?;
        Ok(self)
    }

    /// Runs `block` with every declaration scoped to `view`.
    pub fn view<F>(&mut self, view: &str, block: F) -> Result<&mut Self>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        scope(self.current_view.as_deref(), Some(view))?;
        self.domain.register_view(view)?;
        self.current_view = Some(view.to_string());
        let result = block(self);
        self.current_view = None;
        result.map(|_| self)
    }

    /// Declares `value` in the open view scope.
    pub fn declare(&mut self, attribute: Attribute, value: Value) -> Result<&mut Self> {
        self.declare_in(attribute, value, None)
    }

    /// Declares `value` under `view`, which must not be given inside a view scope.
    pub fn declare_in(
        &mut self,
        attribute: Attribute,
        value: Value,
        view: Option<&str>,
    ) -> Result<&mut Self> {
        let current = self.current_view.clone();
        let view = scope(current.as_deref(), view)?;
        if attribute == Attribute::Soa {
            self.domain.declare(Attribute::Soa, value.clone(), view)?;
            self.domain.declare(Attribute::Ns, value, view)?;
        } else {
            self.domain.declare(attribute, value, view)?;
        }
        Ok(self)
    }

    /// Primary name server; also published as an NS record.
    pub fn soa(&mut self, name: &str) -> Result<&mut Self> {
        self.declare(Attribute::Soa, Value::Name(name.to_string()))
    }

    pub fn ns(&mut self, name: &str) -> Result<&mut Self> {
        self.declare(Attribute::Ns, Value::Name(name.to_string()))
    }

    pub fn mx(&mut self, priority: u16, target: &str) -> Result<&mut Self> {
        self.declare(
            Attribute::Mx,
            Value::Mx(Mx {
                priority,
                target: target.to_string(),
            }),
        )
    }

    pub fn ip(&mut self, address: &str) -> Result<&mut Self> {
        self.declare(Attribute::Ip, Value::Address(address.to_string()))
    }

    pub fn ip6(&mut self, address: &str) -> Result<&mut Self> {
        self.declare(Attribute::Ip6, Value::Address(address.to_string()))
    }

    pub fn prefix(&mut self, prefix: &str) -> Result<&mut Self> {
        self.declare(Attribute::Prefix, Value::Prefix(prefix.to_string()))
    }

    pub fn prefix6(&mut self, prefix: &str) -> Result<&mut Self> {
        self.declare(Attribute::Prefix6, Value::Prefix(prefix.to_string()))
    }

    pub fn srv(
        &mut self,
        service: &str,
        proto: &str,
        priority: u16,
        weight: u16,
        port: u16,
        target: &str,
    ) -> Result<&mut Self> {
        self.declare(
            Attribute::Srv,
            Value::Srv(Srv {
                service: service.to_string(),
                proto: proto.to_string(),
                priority,
                weight,
                port,
                target: target.to_string(),
            }),
        )
    }

    pub fn txt(&mut self, name: &str, text: &str) -> Result<&mut Self> {
        self.declare(
            Attribute::Txt,
            Value::Txt(Txt {
                name: name.to_string(),
                text: text.to_string(),
            }),
        )
    }

    /// Opens host `id` (`*` for the default host), creating it on first use.
    /// The host inherits the open view scope.
    pub fn host<F>(&mut self, id: &str, block: F) -> Result<&mut Self>
    where
        F: FnOnce(&mut HostBuilder) -> Result<()>,
    {
        let domain = &mut self.domain;
        let host = if id == DEFAULT_HOST {
            &mut domain.default_host
        } else {
            let index = match domain.hosts.iter().position(|h| h.id() == id) {
                Some(index) => index,
                None => {
                    domain.hosts.push(Host::new(id));
                    domain.hosts.len() - 1
                }
            };
            &mut domain.hosts[index]
        };
        let mut builder = HostBuilder {
            host,
            views: &mut domain.views,
            outer_view: self.current_view.clone(),
            current_view: None,
        };
        block(&mut builder)?;
        Ok(self)
    }
}

/// Populates one [`Host`] of a domain.
pub struct HostBuilder<'a> {
    host: &'a mut Host,
    views: &'a mut Vec<String>,
    outer_view: Option<String>,
    current_view: Option<String>,
}

impl HostBuilder<'_> {
    fn open_view(&self) -> Option<&str> {
        self.current_view.as_deref().or(self.outer_view.as_deref())
    }

    pub fn view<F>(&mut self, view: &str, block: F) -> Result<&mut Self>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        scope(self.open_view(), Some(view))?;
        self.register(view);
        self.current_view = Some(view.to_string());
        let result = block(self);
        self.current_view = None;
        result.map(|_| self)
    }

    pub fn declare(&mut self, attribute: Attribute, value: Value) -> Result<&mut Self> {
        self.declare_in(attribute, value, None)
    }

    pub fn declare_in(
        &mut self,
        attribute: Attribute,
        value: Value,
        view: Option<&str>,
    ) -> Result<&mut Self> {
        // aliases ignore the enclosing domain view; only the host's own scope counts
        let open = if attribute == Attribute::Name {
            self.current_view.clone()
        } else {
            self.open_view().map(str::to_string)
        };
        let view = scope(open.as_deref(), view)?;
        self.host.declare(attribute, value, view)?;
        if let Some(view) = view {
            self.register(view);
        }
        Ok(self)
    }

    fn register(&mut self, view: &str) {
        if !self.views.iter().any(|v| v == view) {
            self.views.push(view.to_string());
        }
    }

    pub fn ip(&mut self, address: &str) -> Result<&mut Self> {
        self.declare(Attribute::Ip, Value::Address(address.to_string()))
    }

    pub fn ip6(&mut self, address: &str) -> Result<&mut Self> {
        self.declare(Attribute::Ip6, Value::Address(address.to_string()))
    }

    /// Adds an alias answering with this host's addresses in every view.
    pub fn name(&mut self, alias: &str) -> Result<&mut Self> {
        self.declare(Attribute::Name, Value::Name(alias.to_string()))
    }
}
