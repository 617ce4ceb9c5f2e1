use crate::datasource::{DataSource, Declaration};
use crate::error::{Result, ZoneError};
use crate::zone::builder::HostBuilder;
use crate::zone::value::{Mx, Srv, Txt};
use crate::zone::{Attribute, Domain, DomainBuilder, Value};
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use serde::Deserialize;
use serde_yaml::{Mapping, Value as Yaml};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Loads domain declarations from a YAML file or a directory of them.
pub struct YamlDataSource {
    path: PathBuf,
    serial: Option<u32>,
    mtimes: HashMap<PathBuf, SystemTime>,
}

impl YamlDataSource {
    /// `serial` overrides the serial of every declaration when set.
    pub fn new(path: impl Into<PathBuf>, serial: Option<u32>) -> Self {
        Self {
            path: path.into(),
            serial,
            mtimes: HashMap::new(),
        }
    }

    fn files(&self) -> Result<Vec<PathBuf>> {
        if self.path.is_file() {
            return Ok(vec![self.path.clone()]);
        }
        let mut files = Vec::new();
        for entry in fs::read_dir(&self.path)? {
            let path = entry?.path();
            let hidden = path
                .file_name()
                .and_then(|name| name.to_str())
                .map_or(true, |name| name.starts_with('.'));
            let yaml = matches!(
                path.extension().and_then(|ext| ext.to_str()),
                Some("yaml") | Some("yml")
            );
            if !hidden && yaml && path.is_file() {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    fn load(&self, path: &Path) -> Result<Declaration> {
        let file = path.display().to_string();
        let text = fs::read_to_string(path)?;
        let (domain, declared_serial) = parse_domain(&text, &file)?;
        let serial = match self.serial.or(declared_serial) {
            Some(serial) => serial,
            None => mtime_serial(fs::metadata(path)?.modified()?),
        };
        Ok(Declaration {
            domain,
            serial,
            source: path.to_path_buf(),
        })
    }
}

impl DataSource for YamlDataSource {
    fn update(&mut self) -> Result<bool> {
        let mut mtimes = HashMap::new();
        for path in self.files()? {
            let modified = fs::metadata(&path)?.modified()?;
            mtimes.insert(path, modified);
        }
        if mtimes == self.mtimes {
            return Ok(false);
        }
        self.mtimes = mtimes;
        Ok(true)
    }

    fn get_declarations(&self) -> Result<Vec<Declaration>> {
        self.files()?.iter().map(|path| self.load(path)).collect()
    }
}

/// Unix seconds of a modification time, truncated to 32 bits.
fn mtime_serial(modified: SystemTime) -> u32 {
    modified
        .duration_since(UNIX_EPOCH)
        .map(|age| age.as_secs() as u32)
        .unwrap_or_default()
}

fn declaration(file: &str, reason: impl Into<String>) -> ZoneError {
    ZoneError::Declaration {
        file: file.to_string(),
        reason: reason.into(),
    }
}

/// Splits `ip_internal` into the attribute name and its view.
fn split_key(key: &str) -> Option<(&str, Option<&str>)> {
    lazy_static! {
        static ref KEY_REGEX: Regex = Regex::new(r"^([a-z][a-z0-9]*)(?:_(.+))?$").unwrap();
    }
    let captures = KEY_REGEX.captures(key)?;
    let attribute = captures.get(1)?.as_str();
    let view = captures.get(2).map(|view| view.as_str());
    Some((attribute, view))
}

/// Strings and integers only: an unquoted `10.10` is the float 10.1.
fn scalar(attribute: Attribute, value: &Yaml) -> Result<String> {
    match value {
        Yaml::String(s) => Ok(s.clone()),
        Yaml::Number(n) if n.is_u64() => Ok(n.to_string()),
        Yaml::Number(n) => Err(ZoneError::InvalidValue {
            attribute: attribute.to_string(),
            reason: format!("{} must be quoted", n),
        }),
        other => Err(ZoneError::InvalidValue {
            attribute: attribute.to_string(),
            reason: format!("expected a string, got {:?}", other),
        }),
    }
}

fn number(attribute: Attribute, value: &Yaml) -> Result<u16> {
    value
        .as_u64()
        .and_then(|n| u16::try_from(n).ok())
        .ok_or_else(|| ZoneError::InvalidValue {
            attribute: attribute.to_string(),
            reason: format!("expected a number up to 65535, got {:?}", value),
        })
}

fn tuple(attribute: Attribute, items: &[Yaml]) -> Result<Value> {
    let arity = match attribute {
        Attribute::Mx | Attribute::Txt => 2,
        _ => 6,
    };
    if items.len() != arity {
        return Err(ZoneError::InvalidValue {
            attribute: attribute.to_string(),
            reason: format!("expected {} fields, got {}", arity, items.len()),
        });
    }
    let value = match attribute {
        Attribute::Mx => Value::Mx(Mx {
            priority: number(attribute, &items[0])?,
            target: scalar(attribute, &items[1])?,
        }),
        Attribute::Txt => Value::Txt(Txt {
            name: scalar(attribute, &items[0])?,
            text: scalar(attribute, &items[1])?,
        }),
        _ => Value::Srv(Srv {
            service: scalar(attribute, &items[0])?,
            proto: scalar(attribute, &items[1])?,
            priority: number(attribute, &items[2])?,
            weight: number(attribute, &items[3])?,
            port: number(attribute, &items[4])?,
            target: scalar(attribute, &items[5])?,
        }),
    };
    Ok(value)
}

/// Converts the YAML value of one key into declared values. Tuple records
/// take a sequence, or a sequence of sequences for several records.
fn values(attribute: Attribute, value: &Yaml) -> Result<Vec<Value>> {
    match attribute {
        Attribute::Mx | Attribute::Srv | Attribute::Txt => match value {
            Yaml::Sequence(items) if items.iter().all(Yaml::is_sequence) => items
                .iter()
                .filter_map(Yaml::as_sequence)
                .map(|fields| tuple(attribute, fields))
                .collect(),
            Yaml::Sequence(items) => Ok(vec![tuple(attribute, items)?]),
            other => Err(ZoneError::InvalidValue {
                attribute: attribute.to_string(),
                reason: format!("expected a sequence, got {:?}", other),
            }),
        },
        _ => {
            let wrap = |s: String| match attribute {
                Attribute::Ip | Attribute::Ip6 => Value::Address(s),
                Attribute::Prefix | Attribute::Prefix6 => Value::Prefix(s),
                _ => Value::Name(s),
            };
            match value {
                Yaml::Sequence(items) => items
                    .iter()
                    .map(|item| scalar(attribute, item).map(wrap))
                    .collect(),
                other => Ok(vec![wrap(scalar(attribute, other)?)]),
            }
        }
    }
}

/// Parses `key: value` into declarations passed to `declare`.
fn declare_key<F>(key: &str, value: &Yaml, entity: &str, mut declare: F) -> Result<()>
where
    F: FnMut(Attribute, Value, Option<&str>) -> Result<()>,
{
    let (name, view) = split_key(key).ok_or_else(|| ZoneError::UnsupportedRecordType {
        entity: entity.to_string(),
        attribute: key.to_string(),
    })?;
    let attribute = Attribute::parse(name, entity)?;
    for value in values(attribute, value)? {
        declare(attribute, value, view)?;
    }
    Ok(())
}

fn mapping<'a>(value: &'a Yaml, what: &str, file: &str) -> Result<&'a Mapping> {
    value
        .as_mapping()
        .ok_or_else(|| declaration(file, format!("{} must be a mapping", what)))
}

fn key_str<'a>(key: &'a Yaml, file: &str) -> Result<&'a str> {
    key.as_str()
        .ok_or_else(|| declaration(file, format!("key {:?} is not a string", key)))
}

fn host_entries(builder: &mut HostBuilder, entity: &str, entries: &Mapping, file: &str) -> Result<()> {
    for (key, value) in entries {
        match key_str(key, file)? {
            "view" => {
                for (view, block) in mapping(value, "view", file)? {
                    let block = mapping(block, "view block", file)?;
                    builder.view(key_str(view, file)?, |h| host_entries(h, entity, block, file))?;
                }
            }
            key => declare_key(key, value, entity, |attribute, value, view| {
                builder.declare_in(attribute, value, view).map(|_| ())
            })?,
        }
    }
    Ok(())
}

fn domain_entries(builder: &mut DomainBuilder, entity: &str, entries: &Mapping, file: &str) -> Result<()> {
    let empty = Mapping::new();
    for (key, value) in entries {
        match key_str(key, file)? {
            "domain" | "serial" | "views" => {}
            "view" => {
                for (view, block) in mapping(value, "view", file)? {
                    let block = mapping(block, "view block", file)?;
                    builder.view(key_str(view, file)?, |b| domain_entries(b, entity, block, file))?;
                }
            }
            "hosts" => {
                for (id, entries) in mapping(value, "hosts", file)? {
                    let id = match id {
                        Yaml::Number(n) => n.to_string(),
                        other => key_str(other, file)?.to_string(),
                    };
                    let host_entity = format!("host {}", id);
                    let entries = match entries {
                        Yaml::Null => &empty,
                        entries => mapping(entries, "host", file)?,
                    };
                    builder.host(&id, |h| host_entries(h, &host_entity, entries, file))?;
                }
            }
            key => declare_key(key, value, entity, |attribute, value, view| {
                builder.declare_in(attribute, value, view).map(|_| ())
            })?,
        }
    }
    Ok(())
}

/// Keys of a declaration document that are not records.
#[derive(Deserialize)]
struct Header {
    domain: String,
    serial: Option<u32>,
    #[serde(default)]
    views: Vec<String>,
}

/// Builds a domain from one YAML document, also returning its `serial` key.
pub fn parse_domain(text: &str, file: &str) -> Result<(Domain, Option<u32>)> {
    let document: Yaml = serde_yaml::from_str(text)?;
    let header: Header = serde_yaml::from_value(document.clone())
        .map_err(|e| declaration(file, e.to_string()))?;
    let document = mapping(&document, "document", file)?;

    let mut builder = DomainBuilder::new(&header.domain);
    for view in &header.views {
        builder.register_view(view)?;
    }
    let entity = format!("domain {}", header.domain);
    domain_entries(&mut builder, &entity, document, file)?;
    let domain = builder.build();
    debug!(
        "Declared {} with views {:?} from {}",
        domain.fqdn(),
        domain.views(),
        file
    );
    Ok((domain, header.serial))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const EXAMPLE: &str = r#"
domain: example.com
views: [internal, external]
soa: ns1
ip_external: 1.1.1.1
ip_internal: 192.168.1.1
ip6: "2001::1"
prefix_internal: "192.168.1"
prefix6: "2001::/64"
mx: [10, mx1]
ns_external: ns1.example.org.
hosts:
  "*":
    ip_external: 1.1.1.1
  host1:
    ip_internal: 192.168.1.1
    ip6: "2001::1"
    name: vpn
  host2:
    ip_internal: 192.168.1.2
    ip6: "2001::2"
    name: [mail, mx1, www, ns1]
srv:
  - [kerberos, udp, 0, 0, 88, kdc1]
  - [kerberos, tcp, 0, 0, 88, kdc1]
  - [kerberos-tls, tcp, 0, 0, 88, kdc1]
txt: [_kerberos, EXAMPLE.COM]
"#;

    fn strs(values: Vec<&Value>) -> Vec<&str> {
        values.into_iter().filter_map(Value::as_str).collect()
    }

    #[test]
    fn test_split_key() {
        assert_eq!(split_key("ip"), Some(("ip", None)));
        assert_eq!(split_key("ip6_internal"), Some(("ip6", Some("internal"))));
        assert_eq!(split_key("ns_dmz_west"), Some(("ns", Some("dmz_west"))));
        assert_eq!(split_key("_bad"), None);
    }

    #[test]
    fn test_parse_example() {
        let (domain, serial) = parse_domain(EXAMPLE, "example.yaml").unwrap();
        assert_eq!(serial, None);
        assert_eq!(domain.fqdn(), "example.com.");
        assert_eq!(domain.views(), &["internal", "external"]);
        assert_eq!(
            strs(domain.resolve(Attribute::Ip, Some("external")).unwrap()),
            vec!["1.1.1.1"]
        );
        assert_eq!(
            strs(domain.resolve(Attribute::Ns, Some("external")).unwrap()),
            vec!["ns1.example.org.", "ns1.example.com."]
        );
        assert_eq!(domain.resolve(Attribute::Srv, Some("internal")).unwrap().len(), 3);
        let ids: Vec<&str> = domain.hosts().map(|h| h.host.id()).collect();
        assert_eq!(ids, vec!["host1", "host2"]);
        let host2 = domain.hosts().nth(1).unwrap();
        assert_eq!(host2.host.names(), vec!["host2", "mail", "mx1", "www", "ns1"]);
        assert_eq!(
            strs(host2.resolve(Attribute::Ip, Some("external")).unwrap()),
            vec!["1.1.1.1"]
        );
    }

    #[test]
    fn test_view_blocks() {
        let text = r#"
domain: example.net
soa: ns1
serial: 2024010101
view:
  internal:
    ip: 10.0.0.1
    prefix: "10.0.0"
    hosts:
      db:
        ip: 10.0.0.5
"#;
        let (domain, serial) = parse_domain(text, "net.yaml").unwrap();
        assert_eq!(serial, Some(2024010101));
        assert_eq!(domain.views(), &["internal"]);
        let db = domain.hosts().next().unwrap();
        assert!(db.resolve(Attribute::Ip, Some("external")).unwrap().is_empty());
        assert_eq!(
            domain.prefix(Attribute::Prefix, Some("internal")).unwrap(),
            Some("10.0.0")
        );
    }

    #[test]
    fn test_nested_view_rejected() {
        let text = r#"
domain: example.net
view:
  internal:
    ip_external: 10.0.0.1
"#;
        assert!(matches!(
            parse_domain(text, "net.yaml"),
            Err(ZoneError::NestedView { .. })
        ));
        let text = r#"
domain: example.net
view:
  internal:
    view:
      external:
        ip: 10.0.0.1
"#;
        assert!(matches!(
            parse_domain(text, "net.yaml"),
            Err(ZoneError::NestedView { .. })
        ));
    }

    #[test]
    fn test_unsupported_record_type() {
        let text = "domain: example.net\ncaa: letsencrypt.org\n";
        let err = parse_domain(text, "net.yaml").unwrap_err();
        assert_eq!(
            err.to_string(),
            "unsupported record type caa for domain example.net"
        );
        let text = "domain: example.net\nhosts:\n  www:\n    mx: [10, mx1]\n";
        let err = parse_domain(text, "net.yaml").unwrap_err();
        assert_eq!(err.to_string(), "unsupported record type mx for host www");
    }

    #[test]
    fn test_bad_values() {
        let text = "domain: example.net\nip: 2001::1\n";
        assert!(matches!(
            parse_domain(text, "net.yaml"),
            Err(ZoneError::InvalidAddress(_))
        ));
        let text = "domain: example.net\nmx: [10]\n";
        assert!(matches!(
            parse_domain(text, "net.yaml"),
            Err(ZoneError::InvalidValue { .. })
        ));
        let text = "soa: ns1\n";
        let err = parse_domain(text, "net.yaml").unwrap_err();
        assert!(matches!(err, ZoneError::Declaration { .. }));
        assert!(err.to_string().starts_with("invalid declaration in net.yaml: missing field `domain`"));
        let text = "domain: example.net\nserial: -1\n";
        assert!(matches!(
            parse_domain(text, "net.yaml"),
            Err(ZoneError::Declaration { .. })
        ));
    }

    #[test]
    fn test_unquoted_float_prefix() {
        let text = "domain: example.net\nprefix: 10.10\n";
        let err = parse_domain(text, "net.yaml").unwrap_err();
        assert!(matches!(err, ZoneError::InvalidValue { .. }));
        assert_eq!(err.to_string(), "invalid value for prefix: 10.1 must be quoted");

        let text = "domain: example.net\nprefix_internal: \"10.10\"\n";
        let (domain, _) = parse_domain(text, "net.yaml").unwrap();
        assert_eq!(
            domain.prefix(Attribute::Prefix, Some("internal")).unwrap(),
            Some("10.10")
        );
        let text = "domain: example.net\nprefix_internal: 10\n";
        let (domain, _) = parse_domain(text, "net.yaml").unwrap();
        assert_eq!(
            domain.prefix(Attribute::Prefix, Some("internal")).unwrap(),
            Some("10")
        );
    }

    #[test]
    fn test_alias_in_view_block() {
        let text = r#"
domain: example.net
view:
  internal:
    hosts:
      www:
        ip: 10.0.0.5
        name: web
"#;
        let (domain, _) = parse_domain(text, "net.yaml").unwrap();
        let www = domain.hosts().next().unwrap();
        assert_eq!(www.host.names(), vec!["www", "web"]);
        assert_eq!(
            strs(www.resolve(Attribute::Ip, Some("internal")).unwrap()),
            vec!["10.0.0.5"]
        );
        assert!(www.resolve(Attribute::Ip, Some("external")).unwrap().is_empty());
    }

    #[test]
    fn test_view_label_rejected() {
        let text = "domain: example.net\nip_../x: 10.0.0.1\n";
        assert!(matches!(
            parse_domain(text, "net.yaml"),
            Err(ZoneError::InvalidView(_))
        ));
        let text = "domain: example.net\nviews: [\"a/b\"]\n";
        assert!(matches!(
            parse_domain(text, "net.yaml"),
            Err(ZoneError::InvalidView(_))
        ));
    }

    #[test]
    fn test_source_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = fs::File::create(dir.path().join("example.com.yaml")).unwrap();
        file.write_all(EXAMPLE.as_bytes()).unwrap();
        fs::write(dir.path().join(".hidden.yaml"), "garbage: [").unwrap();
        fs::write(dir.path().join("README"), "not a declaration").unwrap();

        let mut source = YamlDataSource::new(dir.path(), Some(5));
        assert!(source.update().unwrap());
        assert!(!source.update().unwrap());
        let declarations = source.get_declarations().unwrap();
        assert_eq!(declarations.len(), 1);
        assert_eq!(declarations[0].serial, 5);
        assert_eq!(declarations[0].domain.filename(), "example.com");
    }

    #[test]
    fn test_serial_from_mtime() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("example.com.yaml");
        fs::write(&path, EXAMPLE).unwrap();
        let source = YamlDataSource::new(&path, None);
        let declarations = source.get_declarations().unwrap();
        let modified = fs::metadata(&path).unwrap().modified().unwrap();
        assert_eq!(declarations[0].serial, mtime_serial(modified));
        assert!(declarations[0].serial > 0);
    }
}
