use crate::error::Result;
use crate::zone::{Attribute, Domain, Value};
use crate::zonefile::write_header;
use std::io::Write;

/// One block of A/AAAA records, repeated for every name of the entity.
fn write_addresses<W: Write>(
    out: &mut W,
    names: &[&str],
    ip: &[&Value],
    ip6: &[&Value],
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "; {}", names[0])?;
    for name in names {
        for address in ip.iter().filter_map(|v| v.as_str()) {
            writeln!(out, "{} A {}", name, address)?;
        }
        for address in ip6.iter().filter_map(|v| v.as_str()) {
            writeln!(out, "{} AAAA {}", name, address)?;
        }
    }
    Ok(())
}

fn escape_txt(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Forward zone of `view`: SOA, NS and MX at the apex, address blocks for
/// the apex and every host, then SRV and TXT records.
pub fn write_forward<W: Write>(out: &mut W, domain: &Domain, serial: u32, view: &str) -> Result<()> {
    write_header(out, domain, serial, view, domain.fqdn())?;
    let view = Some(view);

    for value in domain.resolve(Attribute::Mx, view)? {
        if let Value::Mx(mx) = value {
            writeln!(out, "@ MX {} {}", mx.priority, mx.target)?;
        }
    }

    write_addresses(
        out,
        &["@"],
        &domain.resolve(Attribute::Ip, view)?,
        &domain.resolve(Attribute::Ip6, view)?,
    )?;

    for host in domain.hosts() {
        write_addresses(
            out,
            &host.host.names(),
            &host.resolve(Attribute::Ip, view)?,
            &host.resolve(Attribute::Ip6, view)?,
        )?;
    }

    let srv = domain.resolve(Attribute::Srv, view)?;
    let txt = domain.resolve(Attribute::Txt, view)?;
    if !srv.is_empty() || !txt.is_empty() {
        writeln!(out)?;
    }
    for value in srv {
        if let Value::Srv(srv) = value {
            writeln!(
                out,
                "_{}._{} SRV {} {} {} {}",
                srv.service, srv.proto, srv.priority, srv.weight, srv.port, srv.target
            )?;
        }
    }
    for value in txt {
        if let Value::Txt(txt) = value {
            writeln!(out, "{} TXT \"{}\"", txt.name, escape_txt(&txt.text))?;
        }
    }
    Ok(())
}
