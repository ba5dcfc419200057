//! CSV export and import of names, locks and expansions.
//!
//! Columns: `cidr,name,locked,expanded` with `1`/`0` flags.

use crate::models::Session;
use std::collections::{BTreeMap, BTreeSet};
use std::error::Error;

const HEADER: [&str; 4] = ["cidr", "name", "locked", "expanded"];

fn flag(on: bool) -> &'static str {
    if on {
        "1"
    } else {
        "0"
    }
}

/// One row per named, locked or expanded CIDR plus the root, sorted by text.
pub fn export_csv(session: &Session) -> Result<String, Box<dyn Error>> {
    let view = &session.view;
    let mut cidrs: BTreeSet<&str> = BTreeSet::new();
    cidrs.extend(view.names.keys().map(String::as_str));
    cidrs.extend(view.locked.iter().map(String::as_str));
    cidrs.extend(view.expanded.iter().map(String::as_str));
    let root = session.root().ok();
    if let Some(root) = &root {
        cidrs.insert(root.cidr());
    }

    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Necessary)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record(HEADER)?;
    for cidr in cidrs {
        writer.write_record([
            cidr,
            view.name(cidr).unwrap_or(""),
            flag(view.is_locked(cidr)),
            flag(view.is_expanded(cidr)),
        ])?;
    }
    let bytes = writer.into_inner().map_err(|e| format!("Error flushing CSV: {e}"))?;
    Ok(String::from_utf8(bytes)?)
}

/// Replace names, locks and expansions from CSV text.
///
/// Input without a `cidr...` header row, or with no data rows, is rejected and
/// leaves the session untouched.
pub fn import_csv(session: &mut Session, text: &str) -> Result<usize, Box<dyn Error>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::None)
        .from_reader(text.as_bytes());
    let header_ok = reader
        .headers()?
        .get(0)
        .map(|h| h.trim().to_lowercase().starts_with("cidr"))
        .unwrap_or(false);
    if !header_ok {
        return Err("CSV must start with a cidr,name,locked,expanded header".into());
    }

    let mut expanded = BTreeSet::new();
    let mut locked = BTreeSet::new();
    let mut names = BTreeMap::new();
    let mut count = 0;
    for record in reader.records() {
        let record = record?;
        let cidr = record.get(0).unwrap_or("");
        if cidr.trim().is_empty() {
            continue;
        }
        count += 1;
        let name = record.get(1).unwrap_or("");
        if !name.is_empty() {
            names.insert(cidr.to_string(), name.to_string());
        }
        if record.get(2) == Some("1") {
            locked.insert(cidr.to_string());
        }
        if record.get(3) == Some("1") {
            expanded.insert(cidr.to_string());
        }
    }
    if count == 0 {
        return Err("CSV has no data rows".into());
    }
    log::info!("Imported {count} CSV rows");
    session.view.names = names;
    session.view.locked = locked;
    session.view.expanded = expanded;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_session() -> Session {
        let mut session = Session::default();
        session.view.expand("10.0.0.0/16");
        session.view.set_name("10.0.1.0/24", "web, \"edge\"");
        session.view.toggle_lock("10.0.2.0/24");
        session
    }

    #[test]
    fn test_export_csv() {
        let csv = export_csv(&sample_session()).unwrap();
        assert_eq!(
            csv,
            "cidr,name,locked,expanded\n\
             10.0.0.0/16,,0,1\n\
             10.0.1.0/24,\"web, \"\"edge\"\"\",1,0\n\
             10.0.2.0/24,,1,0\n"
        );
    }

    #[test]
    fn test_export_then_import() {
        let session = sample_session();
        let csv = export_csv(&session).unwrap();
        let mut restored = Session::default();
        assert_eq!(import_csv(&mut restored, &csv).unwrap(), 3);
        assert_eq!(restored.view.names, session.view.names);
        assert_eq!(restored.view.locked, session.view.locked);
        assert_eq!(restored.view.expanded, session.view.expanded);
    }

    #[test]
    fn test_import_always_quoted_names() {
        let text = "cidr,name,locked,expanded\r\n10.0.4.0/24,\"db\",1,0\r\n\r\n10.0.0.0/16,\"\",0,1\r\n";
        let mut session = Session::default();
        assert_eq!(import_csv(&mut session, text).unwrap(), 2);
        assert_eq!(session.view.name("10.0.4.0/24"), Some("db"));
        assert_eq!(session.view.name("10.0.0.0/16"), None);
        assert!(session.view.is_expanded("10.0.0.0/16"));
    }

    #[test]
    fn test_import_rejects_missing_header() {
        let mut session = sample_session();
        assert!(import_csv(&mut session, "10.0.4.0/24,db,1,0\n").is_err());
        assert!(import_csv(&mut session, "cidr,name,locked,expanded\n").is_err());
        assert_eq!(session, sample_session());
    }
}
