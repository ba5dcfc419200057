//! Command dispatch: load the session, apply a command, persist, show.

use crate::cli::Command;
use crate::config::Config;
use crate::models::{parse_cidr, Session};
use crate::output::{export_csv, import_csv, print_rows};
use crate::processing::{
    build_subdivision_tree, estimate_potential_row_count, ProjectionScheduler, SubnetTreeNode,
};
use crate::share::{SharePayload, StateStore};
use std::error::Error;
use std::path::{Path, PathBuf};

/// What to do after a command was applied to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Session changed; persist it and show the view.
    Changed,
    /// Nothing changed; show the view.
    Show,
    /// Print this text and stop.
    Print(String),
    /// Write this text to a file.
    Write(PathBuf, String),
}

fn canonical(cidr: &str) -> Result<String, Box<dyn Error>> {
    Ok(parse_cidr(cidr)?.cidr().to_string())
}

fn default_export_path(ext: &str) -> PathBuf {
    let today = chrono::Local::now().format("%Y-%m-%d");
    PathBuf::from(format!("subnets-export-{today}.{ext}"))
}

fn render_tree(node: &SubnetTreeNode) -> String {
    node.walk()
        .into_iter()
        .map(|(depth, subnet)| format!("{}{}", "  ".repeat(depth), subnet.cidr()))
        .collect::<Vec<String>>()
        .join("\n")
}

/// Apply `command` to `session` without touching the filesystem (except `Import`).
pub fn apply(session: &mut Session, command: Command) -> Result<Outcome, Box<dyn Error>> {
    log::debug!("apply({command:?})");
    let outcome = match command {
        Command::Show => Outcome::Show,
        Command::Root { cidr } => {
            parse_cidr(&cidr)?;
            session.input = cidr.trim().to_string();
            Outcome::Changed
        }
        Command::MaxMask { mask } => {
            session.view.max_depth = mask;
            Outcome::Changed
        }
        Command::Expand { cidr } => {
            session.view.expand(&canonical(&cidr)?);
            Outcome::Changed
        }
        Command::Collapse { cidr } => {
            session.view.collapse(&canonical(&cidr)?);
            Outcome::Changed
        }
        Command::Split { cidr } => {
            let subnet = parse_cidr(&cidr)?;
            if !session.view.can_split(&subnet) {
                return Err(format!(
                    "Cannot split {} further than max mask /{}",
                    subnet,
                    session.view.max_depth
                )
                .into());
            }
            session.view.split(subnet.cidr());
            Outcome::Changed
        }
        Command::Join { cidr } => {
            let subnet = parse_cidr(&cidr)?;
            if !session.view.can_join(&subnet) {
                return Err(format!("Cannot join {subnet}: a locked descendant exists").into());
            }
            session.view.join(subnet.cidr());
            Outcome::Changed
        }
        Command::Lock { cidr } => {
            let cidr = canonical(&cidr)?;
            let locked = session.view.toggle_lock(&cidr);
            log::info!("{cidr} locked={locked}");
            Outcome::Changed
        }
        Command::Name { cidr, name } => {
            let name = name.unwrap_or_default();
            session.view.set_name(&canonical(&cidr)?, name.trim());
            Outcome::Changed
        }
        Command::Tree {
            cidr,
            max_mask,
            json,
        } => {
            let tree = build_subdivision_tree(&cidr, max_mask)?;
            if json {
                Outcome::Print(serde_json::to_string_pretty(&tree)?)
            } else {
                Outcome::Print(render_tree(&tree))
            }
        }
        Command::Share => Outcome::Print(SharePayload::from_session(session).encode_link_param()?),
        Command::Open { param } => {
            SharePayload::decode_link_param(&param)?.apply_to(session);
            Outcome::Changed
        }
        Command::ExportJson { path } => Outcome::Write(
            path.unwrap_or_else(|| default_export_path("json")),
            SharePayload::from_session(session).to_json_pretty()?,
        ),
        Command::ExportCsv { path } => Outcome::Write(
            path.unwrap_or_else(|| default_export_path("csv")),
            export_csv(session)?,
        ),
        Command::Import { path } => {
            import_file(session, &path)?;
            Outcome::Changed
        }
        Command::Clear => {
            session.reset();
            Outcome::Changed
        }
    };
    Ok(outcome)
}

/// Load a JSON payload or CSV export into `session`.
pub fn import_file(session: &mut Session, path: &Path) -> Result<(), Box<dyn Error>> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to import {}: {e}", path.display()))?;
    let is_json = path.extension().map(|e| e == "json").unwrap_or(false)
        || text.trim_start().starts_with('{');
    if is_json {
        SharePayload::from_json(&text)?.apply_to(session);
    } else {
        import_csv(session, &text)?;
    }
    log::info!("Imported {}", path.display());
    Ok(())
}

/// Project and print the current view, deferring big projections.
pub async fn show(session: &Session, scheduler: &ProjectionScheduler) -> Result<(), Box<dyn Error>> {
    let root = session.root()?;
    log::debug!(
        "show {} /{} potential rows {}",
        root,
        session.max_mask(),
        estimate_potential_row_count(root.mask(), session.max_mask())
    );
    let pending = scheduler.project(root, session.view.clone(), session.max_mask());
    match pending.await {
        Some(projection) => {
            if projection.deferred {
                log::info!("Projection #{} ran deferred", projection.generation);
            }
            print_rows(&projection.rows, &session.view);
            Ok(())
        }
        None => Err("Projection was superseded or failed".into()),
    }
}

/// Run one command against the persisted session.
pub async fn run(command: Command, config: &Config) -> Result<(), Box<dyn Error>> {
    let store = StateStore::new(&config.state_file, &config.namespace);
    let mut session = store.load();
    let scheduler = ProjectionScheduler::new(config.defer_threshold);

    match apply(&mut session, command)? {
        Outcome::Changed => {
            store.save(&session)?;
            show(&session, &scheduler).await
        }
        Outcome::Show => show(&session, &scheduler).await,
        Outcome::Print(text) => {
            println!("{text}");
            Ok(())
        }
        Outcome::Write(path, text) => {
            std::fs::write(&path, text)
                .map_err(|e| format!("Error writing {}: {e}", path.display()))?;
            log::info!("Wrote {}", path.display());
            println!("{}", path.display());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmd_cidr(f: fn(String) -> Command, cidr: &str) -> Command {
        f(cidr.to_string())
    }

    #[test]
    fn test_root_must_parse() {
        let mut session = Session::default();
        assert!(apply(&mut session, Command::Root { cidr: "10.0.0/8".to_string() }).is_err());
        assert_eq!(session.input, "10.0.0.0/16");
        apply(&mut session, Command::Root { cidr: " 192.168.0.0/16 ".to_string() }).unwrap();
        assert_eq!(session.input, "192.168.0.0/16");
    }

    #[test]
    fn test_cidr_arguments_are_canonical() {
        let mut session = Session::default();
        apply(&mut session, cmd_cidr(|cidr| Command::Expand { cidr }, "10.0.0.9/16")).unwrap();
        assert!(session.view.is_expanded("10.0.0.0/16"));
        apply(&mut session, cmd_cidr(|cidr| Command::Lock { cidr }, "10.0.1.7/24")).unwrap();
        assert!(session.view.is_locked("10.0.1.0/24"));
    }

    #[test]
    fn test_split_and_join_rules() {
        let mut session = Session::default();
        assert!(apply(&mut session, cmd_cidr(|cidr| Command::Split { cidr }, "10.0.3.0/24")).is_err());
        apply(&mut session, cmd_cidr(|cidr| Command::Split { cidr }, "10.0.0.0/16")).unwrap();
        assert!(session.view.is_split("10.0.0.0/16"));

        apply(
            &mut session,
            Command::Name {
                cidr: "10.0.3.0/24".to_string(),
                name: Some("vpn".to_string()),
            },
        )
        .unwrap();
        assert!(apply(&mut session, cmd_cidr(|cidr| Command::Join { cidr }, "10.0.0.0/16")).is_err());
        apply(&mut session, cmd_cidr(|cidr| Command::Lock { cidr }, "10.0.3.0/24")).unwrap();
        apply(&mut session, cmd_cidr(|cidr| Command::Join { cidr }, "10.0.0.0/16")).unwrap();
        assert!(!session.view.is_split("10.0.0.0/16"));
    }

    #[test]
    fn test_tree_outcome() {
        let mut session = Session::default();
        let outcome = apply(
            &mut session,
            Command::Tree {
                cidr: "10.0.0.0/30".to_string(),
                max_mask: 31,
                json: false,
            },
        )
        .unwrap();
        assert_eq!(
            outcome,
            Outcome::Print("10.0.0.0/30\n  10.0.0.0/31\n  10.0.0.2/31".to_string())
        );
    }

    #[test]
    fn test_share_then_open() {
        let mut session = Session::default();
        session.view.set_name("10.0.8.0/21", "k8s");
        let param = match apply(&mut session, Command::Share).unwrap() {
            Outcome::Print(param) => param,
            other => panic!("unexpected outcome {other:?}"),
        };
        let mut other = Session::default();
        apply(&mut other, Command::Open { param }).unwrap();
        assert_eq!(other.view.name("10.0.8.0/21"), Some("k8s"));
        assert!(other.view.is_locked("10.0.8.0/21"));
    }

    #[test]
    fn test_import_json_and_csv_files() {
        let dir = tempfile::tempdir().unwrap();
        let json_path = dir.path().join("plan.json");
        std::fs::write(&json_path, r#"{"version":1,"input":"172.16.0.0/16","maxMask":20}"#).unwrap();
        let csv_path = dir.path().join("plan.csv");
        std::fs::write(&csv_path, "cidr,name,locked,expanded\n172.16.0.0/16,,0,1\n").unwrap();

        let mut session = Session::default();
        import_file(&mut session, &json_path).unwrap();
        assert_eq!(session.input, "172.16.0.0/16");
        assert_eq!(session.max_mask(), 20);
        import_file(&mut session, &csv_path).unwrap();
        assert!(session.view.is_expanded("172.16.0.0/16"));
        assert!(import_file(&mut session, &dir.path().join("missing.csv")).is_err());
    }

    #[test]
    fn test_clear_resets() {
        let mut session = Session::default();
        session.view.toggle_lock("10.0.0.0/24");
        assert_eq!(apply(&mut session, Command::Clear).unwrap(), Outcome::Changed);
        assert_eq!(session, Session::default());
    }
}
