//! Command line definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "subnet-explorer",
    version,
    about = "Explore hierarchical IPv4 subnetting. Split, name & lock notable networks for planning."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show the visible rows of the current view
    Show,
    /// Set the root CIDR
    Root { cidr: String },
    /// Set the maximum prefix length the view subdivides to
    MaxMask {
        #[arg(value_parser = clap::value_parser!(u8).range(0..=32))]
        mask: u8,
    },
    /// Show the children of a subnet
    Expand { cidr: String },
    /// Hide the children of a subnet, keeping descendant expansion
    Collapse { cidr: String },
    /// Create the child subnets and show them
    Split { cidr: String },
    /// Merge descendants back into one row
    Join { cidr: String },
    /// Toggle the lock on a subnet
    Lock { cidr: String },
    /// Name a subnet (locks it); omit the name to clear it
    Name { cidr: String, name: Option<String> },
    /// Print the full subdivision tree of a CIDR
    Tree {
        cidr: String,
        #[arg(value_parser = clap::value_parser!(u8).range(0..=32))]
        max_mask: u8,
        /// Print JSON instead of an indented list
        #[arg(long)]
        json: bool,
    },
    /// Print a share link parameter for the current state
    Share,
    /// Apply a share link parameter (base64url or raw JSON)
    Open { param: String },
    /// Write the share payload as pretty JSON
    ExportJson { path: Option<PathBuf> },
    /// Write names, locks and expansions as CSV
    ExportCsv { path: Option<PathBuf> },
    /// Load a JSON or CSV export
    Import { path: PathBuf },
    /// Clear all subnet state
    Clear,
}
