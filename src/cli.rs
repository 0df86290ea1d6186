//! Clap adapter for dosconf.
//!
//! This module is the **optional integration layer** between the
//! framework-agnostic core and the [clap](https://docs.rs/clap) CLI parser.
//! It is compiled only when the `clap` Cargo feature is enabled (on by
//! default).
//!
//! [`ConfArgs`] and [`ConfSubcommand`] can be embedded directly into a clap
//! `#[derive(Parser)]` struct to get
//! `list|sections|get|set|unset|merge|format` subcommands with no
//! boilerplate. The only bridge to the core is [`ConfArgs::into_action()`],
//! which converts parsed arguments into a [`ConfAction`](crate::ConfAction);
//! from there everything flows through
//! [`DosconfBuilder::handle()`](crate::DosconfBuilder::handle).

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::style::{Newline, Style};
use crate::types::ConfAction;

/// Clap-derived args for the configuration subcommand group.
///
/// ```ignore
/// #[derive(Parser)]
/// struct Cli {
///     #[command(flatten)]
///     conf: ConfArgs,
/// }
/// ```
#[derive(Debug, Args)]
pub struct ConfArgs {
    /// Use this file instead of searching the usual locations.
    #[arg(short, long, global = true)]
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub action: Option<ConfSubcommand>,
}

#[derive(Debug, Subcommand)]
pub enum ConfSubcommand {
    /// Show every entry as `section.entry = value`.
    List {
        /// Only list this section.
        section: Option<String>,
    },
    /// Show the section names in file order.
    Sections,
    /// Show the value of one entry.
    Get {
        /// Entry key (e.g. "cpu.cycles").
        key: String,
    },
    /// Set a value, adding the section or entry when missing.
    Set {
        /// Entry key (e.g. "cpu.cycles").
        key: String,
        value: String,
    },
    /// Remove an entry.
    Unset {
        /// Entry key (e.g. "cpu.cycles").
        key: String,
    },
    /// Merge another file into the configuration file.
    Merge { other: PathBuf },
    /// Rewrite the configuration file, optionally changing its layout.
    Format {
        /// Align `=` signs by padding entry names.
        #[arg(long, conflicts_with = "plain")]
        pad_names: bool,
        /// Leave a blank line after each section's comments.
        #[arg(long, conflicts_with = "plain")]
        blank_after_comments: bool,
        /// Drop padding and blank lines after comments.
        #[arg(long)]
        plain: bool,
        /// Line endings: "unix" or "windows".
        #[arg(long)]
        newline: Option<Newline>,
    },
}

impl ConfArgs {
    /// Convert clap-parsed args into a framework-agnostic `ConfAction`.
    ///
    /// Bare invocation (no subcommand) maps to listing everything. `format`
    /// without layout flags keeps the file's own dialect.
    pub fn into_action(self) -> ConfAction {
        match self.action {
            None => ConfAction::List { section: None },
            Some(ConfSubcommand::List { section }) => ConfAction::List { section },
            Some(ConfSubcommand::Sections) => ConfAction::Sections,
            Some(ConfSubcommand::Get { key }) => ConfAction::Get { key },
            Some(ConfSubcommand::Set { key, value }) => ConfAction::Set { key, value },
            Some(ConfSubcommand::Unset { key }) => ConfAction::Unset { key },
            Some(ConfSubcommand::Merge { other }) => ConfAction::Merge { other },
            Some(ConfSubcommand::Format {
                pad_names,
                blank_after_comments,
                plain,
                newline,
            }) => {
                let style = (plain || pad_names || blank_after_comments).then(|| {
                    let mut style = Style::NONE;
                    style.set(Style::PAD_NAMES, pad_names);
                    style.set(Style::BLANK_AFTER_COMMENTS, blank_after_comments);
                    style
                });
                ConfAction::Format { style, newline }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    /// Wrapper so we can use `try_parse_from` on the subcommand.
    #[derive(Debug, Parser)]
    struct TestCli {
        #[command(flatten)]
        conf: ConfArgs,
    }

    fn parse(args: &[&str]) -> ConfArgs {
        TestCli::try_parse_from(args).unwrap().conf
    }

    #[test]
    fn bare_invocation_lists() {
        let args = parse(&["test"]);
        assert!(args.file.is_none());
        assert_eq!(args.into_action(), ConfAction::List { section: None });
    }

    #[test]
    fn parse_list_section() {
        assert_eq!(
            parse(&["test", "list", "cpu"]).into_action(),
            ConfAction::List {
                section: Some("cpu".into())
            }
        );
    }

    #[test]
    fn parse_sections() {
        assert_eq!(
            parse(&["test", "sections"]).into_action(),
            ConfAction::Sections
        );
    }

    #[test]
    fn parse_get() {
        assert_eq!(
            parse(&["test", "get", "cpu.cycles"]).into_action(),
            ConfAction::Get {
                key: "cpu.cycles".into()
            }
        );
    }

    #[test]
    fn parse_set_with_file_after_subcommand() {
        let args = parse(&["test", "set", "cpu.cycles", "max", "--file", "game.conf"]);
        assert_eq!(args.file, Some(PathBuf::from("game.conf")));
        assert_eq!(
            args.into_action(),
            ConfAction::Set {
                key: "cpu.cycles".into(),
                value: "max".into(),
            }
        );
    }

    #[test]
    fn parse_unset_and_merge() {
        assert_eq!(
            parse(&["test", "unset", "dos.ems"]).into_action(),
            ConfAction::Unset {
                key: "dos.ems".into()
            }
        );
        assert_eq!(
            parse(&["test", "-f", "a.conf", "merge", "b.conf"]).into_action(),
            ConfAction::Merge {
                other: PathBuf::from("b.conf")
            }
        );
    }

    #[test]
    fn format_without_flags_keeps_dialect() {
        assert_eq!(
            parse(&["test", "format"]).into_action(),
            ConfAction::Format {
                style: None,
                newline: None
            }
        );
    }

    #[test]
    fn format_flags_build_style() {
        assert_eq!(
            parse(&["test", "format", "--pad-names", "--newline", "windows"]).into_action(),
            ConfAction::Format {
                style: Some(Style::PAD_NAMES),
                newline: Some(Newline::Windows)
            }
        );
        assert_eq!(
            parse(&["test", "format", "--plain"]).into_action(),
            ConfAction::Format {
                style: Some(Style::NONE),
                newline: None
            }
        );
    }

    #[test]
    fn format_plain_conflicts_with_padding() {
        assert!(TestCli::try_parse_from(["test", "format", "--plain", "--pad-names"]).is_err());
    }

    #[test]
    fn invalid_subcommand_errors() {
        assert!(TestCli::try_parse_from(["test", "nope"]).is_err());
    }

    #[test]
    fn set_requires_value() {
        assert!(TestCli::try_parse_from(["test", "set", "cpu.cycles"]).is_err());
    }
}
