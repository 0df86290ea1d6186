//! # dosconf demo application
//!
//! A sample CLI tool that shows how to wire [dosconf](https://docs.rs/dosconf)
//! into an application. It exists to demonstrate and manually verify the
//! library's features.
//!
//! ## Running
//!
//! ```sh
//! cargo run --example dosconf_demo -- show
//! cargo run --example dosconf_demo -- conf list cpu
//! ```
//!
//! ## Features demonstrated
//!
//! | Feature                  | How to exercise it                                                   |
//! |--------------------------|----------------------------------------------------------------------|
//! | Discovery (merge)        | Put `dosbox.conf` in `~/.dosbox/` and in cwd, then run `show`        |
//! | Explicit file            | `cargo run --example dosconf_demo -- conf --file game.conf list`     |
//! | `conf get`               | `cargo run --example dosconf_demo -- conf get cpu.cycles`            |
//! | `conf set`               | `cargo run --example dosconf_demo -- conf set cpu.cycles max`        |
//! | `conf format`            | `cargo run --example dosconf_demo -- conf format --pad-names`        |
//! | Change events            | `cargo run --example dosconf_demo -- touch cpu.cycles max`           |
//! | Settings template        | `cargo run --example dosconf_demo -- settings`                       |
//! | Logging                  | `RUST_LOG=dosconf=debug cargo run --example dosconf_demo -- show`    |

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use dosconf::{ChangeEvent, ConfArgs, Dosconf, DosconfBuilder, SearchPath, Settings};

/// dosconf demo: inspect and edit dosbox-style configuration files.
#[derive(Parser, Debug)]
#[command(name = "dosconf-demo")]
struct Cli {
    /// Log library activity to stderr (same as RUST_LOG=dosconf=debug).
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the effective (merged) configuration file.
    Show,
    /// Change one value in memory and print the resulting change events.
    Touch { key: String, value: String },
    /// Print a commented template of the tool's own settings.
    Settings,
    /// Query or edit the configuration file.
    Conf(ConfArgs),
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("dosconf=debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Search paths: Platform (XDG / Library) → `~/.dosbox/` → cwd.
fn make_builder() -> DosconfBuilder {
    Dosconf::builder().search_paths(vec![
        SearchPath::Platform,
        SearchPath::Home(".dosbox"),
        SearchPath::Cwd,
    ])
}

fn fail(context: &str, err: impl std::fmt::Display) -> ! {
    eprintln!("{context}:\n{err}");
    std::process::exit(1);
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Show => {
            let doc = make_builder()
                .load()
                .unwrap_or_else(|e| fail("Failed to load config", e));
            let text = doc
                .to_text(None, None)
                .unwrap_or_else(|e| fail("Failed to render config", e));
            print!("{text}");
        }
        Commands::Touch { key, value } => {
            let mut doc = make_builder()
                .load()
                .unwrap_or_else(|e| fail("Failed to load config", e));
            doc.subscribe(|event: &ChangeEvent| match serde_json::to_string(event) {
                Ok(json) => println!("{json}"),
                Err(e) => eprintln!("unprintable event: {e}"),
            });
            let Some((section, entry)) = key.split_once('.') else {
                fail("Invalid key", format!("'{key}' (expected section.entry)"));
            };
            if !doc.contains_section(section) {
                doc.new_section(section)
                    .unwrap_or_else(|e| fail("Failed to add section", e));
            }
            doc.set_value(section, entry, value)
                .unwrap_or_else(|e| fail("Failed to set value", e));
        }
        Commands::Settings => print!("{}", Settings::template()),
        Commands::Conf(args) => {
            let builder = make_builder().override_path(args.file.clone());
            let action = args.into_action();
            builder
                .handle_and_print(&action)
                .unwrap_or_else(|e| fail("Config error", e));
        }
    }
}
