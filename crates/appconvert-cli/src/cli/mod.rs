//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "appconvert",
    bin_name = "appconvert",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Convert an app definition into a standalone project",
    long_about = "appconvert turns an integration app definition (JSON with \
                  embedded function bodies) into a hand-editable project: \
                  one module per step, test stubs, package.json and an \
                  index that wires it all together.",
    after_help = "EXAMPLES:\n\
        \x20 appconvert convert definition.json ./my-app --title \"My App\"\n\
        \x20 appconvert convert definition.json ./my-app --info app.json --dry-run\n\
        \x20 appconvert completions bash > /usr/share/bash-completion/completions/appconvert",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Convert a definition into a project directory.
    #[command(
        visible_alias = "c",
        about = "Convert an app definition",
        after_help = "EXAMPLES:\n\
            \x20 appconvert convert definition.json ./my-app --title \"My App\"\n\
            \x20 appconvert convert definition.json ./my-app --info app.json --force\n\
            \x20 appconvert convert definition.json ./my-app --offline --templates ./tpl"
    )]
    Convert(ConvertArgs),

    /// Write a default configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 appconvert init\n\
            \x20 appconvert init --force"
    )]
    Init(InitArgs),

    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 appconvert completions bash > ~/.local/share/bash-completion/completions/appconvert\n\
            \x20 appconvert completions zsh  > ~/.zfunc/_appconvert\n\
            \x20 appconvert completions fish > ~/.config/fish/completions/appconvert.fish"
    )]
    Completions(CompletionsArgs),

    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 appconvert config get registry.url\n\
            \x20 appconvert config list\n\
            \x20 appconvert config path"
    )]
    Config(ConfigCommands),
}

// ── convert ───────────────────────────────────────────────────────────────────

/// Arguments for `appconvert convert`.
#[derive(Debug, Args)]
pub struct ConvertArgs {
    /// App definition JSON file.
    #[arg(value_name = "DEFINITION")]
    pub definition: PathBuf,

    /// Directory to write the project into. Created if missing.
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,

    /// App info JSON (`title`, `description`, `id`, `general`).
    #[arg(short = 'i', long = "info", value_name = "FILE")]
    pub info: Option<PathBuf>,

    /// App title; wins over the info file. Defaults to the directory name.
    #[arg(short = 't', long = "title", value_name = "TITLE")]
    pub title: Option<String>,

    #[arg(long = "force", help = "Write into a non-empty directory")]
    pub force: bool,

    #[arg(long = "dry-run", help = "List the files that would be written")]
    pub dry_run: bool,

    #[arg(
        long = "templates",
        value_name = "DIR",
        help = "Directory holding the test stub templates and gitignore"
    )]
    pub templates: Option<PathBuf>,

    /// Extra files to copy into the project after conversion, e.g. helper
    /// modules kept from an earlier conversion. Generated files win;
    /// `node_modules` and `.zip` files are skipped.
    #[arg(long = "include", value_name = "DIR")]
    pub include: Option<PathBuf>,

    /// Skip the package registry; legacy apps get the configured fallback
    /// runner version.
    #[arg(long = "offline", help = "Do not contact the package registry")]
    pub offline: bool,
}

// ── init ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct InitArgs {
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `registry.url`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{CommandFactory, Parser};

    #[test]
    fn verify_cli_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_convert_command() {
        let cli = Cli::parse_from([
            "appconvert",
            "convert",
            "definition.json",
            "out",
            "--title",
            "My App",
            "--dry-run",
        ]);
        let Commands::Convert(args) = cli.command else {
            panic!("expected Convert command");
        };
        assert_eq!(args.definition, PathBuf::from("definition.json"));
        assert_eq!(args.dir, PathBuf::from("out"));
        assert_eq!(args.title.as_deref(), Some("My App"));
        assert!(args.dry_run);
        assert!(!args.force);
    }

    #[test]
    fn convert_requires_both_paths() {
        assert!(Cli::try_parse_from(["appconvert", "convert", "definition.json"]).is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["appconvert", "config", "list", "-vv"]);
        assert_eq!(cli.global.verbose, 2);
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["appconvert", "--quiet", "--verbose", "config", "list"]);
        assert!(result.is_err());
    }
}
