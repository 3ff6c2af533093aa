use clap::{ArgAction, Parser, Subcommand};
use logdel::config::DEFAULT_CONF_DIR;
use logdel::Ordering;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "logdel")]
#[command(about = "Delete dated log files, keeping the newest few", long_about = None)]
pub struct Cli {
    /// Directory holding *.yaml / *.yml configuration files
    #[arg(long, global = true, default_value = DEFAULT_CONF_DIR)]
    pub conf_dir: PathBuf,

    /// Only report what would be deleted
    #[arg(long, global = true, default_value_t = true, action = ArgAction::Set)]
    pub dry_run: bool,

    /// How matched files are ordered, oldest first, before selection
    #[arg(long, global = true, value_enum, default_value_t = Ordering::Name)]
    pub order: Ordering,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Match and delete (or preview) files for every configured item
    Run,
    /// Print the resolved items of every configuration file
    PrintConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["logdel"]);
        assert_eq!(cli.conf_dir, PathBuf::from("/etc/logdel.d"));
        assert!(cli.dry_run);
        assert_eq!(cli.order, Ordering::Name);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_dry_run_takes_a_value() {
        let cli = Cli::parse_from(["logdel", "--dry-run", "false", "--conf-dir", "/tmp/conf"]);
        assert!(!cli.dry_run);
        assert_eq!(cli.conf_dir, PathBuf::from("/tmp/conf"));

        let cli = Cli::parse_from(["logdel", "--dry-run=false", "print-config"]);
        assert!(!cli.dry_run);
        assert!(matches!(cli.command, Some(Commands::PrintConfig)));
    }

    #[test]
    fn test_order_flag() {
        let cli = Cli::parse_from(["logdel", "run", "--order", "date"]);
        assert_eq!(cli.order, Ordering::Date);
        assert!(matches!(cli.command, Some(Commands::Run)));
    }
}
