use std::path::PathBuf;

use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Parser)]
#[command(name = "tree-select", version, about = "Browse and select nodes of a tree in the terminal")]
pub struct Cli {
    /// JSON file holding a node or a list of nodes. Uses a demo tree when absent.
    #[arg(short, long)]
    pub tree: Option<PathBuf>,

    /// Start with every node collapsed
    #[arg(long)]
    pub collapsed: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: log::LevelFilter,

    /// Event loop tick in milliseconds
    #[arg(long, default_value_t = 250)]
    pub tick_rate: u64,

    /// Print the tree as text and exit
    #[arg(long)]
    pub print: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewerConfig {
    pub tree_file: Option<PathBuf>,
    pub start_collapsed: bool,
    pub log_level: String,
    pub tick_rate_ms: u64,
    pub print_only: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            tree_file: None,
            start_collapsed: false,
            log_level: "info".to_string(),
            tick_rate_ms: 250,
            print_only: false,
        }
    }
}

impl From<Cli> for ViewerConfig {
    fn from(cli: Cli) -> Self {
        Self {
            tree_file: cli.tree,
            start_collapsed: cli.collapsed,
            log_level: cli.log_level.to_string().to_lowercase(),
            tick_rate_ms: cli.tick_rate.max(1),
            print_only: cli.print,
        }
    }
}

impl ViewerConfig {
    pub fn level_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_from_empty_command_line() {
        let config = ViewerConfig::from(Cli::parse_from(["tree-select"]));
        assert!(config.tree_file.is_none());
        assert!(!config.start_collapsed);
        assert_eq!(config.tick_rate_ms, 250);
        assert_eq!(config.level_filter(), log::LevelFilter::Info);
    }

    #[test]
    fn flags_are_carried_over() {
        let cli = Cli::parse_from([
            "tree-select",
            "--tree",
            "nodes.json",
            "--collapsed",
            "--log-level",
            "debug",
            "--tick-rate",
            "0",
            "--print",
        ]);
        let config = ViewerConfig::from(cli);
        assert_eq!(config.tree_file, Some(PathBuf::from("nodes.json")));
        assert!(config.start_collapsed);
        assert!(config.print_only);
        assert_eq!(config.tick_rate_ms, 1);
        assert_eq!(config.level_filter(), log::LevelFilter::Debug);
    }

    #[test]
    fn unknown_level_falls_back_to_info() {
        let config = ViewerConfig {
            log_level: "loud".to_string(),
            ..ViewerConfig::default()
        };
        assert_eq!(config.level_filter(), log::LevelFilter::Info);
    }
}
