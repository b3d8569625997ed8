use anyhow::Result;
use clap::Parser;
use std::time::Duration;

mod config;
mod logging;
mod statusbar;
mod tree;
mod ui;
mod view;

use config::{Cli, ViewerConfig};
use tree::{node::demo_tree, Node, TreeSelectionIndex};
use ui::App;
use view::TreeView;

#[tokio::main]
async fn main() -> Result<()> {
    let config = ViewerConfig::from(Cli::parse());
    logging::init_logger(config.level_filter());

    let roots = match &config.tree_file {
        Some(path) => Node::load(path)?,
        None => {
            log::info!("No tree file given, using demo tree");
            demo_tree()
        }
    };

    let mut tree = TreeView::new(roots, TreeSelectionIndex::new().shared());
    if config.start_collapsed {
        tree.collapse_all();
    }

    if config.print_only {
        println!("{}", tree.render_text());
        tree.teardown();
        return Ok(());
    }

    logging::switch_to_tui_logging();
    let mut app = App::new(tree, Duration::from_millis(config.tick_rate_ms));
    let result = app.run().await;
    logging::switch_to_console_logging();

    if let Err(e) = &result {
        log::error!("Terminal session failed: {e:#}");
    }
    result
}
