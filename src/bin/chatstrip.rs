use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Parser;

const DEFAULT_ASSET_ROOT: &str = "mschat";
const ASSET_ROOT_ENV: &str = "CHATSTRIP_ASSETS";
const CONFIG_FILE_NAME: &str = "chatstrip.json";

#[derive(Parser, Debug)]
#[command(name = "chatstrip", version)]
struct Cli {
    /// Script of `nickname,text` lines. Without it nothing is rendered.
    script: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let Some(script_path) = cli.script else {
        return Ok(());
    };

    let asset_root = std::env::var_os(ASSET_ROOT_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_ASSET_ROOT));

    render(&script_path, &asset_root)
}

fn render(script_path: &Path, asset_root: &Path) -> anyhow::Result<()> {
    let src = std::fs::read_to_string(script_path)
        .with_context(|| format!("read script '{}'", script_path.display()))?;

    let config = chatstrip::ComicConfig::load_or_default(&asset_root.join(CONFIG_FILE_NAME))?;
    let assets = chatstrip::AssetStore::load(asset_root)?;

    let comic = chatstrip::render_script(&src, &assets, &config)?;
    chatstrip::write_png(&comic, Path::new(&config.output))?;
    Ok(())
}
