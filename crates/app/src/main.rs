use std::fs;
use std::sync::Arc;

use anyhow::Context as _;
use directories::ProjectDirs;
use varak_application::ViewerStore;
use varak_core::{PageAtlas, SectionIndex};
use varak_engine::HttpAssetSource;
use varak_storage::Storage;
use varak_ui::Ui;

fn main() {
    if let Err(err) = run() {
        eprintln!("{err:?}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let project_dirs =
        ProjectDirs::from("dev", "varak", "varak").context("resolve project dirs")?;

    let config_dir = project_dirs.config_dir();
    fs::create_dir_all(config_dir)
        .with_context(|| format!("create config dir {}", config_dir.display()))?;

    init_logging(config_dir)?;

    let db_path = config_dir.join("varak.db");
    let storage = Storage::open(&db_path)?;

    let atlas = PageAtlas::sevki_mushaf();
    let sections = SectionIndex::sevki_mushaf();
    let slot = storage.load_slot()?;
    let settings = storage.load_settings()?;
    let bookmarks = storage.load_bookmarks()?;

    let source = Arc::new(HttpAssetSource::new()?);
    let mut ui = Ui::new(
        atlas,
        sections,
        settings,
        bookmarks,
        slot,
        Box::new(storage),
        source,
    );
    ui.run()
}

/// Logging goes to a file; stdout and stderr belong to the terminal UI.
fn init_logging(config_dir: &std::path::Path) -> anyhow::Result<()> {
    let log_path = config_dir.join("varak.log");
    let log_file = fs::File::create(&log_path)
        .with_context(|| format!("create log file {}", log_path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();
    log::info!("varak starting, db at {}", config_dir.display());
    Ok(())
}
