//! bluread
//!
//! Prints the title, chapter, clip and stream layout of a Blu-ray disc as XML.

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;

use bluread::config::get_config;
use bluread::native::MemoryLibrary;
use bluread::{Bluray, DiscReport};

#[derive(Parser, Debug)]
#[command(name = "bluread", version, about = "Dump Blu-ray disc structure as XML")]
struct Args {
    /// Disc device, mount point or image (a JSON disc description with --fixture)
    path: PathBuf,

    /// AACS key database (KEYDB.cfg)
    #[arg(long = "keydb", value_name = "FILE")]
    key_db: Option<PathBuf>,

    /// Read PATH as a JSON disc description instead of a real disc
    #[arg(long)]
    fixture: bool,

    /// Print the report on a single line
    #[arg(long)]
    compact: bool,

    /// Hand the key database to libbluray when opening
    #[arg(long)]
    forward_keydb: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let args = Args::parse();
    let config = get_config();

    let key_db = args.key_db.or_else(|| config.key_db.clone());
    if let Some(key_db) = &key_db {
        if !key_db.exists() {
            return Err(format!("KEYDB file not found: {}", key_db.display()).into());
        }
    }

    let mut options = config.open_options();
    options.forward_key_db |= args.forward_keydb;

    let mut disc = if args.fixture {
        let library = MemoryLibrary::load_fixture(&args.path)?;
        Bluray::with_options(library, &args.path, key_db, options)
    } else {
        native_disc(args.path, key_db, options)?
    };

    disc.open()?;
    log::info!(
        "Opened {} ({} titles)",
        disc.path().display(),
        disc.number_of_titles()?
    );

    let report = DiscReport::collect(&disc)?;
    let pretty = config.pretty && !args.compact;
    println!("{}", report.to_xml(pretty)?);

    disc.close()?;
    Ok(())
}

#[cfg(feature = "libbluray")]
fn native_disc(
    path: PathBuf,
    key_db: Option<PathBuf>,
    options: bluread::OpenOptions,
) -> Result<Bluray, Box<dyn Error>> {
    let (major, minor, micro) = bluread::native::libbluray::version();
    log::debug!("Using libbluray {}.{}.{}", major, minor, micro);
    Ok(Bluray::with_options(
        bluread::native::libbluray::Libbluray,
        path,
        key_db,
        options,
    ))
}

#[cfg(not(feature = "libbluray"))]
fn native_disc(
    _path: PathBuf,
    _key_db: Option<PathBuf>,
    _options: bluread::OpenOptions,
) -> Result<Bluray, Box<dyn Error>> {
    Err("built without the libbluray feature; only --fixture is available".into())
}
