//! Layered Layout CLI
//!
//! Usage:
//!   layered-layout [OPTIONS] [FILE]
//!
//! Options:
//!   -p, --preferred              Print the container's preferred size
//!   -f, --format                 Print each element's constraints
//!       --pixels-per-mm <PPM>    Device density for mm insets [default: 10]
//!       --reject-cycles          Fail on circular anchors
//!   -h, --help                   Print help
//!
//! Set `RUST_LOG=debug` to trace the layout passes.

use std::io::{self, Read};
use std::path::PathBuf;

use clap::Parser;
use log::info;

use layered_layout::{preferred_size, LayeredLayout, LayoutConfig, SceneFile};

#[derive(Parser)]
#[command(name = "layered-layout")]
#[command(about = "Resolve anchored inset constraints into element bounds")]
struct Cli {
    /// Scene file in TOML format (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Print the container's preferred size instead of laying it out
    #[arg(short, long)]
    preferred: bool,

    /// Print each element's constraints in labeled form after layout
    #[arg(short, long)]
    format: bool,

    /// Device density used to convert millimetres to pixels
    #[arg(long, value_name = "PPM", default_value_t = 10.0)]
    pixels_per_mm: f32,

    /// Fail instead of resolving circular anchors best-effort
    #[arg(long)]
    reject_cycles: bool,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    // Read input
    let source = match &cli.input {
        Some(path) => match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => buffer,
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    std::process::exit(1);
                }
            }
        }
    };

    let config = LayoutConfig::new()
        .with_pixels_per_mm(cli.pixels_per_mm)
        .with_reject_cycles(cli.reject_cycles);

    let mut loaded = match SceneFile::from_str(&source).and_then(|file| file.build(&config)) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    info!("loaded {} elements", loaded.elements.len());

    if cli.preferred {
        match preferred_size(&mut loaded.scene, loaded.container, &config) {
            Ok(preferred) => println!("{} {}", preferred.size.width, preferred.size.height),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    let layout = LayeredLayout::new(config);
    match layout.layout_container(&mut loaded.scene, loaded.container) {
        Ok(cache) => {
            print!("{}", loaded.report(&cache));
            if cli.format {
                print!("{}", loaded.constraints(&layout));
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
