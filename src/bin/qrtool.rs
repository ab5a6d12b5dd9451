use clap::{Parser, Subcommand};
use qr_reader::{DecodeOptions, InversionAttempts, PixelBuffer, QrReader};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "qrtool", version, about = "qr_reader CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decode the QR code in a single image
    Decode {
        #[arg(long)]
        image: PathBuf,
        /// Skip the colour-inverted retry
        #[arg(long)]
        no_invert: bool,
    },
    /// Print the sampled module grid without decoding it
    Grid {
        #[arg(long)]
        image: PathBuf,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    match cli.command {
        Command::Decode { image, no_invert } => decode_cmd(&image, no_invert),
        Command::Grid { image } => grid_cmd(&image),
    }
}

fn load_rgba(path: &Path) -> Result<(Vec<u8>, usize, usize), image::ImageError> {
    let rgba = image::open(path)?.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok((rgba.into_raw(), width as usize, height as usize))
}

fn reader(no_invert: bool) -> QrReader {
    let mut options = DecodeOptions::from_env();
    if no_invert {
        options = options.with_inversion(InversionAttempts::DoNotInvert);
    }
    QrReader::new(options)
}

fn decode_cmd(image: &Path, no_invert: bool) -> ExitCode {
    let (pixels, width, height) = match load_rgba(image) {
        Ok(result) => result,
        Err(err) => {
            eprintln!("Failed to load image {}: {}", image.display(), err);
            return ExitCode::FAILURE;
        }
    };
    let buffer = match PixelBuffer::new(&pixels, width, height) {
        Ok(buffer) => buffer,
        Err(err) => {
            eprintln!("Unusable image {}: {}", image.display(), err);
            return ExitCode::FAILURE;
        }
    };

    let start = Instant::now();
    let result = reader(no_invert).decode(&buffer);
    let elapsed = start.elapsed();

    match result {
        Ok(symbol) => {
            println!("{}", symbol.text);
            println!(
                "version={} ec={:?} mask={} corrected={} inverted={} time={:.2}ms",
                symbol.version.number(),
                symbol.ec_level,
                symbol.mask_pattern.id(),
                symbol.corrected_errors,
                symbol.inverted,
                elapsed.as_secs_f64() * 1000.0
            );
            let c = symbol.corners;
            println!(
                "corners: tl=({:.1}, {:.1}) tr=({:.1}, {:.1}) br=({:.1}, {:.1}) bl=({:.1}, {:.1})",
                c.top_left.x,
                c.top_left.y,
                c.top_right.x,
                c.top_right.y,
                c.bottom_right.x,
                c.bottom_right.y,
                c.bottom_left.x,
                c.bottom_left.y
            );
            ExitCode::SUCCESS
        }
        Err(failure) => {
            eprintln!("{}: {}", image.display(), failure);
            ExitCode::FAILURE
        }
    }
}

fn grid_cmd(image: &Path) -> ExitCode {
    let (pixels, width, height) = match load_rgba(image) {
        Ok(result) => result,
        Err(err) => {
            eprintln!("Failed to load image {}: {}", image.display(), err);
            return ExitCode::FAILURE;
        }
    };
    let buffer = match PixelBuffer::new(&pixels, width, height) {
        Ok(buffer) => buffer,
        Err(err) => {
            eprintln!("Unusable image {}: {}", image.display(), err);
            return ExitCode::FAILURE;
        }
    };

    match reader(true).sample_grid(&buffer) {
        Some(grid) => {
            println!(
                "{}x{} (version {})",
                grid.dimension(),
                grid.dimension(),
                grid.version().number()
            );
            print!("{grid}");
            ExitCode::SUCCESS
        }
        None => {
            eprintln!("{}: no symbol located", image.display());
            ExitCode::FAILURE
        }
    }
}
