//! asciify CLI - Convert images to ASCII art and export them as PNG or text

use asciify::export::now_millis;
use asciify::preferences::JsonFileStore;
use asciify::render::TrueTypeFont;
use asciify::{AsciiError, BitmapFont, GlyphRasterizer, Mode, Session, Theme, ThemeSettings, Viewport};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "asciify", about = "Convert images to ASCII art")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert an image and print the result
    Convert(ConvertArgs),
    /// Show or change the theme preference
    Theme {
        /// show, toggle, dark or light
        #[arg(default_value = "show")]
        action: String,
        /// Preferences file (defaults to the user config directory)
        #[arg(long)]
        preferences: Option<PathBuf>,
    },
}

#[derive(clap::Args)]
struct ConvertArgs {
    /// Input image file
    input: PathBuf,
    /// Output width in characters (default: 120)
    #[arg(short = 'W', long)]
    width: Option<String>,
    /// Output height in characters (default: keeps the image aspect ratio)
    #[arg(short = 'H', long)]
    height: Option<String>,
    /// Output mode: plain or color
    #[arg(short, long, default_value = "plain")]
    mode: Mode,
    /// Write an ascii_image_<ms>.png export
    #[arg(long)]
    png: bool,
    /// Write an ascii_<ms>.txt export
    #[arg(long)]
    txt: bool,
    /// Directory for exported files
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,
    /// Window size the PNG has to fit, as WIDTHxHEIGHT
    #[arg(long, default_value = "1920x1080", value_parser = parse_viewport)]
    viewport: Viewport,
    /// TrueType font for the PNG (defaults to a built-in 8x8 bitmap font)
    #[arg(short, long)]
    font: Option<PathBuf>,
}

fn parse_viewport(s: &str) -> Result<Viewport, String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {s:?}"))?;
    let w: u32 = w.trim().parse().map_err(|e| format!("bad viewport width: {e}"))?;
    let h: u32 = h.trim().parse().map_err(|e| format!("bad viewport height: {e}"))?;
    Ok(Viewport::from_window(w, h))
}

fn main() -> Result<(), AsciiError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    match args.command {
        Command::Convert(convert) => run_convert(convert),
        Command::Theme { action, preferences } => run_theme(&action, preferences),
    }
}

fn run_convert(args: ConvertArgs) -> Result<(), AsciiError> {
    let mut session = Session::new();
    let (default_w, default_h) = session.load_path(&args.input)?;

    let width = args.width.unwrap_or_else(|| default_w.to_string());
    let height = args.height.unwrap_or_else(|| default_h.to_string());
    let output = session.convert_input(&width, &height, args.mode)?;
    print!("{}", output.as_str());

    let timestamp = now_millis();
    if args.png {
        let font: Box<dyn GlyphRasterizer> = match &args.font {
            Some(path) => Box::new(TrueTypeFont::open(path)?),
            None => Box::new(BitmapFont),
        };
        let asset = session.export_png(args.viewport, font.as_ref(), timestamp)?;
        eprintln!("{}", asset.write_to(&args.out_dir)?.display());
    }
    if args.txt {
        let asset = session.export_text(timestamp)?;
        eprintln!("{}", asset.write_to(&args.out_dir)?.display());
    }
    Ok(())
}

fn run_theme(action: &str, path: Option<PathBuf>) -> Result<(), AsciiError> {
    let path = match path {
        Some(path) => path,
        None => JsonFileStore::default_path()?,
    };
    let mut settings = ThemeSettings::new(JsonFileStore::new(path), None);

    let theme = match action {
        "show" => settings.theme(),
        "toggle" => settings.toggle()?,
        other => {
            let theme: Theme = other.parse().map_err(AsciiError::Preferences)?;
            settings.set_theme(theme)?;
            theme
        }
    };
    println!("{theme}");
    Ok(())
}
