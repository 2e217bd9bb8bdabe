use banner_studio::banner::BannerConfig;
use banner_studio::codegen::{self, CodeGenSession, Symbology};
use banner_studio::composition::CompositionModel;
use banner_studio::intake::{self, ImageIntake};
use banner_studio::preview::LivePreview;
use banner_studio::render::{LayoutParams, RustRasterizer, Typeface};
use banner_studio::share::{self, PopupSize, PrintOpener, ShareContent};
use banner_studio::types::BackgroundKind;
use banner_studio::{config, export, output};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "banner-studio")]
#[command(about = "Compose images under a welcome banner; generate QR codes and barcodes")]
#[command(long_about = "\
Compose images under a welcome banner; generate QR codes and barcodes

The compose command stacks the given images under a message banner and
exports the result as one PNG at twice the layout size:

  out/
  ├── edited-images.png     # banner + images, 2x
  └── preview.html          # with --preview: the same composition as HTML

Images are appended in the order their reads complete. Files that are not
images are kept and drawn as gray placeholders.

The qr and barcode commands write qr-code.png and barcode.png; --share (or
the share command) prints share links for Facebook, Twitter, LinkedIn and
WhatsApp.

Logging goes to stderr; set RUST_LOG=debug for detail.
Run 'banner-studio gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Output directory
    #[arg(long, default_value = ".", global = true)]
    output: PathBuf,

    /// Directory containing config.toml
    #[arg(long, default_value = ".", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args)]
struct ComposeArgs {
    /// Image files, appended to the composition
    images: Vec<PathBuf>,

    /// Also add every image file directly inside this directory
    #[arg(long)]
    dir: Option<PathBuf>,

    /// Banner message (empty shows "Welcome!")
    #[arg(long)]
    text: Option<String>,

    /// Active banner background
    #[arg(long, value_enum)]
    background: Option<BackgroundKind>,

    /// Solid background color (hex)
    #[arg(long)]
    color: Option<String>,

    /// Gradient stops, bottom-left then top-right (hex)
    #[arg(long, num_args = 2, value_names = ["FROM", "TO"])]
    gradient: Option<Vec<String>>,

    /// Background image: URL, data: URL or local path
    #[arg(long)]
    image_url: Option<String>,

    /// Composition width in CSS pixels (at least 800)
    #[arg(long)]
    width: Option<u32>,

    /// Also write preview.html
    #[arg(long)]
    preview: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Compose images under the banner and export edited-images.png
    Compose(ComposeArgs),
    /// Write a QR code for a payload
    Qr {
        payload: String,
        /// Also print share links for the payload
        #[arg(long)]
        share: bool,
    },
    /// Write a Code 128 barcode for a payload
    Barcode { payload: String },
    /// Print share links for a payload
    Share {
        payload: String,
        /// Share text (default: "Check out this link: <payload>")
        #[arg(long)]
        text: Option<String>,
    },
    /// List preset colors, gradients and background images
    Presets {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Compose(args) => {
            let config = config::load_config(&cli.config)?;
            init_thread_pool(&config.processing);
            compose(&config, args, &cli.output);
        }
        Command::Qr { payload, share } => {
            let config = config::load_config(&cli.config)?;
            let mut session = CodeGenSession::new(&config.codes);
            session.set_payload(payload.as_str());
            write_code(session.matrix(), Symbology::Matrix, None, &cli.output);
            if share {
                share::share_everywhere(
                    &ShareContent::for_payload(&payload),
                    PopupSize::from_settings(&config.share),
                    &PrintOpener,
                );
            }
        }
        Command::Barcode { payload } => {
            let config = config::load_config(&cli.config)?;
            let typeface = Typeface::discover(&config.text.font);
            let mut session = CodeGenSession::new(&config.codes);
            session.set_payload(payload);
            session.generate_linear();
            write_code(
                session.linear(),
                Symbology::Linear,
                typeface.as_ref(),
                &cli.output,
            );
        }
        Command::Share { payload, text } => {
            let config = config::load_config(&cli.config)?;
            let content = match text {
                Some(text) => ShareContent::new(payload, text),
                None => ShareContent::for_payload(&payload),
            };
            share::share_everywhere(
                &content,
                PopupSize::from_settings(&config.share),
                &PrintOpener,
            );
        }
        Command::Presets { json } => {
            if json {
                println!("{}", output::format_presets_json()?);
            } else {
                output::print_presets();
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Build the composition from CLI flags, export it, and report.
fn compose(config: &config::EditorConfig, args: ComposeArgs, output_dir: &std::path::Path) {
    let mut layout = config.layout.clone();
    if let Some(width) = args.width {
        layout.width = width;
    }
    let params = LayoutParams::from_settings(&layout);

    let mut model = CompositionModel::new(BannerConfig::from_settings(&config.banner));
    let preview = LivePreview::new(params.clone());
    if args.preview {
        preview.attach(&mut model);
    }

    if let Some(text) = args.text {
        model.set_text(text);
    }
    if let Some(color) = args.color {
        model.set_solid_color(color);
    }
    if let Some([from, to]) = args.gradient.as_deref() {
        model.set_gradient_colors(from.as_str(), to.as_str());
    }
    if let Some(url) = args.image_url {
        model.set_background_image_url(url);
    }
    if let Some(kind) = args.background {
        model.set_background_type(kind);
    }

    let mut paths = args.images;
    if let Some(dir) = &args.dir {
        match intake::collect_image_paths(dir) {
            Ok(found) => paths.extend(found),
            Err(e) => tracing::warn!(dir = %dir.display(), error = %e, "could not list images"),
        }
    }
    let report = ImageIntake::new().submit_all(&paths, &mut model);

    let rasterizer = RustRasterizer::from_config(config);
    let exported = export::export(&model, &rasterizer, &params, output_dir);

    let preview_path = if args.preview {
        match preview.write_to(output_dir) {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::error!(error = %e, "preview could not be written");
                None
            }
        }
    } else {
        None
    };

    output::print_compose_output(
        model.images(),
        &report,
        model.banner(),
        exported.as_ref(),
        preview_path.as_deref(),
    );
}

/// Download a generated graphic and print where it went.
fn write_code(
    graphic: Option<&codegen::CodeGraphic>,
    symbology: Symbology,
    typeface: Option<&Typeface>,
    output_dir: &std::path::Path,
) {
    match graphic {
        Some(graphic) => {
            let path = codegen::download(graphic, typeface, output_dir);
            output::print_code(graphic, path.as_deref());
        }
        None => output::print_no_code(symbology),
    }
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; config can lower it, not raise it.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
