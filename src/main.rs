use clap::{Parser, Subcommand};
use placeholdr::imaging::RustBackend;
use placeholdr::params::RawParams;
use placeholdr::{config, logging, output, render, server};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "placeholdr")]
#[command(about = "Placeholder image service")]
#[command(long_about = "\
Placeholder image service

Serves solid-color placeholder images with centered text over HTTP:

  GET /png?s=300x200&b=2D64DD&c=FFF&t=Hello+World&x=2

Formats: jpg, jpeg, png, tiff, webp

Query keys (all optional):
  s   size, <w>x<h> or <n> for a square          (default 100x100)
  b   background color, 3 or 6 hex digits         (default CCCCCC)
  c   text color                                  (default 969696)
  t   overlay text                                (default \"<w> x <h>\")
  x   scale factor, multiplies both dimensions    (default 1)

Run 'placeholdr gen-config' to generate a documented placeholdr.toml.")]
#[command(version)]
struct Cli {
    /// Config file [default: placeholdr.toml, if present]
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server
    Serve(ServeArgs),
    /// Write placeholder images to disk
    Render(RenderArgs),
    /// Print a stock placeholdr.toml with all options documented
    GenConfig,
}

#[derive(clap::Args)]
struct ServeArgs {
    /// Interface to bind (overrides [server] host)
    #[arg(long)]
    host: Option<String>,

    /// TCP port (overrides [server] port)
    #[arg(long)]
    port: Option<u16>,
}

#[derive(clap::Args)]
struct RenderArgs {
    /// Output format; repeat for several [default: png]
    #[arg(long = "format", value_name = "FORMAT")]
    formats: Vec<String>,

    /// Size, <w>x<h> or <n>
    #[arg(short = 's', long)]
    size: Option<String>,

    /// Background color (hex)
    #[arg(short = 'b', long)]
    background: Option<String>,

    /// Text color (hex)
    #[arg(short = 'c', long)]
    text_color: Option<String>,

    /// Overlay text
    #[arg(short = 't', long)]
    text: Option<String>,

    /// Scale factor
    #[arg(short = 'x', long)]
    scale: Option<String>,

    /// Directory the images are written to
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

impl RenderArgs {
    fn raw_params(&self) -> RawParams {
        RawParams {
            size: self.size.clone().unwrap_or_default(),
            background: self.background.clone().unwrap_or_default(),
            text_color: self.text_color.clone().unwrap_or_default(),
            text: self.text.clone().unwrap_or_default(),
            scale: self.scale.clone().unwrap_or_default(),
        }
    }

    fn formats(&self) -> Vec<String> {
        if self.formats.is_empty() {
            vec!["png".to_string()]
        } else {
            self.formats.clone()
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve(args) => {
            logging::init(cli.verbose);
            let config = config::load_config(cli.config.as_deref())?
                .with_overrides(args.host, args.port);
            config.validate()?;
            info!(version = env!("CARGO_PKG_VERSION"), "starting placeholdr");
            tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?
                .block_on(server::serve(config))?;
        }
        Command::Render(args) => {
            logging::init(cli.verbose);
            let config = config::load_config(cli.config.as_deref())?;
            let backend = RustBackend::with_font(config.render.font_source());
            let files = render::render_to_dir(
                &backend,
                &args.raw_params(),
                &args.formats(),
                &args.out_dir,
            )?;
            output::print_render_output(&files);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
