use clap::{Parser, Subcommand};
use respimg::{config, optimize, output, verify};
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
            // Leaked once at startup — trivial, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "respimg")]
#[command(about = "Responsive image pipeline for static sites")]
#[command(long_about = "\
Responsive image pipeline for static sites

The optimize command scans source directories for JPEG and PNG files and
writes, per image, one scaled WebP derivative per breakpoint width (never
upscaled) plus one optimized same-format fallback, then a manifest.json
summarizing everything produced:

  public/optimized/
  ├── room-320w.webp
  ├── room-640w.webp
  ├── room-optimized.png
  └── manifest.json

The verify command runs a pre-deployment checklist against a built site
root: sitemap, robots.txt, head markup on the landing page, and the
optimizer manifest.

Run 'respimg gen-config' to print a documented respimg.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Config file (defaults to respimg.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate scaled WebP derivatives, fallbacks, and the manifest
    Optimize {
        /// Source directories to scan (overrides config)
        #[arg(long)]
        source: Vec<PathBuf>,

        /// Output directory for derivatives (overrides config)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Run the pre-deployment site checklist
    Verify {
        /// Built site root to check
        #[arg(long, default_value = ".")]
        root: PathBuf,
    },
    /// Print a stock respimg.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Optimize { source, output } => {
            let mut pipeline = config::load(cli.config.as_deref())?;
            if !source.is_empty() {
                pipeline.sources = source;
            }
            if let Some(output_dir) = output {
                pipeline.output_dir = output_dir;
            }
            pipeline.validate()?;

            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    for line in output::format_process_event(&event) {
                        println!("{}", line);
                    }
                }
            });
            let outcome = optimize::optimize(&pipeline, Some(tx))?;
            printer.join().unwrap();
            output::print_summary(&outcome.report);
        }
        Command::Verify { root } => {
            let report = verify::run_checks(&root, &verify::default_checks());
            output::print_verify_report(&report);
            if !report.all_passed() {
                std::process::exit(1);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
