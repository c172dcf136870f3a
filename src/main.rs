//! Command-line host for Richkit documents

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use richkit::{
    default_config_path, init_logging, resolve_decorations, Config, DirectoryExportSink,
    EditorController, FilePrintSurface, FsImageReader, Selection, BUILD_DATE, VERSION,
};

const PRINT_FILE_NAME: &str = "print.html";

#[derive(Debug, Parser)]
#[command(name = "richkit", version = VERSION, about = "Print, export and inspect Richkit documents")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Configuration file (JSON or TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output directory for print and export
    #[arg(long, global = true)]
    out: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Write the print page
    Print { document: PathBuf },
    /// Write the Word export
    Export { document: PathBuf },
    /// List link and image spans per block
    Decorations { document: PathBuf },
    /// Re-emit the document in canonical form
    Normalize { document: PathBuf },
    /// Append an image file to the document and print the result
    Image { document: PathBuf, image: PathBuf },
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(Config::load_or_default(&default_config_path()?)?),
    }
}

fn open_editor(path: &Path, config: &Config) -> anyhow::Result<EditorController> {
    EditorController::open(path, config).with_context(|| format!("opening {}", path.display()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;
    init_logging(&config.logging)?;
    tracing::debug!(version = VERSION, build_date = BUILD_DATE, "richkit starting");

    let out_dir = args
        .out
        .clone()
        .unwrap_or_else(|| config.export.output_directory.clone());

    match args.command {
        Command::Print { document } => {
            let editor = open_editor(&document, &config)?;
            let mut surface = FilePrintSurface::new(out_dir.join(PRINT_FILE_NAME));
            editor.print(&mut surface)?;
            println!("{}", surface.path().display());
        }
        Command::Export { document } => {
            let editor = open_editor(&document, &config)?;
            let mut sink = DirectoryExportSink::new(&out_dir);
            editor.export(&mut sink)?;
            if let Some(path) = sink.last_written() {
                println!("{}", path.display());
            }
        }
        Command::Decorations { document } => {
            let editor = open_editor(&document, &config)?;
            for span in resolve_decorations(editor.document()) {
                println!(
                    "{}\t{}..{}\t{}\t{}",
                    span.block_key,
                    span.start,
                    span.end,
                    span.entity_type.as_str(),
                    span.entity_key.0
                );
            }
        }
        Command::Normalize { document } => {
            let editor = open_editor(&document, &config)?;
            println!("{}", editor.document().to_json_pretty());
        }
        Command::Image { document, image } => {
            let mut editor = open_editor(&document, &config)?;
            editor.set_selection(Selection::at_end(editor.document()));
            editor
                .insert_image_from(&FsImageReader::new(), &image)
                .await
                .with_context(|| format!("reading image {}", image.display()))?;
            println!("{}", editor.document().to_json_pretty());
        }
    }

    Ok(())
}
