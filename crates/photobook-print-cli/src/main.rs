mod job;
mod logger;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use photobook_print::physical::{PAPER_THICKNESS_IN, catalog};
use photobook_print::storage::LocalDirStorage;
use photobook_print::vendor::{PaperType, PrintOrder};
use photobook_print::{CoverLayout, CoverRegion, PrintGenerator, PrintOptions, book_size};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "pbprint", about = "Photo book print file generator", version)]
struct Cli {
    /// Log debug detail to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate cover and interior PDFs for a book job
    Generate {
        /// Job file (JSON: book, pages, photos)
        #[arg(short, long)]
        job: PathBuf,

        /// Directory the PDFs are written to
        #[arg(short, long)]
        output: PathBuf,

        /// Print options file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Separate into CMYK for the size's print profile
        #[arg(long)]
        cmyk: bool,

        /// Interior paper stock
        #[arg(long, value_enum)]
        paper: Option<PaperArg>,

        /// Also print the vendor order built from the result
        #[arg(long)]
        order: bool,

        /// Render and checksum without writing files
        #[arg(long)]
        dry_run: bool,
    },

    /// List the available book sizes
    Sizes,

    /// Show cover spread geometry for a size and page count
    Cover {
        /// Size code, e.g. 8x8
        #[arg(short, long)]
        size: String,

        /// Interior page count
        #[arg(short, long)]
        pages: u32,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum PaperArg {
    Matte,
    Gloss,
    Lustre,
}

impl From<PaperArg> for PaperType {
    fn from(arg: PaperArg) -> Self {
        match arg {
            PaperArg::Matte => Self::Matte,
            PaperArg::Gloss => Self::Gloss,
            PaperArg::Lustre => Self::Lustre,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::StderrLogger::new(cli.verbose).init()?;

    match cli.command {
        Commands::Generate {
            job,
            output,
            config,
            cmyk,
            paper,
            order,
            dry_run,
        } => {
            let mut options = match &config {
                Some(path) => PrintOptions::load(path).await?,
                None => PrintOptions::default(),
            };
            if cmyk {
                options.convert_to_cmyk = true;
            }
            if let Some(paper) = paper {
                options.paper_type = paper.into();
            }
            let paper_type = options.paper_type;

            let job = job::load_job(&job).await?;
            let storage = Arc::new(LocalDirStorage::new(&output));
            let generator = PrintGenerator::new(storage, options)?;

            if dry_run {
                let rendered = generator.render(&job.book, &job.pages, &job.photos).await?;
                println!("Dry run for book {}:", job.book.id);
                println!(
                    "  Cover: {} bytes, md5 {}",
                    rendered.cover.bytes.len(),
                    rendered.cover_checksum
                );
                println!(
                    "  Interior: {} pages, {} bytes, md5 {}",
                    rendered.interior.page_count,
                    rendered.interior.bytes.len(),
                    rendered.interior_checksum
                );
                println!("  Spine: {:.3}in", rendered.spine_width_in);
                for warning in &rendered.warnings {
                    println!("  Warning: {}", warning);
                }
                return Ok(());
            }

            let result = generator
                .generate(&job.book, &job.pages, &job.photos)
                .await?;
            println!("{}", serde_json::to_string_pretty(&result)?);

            if order {
                let order = PrintOrder::from_generation(&job.book, &result, paper_type);
                println!("{}", serde_json::to_string_pretty(&order)?);
            }
        }

        Commands::Sizes => {
            println!("Book sizes:");
            for size in catalog() {
                println!(
                    "  {:<7} {:<22} trim {}x{}in  bleed {:.3}x{:.3}in  {}x{}px  {}",
                    size.code(),
                    size.name(),
                    size.trim_width_in(),
                    size.trim_height_in(),
                    size.bleed_width_in(),
                    size.bleed_height_in(),
                    size.pixel_width(),
                    size.pixel_height(),
                    size.color_profile().name
                );
            }
        }

        Commands::Cover { size, pages } => {
            let spec = book_size(&size)?;
            let layout = CoverLayout::new(spec, pages, PAPER_THICKNESS_IN)?;
            println!("Cover spread for {} with {} pages:", spec.code(), pages);
            println!(
                "  Canvas: {:.3}in x {:.3}in ({:.2}pt x {:.2}pt)",
                layout.width_in(),
                layout.height_in(),
                layout.width_pt(),
                layout.height_pt()
            );
            println!("  Spine: {:.3}in", layout.spine_width_in());
            for region in [CoverRegion::Back, CoverRegion::Spine, CoverRegion::Front] {
                let (start, end) = layout.region_span_in(region);
                println!("  {:?}: {:.3}in - {:.3}in", region, start, end);
            }
        }
    }

    Ok(())
}
