use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use verse_deck::content::{self, Selection};
use verse_deck::pack::{PackMode, SlideStyle};
use verse_deck::{config, output, preview, reference, slides};

/// Shared flags for commands that pack a selection.
#[derive(clap::Args, Clone)]
struct PackArgs {
    /// Selection file exported from the Bible browser
    selection: PathBuf,

    /// Deck style
    #[arg(long, value_enum, default_value = "presentation")]
    style: SlideStyle,

    /// Presentation packing mode (overrides config; presentation only)
    #[arg(long, value_enum)]
    mode: Option<PackMode>,

    /// Verses and titles per slide in fixed-count mode (presentation only)
    #[arg(long)]
    per_slide: Option<usize>,

    /// Character budget per slide or caption (overrides config)
    #[arg(long)]
    max_chars: Option<usize>,

    /// Only include these verses, e.g. "1-3,5,9-"
    #[arg(long)]
    verses: Option<String>,
}

#[derive(Parser)]
#[command(name = "verse-deck")]
#[command(about = "Pack Bible verse selections into slide decks")]
#[command(long_about = "\
Pack Bible verse selections into slide decks

Presentation decks group whole verses onto slides, either a fixed number per
slide or as many as fit a soft character budget. Subtitle decks wrap each
verse into caption-sized fragments, breaking only between words.

Selection file:

  {
    \"chapter\": \"Genesis 1\",
    \"items\": [
      { \"key\": \"title-1\", \"kind\": \"title\", \"order\": 0, \"text\": \"The Creation\" },
      { \"key\": \"1\", \"kind\": \"verse\", \"order\": 1, \"text\": \"In the beginning...\" }
    ]
  }

Run 'verse-deck gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Directory containing config.toml
    #[arg(long, default_value = ".", global = true)]
    config_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show how a selection packs into slides
    Pack {
        #[command(flatten)]
        args: PackArgs,
        /// Print the slide groups as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write the deck's slide descriptors as JSON
    Build {
        #[command(flatten)]
        args: PackArgs,
        #[arg(long, default_value = "deck.json")]
        out: PathBuf,
    },
    /// Write an HTML proof sheet of the deck
    Preview {
        #[command(flatten)]
        args: PackArgs,
        #[arg(long, default_value = "preview.html")]
        out: PathBuf,
    },
    /// Validate a selection and the config without packing
    Check {
        /// Selection file exported from the Bible browser
        selection: PathBuf,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Pack { args, json } => {
            let (selection, deck_config) = prepare(&cli.config_dir, &args)?;
            let (groups, _) = slides::build(&selection, args.style, &deck_config)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&groups)?);
            } else {
                output::print_pack_output(&groups, args.style, selection.items.len());
            }
        }
        Command::Build { args, out } => {
            let (selection, deck_config) = prepare(&cli.config_dir, &args)?;
            let (_, deck) = slides::build(&selection, args.style, &deck_config)?;
            slides::write_deck(&deck, &out)?;
            println!(
                "{}",
                output::format_written("deck", deck.slides.len(), &out)
            );
        }
        Command::Preview { args, out } => {
            let (selection, deck_config) = prepare(&cli.config_dir, &args)?;
            let (_, deck) = slides::build(&selection, args.style, &deck_config)?;
            let title = preview_title(&selection, &args.selection);
            preview::write_preview(&deck, &title, &out)?;
            println!(
                "{}",
                output::format_written("preview", deck.slides.len(), &out)
            );
        }
        Command::Check { selection } => {
            println!("==> Checking {}", selection.display());
            let selection = content::load_selection(&selection)?;
            let deck_config = config::load_config(&cli.config_dir)?;
            output::print_check_output(&selection, &deck_config);
            println!("==> Selection is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Load the selection and config, applying `--verses` and override flags.
fn prepare(
    config_dir: &Path,
    args: &PackArgs,
) -> Result<(Selection, config::DeckConfig), Box<dyn std::error::Error>> {
    let overrides = config::Overrides {
        mode: args.mode,
        items_per_slide: args.per_slide,
        max_chars: args.max_chars,
    };
    let deck_config = config::load_config_with(config_dir, &overrides, args.style)?;
    let mut selection = content::load_selection(&args.selection)?;
    if let Some(query) = &args.verses {
        let ranges = reference::parse_verse_ranges(query)?;
        selection = selection.filter_verses(&ranges);
        log::info!(
            "verse filter {query:?} kept {} items",
            selection.items.len()
        );
    }
    Ok((selection, deck_config))
}

fn preview_title(selection: &Selection, path: &Path) -> String {
    selection.chapter.clone().unwrap_or_else(|| {
        path.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Deck".to_string())
    })
}
