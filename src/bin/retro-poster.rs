use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use retro_poster::{PosterConfig, PosterVariant, storage, viz};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "retro-poster",
    version,
    about = "Render a streamgraph poster (SVG) from monthly per-repository commit counts"
)]
struct Cli {
    /// JSON array of `{ "date": "YYYY-MM", "<repo>": <count>, ... }` records.
    #[arg(short, long, default_value = "data/streamgraph_data.json")]
    data: PathBuf,
    /// Output directory; the file name is fixed by the variant.
    #[arg(short, long, default_value = ".")]
    out: PathBuf,
    /// Poster variant to render.
    #[arg(long, value_enum, default_value_t = Variant::Infographic)]
    variant: Variant,
    /// Reject out-of-order months and negative or non-finite counts.
    #[arg(long, default_value_t = false)]
    strict: bool,
    /// Also write the computed bands and placed labels as JSON.
    #[arg(long)]
    layout_json: Option<PathBuf>,
    /// Print the poster as a `data:` URL to stdout instead of only writing the file.
    #[arg(long, default_value_t = false)]
    data_url: bool,
    /// Locale for thousands separators in the sidebar (e.g., en, de).
    #[arg(long, default_value = "en")]
    locale: String,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Variant {
    Infographic,
    Streamgraph,
}

impl From<Variant> for PosterVariant {
    fn from(v: Variant) -> Self {
        match v {
            Variant::Infographic => PosterVariant::Infographic,
            Variant::Streamgraph => PosterVariant::Streamgraph,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let series = storage::load_series(&cli.data)
        .with_context(|| format!("failed to load {}", cli.data.display()))?;
    if cli.strict {
        series.validate()?;
    }
    eprintln!(
        "Loaded {} months x {} repositories from {}",
        series.len(),
        series.keys().len(),
        cli.data.display()
    );

    let config = PosterConfig::for_variant(cli.variant.into()).with_locale(&cli.locale);
    let (svg, layout) = viz::render_with_layout(&series, &config)?;

    let path = cli.out.join(config.variant.file_name());
    storage::save_svg(&svg, &path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    eprintln!(
        "Wrote {} ({} of {} bands labeled)",
        path.display(),
        layout.labels.len(),
        layout.bands.len()
    );

    if let Some(json_path) = cli.layout_json.as_ref() {
        storage::save_json(&layout, json_path)?;
        eprintln!("Wrote layout to {}", json_path.display());
    }

    if cli.data_url {
        println!("{}", storage::svg_data_url(&svg));
    }

    Ok(())
}
