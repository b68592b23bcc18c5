//! retro_poster
//!
//! Renders a career-retrospective poster from monthly per-repository commit counts:
//! a vertical streamgraph with labeled bands, optionally next to a statistics sidebar.
//! Pairs with the `retro-poster` CLI.
//!
//! ### Features
//! - Inside-out, wiggle-offset stacking of repository bands
//! - Greedy, collision-free label placement at each band's thickest point
//! - Deterministic colours (explicit table plus hash-indexed fallback palette)
//! - Standalone SVG output, optionally as a `data:` URL
//!
//! ### Example
//! ```no_run
//! use retro_poster::{PosterConfig, PosterVariant, storage, viz};
//!
//! let series = storage::load_series("data/streamgraph_data.json")?;
//! let config = PosterConfig::for_variant(PosterVariant::Infographic);
//! let svg = viz::render_poster(&series, &config)?;
//! storage::save_svg(&svg, config.variant.file_name())?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod color;
pub mod config;
pub mod curve;
pub mod error;
pub mod labels;
pub mod models;
pub mod scale;
pub mod stack;
pub mod stats;
pub mod storage;
pub mod viz;

pub use color::ColorResolver;
pub use config::{PosterConfig, PosterVariant};
pub use error::{PosterError, PosterResult};
pub use labels::{LabelConfig, LabelPlacer};
pub use models::{Band, LabelCandidate, PlacedLabel, Series, TimeSeriesPoint};
pub use stack::{StackBuilder, StackOffset, StackOrder};
