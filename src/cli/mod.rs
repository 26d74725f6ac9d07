//! CLI argument definitions for Plotkeeper.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};

/// Plotkeeper - track which garden cells are planted and when they are ready.
///
/// Start with `pk init <name> <zone>`, add containers and plants, then create cells.
#[derive(Parser, Debug)]
#[command(name = "pk")]
#[command(
    author,
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("PK_GIT_COMMIT"), " ", env!("PK_BUILD_TIMESTAMP"), ")"),
    about = "Garden cell occupancy and harvest scheduling",
    long_about = None
)]
pub struct Cli {
    /// Output in human-readable format instead of JSON
    #[arg(short = 'H', long = "human", global = true)]
    pub human_readable: bool,

    /// Run as if pk was started in <path> instead of the current directory.
    /// Can also be set via PK_GARDEN environment variable.
    #[arg(short = 'C', long = "garden", global = true, env = "PK_GARDEN")]
    pub garden_path: Option<std::path::PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new garden in the current directory
    Init {
        /// Garden name
        name: String,
        /// USDA hardiness zone (e.g., 7a)
        zone: String,
    },

    /// Show garden statistics
    Summary,

    /// Container management commands
    Container {
        #[command(subcommand)]
        command: ContainerCommands,
    },

    /// Plant library commands
    Plant {
        #[command(subcommand)]
        command: PlantCommands,
    },

    /// Planting cell commands
    Cell {
        #[command(subcommand)]
        command: CellCommands,
    },

    /// List cells due for harvest soon (overdue cells included)
    Harvests {
        /// Days ahead to look (default: harvest-window config, 7)
        #[arg(short, long, allow_negative_numbers = true)]
        days: Option<i64>,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Show recent entries from the action log
    Log {
        /// Maximum number of entries to show (most recent last)
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,
    },
}

/// Container subcommands
#[derive(Subcommand, Debug)]
pub enum ContainerCommands {
    /// Add a container to the garden
    Add {
        #[command(subcommand)]
        kind: ContainerKindArgs,
    },

    /// List containers
    List,

    /// Show container geometry and growing details
    Show {
        /// Container ID
        id: String,

        /// Plant spacing in inches, to report how many plants fit
        #[arg(long)]
        spacing: Option<f64>,

        /// Unit for the soil estimate
        #[arg(long, value_enum, default_value = "cubic-feet")]
        soil_unit: SoilUnitArg,
    },

    /// Move a pot to a new location (pots only)
    Move {
        /// Container ID
        id: String,
        /// New location
        location: String,
    },
}

/// Shared identity arguments for new containers
#[derive(Args, Debug)]
pub struct ContainerIdentity {
    /// Unique container ID (e.g., bed1)
    pub id: String,

    /// Display name
    pub name: String,

    /// Where the container sits (e.g., backyard)
    #[arg(short, long)]
    pub location: Option<String>,
}

/// Container shapes
#[derive(Subcommand, Debug)]
pub enum ContainerKindArgs {
    /// Rectangular raised bed
    Bed {
        #[command(flatten)]
        identity: ContainerIdentity,

        /// Length in inches
        #[arg(long)]
        length: f64,

        /// Width in inches
        #[arg(long)]
        width: f64,

        /// Depth in inches
        #[arg(long)]
        depth: f64,

        /// Frame material
        #[arg(long, default_value = "wood")]
        material: String,
    },

    /// Circular pot
    Pot {
        #[command(flatten)]
        identity: ContainerIdentity,

        /// Diameter in inches
        #[arg(long)]
        diameter: f64,

        /// Depth in inches
        #[arg(long)]
        depth: f64,

        /// The pot has no drainage holes
        #[arg(long)]
        no_drainage_holes: bool,
    },

    /// Greenhouse planter
    Greenhouse {
        #[command(flatten)]
        identity: ContainerIdentity,

        /// Length in inches
        #[arg(long)]
        length: f64,

        /// Width in inches
        #[arg(long)]
        width: f64,

        /// Depth in inches
        #[arg(long)]
        depth: f64,

        /// The greenhouse is heated
        #[arg(long)]
        heated: bool,

        /// The greenhouse has supplemental grow lights
        #[arg(long)]
        grow_lights: bool,
    },
}

/// Soil volume units
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum SoilUnitArg {
    CubicInches,
    CubicFeet,
    CubicYards,
}

/// Plant library subcommands
#[derive(Subcommand, Debug)]
pub enum PlantCommands {
    /// Add a species to the plant library
    Add {
        #[command(subcommand)]
        kind: PlantKindArgs,
    },

    /// List plants in the library
    List {
        /// Filter by exact category tag (vegetable, herb, flower)
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Show growing details for a plant
    Show {
        /// Plant ID
        id: String,
    },
}

/// Shared identity arguments for new plants
#[derive(Args, Debug)]
pub struct PlantIdentity {
    /// Unique plant ID (e.g., v1)
    pub id: String,

    /// Common name (e.g., Tomato)
    pub common_name: String,

    /// Scientific name (e.g., "Solanum lycopersicum")
    pub scientific_name: String,

    /// Days from planting to harvest
    pub maturity_days: u32,
}

/// Plant categories
#[derive(Subcommand, Debug)]
pub enum PlantKindArgs {
    /// A vegetable
    Vegetable {
        #[command(flatten)]
        identity: PlantIdentity,

        /// Pick repeatedly instead of one final harvest
        #[arg(long)]
        continuous: bool,
    },

    /// A culinary herb
    Herb {
        #[command(flatten)]
        identity: PlantIdentity,

        /// Comes back every year
        #[arg(long)]
        perennial: bool,
    },

    /// A flowering plant
    Flower {
        #[command(flatten)]
        identity: PlantIdentity,

        /// Bloom color
        #[arg(long)]
        bloom_color: String,

        /// Does not attract pollinators
        #[arg(long)]
        no_pollinators: bool,
    },
}

/// Cell subcommands
#[derive(Subcommand, Debug)]
pub enum CellCommands {
    /// Create an empty cell in a container
    Create {
        /// Container ID
        container: String,
        /// Row label (e.g., A)
        row: String,
        /// Column number
        column: u32,
    },

    /// List cells
    List {
        /// Only cells with nothing planted
        #[arg(long, conflicts_with = "occupied")]
        available: bool,

        /// Only cells with something planted
        #[arg(long)]
        occupied: bool,
    },

    /// Show a cell and its occupant
    Show {
        /// Cell ID (e.g., bed1_A1)
        id: String,
    },

    /// Plant a library species into an empty cell
    Plant {
        /// Cell ID
        cell: String,
        /// Plant ID from the library
        plant: String,
        /// Planting date (YYYY-MM-DD); defaults to now
        #[arg(long)]
        planted_on: Option<NaiveDate>,
    },

    /// Harvest a cell, leaving it empty
    Harvest {
        /// Cell ID
        cell: String,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Get a configuration value and where it came from
    Get {
        /// Configuration key
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// Configuration value
        value: String,
        /// Write to the system config instead of this garden's
        #[arg(long)]
        system: bool,
    },

    /// List all configuration values
    List,
}
