use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "xtask")]
#[command(about = "Build tools for minimal-quake2-base")]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Option<Cmd>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Cmd {
    /// Clone yquake2 and ref_vk at their pinned commits and fetch the map tools.
    Clone,

    /// Build the engine, renderer, maps and game, and assemble `release/`.
    Build,

    /// Build the game library into `release/baseq2/`.
    BuildGame,

    /// Compile every map in `base/maps` (qbsp, vis, light).
    BuildMaps,

    /// Do everything: clone, build, run.
    All,

    /// Build the game library, then run the game.
    BuildGameAndRun {
        /// Arguments passed to the game (e.g. `+map start`).
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Run the game.
    Run {
        /// Arguments passed to the game (e.g. `+map start`).
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Copy binaries and assets into `release/`.
    Copy,

    /// Copy files, then run the game.
    CopyAndRun {
        /// Arguments passed to the game (e.g. `+map start`).
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Install the TrenchBroom game profile.
    #[command(name = "setup-trenchbroom")]
    SetupTrenchbroom,

    /// Get metrics on how much code is in game-c.
    LocMetrics,

    /// Check required tools and pinned checkout revisions.
    Doctor,
}
