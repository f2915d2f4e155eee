//=====================================================================
// Loader configuration.
//
// All fields are read once, up front. Nothing here may change the
// meaning of data already loaded, so the configuration is passed by
// shared reference through the whole pipeline.
//=====================================================================

#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Emit a non-sampled heating (KERMA) channel for each nuclide.
    pub include_heat_production: bool,
    /// Emit a non-sampled photon-production channel when the table
    /// carries one.
    pub include_photon_production: bool,
    /// Run the secondary-particle branching pass. Off by default
    /// because it only matters for coupled-particle calculations.
    pub enable_secondary_branching: bool,
    /// Use tabulated energy-dependent isomeric branch ratios and
    /// energy-dependent fission yields where available. When false,
    /// only fixed ratios and the seeded yield chain head are used.
    pub enable_energy_dependent_yields: bool,
    /// Ceiling on fixed-ratio branch entries accepted per nuclide.
    pub max_fixed_branch_entries: usize,
    /// Ceiling on records held by one arena. Exceeding it aborts the
    /// process, since the loader was configured below the size of its
    /// own input.
    pub max_arena_records: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        LoaderConfig {
            include_heat_production: false,
            include_photon_production: false,
            enable_secondary_branching: false,
            enable_energy_dependent_yields: true,
            max_fixed_branch_entries: 20,
            max_arena_records: 1 << 22,
        }
    }
}
