mod branch_list;
mod fission_yield;
mod mt;
mod nuclide;
mod reaction;

pub use branch_list::BranchListEntry;
pub use branch_list::BranchRatio;
pub use fission_yield::FissionYield;
pub use mt::MTNumber;
pub use mt::SecondaryParticle;
pub use mt::charged_emission;
pub use mt::is_fission_family;
pub use mt::is_level_inelastic;
pub use mt::reaction_name;
pub use mt::superseding_partials;
pub use nuclide::LoadStage;
pub use nuclide::Nuclide;
pub use nuclide::NuclideKind;
pub use nuclide::split_zai;
pub use nuclide::zai_from_za;
pub use reaction::Frame;
pub use reaction::Multiplicity;
pub use reaction::Reaction;
pub use reaction::ReactionKind;
pub use reaction::XsSlice;
