#![allow(non_snake_case, clippy::upper_case_acronyms)]

mod api;
mod arena;
mod arrays;
mod blocks;
mod branch;
mod config;
mod data;
mod decode;
mod error;
mod header;
mod utils;
mod validate;

pub use api::{ExternalData, Library};
pub use arena::{Handle, Linked, ListIter, RecordArena};
pub use branch::{
    apply_isomeric_branches, apply_secondary_branches, apply_yield_branches, finalize_graph,
};
pub use config::LoaderConfig;
pub use data::{
    BranchListEntry, BranchRatio, FissionYield, Frame, LoadStage, Multiplicity, Nuclide,
    NuclideKind, Reaction, ReactionKind, XsSlice, split_zai, zai_from_za,
};
pub use decode::AceTable;
pub use error::{GraceError, Result};
pub use validate::validate_graph;
