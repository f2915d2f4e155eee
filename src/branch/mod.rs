mod finalize;
mod isomeric;
mod secondary;
mod yields;

pub use finalize::finalize_graph;
pub use isomeric::apply_isomeric_branches;
pub use secondary::apply_secondary_branches;
pub use yields::apply_yield_branches;
