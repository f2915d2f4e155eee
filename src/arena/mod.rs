mod arena;
mod handle;

pub use arena::{Linked, ListIter, RecordArena};
pub use handle::Handle;
