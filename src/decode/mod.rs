mod decoder;
mod table;

pub use table::AceTable;
