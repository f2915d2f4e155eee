mod library;

pub use library::ExternalData;
pub use library::Library;
