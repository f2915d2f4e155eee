mod helper_functions;
pub mod testing;

pub use helper_functions::compute_temperature_from_kT;
pub use helper_functions::parse_float_fields;
pub use helper_functions::parse_integer_fields;
pub use helper_functions::read_lines;
pub use helper_functions::skip_lines;
