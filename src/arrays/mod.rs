mod jxs;
mod nxs;

pub use jxs::JxsArray;
pub use nxs::NxsArray;

/// Borrowed view of one table's control arrays and payload, threaded
/// through block parsing.
pub struct Arrays<'a> {
    pub nxs: &'a NxsArray,
    pub jxs: &'a JxsArray,
    pub xxs: &'a [f64],
}
