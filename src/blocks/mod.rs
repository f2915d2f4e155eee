mod and;
mod block_traits;
mod block_types;
mod esz;
mod gpd;
mod land;
mod lqr;
mod lsig;
mod mtr;
mod sig;
mod tyr;

pub use block_types::BlockType;

pub use and::AND;
pub use and::scrub_cosines;
pub use esz::ESZ;
pub use gpd::GPD;
pub use land::LAND;
pub use lqr::LQR;
pub use lsig::LSIG;
pub use mtr::MTR;
pub use sig::SIG;
pub use sig::XsLocator;
pub use tyr::EmissionData;
pub use tyr::TYR;

pub use block_traits::Parse;
