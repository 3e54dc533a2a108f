pub mod indicators;
pub mod patterns;
pub mod projection;
pub mod waves;


pub use indicators::*;
pub use patterns::*;
pub use projection::*;
pub use waves::*;
