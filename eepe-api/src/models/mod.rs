mod claims;
mod cloud;
mod device;

pub use claims::*;
pub use cloud::*;
pub use device::*;
