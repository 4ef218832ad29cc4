pub mod errors;
pub mod gate;

pub use errors::AccessError;
pub use gate::AccessGate;
pub use gate::Principal;
