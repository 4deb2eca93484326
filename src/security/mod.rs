pub mod ban_registry;
pub mod error;
pub mod extractors;
pub mod gate;
pub mod identity;
pub mod login_guard;

pub use ban_registry::BanRegistry;
pub use error::GateError;
pub use gate::LoginGate;
pub use login_guard::LoginGuard;
