//! Repository implementations over the PostgreSQL pool.

pub mod preference;
pub mod settings;
pub mod user;

pub use preference::PreferenceRepository;
pub use settings::SettingsRepository;
pub use user::UserRepository;
