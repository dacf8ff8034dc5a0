mod config_gen;
mod user;

pub use config_gen::config_generate;
pub use user::{add_user, change_password};
