pub mod login_guard;
pub mod security_ban;
