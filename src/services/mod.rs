pub mod email;
pub mod messaging;
pub mod notifications;
