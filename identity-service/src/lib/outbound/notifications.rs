pub mod email;

pub use email::HttpConfirmationNotifier;
