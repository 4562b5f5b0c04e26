//! Command implementations and terminal output.

pub mod admin;
pub mod cart;
pub mod catalog;
pub mod orders;

use delicious_bakers_storefront::error::AppError;
use delicious_bakers_storefront::notify::Notification;

/// Echo notifications collected during a command.
pub fn print_notifications(notifications: &[Notification]) {
    #[allow(clippy::print_stdout)]
    {
        for n in notifications {
            println!("✓ {}: {}", n.title, n.description);
        }
    }
}

/// Show a failed command to the user.
pub fn print_error(error: &AppError) {
    #[allow(clippy::print_stderr)]
    {
        eprintln!("Error: {}", error.user_message());
    }
}
