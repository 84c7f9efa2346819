//! # Logging Macros
//!
//! Convenience macros for structured events that appear across handlers.

/// Log an authentication event.
///
/// # Example
///
/// ```rust
/// logging::log_auth_event!("login", "user-1", true);
/// ```
#[macro_export]
macro_rules! log_auth_event {
    ($event:expr, $subject:expr, $success:expr) => {
        $crate::__private::tracing::info!(
            target: "auth",
            event = %$event,
            subject = %$subject,
            success = $success,
            "Authentication event"
        )
    };
}

/// Log a rejected access attempt.
#[macro_export]
macro_rules! log_access_denied {
    ($user_id:expr, $details:expr) => {
        $crate::__private::tracing::warn!(
            target: "security",
            user_id = %$user_id,
            details = %$details,
            "Access denied"
        )
    };
}
