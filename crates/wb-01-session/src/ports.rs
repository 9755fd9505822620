//! Outbound ports and optional capabilities of the session engine.
//!
//! [`NativeBankUi`] is a required port; the engine cannot run without a way
//! to suppress and restore the host's own bank view. The window handle and
//! chat sink are capabilities: optional collaborators registered once at
//! startup. The engine checks their presence and stays silent when they
//! are absent, so a headless deployment is just an engine with nothing
//! registered.

/// Control over the host's native bank view.
pub trait NativeBankUi: Send + Sync {
    /// Hides the host's bank view in favor of ours. Idempotent.
    fn suppress_native_view(&self);

    /// Brings the host's bank view back. Idempotent; called
    /// unconditionally on close and during recovery.
    fn restore_native_view(&self);
}

/// The engine's own bank window, when a frontend registered one.
pub trait BankWindowHandle: Send + Sync {
    /// Shows the window. Only called outside combat.
    fn show(&self);

    /// Hides the window. Only called outside combat.
    fn hide(&self);
}

/// User-visible one-line messages, when a frontend registered a sink.
pub trait ChatSink: Send + Sync {
    /// Delivers one message to the user.
    fn message(&self, text: &str);
}
