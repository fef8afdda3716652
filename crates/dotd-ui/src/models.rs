//! Shared view-model types used across the shell and components.

/// Toast variants used across the UI.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    /// Informational toast.
    Info,
    /// Success toast.
    Success,
    /// Error toast.
    Error,
}

/// Toast payload used by the host and app state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    /// Monotonic toast identifier.
    pub id: u64,
    /// Display message for the toast.
    pub message: String,
    /// Severity classification.
    pub kind: ToastKind,
}

/// Navigation labels supplied by the router shell.
#[derive(Clone, PartialEq, Eq)]
pub struct NavLabels {
    /// Home nav label.
    pub home: String,
    /// Feed nav label.
    pub feed: String,
    /// Generate nav label.
    pub generate: String,
    /// My-page nav label.
    pub mypage: String,
    /// Login nav label.
    pub login: String,
}
