//! The crate-wide error type.
//!
//! Per spec, handlers in the event dispatcher never propagate an `Error` out
//! of the loop: invariants are restored locally and the error is logged.
//! `Result` is still useful internally for startup, configuration loading,
//! and operations with a user-notifiable failure mode (`split`, `remove`).
use crate::window::Xid;
use std::path::PathBuf;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong inside the core window-management engine.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The underlying X connection could not be established at startup.
    #[error("unable to open the X display: {0}")]
    DisplayOpenFailed(String),

    /// `SUBSTRUCTURE_REDIRECT` was refused: another window manager already owns the root window.
    #[error("another window manager is already running")]
    AnotherWmRunning,

    /// One of the utility windows required at startup (the EWMH check window, the focus
    /// fallback window) could not be created.
    #[error("failed to create required utility window: {0}")]
    UtilityWindowCreationFailed(String),

    /// The configuration file could not be parsed. The old configuration is retained.
    #[error("{path}:{line}:{column}: {message}")]
    ConfigParse {
        /// Path of the file that failed to parse
        path: PathBuf,
        /// 1-indexed line of the offending token
        line: usize,
        /// 1-indexed column of the offending token
        column: usize,
        /// Human readable diagnostic
        message: String,
    },

    /// A requested operation is well formed but cannot be carried out given the
    /// current state (e.g. removing the only frame on a monitor). User-visible,
    /// does not change any state.
    #[error("{0}")]
    OperationInvalid(String),

    /// A window referenced by id is not known to the registry.
    #[error("window {0} is not known to the window manager")]
    UnknownWindow(Xid),

    /// A frame referenced by id is not known to the frame arena.
    #[error("frame {0:?} is not known to the frame manager")]
    UnknownFrame(crate::frame::FrameId),

    /// No monitor exists at the given point or of the given name.
    #[error("no monitor named {0:?}")]
    UnknownMonitor(String),

    /// Spawning a child process for `RUN` / `SHOW-MESSAGE-RUN` failed.
    #[error("failed to spawn child process: {0}")]
    Spawn(#[from] std::io::Error),

    /// A transient X error on a per-window request (the client died mid-request).
    /// Callers should swallow this: the subsequent destroy/unmap event drives cleanup.
    #[error("transient X error for window {0}: {1}")]
    TransientX(Xid, String),

    /// A mock `XConn` method was called without a provided implementation.
    #[error("no mock implementation was provided for this XConn method")]
    UnimplementedMock,
}
