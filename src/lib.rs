//! Core window-management engine for a tiling X11 window manager.
//!
//! This crate is the engine only: transport (speaking the X11 wire
//! protocol), configuration parsing and rendering/OSD are external
//! collaborators reached through the traits in [`x`] and [`ui`]. Everything
//! here is testable without a live X server via [`x::mock`].
pub mod action;
pub mod bindings;
pub mod config;
pub mod error;
pub mod ewmh;
pub mod focus;
pub mod frame;
pub mod geometry;
pub mod monitor;
pub mod moveresize;
pub mod shell;
pub mod ui;
pub mod window;
pub mod wm;
pub mod x;
