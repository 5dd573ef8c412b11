//! Region-selection overlay and post-capture quick-access card for a
//! menu-bar screenshot utility.
//!
//! The overlays' behavior lives in platform-independent controllers
//! ([`selection::SelectionOverlay`], [`quick_access::QuickAccessController`]);
//! the AppKit views and windows that host them are macOS-only.

pub mod config;
pub mod error;
pub mod geometry;
pub mod pixels;
pub mod quick_access;
pub mod selection;
pub mod services;
pub mod storage;

#[cfg(target_os = "macos")]
pub mod app;
#[cfg(target_os = "macos")]
pub mod capture;
#[cfg(target_os = "macos")]
pub mod drawing;
#[cfg(target_os = "macos")]
pub mod hotkey;
#[cfg(target_os = "macos")]
pub mod pinned;
#[cfg(target_os = "macos")]
pub mod statusbar;
