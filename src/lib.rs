//! **wsnav**: workspace navigation and naming for a tiling window manager.
//!
//! The container tree is two levels deep at the top: the root holds
//! outputs (monitors) and every output holds an ordered list of named
//! workspaces.  wsnav resolves references such as `next`,
//! `prev_on_output`, `current` or a literal name to a workspace, creates
//! named workspaces on first use, names new workspaces automatically from
//! the configured key bindings, and commits focus changes with
//! back-and-forth history.
//!
//! # Architecture
//!
//! * [`tree`]: the container tree and its focus pointers.
//! * [`naming`], [`navigation`], [`resolver`]: pure functions over the tree.
//! * [`switcher::WorkspaceSwitcher`]: owns the tree and the history, and
//!   drives an [`traits::Arranger`] so it is not coupled to any layout
//!   engine.
//! * [`traits::CommandSource`]: abstracts the transport delivering
//!   commands; [`ipc`] provides a Unix-socket implementation.

pub mod command;
pub mod config;
pub mod ipc;
pub mod naming;
pub mod navigation;
pub mod resolver;
pub mod switcher;
pub mod traits;
pub mod tree;
