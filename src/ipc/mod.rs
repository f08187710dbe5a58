//! IPC listener that accepts commands over a Unix socket.
//!
//! Scripts and key-binding helpers can connect to the socket, send
//! workspace commands one per line and read one JSON reply per command.

pub mod listener;
