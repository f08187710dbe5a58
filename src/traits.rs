//! Traits that decouple wsnav from the layout engine and from the
//! transport that delivers commands.
//!
//! The [`WorkspaceSwitcher`](crate::switcher::WorkspaceSwitcher) only
//! depends on these abstractions.

use crate::command::{Command, Reply};
use crate::tree::{NodeId, Tree};
use std::sync::mpsc;

/// Geometry hint meaning "keep the output's current size".
pub const KEEP_GEOMETRY: i32 = -1;

/// The layout engine that re-arranges an output once a workspace becomes
/// visible.
///
/// An implementation might talk to a compositor, or it might be a
/// recorder used in tests.
pub trait Arranger {
    /// The error type produced by this arranger.
    type Error: std::error::Error + Send + 'static;

    /// Lay out `workspace` within the given size.  Both hints are
    /// [`KEEP_GEOMETRY`] when the existing geometry should be reused.
    fn arrange(
        &self,
        tree: &Tree,
        workspace: NodeId,
        width_hint: i32,
        height_hint: i32,
    ) -> Result<(), Self::Error>;
}

/// A command together with the channel its [`Reply`] must be sent on.
#[derive(Debug)]
pub struct Request {
    pub command: Command,
    pub reply: mpsc::Sender<Reply>,
}

impl Request {
    /// Build a request and the receiver its reply will arrive on.
    pub fn new(command: Command) -> (Self, mpsc::Receiver<Reply>) {
        let (reply, rx) = mpsc::channel();
        (Self { command, reply }, rx)
    }
}

/// A source of [`Request`]s.
///
/// Implementations listen on some transport and forward parsed commands
/// into the provided [`mpsc::Sender`].  The tree itself is only touched by
/// whoever drains the channel, so sources can live on their own threads.
///
/// # Contract
///
/// * [`run`](CommandSource::run) **blocks** until the source is exhausted or
///   an unrecoverable error occurs.
/// * Each received command must be sent through `sink` exactly once.
pub trait CommandSource: Send {
    /// The error type produced by this source.
    type Error: std::error::Error + Send + 'static;

    /// Start listening and forward every incoming command into `sink`.
    fn run(&mut self, sink: mpsc::Sender<Request>) -> Result<(), Self::Error>;
}
