//! Unix-socket [`CommandSource`] implementation.
//!
//! Binds a Unix stream socket and serves one connection at a time.  Every
//! line received is parsed as a [`Command`] and answered with exactly one
//! line of JSON.
//!
//! # Wire format
//!
//! Requests use the same text as key-binding commands:
//!
//! ```text
//! workspace next
//! workspace 3: mail
//! workspace back_and_forth
//! get_workspaces
//! ```
//!
//! Replies are serialized [`Reply`] values:
//!
//! ```json
//! {"success":true,"workspace":"2"}
//! {"success":false,"error":"unknown command: \"kill\""}
//! ```

use crate::command::{Command, Reply};
use crate::traits::{CommandSource, Request};
use log::{debug, error, info, warn};
use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::{Path, PathBuf};
use std::sync::mpsc;

/// A [`CommandSource`] that listens on a Unix stream socket.
///
/// When a connection closes, the listener waits for the next one.
pub struct UnixSocketListener {
    path: PathBuf,
}

/// Errors produced by the Unix socket listener.
#[derive(Debug, thiserror::Error)]
pub enum UnixSocketError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json encode error: {0}")]
    Json(#[from] serde_json::Error),
}

/// What to do after a connection ends.
enum Served {
    Disconnected,
    SinkClosed,
}

impl UnixSocketListener {
    /// Create a new listener bound to `path`.
    ///
    /// The socket file is created when [`run`](CommandSource::run) is called.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// The filesystem path of the socket.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn serve(
        &self,
        stream: UnixStream,
        sink: &mpsc::Sender<Request>,
    ) -> Result<Served, UnixSocketError> {
        let mut writer = stream.try_clone()?;
        let reader = BufReader::new(stream);
        for line in reader.lines() {
            let text = line?;
            if text.trim().is_empty() {
                continue;
            }
            let reply = match text.parse::<Command>() {
                Ok(command) => {
                    debug!("received {:?}", command);
                    let (request, rx) = Request::new(command);
                    if sink.send(request).is_err() {
                        return Ok(Served::SinkClosed);
                    }
                    match rx.recv() {
                        Ok(reply) => reply,
                        Err(_) => return Ok(Served::SinkClosed),
                    }
                }
                Err(e) => {
                    warn!("bad command: {:?}: {}", text, e);
                    Reply::failure(e)
                }
            };
            let mut json = serde_json::to_string(&reply)?;
            json.push('\n');
            writer.write_all(json.as_bytes())?;
        }
        Ok(Served::Disconnected)
    }
}

impl CommandSource for UnixSocketListener {
    type Error = UnixSocketError;

    /// Bind the socket and start accepting connections.
    ///
    /// This method **blocks** until the sink is closed.  Run it on a
    /// dedicated thread.
    fn run(&mut self, sink: mpsc::Sender<Request>) -> Result<(), Self::Error> {
        // Remove stale socket if present.
        let _ = std::fs::remove_file(&self.path);

        let listener = UnixListener::bind(&self.path)?;
        info!("listening on {}", self.path.display());

        for stream in listener.incoming() {
            match stream {
                Ok(stream) => {
                    debug!("client connected");
                    match self.serve(stream, &sink) {
                        Ok(Served::Disconnected) => debug!("client disconnected"),
                        Ok(Served::SinkClosed) => {
                            info!("sink closed, shutting down");
                            break;
                        }
                        Err(e) => error!("client error: {}", e),
                    }
                }
                Err(e) => {
                    error!("accept error: {}", e);
                }
            }
        }
        let _ = std::fs::remove_file(&self.path);
        Ok(())
    }
}

//  Tests
