//! Entry point for the **wsnav** daemon.
//!
//! Builds the container tree from the configured outputs, spawns the
//! Unix-socket [`CommandSource`](wsnav::traits::CommandSource) on a
//! background thread and processes every command on the main thread, which
//! is the only thread that ever touches the tree.

use log::{error, info, warn};
use std::sync::mpsc;
use wsnav::command::Reply;
use wsnav::config::Config;
use wsnav::ipc::listener::UnixSocketListener;
use wsnav::switcher::WorkspaceSwitcher;
use wsnav::traits::{CommandSource, Request};
use wsnav::tree::Tree;

/// Output used when the configuration names none.
const FALLBACK_OUTPUT: &str = "HEADLESS-1";

/// Default socket path for the command listener.
fn default_socket_path() -> String {
    let runtime = std::env::var("XDG_RUNTIME_DIR").unwrap_or_else(|_| "/tmp".into());
    format!("{}/wsnav.sock", runtime)
}

/// Resolve the config directory (`$XDG_CONFIG_HOME/wsnav`).
fn config_dir() -> std::path::PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME").unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        format!("{}/.config", home)
    });
    std::path::PathBuf::from(base).join("wsnav")
}

/// Try to load the config from `$XDG_CONFIG_HOME/wsnav/config.json`,
/// falling back to compiled-in defaults.
fn load_config() -> Config {
    let path = config_dir().join("config.json");
    match Config::load(&path) {
        Ok(cfg) => {
            info!("loaded config from {}", path.display());
            cfg
        }
        Err(e) => {
            info!("no config file ({}), using defaults", e);
            Config::default()
        }
    }
}

//  Arranger that only logs

mod log_arranger {
    use log::info;
    use wsnav::traits::Arranger;
    use wsnav::tree::{NodeId, Tree};

    /// Stand-in layout engine: reports which workspace became visible.
    pub struct LogArranger;

    #[derive(Debug, thiserror::Error)]
    #[error("arrange")]
    pub struct LogArrangerError;

    impl Arranger for LogArranger {
        type Error = LogArrangerError;

        fn arrange(
            &self,
            tree: &Tree,
            workspace: NodeId,
            width_hint: i32,
            height_hint: i32,
        ) -> Result<(), LogArrangerError> {
            let output = tree
                .parent_of(workspace)
                .and_then(|o| tree.name(o))
                .unwrap_or("?");
            info!(
                "arrange {} on {} ({}x{})",
                tree.name(workspace).unwrap_or("?"),
                output,
                width_hint,
                height_hint
            );
            Ok(())
        }
    }
}

use log_arranger::LogArranger;

//  Main

fn main() {
    env_logger::init();

    let config = load_config();

    let mut switcher = WorkspaceSwitcher::new(LogArranger, Tree::new());
    switcher.set_bindings(config.bindings().to_vec());
    switcher.set_auto_back_and_forth(config.auto_back_and_forth);

    let outputs = if config.outputs.is_empty() {
        warn!("no outputs configured, using {}", FALLBACK_OUTPUT);
        vec![FALLBACK_OUTPUT.to_string()]
    } else {
        config.outputs.clone()
    };
    for output in &outputs {
        if let Err(e) = switcher.add_output(output) {
            error!("failed to add output {}: {}", output, e);
            std::process::exit(1);
        }
    }

    let (req_tx, req_rx) = mpsc::channel::<Request>();
    spawn_command_sources(req_tx);

    info!("wsnav running");
    for request in req_rx {
        let reply = match switcher.handle(request.command) {
            Ok(reply) => reply,
            Err(e) => {
                error!("command error: {}", e);
                Reply::failure(e)
            }
        };
        let _ = request.reply.send(reply);
    }
    info!("all command sources closed, exiting");
}

//  Helpers

fn spawn_command_sources(tx: mpsc::Sender<Request>) {
    let path = default_socket_path();
    std::thread::spawn(move || {
        let mut source = UnixSocketListener::new(&path);
        if let Err(e) = source.run(tx) {
            error!("socket listener error: {}", e);
        }
    });
}
