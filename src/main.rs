use std::env;
use std::io::{self, BufRead, BufReader};
use std::process::ExitCode;

use bank_sim::script::{Command, ScriptReader};
use bank_sim::session::Session;
use tokio::sync::mpsc::Sender;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

/// Feed parsed commands to the session, logging the ones that fail to parse
fn forward<R: BufRead>(script: ScriptReader<R>, sender: Sender<Command>) {
    for result in script {
        match result {
            Ok(command) => {
                // the session is over
                if sender.blocking_send(command).is_err() {
                    break;
                }
            }
            Err(e) => {
                warn!("{e}");
            }
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let (cmd_sender, cmd_receiver) = tokio::sync::mpsc::channel(16);

    // reads the script file given as argument, or stdin
    let reader = match env::args().nth(1) {
        Some(path) => match ScriptReader::open(&path) {
            Ok(script) => tokio::task::spawn_blocking(move || forward(script, cmd_sender)),
            Err(e) => {
                error!(path, "cannot open script: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => {
            let script = ScriptReader::new(BufReader::new(io::stdin()));
            tokio::task::spawn_blocking(move || forward(script, cmd_sender))
        }
    };

    let mut session = Session::new(io::stdout().lock());
    let outcome = session.run(ReceiverStream::new(cmd_receiver)).await;

    if let Err(e) = reader.await {
        warn!("script reader stopped abnormally: {e}");
    }

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("failed to write output: {e}");
            ExitCode::FAILURE
        }
    }
}
