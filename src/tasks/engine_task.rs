//! Engine background task

use std::future;
use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{sleep_until, Instant},
};
use tracing::{debug, info};

use crate::{
    engine::{Command, EngineHandle, SyncEngine},
    questions::QuestionsBoundary,
};

/// Bound on queued control commands
pub const COMMAND_BUFFER: usize = 256;

/// Move the engine into its own task and return the handle used to reach it
pub fn spawn_engine<Q: QuestionsBoundary>(engine: SyncEngine<Q>) -> (EngineHandle, JoinHandle<()>) {
    let (tx, rx) = mpsc::channel(COMMAND_BUFFER);
    let task = tokio::spawn(engine_task(engine, rx));
    (EngineHandle::new(tx), task)
}

/// Single writer of the clock: handles one command or one due deadline at a
/// time, so every mutation and its events happen without interleaving.
pub async fn engine_task<Q: QuestionsBoundary>(
    mut engine: SyncEngine<Q>,
    mut commands: mpsc::Receiver<Command>,
) {
    info!("Starting engine task");

    loop {
        let next_deadline = engine.next_deadline();
        let deadline = async {
            match next_deadline {
                Some(at) => sleep_until(at).await,
                None => future::pending::<()>().await,
            }
        };

        tokio::select! {
            command = commands.recv() => match command {
                Some(command) => {
                    // Overdue deadlines first, so the command sees current time
                    let now = Instant::now();
                    engine.fire_due(now);
                    engine.apply(command, now);
                }
                None => {
                    debug!("All engine handles dropped");
                    break;
                }
            },
            _ = deadline => engine.fire_due(Instant::now()),
        }
    }

    info!("Engine task stopped");
}
