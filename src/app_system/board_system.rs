use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::backend::{Backend, MemoryBackend};
use crate::board::BoardService;
use crate::clients::Dashboard;
use crate::error::BoardError;

const BOARD_BUFFER: usize = 32;
const TABLE_BUFFER: usize = 32;
const NOTICE_CAPACITY: usize = 16;

/// Starts the board actor, wires it to a backend, and owns the task handles
/// until [`BoardSystem::shutdown`].
pub struct BoardSystem<B: Backend> {
    pub dashboard: Dashboard<B>,
    handles: Vec<JoinHandle<()>>,
}

impl<B: Backend> BoardSystem<B> {
    pub fn new(backend: B) -> Self {
        Self::with_handles(backend, Vec::new())
    }

    fn with_handles(backend: B, mut handles: Vec<JoinHandle<()>>) -> Self {
        let (service, board) = BoardService::new(BOARD_BUFFER);
        handles.push(tokio::spawn(service.run()));

        let (notices, _) = broadcast::channel(NOTICE_CAPACITY);
        let dashboard = Dashboard::new(Arc::new(backend), board, notices);

        Self { dashboard, handles }
    }

    pub async fn shutdown(self) -> Result<(), BoardError> {
        info!("Shutting down board system...");

        let board_result = self.dashboard.board().shutdown().await;
        self.dashboard.backend().close().await;
        drop(self.dashboard);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(BoardError::ActorCommunicationError(format!(
                    "Actor task failed: {e}"
                )));
            }
        }
        board_result?;

        info!("Board system shutdown complete.");
        Ok(())
    }
}

impl BoardSystem<MemoryBackend> {
    /// Board over an in-process table. `configure` registers accounts or a
    /// session before the board sees the backend.
    pub fn in_memory(configure: impl FnOnce(MemoryBackend) -> MemoryBackend) -> Self {
        let (backend, table_handle) = MemoryBackend::start(TABLE_BUFFER);
        Self::with_handles(configure(backend), vec![table_handle])
    }
}
