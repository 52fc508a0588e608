use crate::core::board::{BoardController, ImportTicket};
use crate::core::events::{apply_event, BoardEvent};
use crate::core::ingest::{ingest_csv, CsvOptions};
use crate::core::keyboard::KeyboardSensor;
use crate::core::Storage;
use crate::domain::model::{ContainerId, ItemId};
use crate::utils::error::{BoardError, Result};
use tokio::task::JoinHandle;

/// A CSV import that is still being read and parsed in the background.
pub struct PendingImport {
    ticket: ImportTicket,
    path: String,
    handle: JoinHandle<Result<Vec<ItemId>>>,
}

impl PendingImport {
    pub fn ticket(&self) -> ImportTicket {
        self.ticket
    }
}

/// The board plus its input devices and file access.
///
/// Events are handled one at a time. CSV imports are the only asynchronous
/// step: each one is tagged with a ticket when it starts, and a completion
/// whose ticket is no longer the newest is dropped instead of replacing the
/// pool.
pub struct BoardSession<S: Storage> {
    board: BoardController,
    keyboard: KeyboardSensor,
    storage: S,
    options: CsvOptions,
}

impl<S> BoardSession<S>
where
    S: Storage + Clone + 'static,
{
    pub fn new(board: BoardController, storage: S, options: CsvOptions) -> Self {
        Self {
            board,
            keyboard: KeyboardSensor::new(),
            storage,
            options,
        }
    }

    pub fn board(&self) -> &BoardController {
        &self.board
    }

    pub fn into_board(self) -> BoardController {
        self.board
    }

    pub fn start_import(&mut self, path: &str) -> PendingImport {
        let ticket = self.board.begin_import();
        let storage = self.storage.clone();
        let options = self.options;
        let owned_path = path.to_string();

        tracing::info!("📥 Importing orders from {} (import #{})", path, ticket.sequence());
        let handle = tokio::spawn(async move {
            let bytes = storage.read_file(&owned_path).await?;
            let orders = tokio::task::spawn_blocking(move || ingest_csv(&bytes, options)).await?;
            Ok::<_, BoardError>(orders)
        });

        PendingImport {
            ticket,
            path: path.to_string(),
            handle,
        }
    }

    /// Waits for the import and applies it if it is still the newest one.
    /// Returns whether the pool was replaced.
    pub async fn finish_import(&mut self, pending: PendingImport) -> Result<bool> {
        let ticket = pending.ticket();
        let orders = pending.handle.await??;
        let applied = self.board.complete_import(ticket, orders);
        if applied {
            tracing::info!(
                "✅ Imported {} orders from {} (import #{}, {} items on the board)",
                self.board.state().items(ContainerId::Pool).len(),
                pending.path,
                ticket.sequence(),
                self.board.state().total_items()
            );
        }
        Ok(applied)
    }

    pub async fn import_csv(&mut self, path: &str) -> Result<bool> {
        let pending = self.start_import(path);
        self.finish_import(pending).await
    }

    pub async fn apply(&mut self, event: &BoardEvent) -> Result<bool> {
        match event {
            BoardEvent::Import { path } => self.import_csv(path).await,
            other => Ok(apply_event(&mut self.board, &mut self.keyboard, other)),
        }
    }

    /// Runs events in order; returns how many of them changed the board.
    pub async fn run_script(&mut self, events: &[BoardEvent]) -> Result<usize> {
        let mut changes = 0;
        for event in events {
            if self.apply(event).await? {
                changes += 1;
            }
        }
        tracing::debug!("Applied {} events, {} changed the board", events.len(), changes);
        Ok(changes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::SeedVariant;
    use encoding_rs::SHIFT_JIS;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone, Default)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        async fn put(&self, path: &str, data: Vec<u8>) {
            self.files.lock().await.insert(path.to_string(), data);
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                BoardError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            self.files.lock().await.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    fn sjis(text: &str) -> Vec<u8> {
        SHIFT_JIS.encode(text).0.into_owned()
    }

    fn pool(session: &BoardSession<MockStorage>) -> Vec<String> {
        session
            .board()
            .state()
            .items(ContainerId::Pool)
            .iter()
            .map(ItemId::to_string)
            .collect()
    }

    #[tokio::test]
    async fn test_import_replaces_pool() {
        let storage = MockStorage::default();
        storage.put("orders.csv", sjis("番号,顧客\n1,山田\n2,佐藤\n")).await;

        let mut session = BoardSession::new(
            BoardController::seeded(SeedVariant::Empty),
            storage,
            CsvOptions::default(),
        );

        assert!(session.import_csv("orders.csv").await.unwrap());
        assert_eq!(pool(&session), vec!["1,山田", "2,佐藤"]);
    }

    #[tokio::test]
    async fn test_missing_file_is_an_error() {
        let mut session = BoardSession::new(
            BoardController::default(),
            MockStorage::default(),
            CsvOptions::default(),
        );

        let err = session.import_csv("nope.csv").await.unwrap_err();
        assert!(matches!(err, BoardError::IoError(_)));
    }

    #[tokio::test]
    async fn test_older_import_finishing_last_is_dropped() {
        let storage = MockStorage::default();
        storage.put("old.csv", sjis("h\nold\n")).await;
        storage.put("new.csv", sjis("h\nnew\n")).await;

        let mut session = BoardSession::new(BoardController::default(), storage, CsvOptions::default());

        let old = session.start_import("old.csv");
        let new = session.start_import("new.csv");
        assert!(new.ticket().sequence() > old.ticket().sequence());

        assert!(session.finish_import(new).await.unwrap());
        assert!(!session.finish_import(old).await.unwrap());
        assert_eq!(pool(&session), vec!["new"]);
    }

    #[tokio::test]
    async fn test_blank_line_in_upload_keeps_its_slot() {
        let storage = MockStorage::default();
        storage.put("orders.csv", sjis("番号,顧客\r\n1,山田\r\n\r\n2,佐藤\r\n")).await;

        let mut session = BoardSession::new(
            BoardController::seeded(SeedVariant::Example),
            storage,
            CsvOptions::default(),
        );
        let seeded = session.board().state().total_items();

        assert!(session.import_csv("orders.csv").await.unwrap());
        assert_eq!(pool(&session), vec!["1,山田", "", "2,佐藤"]);
        assert_eq!(session.board().state().total_items(), seeded + 3);
    }

    #[tokio::test]
    async fn test_run_script_counts_changes() {
        let storage = MockStorage::default();
        storage.put("orders.csv", sjis("h1,h2\na,b\nc,d\n")).await;

        let mut session = BoardSession::new(BoardController::default(), storage, CsvOptions::default());
        let events = crate::core::events::parse_script(
            r#"[
                {"type": "import", "path": "orders.csv"},
                {"type": "start", "active": "c,d"},
                {"type": "over", "active": "c,d", "over": "container3"},
                {"type": "end", "active": "c,d", "over": "container3"}
            ]"#,
        )
        .unwrap();

        let changes = session.run_script(&events).await.unwrap();
        assert_eq!(changes, 2);
        assert_eq!(pool(&session), vec!["a,b"]);
        assert_eq!(
            session.board().state().items(ContainerId::Machine(3)),
            &[ItemId::new("c,d")]
        );
    }
}
