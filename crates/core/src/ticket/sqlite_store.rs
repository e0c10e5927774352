//! SQLite-backed ticket and analysis store.

use std::path::Path;
use std::str::FromStr;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use crate::classifier::{Category, Priority};

use super::{
    AnalysisRun, AnalyzedTicket, LatestAnalysis, NewTicket, StoreError, Ticket,
    TicketAnalysisRecord, TicketStore,
};

/// SQLite-backed ticket store.
pub struct SqliteTicketStore {
    conn: Mutex<Connection>,
}

impl SqliteTicketStore {
    /// Create a new SQLite store, creating the database file and tables if needed.
    pub fn new(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|e| StoreError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory store (useful for testing).
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(|e| StoreError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), StoreError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS tickets (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS analysis_runs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                created_at TEXT NOT NULL,
                summary TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS ticket_analysis (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                analysis_run_id INTEGER NOT NULL REFERENCES analysis_runs(id),
                ticket_id INTEGER NOT NULL REFERENCES tickets(id),
                category TEXT NOT NULL,
                priority TEXT NOT NULL,
                notes TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_ticket_analysis_run ON ticket_analysis(analysis_run_id);
            CREATE INDEX IF NOT EXISTS idx_analysis_runs_created_at ON analysis_runs(created_at);
            "#,
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    /// Stored timestamps came from `to_rfc3339`, so a parse failure means the
    /// database was edited out-of-band.
    fn parse_timestamp(raw: &str) -> rusqlite::Result<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(
                    0,
                    rusqlite::types::Type::Text,
                    Box::new(e),
                )
            })
    }

    fn row_to_ticket(row: &rusqlite::Row) -> rusqlite::Result<Ticket> {
        let created_at_str: String = row.get(3)?;
        Ok(Ticket {
            id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            created_at: Self::parse_timestamp(&created_at_str)?,
        })
    }

    fn row_to_run(row: &rusqlite::Row) -> rusqlite::Result<AnalysisRun> {
        let created_at_str: String = row.get(1)?;
        Ok(AnalysisRun {
            id: row.get(0)?,
            created_at: Self::parse_timestamp(&created_at_str)?,
            summary: row.get(2)?,
        })
    }

    fn insert_analyses(
        conn: &Connection,
        run_id: i64,
        analyses: &[TicketAnalysisRecord],
    ) -> Result<(), StoreError> {
        let mut stmt = conn
            .prepare(
                "INSERT INTO ticket_analysis (analysis_run_id, ticket_id, category, priority, notes) VALUES (?, ?, ?, ?, ?)",
            )
            .map_err(|e| StoreError::Database(e.to_string()))?;

        for analysis in analyses {
            stmt.execute(params![
                run_id,
                analysis.ticket_id,
                analysis.category.as_str(),
                analysis.priority.as_str(),
                analysis.notes,
            ])
            .map_err(|e| StoreError::Database(e.to_string()))?;
        }

        Ok(())
    }

    fn insert_run(conn: &Connection, summary: &str) -> Result<AnalysisRun, StoreError> {
        let now = Utc::now();
        conn.execute(
            "INSERT INTO analysis_runs (created_at, summary) VALUES (?, ?)",
            params![now.to_rfc3339(), summary],
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(AnalysisRun {
            id: conn.last_insert_rowid(),
            created_at: now,
            summary: summary.to_string(),
        })
    }
}

impl TicketStore for SqliteTicketStore {
    fn create_tickets(&self, tickets: Vec<NewTicket>) -> Result<Vec<Ticket>, StoreError> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn
            .transaction()
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let mut created = Vec::with_capacity(tickets.len());
        for ticket in tickets {
            let now = Utc::now();
            tx.execute(
                "INSERT INTO tickets (title, description, created_at) VALUES (?, ?, ?)",
                params![ticket.title, ticket.description, now.to_rfc3339()],
            )
            .map_err(|e| StoreError::Database(e.to_string()))?;

            created.push(Ticket {
                id: tx.last_insert_rowid(),
                title: ticket.title,
                description: ticket.description,
                created_at: now,
            });
        }

        tx.commit().map_err(|e| StoreError::Database(e.to_string()))?;
        Ok(created)
    }

    fn list_tickets(&self, ids: Option<&[i64]>) -> Result<Vec<Ticket>, StoreError> {
        let conn = self.conn.lock().unwrap();

        let (sql, params): (String, Vec<Box<dyn rusqlite::ToSql>>) = match ids {
            Some(ids) => {
                // Empty filter matches nothing, not everything.
                if ids.is_empty() {
                    return Ok(Vec::new());
                }
                let placeholders = vec!["?"; ids.len()].join(", ");
                let sql = format!(
                    "SELECT id, title, description, created_at FROM tickets WHERE id IN ({}) ORDER BY id ASC",
                    placeholders
                );
                let params = ids
                    .iter()
                    .map(|id| Box::new(*id) as Box<dyn rusqlite::ToSql>)
                    .collect();
                (sql, params)
            }
            None => (
                "SELECT id, title, description, created_at FROM tickets ORDER BY id ASC"
                    .to_string(),
                Vec::new(),
            ),
        };

        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let param_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();

        let rows = stmt
            .query_map(param_refs.as_slice(), Self::row_to_ticket)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let mut tickets = Vec::new();
        for row_result in rows {
            tickets.push(row_result.map_err(|e| StoreError::Database(e.to_string()))?);
        }

        Ok(tickets)
    }

    fn create_run(&self, summary: &str) -> Result<AnalysisRun, StoreError> {
        let conn = self.conn.lock().unwrap();
        Self::insert_run(&conn, summary)
    }

    fn bulk_insert_analysis(
        &self,
        run_id: i64,
        analyses: &[TicketAnalysisRecord],
    ) -> Result<(), StoreError> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn
            .transaction()
            .map_err(|e| StoreError::Database(e.to_string()))?;
        Self::insert_analyses(&tx, run_id, analyses)?;
        tx.commit().map_err(|e| StoreError::Database(e.to_string()))
    }

    fn persist_run(
        &self,
        summary: &str,
        analyses: &[TicketAnalysisRecord],
    ) -> Result<AnalysisRun, StoreError> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn
            .transaction()
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let run = Self::insert_run(&tx, summary)?;
        Self::insert_analyses(&tx, run.id, analyses)?;

        tx.commit().map_err(|e| StoreError::Database(e.to_string()))?;
        Ok(run)
    }

    fn get_latest_run(&self) -> Result<Option<LatestAnalysis>, StoreError> {
        let conn = self.conn.lock().unwrap();

        let run = match conn.query_row(
            "SELECT id, created_at, summary FROM analysis_runs ORDER BY created_at DESC, id DESC LIMIT 1",
            [],
            Self::row_to_run,
        ) {
            Ok(run) => run,
            Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
            Err(e) => return Err(StoreError::Database(e.to_string())),
        };

        let mut stmt = conn
            .prepare(
                r#"
                SELECT t.id, t.title, t.description, t.created_at, ta.category, ta.priority, ta.notes
                FROM ticket_analysis ta
                JOIN tickets t ON ta.ticket_id = t.id
                WHERE ta.analysis_run_id = ?
                ORDER BY ta.id ASC
                "#,
            )
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let rows = stmt
            .query_map(params![run.id], |row| {
                let created_at_str: String = row.get(3)?;
                let category_str: String = row.get(4)?;
                let priority_str: String = row.get(5)?;
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    created_at_str,
                    category_str,
                    priority_str,
                    row.get::<_, String>(6)?,
                ))
            })
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let mut tickets = Vec::new();
        for row_result in rows {
            let (ticket_id, title, description, created_at_str, category_str, priority_str, notes) =
                row_result.map_err(|e| StoreError::Database(e.to_string()))?;

            // Stored values came from the enums, so a parse failure means the
            // database was edited out-of-band.
            let created_at = Self::parse_timestamp(&created_at_str)
                .map_err(|_| StoreError::Database(format!("invalid timestamp: {}", created_at_str)))?;
            let category = Category::from_str(&category_str)
                .map_err(|_| StoreError::Database(format!("invalid category: {}", category_str)))?;
            let priority = Priority::from_str(&priority_str)
                .map_err(|_| StoreError::Database(format!("invalid priority: {}", priority_str)))?;

            tickets.push(AnalyzedTicket {
                ticket_id,
                title,
                description,
                created_at,
                category,
                priority,
                notes,
            });
        }

        Ok(Some(LatestAnalysis { run, tickets }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_store() -> SqliteTicketStore {
        SqliteTicketStore::in_memory().unwrap()
    }

    fn sample_tickets() -> Vec<NewTicket> {
        vec![
            NewTicket::new("Cannot login", "Password reset email never arrives"),
            NewTicket::new("Billing double charge", "Charged twice this month"),
        ]
    }

    fn record(ticket_id: i64, category: Category, priority: Priority) -> TicketAnalysisRecord {
        TicketAnalysisRecord {
            ticket_id,
            category,
            priority,
            notes: "test".to_string(),
        }
    }

    #[test]
    fn test_create_tickets_assigns_sequential_ids() {
        let store = create_test_store();
        let created = store.create_tickets(sample_tickets()).unwrap();

        assert_eq!(created.len(), 2);
        assert!(created[0].id < created[1].id);
        assert_eq!(created[0].title, "Cannot login");
    }

    #[test]
    fn test_list_all_tickets_in_id_order() {
        let store = create_test_store();
        store.create_tickets(sample_tickets()).unwrap();

        let tickets = store.list_tickets(None).unwrap();
        assert_eq!(tickets.len(), 2);
        assert!(tickets[0].id < tickets[1].id);
    }

    #[test]
    fn test_list_tickets_with_id_filter() {
        let store = create_test_store();
        let created = store.create_tickets(sample_tickets()).unwrap();

        let tickets = store.list_tickets(Some(&[created[1].id])).unwrap();
        assert_eq!(tickets.len(), 1);
        assert_eq!(tickets[0].id, created[1].id);
    }

    #[test]
    fn test_list_tickets_ignores_unknown_ids() {
        let store = create_test_store();
        let created = store.create_tickets(sample_tickets()).unwrap();

        let tickets = store.list_tickets(Some(&[created[0].id, 9999])).unwrap();
        assert_eq!(tickets.len(), 1);
        assert_eq!(tickets[0].id, created[0].id);
    }

    #[test]
    fn test_list_tickets_empty_filter_matches_nothing() {
        let store = create_test_store();
        store.create_tickets(sample_tickets()).unwrap();

        let tickets = store.list_tickets(Some(&[])).unwrap();
        assert!(tickets.is_empty());
    }

    #[test]
    fn test_persist_run_writes_run_and_rows() {
        let store = create_test_store();
        let created = store.create_tickets(sample_tickets()).unwrap();

        let analyses = vec![
            record(created[0].id, Category::Bug, Priority::High),
            record(created[1].id, Category::Billing, Priority::Medium),
        ];

        let run = store.persist_run("Analyzed 2 ticket(s).", &analyses).unwrap();
        assert!(run.id > 0);

        let latest = store.get_latest_run().unwrap().unwrap();
        assert_eq!(latest.run.id, run.id);
        assert_eq!(latest.tickets.len(), 2);
        assert_eq!(latest.tickets[0].ticket_id, created[0].id);
        assert_eq!(latest.tickets[0].category, Category::Bug);
        assert_eq!(latest.tickets[1].priority, Priority::Medium);
    }

    #[test]
    fn test_persist_run_rolls_back_on_bad_record() {
        let store = create_test_store();
        let created = store.create_tickets(sample_tickets()).unwrap();

        // Enable FK enforcement so a dangling ticket_id makes the insert fail
        // mid-transaction.
        store
            .conn
            .lock()
            .unwrap()
            .execute_batch("PRAGMA foreign_keys = ON;")
            .unwrap();

        let analyses = vec![
            record(created[0].id, Category::Bug, Priority::High),
            record(9999, Category::General, Priority::Low),
        ];

        let result = store.persist_run("should roll back", &analyses);
        assert!(result.is_err());

        // Neither the run nor the first analysis row may survive.
        assert!(store.get_latest_run().unwrap().is_none());
    }

    #[test]
    fn test_create_run_then_bulk_insert_analysis() {
        let store = create_test_store();
        let created = store.create_tickets(sample_tickets()).unwrap();

        let run = store.create_run("two tickets").unwrap();
        assert!(run.id > 0);

        let analyses = vec![
            record(created[0].id, Category::Bug, Priority::High),
            record(created[1].id, Category::Billing, Priority::Medium),
        ];
        store.bulk_insert_analysis(run.id, &analyses).unwrap();

        let latest = store.get_latest_run().unwrap().unwrap();
        assert_eq!(latest.run.id, run.id);
        assert_eq!(latest.run.summary, "two tickets");
        assert_eq!(latest.tickets.len(), 2);
        assert_eq!(latest.tickets[0].category, Category::Bug);
    }

    #[test]
    fn test_corrupted_timestamp_is_an_error() {
        let store = create_test_store();
        store.create_tickets(sample_tickets()).unwrap();

        store
            .conn
            .lock()
            .unwrap()
            .execute("UPDATE tickets SET created_at = 'yesterday-ish'", [])
            .unwrap();

        let result = store.list_tickets(None);
        assert!(matches!(result, Err(StoreError::Database(_))));
    }

    #[test]
    fn test_get_latest_run_none_when_empty() {
        let store = create_test_store();
        assert!(store.get_latest_run().unwrap().is_none());
    }

    #[test]
    fn test_get_latest_run_returns_most_recent() {
        let store = create_test_store();
        let created = store.create_tickets(sample_tickets()).unwrap();

        store
            .persist_run("first run", &[record(created[0].id, Category::Bug, Priority::High)])
            .unwrap();
        let second = store
            .persist_run(
                "second run",
                &[record(created[1].id, Category::Billing, Priority::Medium)],
            )
            .unwrap();

        let latest = store.get_latest_run().unwrap().unwrap();
        assert_eq!(latest.run.id, second.id);
        assert_eq!(latest.run.summary, "second run");
        assert_eq!(latest.tickets.len(), 1);
        assert_eq!(latest.tickets[0].ticket_id, created[1].id);
    }

    #[test]
    fn test_reanalysis_creates_independent_runs() {
        let store = create_test_store();
        let created = store.create_tickets(sample_tickets()).unwrap();

        let analyses: Vec<_> = created
            .iter()
            .map(|t| record(t.id, Category::General, Priority::Medium))
            .collect();

        let first = store.persist_run("run one", &analyses).unwrap();
        let second = store.persist_run("run two", &analyses).unwrap();
        assert_ne!(first.id, second.id);

        // Both runs keep their full row sets.
        let conn = store.conn.lock().unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM ticket_analysis", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 4);
    }

    #[test]
    fn test_join_rows_follow_classification_order() {
        let store = create_test_store();
        let created = store.create_tickets(sample_tickets()).unwrap();

        // Classify in reverse ticket order; the join must preserve it.
        let analyses = vec![
            record(created[1].id, Category::Billing, Priority::Medium),
            record(created[0].id, Category::Bug, Priority::High),
        ];
        store.persist_run("reversed", &analyses).unwrap();

        let latest = store.get_latest_run().unwrap().unwrap();
        assert_eq!(latest.tickets[0].ticket_id, created[1].id);
        assert_eq!(latest.tickets[1].ticket_id, created[0].id);
    }

    #[test]
    fn test_file_based_store() {
        let temp_dir = tempfile::tempdir().unwrap();
        let db_path = temp_dir.path().join("analyst.db");

        let store = SqliteTicketStore::new(&db_path).unwrap();
        store.create_tickets(sample_tickets()).unwrap();

        assert!(db_path.exists());
        assert_eq!(store.list_tickets(None).unwrap().len(), 2);
    }
}
