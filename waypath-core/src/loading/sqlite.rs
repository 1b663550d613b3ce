//! SQLite database as a graph source
//!
//! Reads the same relations as the CSV source: `nodes(id, lat, lon)`,
//! `edges_<mode>(id, source, target, cost, reverse_cost, length)` and
//! `turn_restrictions(from_edge, via_node, to_edge)`.

use std::path::Path;

use parking_lot::Mutex;
use rusqlite::{Connection, OpenFlags};

use super::source::{EdgeRecord, GraphSource, NodeRecord, TurnRestrictionRecord};
use crate::{Error, Mode};

pub fn edges_table(mode: Mode) -> String {
    format!("edges_{mode}")
}

/// Read-only graph source backed by a SQLite database
pub struct SqliteSource {
    connection: Mutex<Connection>,
}

impl std::fmt::Debug for SqliteSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteSource").finish_non_exhaustive()
    }
}

impl SqliteSource {
    /// Open the database at `path` read-only
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let connection =
            Connection::open_with_flags(path.as_ref(), OpenFlags::SQLITE_OPEN_READ_ONLY)?;
        Ok(Self::from_connection(connection))
    }

    pub fn from_connection(connection: Connection) -> Self {
        Self {
            connection: Mutex::new(connection),
        }
    }
}

impl GraphSource for SqliteSource {
    fn load_nodes(&self) -> Result<Vec<NodeRecord>, Error> {
        let connection = self.connection.lock();
        let mut statement = connection.prepare("SELECT id, lat, lon FROM nodes ORDER BY id")?;
        let rows = statement.query_map([], |row| {
            Ok(NodeRecord {
                id: row.get(0)?,
                lat: row.get(1)?,
                lon: row.get(2)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn load_edges(&self, mode: Mode) -> Result<Vec<EdgeRecord>, Error> {
        let connection = self.connection.lock();
        let query = format!(
            "SELECT id, source, target, cost, reverse_cost, length FROM {} ORDER BY id",
            edges_table(mode)
        );
        let mut statement = connection.prepare(&query)?;
        let rows = statement.query_map([], |row| {
            Ok(EdgeRecord {
                id: row.get(0)?,
                source: row.get(1)?,
                target: row.get(2)?,
                cost: row.get(3)?,
                reverse_cost: row.get(4)?,
                length: row.get(5)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn load_turn_restrictions(&self) -> Result<Vec<TurnRestrictionRecord>, Error> {
        let connection = self.connection.lock();
        let mut statement =
            connection.prepare("SELECT from_edge, via_node, to_edge FROM turn_restrictions")?;
        let rows = statement.query_map([], |row| {
            Ok(TurnRestrictionRecord {
                from_edge: row.get(0)?,
                via_node: row.get(1)?,
                to_edge: row.get(2)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}
