//! Directory of CSV files as a graph source
//!
//! Expected layout: `nodes.csv` (`id,lat,lon`), one `edges_<mode>.csv` per
//! mode (`id,source,target,cost,reverse_cost,length`) and
//! `turn_restrictions.csv` (`from_edge,via_node,to_edge`).

use std::fs::File;
use std::path::{Path, PathBuf};

use log::debug;

use super::source::{EdgeRecord, GraphSource, NodeRecord, TurnRestrictionRecord};
use crate::{Error, Mode};

pub const NODES_FILE: &str = "nodes.csv";
pub const TURN_RESTRICTIONS_FILE: &str = "turn_restrictions.csv";

pub fn edges_file(mode: Mode) -> String {
    format!("edges_{mode}.csv")
}

#[derive(Debug, Clone)]
pub struct CsvSource {
    dir: PathBuf,
}

impl CsvSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl GraphSource for CsvSource {
    fn load_nodes(&self) -> Result<Vec<NodeRecord>, Error> {
        deserialize_csv_file(&self.dir.join(NODES_FILE))
    }

    fn load_edges(&self, mode: Mode) -> Result<Vec<EdgeRecord>, Error> {
        deserialize_csv_file(&self.dir.join(edges_file(mode)))
    }

    fn load_turn_restrictions(&self) -> Result<Vec<TurnRestrictionRecord>, Error> {
        deserialize_csv_file(&self.dir.join(TURN_RESTRICTIONS_FILE))
    }
}

/// Read every row of a CSV file, failing on the first malformed one
pub fn deserialize_csv_file<T>(path: &Path) -> Result<Vec<T>, Error>
where
    T: for<'de> serde::Deserialize<'de>,
{
    let file = File::open(path).map_err(|e| {
        std::io::Error::new(
            e.kind(),
            format!("Failed to open file '{}': {}", path.display(), e),
        )
    })?;
    let rows = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file)
        .deserialize()
        .collect::<Result<Vec<T>, _>>()?;
    debug!("Read {} rows from {}", rows.len(), path.display());
    Ok(rows)
}
