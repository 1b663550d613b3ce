use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::{CsvSource, GraphSource};
use crate::Error;

/// Location of the backing store the road graph is loaded from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DataSourceConfig {
    /// Directory of CSV files
    Csv { dir: PathBuf },
    /// SQLite database file
    Sqlite { path: PathBuf },
}

impl DataSourceConfig {
    /// Check that the configured location exists before loading
    pub fn validate(&self) -> Result<(), Error> {
        match self {
            DataSourceConfig::Csv { dir } if !dir.is_dir() => {
                Err(Error::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("CSV directory not found: {}", dir.display()),
                )))
            }
            DataSourceConfig::Sqlite { path } if !path.is_file() => {
                Err(Error::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("SQLite database not found: {}", path.display()),
                )))
            }
            _ => Ok(()),
        }
    }

    pub fn open_source(&self) -> Result<Box<dyn GraphSource>, Error> {
        self.validate()?;
        match self {
            DataSourceConfig::Csv { dir } => Ok(Box::new(CsvSource::new(dir.clone()))),
            #[cfg(feature = "sqlite")]
            DataSourceConfig::Sqlite { path } => {
                Ok(Box::new(super::sqlite::SqliteSource::open(path)?))
            }
            #[cfg(not(feature = "sqlite"))]
            DataSourceConfig::Sqlite { .. } => Err(Error::InvalidInput(
                "SQLite sources need the `sqlite` feature".to_string(),
            )),
        }
    }
}
