use crate::error::Result;
use crate::record::OptimizationRecord;
use quantum::ShallowAnsatz;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Records of one quench run; `records[0]` is the pre-quench ground state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub ansatz: ShallowAnsatz,
    pub dt: f64,
    pub records: Vec<OptimizationRecord>,
}

impl Trajectory {
    pub fn new(ansatz: ShallowAnsatz, dt: f64) -> Self {
        Self {
            ansatz,
            dt,
            records: Vec::new(),
        }
    }

    pub fn push(&mut self, record: OptimizationRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut w = BufWriter::new(File::create(path)?);
        serde_json::to_writer(&mut w, self)?;
        w.flush()?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let r = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(r)?)
    }
}
