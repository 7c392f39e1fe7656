use crate::loschmidt::EchoPoint;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

pub fn write_csv(path: impl AsRef<Path>, header: &str, rows: &[(f64, f64)]) -> io::Result<()> {
    let mut f = BufWriter::new(File::create(path)?);
    writeln!(f, "{}", header)?;
    for (x, y) in rows {
        writeln!(f, "{},{}", x, y)?;
    }
    f.flush()
}

pub fn write_echo_csv(path: impl AsRef<Path>, points: &[EchoPoint]) -> io::Result<()> {
    let mut f = BufWriter::new(File::create(path)?);
    writeln!(f, "step,time,amplitude,return_rate")?;
    for p in points {
        writeln!(f, "{},{},{},{}", p.step, p.time, p.amplitude, p.return_rate)?;
    }
    f.flush()
}

/// One row per optimizer iteration.
pub fn write_trace_csv(path: impl AsRef<Path>, trace: &[f64]) -> io::Result<()> {
    let rows: Vec<(f64, f64)> = trace
        .iter()
        .enumerate()
        .map(|(i, c)| (i as f64, *c))
        .collect();
    write_csv(path, "iteration,cost", &rows)
}
