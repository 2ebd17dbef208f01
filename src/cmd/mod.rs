pub mod check;
pub mod render;
pub mod schema;

use crate::bill::Bill;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// Read a billing record (JSON object) from a file, or stdin with "-".
pub fn read_bill(path: &Path) -> anyhow::Result<Bill> {
    if path.as_os_str() == "-" {
        read_from_stdin()
    } else {
        let file = File::open(path)?;
        let bill = serde_json::from_reader(BufReader::new(file))?;
        Ok(bill)
    }
}

fn read_from_stdin() -> anyhow::Result<Bill> {
    let stdin = io::stdin();
    let mut reader = BufReader::new(stdin.lock());

    let mut buffer = Vec::new();
    reader.read_to_end(&mut buffer)?;

    if buffer.is_empty() {
        anyhow::bail!("No input received. Provide a file or pipe data to stdin.");
    }

    let bill = serde_json::from_slice(&buffer)?;
    Ok(bill)
}
