//! Binary mutation: copy a file and append the seed's marker block.
//!
//! The copied prefix is never modified. Only formats that tolerate trailing
//! bytes keep working after mutation.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::debug;

use crate::core::derive::mutation_trailer;
use crate::core::error::LabError;

/// Copy `input` to `output` verbatim, then append marker + seed digest.
///
/// Fails with [`LabError::NotFound`] when `input` does not exist.
pub fn mutate_binary(input: &Path, output: &Path, seed: &str) -> Result<()> {
    if !input.exists() {
        return Err(LabError::NotFound {
            path: input.to_path_buf(),
        }
        .into());
    }
    if output.exists() && same_file(input, output)? {
        bail!(
            "output {} is the input file; mutating in place would destroy it",
            output.display()
        );
    }
    let copied = fs::copy(input, output)
        .with_context(|| format!("copy {} to {}", input.display(), output.display()))?;

    let trailer = mutation_trailer(seed);
    let mut file = OpenOptions::new()
        .append(true)
        .open(output)
        .with_context(|| format!("open {} for append", output.display()))?;
    file.write_all(&trailer)
        .with_context(|| format!("append marker to {}", output.display()))?;
    file.flush()
        .with_context(|| format!("flush {}", output.display()))?;

    debug!(
        input = %input.display(),
        output = %output.display(),
        copied,
        appended = trailer.len(),
        "mutated binary"
    );
    Ok(())
}

fn same_file(a: &Path, b: &Path) -> Result<bool> {
    let a = fs::canonicalize(a).with_context(|| format!("resolve {}", a.display()))?;
    let b = fs::canonicalize(b).with_context(|| format!("resolve {}", b.display()))?;
    Ok(a == b)
}
