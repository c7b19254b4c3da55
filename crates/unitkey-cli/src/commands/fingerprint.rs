//! Fingerprint command implementation.

use std::io::{self, Write};

use sha2::{Digest, Sha256};
use tracing::debug;
use unitkey_canonical::{canonicalize, encode_into, encoded_len, CompilationRecord};

use crate::input::read_record;
use crate::output::format_key;

pub fn run(
    input: Option<String>,
    no_canonicalize: bool,
    raw: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let record = read_record(input.as_deref())?;
    let record = if no_canonicalize {
        record
    } else {
        canonicalize(&record)
    };
    debug!(bytes = encoded_len(&record), "encoding preimage");

    if raw {
        let mut stdout = io::stdout().lock();
        encode_into(&record, &mut stdout)?;
        stdout.flush()?;
        return Ok(());
    }

    println!("{}", unit_key(&record)?);
    Ok(())
}

/// SHA-256 cache key of the record's preimage.
fn unit_key(record: &CompilationRecord) -> io::Result<String> {
    let mut hasher = Sha256::new();
    encode_into(record, &mut hasher)?;
    Ok(format_key("sha256", &hasher.finalize()))
}
