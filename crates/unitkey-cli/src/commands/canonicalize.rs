//! Canonicalize command implementation.

use unitkey_canonical::{CanonicalizationReport, Canonicalizer, DuplicateKeyPolicy};

use crate::input::read_record;
use crate::output::{format_canonical_json, format_json};

pub fn run(
    input: Option<String>,
    strict: bool,
    report: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let record = read_record(input.as_deref())?;

    let policy = if strict {
        DuplicateKeyPolicy::Reject
    } else {
        DuplicateKeyPolicy::Retain
    };
    let canonicalizer = Canonicalizer::new(policy);

    let result = match canonicalizer.canonicalize_with_report(&record) {
        Ok(result) => result,
        Err((err, rejected)) => {
            if report {
                print_report(&rejected)?;
            }
            return Err(format!("Canonicalization failed: {}", err).into());
        }
    };

    if report {
        print_report(&result.report)?;
    }
    println!("{}", format_canonical_json(&result.record)?);
    Ok(())
}

fn print_report(report: &CanonicalizationReport) -> Result<(), serde_json::Error> {
    eprintln!("{}", format_json(report)?);
    Ok(())
}
