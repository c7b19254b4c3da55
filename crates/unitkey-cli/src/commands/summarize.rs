//! Summarize command implementation.

use unitkey_index::{summarize, DetailRegistry};

use crate::input::read_record;
use crate::output::format_json;

pub fn run(input: Option<String>, sorted: bool) -> Result<(), Box<dyn std::error::Error>> {
    let record = read_record(input.as_deref())?;
    let registry = DetailRegistry::with_defaults();

    let mut summary = summarize(&record, &registry);
    if sorted {
        summary.inputs = summary.sorted_inputs();
    }

    println!("{}", format_json(&summary)?);
    Ok(())
}
