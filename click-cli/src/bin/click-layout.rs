//! Standalone CLI tool for printing the host ABI layout click-core expects.

use clap::Parser;

use click_core::abi::{layout, AbiLayout};

#[derive(Parser)]
#[command(name = "click-layout", about = "Print the host UI ABI layout used by click-core")]
struct Args {
    /// Compact JSON output (no pretty-printing)
    #[arg(long)]
    compact: bool,

    /// Print a plain-text table instead of JSON
    #[arg(long, conflicts_with = "compact")]
    table: bool,
}

fn print_table(report: &AbiLayout) {
    println!("pointer width       {} bits", report.pointer_width);
    println!("ReceiveEvent slot   {}", report.receive_event_slot);
    println!(
        "event data          {} bytes ({} slots)",
        report.event_data_size, report.event_data_slots
    );
    println!(
        "input data          {} bytes ({} slots)",
        report.input_data_size, report.input_data_slots
    );

    println!();
    println!("{:<16} {:>8}", "structure", "size");
    for s in &report.structures {
        println!("{:<16} {:>#8x}", s.structure, s.size);
    }

    println!();
    println!("{:<16} {:<20} {:>8}", "structure", "field", "offset");
    for f in &report.fields {
        println!("{:<16} {:<20} {:>#8x}", f.structure, f.field, f.offset);
    }

    println!();
    println!("{:<18} {:>5}", "event type", "value");
    for k in &report.event_types {
        println!("{:<18} {:>5}", k.name, k.value);
    }
}

fn main() {
    let args = Args::parse();
    let report = layout();

    if args.table {
        print_table(&report);
        return;
    }

    let json = if args.compact {
        serde_json::to_string(&report)
    } else {
        serde_json::to_string_pretty(&report)
    };

    match json {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("click-layout: failed to serialize layout: {e}");
            std::process::exit(1);
        }
    }
}
