//! nialm CLI - Disaggregate a power signal from a timestamp,value file.

use std::fs;
use std::path::PathBuf;

use nialm::{DisaggConfig, SearchEngine, Series};

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <signal.csv> [config.json]", args[0]);
        eprintln!();
        eprintln!("Disaggregate an aggregate power signal into on/off blocks.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  signal.csv   One `timestamp,value` pair per line (unix seconds, watts).");
        eprintln!("               An empty or `nan` value marks a gap in the signal.");
        eprintln!("  config.json  Optional search configuration; defaults otherwise.");
        eprintln!();
        eprintln!("An example configuration is printed with --example.");
        std::process::exit(1);
    }

    if args[1] == "--example" {
        print_example_config();
        return;
    }

    let signal_path = PathBuf::from(&args[1]);
    let signal_str = fs::read_to_string(&signal_path).unwrap_or_else(|e| {
        eprintln!("Error reading signal file: {}", e);
        std::process::exit(1);
    });
    let signal = parse_signal(&signal_str).unwrap_or_else(|e| {
        eprintln!("Error parsing signal: {}", e);
        std::process::exit(1);
    });

    let config: DisaggConfig = match args.get(2) {
        Some(path) => {
            let config_str = fs::read_to_string(path).unwrap_or_else(|e| {
                eprintln!("Error reading config file: {}", e);
                std::process::exit(1);
            });
            serde_json::from_str(&config_str).unwrap_or_else(|e| {
                eprintln!("Error parsing config: {}", e);
                std::process::exit(1);
            })
        }
        None => DisaggConfig::default(),
    };

    let mut engine = SearchEngine::new(signal, config).unwrap_or_else(|e| {
        eprintln!("Error setting up the search: {}", e);
        std::process::exit(1);
    });

    println!("nialm disaggregation");
    println!("====================");
    println!("Ceiling: {:.2} Wh", engine.problem().ceiling_wh());
    println!();

    let result = engine.run_with_callback(|progress| {
        println!(
            "  Generation {}/{}: best fitness {:.4} ({} blocks)",
            progress.generation,
            progress.total_generations,
            progress.best_fitness,
            progress.best_blocks
        );
    });

    println!();
    println!(
        "Explained {:.1}% of {:.2} Wh in {} blocks ({:?} after {} generations, {:.2}s)",
        result.fitness * 100.0,
        result.ceiling_wh,
        result.blocks.len(),
        result.stats.stop_reason,
        result.stats.generations,
        result.stats.elapsed_seconds
    );
    for block in &result.blocks {
        println!(
            "  on {} off {}: {:.0} W for {} s ({:.2} Wh)",
            block.on_ts, block.off_ts, block.avg_power_w, block.duration_s, block.energy_wh
        );
    }
    println!();

    match serde_json::to_string_pretty(&result) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing result: {}", e);
            std::process::exit(1);
        }
    }
}

/// Parse `timestamp,value` lines into a series. Blank lines and `#`
/// comments are skipped; an empty or `nan` value is a gap.
fn parse_signal(input: &str) -> Result<Series, String> {
    let mut timestamps = Vec::new();
    let mut values = Vec::new();

    for (number, line) in input.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (ts_str, value_str) = line
            .split_once(',')
            .ok_or_else(|| format!("line {}: expected `timestamp,value`", number + 1))?;
        let ts: i64 = ts_str
            .trim()
            .parse()
            .map_err(|e| format!("line {}: bad timestamp: {}", number + 1, e))?;
        let value_str = value_str.trim();
        let value: f64 = if value_str.is_empty() || value_str.eq_ignore_ascii_case("nan") {
            f64::NAN
        } else {
            value_str
                .parse()
                .map_err(|e| format!("line {}: bad value: {}", number + 1, e))?
        };
        timestamps.push(ts);
        values.push(value);
    }

    let step_s = timestamps
        .windows(2)
        .map(|w| w[1] - w[0])
        .filter(|d| *d > 0)
        .min()
        .unwrap_or(1);

    Series::new(timestamps, values, step_s).map_err(|e| e.to_string())
}

fn print_example_config() {
    let config = DisaggConfig::default();

    println!("Example configuration (config.json):");
    match serde_json::to_string_pretty(&config) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error generating example config: {}", e),
    }
}
