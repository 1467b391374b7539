use std::env;
use std::fs;

use tools::{StepReport, parse_scene, replay};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = real_main() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<(), String> {
    let args: Vec<String> = env::args().skip(1).collect();

    let mut json = false;
    let mut path: Option<String> = None;
    for arg in &args {
        match arg.as_str() {
            "--json" => json = true,
            "-h" | "--help" => {
                println!("{}", usage());
                return Ok(());
            }
            s if s.starts_with('-') => {
                return Err(format!("unknown arg: {s}\n\n{}", usage()));
            }
            s => {
                if path.replace(s.to_string()).is_some() {
                    return Err(format!("expected one scene file\n\n{}", usage()));
                }
            }
        }
    }
    let Some(path) = path else {
        return Err(usage());
    };

    let text = fs::read_to_string(&path).map_err(|e| format!("read {path}: {e}"))?;
    let scene = parse_scene(&text).map_err(|e| format!("{path}: {e}"))?;
    let reports = replay(&scene).map_err(|e| e.to_string())?;

    if json {
        let out = serde_json::to_string_pretty(&reports).map_err(|e| format!("encode: {e}"))?;
        println!("{out}");
    } else {
        for report in &reports {
            print_report(report);
        }
    }
    Ok(())
}

fn print_report(report: &StepReport) {
    let hidden = report.rendered.len() - report.visible.len();
    if report.visible.is_empty() {
        println!("[{}] (none visible, {hidden} hidden)", report.step);
    } else {
        println!(
            "[{}] {} ({hidden} hidden)",
            report.step,
            report.visible.join(" | ")
        );
    }
}

fn usage() -> String {
    "usage: atlas-attribution [--json] <scene.json>\n\n\
     Replays a scene file and prints the visible attributions after each step.\n\
     Set RUST_LOG=attribution=debug to trace layer and element lifecycle."
        .to_string()
}
