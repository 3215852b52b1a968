// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Stand-In CLI: replace scene objects with collision-checked stand-ins.
//!
//! Usage:
//!   standin <scene.json> --config <config.json> [options]

use std::env;
use std::fs;
use std::process;

use anyhow::{bail, Context, Result};
use standin_scene::Scene;
use standin_substitution::{ReplacerConfig, RunReport, SubstitutionEngine, SubstitutionOutcome};

struct Args {
    scene_path: String,
    config_path: String,
    output_path: Option<String>,
    report_path: Option<String>,
    seed: Option<u64>,
    ratio: Option<f64>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            env::var("RUST_LOG").unwrap_or_else(|_| "info,standin_substitution=debug".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        print_usage();
        return;
    }

    let parsed = match parse_args(&args) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("Error: {e}");
            print_usage();
            process::exit(2);
        }
    };

    if let Err(e) = run(parsed) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn parse_args(args: &[String]) -> Result<Args> {
    let mut config_path = None;
    let mut output_path = None;
    let mut report_path = None;
    let mut seed = None;
    let mut ratio = None;

    let mut i = 2;
    while i < args.len() {
        let flag = args[i].as_str();
        let mut value = || {
            i += 1;
            args.get(i)
                .cloned()
                .with_context(|| format!("missing value for {flag}"))
        };
        match flag {
            "--config" => config_path = Some(value()?),
            "--output" => output_path = Some(value()?),
            "--report" => report_path = Some(value()?),
            "--seed" => seed = Some(value()?.parse::<u64>().context("invalid seed value")?),
            "--ratio" => ratio = Some(value()?.parse::<f64>().context("invalid ratio value")?),
            other => bail!("unknown option: {other}"),
        }
        i += 1;
    }

    Ok(Args {
        scene_path: args[1].clone(),
        config_path: config_path.context("--config is required")?,
        output_path,
        report_path,
        seed,
        ratio,
    })
}

fn run(args: Args) -> Result<()> {
    let scene_json = fs::read_to_string(&args.scene_path)
        .with_context(|| format!("reading scene {}", args.scene_path))?;
    let mut scene = Scene::from_json(&scene_json)
        .with_context(|| format!("parsing scene {}", args.scene_path))?;

    let config_json = fs::read_to_string(&args.config_path)
        .with_context(|| format!("reading config {}", args.config_path))?;
    let mut config = ReplacerConfig::from_json(&config_json)
        .with_context(|| format!("parsing config {}", args.config_path))?;
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if let Some(ratio) = args.ratio {
        config.replace_ratio = ratio;
    }

    tracing::info!(
        scene = %args.scene_path,
        objects = scene.len(),
        ratio = config.replace_ratio,
        seed = ?config.seed,
        "Loaded scene"
    );

    let mut engine = SubstitutionEngine::new(config)?;
    let report = engine.run(&mut scene)?;
    // stdout carries the scene when no output path is given.
    eprint!("{report}");

    if let Some(path) = &args.report_path {
        fs::write(path, report_json(&report)?).with_context(|| format!("writing report {path}"))?;
    }

    let out = scene.to_json()?;
    match &args.output_path {
        Some(path) => {
            fs::write(path, out).with_context(|| format!("writing scene {path}"))?;
            tracing::info!(output = %path, objects = scene.len(), "Wrote scene");
        }
        None => println!("{out}"),
    }
    Ok(())
}

fn report_json(report: &RunReport) -> Result<String> {
    let records: Vec<_> = report
        .records
        .iter()
        .map(|r| {
            let axes: Vec<_> = r.degenerate_axes.iter().map(ToString::to_string).collect();
            let (outcome, reason) = match r.outcome {
                SubstitutionOutcome::Accepted => ("accepted", None),
                SubstitutionOutcome::Rejected { reason } => ("rejected", Some(reason.to_string())),
            };
            serde_json::json!({
                "source": r.source_name,
                "replacement": r.replacement_name,
                "pool_index": r.assignment.pool_index,
                "outcome": outcome,
                "reason": reason,
                "blocked_by": r.blocked_by,
                "details": r.details,
                "degenerate_axes": axes,
                "properties_copied": r.properties_copied,
            })
        })
        .collect();

    let doc = serde_json::json!({
        "attempted": report.len(),
        "accepted": report.accepted_count(),
        "rejected": report.rejected_count(),
        "records": records,
    });
    Ok(serde_json::to_string_pretty(&doc)?)
}

fn print_usage() {
    eprintln!("Stand-In: collision-aware object substitution");
    eprintln!();
    eprintln!("Usage: standin <scene.json> --config <config.json> [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config <path>   Replacer configuration (JSON), required");
    eprintln!("  --output <path>   Write the resulting scene here instead of stdout");
    eprintln!("  --report <path>   Write a JSON report of every attempt");
    eprintln!("  --seed <n>        Override the configured random seed");
    eprintln!("  --ratio <r>       Override replace_ratio, in [0, 1]");
    eprintln!();
    eprintln!("Logging is controlled by RUST_LOG (default: info,standin_substitution=debug).");
}
