mod config;
mod discover;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use media::{
    parse_derived_name, FfmpegFrameSource, FfmpegScorer, FfmpegTransformer, FfprobeProber,
    Locator, MediaArtifact, ParsedName, PerceptualMetric,
};
use shape::TcShapeController;
use sim::{RunContext, SimOutput, SimParams, SimulationRegistry};
use validate::{
    render, run_suite, AuxInputs, Capabilities, CheckContext, LogPair, ValidationConfig,
    ValidationRegistry,
};

use crate::config::EnvConfig;
use crate::discover::{discover_videos, targeted_checks, UNIVERSAL_CHECKS};

/// Stream-property subset used by `--suite stream` and live artifacts.
const STREAM_CHECKS: [&str; 6] = [
    "resolution",
    "frame_rate",
    "bitrate",
    "codec",
    "keyframe_interval",
    "audio_codec",
];

#[derive(Parser)]
#[command(
    name = "vstress",
    version,
    about = "Video stream degradation and validation harness"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a degradation simulation over a video file or folder.
    Simulate {
        /// Video file, or folder of videos.
        source: PathBuf,
        /// Registered simulation name.
        simulation: String,
        /// Parameter override, repeatable: --param loss_rate=10
        #[arg(long = "param", value_name = "NAME=VALUE")]
        params: Vec<String>,
        /// Optional glob filter when source is a folder.
        #[arg(long)]
        glob: Option<String>,
        /// Output directory for the mounts table.
        #[arg(long, default_value = "target/vstress")]
        out_dir: PathBuf,
        /// Keep shapes applied and mounts published until interrupted.
        #[arg(long)]
        hold: bool,
    },
    /// Validate a degraded artifact against quality bars.
    Validate {
        /// Simulated artifact: a derived file path or a stream URL.
        artifact: String,
        /// Baseline video. Defaults to the source recovered from the
        /// artifact's name, looked up next to it.
        #[arg(long)]
        baseline: Option<PathBuf>,
        /// Which checks run.
        #[arg(long, value_enum, default_value_t = SuiteArg::Targeted)]
        suite: SuiteArg,
        /// Directory holding paired OCR and error logs.
        #[arg(long)]
        logs_dir: Option<PathBuf>,
        /// Reference overlay image expected to survive degradation.
        #[arg(long)]
        overlay: Option<PathBuf>,
        /// Skip the perceptual-quality check.
        #[arg(long)]
        skip_perceptual: bool,
        /// Also write report.json into this directory.
        #[arg(long)]
        json_dir: Option<PathBuf>,
    },
    /// List registered simulations and validation checks.
    List,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SuiteArg {
    /// Checks dispatched from the artifact's parsed simulation name,
    /// plus the universal identity and duration gates.
    Targeted,
    /// Every registered check.
    Full,
    /// Stream-property checks only.
    Stream,
}

/// One published stream mount for the external media server.
#[derive(Debug, Serialize)]
struct MountEntry {
    mount: String,
    url: String,
    launch: String,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Command::Simulate {
            source,
            simulation,
            params,
            glob,
            out_dir,
            hold,
        } => simulate(&source, &simulation, &params, glob.as_deref(), &out_dir, hold),
        Command::Validate {
            artifact,
            baseline,
            suite,
            logs_dir,
            overlay,
            skip_perceptual,
            json_dir,
        } => validate_artifact(
            &artifact,
            baseline,
            suite,
            logs_dir.as_deref(),
            overlay,
            skip_perceptual,
            json_dir.as_deref(),
        ),
        Command::List => {
            list();
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn install_interrupt() -> Result<Arc<AtomicBool>> {
    let flag = Arc::new(AtomicBool::new(false));
    let handler_flag = Arc::clone(&flag);
    ctrlc::set_handler(move || {
        handler_flag.store(true, Ordering::SeqCst);
    })
    .context("install interrupt handler")?;
    Ok(flag)
}

fn simulate(
    source: &Path,
    simulation: &str,
    raw_params: &[String],
    glob: Option<&str>,
    out_dir: &Path,
    hold: bool,
) -> Result<ExitCode> {
    let env = EnvConfig::load();
    let registry = SimulationRegistry::builtin();
    if registry.get(simulation).is_none() {
        let available: Vec<&str> = registry.names().collect();
        bail!(
            "unknown simulation {simulation:?}; available: {}",
            available.join(", ")
        );
    }
    let overrides = parse_params(raw_params)?;

    let videos = if source.is_dir() {
        discover_videos(source, glob)?
    } else if source.is_file() {
        vec![source.to_path_buf()]
    } else {
        bail!("video source {} does not exist", source.display());
    };

    let interrupted = install_interrupt()?;
    let shaper = TcShapeController::default();
    let transformer = FfmpegTransformer::default();
    let mut ctx = RunContext::new(env.interface.clone(), &shaper, &transformer);

    info!(
        target: "vstress::sim",
        simulation,
        videos = videos.len(),
        interface = %env.interface,
        "running simulation"
    );

    let mut mounts = Vec::new();
    for video in &videos {
        if interrupted.load(Ordering::SeqCst) {
            info!(target: "vstress::sim", "interrupted; tearing down");
            ctx.teardown();
            return Ok(ExitCode::SUCCESS);
        }
        let run = match sim::execute(&registry, &mut ctx, simulation, video, &overrides) {
            Ok(run) => run,
            Err(err) => {
                eprintln!("simulation {simulation} failed on {}: {err}", video.display());
                return Ok(ExitCode::FAILURE);
            }
        };
        match run.output {
            SimOutput::Pipeline(launch) => {
                let mount = video
                    .file_name()
                    .and_then(|name| name.to_str())
                    .unwrap_or("stream")
                    .to_string();
                println!("Stream available at {}", env.stream_url(&mount));
                mounts.push(MountEntry {
                    url: env.stream_url(&mount),
                    mount,
                    launch,
                });
            }
            SimOutput::File(artifact) => {
                println!("Derived file {}", artifact.locator);
            }
        }
    }

    if !mounts.is_empty() {
        write_mounts(out_dir, &mounts)?;
    }

    if hold {
        println!("Holding network shape and mounts; press Ctrl-C to stop.");
        while !interrupted.load(Ordering::SeqCst) {
            thread::sleep(Duration::from_millis(200));
        }
        println!("\nStopping");
        ctx.teardown();
        println!("Stopped successfully.");
        return Ok(ExitCode::SUCCESS);
    }

    // Completed runs hand their derived files to the caller; teardown
    // still reverts any shape state.
    let delivered = ctx.release_temps();
    for path in &delivered {
        debug!(target: "vstress::sim", path = %path.display(), "delivered artifact");
    }
    ctx.teardown();
    Ok(ExitCode::SUCCESS)
}

fn write_mounts(out_dir: &Path, mounts: &[MountEntry]) -> Result<()> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("create output dir {}", out_dir.display()))?;
    let path = out_dir.join("mounts.json");
    let contents = serde_json::to_string_pretty(mounts).context("serialize mounts")?;
    fs::write(&path, contents).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

fn parse_params(raw: &[String]) -> Result<SimParams> {
    let mut params = SimParams::new();
    for entry in raw {
        let Some((name, value)) = entry.split_once('=') else {
            bail!("parameter {entry:?} is not in name=value form");
        };
        let value: f64 = value
            .parse()
            .with_context(|| format!("parameter {name:?} has non-numeric value {value:?}"))?;
        params.set(name, value);
    }
    Ok(params)
}

fn validate_artifact(
    artifact: &str,
    baseline: Option<PathBuf>,
    suite: SuiteArg,
    logs_dir: Option<&Path>,
    overlay: Option<PathBuf>,
    skip_perceptual: bool,
    json_dir: Option<&Path>,
) -> Result<ExitCode> {
    let env = EnvConfig::load();

    let (locator, parsed) = resolve_artifact(artifact)?;
    let baseline = resolve_baseline(&locator, parsed.as_ref(), baseline)?;

    let stem = parsed
        .as_ref()
        .map(|p| p.source_stem.clone())
        .unwrap_or_default();
    let aux = AuxInputs {
        ocr_logs: logs_dir.and_then(|dir| log_pair(dir, &stem, "")),
        error_logs: logs_dir.and_then(|dir| log_pair(dir, &stem, "_errors")),
        overlay: match overlay {
            Some(path) => {
                if !path.is_file() {
                    bail!("overlay image {} does not exist", path.display());
                }
                Some(Locator::File(path))
            }
            None => None,
        },
    };

    let config = ValidationConfig {
        perceptual_enabled: !skip_perceptual,
        min_perceptual_score: if env.vmaf_enabled { 80.0 } else { 30.0 },
        ..ValidationConfig::default()
    };

    let metric = if env.vmaf_enabled {
        PerceptualMetric::Vmaf
    } else {
        PerceptualMetric::Psnr
    };
    let prober = FfprobeProber::default();
    let frames = FfmpegFrameSource::default();
    let scorer = FfmpegScorer::new(metric);

    let registry = ValidationRegistry::builtin();
    let selected = match suite {
        SuiteArg::Full => registry.iter().collect::<Vec<_>>(),
        SuiteArg::Stream => registry.select(&STREAM_CHECKS)?,
        SuiteArg::Targeted => {
            let parsed = parsed
                .as_ref()
                .context("targeted suite requires a derived file artifact")?;
            let mut names = targeted_checks(&parsed.simulation);
            names.extend(UNIVERSAL_CHECKS);
            registry.select(&names)?
        }
    };

    let mut model = MediaArtifact::new(locator);
    if let Some(baseline) = baseline {
        model = model.with_baseline(baseline);
    }

    info!(
        target: "vstress::validate",
        artifact = %model.locator,
        checks = selected.len(),
        "running validation suite"
    );

    let ctx = CheckContext {
        caps: Capabilities {
            prober: &prober,
            frames: &frames,
            scorer: &scorer,
        },
        config: &config,
        artifact: &model,
        aux: &aux,
    };
    let report = run_suite(selected, &ctx);

    let stdout = io::stdout();
    render(&report, &mut stdout.lock()).context("render report")?;

    if let Some(dir) = json_dir {
        fs::create_dir_all(dir).with_context(|| format!("create output dir {}", dir.display()))?;
        let path = dir.join("report.json");
        let contents = serde_json::to_string_pretty(&report).context("serialize report")?;
        fs::write(&path, contents).with_context(|| format!("write {}", path.display()))?;
    }

    Ok(ExitCode::from(u8::try_from(report.exit_code()).unwrap_or(1)))
}

/// Resolves the artifact argument into a locator, parsing the derived-file
/// name when it is a file. Malformed names are rejected here, before any
/// check runs.
fn resolve_artifact(artifact: &str) -> Result<(Locator, Option<ParsedName>)> {
    if artifact.starts_with("rtsp://") || artifact.starts_with("http://") {
        return Ok((Locator::Stream(artifact.to_string()), None));
    }
    let path = PathBuf::from(artifact);
    if !path.is_file() {
        bail!("artifact {} does not exist", path.display());
    }
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("artifact {} has no UTF-8 file name", path.display()))?;
    let parsed = parse_derived_name(name)
        .with_context(|| format!("artifact name {name:?} is not a derived file"))?;
    Ok((Locator::File(path), Some(parsed)))
}

/// Finds the baseline: explicit flag first, then the source file recovered
/// from the artifact name, next to the artifact.
fn resolve_baseline(
    locator: &Locator,
    parsed: Option<&ParsedName>,
    explicit: Option<PathBuf>,
) -> Result<Option<Locator>> {
    if let Some(path) = explicit {
        if !path.is_file() {
            bail!("baseline {} does not exist", path.display());
        }
        return Ok(Some(Locator::File(path)));
    }
    let (Some(parsed), Locator::File(artifact_path)) = (parsed, locator) else {
        return Ok(None);
    };
    let mut name = parsed.source_stem.clone();
    if !parsed.extension.is_empty() {
        name.push('.');
        name.push_str(&parsed.extension);
    }
    let candidate = artifact_path.with_file_name(name);
    if candidate.is_file() {
        debug!(
            target: "vstress::validate",
            baseline = %candidate.display(),
            "derived baseline from artifact name"
        );
        return Ok(Some(Locator::File(candidate)));
    }
    Ok(None)
}

/// Looks for `<stem><suffix>_original.log` / `<stem><suffix>_simulated.log`
/// under the logs directory.
fn log_pair(dir: &Path, stem: &str, suffix: &str) -> Option<LogPair> {
    if stem.is_empty() {
        return None;
    }
    let original = dir.join(format!("{stem}{suffix}_original.log"));
    let simulated = dir.join(format!("{stem}{suffix}_simulated.log"));
    if original.is_file() && simulated.is_file() {
        Some(LogPair {
            original,
            simulated,
        })
    } else {
        None
    }
}

fn list() {
    let simulations = SimulationRegistry::builtin();
    println!("Simulations:");
    for spec in simulations.iter() {
        let defaults: Vec<String> = spec
            .defaults
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect();
        let defaults = if defaults.is_empty() {
            String::new()
        } else {
            format!(" [{}]", defaults.join(", "))
        };
        println!("  {:24} {:9} {:?}{defaults}", spec.name, spec.category.label(), spec.mode);
    }

    let checks = ValidationRegistry::builtin();
    println!("Validation checks:");
    for check in checks.iter() {
        let requires: Vec<&str> = check.requires.iter().map(|kind| kind.label()).collect();
        println!("  {:24} requires {}", check.name, requires.join(", "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_parse_name_value_pairs() {
        let params = parse_params(&["loss_rate=10".to_string(), "delay_ms=250.5".to_string()])
            .unwrap();
        assert_eq!(params.get("loss_rate"), Some(10.0));
        assert_eq!(params.get("delay_ms"), Some(250.5));
    }

    #[test]
    fn params_reject_malformed_entries() {
        assert!(parse_params(&["loss_rate".to_string()]).is_err());
        assert!(parse_params(&["loss_rate=fast".to_string()]).is_err());
    }

    #[test]
    fn stream_suite_names_are_all_registered() {
        let registry = ValidationRegistry::builtin();
        assert!(registry.select(&STREAM_CHECKS).is_ok());
    }

    #[test]
    fn targeted_names_are_all_registered() {
        let registry = ValidationRegistry::builtin();
        for simulation in SimulationRegistry::builtin().names() {
            let mut names = targeted_checks(simulation);
            names.extend(UNIVERSAL_CHECKS);
            assert!(
                registry.select(&names).is_ok(),
                "targeted suite for {simulation} references unknown checks"
            );
        }
    }

    #[test]
    fn stream_artifacts_skip_name_parsing() {
        let (locator, parsed) = resolve_artifact("rtsp://localhost:8554/match.mp4").unwrap();
        assert!(matches!(locator, Locator::Stream(_)));
        assert!(parsed.is_none());
    }

    #[test]
    fn malformed_file_names_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plain.mp4");
        fs::write(&path, b"x").unwrap();
        let err = resolve_artifact(path.to_str().unwrap()).unwrap_err();
        assert!(err.to_string().contains("not a derived file"));
    }

    #[test]
    fn baseline_derived_from_artifact_name() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("match.mp4");
        let derived = dir.path().join("match_temp_noise.mp4");
        fs::write(&source, b"base").unwrap();
        fs::write(&derived, b"sim").unwrap();

        let (locator, parsed) = resolve_artifact(derived.to_str().unwrap()).unwrap();
        let baseline = resolve_baseline(&locator, parsed.as_ref(), None)
            .unwrap()
            .unwrap();
        assert_eq!(baseline, Locator::File(source));
    }

    #[test]
    fn missing_sibling_baseline_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let derived = dir.path().join("match_temp_noise.mp4");
        fs::write(&derived, b"sim").unwrap();

        let (locator, parsed) = resolve_artifact(derived.to_str().unwrap()).unwrap();
        let baseline = resolve_baseline(&locator, parsed.as_ref(), None).unwrap();
        assert!(baseline.is_none());
    }

    #[test]
    fn log_pair_requires_both_sides() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("match_original.log"), b"a").unwrap();
        assert!(log_pair(dir.path(), "match", "").is_none());

        fs::write(dir.path().join("match_simulated.log"), b"b").unwrap();
        let pair = log_pair(dir.path(), "match", "").unwrap();
        assert!(pair.original.ends_with("match_original.log"));
    }

    #[test]
    fn cli_parses_simulate_invocation() {
        let cli = Cli::try_parse_from([
            "vstress",
            "simulate",
            "videos/",
            "packet_loss",
            "--param",
            "loss_rate=10",
            "--hold",
        ])
        .unwrap();
        match cli.command {
            Command::Simulate {
                simulation,
                params,
                hold,
                ..
            } => {
                assert_eq!(simulation, "packet_loss");
                assert_eq!(params, vec!["loss_rate=10"]);
                assert!(hold);
            }
            _ => panic!("expected simulate"),
        }
    }

    #[test]
    fn cli_parses_validate_invocation() {
        let cli = Cli::try_parse_from([
            "vstress",
            "validate",
            "match_temp_noise.mp4",
            "--suite",
            "full",
            "--skip-perceptual",
        ])
        .unwrap();
        match cli.command {
            Command::Validate {
                artifact,
                skip_perceptual,
                ..
            } => {
                assert_eq!(artifact, "match_temp_noise.mp4");
                assert!(skip_perceptual);
            }
            _ => panic!("expected validate"),
        }
    }
}
