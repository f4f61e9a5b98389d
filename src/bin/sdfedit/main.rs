//! sdfedit CLI - headless driver for the editor core.
//!
//! Replays a frame script through an edit session, uploading into a host
//! scene buffer, and reports the resulting stack and accumulation state.
//!
//! Script format: one frame per line, `#` starts a comment.
//! ```text
//! 2 2 MouseLeft        # cycle shape twice (counts once), commit
//! orbit:10,0           # camera drag
//! 30* -                # thirty idle frames
//! Z                    # undo
//! ```

use anyhow::{bail, Context, Result};
use sdfedit::edit::EditCommand;
use sdfedit::frame::FrameClock;
use sdfedit::prelude::*;
use std::env;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Verbosity levels for -q / default / -v / -vv
const LOG_QUIET: &str = "error";
const LOG_INFO: &str = "info";
const LOG_DEBUG: &str = "debug";
const LOG_TRACE: &str = "trace";

fn main() {
    let args: Vec<String> = env::args().collect();

    // Parse global flags
    let mut level = LOG_INFO;
    let mut filtered_args: Vec<&str> = Vec::new();
    for arg in &args[1..] {
        match arg.as_str() {
            "-v" | "--verbose" => level = LOG_DEBUG,
            "-vv" | "--trace" => level = LOG_TRACE,
            "-q" | "--quiet" => level = LOG_QUIET,
            _ => filtered_args.push(arg),
        }
    }
    init_logging(level);

    if filtered_args.is_empty() {
        print_usage(&args[0]);
        return;
    }

    let result = match filtered_args[0] {
        "replay" | "r" => cmd_replay(&filtered_args[1..]),
        "check" | "c" => cmd_check(&filtered_args[1..]),
        "help" | "h" | "-h" | "--help" => {
            print_usage(&args[0]);
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {}", other);
            print_usage(&args[0]);
            std::process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn print_usage(prog: &str) {
    println!("sdfedit - SDF edit stack driver");
    println!();
    println!("Usage: {} [options] <command> [args]", prog);
    println!();
    println!("Commands:");
    println!("  r, replay <script>   Replay a frame script and print the final scene");
    println!("  c, check             Validate startup files and exit");
    println!("  h, help              Show this help");
    println!();
    println!("Startup options (replay, check):");
    println!("  --settings <file>    Settings JSON (default: config dir)");
    println!("  --materials <file>   Material table (count + 8 floats per material)");
    println!("  --edits <file>       JSON list of initial edits");
    println!("  --seed <n>           Jitter seed (replay)");
    println!();
    println!("Options:");
    println!("  -v, --verbose  Debug output");
    println!("  -vv, --trace   Trace output (very verbose)");
    println!("  -q, --quiet    Errors only");
    println!();
    println!("Script bindings:");
    for cmd in ALL_COMMANDS {
        println!("  {:<10} {:?}", cmd.binding(), cmd);
    }
    println!("  orbit:dx,dy  pan:dx,dy  zoom:d  resize  -  (idle)  N* (repeat line)");
}

const ALL_COMMANDS: [EditCommand; 12] = [
    EditCommand::CycleShapePrev,
    EditCommand::CycleShapeNext,
    EditCommand::CycleBlendPrev,
    EditCommand::CycleBlendNext,
    EditCommand::DecreaseSmoothness,
    EditCommand::IncreaseSmoothness,
    EditCommand::GrowScale,
    EditCommand::ShrinkScale,
    EditCommand::MaterialPrev,
    EditCommand::MaterialNext,
    EditCommand::Commit,
    EditCommand::Undo,
];

/// Options shared by the startup-loading commands
#[derive(Default)]
struct StartupArgs {
    settings: Option<PathBuf>,
    materials: Option<PathBuf>,
    edits: Option<PathBuf>,
    seed: Option<u32>,
    positional: Vec<String>,
}

fn parse_startup_args(args: &[&str]) -> Result<StartupArgs> {
    let mut out = StartupArgs::default();
    let mut iter = args.iter();
    while let Some(&arg) = iter.next() {
        let mut value = |name: &str| {
            iter.next()
                .map(|s| s.to_string())
                .with_context(|| format!("{name} needs a value"))
        };
        match arg {
            "--settings" => out.settings = Some(value("--settings")?.into()),
            "--materials" => out.materials = Some(value("--materials")?.into()),
            "--edits" => out.edits = Some(value("--edits")?.into()),
            "--seed" => {
                let v = value("--seed")?;
                out.seed = Some(v.parse().with_context(|| format!("invalid seed '{v}'"))?);
            }
            other if other.starts_with("--") => bail!("unknown option {other}"),
            other => out.positional.push(other.to_string()),
        }
    }
    Ok(out)
}

/// Settings + startup scene, loaded before any frame runs
struct Startup {
    settings: Settings,
    scene: StartupScene,
    material_count: u32,
}

fn load_startup(args: &StartupArgs) -> Result<Startup> {
    let settings = Settings::load(args.settings.as_deref()).context("loading settings")?;
    let scene = StartupScene::load(args.materials.as_deref(), args.edits.as_deref())
        .context("loading startup scene")?;
    let material_count = scene.material_count(settings.material_count);
    if material_count == 0 {
        bail!("material table is empty");
    }
    Ok(Startup { settings, scene, material_count })
}

fn cmd_check(args: &[&str]) -> Result<()> {
    let args = parse_startup_args(args)?;
    let startup = load_startup(&args)?;

    // Commit into a scratch stack to validate every edit.
    let camera = OrbitCamera::look_at(startup.settings.camera_eye, startup.settings.camera_target);
    let mut session = EditSession::new(&startup.settings, startup.material_count, camera.pose())?;
    let ids = session.load_startup(&startup.scene, startup.material_count)?;

    println!("Settings OK ({} materials)", startup.material_count);
    println!("Startup edits: {}", ids.len());
    Ok(())
}

/// One script line
struct ScriptFrame {
    line: usize,
    repeat: usize,
    events: Vec<EditCommand>,
    camera: Vec<CameraOp>,
    resize: bool,
}

enum CameraOp {
    Orbit(f32, f32),
    Pan(f32, f32),
    Zoom(f32),
}

fn parse_pair(s: &str) -> Option<(f32, f32)> {
    let (a, b) = s.split_once(',')?;
    Some((a.trim().parse().ok()?, b.trim().parse().ok()?))
}

fn parse_script(text: &str) -> Result<Vec<ScriptFrame>> {
    let mut frames = Vec::new();
    for (i, raw) in text.lines().enumerate() {
        let line = i + 1;
        let content = raw.split('#').next().unwrap_or("").trim();
        if content.is_empty() {
            continue;
        }

        let mut frame = ScriptFrame {
            line,
            repeat: 1,
            events: Vec::new(),
            camera: Vec::new(),
            resize: false,
        };
        for token in content.split_whitespace() {
            if let Some(n) = token.strip_suffix('*') {
                frame.repeat = n
                    .parse()
                    .with_context(|| format!("line {line}: bad repeat count '{token}'"))?;
            } else if token == "-" {
                // idle
            } else if token == "resize" {
                frame.resize = true;
            } else if let Some(v) = token.strip_prefix("orbit:") {
                let (x, y) = parse_pair(v).with_context(|| format!("line {line}: bad orbit '{v}'"))?;
                frame.camera.push(CameraOp::Orbit(x, y));
            } else if let Some(v) = token.strip_prefix("pan:") {
                let (x, y) = parse_pair(v).with_context(|| format!("line {line}: bad pan '{v}'"))?;
                frame.camera.push(CameraOp::Pan(x, y));
            } else if let Some(v) = token.strip_prefix("zoom:") {
                let d = v.parse().with_context(|| format!("line {line}: bad zoom '{v}'"))?;
                frame.camera.push(CameraOp::Zoom(d));
            } else {
                let cmd = EditCommand::from_binding(token)
                    .with_context(|| format!("line {line}: unknown binding '{token}'"))?;
                frame.events.push(cmd);
            }
        }
        frames.push(frame);
    }
    Ok(frames)
}

fn cmd_replay(args: &[&str]) -> Result<()> {
    let args = parse_startup_args(args)?;
    let [script_path] = args.positional.as_slice() else {
        bail!("replay needs exactly one script file");
    };
    let script_text = std::fs::read_to_string(Path::new(script_path))
        .with_context(|| format!("reading script {script_path}"))?;
    let script = parse_script(&script_text)?;

    let startup = load_startup(&args)?;
    let settings = &startup.settings;
    let size = (settings.window_width, settings.window_height);

    let mut camera = OrbitCamera::look_at(settings.camera_eye, settings.camera_target);
    camera.fov = settings.fov;
    camera.near = settings.near;
    camera.far = settings.far;

    let mut session = EditSession::new(settings, startup.material_count, camera.pose())?;
    if let Some(seed) = args.seed {
        session = session.with_seed(seed);
    }
    session.load_startup(&startup.scene, startup.material_count)?;

    let mut buffer = HostSceneBuffer::new();
    let mut clock = FrameClock::new();
    let mut resets = 0usize;
    let mut last_uniforms = None;

    for frame in &script {
        for _ in 0..frame.repeat {
            let dt = clock.tick();
            for op in &frame.camera {
                match *op {
                    CameraOp::Orbit(x, y) => camera.orbit(x, y),
                    CameraOp::Pan(x, y) => camera.pan(x, y),
                    CameraOp::Zoom(d) => camera.zoom(d),
                }
            }
            camera.update(dt);
            if frame.resize {
                session.reset_accumulation();
            }

            let report = session
                .frame(FrameInput::from_camera(&camera, &frame.events), &mut buffer)
                .with_context(|| format!("script line {}", frame.line))?;
            if report.accumulation.is_reset() {
                resets += 1;
            }
            tracing::trace!(
                "frame {}: {} records, sample {}",
                report.frame,
                report.sync.count,
                report.sample_index
            );
            last_uniforms = Some(session.frame_uniforms(&camera, size));
        }
    }

    let stack = session.stack();
    println!("Frames:        {}", session.frames());
    println!("Committed:     {} (capacity {})", stack.len(), stack.capacity());
    println!("Uploaded:      {} records", buffer.count());
    println!("Next id:       {}", session.factory().peek_next_id());
    println!("Resets:        {}", resets);
    println!("Sample index:  {}", session.accumulation().sample_index());
    if let Some(u) = last_uniforms {
        println!(
            "Seed:          [{:.4}, {:.4}, {:.4}, {}]",
            u.seed[0], u.seed[1], u.seed[2], u.seed[3]
        );
    }
    for p in stack.committed() {
        println!(
            "  {} {:?} {:?} material {} smoothness {:.3}",
            p.object_id(),
            p.shape().unwrap_or_default(),
            p.blend().unwrap_or_default(),
            p.material_id(),
            p.smoothness()
        );
    }
    Ok(())
}
