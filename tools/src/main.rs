//! referee-runner: headless match runner for the soccer referee.
//!
//! Usage:
//!   referee-runner --seed 12345 --log logs/match.jsonl
//!   referee-runner --config referee.json --kickoff-team Y --record videos --resolution 1080p
//!   referee-runner --ipc-mode

use anyhow::Result;
use soccer_referee_core::{
    config::RefereeConfig,
    error::RefereeError,
    event::GameEvent,
    event_handlers::JsonLoggerHandler,
    recorder::{RecordingFormat, VideoRecordAssistant},
    referee::Referee,
    simulation::InMemorySimulation,
    snapshot::MatchSnapshot,
};
use std::collections::BTreeMap;
use std::env;
use std::fmt::Display;
use std::io::{self, BufRead, Write};
use std::str::FromStr;

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetState,
    Tick { count: u64 },
    Quit,
}

#[derive(serde::Serialize)]
struct IpcReply<'a> {
    #[serde(flatten)]
    snapshot: MatchSnapshot,
    /// Events emitted since the previous reply.
    events:   &'a [GameEvent],
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");

    let mut config = match arg_value(&args, "--config") {
        Some(path) => RefereeConfig::load(path)?,
        None => RefereeConfig::default(),
    };
    config.seed = parse_arg(&args, "--seed", config.seed)?;
    if let Some(team) = arg_value(&args, "--kickoff-team") {
        config.initial_kickoff_team = Some(team.to_string());
    }
    config.validate()?;

    let log_path = arg_value(&args, "--log");
    let record_dir = arg_value(&args, "--record");
    let resolution = arg_value(&args, "--resolution").unwrap_or("720p");

    if !ipc_mode {
        println!("Soccer referee: referee-runner");
        println!("  match:      {} (half {})", config.match_id, config.half_id);
        println!("  teams:      {} vs {}", config.team_name_blue, config.team_name_yellow);
        println!("  seed:       {}", config.seed);
        println!("  log:        {}", log_path.unwrap_or("(none)"));
        println!();
    }

    let sim = InMemorySimulation::new().keep_last_broadcast_only();
    let mut referee = Referee::new(config, sim)?;
    if let Some(path) = log_path {
        referee.subscribe(Box::new(JsonLoggerHandler::new(path)));
    }

    let mut recorder = match record_dir {
        Some(dir) => {
            let mut assistant = VideoRecordAssistant::new(resolution, RecordingFormat::Mp4, dir)?;
            let cfg = referee.config();
            let title = assistant.create_title(
                cfg.match_id,
                cfg.half_id,
                &cfg.team_name_blue,
                &cfg.team_name_yellow,
            );
            assistant.start_recording(referee.supervisor_mut().sim_mut(), &title)?;
            Some(assistant)
        }
        None => None,
    };

    if ipc_mode {
        run_ipc_loop(&mut referee)?;
    } else {
        let events = referee.run_to_end()?;
        print_summary(&referee, &events);
    }

    if let Some(assistant) = recorder.as_mut() {
        if let Some(path) = assistant.stop_recording(referee.supervisor_mut().sim_mut())? {
            log::info!("recording saved to {}", path.display());
        }
    }
    Ok(())
}

fn run_ipc_loop(referee: &mut Referee<InMemorySimulation>) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                let err_json = serde_json::json!({ "error": e.to_string() });
                writeln!(stdout, "{}", err_json)?;
                stdout.flush()?;
                continue;
            }
        };

        let events = match cmd {
            IpcCommand::Quit => break,
            IpcCommand::Tick { count } => referee.run_ticks(count)?,
            IpcCommand::GetState => Vec::new(),
        };
        let reply = IpcReply { snapshot: referee.snapshot(), events: &events };
        writeln!(stdout, "{}", serde_json::to_string(&reply)?)?;
        stdout.flush()?;
    }
    Ok(())
}

fn print_summary(referee: &Referee<InMemorySimulation>, events: &[GameEvent]) {
    let snapshot = referee.snapshot();
    let mut by_kind: BTreeMap<&str, usize> = BTreeMap::new();
    for event in events {
        *by_kind.entry(event.kind()).or_default() += 1;
    }

    println!("=== MATCH SUMMARY ===");
    println!("  ticks run:  {}", snapshot.clock.elapsed_ticks);
    println!("  elapsed:    {:.3}s", snapshot.elapsed);
    println!(
        "  score:      {} {} - {} {}",
        snapshot.team_name_blue, snapshot.score_blue, snapshot.score_yellow, snapshot.team_name_yellow
    );
    println!();
    println!("=== EVENTS ===");
    for (kind, count) in &by_kind {
        println!("  {kind:<28} {count}");
    }
}

fn arg_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2).find(|w| w[0] == flag).map(|w| w[1].as_str())
}

fn parse_arg<T>(args: &[String], flag: &str, default: T) -> Result<T, RefereeError>
where
    T: FromStr,
    T::Err: Display,
{
    match arg_value(args, flag) {
        None => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|e| RefereeError::Configuration(format!("invalid value '{raw}' for {flag}: {e}"))),
    }
}
