//! CLI `shell` command: the interactive medication manager.
//!
//! Loads the catalog once, then reads one command per line. Every change to
//! the personal list reprints the list, the risk banner and today's plan.

use std::future::Future;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::mpsc;

use dosewise::catalog::types::{InteractionRule, RiskLevel};
use dosewise::catalog::Catalog;
use dosewise::config::DosewiseConfig;
use dosewise::ocr::{self, TextRecognizer};
use dosewise::schedule::PlanEntry;
use dosewise::client;
use dosewise::session::{AddOutcome, HealthEntry, HealthField, PersonalDrugList, Session};

/// Where the shell gets its catalog from.
#[derive(Debug, Clone)]
pub enum CatalogSource {
    Api(String),
    Files { drugs: PathBuf, interactions: PathBuf },
}

#[derive(Debug, Clone, PartialEq)]
enum ShellCommand {
    Catalog,
    List,
    Add(String),
    Remove(String),
    Risk,
    Plan,
    Scan(PathBuf),
    Track(HealthField, String),
    Health,
    Help,
    Quit,
}

const HELP: &str = "\
Commands:
  catalog                      show every drug in the catalog
  list                         show your current drugs
  add <id>                     add a catalog drug to your list
  remove <id>                  remove a drug from your list
  risk                         show the interaction risk for your list
  plan                         show today's dosing plan
  scan <image>                 read a prescription photo and add the drugs it names
  track bp|sugar|feelings <v>  record a health value (kept for this session only)
  health                       show recorded health values
  help                         show this help
  quit                         leave the shell";

fn parse_command(line: &str) -> Result<ShellCommand, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let require = |what: &str| -> Result<String, String> {
        if rest.is_empty() {
            Err(format!("usage: {word} <{what}>"))
        } else {
            Ok(rest.to_string())
        }
    };

    match word {
        "catalog" => Ok(ShellCommand::Catalog),
        "list" | "ls" => Ok(ShellCommand::List),
        "add" => require("id").map(ShellCommand::Add),
        "remove" | "rm" => require("id").map(ShellCommand::Remove),
        "risk" => Ok(ShellCommand::Risk),
        "plan" => Ok(ShellCommand::Plan),
        "scan" => require("image").map(|p| ShellCommand::Scan(PathBuf::from(p))),
        "track" => {
            let (field, value) = rest
                .split_once(char::is_whitespace)
                .map(|(f, v)| (f, v.trim()))
                .unwrap_or((rest, ""));
            if field.is_empty() {
                return Err("usage: track bp|sugar|feelings <value>".to_string());
            }
            Ok(ShellCommand::Track(field.parse()?, value.to_string()))
        }
        "health" => Ok(ShellCommand::Health),
        "help" | "?" => Ok(ShellCommand::Help),
        "quit" | "exit" => Ok(ShellCommand::Quit),
        other => Err(format!("unknown command: {other} (type `help`)")),
    }
}

type InputLines = mpsc::Receiver<std::io::Result<String>>;

/// Read stdin on a plain thread so a pending read never holds up runtime
/// shutdown. The channel holds one line, so nothing is read ahead while a
/// command runs.
fn spawn_stdin_reader() -> InputLines {
    let (tx, rx) = mpsc::channel(1);
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// Next input line, or `None` on end of input or when `interrupt` fires first.
async fn read_line(
    input: &mut InputLines,
    interrupt: impl Future<Output = ()>,
) -> std::io::Result<Option<String>> {
    tokio::select! {
        line = input.recv() => line.transpose(),
        _ = interrupt => Ok(None),
    }
}

/// Run the interactive shell until `quit`, end of input or Ctrl-C.
pub async fn shell(config: &DosewiseConfig, source: CatalogSource) -> Result<()> {
    let catalog = match &source {
        CatalogSource::Api(url) => client::fetch_catalog(url)
            .await
            .with_context(|| format!("failed to load catalog from {url}; is `dosewise serve` running?"))?,
        CatalogSource::Files { drugs, interactions } => client::load_catalog_files(drugs, interactions)
            .context("failed to load catalog files")?,
    };

    let recognizer: Arc<dyn TextRecognizer> = Arc::from(ocr::create_recognizer(&config.ocr));
    let mut session = Session::new(catalog);

    println!("Dosewise: personal medication manager");
    println!("{} drugs, {} interaction rules loaded.", session.catalog().drugs.len(), session.catalog().interactions.len());
    println!("{HELP}");

    let mut input = spawn_stdin_reader();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = read_line(&mut input, super::interrupted()).await? else {
            println!();
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(message) => {
                println!("{message}");
                continue;
            }
        };

        match command {
            ShellCommand::Catalog => print!("{}", render_catalog(session.catalog())),
            ShellCommand::List => print!("{}", render_list(session.list())),
            ShellCommand::Add(id) => match session.add(&id) {
                AddOutcome::Added => print!("{}", render_overview(&session)),
                AddOutcome::AlreadyListed => println!("{id} is already on your list."),
                AddOutcome::UnknownDrug => println!("No drug with id {id} in the catalog."),
            },
            ShellCommand::Remove(id) => {
                if session.remove(&id) {
                    print!("{}", render_overview(&session));
                } else {
                    println!("{id} is not on your list.");
                }
            }
            ShellCommand::Risk => print!("{}", render_risk(session.risk())),
            ShellCommand::Plan => print!("{}", render_plan(session.plan())),
            ShellCommand::Scan(image) => {
                // input is not read again until recognition has finished
                match super::recognize_with_progress(Arc::clone(&recognizer), image).await {
                    Ok(text) => {
                        println!("Recognized text:");
                        println!("{}", text.trim());
                        let report = session.apply_recognized_text(&text);
                        println!("{}", report.message());
                        if report.count() > 0 {
                            print!("{}", render_overview(&session));
                        }
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "recognition failed");
                        println!("Recognition failed: {e}");
                    }
                }
            }
            ShellCommand::Track(field, value) => {
                session.health.set(field, &value);
                print!("{}", render_health(&session.health));
            }
            ShellCommand::Health => print!("{}", render_health(&session.health)),
            ShellCommand::Help => println!("{HELP}"),
            ShellCommand::Quit => break,
        }
    }

    println!("Bye.");
    Ok(())
}

fn render_catalog(catalog: &Catalog) -> String {
    let mut out = String::from("Catalog:\n");
    if catalog.drugs.is_empty() {
        out.push_str("  (empty)\n");
    }
    for drug in &catalog.drugs {
        out.push_str(&format!("  {:<10} {}", drug.id, drug.name));
        if let Some(instruction) = drug.instruction.as_deref().filter(|s| !s.is_empty()) {
            out.push_str(&format!(" ({instruction})"));
        }
        out.push('\n');
        if !drug.side_effects.is_empty() {
            out.push_str(&format!("  {:<10} side effects: {}\n", "", drug.side_effects.join(", ")));
        }
    }
    out
}

fn render_list(list: &PersonalDrugList) -> String {
    let mut out = String::from("My drugs:\n");
    if list.is_empty() {
        out.push_str("  (none yet; add drugs from the catalog)\n");
    }
    for drug in list.drugs() {
        out.push_str(&format!("  {:<10} {}\n", drug.id, drug.name));
    }
    out
}

fn render_risk(finding: Option<&InteractionRule>) -> String {
    match finding {
        None => "Risk: OK, no known interaction in your current list.\n".to_string(),
        Some(rule) => {
            let tag = match &rule.risk_level {
                RiskLevel::Red => "SEVERE".to_string(),
                RiskLevel::Yellow => "CAUTION".to_string(),
                RiskLevel::Other(level) => level.to_uppercase(),
            };
            format!(
                "Risk [{tag}]: {} (drugs: {})\n",
                rule.description,
                rule.drug_ids.join(", ")
            )
        }
    }
}

fn render_plan(plan: &[PlanEntry]) -> String {
    let mut out = String::from("Today's plan:\n");
    if plan.is_empty() {
        out.push_str("  (nothing scheduled; add drugs with a recognized dosing instruction)\n");
    }
    for entry in plan {
        out.push_str(&format!("  {}  {}\n", entry.time, entry.task));
    }
    out
}

fn render_health(health: &HealthEntry) -> String {
    let show = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());
    format!(
        "Health (not saved):\n  blood pressure (mmHg): {}\n  blood sugar (mmol/L):  {}\n  feelings:              {}\n",
        show(&health.blood_pressure),
        show(&health.blood_sugar),
        show(&health.feelings),
    )
}

fn render_overview(session: &Session) -> String {
    format!(
        "{}{}{}",
        render_list(session.list()),
        render_risk(session.risk()),
        render_plan(session.plan())
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use dosewise::catalog::types::Drug;

    fn drug(id: &str, name: &str, instruction: &str) -> Drug {
        Drug {
            id: id.into(),
            name: name.into(),
            instruction: Some(instruction.into()),
            side_effects: vec!["nausea".into()],
        }
    }

    fn test_session() -> Session {
        Session::new(Catalog::new(
            vec![
                drug("d1", "Aspirin", "once daily"),
                drug("d2", "Warfarin", "once daily, before meal"),
            ],
            vec![InteractionRule {
                id: 1,
                description: "Increased bleeding risk".into(),
                risk_level: RiskLevel::Red,
                drug_ids: vec!["d1".into(), "d2".into()],
            }],
        ))
    }

    #[test]
    fn parses_commands() {
        assert_eq!(parse_command("add d1"), Ok(ShellCommand::Add("d1".into())));
        assert_eq!(parse_command("  rm   d2 "), Ok(ShellCommand::Remove("d2".into())));
        assert_eq!(
            parse_command("scan /tmp/rx photo.png"),
            Ok(ShellCommand::Scan(PathBuf::from("/tmp/rx photo.png")))
        );
        assert_eq!(
            parse_command("track bp 120/80"),
            Ok(ShellCommand::Track(HealthField::BloodPressure, "120/80".into()))
        );
        assert_eq!(
            parse_command("track feelings a bit dizzy"),
            Ok(ShellCommand::Track(HealthField::Feelings, "a bit dizzy".into()))
        );
        assert_eq!(parse_command("quit"), Ok(ShellCommand::Quit));
    }

    #[test]
    fn rejects_bad_commands() {
        assert!(parse_command("add").unwrap_err().contains("usage"));
        assert!(parse_command("track").is_err());
        assert!(parse_command("track pulse 80").unwrap_err().contains("unknown health field"));
        assert!(parse_command("dance").unwrap_err().contains("unknown command"));
    }

    #[test]
    fn overview_shows_banner_and_plan() {
        let mut session = test_session();
        session.add("d1");
        session.add("d2");

        let out = render_overview(&session);
        assert!(out.contains("d1         Aspirin"));
        assert!(out.contains("Risk [SEVERE]: Increased bleeding risk"));
        assert!(out.contains("07:30  take Warfarin"));
        assert!(out.contains("08:30  take Aspirin"));

        session.remove("d2");
        assert!(render_risk(session.risk()).starts_with("Risk: OK"));
    }

    #[test]
    fn empty_views_have_hints() {
        let session = Session::new(Catalog::default());
        assert!(render_catalog(session.catalog()).contains("(empty)"));
        assert!(render_list(session.list()).contains("none yet"));
        assert!(render_plan(session.plan()).contains("nothing scheduled"));
        assert!(render_health(&session.health).contains("blood pressure (mmHg): -"));
    }

    #[test]
    fn catalog_lists_instructions_and_side_effects() {
        let session = test_session();
        let out = render_catalog(session.catalog());
        assert!(out.contains("Aspirin (once daily)"));
        assert!(out.contains("side effects: nausea"));
    }

    #[tokio::test]
    async fn interrupt_ends_input_while_waiting() {
        let (_tx, mut rx) = mpsc::channel(1);
        let line = read_line(&mut rx, std::future::ready(())).await.unwrap();
        assert_eq!(line, None);
    }

    #[tokio::test]
    async fn lines_arrive_until_input_closes() {
        let (tx, mut rx) = mpsc::channel(1);
        tx.send(Ok("list".to_string())).await.unwrap();

        let line = read_line(&mut rx, std::future::pending()).await.unwrap();
        assert_eq!(line.as_deref(), Some("list"));

        drop(tx);
        let line = read_line(&mut rx, std::future::pending()).await.unwrap();
        assert_eq!(line, None);
    }

    #[test]
    fn unknown_levels_are_shown_verbatim() {
        let rule = InteractionRule {
            id: 3,
            description: "check dose".into(),
            risk_level: RiskLevel::Other("orange".into()),
            drug_ids: vec!["a".into(), "b".into()],
        };
        assert_eq!(render_risk(Some(&rule)), "Risk [ORANGE]: check dose (drugs: a, b)\n");
    }
}
