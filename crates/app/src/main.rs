mod args;
mod catalog;

use std::error::Error;
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::time::MissedTickBehavior;
use tracing_subscriber::EnvFilter;

use services::{
    CompetitionPhase, CompetitionSession, EndlessSession, ProgressReport, SolveHistory, Trainer,
    demo_history,
};
use trainer_core::model::{CompetitionSettings, DifficultyRating, SessionSummary};
use trainer_core::selector::{Selection, SelectionReason};
use trainer_core::time::format_hms;

use crate::args::{Args, Command, print_usage};

type Input = Lines<BufReader<Stdin>>;

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn parse_rating(raw: Option<&str>) -> Option<DifficultyRating> {
    raw?.parse::<u8>().ok().and_then(|v| DifficultyRating::new(v).ok())
}

fn parse_slot(raw: Option<&str>, len: usize) -> Option<usize> {
    let n: usize = raw?.parse().ok()?;
    (1..=len).contains(&n).then(|| n - 1)
}

//
// ─── ENDLESS ───────────────────────────────────────────────────────────────────
//

fn print_endless_help() {
    println!("Commands:");
    println!("  solve <1-10>   confirm a solve and rate how hard it felt");
    println!("  skip           give up on this problem");
    println!("  hint           reveal the next hint");
    println!("  show | time    show the problem again / time spent on it");
    println!("  progress       overall statistics");
    println!("  end            finish the session");
}

fn show_problem<R: rand::Rng>(trainer: &Trainer<R>, session: &EndlessSession) {
    let Some(problem) = session.current_problem(trainer.catalog()) else {
        return;
    };
    println!();
    println!(
        "#{}  [{}]  difficulty {:.2}",
        problem.id(),
        problem.topic(),
        problem.difficulty()
    );
    println!("{}", problem.statement());
    for (level, hint) in session.hints().visible(problem).iter().enumerate() {
        println!("  hint {}: {hint}", level + 1);
    }
}

fn describe_selection(selection: &Selection) {
    match &selection.reason {
        SelectionReason::WeakestTopic(topic) => println!("Next: more {topic}."),
        SelectionReason::EasierStep => println!("Next: something a little easier."),
        SelectionReason::Fallback => println!("Next: something different."),
        SelectionReason::OnlyProblem => println!("Next: the same problem again."),
    }
}

async fn run_endless<R: rand::Rng>(
    trainer: &mut Trainer<R>,
    input: &mut Input,
) -> Result<(), Box<dyn Error>> {
    let mut session = trainer.start_endless();
    print_endless_help();
    show_problem(trainer, &session);

    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                trainer.tick_endless(&mut session);
                if session.hints().is_typing() {
                    session.finish_hint_reveal();
                }
            }
            line = input.next_line() => {
                let Some(line) = line? else { break };
                let mut words = line.split_whitespace();
                match words.next() {
                    Some("solve" | "s") => {
                        let Some(rating) = parse_rating(words.next()) else {
                            println!("usage: solve <1-10>");
                            continue;
                        };
                        match trainer.solve(&mut session, rating) {
                            Ok((outcome, selection)) => {
                                println!(
                                    "Solved in {}. Difficulty {:.2} -> {:.2}.",
                                    format_hms(outcome.record.time_spent_secs()),
                                    outcome.previous_difficulty,
                                    outcome.new_difficulty
                                );
                                describe_selection(&selection);
                                show_problem(trainer, &session);
                            }
                            Err(err) => println!("{err}"),
                        }
                    }
                    Some("skip" | "k") => match trainer.skip(&mut session) {
                        Ok(selection) => {
                            describe_selection(&selection);
                            show_problem(trainer, &session);
                        }
                        Err(err) => println!("{err}"),
                    },
                    Some("hint" | "h") => match session.request_hint(trainer.catalog()) {
                        Ok(hint) => println!("  hint {}: {hint}", session.hints().revealed()),
                        Err(err) => println!("{err}"),
                    },
                    Some("show") => show_problem(trainer, &session),
                    Some("time") => println!("{}", format_hms(session.elapsed_secs())),
                    Some("progress" | "p") => print_progress(&trainer.progress()),
                    Some("end" | "quit" | "q") => break,
                    Some("help" | "?") => print_endless_help(),
                    Some(other) => println!("unknown command: {other} (try `help`)"),
                    None => {}
                }
            }
        }
    }

    let summary = trainer.end_endless(session)?;
    print_summary(&summary);
    Ok(())
}

//
// ─── COMPETITION ───────────────────────────────────────────────────────────────
//

fn print_competition_help() {
    println!("Commands:");
    println!("  mark <n>          toggle problem n as solved");
    println!("  regen             draw a new paper and restart the clock");
    println!("  done              stop the clock");
    println!("  rate <n> <1-10>   after `done`: rate a solved problem");
    println!("  submit            after `done`: record the solves");
    println!("  show | time       show the paper / time left");
    println!("  quit              leave without recording anything");
}

fn show_paper<R: rand::Rng>(trainer: &Trainer<R>, session: &CompetitionSession) {
    println!();
    println!("Time left: {}", format_hms(session.time_left_secs()));
    for (n, (slot, problem)) in session
        .slots()
        .iter()
        .zip(session.problems(trainer.catalog()))
        .enumerate()
    {
        let mark = if slot.solved { "x" } else { " " };
        let rating = if session.phase() == CompetitionPhase::AwaitingRatings && slot.solved {
            format!("  rated {}", session.rating_for(slot.problem_id))
        } else {
            String::new()
        };
        println!("[{mark}] {}. ({}){rating}", n + 1, problem.topic());
        println!("    {}", problem.statement());
    }
}

async fn run_competition<R: rand::Rng>(
    trainer: &mut Trainer<R>,
    input: &mut Input,
) -> Result<(), Box<dyn Error>> {
    let mut session = trainer.start_competition();
    print_competition_help();
    show_paper(trainer, &session);

    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if session.phase() == CompetitionPhase::Active
                    && trainer.tick_competition(&mut session)
                {
                    println!("Time is up. Mark what you solved, then `done`.");
                }
            }
            line = input.next_line() => {
                let Some(line) = line? else { break };
                let mut words = line.split_whitespace();
                let result = match words.next() {
                    Some("mark" | "m") => {
                        let Some(slot) = parse_slot(words.next(), session.slots().len()) else {
                            println!("usage: mark <1-{}>", session.slots().len());
                            continue;
                        };
                        session.toggle_solved(slot).map(|_| show_paper(trainer, &session))
                    }
                    Some("regen") => trainer
                        .regenerate_competition(&mut session)
                        .map(|()| show_paper(trainer, &session)),
                    Some("done") => session.mark_done().map(|phase| match phase {
                        CompetitionPhase::Abandoned => {
                            println!("Nothing marked solved; nothing recorded.");
                        }
                        _ => {
                            println!("Rate your solves with `rate <n> <1-10>`, then `submit`.");
                            show_paper(trainer, &session);
                        }
                    }),
                    Some("rate") => {
                        let slot = parse_slot(words.next(), session.slots().len());
                        let rating = parse_rating(words.next());
                        let (Some(slot), Some(rating)) = (slot, rating) else {
                            println!("usage: rate <n> <1-10>");
                            continue;
                        };
                        let problem_id = session.slots()[slot].problem_id;
                        session.set_rating(problem_id, rating)
                    }
                    Some("submit") => match trainer.submit_competition(&mut session) {
                        Ok(summary) => {
                            print_summary(&summary);
                            break;
                        }
                        Err(err) => Err(err),
                    },
                    Some("show") => {
                        show_paper(trainer, &session);
                        Ok(())
                    }
                    Some("time") => {
                        println!("{}", format_hms(session.time_left_secs()));
                        Ok(())
                    }
                    Some("quit" | "q") => break,
                    Some("help" | "?") => {
                        print_competition_help();
                        Ok(())
                    }
                    Some(other) => {
                        println!("unknown command: {other} (try `help`)");
                        Ok(())
                    }
                    None => Ok(()),
                };
                if let Err(err) = result {
                    println!("{err}");
                }
                if session.phase() == CompetitionPhase::Abandoned {
                    break;
                }
            }
        }
    }

    Ok(())
}

//
// ─── REPORTS ───────────────────────────────────────────────────────────────────
//

fn print_summary(summary: &SessionSummary) {
    println!();
    println!(
        "{} session: {} solved in {}",
        summary.mode(),
        summary.solved_count(),
        format_hms(u32::try_from(summary.total_time_secs()).unwrap_or(u32::MAX))
    );
    if let Some(average) = summary.average_rating() {
        println!("Average rating: {average:.2}");
    }
}

fn print_progress(report: &ProgressReport) {
    println!();
    println!(
        "Solved {} problems in {}",
        report.total_solved,
        format_hms(u32::try_from(report.total_time_secs).unwrap_or(u32::MAX))
    );
    for ((topic, share), rating) in report.topic_shares().iter().zip(&report.topic_ratings) {
        println!(
            "  {topic:<16} {share:>5.1}%  avg rating {:.2}",
            rating.average_rating
        );
    }
    if !report.recent.is_empty() {
        println!("Recent:");
        for record in &report.recent {
            println!(
                "  #{} rated {} in {} on {}",
                record.problem_id(),
                record.rating(),
                format_hms(record.time_spent_secs()),
                record.solved_at().format("%Y-%m-%d")
            );
        }
    }
}

async fn run() -> Result<(), Box<dyn Error>> {
    let argv: Vec<String> = std::env::args().skip(1).collect();
    let parsed = Args::parse(argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;
    let Some(args) = parsed else {
        print_usage();
        return Ok(());
    };

    let catalog = catalog::load(args.catalog.as_deref())?;
    let rng = args
        .seed
        .map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
    let history = if args.demo_history {
        SolveHistory::from_records(demo_history())
    } else {
        SolveHistory::new()
    };
    let settings = CompetitionSettings::new(
        args.duration_secs
            .unwrap_or(CompetitionSettings::OLYMPIAD_DURATION_SECS),
        args.problem_count
            .unwrap_or(CompetitionSettings::OLYMPIAD_PROBLEM_COUNT),
        DifficultyRating::default(),
    )?;

    let mut trainer = Trainer::new(catalog, rng)
        .with_history(history)
        .with_competition_settings(settings);
    tracing::info!(
        mode = ?args.command,
        problems = trainer.catalog().len(),
        history = trainer.history().len(),
        seed = ?args.seed,
        "trainer ready"
    );

    let mut input = BufReader::new(tokio::io::stdin()).lines();
    match args.command {
        Command::Endless => run_endless(&mut trainer, &mut input).await?,
        Command::Competition => run_competition(&mut trainer, &mut input).await?,
    }

    print_progress(&trainer.progress());
    Ok(())
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
