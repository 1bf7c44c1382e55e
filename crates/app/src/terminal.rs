//! Line-oriented terminal front-end over the quiz command boundary.

use std::io;

use log::debug;
use services::{AppServices, QuizSession, SessionPhase};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::vm::{clear_message, render_history, render_view};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Zero-based option index.
    Select(usize),
    Next,
    Reset,
    History,
    ClearHistory,
    /// Re-resolve questions from the source.
    Reload,
    /// Retry saving a completed result.
    Save,
    Quit,
    Unknown(String),
}

/// Parse one line of user input. Options are entered 1-based.
#[must_use]
pub fn parse_input(line: &str) -> Input {
    let line = line.trim();
    if let Ok(number) = line.parse::<usize>() {
        return match number.checked_sub(1) {
            Some(index) => Input::Select(index),
            None => Input::Unknown(line.to_owned()),
        };
    }
    match line.to_ascii_lowercase().as_str() {
        "n" | "next" | "" => Input::Next,
        "r" | "reset" | "again" => Input::Reset,
        "h" | "history" => Input::History,
        "c" | "clear" => Input::ClearHistory,
        "l" | "reload" => Input::Reload,
        "s" | "save" => Input::Save,
        "q" | "quit" | "exit" => Input::Quit,
        _ => Input::Unknown(line.to_owned()),
    }
}

fn hint(session: &QuizSession) -> &'static str {
    match session.phase() {
        SessionPhase::Loading => "q) quit",
        SessionPhase::Empty => "l) reload  h) history  q) quit",
        SessionPhase::InProgress => "1-9) select  n) next  r) restart  h) history  q) quit",
        SessionPhase::Completed if !session.is_record_saved() => {
            "s) retry saving  r) take again  h) history  c) clear history  q) quit"
        }
        SessionPhase::Completed => "r) take again  h) history  c) clear history  q) quit",
    }
}

/// Run an interactive quiz on stdin/stdout until the user quits.
///
/// # Errors
///
/// Returns an error only if stdin cannot be read.
pub async fn run_play(app: &AppServices) -> io::Result<()> {
    let quiz = app.quiz_loop();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{}", render_view(&QuizSession::loading().view()));
    let started = quiz.start_session().await;
    if started.origin.is_fallback() {
        println!("Using offline questions.");
    }
    let mut session = started.session;

    loop {
        println!();
        println!("{}", render_view(&session.view()));
        if session.phase() == SessionPhase::InProgress {
            let progress = session.progress();
            println!(
                "{}% done, {} to go",
                progress.percent_judged(),
                progress.remaining()
            );
        }
        println!("{}", hint(&session));

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = parse_input(&line);
        debug!("input: {input:?}");

        match input {
            Input::Select(index) => {
                if let Err(err) = session.select_option(index) {
                    println!("{err}");
                }
            }
            Input::Next => match quiz.advance(&mut session).await {
                Ok(result) => {
                    if let Some(err) = result.save_error {
                        println!("Your result could not be saved: {err}");
                    }
                }
                Err(err) => println!("{err}"),
            },
            Input::Reset => session.reset(),
            Input::History => println!("{}", render_history(&quiz.view_history().await)),
            Input::ClearHistory => {
                let report = quiz.clear_history().await;
                println!("{}", clear_message(&report));
            }
            Input::Reload => {
                let started = quiz.start_session().await;
                if started.origin.is_fallback() {
                    println!("Using offline questions.");
                }
                session = started.session;
            }
            Input::Save => match quiz.finalize_record(&mut session).await {
                Ok(_) => println!("Result saved."),
                Err(err) => println!("{err}"),
            },
            Input::Quit => break,
            Input::Unknown(raw) => println!("Unrecognized input: {raw}"),
        }
    }

    Ok(())
}
