//! Interactive playback loop: timer ticks and stdin commands drive the session.

use evogames::playback::PlaybackState;
use evogames::session::{Renderer, Session};
use std::io::BufRead;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};
use tracing::{debug, info, warn};

use crate::scheduler::{TickReceiver, TokioScheduler};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    TogglePause,
    Step,
    Stop,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim() {
            "p" | "pause" | "resume" => Some(Command::TogglePause),
            "s" | "step" => Some(Command::Step),
            "x" | "stop" => Some(Command::Stop),
            "q" | "quit" => Some(Command::Quit),
            _ => None,
        }
    }
}

pub const HELP: &str = "controls: p = pause/resume, s = step, x = stop (show all), q = quit";

/// Apply one command. Returns `false` when the loop should end.
pub fn apply<R: Renderer>(session: &mut Session<TokioScheduler, R>, command: Command) -> bool {
    match command {
        Command::TogglePause => {
            session.toggle_pause();
        }
        Command::Step => {
            session.step();
        }
        Command::Stop => {
            session.stop();
        }
        Command::Quit => return false,
    }
    true
}

fn animating(state: PlaybackState) -> bool {
    matches!(state, PlaybackState::Playing | PlaybackState::Paused)
}

/// Forward stdin lines from a plain thread. The runtime never owns the
/// blocking read, so it can shut down while the thread is still parked on it.
/// The channel closes at EOF or on a read error.
pub fn spawn_stdin_reader() -> UnboundedReceiver<String> {
    let (tx, rx) = unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!("stdin read failed: {}", e);
                    break;
                }
            }
        }
    });
    rx
}

/// Play the loaded run from round zero until it finishes or the user quits.
pub async fn animate<R: Renderer>(
    session: &mut Session<TokioScheduler, R>,
    ticks: &mut TickReceiver,
    commands: &mut UnboundedReceiver<String>,
) {
    if !session.play() {
        warn!("nothing to animate");
        return;
    }
    info!("{}", HELP);

    let mut stdin_open = true;

    while animating(session.state()) {
        if !stdin_open && session.state() == PlaybackState::Paused {
            debug!("stdin closed while paused; revealing all rounds");
            session.stop();
            break;
        }
        tokio::select! {
            Some(id) = ticks.recv() => {
                if session.playback().scheduler().is_live(id) {
                    session.tick();
                }
            }
            line = commands.recv(), if stdin_open => match line {
                Some(line) => match Command::parse(&line) {
                    Some(command) => {
                        if !apply(session, command) {
                            break;
                        }
                    }
                    None if line.trim().is_empty() => {}
                    None => warn!("unknown command {:?}; {}", line.trim(), HELP),
                },
                None => stdin_open = false,
            },
            _ = tokio::signal::ctrl_c() => {
                session.stop();
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evogames::model::{DilemmaKind, Results, SimulationConfig};
    use evogames::session::RecordingRenderer;
    use std::time::Duration;

    fn session(rounds: usize) -> (Session<TokioScheduler, RecordingRenderer>, TickReceiver) {
        let (scheduler, rx) = TokioScheduler::new();
        let mut s = Session::new(scheduler, RecordingRenderer::default());
        let results = Results {
            rounds: vec![Default::default(); rounds],
            ..Results::default()
        };
        s.load(results, SimulationConfig::with_defaults(DilemmaKind::PublicGoods, "t"));
        (s, rx)
    }

    #[test]
    fn commands_parse_short_and_long_forms() {
        assert_eq!(Command::parse(" p "), Some(Command::TogglePause));
        assert_eq!(Command::parse("step"), Some(Command::Step));
        assert_eq!(Command::parse("x"), Some(Command::Stop));
        assert_eq!(Command::parse("q"), Some(Command::Quit));
        assert_eq!(Command::parse("jump"), None);
    }

    #[tokio::test]
    async fn commands_drive_the_session() {
        let (mut s, _rx) = session(4);
        s.play();
        assert!(apply(&mut s, Command::TogglePause));
        assert_eq!(s.state(), PlaybackState::Paused);
        assert!(apply(&mut s, Command::Step));
        assert_eq!(s.playback().cursor(), 1);
        assert!(apply(&mut s, Command::Stop));
        assert_eq!(s.playback().cursor(), 4);
        assert!(!apply(&mut s, Command::Quit));
    }

    #[tokio::test]
    async fn ticks_from_the_runtime_finish_playback() {
        let (mut s, mut rx) = session(3);
        s.set_interval(10);
        assert!(s.play());
        while s.state() == PlaybackState::Playing {
            let id = rx.recv().await.unwrap();
            if s.playback().scheduler().is_live(id) {
                s.tick();
            }
        }
        assert_eq!(s.state(), PlaybackState::Ready);
        assert_eq!(s.playback().cursor(), 3);
        assert!(!s.playback().has_timer());
    }

    #[tokio::test]
    async fn animate_returns_once_ready_while_input_stays_open() {
        let (mut s, mut ticks) = session(2);
        s.set_interval(10);
        let (_input, mut commands) = unbounded_channel::<String>();
        let finished = tokio::time::timeout(
            Duration::from_secs(2),
            animate(&mut s, &mut ticks, &mut commands),
        )
        .await;
        assert!(finished.is_ok());
        assert_eq!(s.state(), PlaybackState::Ready);
        assert_eq!(s.playback().cursor(), 2);
    }

    #[tokio::test]
    async fn quit_from_input_ends_animation() {
        let (mut s, mut ticks) = session(50);
        s.set_interval(1_000);
        let (input, mut commands) = unbounded_channel::<String>();
        input.send("q".to_string()).unwrap();
        let finished = tokio::time::timeout(
            Duration::from_secs(2),
            animate(&mut s, &mut ticks, &mut commands),
        )
        .await;
        assert!(finished.is_ok());
        assert!(s.playback().cursor() < 50);
    }

    #[tokio::test]
    async fn closed_input_while_paused_reveals_every_round() {
        let (mut s, mut ticks) = session(5);
        s.set_interval(1_000);
        let (input, mut commands) = unbounded_channel::<String>();
        input.send("p".to_string()).unwrap();
        drop(input);
        animate(&mut s, &mut ticks, &mut commands).await;
        assert_eq!(s.state(), PlaybackState::Ready);
        assert_eq!(s.playback().cursor(), 5);
    }
}
