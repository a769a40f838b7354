use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use log::{debug, error, info};

use crate::Vector;

/// How long the input thread blocks before checking its stop flag.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Steer(Vector),
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Command(Command),
    Resize(u16, u16),
}

/// Arrow keys steer, Escape quits. Everything else, including key releases
/// and repeats, is ignored.
pub fn command_for_key(key: KeyEvent) -> Option<Command> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key.code {
        KeyCode::Up => Some(Command::Steer(Vector::UP)),
        KeyCode::Down => Some(Command::Steer(Vector::DOWN)),
        KeyCode::Left => Some(Command::Steer(Vector::LEFT)),
        KeyCode::Right => Some(Command::Steer(Vector::RIGHT)),
        KeyCode::Esc => Some(Command::Quit),
        _ => None,
    }
}

fn decode(ev: Event) -> Option<Input> {
    match ev {
        Event::Key(key) => command_for_key(key).map(Input::Command),
        Event::Resize(cols, rows) => Some(Input::Resize(cols, rows)),
        _ => None,
    }
}

fn poll_terminal(timeout: Duration) -> io::Result<Option<Event>> {
    if event::poll(timeout)? {
        event::read().map(Some)
    } else {
        Ok(None)
    }
}

/// Background thread forwarding decoded terminal input. Stopped and joined on
/// drop; the channel closes when the thread exits.
pub struct InputPump {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl InputPump {
    pub fn spawn(tx: Sender<Input>) -> io::Result<Self> {
        Self::spawn_with(tx, poll_terminal)
    }

    /// Runs `next` in a loop on a new thread. `next` waits up to the given
    /// timeout and returns the next raw event, if any.
    pub fn spawn_with<F>(tx: Sender<Input>, next: F) -> io::Result<Self>
    where
        F: FnMut(Duration) -> io::Result<Option<Event>> + Send + 'static,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);
        let handle = thread::Builder::new()
            .name("input".into())
            .spawn(move || pump(&tx, &flag, next))?;
        Ok(Self {
            stop,
            handle: Some(handle),
        })
    }

    /// Signals the thread and waits for it to finish.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            error!("input thread panicked");
        }
    }
}

impl Drop for InputPump {
    fn drop(&mut self) {
        self.stop();
    }
}

fn pump<F>(tx: &Sender<Input>, stop: &AtomicBool, mut next: F)
where
    F: FnMut(Duration) -> io::Result<Option<Event>>,
{
    info!("input thread started");
    while !stop.load(Ordering::Relaxed) {
        let ev = match next(POLL_INTERVAL) {
            Ok(Some(ev)) => ev,
            Ok(None) => continue,
            Err(err) => {
                error!("reading terminal input failed: {err}");
                break;
            }
        };
        let Some(input) = decode(ev) else {
            continue;
        };
        debug!("input {input:?}");
        if tx.send(input).is_err() {
            break;
        }
    }
    info!("input thread stopped");
}

/// Fixed-period deadline tracker. A stopped ticker never fires again.
#[derive(Debug, Clone)]
pub struct Ticker {
    period: Duration,
    next: Option<Instant>,
}

impl Ticker {
    pub fn start(period: Duration) -> Self {
        Self::start_at(period, Instant::now())
    }

    pub fn start_at(period: Duration, now: Instant) -> Self {
        Self {
            period,
            next: Some(now + period),
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_running(&self) -> bool {
        self.next.is_some()
    }

    /// Time until the next tick, zero if it is overdue, `None` once stopped.
    pub fn time_left(&self, now: Instant) -> Option<Duration> {
        self.next.map(|next| next.saturating_duration_since(now))
    }

    /// True if a tick is due at `now`.
    pub fn is_due(&self, now: Instant) -> bool {
        self.next.is_some_and(|next| next <= now)
    }

    /// Schedules the tick after the one that just fired. Missed ticks are
    /// dropped rather than replayed in a burst.
    pub fn fired(&mut self, now: Instant) {
        if let Some(next) = self.next.as_mut() {
            *next += self.period;
            if *next <= now {
                *next = now + self.period;
            }
        }
    }

    pub fn stop(&mut self) {
        self.next = None;
    }
}
