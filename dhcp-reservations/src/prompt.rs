use std::io::{self, BufRead, BufReader, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use dhcpd_conf::Confirm;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Ctrl-C state shared between the signal handler and an open prompt.
#[derive(Debug, Default)]
pub struct Interrupt {
    prompting: AtomicBool,
    pending: AtomicBool,
}

impl Interrupt {
    /// Record a Ctrl-C. Returns `false` when no prompt is waiting for an
    /// answer; the handler then terminates the process as usual.
    pub fn signal(&self) -> bool {
        if self.prompting.load(Ordering::SeqCst) {
            self.pending.store(true, Ordering::SeqCst);
            true
        } else {
            false
        }
    }

    fn begin(&self) {
        self.pending.store(false, Ordering::SeqCst);
        self.prompting.store(true, Ordering::SeqCst);
    }

    fn end(&self) {
        self.prompting.store(false, Ordering::SeqCst);
    }

    fn take(&self) -> bool {
        self.pending.swap(false, Ordering::SeqCst)
    }
}

/// Asks yes/no questions on a terminal-like stream pair.
///
/// End of input, a read error or a Ctrl-C while waiting counts as "no" for
/// that question only. Input is read on a helper thread started by the first
/// question, so a blocked read never hides an interrupt.
pub struct TerminalConfirm<R, W> {
    input: Option<R>,
    answers: Option<Receiver<String>>,
    output: W,
    interrupt: Arc<Interrupt>,
}

impl TerminalConfirm<BufReader<io::Stdin>, io::Stderr> {
    /// Prompt on stderr and read answers from stdin.
    pub fn stdio(interrupt: Arc<Interrupt>) -> Self {
        Self::new(BufReader::new(io::stdin()), io::stderr(), interrupt)
    }
}

impl<R, W> TerminalConfirm<R, W>
where
    R: BufRead + Send + 'static,
    W: Write,
{
    pub fn new(input: R, output: W, interrupt: Arc<Interrupt>) -> Self {
        Self {
            input: Some(input),
            answers: None,
            output,
            interrupt,
        }
    }

    fn ask(&mut self, prompt: &str) -> bool {
        loop {
            let _ = write!(self.output, "{prompt} (yes/no): ");
            let _ = self.output.flush();

            let Some(answer) = self.next_line() else {
                let _ = writeln!(self.output, "\nOperation cancelled by user");
                return false;
            };
            match answer.trim().to_ascii_lowercase().as_str() {
                "yes" | "y" => return true,
                "no" | "n" => return false,
                _ => {
                    let _ = writeln!(self.output, "Please answer 'yes' or 'no'");
                }
            }
        }
    }

    /// Next input line, or `None` on end of input or an interrupt.
    fn next_line(&mut self) -> Option<String> {
        loop {
            if self.interrupt.take() {
                tracing::debug!("Prompt interrupted");
                return None;
            }
            match self.answers()?.recv_timeout(POLL_INTERVAL) {
                Ok(line) => return Some(line),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => return None,
            }
        }
    }

    fn answers(&mut self) -> Option<&Receiver<String>> {
        if let Some(input) = self.input.take() {
            let (tx, rx) = mpsc::channel();
            let spawned = thread::Builder::new()
                .name("prompt-input".to_string())
                .spawn(move || read_lines(input, tx));
            match spawned {
                Ok(_) => self.answers = Some(rx),
                Err(err) => tracing::warn!(error = %err, "Cannot read answers from input"),
            }
        }
        self.answers.as_ref()
    }
}

fn read_lines<R: BufRead>(mut input: R, tx: mpsc::Sender<String>) {
    loop {
        let mut line = String::new();
        match input.read_line(&mut line) {
            Ok(0) | Err(_) => return,
            Ok(_) => {
                if tx.send(line).is_err() {
                    return;
                }
            }
        }
    }
}

impl<R, W> Confirm for TerminalConfirm<R, W>
where
    R: BufRead + Send + 'static,
    W: Write,
{
    fn confirm(&mut self, prompt: &str) -> bool {
        self.interrupt.begin();
        let answer = self.ask(prompt);
        self.interrupt.end();
        answer
    }
}
