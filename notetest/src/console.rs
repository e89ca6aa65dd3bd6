use std::{
    io::{self, stdin, stdout, BufRead, Read, Stdout, Write},
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::{self, Receiver, RecvTimeoutError},
        Arc,
    },
    thread,
    time::Duration,
};

use anyhow::{Context, Result};
use termion::{
    event::Key,
    input::TermRead,
    raw::{IntoRawMode, RawTerminal},
};

/// How often a blocked prompt looks at the interrupt flag
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// What the operator did at a prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Line(String),
    Interrupt,
}

/// The operator's side of the driver loop
pub trait Console {
    /// Shows `prompt` and blocks until a full line or an interrupt arrives
    fn read_line(&mut self, prompt: &str) -> Result<Input>;

    fn write_line(&mut self, line: &str) -> Result<()>;
}

/// Raised by SIGINT and seen by whichever prompt is waiting
#[derive(Debug, Clone, Default)]
pub struct Interrupt(Arc<AtomicBool>);

impl Interrupt {
    /// Replaces the default SIGINT behaviour (exit) with raising the flag
    pub fn install() -> Result<Self> {
        let interrupt = Self::default();
        let handle = interrupt.clone();

        ctrlc::set_handler(move || handle.raise())
            .context("could not install the interrupt handler")?;

        Ok(interrupt)
    }

    pub fn raise(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Moves a blocking reader onto its own thread so prompts can keep watching
/// the interrupt flag. All state stays on the caller's thread.
fn spawn_reader<T: Send + 'static>(
    mut next: impl FnMut() -> Option<io::Result<T>> + Send + 'static,
) -> Receiver<io::Result<T>> {
    let (sender, receiver) = mpsc::channel();

    thread::spawn(move || {
        while let Some(item) = next() {
            if sender.send(item).is_err() {
                break;
            }
        }
    });

    receiver
}

/// Next item from a reader, or `None` once interrupted or closed
fn receive<T>(receiver: &Receiver<io::Result<T>>, interrupt: &Interrupt) -> Result<Option<T>> {
    loop {
        if interrupt.is_raised() {
            return Ok(None);
        }

        match receiver.recv_timeout(POLL_INTERVAL) {
            Ok(item) => return Ok(Some(item?)),
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => return Ok(None),
        }
    }
}

/// Interactive terminal in raw mode.
///
/// Raw mode turns Ctrl-C into a key press instead of a signal, so the driver
/// gets to silence the drive before exiting. Typed characters are echoed by
/// hand. The terminal is restored when the output is dropped.
pub struct TerminalConsole<W: Write> {
    keys: Receiver<io::Result<Key>>,
    output: W,
    interrupt: Interrupt,
}

impl TerminalConsole<RawTerminal<Stdout>> {
    pub fn open(interrupt: Interrupt) -> Result<Self> {
        let output = stdout()
            .into_raw_mode()
            .context("could not put the terminal into raw mode")?;

        Ok(Self::new(stdin(), output, interrupt))
    }
}

impl<W: Write> TerminalConsole<W> {
    pub fn new<R: Read + Send + 'static>(input: R, output: W, interrupt: Interrupt) -> Self {
        let mut keys = input.keys();

        Self {
            keys: spawn_reader(move || keys.next()),
            output,
            interrupt,
        }
    }
}

impl<W: Write> Console for TerminalConsole<W> {
    fn read_line(&mut self, prompt: &str) -> Result<Input> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();

        // `None` is a signal or closed stdin
        while let Some(key) = receive(&self.keys, &self.interrupt)? {
            match key {
                Key::Char('\n') => {
                    write!(self.output, "\r\n")?;
                    return Ok(Input::Line(line));
                }
                Key::Ctrl('c') | Key::Ctrl('d') => break,
                Key::Backspace => {
                    if line.pop().is_some() {
                        write!(self.output, "\x08 \x08")?;
                    }
                }
                Key::Char(c) => {
                    line.push(c);
                    write!(self.output, "{}", c)?;
                }
                _ => {}
            }

            self.output.flush()?;
        }

        write!(self.output, "\r\n")?;
        self.output.flush()?;

        Ok(Input::Interrupt)
    }

    fn write_line(&mut self, line: &str) -> Result<()> {
        write!(self.output, "{}\r\n", line)?;
        self.output.flush()?;

        Ok(())
    }
}

/// Line oriented console for piped input. End of input counts as an interrupt.
pub struct LineConsole<W: Write> {
    lines: Receiver<io::Result<String>>,
    output: W,
    interrupt: Interrupt,
}

impl<W: Write> LineConsole<W> {
    pub fn new<R: BufRead + Send + 'static>(input: R, output: W, interrupt: Interrupt) -> Self {
        let mut lines = input.lines();

        Self {
            lines: spawn_reader(move || lines.next()),
            output,
            interrupt,
        }
    }
}

impl<W: Write> Console for LineConsole<W> {
    fn read_line(&mut self, prompt: &str) -> Result<Input> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        match receive(&self.lines, &self.interrupt)? {
            Some(line) => Ok(Input::Line(line)),
            None => {
                writeln!(self.output)?;
                Ok(Input::Interrupt)
            }
        }
    }

    fn write_line(&mut self, line: &str) -> Result<()> {
        writeln!(self.output, "{}", line)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_console_reads_until_eof() {
        let mut output = Vec::new();
        let mut console =
            LineConsole::new(&b"60\r\n abc\n"[..], &mut output, Interrupt::default());

        assert_eq!(console.read_line("> ").unwrap(), Input::Line("60".into()));
        assert_eq!(console.read_line("> ").unwrap(), Input::Line(" abc".into()));
        assert_eq!(console.read_line("> ").unwrap(), Input::Interrupt);

        console.write_line("bye").unwrap();
        drop(console);

        assert_eq!(String::from_utf8(output).unwrap(), "> > > \nbye\n");
    }

    #[test]
    fn raised_interrupt_ends_a_line_prompt() {
        let interrupt = Interrupt::default();
        let mut output = Vec::new();
        let mut console = LineConsole::new(&b"60\n"[..], &mut output, interrupt.clone());

        interrupt.raise();

        assert_eq!(console.read_line("> ").unwrap(), Input::Interrupt);
    }

    /// Input that never produces a byte within a test's lifetime
    struct Silent;

    impl Read for Silent {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            thread::sleep(Duration::from_secs(10));
            Ok(0)
        }
    }

    #[test]
    fn interrupt_raised_while_waiting_for_a_line() {
        let interrupt = Interrupt::default();
        let mut console =
            LineConsole::new(io::BufReader::new(Silent), io::sink(), interrupt.clone());

        let raiser = thread::spawn(move || {
            thread::sleep(Duration::from_millis(100));
            interrupt.raise();
        });

        assert_eq!(console.read_line("> ").unwrap(), Input::Interrupt);
        raiser.join().unwrap();
    }

    #[test]
    fn terminal_console_edits_and_echoes() {
        let mut output = Vec::new();
        let mut console =
            TerminalConsole::new(&b"6\x7f4\r\x03"[..], &mut output, Interrupt::default());

        assert_eq!(console.read_line("> ").unwrap(), Input::Line("4".into()));
        assert_eq!(console.read_line("> ").unwrap(), Input::Interrupt);

        console.write_line("done").unwrap();
        drop(console);

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "> 6\x08 \x084\r\n> \r\ndone\r\n"
        );
    }

    #[test]
    fn terminal_console_ctrl_d_and_eof_interrupt() {
        let mut console = TerminalConsole::new(&b"12\x04"[..], io::sink(), Interrupt::default());
        assert_eq!(console.read_line("> ").unwrap(), Input::Interrupt);

        let mut console = TerminalConsole::new(&b"12"[..], io::sink(), Interrupt::default());
        assert_eq!(console.read_line("> ").unwrap(), Input::Interrupt);
    }

    #[test]
    fn terminal_console_backspace_on_empty_line() {
        let mut output = Vec::new();
        let mut console =
            TerminalConsole::new(&b"\x7f7\n"[..], &mut output, Interrupt::default());

        assert_eq!(console.read_line("").unwrap(), Input::Line("7".into()));
        drop(console);

        assert_eq!(String::from_utf8(output).unwrap(), "7\r\n");
    }

    #[test]
    fn raised_interrupt_ends_a_terminal_prompt() {
        let interrupt = Interrupt::default();
        interrupt.raise();

        let mut console = TerminalConsole::new(&b"60\r"[..], io::sink(), interrupt);
        assert_eq!(console.read_line("> ").unwrap(), Input::Interrupt);
    }
}
