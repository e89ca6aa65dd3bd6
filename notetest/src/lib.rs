pub mod config;
pub mod console;
pub mod driver;
pub mod io;

/// Serial port the controller is attached to
#[cfg(windows)]
pub const SERIAL_PORT: &str = "COM3";
#[cfg(not(windows))]
pub const SERIAL_PORT: &str = "/dev/ttyUSB0";

pub const BAUD_RATE: u32 = 115_200;

/// Sets up `env_logger` on stderr. `RUST_LOG` takes precedence over `verbose`.
///
/// `raw_terminal` is set while the console holds the terminal in raw mode,
/// where `\n` no longer returns the cursor to the start of the line.
pub fn init_logging(verbose: bool, raw_terminal: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format(move |buf, record| write_record(buf, record, raw_terminal))
        .init();
}

fn write_record(
    buf: &mut impl std::io::Write,
    record: &log::Record,
    raw_terminal: bool,
) -> std::io::Result<()> {
    let line_end = if raw_terminal { "\r\n" } else { "\n" };

    write!(
        buf,
        "[{} {}] {}{}",
        record.level(),
        record.target(),
        record.args(),
        line_end
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn formatted(raw_terminal: bool) -> String {
        let mut buf = Vec::new();

        write_record(
            &mut buf,
            &log::Record::builder()
                .args(format_args!("opened {}", SERIAL_PORT))
                .level(log::Level::Info)
                .target("notetest::io")
                .build(),
            raw_terminal,
        )
        .unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn plain_output_ends_lines_with_newline() {
        assert_eq!(
            formatted(false),
            format!("[INFO notetest::io] opened {}\n", SERIAL_PORT)
        );
    }

    #[test]
    fn raw_terminal_output_returns_the_cursor() {
        assert_eq!(
            formatted(true),
            format!("[INFO notetest::io] opened {}\r\n", SERIAL_PORT)
        );
    }
}
