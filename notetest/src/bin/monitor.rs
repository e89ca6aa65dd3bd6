use std::{
    io::{ErrorKind, Read},
    time::Duration,
};

use anyhow::{Context, Result};
use clap::Parser;

use notetest::{init_logging, io::open_port, BAUD_RATE, SERIAL_PORT};
use notetest_proto::FrameDecoder;

/// Prints the note events arriving on the controller's serial line
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct MonitorArgs {
    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

fn main() -> Result<()> {
    let args = MonitorArgs::parse();
    init_logging(args.verbose, false);

    let mut port = open_port(SERIAL_PORT, BAUD_RATE)?;
    port.set_timeout(Duration::from_millis(100))?;

    println!("Listening on {}. Ctrl-c to exit", SERIAL_PORT);

    let mut decoder = FrameDecoder::new();
    let mut buf = [0u8; 64];

    loop {
        let count = match port.read(&mut buf) {
            Ok(count) => count,
            Err(err) if err.kind() == ErrorKind::TimedOut => continue,
            Err(err) => return Err(err).context("could not read from serial port"),
        };

        log::debug!("{} -> {:02X?}", SERIAL_PORT, &buf[..count]);

        decoder.push_all(&buf[..count], |event| println!("{}", event));
    }
}
