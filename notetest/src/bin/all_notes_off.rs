use anyhow::Result;
use clap::Parser;

use notetest::{init_logging, io::Connection, BAUD_RATE, SERIAL_PORT};
use notetest_proto::{all_notes_off_all, CHANNEL_COUNT};

/// Sends "All Notes Off" on every channel of the floppy drive controller
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct PanicArgs {
    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

fn main() -> Result<()> {
    let args = PanicArgs::parse();
    init_logging(args.verbose, false);

    let mut connection = Connection::open(SERIAL_PORT, BAUD_RATE)?;

    for frame in all_notes_off_all() {
        connection.send(frame)?;
    }

    println!(
        "Sent all notes off on {} channels of {}",
        CHANNEL_COUNT,
        connection.name()
    );

    Ok(())
}
