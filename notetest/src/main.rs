use std::io::{stdin, stdout, BufReader};

use anyhow::Result;
use clap::Parser;

use notetest::{
    config::{parse_driver_config, NotetestArgs},
    console::{Interrupt, LineConsole, TerminalConsole},
    driver::{run, NoteDriver},
    init_logging,
    io::Connection,
    BAUD_RATE, SERIAL_PORT,
};

fn main() -> Result<()> {
    /* Parse the CLI arguments and the optional driver configuration */

    let args = NotetestArgs::parse();
    let interactive = termion::is_tty(&stdin());
    init_logging(args.verbose, interactive);

    let config = parse_driver_config(&args)?;
    log::debug!("{:?}", config);

    println!("Floppy drive test. Ctrl-c to exit");

    /* Open the serial connection, owned by the driver from here on */

    let connection = Connection::open(SERIAL_PORT, BAUD_RATE)?;
    let mut driver = NoteDriver::new(connection, config.encoder);

    /* Play notes until interrupted, by a key press or SIGINT */

    let interrupt = Interrupt::install()?;

    if interactive {
        let mut console = TerminalConsole::open(interrupt)?;
        run(&mut driver, &mut console)
    } else {
        let mut console = LineConsole::new(BufReader::new(stdin()), stdout(), interrupt);
        run(&mut driver, &mut console)
    }
}
