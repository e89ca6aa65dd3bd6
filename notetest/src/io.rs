use std::io::Write;

use anyhow::{Context, Result};
use log::{debug, info};
use serialport::SerialPort;

use notetest_proto::Frame;

pub fn open_port(path: &str, baud_rate: u32) -> Result<Box<dyn SerialPort>> {
    let port = serialport::new(path, baud_rate)
        .open()
        .with_context(|| format!("could not open serial port `{}`", path))?;

    info!("opened serial port {} at {} baud", path, baud_rate);

    Ok(port)
}

/// Exclusive write handle on the line to the controller.
///
/// The underlying port is closed when the connection is dropped, whichever
/// way the owner exits.
pub struct Connection<P: Write = Box<dyn SerialPort>> {
    port: P,
    name: String,
}

impl Connection {
    pub fn open(path: &str, baud_rate: u32) -> Result<Self> {
        Ok(Self::new(open_port(path, baud_rate)?, path))
    }
}

impl<P: Write> Connection<P> {
    pub fn new(port: P, name: impl Into<String>) -> Self {
        Self {
            port,
            name: name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Writes one frame and flushes it. Nothing is read back.
    pub fn send(&mut self, frame: Frame) -> Result<()> {
        debug!("{} <- {:02X?}", self.name, frame);

        self.port
            .write_all(&frame)
            .and_then(|()| self.port.flush())
            .with_context(|| format!("could not write to `{}`", self.name))?;

        Ok(())
    }
}

impl<P: Write> Drop for Connection<P> {
    fn drop(&mut self) {
        debug!("closing {}", self.name);
    }
}
