//! Notecard serial-over-I2C transport.
//!
//! Generic over any `embedded-hal` 1.0 I2C bus and delay source, so the
//! same driver runs on the ESP-IDF `I2cDriver` and on host fakes.
//!
//! Wire protocol (peripheral at 0x17):
//!
//! ```text
//! write chunk : [len][data; len]                       len <= chunk_len
//! read query  : write [0x00][n], wait turnaround, read [avail][good][data; good]
//! ```
//!
//! `avail` is what the Notecard still holds after this chunk. A reply is
//! complete once the buffered data ends in `\n` and nothing is pending.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{Error as _, I2c};
use log::{debug, info, warn};

use crate::config::{BusConfig, MAX_BUS_CLOCK_HZ};
use crate::notecard::transport::{Transport, TransportError};

/// Largest chunk expressible in the one-byte length prefix.
const MAX_CHUNK: usize = u8::MAX as usize;

/// Upper bound on read rounds spent discarding unwanted bytes.
const DRAIN_ROUNDS: usize = 256;

pub struct NotecardI2c<I2C, D> {
    i2c: I2C,
    delay: D,
    config: BusConfig,
    open: bool,
}

impl<I2C: I2c, D: DelayNs> NotecardI2c<I2C, D> {
    /// `i2c` must already be clocked at `config.clock_hz`.
    pub fn new(i2c: I2C, delay: D, config: BusConfig) -> Self {
        Self {
            i2c,
            delay,
            config,
            open: false,
        }
    }

    pub fn config(&self) -> &BusConfig {
        &self.config
    }

    /// Give back the bus and delay.
    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }

    fn chunk_len(&self) -> u8 {
        self.config.chunk_len.max(1)
    }

    fn transmit(&mut self, data: &[u8]) -> Result<(), TransportError> {
        let mut frame = [0u8; MAX_CHUNK + 1];
        let mut in_segment = 0usize;

        for chunk in data.chunks(usize::from(self.chunk_len())) {
            frame[0] = chunk.len() as u8;
            frame[1..=chunk.len()].copy_from_slice(chunk);
            self.i2c
                .write(self.config.address, &frame[..=chunk.len()])
                .map_err(bus_error)?;

            in_segment += chunk.len();
            if in_segment >= self.config.segment_len {
                self.delay.delay_ms(self.config.segment_delay_ms);
                in_segment = 0;
            } else {
                self.delay.delay_ms(self.config.chunk_delay_ms);
            }
        }
        Ok(())
    }

    /// Ask for up to `requested` bytes. Returns `(available, good)`; the
    /// data sits in `buf[2..2 + good]`.
    fn query(
        &mut self,
        requested: u8,
        buf: &mut [u8; MAX_CHUNK + 2],
    ) -> Result<(u8, usize), TransportError> {
        self.i2c
            .write(self.config.address, &[0x00, requested])
            .map_err(bus_error)?;
        self.delay.delay_us(self.config.turnaround_us);

        let frame = &mut buf[..usize::from(requested) + 2];
        self.i2c
            .read(self.config.address, frame)
            .map_err(bus_error)?;

        let available = frame[0];
        let good = usize::from(frame[1]);
        if good > usize::from(requested) {
            warn!("notecard i2c: {} bytes returned for {} requested", good, requested);
            return Err(TransportError::Framing);
        }
        Ok((available, good))
    }

    fn receive(&mut self, out: &mut [u8]) -> Result<usize, TransportError> {
        let mut buf = [0u8; MAX_CHUNK + 2];
        let mut len = 0usize;
        let mut requested = 0u8;
        let timeout_us = u64::from(self.config.timeout_ms) * 1000;
        let poll_us = u64::from(self.config.poll_interval_ms.max(1)) * 1000;
        // Charged on every round, including rounds that deliver nothing.
        let mut waited_us = 0u64;

        loop {
            let (available, good) = self.query(requested, &mut buf)?;
            waited_us += u64::from(self.config.turnaround_us.max(1));

            if len + good > out.len() {
                warn!("notecard i2c: reply exceeds {} byte buffer", out.len());
                self.drain(available);
                return Err(TransportError::Overflow);
            }
            out[len..len + good].copy_from_slice(&buf[2..2 + good]);
            len += good;

            let complete = available == 0 && len > 0 && out[len - 1] == b'\n';
            if complete {
                return Ok(len);
            }
            if waited_us >= timeout_us {
                warn!(
                    "notecard i2c: no complete reply after {} ms ({} bytes)",
                    waited_us / 1000,
                    len
                );
                return Err(TransportError::Timeout);
            }

            if available > 0 {
                if good == 0 && requested > 0 {
                    // Pending bytes announced but none delivered: back off.
                    self.delay.delay_ms(self.config.poll_interval_ms);
                    waited_us += poll_us;
                }
                requested = available.min(self.chunk_len());
                continue;
            }

            self.delay.delay_ms(self.config.poll_interval_ms);
            waited_us += poll_us;
            requested = 0;
        }
    }

    /// Best-effort discard of bytes the Notecard still holds.
    fn drain(&mut self, mut available: u8) {
        let mut buf = [0u8; MAX_CHUNK + 2];
        let mut rounds = 0;
        while available > 0 && rounds < DRAIN_ROUNDS {
            match self.query(available.min(self.chunk_len()), &mut buf) {
                Ok((left, _)) => available = left,
                Err(_) => break,
            }
            rounds += 1;
        }
    }
}

impl<I2C: I2c, D: DelayNs> Transport for NotecardI2c<I2C, D> {
    fn open(&mut self) -> Result<(), TransportError> {
        if self.config.clock_hz > MAX_BUS_CLOCK_HZ {
            warn!(
                "notecard i2c: {} Hz exceeds {} Hz limit",
                self.config.clock_hz, MAX_BUS_CLOCK_HZ
            );
            return Err(TransportError::ClockTooFast);
        }

        let mut buf = [0u8; MAX_CHUNK + 2];
        let (stale, _) = self.query(0, &mut buf)?;
        if stale > 0 {
            debug!("notecard i2c: discarding {} stale bytes", stale);
            self.drain(stale);
        }

        self.open = true;
        info!(
            "notecard i2c: link open at 0x{:02x}, {} Hz",
            self.config.address, self.config.clock_hz
        );
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn exchange(&mut self, request: &[u8], response: &mut [u8]) -> Result<usize, TransportError> {
        if !self.open {
            return Err(TransportError::NotOpen);
        }
        self.transmit(request)?;
        self.receive(response)
    }
}

fn bus_error<E: embedded_hal::i2c::Error>(e: E) -> TransportError {
    warn!("notecard i2c: bus error {:?}", e.kind());
    TransportError::Bus
}
