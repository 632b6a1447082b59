// Fixed-rate teleop loop
// Each tick: sample keys -> encode -> write bytes. A held quit key or a failed
// write moves the session to Stopping, which sends the stop byte and closes the
// port before the loop returns.

use std::mem;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info, warn};

// local imports
use crate::config::Config;
use crate::encoder::CommandEncoder;
use crate::error::TeleopError;
use crate::input::{sample, InputSurface, TerminalSurface};
use crate::messages::{Command, KeyState};
use crate::serial::{SerialLink, Transport, TransportError};

/// Why the session is stopping
#[derive(Debug)]
pub enum StopCause {
    StopKey,
    WriteFailed(TransportError),
}

#[derive(Debug)]
pub enum Phase {
    Running,
    Stopping(StopCause),
    Stopped,
}

pub struct Session<S: InputSurface, T: Transport> {
    surface: S,
    keys: KeyState,
    // None once the port has been released
    encoder: Option<CommandEncoder<T>>,
    phase: Phase,
    command: Command,
}

impl<S: InputSurface, T: Transport> Session<S, T> {
    pub fn new(mut surface: S, transport: T) -> Self {
        surface.render_status(Command::Idle);
        Self {
            surface,
            keys: KeyState::default(),
            encoder: Some(CommandEncoder::new(transport)),
            phase: Phase::Running,
            command: Command::Idle,
        }
    }

    /// Run one tick. Returns false once the session has stopped.
    pub fn step(&mut self) -> Result<bool, TransportError> {
        if matches!(self.phase, Phase::Running) {
            self.phase = self.tick();
        }

        match mem::replace(&mut self.phase, Phase::Stopped) {
            Phase::Running => {
                self.phase = Phase::Running;
                Ok(true)
            }
            Phase::Stopping(cause) => self.finish(cause).map(|()| false),
            Phase::Stopped => Ok(false),
        }
    }

    /// Sample and transmit; decides the next phase
    fn tick(&mut self) -> Phase {
        let Some(encoder) = self.encoder.as_mut() else {
            return Phase::Stopped;
        };

        let sample = sample(&mut self.surface, self.keys);
        self.keys = sample.state;

        if sample.stop {
            info!("Stop key held, shutting down");
            return Phase::Stopping(StopCause::StopKey);
        }

        match encoder.encode_and_send(sample.state, sample.changed) {
            Ok(command) => {
                if command != self.command {
                    self.surface.render_status(command);
                    self.command = command;
                }
                Phase::Running
            }
            Err(e) => {
                error!("Transmission failed: {}", e);
                Phase::Stopping(StopCause::WriteFailed(e))
            }
        }
    }

    /// Send the final stop byte and release the port
    fn finish(&mut self, cause: StopCause) -> Result<(), TransportError> {
        let Some(mut encoder) = self.encoder.take() else {
            return Ok(());
        };

        let result = match cause {
            StopCause::StopKey => encoder.shutdown(),
            StopCause::WriteFailed(err) => {
                // Best effort, the link is probably gone
                if let Err(e) = encoder.shutdown() {
                    warn!("Failed to send stop after write error: {}", e);
                }
                Err(err)
            }
        };

        drop(encoder);
        result
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Last command reported by the encoder
    pub fn command(&self) -> Command {
        self.command
    }
}

/// Step the session once per period until it stops
pub async fn drive<S: InputSurface, T: Transport>(
    session: &mut Session<S, T>,
    period: Duration,
) -> Result<(), TransportError> {
    let mut tick = interval(period);
    tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tick.tick().await;

        if !session.step()? {
            return Ok(());
        }
    }
}

pub async fn run(config: &Config) -> Result<(), TeleopError> {
    config.validate()?;

    let link = SerialLink::open(&config.port, config.baud)?;
    let port_name = link.name().to_string();
    let surface = TerminalSurface::new(config.key_hold()).map_err(TeleopError::InputSurface)?;
    let mut session = Session::new(surface, link);

    info!(
        "Teleop started: {}Hz loop, writing to {} at {} baud",
        config.poll_hz, port_name, config.baud
    );

    drive(&mut session, config.tick_period()).await?;

    info!("Teleop stopped");
    Ok(())
}
