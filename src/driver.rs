//! Fixed-rate simulation thread
//!
//! The driver owns the [`SimulationState`] behind a reader-writer lock and
//! ticks it on its own thread. Input arrives as [`Command`]s over a channel and
//! is applied under the write lock at the start of each tick. Presentation
//! holds a [`SimView`] and takes a short read guard per thing it draws, so it
//! never blocks the tick for a whole frame.

use std::sync::Arc;
use std::thread::JoinHandle;

use crossbeam_channel::{Receiver, Sender};
use parking_lot::{RwLock, RwLockReadGuard};

use crate::audio::{self, SoundEffect};
use crate::interval::Interval;
use crate::sim::{Command, RunReport, SimPhase, SimulationState, tick};

/// Sound effects buffered between the tick thread and the audio sink
const SOUND_CHANNEL_CAPACITY: usize = 64;

/// Handle to a running simulation thread
pub struct Simulation {
    handle: JoinHandle<RunReport>,
    view: SimView,
    commands: CommandSender,
    sounds: Receiver<SoundEffect>,
}

impl Simulation {
    /// Spawn the tick thread. Ticks at `state.tick_rate` until the run ends.
    pub fn start(state: SimulationState) -> std::io::Result<Self> {
        let interval = Interval::per_second(state.tick_rate);
        let shared = Arc::new(RwLock::new(state));
        let (command_sender, command_receiver) = crossbeam_channel::unbounded();
        let (sound_sender, sound_receiver) = crossbeam_channel::bounded(SOUND_CHANNEL_CAPACITY);

        let runner = Runner {
            shared: shared.clone(),
            commands: command_receiver,
            sounds: sound_sender,
            interval,
        };
        let handle = std::thread::Builder::new()
            .name("simulation".to_string())
            .spawn(move || runner.run())?;

        Ok(Self {
            handle,
            view: SimView { shared },
            commands: CommandSender {
                sender: command_sender,
            },
            sounds: sound_receiver,
        })
    }

    pub fn view(&self) -> SimView {
        self.view.clone()
    }

    pub fn commands(&self) -> CommandSender {
        self.commands.clone()
    }

    /// Receiving end of the sound effect channel
    pub fn sounds(&self) -> &Receiver<SoundEffect> {
        &self.sounds
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the run to end. Blocks forever unless something ends it.
    pub fn join(self) -> std::thread::Result<RunReport> {
        self.handle.join()
    }
}

/// Read-only access for presentation
#[derive(Clone)]
pub struct SimView {
    shared: Arc<RwLock<SimulationState>>,
}

impl SimView {
    /// View over a state no thread is ticking
    pub fn detached(state: SimulationState) -> Self {
        Self {
            shared: Arc::new(RwLock::new(state)),
        }
    }

    /// Hold this only as long as one sub-draw needs it
    pub fn read(&self) -> RwLockReadGuard<'_, SimulationState> {
        self.shared.read()
    }

    pub fn with<R>(&self, f: impl FnOnce(&SimulationState) -> R) -> R {
        f(&self.shared.read())
    }

    pub fn phase(&self) -> SimPhase {
        self.shared.read().phase
    }

    pub fn is_ended(&self) -> bool {
        self.phase() == SimPhase::Ended
    }
}

/// Input side of the driver
#[derive(Clone)]
pub struct CommandSender {
    sender: Sender<Command>,
}

impl CommandSender {
    /// Queue a command for the next tick. False once the simulation is gone.
    pub fn send(&self, command: Command) -> bool {
        self.sender.send(command).is_ok()
    }

    pub fn send_all(&self, commands: impl IntoIterator<Item = Command>) -> bool {
        commands.into_iter().all(|command| self.send(command))
    }

    pub fn quit(&self) -> bool {
        self.send(Command::Quit)
    }
}

struct Runner {
    shared: Arc<RwLock<SimulationState>>,
    commands: Receiver<Command>,
    sounds: Sender<SoundEffect>,
    interval: Interval,
}

impl Runner {
    fn run(mut self) -> RunReport {
        log::info!(
            "Simulation thread started at {:.0} ticks/sec",
            1.0 / self.interval.target_interval().as_secs_f64()
        );

        loop {
            self.interval.step();

            let mut state = self.shared.write();
            for command in self.commands.try_iter() {
                state.apply(command);
            }

            match state.phase {
                SimPhase::Paused => continue,
                SimPhase::Ended => break,
                SimPhase::Running => tick(&mut state),
            }

            let effects = state.drain_sounds();
            let sound_on = state.settings.sound;
            drop(state);

            if sound_on && !effects.is_empty() {
                let dropped = audio::forward(effects, &self.sounds);
                if dropped > 0 {
                    log::trace!("Dropped {} sound effects", dropped);
                }
            }
        }

        let report = self.shared.read().report();
        log::info!(
            "Simulation thread stopped after {} ticks, score {}",
            report.ticks,
            report.score
        );
        report
    }
}
