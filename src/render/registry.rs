use indexmap::IndexMap;
use tracing::debug;

use crate::render::EngineId;
use crate::render::backends::{ChartBackend, create_backend};

/// Lifecycle of one engine slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendState {
    Unloaded,
    Loading,
    Ready,
}

/// Handle for one in-flight backend load.
///
/// Tickets carry the registry generation they were issued in; completing a
/// ticket from an earlier generation is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadTicket {
    engine: EngineId,
    generation: u64,
    sequence: u64,
}

impl LoadTicket {
    #[must_use]
    pub fn engine(self) -> EngineId {
        self.engine
    }

    #[must_use]
    pub fn generation(self) -> u64 {
        self.generation
    }
}

/// Result of asking for an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Ready,
    Pending(LoadTicket),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Activated,
    AlreadyReady,
    Discarded,
}

#[derive(Debug)]
enum Slot {
    Unloaded,
    Loading(LoadTicket),
    Ready(Box<dyn ChartBackend>),
}

/// Engine slots for one chart surface.
///
/// The vector engine is ready from construction; canvas and drawing
/// engines load on first activation and are reused afterwards.
#[derive(Debug)]
pub struct BackendRegistry {
    slots: IndexMap<EngineId, Slot>,
    generation: u64,
    next_sequence: u64,
}

impl Default for BackendRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl BackendRegistry {
    #[must_use]
    pub fn new() -> Self {
        let slots = EngineId::ALL
            .into_iter()
            .map(|engine| {
                let slot = if engine.is_lazy() {
                    Slot::Unloaded
                } else {
                    Slot::Ready(create_backend(engine))
                };
                (engine, slot)
            })
            .collect();
        Self {
            slots,
            generation: 0,
            next_sequence: 0,
        }
    }

    #[must_use]
    pub fn state(&self, engine: EngineId) -> BackendState {
        match self.slots.get(&engine) {
            None | Some(Slot::Unloaded) => BackendState::Unloaded,
            Some(Slot::Loading(_)) => BackendState::Loading,
            Some(Slot::Ready(_)) => BackendState::Ready,
        }
    }

    /// Bumped by every teardown.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Starts loading `engine` if needed. Repeated calls while a load is in
    /// flight return the same ticket.
    pub fn activate(&mut self, engine: EngineId) -> Activation {
        let slot = self.slots.entry(engine).or_insert(Slot::Unloaded);
        match slot {
            Slot::Ready(_) => Activation::Ready,
            Slot::Loading(ticket) => Activation::Pending(*ticket),
            Slot::Unloaded => {
                let ticket = LoadTicket {
                    engine,
                    generation: self.generation,
                    sequence: self.next_sequence,
                };
                self.next_sequence += 1;
                *slot = Slot::Loading(ticket);
                debug!(%engine, generation = ticket.generation, "backend load started");
                Activation::Pending(ticket)
            }
        }
    }

    /// Finishes the load behind `ticket`.
    pub fn complete(&mut self, ticket: LoadTicket) -> LoadOutcome {
        if ticket.generation != self.generation {
            debug!(
                engine = %ticket.engine,
                ticket_generation = ticket.generation,
                generation = self.generation,
                "discarding load finished after teardown"
            );
            return LoadOutcome::Discarded;
        }
        let Some(slot) = self.slots.get_mut(&ticket.engine) else {
            return LoadOutcome::Discarded;
        };
        let pending = match slot {
            Slot::Ready(_) => return LoadOutcome::AlreadyReady,
            Slot::Loading(pending) => *pending,
            Slot::Unloaded => return LoadOutcome::Discarded,
        };
        if pending != ticket {
            return LoadOutcome::Discarded;
        }
        *slot = Slot::Ready(create_backend(ticket.engine));
        debug!(engine = %ticket.engine, "backend ready");
        LoadOutcome::Activated
    }

    /// Tickets for every load still in flight.
    #[must_use]
    pub fn pending(&self) -> Vec<LoadTicket> {
        self.slots
            .values()
            .filter_map(|slot| match slot {
                Slot::Loading(ticket) => Some(*ticket),
                _ => None,
            })
            .collect()
    }

    /// Completes every pending load; returns how many engines became ready.
    pub fn poll_loads(&mut self) -> usize {
        self.pending()
            .into_iter()
            .filter(|ticket| self.complete(*ticket) == LoadOutcome::Activated)
            .count()
    }

    pub fn backend_mut(&mut self, engine: EngineId) -> Option<&mut dyn ChartBackend> {
        match self.slots.get_mut(&engine) {
            Some(Slot::Ready(backend)) => Some(backend.as_mut()),
            _ => None,
        }
    }

    /// Puts `backend` in its engine's slot as ready, replacing whatever was
    /// there.
    pub fn install(&mut self, backend: Box<dyn ChartBackend>) {
        let engine = backend.engine();
        if let Some(Slot::Ready(mut previous)) = self.slots.insert(engine, Slot::Ready(backend)) {
            previous.teardown();
        }
    }

    /// Cancels in-flight loads and clears every ready backend's target.
    ///
    /// Tickets issued before this call will be discarded on completion.
    pub fn teardown(&mut self) {
        self.generation += 1;
        for slot in self.slots.values_mut() {
            match slot {
                Slot::Ready(backend) => backend.teardown(),
                Slot::Loading(_) => *slot = Slot::Unloaded,
                Slot::Unloaded => {}
            }
        }
        debug!(generation = self.generation, "backend registry torn down");
    }
}
