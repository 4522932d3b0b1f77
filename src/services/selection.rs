//! Per-session "currently selected scheme" state.
//!
//! Selecting a scheme fetches its detail. A newer selection (or a clear)
//! aborts the in-flight fetch, and a result is only committed if no newer
//! selection started meanwhile, so a slow answer for an old title can never
//! replace the view of a newer one.

use futures::future::{AbortHandle, Abortable};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::domain::schemes::{EnrichedScheme, SchemeSummary};
use crate::error::FetchError;
use crate::services::schemes::SchemeService;

#[derive(Default)]
struct SelectionState {
    generation: u64,
    in_flight: Option<AbortHandle>,
    current: Option<EnrichedScheme>,
}

impl SelectionState {
    /// Invalidates whatever is in flight and returns the new generation.
    fn supersede(&mut self) -> u64 {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
        self.generation += 1;
        self.generation
    }
}

#[derive(Clone)]
pub struct DetailSelector {
    service: SchemeService,
    state: Arc<Mutex<SelectionState>>,
}

impl DetailSelector {
    pub fn new(service: SchemeService) -> Self {
        Self {
            service,
            state: Arc::new(Mutex::new(SelectionState::default())),
        }
    }

    pub fn current(&self) -> Option<EnrichedScheme> {
        self.state.lock().current.clone()
    }

    /// Fetch the detail for `summary` and make the merged record current.
    ///
    /// On failure the previous selection stays as it was. Returns
    /// [`FetchError::Cancelled`] if a newer `select` or `clear` won.
    #[instrument(skip(self, summary), fields(title = %summary.title))]
    pub async fn select(&self, summary: SchemeSummary) -> Result<EnrichedScheme, FetchError> {
        let (generation, registration) = {
            let mut state = self.state.lock();
            let generation = state.supersede();
            let (handle, registration) = AbortHandle::new_pair();
            state.in_flight = Some(handle);
            (generation, registration)
        };

        let result = Abortable::new(self.service.fetch_detail(&summary.title), registration).await;

        let mut state = self.state.lock();
        if state.generation != generation {
            debug!(generation, latest = state.generation, "Discarding superseded detail");
            return Err(FetchError::Cancelled);
        }
        state.in_flight = None;

        let detail = result.map_err(|_| FetchError::Cancelled)??;
        let enriched = EnrichedScheme::merge(summary, detail);
        state.current = Some(enriched.clone());
        Ok(enriched)
    }

    /// Close the selection and cancel any pending fetch.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.supersede();
        state.current = None;
    }
}

/// Bounds on the session map.
#[derive(Debug, Clone, Copy)]
pub struct SessionLimits {
    /// Sessions untouched for this long are dropped.
    pub idle_timeout: Duration,
    /// Creating a session beyond this count evicts the least recently used one.
    pub max_sessions: usize,
}

impl Default for SessionLimits {
    fn default() -> Self {
        Self {
            idle_timeout: Duration::from_secs(30 * 60),
            max_sessions: 10_000,
        }
    }
}

struct SessionEntry {
    selector: DetailSelector,
    last_seen: Instant,
}

/// Selection sessions keyed by id.
#[derive(Clone)]
pub struct SelectionSessions {
    service: SchemeService,
    limits: SessionLimits,
    sessions: Arc<Mutex<HashMap<Uuid, SessionEntry>>>,
}

impl SelectionSessions {
    pub fn new(service: SchemeService, limits: SessionLimits) -> Self {
        Self {
            service,
            limits,
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn create(&self) -> Uuid {
        self.create_at(Instant::now())
    }

    fn create_at(&self, now: Instant) -> Uuid {
        let id = Uuid::new_v4();
        let mut sessions = self.sessions.lock();
        self.evict_idle(&mut sessions, now);

        while sessions.len() >= self.limits.max_sessions.max(1) {
            let Some(oldest) = sessions
                .iter()
                .min_by_key(|(_, entry)| entry.last_seen)
                .map(|(id, _)| *id)
            else {
                break;
            };
            if let Some(entry) = sessions.remove(&oldest) {
                entry.selector.clear();
            }
            debug!(session_id = %oldest, "Evicted least recently used session");
        }

        sessions.insert(
            id,
            SessionEntry {
                selector: DetailSelector::new(self.service.clone()),
                last_seen: now,
            },
        );
        debug!(session_id = %id, "Selection session created");
        id
    }

    /// Looks up a session and marks it as used.
    pub fn get(&self, id: &Uuid) -> Option<DetailSelector> {
        self.get_at(id, Instant::now())
    }

    fn get_at(&self, id: &Uuid, now: Instant) -> Option<DetailSelector> {
        let mut sessions = self.sessions.lock();
        self.evict_idle(&mut sessions, now);

        let entry = sessions.get_mut(id)?;
        entry.last_seen = now;
        Some(entry.selector.clone())
    }

    /// Drops the session, cancelling its pending fetch. Returns whether it existed.
    pub fn remove(&self, id: &Uuid) -> bool {
        match self.sessions.lock().remove(id) {
            Some(entry) => {
                entry.selector.clear();
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    fn evict_idle(&self, sessions: &mut HashMap<Uuid, SessionEntry>, now: Instant) {
        let before = sessions.len();
        sessions.retain(|_, entry| {
            let idle = now.saturating_duration_since(entry.last_seen) >= self.limits.idle_timeout;
            if idle {
                entry.selector.clear();
            }
            !idle
        });

        let evicted = before - sessions.len();
        if evicted > 0 {
            debug!(evicted, "Evicted idle selection sessions");
        }
    }
}
