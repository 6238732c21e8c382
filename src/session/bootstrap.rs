//! Bootstrap sequence: seeding, singleton init, backlog fetch.

use quassel_proto::{OutboundCall, SessionState, TypeTag};
use tracing::{debug, info, warn};

use super::{Session, SessionEvent};
use crate::error::{SyncError, SyncResult};
use crate::phase::ConnectionPhase;

/// Objects whose init responses gate `INITIALIZING_DATA`.
pub(crate) const BOOTSTRAP_SINGLETONS: [(TypeTag, &str); 5] = [
    (TypeTag::BufferSyncer, ""),
    (TypeTag::BufferViewManager, ""),
    (TypeTag::AliasManager, ""),
    (TypeTag::NetworkConfig, "GlobalNetworkConfig"),
    (TypeTag::IgnoreListManager, ""),
];

impl Session {
    /// The transport reports an established session.
    ///
    /// Seeds the directories from `state`, requests the bootstrap singletons
    /// and enters `INITIALIZING_DATA`.
    pub fn establish(&mut self, state: SessionState) -> SyncResult {
        let span = self.span.clone();
        let _enter = span.enter();

        let current = self.phase.phase();
        if current != ConnectionPhase::Connecting {
            return Err(SyncError::InvalidTransition {
                from: current,
                to: ConnectionPhase::InitializingData,
            });
        }

        for id in &state.network_ids {
            if !self.registry.networks_mut().create(*id) {
                debug!(network = %id, "Duplicate network in session state");
                continue;
            }
            if self.config.request_network_init {
                self.outbox.send(OutboundCall::InitRequest {
                    type_tag: TypeTag::Network,
                    name: id.to_string(),
                });
            }
        }

        for fields in state.identities {
            if let Err(e) = self.registry.identities_mut().create(fields) {
                warn!(error = %e, "Skipping identity from session state");
            }
        }

        let buffer_count = state.buffer_infos.len();
        self.buffers.seed(state.buffer_infos);

        info!(
            networks = self.registry.networks().len(),
            identities = self.registry.identities().len(),
            buffers = buffer_count,
            "Session state received"
        );

        self.advance(ConnectionPhase::InitializingData)?;

        for (tag, name) in BOOTSTRAP_SINGLETONS {
            self.init_tracker.expect(tag, name);
        }
        for (tag, name) in BOOTSTRAP_SINGLETONS {
            self.outbox.send(OutboundCall::InitRequest {
                type_tag: tag,
                name: name.to_string(),
            });
        }

        self.publish();
        Ok(())
    }

    /// Entered when the last tracked init response arrives.
    pub(super) fn enter_loading_backlog(&mut self) -> SyncResult {
        self.advance(ConnectionPhase::LoadingBacklog)?;

        for id in self.buffers.materialize_all(self.registry.networks()) {
            self.outbox.emit(SessionEvent::BufferUpdated { buffer_id: id });
        }

        let ids = self.buffers.ids();
        if ids.is_empty() {
            info!("No buffers to load backlog for");
            return self.advance(ConnectionPhase::Connected);
        }

        for id in &ids {
            self.backlog_tracker.expect(*id);
        }
        for id in ids {
            self.outbox.send(OutboundCall::BacklogRequest {
                buffer_id: id,
                amount: self.config.initial_backlog_amount,
            });
        }
        Ok(())
    }

    /// Ask for the view configs listed by the buffer view manager.
    ///
    /// Ids in `already_listed`, views already held and views still awaited
    /// are skipped. While data is still initializing the requests join the
    /// init tracker, so the call must happen before the manager's own key is
    /// fulfilled.
    pub(super) fn request_buffer_views(&mut self, already_listed: &[i32]) {
        let Some(manager) = self.registry.buffer_view_manager() else {
            return;
        };
        let ids: Vec<i32> = manager
            .view_ids()
            .iter()
            .copied()
            .filter(|id| !already_listed.contains(id))
            .filter(|id| self.registry.buffer_view(*id).is_none())
            .filter(|id| !self.init_tracker.is_pending(TypeTag::BufferViewConfig, &id.to_string()))
            .collect();
        let track = self.config.track_buffer_view_configs
            && self.phase.phase() == ConnectionPhase::InitializingData;

        for id in ids {
            let name = id.to_string();
            debug!(view = id, "Requesting buffer view config");
            if track {
                self.init_tracker.expect(TypeTag::BufferViewConfig, &name);
            }
            self.outbox.send(OutboundCall::InitRequest {
                type_tag: TypeTag::BufferViewConfig,
                name,
            });
        }
    }
}
