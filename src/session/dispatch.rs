//! Inbound call routing.
//!
//! Every call from the core enters through [`Session::dispatch_inbound`] and
//! is applied completely before it returns. Recoverable failures are logged
//! and counted; a fatal one tears the session down.

use quassel_proto::{
    BufferId, FieldMap, InboundCall, InitKey, Message, NetworkId, OutboundCall, TypeTag,
};
use tracing::{debug, error, warn};

use super::{Session, SessionEvent};
use crate::buffers::BufferUpdate;
use crate::error::{SyncError, SyncResult};
use crate::phase::ConnectionPhase;
use crate::telemetry::{DispatchTimer, spans};
use crate::tracker::Completion;

const SECURITY_NOTICE: &str = "Your core has a critical vulnerability. Please update it.";

/// Type tag and object name a call addresses, for span fields.
fn call_target(call: &InboundCall) -> (Option<&str>, Option<&str>) {
    match call {
        InboundCall::InitResponse { type_tag, name, .. }
        | InboundCall::Mutation { type_tag, name, .. } => (Some(type_tag), Some(name)),
        InboundCall::Rename {
            type_tag, old_name, ..
        } => (Some(type_tag), Some(old_name)),
        _ => (None, None),
    }
}

impl Session {
    /// Apply one inbound call.
    ///
    /// Only a fatal registry violation is returned, after the session has
    /// already been torn down.
    pub fn dispatch_inbound(&mut self, call: InboundCall) -> SyncResult {
        let kind = call.kind();
        if self.phase.phase() == ConnectionPhase::Disconnected {
            warn!(kind, "Inbound call while disconnected, dropping");
            return Ok(());
        }

        let _timer = DispatchTimer::new(kind);
        let session_span = self.span.clone();
        let _session = session_span.enter();
        let (type_tag, name) = call_target(&call);
        let dispatch_span = spans::dispatch(kind, type_tag, name);
        let _dispatch = dispatch_span.enter();

        let result = self.route(call);
        let outcome = match result {
            Ok(()) => Ok(()),
            Err(err) if err.is_fatal() => {
                error!(error = %err, "Object registry diverged from core, disconnecting");
                crate::metrics::record_dispatch_error(kind, err.error_code());
                self.outbox.emit(SessionEvent::CriticalError {
                    message: err.to_string(),
                });
                self.disconnect();
                Err(err)
            }
            Err(err) => {
                match err {
                    SyncError::NotFound { .. } => debug!(error = %err, "Skipping call"),
                    _ => warn!(error = %err, "Skipping call"),
                }
                crate::metrics::record_dispatch_error(kind, err.error_code());
                Ok(())
            }
        };

        self.publish();
        outcome
    }

    fn route(&mut self, call: InboundCall) -> SyncResult {
        match call {
            InboundCall::InitResponse {
                type_tag,
                name,
                fields,
            } => self.on_init_response(type_tag.parse()?, &name, fields),
            InboundCall::Mutation {
                type_tag,
                name,
                fields,
            } => self.on_mutation(type_tag.parse()?, &name, fields),
            InboundCall::Rename {
                type_tag,
                old_name,
                new_name,
            } => {
                let tag: TypeTag = type_tag.parse()?;
                self.registry.rename(tag, &old_name, &new_name)?;
                self.deferred
                    .rekey(&InitKey::new(tag, &old_name), InitKey::new(tag, &new_name));
                Ok(())
            }
            InboundCall::NetworkCreated { network_id } => self.on_network_created(network_id),
            InboundCall::NetworkRemoved { network_id } => {
                if self.registry.networks_mut().remove(network_id).is_none() {
                    debug!(network = %network_id, "Removal of unknown network");
                }
                Ok(())
            }
            InboundCall::IdentityCreated { fields } => {
                let id = self.registry.identities_mut().create(fields)?;
                debug!(identity = %id, "Identity created");
                Ok(())
            }
            InboundCall::IdentityRemoved { identity_id } => {
                if self.registry.identities_mut().remove(identity_id).is_none() {
                    debug!(identity = %identity_id, "Removal of unknown identity");
                }
                Ok(())
            }
            InboundCall::BufferInfoUpdated { buffer_info } => {
                let id = buffer_info.id;
                let update = self.buffers.update(buffer_info, self.registry.networks());
                let live = self.phase.phase() >= ConnectionPhase::LoadingBacklog;
                if update == BufferUpdate::Pending && live {
                    self.buffers.materialize(id, self.registry.networks());
                }
                self.outbox.emit(SessionEvent::BufferUpdated { buffer_id: id });
                Ok(())
            }
            InboundCall::BufferRemoved { buffer_id } => {
                if !self.buffers.remove(buffer_id) {
                    debug!(buffer = %buffer_id, "Removal of unknown buffer");
                }
                if let Err(e) = self.storage.clear_messages(buffer_id) {
                    warn!(buffer = %buffer_id, error = %e, "Failed to clear backlog");
                }
                self.outbox.emit(SessionEvent::BufferUpdated { buffer_id });
                self.fulfil_backlog(buffer_id)
            }
            InboundCall::BufferRenamed { buffer_id, new_name } => {
                if self.buffers.rename(buffer_id, &new_name) {
                    self.outbox.emit(SessionEvent::BufferUpdated { buffer_id });
                } else {
                    debug!(buffer = %buffer_id, "Rename of unknown buffer");
                }
                Ok(())
            }
            InboundCall::PasswordChangeResult {
                success,
                peer_handle,
            } => {
                self.outbox.emit(SessionEvent::PasswordChanged { success });
                if peer_handle != 0 {
                    self.outbox.emit(SessionEvent::CriticalError {
                        message: SECURITY_NOTICE.to_string(),
                    });
                    return Err(SyncError::SecurityAnomaly(format!(
                        "password change result carried peer handle {peer_handle}"
                    )));
                }
                Ok(())
            }
            InboundCall::BacklogReceived {
                buffer_id,
                messages,
            } => self.on_backlog(buffer_id, &messages),
            InboundCall::DisplayMessage { message } => self.on_display_message(&message),
            InboundCall::DisplayStatusMessage { network, message } => {
                self.outbox
                    .emit(SessionEvent::StatusMessage { network, message });
                Ok(())
            }
            InboundCall::HeartBeatReply { latency_ms } => {
                self.latency_ms = Some(latency_ms);
                self.outbox.emit(SessionEvent::LagChanged { latency_ms });
                Ok(())
            }
        }
    }

    fn on_init_response(&mut self, tag: TypeTag, name: &str, fields: FieldMap) -> SyncResult {
        let initialized = self.registry.initialize(tag, name, fields);

        if initialized.is_ok() && tag == TypeTag::BufferViewManager {
            self.request_buffer_views(&[]);
        }

        let fulfilment = self.init_tracker.fulfil(tag, name, &mut self.deferred);
        if let Some(replay) = fulfilment.replay {
            if initialized.is_ok() {
                crate::metrics::record_deferred_replay();
                self.apply_existing(tag, name, replay)?;
            } else {
                self.deferred.buffer(InitKey::new(tag, name), replay);
            }
        }

        if initialized.is_ok() && tag == TypeTag::Network {
            self.replay_children(name);
        }

        if fulfilment.completion == Completion::Completed
            && self.phase.phase() == ConnectionPhase::InitializingData
        {
            debug!("All tracked init responses received");
            self.enter_loading_backlog()?;
        }

        initialized
    }

    fn on_mutation(&mut self, tag: TypeTag, name: &str, fields: FieldMap) -> SyncResult {
        let listed_views = self.listed_views(tag);
        match self.registry.resolve_mut(tag, name) {
            Ok(object) if object.is_initialized() => {
                object.apply(fields);
                match tag {
                    TypeTag::Network => self.replay_children(name),
                    TypeTag::BufferViewManager => self.request_buffer_views(&listed_views),
                    _ => {}
                }
                Ok(())
            }
            Ok(_) | Err(SyncError::NotFound { .. }) => {
                let key = InitKey::new(tag, name);
                let overwritten = self.deferred.buffer(key.clone(), fields);
                if overwritten {
                    debug!(key = %key, "Deferred mutation replaced an earlier one");
                } else {
                    debug!(key = %key, "Deferred mutation until init");
                }
                crate::metrics::record_deferred(overwritten);
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    fn on_network_created(&mut self, id: NetworkId) -> SyncResult {
        if !self.registry.networks_mut().create(id) {
            debug!(network = %id, "Network already known");
            return Ok(());
        }
        self.outbox.send(OutboundCall::InitRequest {
            type_tag: TypeTag::Network,
            name: id.to_string(),
        });
        if self.phase.phase() >= ConnectionPhase::LoadingBacklog {
            for buffer_id in self.buffers.materialize_all(self.registry.networks()) {
                self.outbox.emit(SessionEvent::BufferUpdated { buffer_id });
            }
        }
        Ok(())
    }

    fn on_backlog(&mut self, buffer_id: BufferId, messages: &[Message]) -> SyncResult {
        if let Err(e) = self.storage.store_messages(buffer_id, messages) {
            warn!(buffer = %buffer_id, error = %e, "Failed to store backlog");
        }
        debug!(buffer = %buffer_id, count = messages.len(), "Backlog received");
        if self.buffers.get(buffer_id).is_some() {
            self.outbox.emit(SessionEvent::BufferUpdated { buffer_id });
        }
        self.fulfil_backlog(buffer_id)
    }

    fn on_display_message(&mut self, message: &Message) -> SyncResult {
        if let Err(e) = self.storage.insert_message(message) {
            warn!(buffer = %message.buffer_id, error = %e, "Failed to store message");
        }
        self.outbox.emit(SessionEvent::BufferUpdated {
            buffer_id: message.buffer_id,
        });
        Ok(())
    }

    fn fulfil_backlog(&mut self, buffer_id: BufferId) -> SyncResult {
        let completion = self.backlog_tracker.fulfil(buffer_id);
        if completion == Completion::Completed
            && self.phase.phase() == ConnectionPhase::LoadingBacklog
        {
            return self.advance(ConnectionPhase::Connected);
        }
        Ok(())
    }

    /// Apply to an object that must already be initialized.
    fn apply_existing(&mut self, tag: TypeTag, name: &str, fields: FieldMap) -> SyncResult {
        let listed_views = self.listed_views(tag);
        self.registry.resolve_mut(tag, name)?.apply(fields);
        if tag == TypeTag::BufferViewManager {
            self.request_buffer_views(&listed_views);
        }
        Ok(())
    }

    /// View ids the manager lists before a mutation of `tag` lands.
    fn listed_views(&self, tag: TypeTag) -> Vec<i32> {
        if tag != TypeTag::BufferViewManager {
            return Vec::new();
        }
        self.registry
            .buffer_view_manager()
            .map(|manager| manager.view_ids().to_vec())
            .unwrap_or_default()
    }

    /// Replay mutations parked for the children of a freshly populated network.
    fn replay_children(&mut self, network: &str) {
        let Ok(id) = network.parse::<NetworkId>() else {
            return;
        };
        let Some(children) = self.registry.networks().get(id).map(|n| n.child_names()) else {
            return;
        };
        for (tag, name) in children {
            let Some(fields) = self.deferred.drain(&InitKey::new(tag, &name)) else {
                continue;
            };
            crate::metrics::record_deferred_replay();
            if let Err(e) = self.apply_existing(tag, &name, fields) {
                warn!(error = %e, "Deferred child mutation lost");
            }
        }
    }
}
