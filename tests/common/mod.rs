//! Integration test common infrastructure.
//!
//! Provides a scripted core: a [`TestSession`] wraps a live session and
//! drains its outbound calls and events for assertions.

#![allow(dead_code)]

use std::sync::Arc;

use quassel_proto::{
    BufferId, BufferInfo, BufferKind, FieldMap, InboundCall, Message, MsgId, NetworkId,
    OutboundCall, SessionState, TypeTag, Value,
};
use quassel_session::storage::MemoryStorage;
use quassel_session::{
    ConnectionPhase, Session, SessionChannels, SessionConfig, SessionEvent, SyncResult,
};

/// The five objects every bootstrap waits for.
pub const SINGLETONS: [(TypeTag, &str); 5] = [
    (TypeTag::BufferSyncer, ""),
    (TypeTag::BufferViewManager, ""),
    (TypeTag::AliasManager, ""),
    (TypeTag::NetworkConfig, "GlobalNetworkConfig"),
    (TypeTag::IgnoreListManager, ""),
];

pub struct TestSession {
    pub session: Session,
    pub channels: SessionChannels,
    pub storage: Arc<MemoryStorage>,
}

impl TestSession {
    pub fn new() -> Self {
        Self::with_config(SessionConfig::default())
    }

    pub fn with_config(config: SessionConfig) -> Self {
        let storage = Arc::new(MemoryStorage::new());
        let (session, channels) = Session::new(config, storage.clone());
        Self {
            session,
            channels,
            storage,
        }
    }

    /// Connect and hand over a session state, leaving the session in
    /// `INITIALIZING_DATA` with all outbound calls and events drained.
    pub fn establish(&mut self, networks: &[i32], buffers: Vec<BufferInfo>) {
        self.session.connect().expect("connect");
        self.session
            .establish(SessionState {
                network_ids: networks.iter().copied().map(NetworkId).collect(),
                identities: Vec::new(),
                buffer_infos: buffers,
            })
            .expect("establish");
        assert_eq!(self.session.phase(), ConnectionPhase::InitializingData);
        self.outbound();
        self.events();
    }

    /// Answer every bootstrap singleton with an empty init response.
    pub fn init_singletons(&mut self) {
        for (tag, name) in SINGLETONS {
            self.init(tag, name, FieldMap::new()).expect("singleton init");
        }
    }

    pub fn dispatch(&mut self, call: InboundCall) -> SyncResult {
        self.session.dispatch_inbound(call)
    }

    pub fn init(&mut self, tag: TypeTag, name: &str, fields: FieldMap) -> SyncResult {
        self.dispatch(InboundCall::InitResponse {
            type_tag: tag.to_string(),
            name: name.to_string(),
            fields,
        })
    }

    pub fn mutate(&mut self, tag: TypeTag, name: &str, fields: FieldMap) -> SyncResult {
        self.dispatch(InboundCall::Mutation {
            type_tag: tag.to_string(),
            name: name.to_string(),
            fields,
        })
    }

    pub fn backlog(&mut self, buffer: i32, messages: Vec<Message>) -> SyncResult {
        self.dispatch(InboundCall::BacklogReceived {
            buffer_id: BufferId(buffer),
            messages,
        })
    }

    /// Drain outbound calls sent so far.
    pub fn outbound(&mut self) -> Vec<OutboundCall> {
        std::iter::from_fn(|| self.channels.outbound.try_recv().ok()).collect()
    }

    /// Drain events emitted so far.
    pub fn events(&mut self) -> Vec<SessionEvent> {
        std::iter::from_fn(|| self.channels.events.try_recv().ok()).collect()
    }

    /// Drain events, keeping only the phases entered.
    pub fn phases(&mut self) -> Vec<ConnectionPhase> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                SessionEvent::PhaseChanged { to, .. } => Some(to),
                _ => None,
            })
            .collect()
    }

    pub fn phase(&self) -> ConnectionPhase {
        self.session.phase()
    }
}

pub fn fields(pairs: &[(&str, Value)]) -> FieldMap {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.clone()))
        .collect()
}

pub fn buffer(id: i32, network: i32, kind: BufferKind, name: &str) -> BufferInfo {
    BufferInfo::new(BufferId(id), NetworkId(network), kind, name)
}

pub fn message(id: i64, buffer: i32, content: &str) -> Message {
    Message {
        msg_id: MsgId(id),
        buffer_id: BufferId(buffer),
        timestamp: 1_700_000_000 + id,
        kind: 1,
        flags: 0,
        sender: "alice!alice@example.org".to_string(),
        content: content.to_string(),
    }
}

pub fn backlog_requests(calls: &[OutboundCall]) -> Vec<(BufferId, i32)> {
    calls
        .iter()
        .filter_map(|call| match call {
            OutboundCall::BacklogRequest { buffer_id, amount } => Some((*buffer_id, *amount)),
            _ => None,
        })
        .collect()
}

pub fn init_requests(calls: &[OutboundCall]) -> Vec<(TypeTag, String)> {
    calls
        .iter()
        .filter_map(|call| match call {
            OutboundCall::InitRequest { type_tag, name } => Some((*type_tag, name.clone())),
            _ => None,
        })
        .collect()
}
