//! Integration tests for buffer materialization and backlog completion.

mod common;

use common::{TestSession, backlog_requests, buffer, message};
use quassel_proto::{BufferId, BufferKind, InboundCall, NetworkId};
use quassel_session::model::Buffer;
use quassel_session::storage::BacklogStorage;
use quassel_session::{ConnectionPhase, SessionEvent};

fn loading(buffers: Vec<quassel_proto::BufferInfo>) -> TestSession {
    let mut t = TestSession::new();
    t.establish(&[1], buffers);
    t.init_singletons();
    assert_eq!(t.phase(), ConnectionPhase::LoadingBacklog);
    t
}

#[test]
fn test_redundant_backlog_fulfilment_connects_once() {
    let mut t = loading(vec![
        buffer(10, 1, BufferKind::Status, ""),
        buffer(11, 1, BufferKind::Channel, "#a"),
    ]);
    t.events();

    t.backlog(10, vec![]).unwrap();
    t.backlog(10, vec![]).unwrap();
    assert_eq!(t.phase(), ConnectionPhase::LoadingBacklog);

    t.backlog(11, vec![]).unwrap();
    t.backlog(11, vec![]).unwrap();
    t.backlog(10, vec![]).unwrap();
    assert_eq!(t.phase(), ConnectionPhase::Connected);
    assert_eq!(t.phases(), vec![ConnectionPhase::Connected]);
}

#[test]
fn test_removed_buffer_drops_backlog_obligation() {
    let mut t = loading(vec![
        buffer(10, 1, BufferKind::Status, ""),
        buffer(11, 1, BufferKind::Query, "bob"),
    ]);
    t.backlog(10, vec![message(1, 10, "hi")]).unwrap();

    t.dispatch(InboundCall::BufferRemoved {
        buffer_id: BufferId(11),
    })
    .unwrap();
    assert_eq!(t.phase(), ConnectionPhase::Connected);
    assert!(t.session.buffers().get(BufferId(11)).is_none());

    // A late page for the removed buffer is harmless.
    t.backlog(11, vec![]).unwrap();
    assert_eq!(t.phase(), ConnectionPhase::Connected);
}

#[test]
fn test_backlog_and_live_messages_reach_storage() {
    let mut t = loading(vec![buffer(10, 1, BufferKind::Channel, "#a")]);
    t.events();

    t.backlog(10, vec![message(1, 10, "one"), message(2, 10, "two")])
        .unwrap();
    t.dispatch(InboundCall::DisplayMessage {
        message: message(3, 10, "three"),
    })
    .unwrap();

    let stored = t.storage.messages(BufferId(10)).unwrap();
    assert_eq!(stored.len(), 3);
    assert_eq!(stored[2].content, "three");

    let updates = t
        .events()
        .into_iter()
        .filter(|e| matches!(e, SessionEvent::BufferUpdated { buffer_id } if *buffer_id == BufferId(10)))
        .count();
    assert_eq!(updates, 2);

    t.dispatch(InboundCall::BufferRemoved {
        buffer_id: BufferId(10),
    })
    .unwrap();
    assert!(t.storage.messages(BufferId(10)).unwrap().is_empty());
}

#[test]
fn test_materialization_never_duplicates() {
    let mut t = loading(vec![buffer(10, 1, BufferKind::Channel, "#a")]);
    assert_eq!(t.session.buffers().len(), 1);

    // Another network appearing re-runs materialization.
    t.dispatch(InboundCall::NetworkCreated {
        network_id: NetworkId(2),
    })
    .unwrap();
    t.dispatch(InboundCall::NetworkCreated {
        network_id: NetworkId(3),
    })
    .unwrap();
    assert_eq!(t.session.buffers().len(), 1);
    assert_eq!(t.session.buffers().ids(), vec![BufferId(10)]);
}

#[test]
fn test_buffer_info_updates() {
    let mut t = loading(vec![buffer(10, 1, BufferKind::Query, "bob")]);
    t.backlog(10, vec![]).unwrap();
    t.events();
    t.outbound();

    t.dispatch(InboundCall::BufferInfoUpdated {
        buffer_info: buffer(10, 1, BufferKind::Query, "robert"),
    })
    .unwrap();
    assert_eq!(t.session.buffers().get(BufferId(10)).unwrap().name(), "robert");

    t.dispatch(InboundCall::BufferInfoUpdated {
        buffer_info: buffer(12, 1, BufferKind::Channel, "#new"),
    })
    .unwrap();
    assert!(matches!(
        t.session.buffers().get(BufferId(12)),
        Some(Buffer::Channel(_))
    ));

    t.dispatch(InboundCall::BufferRenamed {
        buffer_id: BufferId(12),
        new_name: "#newer".to_string(),
    })
    .unwrap();
    assert_eq!(t.session.buffers().get(BufferId(12)).unwrap().name(), "#newer");

    assert_eq!(
        t.events(),
        vec![
            SessionEvent::BufferUpdated { buffer_id: BufferId(10) },
            SessionEvent::BufferUpdated { buffer_id: BufferId(12) },
            SessionEvent::BufferUpdated { buffer_id: BufferId(12) },
        ]
    );
    // Buffers added after bootstrap owe no backlog.
    assert!(backlog_requests(&t.outbound()).is_empty());
}

#[test]
fn test_buffer_update_during_init_waits_for_bootstrap() {
    let mut t = TestSession::new();
    t.establish(&[1], vec![]);
    t.dispatch(InboundCall::BufferInfoUpdated {
        buffer_info: buffer(10, 1, BufferKind::Channel, "#a"),
    })
    .unwrap();
    assert!(t.session.buffers().get(BufferId(10)).is_none());

    t.init_singletons();
    assert!(t.session.buffers().get(BufferId(10)).is_some());
    assert_eq!(backlog_requests(&t.outbound()), vec![(BufferId(10), 0)]);
}

#[test]
fn test_unknown_buffer_kind_is_skipped() {
    let mut t = loading(vec![
        buffer(10, 1, BufferKind::Unknown(0x40), "odd"),
        buffer(11, 1, BufferKind::Status, ""),
    ]);
    assert_eq!(backlog_requests(&t.outbound()), vec![(BufferId(11), 0)]);
    assert!(t.session.buffers().get(BufferId(10)).is_none());
}

#[test]
fn test_buffer_moved_to_unknown_network_waits() {
    let mut t = loading(vec![buffer(10, 1, BufferKind::Channel, "#a")]);
    t.backlog(10, vec![]).unwrap();
    assert_eq!(t.phase(), ConnectionPhase::Connected);

    t.dispatch(InboundCall::BufferInfoUpdated {
        buffer_info: buffer(10, 99, BufferKind::Channel, "#a"),
    })
    .unwrap();
    assert!(t.session.buffers().get(BufferId(10)).is_none());
    assert_eq!(t.session.buffers().pending_len(), 1);
    assert!(t.session.reader().buffers_by_network(NetworkId(99)).is_empty());

    t.dispatch(InboundCall::NetworkCreated {
        network_id: NetworkId(99),
    })
    .unwrap();
    let moved = t.session.buffers().get(BufferId(10)).unwrap();
    assert_eq!(moved.network_id(), NetworkId(99));
    assert_eq!(t.session.buffers().pending_len(), 0);
    assert_eq!(t.phase(), ConnectionPhase::Connected);
}
