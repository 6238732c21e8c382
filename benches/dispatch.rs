use std::sync::Arc;

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use quassel_proto::{FieldMap, InboundCall, NetworkId, SessionState, TypeTag, Value};
use quassel_session::storage::NoOpStorage;
use quassel_session::{Session, SessionChannels, SessionConfig};

const SINGLETONS: [(TypeTag, &str); 5] = [
    (TypeTag::BufferSyncer, ""),
    (TypeTag::BufferViewManager, ""),
    (TypeTag::AliasManager, ""),
    (TypeTag::NetworkConfig, "GlobalNetworkConfig"),
    (TypeTag::IgnoreListManager, ""),
];

fn init(tag: TypeTag, name: &str, fields: FieldMap) -> InboundCall {
    InboundCall::InitResponse {
        type_tag: tag.to_string(),
        name: name.to_string(),
        fields,
    }
}

fn topic(value: usize) -> FieldMap {
    let mut fields = FieldMap::new();
    fields.insert("topic".to_string(), Value::from(format!("topic {value}")));
    fields
}

/// A connected session with one network holding 100 channels.
fn connected_session() -> (Session, SessionChannels) {
    let (mut session, channels) = Session::new(SessionConfig::default(), Arc::new(NoOpStorage));
    session.connect().unwrap();
    session
        .establish(SessionState {
            network_ids: vec![NetworkId(1)],
            ..SessionState::default()
        })
        .unwrap();
    session
        .dispatch_inbound(init(TypeTag::Network, "1", FieldMap::new()))
        .unwrap();
    for i in 0..100 {
        session
            .dispatch_inbound(init(TypeTag::IrcChannel, &format!("1/#c{i}"), topic(i)))
            .unwrap();
    }
    for (tag, name) in SINGLETONS {
        session.dispatch_inbound(init(tag, name, FieldMap::new())).unwrap();
    }
    (session, channels)
}

fn mutation_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch");
    group.throughput(Throughput::Elements(1));

    let (mut session, mut channels) = connected_session();
    let mut i = 0usize;
    group.bench_function("channel_mutation", |b| {
        b.iter(|| {
            i += 1;
            session
                .dispatch_inbound(InboundCall::Mutation {
                    type_tag: "IrcChannel".to_string(),
                    name: format!("1/#c{}", i % 100),
                    fields: topic(i),
                })
                .unwrap();
        })
    });
    while channels.outbound.try_recv().is_ok() {}

    let mut j = 0usize;
    group.bench_function("deferred_mutation", |b| {
        b.iter(|| {
            j += 1;
            session
                .dispatch_inbound(InboundCall::Mutation {
                    type_tag: "IrcUser".to_string(),
                    name: format!("1/ghost{}", j % 100),
                    fields: topic(j),
                })
                .unwrap();
        })
    });

    group.finish();
    while channels.events.try_recv().is_ok() {}
}

fn bootstrap_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("bootstrap");
    group.bench_function("connect_to_connected", |b| {
        b.iter(|| {
            let (session, _channels) = connected_session();
            session
        })
    });
    group.finish();
}

criterion_group!(benches, mutation_benchmark, bootstrap_benchmark);
criterion_main!(benches);
