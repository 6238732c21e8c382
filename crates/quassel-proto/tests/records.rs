use quassel_proto::{
    BufferId, BufferInfo, BufferKind, InboundCall, NetworkId, OutboundCall, TransportEvent,
    TypeTag, Value,
};

#[test]
fn test_decode_mutation_with_nested_fields() {
    let raw = r#"{"kind":"mutation","type_tag":"Network","name":"1","fields":{"topic":"x","ports":[6667,6697]}}"#;
    let call: InboundCall = serde_json::from_str(raw).unwrap();
    match call {
        InboundCall::Mutation { type_tag, name, fields } => {
            assert_eq!(type_tag, "Network");
            assert_eq!(name, "1");
            assert_eq!(fields.get("topic"), Some(&Value::from("x")));
            assert_eq!(fields.get("ports").and_then(Value::as_list).map(<[Value]>::len), Some(2));
        }
        other => panic!("unexpected call {other:?}"),
    }
}

#[test]
fn test_decode_unknown_type_tag_is_kept_raw() {
    let raw = r#"{"kind":"init_response","type_tag":"TransferManager","name":""}"#;
    let call: InboundCall = serde_json::from_str(raw).unwrap();
    assert!(matches!(
        call,
        InboundCall::InitResponse { ref type_tag, ref fields, .. }
            if type_tag == "TransferManager" && fields.is_empty()
    ));
    assert_eq!(call.kind(), "init_response");
}

#[test]
fn test_decode_buffer_info_kinds() {
    let raw = r##"{"id":10,"network_id":1,"type":2,"name":"#a"}"##;
    let info: BufferInfo = serde_json::from_str(raw).unwrap();
    assert_eq!(info, BufferInfo::new(BufferId(10), NetworkId(1), BufferKind::Channel, "#a"));

    let raw = r#"{"id":11,"network_id":1,"type":64}"#;
    let info: BufferInfo = serde_json::from_str(raw).unwrap();
    assert_eq!(info.kind, BufferKind::Unknown(64));
    assert_eq!(info.name, "");
}

#[test]
fn test_decode_password_change_defaults_peer_handle() {
    let call: InboundCall =
        serde_json::from_str(r#"{"kind":"password_change_result","success":true}"#).unwrap();
    assert_eq!(
        call,
        InboundCall::PasswordChangeResult { success: true, peer_handle: 0 }
    );
}

#[test]
fn test_encode_init_request() {
    let call = OutboundCall::InitRequest {
        type_tag: TypeTag::NetworkConfig,
        name: "GlobalNetworkConfig".to_string(),
    };
    let json = serde_json::to_value(&call).unwrap();
    assert_eq!(json["kind"], "init_request");
    assert_eq!(json["type_tag"], "NetworkConfig");
    assert_eq!(json["name"], "GlobalNetworkConfig");
}

#[test]
fn test_decode_transport_script_line() {
    let raw = r##"{"event":"established","state":{"network_ids":[1],"buffer_infos":[{"id":10,"network_id":1,"type":2,"name":"#a"}]}}"##;
    let event: TransportEvent = serde_json::from_str(raw).unwrap();
    match event {
        TransportEvent::Established { state } => {
            assert_eq!(state.network_ids, vec![NetworkId(1)]);
            assert!(state.identities.is_empty());
            assert_eq!(state.buffer_infos.len(), 1);
        }
        other => panic!("unexpected event {other:?}"),
    }

    let lost: TransportEvent = serde_json::from_str(r#"{"event":"lost"}"#).unwrap();
    assert_eq!(lost, TransportEvent::Lost);
}
