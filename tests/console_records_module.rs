use farmgate::console::{parse_records, parse_single};

const SESSION_LIST: &str = "\
session : 7f0e0001-aaaa-bbbb-cccc-000000000001\n\
session-id : 12\n\
infobase : accounting\n\
user-name : \"Иванов Петр\"\n\
\n\
session : 7f0e0001-aaaa-bbbb-cccc-000000000002\n\
session-id : 13\n\
infobase : trade\n\
user-name : \"smith\"\n";

#[test]
fn list_mode_keeps_every_block() {
    let records = parse_records(SESSION_LIST, "session");
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id, "7f0e0001-aaaa-bbbb-cccc-000000000001");
    assert_eq!(records[1].id, "7f0e0001-aaaa-bbbb-cccc-000000000002");
    assert_eq!(
        records[0].attrs.get("user-name").map(String::as_str),
        Some("Иванов Петр")
    );
}

#[test]
fn concatenating_two_well_formed_blocks_round_trips() {
    let first = "cluster : 11111111-2222-3333-4444-555555555555\nhost : \"srv1\"\nport : 1541\n";
    let second = "cluster : 66666666-7777-8888-9999-000000000000\nhost : \"srv2\"\nport : 1540\n";
    let records = parse_records(&format!("{first}\n{second}"), "cluster");
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id, "11111111-2222-3333-4444-555555555555");
    assert_eq!(records[1].id, "66666666-7777-8888-9999-000000000000");
    assert_eq!(records[0].host.as_deref(), Some("srv1"));
    assert_eq!(records[1].host.as_deref(), Some("srv2"));
}

#[test]
fn info_mode_ignores_the_second_introduced_block() {
    let record = parse_single(SESSION_LIST, "session").expect("record");
    assert_eq!(record.id, "7f0e0001-aaaa-bbbb-cccc-000000000001");
    assert_eq!(record.attrs.get("infobase").map(String::as_str), Some("accounting"));
}

#[test]
fn records_serialize_for_the_web_layer() {
    let records = parse_records(SESSION_LIST, "session");
    let json = serde_json::to_value(&records).expect("json");
    assert_eq!(json[0]["kind"], "session");
    assert_eq!(json[0]["id"], "7f0e0001-aaaa-bbbb-cccc-000000000001");
    assert_eq!(json[0]["attrs"]["session-id"], "12");
    assert!(json[0].get("port").is_none());
}
