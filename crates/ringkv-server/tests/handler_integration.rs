//! Integration tests against [`ReplicaServer`]'s public Get/Put/Append
//! surface directly, without a peer fabric — single-server, single-replica
//! configurations exercise dedup and merge behavior in isolation from
//! fan-out.

use std::collections::HashMap;

use ringkv_config::ClusterConfig;
use ringkv_server::{ReplicaServer, ServerError};
use ringkv_wire::{GetArgs, PutAppendArgs};

fn solo_server() -> ReplicaServer {
    let config = ClusterConfig::new(1, 1).unwrap();
    let server = ReplicaServer::new(0, config);
    server.set_peers(HashMap::new());
    server
}

#[test]
fn get_on_unwritten_key_is_absent() {
    let server = solo_server();
    let reply = server
        .handle_get(GetArgs::client("missing", 1))
        .expect("member");
    assert_eq!(reply.payload, "");
    assert_eq!(reply.ts, 0.0);
}

#[test]
fn get_on_non_member_key_is_a_shard_mismatch() {
    // 3 servers, 1 replica: key "5" hashes to server 2, server 0 is not a member.
    let config = ClusterConfig::new(3, 1).unwrap();
    let server = ReplicaServer::new(0, config);
    server.set_peers(HashMap::new());
    let err = server.handle_get(GetArgs::peer_internal("5", 1)).unwrap_err();
    assert_eq!(
        err,
        ServerError::NotInShard {
            key: "5".to_string(),
            server_id: 0
        }
    );
}

#[test]
fn put_then_get_round_trips() {
    let server = solo_server();
    server.handle_put(PutAppendArgs::new("k", "A", 1)).unwrap();
    let reply = server.handle_get(GetArgs::client("k", 2)).unwrap();
    assert_eq!(reply.payload, "A");
}

#[test]
fn duplicate_put_is_not_applied_twice() {
    let server = solo_server();
    let args = PutAppendArgs::new("k", "A", 42);
    server.handle_put(args.clone()).unwrap();
    let second = server.handle_put(args).unwrap();
    assert_eq!(second.0, "");
    let reply = server.handle_get(GetArgs::client("k", 2)).unwrap();
    assert_eq!(reply.payload, "A");
}

#[test]
fn append_extends_and_returns_prior_value() {
    let server = solo_server();
    server.handle_put(PutAppendArgs::new("k", "X", 1)).unwrap();
    let r1 = server.handle_append(PutAppendArgs::new("k", "Y", 2)).unwrap();
    assert_eq!(r1.0, "X");
    let r2 = server.handle_append(PutAppendArgs::new("k", "Z", 3)).unwrap();
    assert_eq!(r2.0, "XY");
    let get = server.handle_get(GetArgs::client("k", 4)).unwrap();
    assert_eq!(get.payload, "XYZ");
}

#[test]
fn duplicate_append_replays_exact_cached_reply() {
    let server = solo_server();
    server.handle_put(PutAppendArgs::new("k", "X", 1)).unwrap();
    // Appending a value that happens to recur in the payload exercises the
    // exact-replay path: stripping it out textually would be wrong.
    server.handle_put(PutAppendArgs::new("k", "XX", 5)).unwrap();
    let append = PutAppendArgs::new("k", "X", 2);
    let first = server.handle_append(append.clone()).unwrap();
    let retry = server.handle_append(append).unwrap();
    assert_eq!(first.0, retry.0);
    let get = server.handle_get(GetArgs::client("k", 9)).unwrap();
    assert_eq!(get.payload, "XXX");
}

#[test]
fn later_put_wins_on_subsequent_get() {
    let server = solo_server();
    server.handle_put(PutAppendArgs::new("k", "v1", 1)).unwrap();
    server.handle_put(PutAppendArgs::new("k", "v2", 2)).unwrap();
    let get = server.handle_get(GetArgs::client("k", 3)).unwrap();
    assert_eq!(get.payload, "v2");
}
