//! End-to-end tests driven entirely through [`LocalCluster`] and its
//! [`Clerk`](ringkv_client::Clerk): full replication, partial-membership
//! shard rejection, append chains, primary failover with read-repair on
//! recovery, non-numeric key placement, and repair of a peer that missed
//! a write.
//!
//! Retry-after-dropped-reply coverage (a peer applies a write but the
//! caller observes a timeout) lives in `ringkv-client`'s own tests, since
//! it needs a peer double that drops only the reply rather than the whole
//! call, which `FaultInjectingPeer` doesn't model.

use ringkv_cluster::LocalCluster;
use ringkv_rpc::PeerStatus;
use ringkv_server::ServerError;
use ringkv_wire::GetArgs;

#[test]
fn full_replication_converges_on_every_replica() {
    let cluster = LocalCluster::new(3, 3).unwrap();
    cluster.clerk().put("5", "A").unwrap();
    for id in 0..3 {
        let reply = cluster
            .server(id)
            .handle_get(GetArgs::peer_internal("5", 99))
            .unwrap();
        assert_eq!(reply.payload, "A", "replica {id} did not converge");
    }
}

#[test]
fn partial_replication_rejects_direct_rpc_to_non_member() {
    let cluster = LocalCluster::new(3, 2).unwrap();
    cluster.clerk().put("5", "A").unwrap();
    assert_eq!(cluster.clerk().get("5").unwrap(), "A");

    let primary = cluster.config().primary_of("5");
    let list = cluster.config().preference_list("5");
    let non_member = (0..3).find(|id| !list.contains(id)).unwrap();

    let err = cluster
        .server(non_member)
        .handle_get(GetArgs::peer_internal("5", 1))
        .unwrap_err();
    assert_eq!(
        err,
        ServerError::NotInShard {
            key: "5".to_string(),
            server_id: non_member
        }
    );
    assert_ne!(primary, non_member);
}

#[test]
fn append_chain_converges_across_all_replicas() {
    let cluster = LocalCluster::new(3, 3).unwrap();
    let clerk = cluster.clerk();
    clerk.put("k", "X").unwrap();
    assert_eq!(clerk.append("k", "Y").unwrap(), "X");
    assert_eq!(clerk.append("k", "Z").unwrap(), "XY");
    assert_eq!(clerk.get("k").unwrap(), "XYZ");
}

#[test]
fn read_repair_converges_a_peer_that_missed_a_write() {
    // nreplicas=3 on a 3-server cluster: every server is in every
    // preference list, so a Put's primary fan-out already replicates
    // everywhere. Drop one peer's write and confirm the next Get still
    // converges it via read-repair.
    let cluster = LocalCluster::new(3, 3).unwrap();
    let primary = cluster.config().primary_of("k");
    let victim = (0..3).find(|&id| id != primary).unwrap();

    cluster.set_peer_status(victim, PeerStatus::Down);
    cluster.clerk().put("k", "A").unwrap();
    cluster.set_peer_status(victim, PeerStatus::Up);

    assert_eq!(cluster.clerk().get("k").unwrap(), "A");
    let repaired = cluster
        .server(victim)
        .handle_get(GetArgs::peer_internal("k", 1))
        .unwrap();
    assert_eq!(repaired.payload, "A");
}

#[test]
fn primary_failover_then_read_repair_on_recovery() {
    let cluster = LocalCluster::new(3, 3).unwrap();
    let primary = cluster.config().primary_of("k");

    cluster.set_peer_status(primary, PeerStatus::Down);
    cluster.clerk().put("k", "A").unwrap();
    assert_eq!(cluster.clerk().get("k").unwrap(), "A");

    cluster.set_peer_status(primary, PeerStatus::Up);
    assert_eq!(cluster.clerk().get("k").unwrap(), "A");
    let repaired = cluster
        .server(primary)
        .handle_get(GetArgs::peer_internal("k", 1))
        .unwrap();
    assert_eq!(repaired.payload, "A");
}

#[test]
fn non_numeric_key_places_and_converges() {
    let cluster = LocalCluster::new(3, 3).unwrap();
    cluster.clerk().put("apple", "1").unwrap();
    assert_eq!(cluster.clerk().get("apple").unwrap(), "1");
}
