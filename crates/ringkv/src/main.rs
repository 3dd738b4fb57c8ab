//! ringkv demo CLI.
//!
//! Spins up an in-process replicated key-value cluster and drives it
//! through a scripted sequence of operations, printing each step. There is
//! no network listener here — [`ringkv_cluster::LocalCluster`] wires every
//! replica together in the same process, so this binary doubles as
//! executable documentation for the client/server protocol.
//!
//! # Quick Start
//!
//! ```bash
//! ringkv demo --servers 3 --replicas 3
//! ringkv demo --servers 3 --replicas 3 --fail-primary
//! ```

use std::error::Error;

use clap::{Parser, Subcommand};
use ringkv_cluster::LocalCluster;
use ringkv_rpc::PeerStatus;

/// ringkv - a replicated key-value store, reduced to its protocol core.
#[derive(Parser)]
#[command(name = "ringkv")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show version information.
    Version,

    /// Run a scripted put/append/get sequence against an in-process cluster.
    Demo {
        /// Number of replica servers in the cluster.
        #[arg(long, default_value_t = 3)]
        servers: usize,

        /// Number of replicas held per key.
        #[arg(long, default_value_t = 3)]
        replicas: usize,

        /// Disable the primary for `"k"` partway through the demo, to show
        /// failover and subsequent read-repair.
        #[arg(long)]
        fail_primary: bool,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Version => {
            println!("ringkv {}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Demo {
            servers,
            replicas,
            fail_primary,
        } => run_demo(servers, replicas, fail_primary)?,
    }
    Ok(())
}

fn run_demo(servers: usize, replicas: usize, fail_primary: bool) -> Result<(), Box<dyn Error>> {
    println!("starting cluster: {servers} servers, {replicas} replicas per key");
    let cluster = LocalCluster::new(servers, replicas)?;
    let clerk = cluster.clerk();

    clerk.put("k", "X")?;
    println!("put(\"k\", \"X\")");

    if fail_primary {
        let primary = cluster.config().primary_of("k");
        println!("disabling primary (server {primary}) for \"k\"");
        cluster.set_peer_status(primary, PeerStatus::Down);
    }

    let prior = clerk.append("k", "Y")?;
    println!("append(\"k\", \"Y\") -> {prior:?} (value before append)");

    let prior = clerk.append("k", "Z")?;
    println!("append(\"k\", \"Z\") -> {prior:?}");

    let value = clerk.get("k")?;
    println!("get(\"k\") -> {value:?}");

    if fail_primary {
        let primary = cluster.config().primary_of("k");
        println!("re-enabling primary (server {primary})");
        cluster.set_peer_status(primary, PeerStatus::Up);
        let value = clerk.get("k")?;
        println!("get(\"k\") -> {value:?} (primary now read-repaired)");
    }

    Ok(())
}
