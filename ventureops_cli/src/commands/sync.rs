//! The `sync` subcommand: drops every session cache so the next read
//! refetches from the CRM.

use ventureops_lib::cache::CacheRegistry;

pub fn run(registry: &CacheRegistry) {
    registry.sync_all();
    println!("session caches cleared");
}
