#![no_main]
use std::sync::Arc;

use libfuzzer_sys::fuzz_target;
use server_registry::adapters::clock::SystemClock;
use server_registry::domain::listing::UpdateRequest;
use server_registry::registry::store::Registry;

fuzz_target!(|data: &[u8]| {
    if let Ok(req) = UpdateRequest::from_slice(data) {
        let registry = Registry::new(Arc::new(SystemClock));
        assert!(registry.upsert(&req.id, &req.region, req.player_count).is_ok());
        assert_eq!(registry.snapshot_all().len(), 1);
    }
});
