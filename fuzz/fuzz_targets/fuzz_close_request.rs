#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let _ = server_registry::domain::listing::CloseRequest::from_slice(data);
});
