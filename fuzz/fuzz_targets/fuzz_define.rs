#![no_main]

use libfuzzer_sys::fuzz_target;
use pd_errs::{Registry, Severity, namespaces};

fn leak(bytes: &[u8]) -> Option<&'static str> {
    let s = std::str::from_utf8(bytes).ok()?;
    Some(Box::leak(s.to_owned().into_boxed_str()))
}

fuzz_target!(|data: &[u8]| {
    let mut parts = data.splitn(3, |&b| b == 0);
    let (Some(subsystem), Some(name), Some(template)) = (
        parts.next().and_then(leak),
        parts.next().and_then(leak),
        parts.next().and_then(leak),
    ) else {
        return;
    };

    let mut builder = Registry::builder();
    let Ok(descriptor) =
        builder.define(&namespaces::PD, subsystem, name, template, Severity::Error)
    else {
        return;
    };

    let rendered = descriptor.instantiate(&[&"a", &"b"]).to_string();
    assert!(rendered.starts_with('['));

    let registry = builder.build();
    assert!(registry.contains(name));
});
