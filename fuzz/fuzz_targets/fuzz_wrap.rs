#![no_main]

use libfuzzer_sys::fuzz_target;
use pd_errs::definitions::ERR_ETCD_TXN;
use pd_errs::{ErrorField, render};
use std::io;

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data).into_owned();
    let err = ERR_ETCD_TXN.wrap(io::Error::other(text.clone()));

    let rendered = render(&err);
    assert_eq!(rendered, format!("[PD:etcd:ErrEtcdTxn] {text}"));
    assert_eq!(ErrorField::from_dyn(&err).to_string(), rendered);
});
