#![doc = include_str!("../README.md")]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod header;
pub use header::Header;

mod transaction;
pub use transaction::Transaction;

mod body;
pub use body::{Body, EpochSnarkData, Randomness};

mod block;
pub use block::Block;

mod log;
pub use log::{Log, StoredLog};

mod receipt;
pub use receipt::{Receipt, ReceiptStatus, StoredReceipt};

mod uptime;
pub use uptime::{Uptime, UptimeEntry};
