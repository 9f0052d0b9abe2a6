//! National housing statistics.

mod cbs_client;

pub use cbs_client::CbsClient;
