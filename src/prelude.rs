pub use crate::base::{
    config::Config,
    types::{Err, IssueClassification, IssueType, Order, OrderError, Res, TriageError, TriageMessage, Void},
};
pub use anyhow::anyhow;
pub use tracing::{debug, error, info, instrument, warn};
