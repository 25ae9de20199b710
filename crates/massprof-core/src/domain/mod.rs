pub mod errors;
pub mod params;
pub mod partition;

pub use errors::{ProfileError, ProfileErrorCategory, ProfileResult};
pub use params::{ParamInfo, ParameterSet, UNBOUNDED};
pub use partition::{PartitionError, RadiusPartition};

use std::fmt::{Display, Formatter};

/// How the independent per-annulus and per-shell loops are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ExecutionMode {
    #[default]
    Serial,
    Parallel,
}

impl ExecutionMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Serial => "serial",
            Self::Parallel => "parallel",
        }
    }
}

impl Display for ExecutionMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}
