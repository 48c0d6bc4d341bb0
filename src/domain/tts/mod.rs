pub mod locator;
pub mod markup;
pub mod model;
pub mod monitor;
pub mod report;
pub mod submitter;

pub use locator::{BlobLocator, LocatorParseError};
pub use model::{
    AudioFormat, EngineTier, JobState, RemoteJobStatus, RemoteTaskStatus, SynthesisJob,
    SynthesisRequest,
};
pub use monitor::{JobMonitor, MonitorSettings};
pub use report::{JobOutcome, SynthesisReport};
pub use submitter::{JobSubmitter, SubmissionSettings};
