mod descriptor;
mod error;
mod manifest;
mod sink;

pub use descriptor::{JobDescriptor, JobDescriptorBuilder};
pub use error::SubmitError;
pub use sink::{DryRunSink, JobSink, KubernetesSink};
