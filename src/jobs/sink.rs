use async_trait::async_trait;
use log::info;

use super::descriptor::JobDescriptor;
use super::error::SubmitError;
use super::manifest::job_manifest;

/// Destination for schedulable work. Each submission stands alone: a
/// failure is reported per descriptor and never cancels the others.
#[async_trait]
pub trait JobSink {
    async fn submit(&self, job: &JobDescriptor) -> Result<(), SubmitError>;
}

/// Submits `batch/v1` Jobs to a cluster API endpoint.
pub struct KubernetesSink {
    client: reqwest::Client,
    api_url: String,
    image: String,
    recordings_claim: String,
}

impl KubernetesSink {
    pub fn new(
        api_url: String,
        image: String,
        recordings_claim: String,
    ) -> Result<Self, SubmitError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;
        Ok(Self {
            client,
            api_url,
            image,
            recordings_claim,
        })
    }
}

#[async_trait]
impl JobSink for KubernetesSink {
    async fn submit(&self, job: &JobDescriptor) -> Result<(), SubmitError> {
        let url = format!(
            "{}/apis/batch/v1/namespaces/{}/jobs",
            self.api_url.trim_end_matches('/'),
            job.namespace
        );
        let manifest = job_manifest(job, &self.image, &self.recordings_claim);

        let response = self.client.post(&url).json(&manifest).send().await?;
        if !response.status().is_success() {
            return Err(SubmitError::Rejected {
                name: job.name.clone(),
                status: response.status(),
            });
        }

        info!(
            "created job {} for {} (sleeps {}s)",
            job.name, job.satellite.name, job.sleep_seconds
        );
        Ok(())
    }
}

/// Logs what would be submitted. Used when no cluster API is configured,
/// keeping the rest of the pipeline exercisable without a cluster.
pub struct DryRunSink;

#[async_trait]
impl JobSink for DryRunSink {
    async fn submit(&self, job: &JobDescriptor) -> Result<(), SubmitError> {
        info!(
            "[dry-run] job {} for {} at {} (sleeps {}s, records {}s)",
            job.name, job.satellite.name, job.station.name, job.sleep_seconds, job.duration_seconds
        );
        Ok(())
    }
}
